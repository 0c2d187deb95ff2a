use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::ApiError;

/// Body for recording a gift. `donated_at` defaults to now so back-dated
/// entries from paper records stay possible.
#[derive(Debug, Deserialize)]
pub struct NewDonation {
    pub donor: String,
    pub amount: Decimal,
    pub method: Option<String>,
    pub note: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub donated_at: Option<OffsetDateTime>,
}

impl NewDonation {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.donor.trim().is_empty() {
            return Err(ApiError::Validation("Donor name is required".into()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::Validation(
                "Donation amount must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn donation(donor: &str, amount: Decimal) -> NewDonation {
        NewDonation {
            donor: donor.to_string(),
            amount,
            method: None,
            note: None,
            donated_at: None,
        }
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(donation("Ann", Decimal::ZERO).validate().is_err());
        assert!(donation("Ann", Decimal::new(-500, 2)).validate().is_err());
    }

    #[test]
    fn blank_donor_is_rejected() {
        let err = donation("  ", Decimal::new(2500, 2)).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn positive_amount_passes() {
        assert!(donation("Ann", Decimal::new(2500, 2)).validate().is_ok());
    }
}
