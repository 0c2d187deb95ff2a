pub(crate) use crate::auth::dto::{Claims, JwtKeys};
use crate::auth::dto::{AuthResponse, PublicUser};
use crate::auth::repo_types::Role;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::images::services::avatar_url_for;
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            role,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, expiry, issuer and audience in one pass. Any
    /// failure collapses into the same `InvalidToken` answer so callers
    /// cannot probe which check tripped.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt verification failed");
            ApiError::InvalidToken
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Login workflow: normalize the email, check the password against the
/// stored Argon2 hash and mint an access token. Unknown email and wrong
/// password both answer `InvalidCredentials`.
pub async fn authenticate(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "login with malformed email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login for unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let matches = verify_password(password, &user.password_hash).map_err(ApiError::Internal)?;
    if !matches {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user.id, user.role).map_err(ApiError::Internal)?;
    let avatar_url = avatar_url_for(state, &user).await;
    info!(user_id = %user.id, "admin logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser::from_user(&user, avatar_url),
    })
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
#[derive(Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                ApiError::InvalidToken
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("malformed Authorization header");
            ApiError::InvalidToken
        })?;

        let claims = keys.verify(token)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        let msg = err.to_string();
        assert!(!msg.is_empty());
    }
}


#[cfg(test)]
mod authenticate_tests {
    use super::*;

    async fn seeded_state(email: &str, password: &str) -> AppState {
        let state = AppState::fake();
        let hash = hash_password(password).expect("hash");
        state
            .users
            .create(email, &hash)
            .await
            .expect("create user");
        state
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let state = AppState::fake();
        let err = authenticate(&state, "nobody@parish.test", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let state = seeded_state("admin@parish.test", "password123").await;
        let err = authenticate(&state, "admin@parish.test", "password124")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn empty_password_is_a_validation_error() {
        let state = seeded_state("admin@parish.test", "password123").await;
        let err = authenticate(&state, "admin@parish.test", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn login_returns_a_verifiable_token_and_no_secret() {
        let state = seeded_state("admin@parish.test", "password123").await;
        let response = authenticate(&state, "admin@parish.test", "password123")
            .await
            .expect("login");

        let keys = JwtKeys::from_ref(&state);
        let claims = keys.verify(&response.token).expect("verify");
        assert_eq!(claims.sub, response.user.id);

        let body = serde_json::to_string(&response).expect("serialize");
        assert!(!body.contains("password"));
        assert!(!body.contains("argon2"));
    }

    #[tokio::test]
    async fn email_is_trimmed_and_lowercased() {
        let state = seeded_state("admin@parish.test", "password123").await;
        let response = authenticate(&state, "  Admin@Parish.Test ", "password123")
            .await
            .expect("login");
        assert_eq!(response.user.email, "admin@parish.test");
    }
}
