use bytes::Bytes;
use serde::Serialize;

use crate::auth::dto::PublicUser;

/// Fields accepted by the profile update form. The dashboard submits every
/// field on each save and leaves untouched ones empty, so `None` and an
/// absent field mean the same thing. No Debug derive: this carries passwords
/// and raw image bytes.
#[derive(Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub avatar: Option<Bytes>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

/// Row in the dashboard's login-history panel.
#[derive(Debug, Serialize)]
pub struct LoginHistoryEntry {
    pub timestamp: &'static str,
    pub ip: &'static str,
    pub device: &'static str,
    pub status: &'static str,
}
