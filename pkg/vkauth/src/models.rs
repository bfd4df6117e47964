use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

/// Token response of the VK oauth server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    /// Credential for calling the VK API on behalf of the user.
    pub access_token: String,

    /// The user's email, only present when the `email` scope was granted.
    #[serde(default)]
    pub email: Option<String>,

    /// Lifetime of the token in seconds. Zero means the token does not expire.
    pub expires_in: i64,

    /// VK identifier of the user who granted access.
    pub user_id: i64,
}

impl AccessToken {
    /// Returns the expiry instant of a token issued at `issued_at`,
    /// or `None` for tokens that never expire.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.expires_in <= 0 {
            return None;
        }
        Some(issued_at + Duration::seconds(self.expires_in))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Maps the numeric `sex` field of the VK API.
    pub(crate) fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => Self::Male,
            Some(1) => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// A VK user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    /// First and last name separated by a space.
    pub display_name: String,
    pub photo_url: Option<String>,
    pub gender: Gender,
    pub birthday: Option<NaiveDate>,
}

/// Envelope of a `users.get` answer.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersAnswer {
    pub(crate) response: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    #[serde(alias = "uid")]
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) photo_max: Option<String>,
    #[serde(default)]
    pub(crate) sex: Option<i64>,
    #[serde(default)]
    pub(crate) bdate: Option<String>,
}

/// Error object of the oauth endpoints, e.g. for an expired code.
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorAnswer {
    pub(crate) error: String,
    #[serde(default)]
    pub(crate) error_description: Option<String>,
}

/// Error envelope of the `method/*` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorAnswer {
    pub(crate) error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
}
