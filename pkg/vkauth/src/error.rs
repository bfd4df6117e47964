use crate::fetch::FetchError;

/// VK OAuth errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("bad code: {}", .reason.as_deref().unwrap_or("missing code parameter"))]
    BadCode { reason: Option<String> },

    #[error("bad server response")]
    BadResponse,

    #[error("failed to send request: {0}")]
    Fetch(#[source] FetchError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("oauth error {error}: {description}")]
    Provider { error: String, description: String },

    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("parse URL: {0}")]
    ParseURL(#[from] url::ParseError),

    #[error("{0} must be set")]
    MissingEnv(String),
}
