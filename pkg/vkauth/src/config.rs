use crate::error::Error;

pub const APP_ID_ENV: &str = "VK_APP_ID";
pub const APP_SECRET_ENV: &str = "VK_APP_SECRET";
pub const REDIRECT_URI_ENV: &str = "VK_REDIRECT_URI";
pub const SCOPE_ENV: &str = "VK_SCOPE";

/// Credentials and settings of a registered VK application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub app_id: String,
    pub app_secret: String,
    pub redirect_url: String,
    pub scope: String,
}

impl ClientConfig {
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        redirect_url: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            redirect_url: redirect_url.into(),
            scope: scope.into(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// - a variable is unset or empty
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<L>(lookup: L) -> Result<Self, Error>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::MissingEnv(key.to_string()))
        };

        Ok(Self {
            app_id: get(APP_ID_ENV)?,
            app_secret: get(APP_SECRET_ENV)?,
            redirect_url: get(REDIRECT_URI_ENV)?,
            scope: get(SCOPE_ENV)?,
        })
    }
}
