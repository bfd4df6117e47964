use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::Error,
    fetch::HttpFetch,
    models::{
        AccessToken, ApiErrorAnswer, Gender, OAuthErrorAnswer, UserProfile, UserRecord,
        UsersAnswer,
    },
};

/// VK OAuth 2.0 endpoints.
const VK_AUTH_ENDPOINT: &str = "https://oauth.vk.com/authorize";
const VK_TOKEN_ENDPOINT: &str = "https://oauth.vk.com/access_token";
const VK_USERS_GET_ENDPOINT: &str = "https://api.vk.com/method/users.get";

/// VK API version sent with every versioned request.
const API_VERSION: &str = "5.23";

/// Profile fields requested from `users.get`.
const USER_FIELDS: &str = "photo_max,sex,bdate,photo";

/// Format of the `bdate` field, e.g. `15.4.1990`.
const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

/// OAuth 2.0 client for VK sign-in.
///
/// Handles authorization URL generation, token exchange, and profile lookup.
/// All network traffic goes through the injected [`HttpFetch`].
#[derive(Clone)]
pub struct VkOAuth<F> {
    config: ClientConfig,
    fetch: F,
}

impl<F: HttpFetch> VkOAuth<F> {
    /// Creates a new [`VkOAuth`] client instance.
    pub fn new(config: ClientConfig, fetch: F) -> Self {
        Self { config, fetch }
    }

    /// Constructs the URL of the VK authorization dialog.
    pub fn dialog_url(&self) -> Result<Url, Error> {
        let params = BTreeMap::from([
            ("client_id", self.config.app_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("scope", self.config.scope.as_str()),
            ("response_type", "code"),
            ("v", API_VERSION),
        ]);

        build_url(VK_AUTH_ENDPOINT, &params)
    }

    /// Constructs the URL that trades `code` for an access token.
    pub fn access_token_url(&self, code: &str) -> Result<Url, Error> {
        let params = BTreeMap::from([
            ("client_id", self.config.app_id.as_str()),
            ("client_secret", self.config.app_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ]);

        build_url(VK_TOKEN_ENDPOINT, &params)
    }

    /// Handles the redirect back from the VK dialog: extracts the
    /// authorization code and exchanges it for an access token.
    ///
    /// # Errors
    /// - the redirect carries no code (no request is sent)
    /// - sending the request
    /// - decoding the response, or the response is an oauth error
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, redirect: &Url) -> Result<AccessToken, Error> {
        let code = query_value(redirect, "code").unwrap_or_default();
        if code.is_empty() {
            let reason = query_value(redirect, "error_description")
                .or_else(|| query_value(redirect, "error"));
            return Err(Error::BadCode { reason });
        }

        let url = self.access_token_url(&code)?;
        debug!(endpoint = VK_TOKEN_ENDPOINT, "exchanging authorization code");
        let body = self.fetch.get(&url).await.map_err(Error::Fetch)?;

        if let Ok(err) = serde_json::from_str::<OAuthErrorAnswer>(&body) {
            return Err(Error::Provider {
                description: err.error_description.unwrap_or_default(),
                error: err.error,
            });
        }

        decode(&body)
    }

    /// Fetches the public profile of the user with the given identifier.
    ///
    /// # Errors
    /// - sending the request
    /// - decoding the response, or the response is an api error
    /// - the response does not contain exactly one user
    #[instrument(skip(self))]
    pub async fn fetch_user_profile(&self, user_id: i64) -> Result<UserProfile, Error> {
        self.users_get(user_id, None).await
    }

    /// Same as [`Self::fetch_user_profile`] but authorized by `token`.
    #[instrument(skip(self, token))]
    pub async fn fetch_user_profile_with_token(
        &self,
        user_id: i64,
        token: &AccessToken,
    ) -> Result<UserProfile, Error> {
        self.users_get(user_id, Some(&token.access_token)).await
    }

    async fn users_get(
        &self,
        user_id: i64,
        access_token: Option<&str>,
    ) -> Result<UserProfile, Error> {
        let uids = user_id.to_string();
        let mut params = BTreeMap::from([
            ("fields", USER_FIELDS),
            ("uids", uids.as_str()),
            ("v", API_VERSION),
        ]);
        if let Some(access_token) = access_token {
            params.insert("access_token", access_token);
        }

        let url = build_url(VK_USERS_GET_ENDPOINT, &params)?;
        debug!(endpoint = VK_USERS_GET_ENDPOINT, "fetching user profile");
        let body = self.fetch.get(&url).await.map_err(Error::Fetch)?;

        if let Ok(answer) = serde_json::from_str::<ApiErrorAnswer>(&body) {
            return Err(Error::Api {
                code: answer.error.error_code,
                message: answer.error.error_msg,
            });
        }

        let answer: UsersAnswer = decode(&body)?;
        let [record] = <[UserRecord; 1]>::try_from(answer.response)
            .map_err(|_| Error::BadResponse)?;

        Ok(to_profile(record))
    }
}

/// Builds `endpoint` with `params` as query, ordered by key.
fn build_url(endpoint: &str, params: &BTreeMap<&str, &str>) -> Result<Url, Error> {
    let url = Url::parse_with_params(endpoint, params)?;
    Ok(url)
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(body)?)
}

fn to_profile(record: UserRecord) -> UserProfile {
    let birthday = record.bdate.as_deref().and_then(parse_birthday);

    UserProfile {
        id: record.id,
        display_name: format!("{} {}", record.first_name, record.last_name),
        photo_url: record.photo_max.filter(|photo| !photo.is_empty()),
        gender: Gender::from_code(record.sex),
        birthday,
    }
}

/// Parses a `day.month.year` birthday. Users may hide the year, in which
/// case there is no usable date.
fn parse_birthday(bdate: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(bdate, BIRTHDAY_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(bdate, %err, "ignoring unparsable birthday");
            None
        }
    }
}
