use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use url::Url;

/// Error produced by an [`HttpFetch`] implementation.
///
/// Kept opaque so that any transport can be plugged in; the client passes it
/// through untouched in [`crate::Error::Fetch`].
pub type FetchError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single HTTP capability [`crate::VkOAuth`] depends on.
///
/// Implemented for [`reqwest::Client`]. Tests substitute a mock to run
/// without network access.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Performs a GET request and returns the response body.
    ///
    /// Non-success status codes are not an error here: VK reports oauth
    /// failures as JSON bodies on 4xx responses, which the caller decodes.
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

#[async_trait]
impl HttpFetch for Client {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let body = Client::get(self, url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .text()
            .await?;

        Ok(body)
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    /// Mock fetch for testing.
    ///
    /// Returns the canned response once; further calls fail.
    #[derive(Default)]
    pub struct MockHttpFetch {
        pub get: Mutex<Option<Result<String, FetchError>>>,
        pub get_call_count: AtomicUsize,
        pub requested: Mutex<Vec<String>>,
    }

    impl MockHttpFetch {
        /// Creates a mock answering with the given body.
        pub fn with_body(body: impl Into<String>) -> Self {
            Self {
                get: Mutex::new(Some(Ok(body.into()))),
                ..Default::default()
            }
        }

        /// Creates a mock failing with the given transport error.
        pub fn with_error(err: impl Into<FetchError>) -> Self {
            Self {
                get: Mutex::new(Some(Err(err.into()))),
                ..Default::default()
            }
        }

        pub fn get_calls(&self) -> usize {
            self.get_call_count.load(Ordering::SeqCst)
        }

        /// URLs requested so far, in call order.
        pub fn requested_urls(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpFetch for MockHttpFetch {
        async fn get(&self, url: &Url) -> Result<String, FetchError> {
            self.get_call_count.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            self.get
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err("no mocked response left".into()))
        }
    }
}
