mod client;
mod config;
mod error;
mod fetch;
mod models;
pub use client::VkOAuth;
pub use config::ClientConfig;
pub use error::Error;
pub use fetch::FetchError;
pub use fetch::HttpFetch;
pub use models::{AccessToken, Gender, UserProfile};

#[cfg(feature = "mock")]
pub use fetch::mock;
