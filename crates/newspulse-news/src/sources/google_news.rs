//! Google News RSS search feed.

use std::time::Duration;

use newspulse_core::{AppConfig, FeedLocale};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use super::FeedSource;
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "https://news.google.com";

/// Client for the Google News RSS search endpoint.
///
/// Use [`GoogleNewsFeed::new`] for production or
/// [`GoogleNewsFeed::with_base_url`] to point at a mock server in tests.
pub struct GoogleNewsFeed {
    client: Client,
    base_url: String,
    locale: FeedLocale,
}

impl GoogleNewsFeed {
    /// Creates a feed client pointed at `news.google.com`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, FeedLocale::default(), timeout_secs, user_agent)
    }

    /// Creates a feed client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.feed_base_url,
            config.feed_locale.clone(),
            config.feed_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a feed client with a custom base URL and locale.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        locale: FeedLocale,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale,
        })
    }

    fn search_url(&self, query: &str, offset: usize, count: usize) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        format!(
            "{}/rss/search?q={encoded}&hl={}&gl={}&ceid={}&start={offset}&num={count}",
            self.base_url, self.locale.language, self.locale.region, self.locale.edition
        )
    }
}

impl FeedSource for GoogleNewsFeed {
    async fn fetch_document(
        &self,
        query: &str,
        offset: usize,
        count: usize,
    ) -> Result<String, FetchError> {
        let url = self.search_url(query, offset, count);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}
