//! HTTP client for the geocoding suggest endpoint.
//!
//! Wraps `reqwest` with API key handling, request shaping from
//! [`SuggestSettings`] and typed response decoding.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SuggestError;
use crate::settings::SuggestSettings;
use crate::types::{SuggestResponse, SuggestionItem};

const DEFAULT_BASE_URL: &str = "https://api.mapy.cz/v1/";

/// Client for the suggest endpoint.
///
/// Use [`SuggestClient::new`] for production or
/// [`SuggestClient::with_base_url`] to point at a mock server in tests.
pub struct SuggestClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    settings: SuggestSettings,
}

impl SuggestClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        settings: SuggestSettings,
    ) -> Result<Self, SuggestError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SuggestError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        settings: SuggestSettings,
        base_url: &str,
    ) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("suggest"))
            .map_err(|e| SuggestError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &SuggestSettings {
        &self.settings
    }

    /// Fetches suggestions for `query` exactly as the API returns them.
    ///
    /// No locality post-filtering happens here; see
    /// [`crate::filter_by_locality`].
    ///
    /// # Errors
    ///
    /// - [`SuggestError::Http`] on network failure.
    /// - [`SuggestError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SuggestError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, SuggestError> {
        let url = self.build_url(query);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SuggestResponse =
            serde_json::from_str(&body).map_err(|e| SuggestError::Deserialize {
                context: format!("suggest(query={query})"),
                source: e,
            })?;
        let items = parsed.into_items();
        tracing::debug!(query, count = items.len(), "suggest response received");
        Ok(items)
    }

    /// Builds the request URL with percent-encoded query parameters, the API
    /// key last.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in self.settings.query_params(query) {
                pairs.append_pair(k, &v);
            }
            pairs.append_pair("apikey", &self.api_key);
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
