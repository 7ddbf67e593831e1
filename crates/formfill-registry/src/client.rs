//! HTTP client for the business registry REST API.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::RegistryError;
use crate::ico::is_valid_ico;
use crate::types::RegistryRecord;

const DEFAULT_BASE_URL: &str =
    "https://ares.gov.cz/ekonomicke-subjekty-v-be/rest/ekonomicke-subjekty";

/// Client for the registry's economic-subject endpoint (`GET <base>/<ico>`).
pub struct RegistryClient {
    client: Client,
    base_url: Url,
}

impl RegistryClient {
    /// Creates a client pointed at the production registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, RegistryError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RegistryError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RegistryError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the record for an already sanitised identifier.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidIco`] if `ico` fails the checksum; no
    ///   request is made.
    /// - [`RegistryError::NotFound`] on HTTP 404.
    /// - [`RegistryError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`RegistryError::Http`] on network failure.
    /// - [`RegistryError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch(&self, ico: &str) -> Result<RegistryRecord, RegistryError> {
        if !is_valid_ico(ico) {
            return Err(RegistryError::InvalidIco(ico.to_owned()));
        }

        let url = self.record_url(ico)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                ico: ico.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(RegistryError::UnexpectedStatus {
                status: status.as_u16(),
                ico: ico.to_owned(),
            });
        }

        let body = response.text().await?;
        let record: RegistryRecord =
            serde_json::from_str(&body).map_err(|e| RegistryError::Deserialize {
                context: format!("registry(ico={ico})"),
                source: e,
            })?;
        tracing::debug!(ico, "registry record received");
        Ok(record)
    }

    fn record_url(&self, ico: &str) -> Result<Url, RegistryError> {
        self.base_url
            .join(ico)
            .map_err(|e| RegistryError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}
