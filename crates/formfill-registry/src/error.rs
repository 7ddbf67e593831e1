use thiserror::Error;

/// Errors returned by the business registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no registry record for {ico}")]
    NotFound { ico: String },

    #[error("unexpected HTTP status {status} for {ico}")]
    UnexpectedStatus { status: u16, ico: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("\"{0}\" is not a valid company identifier")]
    InvalidIco(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl RegistryError {
    /// `true` when the registry answered, but not with a record.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound { .. } | RegistryError::UnexpectedStatus { .. }
        )
    }
}
