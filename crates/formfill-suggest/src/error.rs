use thiserror::Error;

/// Errors returned by the suggest API client.
///
/// Messages never include the request URL because it carries the API key.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Network or TLS failure from the underlying HTTP client. The URL is
    /// stripped on conversion.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("unexpected HTTP status {status} from suggest endpoint")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<reqwest::Error> for SuggestError {
    fn from(e: reqwest::Error) -> Self {
        SuggestError::Http(e.without_url())
    }
}
