use thiserror::Error;

/// Errors raised while loading configuration or the form profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read form profile {path}: {source}")]
    FormProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form profile: {0}")]
    FormProfileParse(#[from] serde_yaml::Error),

    #[error("form profile validation failed: {0}")]
    Validation(String),
}

/// Errors raised by a [`crate::SessionStore`] when persisting a value.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session file is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}
