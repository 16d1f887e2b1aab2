//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image provider error: {0}")]
    AiProvider(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Image generation failed: {0}")]
    BatchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error points at a credential problem rather than a
    /// transient provider failure.
    ///
    /// Classification is structural (`Error::Auth` is assigned from the HTTP
    /// status at the client layer); the substring check on provider errors is
    /// a last-resort fallback for providers that surface auth failures as
    /// opaque text.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::AiProvider(message) => {
                let lower = message.to_lowercase();
                lower.contains("api key") || lower.contains("401") || lower.contains("403")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
