//! Error types for secret lookup.

use thiserror::Error;

/// Errors that can occur while authenticating or reading secrets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecretError {
    /// `KEY_VAULT_URI` is not set.
    #[error("environment variable {var} is not set")]
    MissingVaultUri { var: &'static str },

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// Key Vault answered with an error status.
    #[error("key vault returned {status}: {message}")]
    KeyVault { status: u16, message: String },

    /// Secret does not exist in the vault or store.
    #[error("secret '{name}' not found")]
    SecretNotFound { name: String },

    /// Response body did not have the expected shape.
    #[error("malformed response from {source_name}: {message}")]
    MalformedResponse {
        source_name: &'static str,
        message: String,
    },

    /// One credential could not produce a token.
    #[error("{credential} unavailable: {reason}")]
    CredentialUnavailable {
        credential: &'static str,
        reason: String,
    },

    /// No credential in the chain produced a token.
    #[error("no credential could authenticate:\n  {}", .attempts.join("\n  "))]
    AuthenticationFailed { attempts: Vec<String> },
}

impl From<reqwest::Error> for SecretError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
