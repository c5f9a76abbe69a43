//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during DigitalOcean operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Access token file could not be read.
    #[error("Failed to read access token from {path}: {source}")]
    Credentials {
        /// Path the token was expected at.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A reference value of a kind no lookup exists for.
    #[error("Unsupported reference: {0}")]
    UnsupportedReference(String),

    /// An SSH key with this name is already registered on the account.
    #[error("An SSH key named '{0}' already exists")]
    DuplicateKeyName(String),

    /// The exact public key material is already registered, possibly
    /// under a different name.
    #[error("Public key is already registered as '{name}'")]
    DuplicateKeyMaterial {
        /// Name the existing key is registered under.
        name: String,
    },

    /// No public key material was supplied and none could be read from disk.
    #[error("No public key provided and none readable at {0}")]
    MissingPublicKey(PathBuf),

    /// Droplet did not reach the requested status in time.
    #[error("Droplet '{droplet}' did not reach status '{status}' within {timeout_secs} seconds")]
    StatusWaitTimeout {
        /// Droplet name.
        droplet: String,
        /// Status that was waited for.
        status: String,
        /// How long the wait ran before giving up.
        timeout_secs: u64,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is an API-level read failure (an error response or a
    /// missing resource) rather than a transport or local failure.
    ///
    /// Lookups treat these as "resource absent" and degrade to `None`;
    /// everything else propagates.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::NotFound(_))
    }
}
