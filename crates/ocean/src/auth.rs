//! Access token loading.
//!
//! The API token lives in a plain file (`~/.do/access_token` by default),
//! is read once when a manager is constructed, and is held in memory for
//! the life of the process. Nothing here refreshes or watches the file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config;
use crate::error::{Error, Result};

/// Handle to the file the access token is read from.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Token file at a custom location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token file at the default location (`~/.do/access_token`).
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(config::default_token_path())
    }

    /// Path the token will be read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token, stripping surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] if the file is missing or unreadable.
    pub fn read(&self) -> Result<String> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| Error::Credentials {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Loaded access token");
        Ok(raw.trim().to_string())
    }
}
