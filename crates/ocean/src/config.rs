//! Runtime configuration for the toolkit.
//!
//! Every path and timing knob the crate consults lives here, so tests can
//! point the whole stack at temp files and mock servers without touching
//! the process environment.

use std::path::PathBuf;

/// Seconds between polls while waiting on a droplet status.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Seconds before a status wait gives up.
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Settings for talking to DigitalOcean.
#[derive(Debug, Clone)]
pub struct OceanConfig {
    /// File the API access token is read from.
    pub token_path: PathBuf,
    /// Public key file used when registering SSH keys without explicit
    /// key material.
    pub public_key_path: PathBuf,
    /// Override for the API base URL. `None` uses the production endpoint.
    pub api_base_url: Option<String>,
    /// Seconds between polls while waiting on a droplet status.
    pub poll_interval_secs: u64,
    /// Seconds before a status wait gives up.
    pub wait_timeout_secs: u64,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
            public_key_path: default_public_key_path(),
            api_base_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
        }
    }
}

/// Default access token location (`~/.do/access_token`).
#[must_use]
pub fn default_token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".do")
        .join("access_token")
}

/// Default public key location (`~/.ssh/id_rsa.pub`).
#[must_use]
pub fn default_public_key_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ssh")
        .join("id_rsa.pub")
}
