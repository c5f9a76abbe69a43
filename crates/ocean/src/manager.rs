//! Top-level facade wiring the token file, API client, and registries.

use std::sync::Arc;

use crate::api::{ApiClient, DoApi};
use crate::auth::TokenFile;
use crate::config::OceanConfig;
use crate::droplets::DropletRegistry;
use crate::error::Result;
use crate::projects::ProjectRegistry;
use crate::ssh_keys::SshKeyRegistry;

/// Entry point composing the droplet, SSH key, and project registries
/// over one authenticated API client.
///
/// The access token is read once at construction and held for the life
/// of the process; nothing refreshes it.
#[derive(Clone)]
pub struct DigitalOcean {
    /// Droplet operations.
    pub droplets: DropletRegistry,
    /// SSH key operations.
    pub ssh_keys: SshKeyRegistry,
    /// Project operations.
    pub projects: ProjectRegistry,
}

impl DigitalOcean {
    /// Facade with the default configuration, reading the token from
    /// `~/.do/access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`](crate::Error::Credentials) if the
    /// token file cannot be read, or an error if the HTTP client cannot
    /// be created.
    pub fn new() -> Result<Self> {
        Self::with_config(OceanConfig::default())
    }

    /// Facade with a custom configuration; the token is read from
    /// `config.token_path`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(config: OceanConfig) -> Result<Self> {
        let token = TokenFile::new(config.token_path.clone()).read()?;
        Self::with_token(token, config)
    }

    /// Facade with an explicit token, bypassing the token file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_token(token: impl Into<String>, config: OceanConfig) -> Result<Self> {
        let client = match &config.api_base_url {
            Some(url) => ApiClient::with_base_url(token, url.clone())?,
            None => ApiClient::new(token)?,
        };
        Ok(Self::from_api(Arc::new(client), &config))
    }

    /// Facade over an existing API handle. Lets tests wire in scripted
    /// implementations of [`DoApi`].
    #[must_use]
    pub fn from_api(api: Arc<dyn DoApi>, config: &OceanConfig) -> Self {
        let projects = ProjectRegistry::new(Arc::clone(&api));
        let ssh_keys = SshKeyRegistry::new(Arc::clone(&api), config.public_key_path.clone());
        let droplets = DropletRegistry::new(api, projects.clone(), config);
        Self {
            droplets,
            ssh_keys,
            projects,
        }
    }

    /// IDs of every SSH key on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn ssh_key_ids(&self) -> Result<Vec<i64>> {
        self.ssh_keys.list_all_ids().await
    }

    /// Names of every SSH key on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn ssh_key_names(&self) -> Result<Vec<String>> {
        self.ssh_keys.list_all_names().await
    }

    /// ID of the SSH key with this name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn ssh_key_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        self.ssh_keys.id_by_name(name).await
    }
}

impl std::fmt::Debug for DigitalOcean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOcean").finish_non_exhaustive()
    }
}
