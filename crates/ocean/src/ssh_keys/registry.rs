//! SSH key lookup and registration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::info::SshKeyInfo;
use crate::api::models::{CreateSshKeyRequest, SshKey};
use crate::api::DoApi;
use crate::error::{Error, Result};

/// Reference to an SSH key: an already-fetched handle, a name, or an ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum SshKeyRef {
    /// Already-fetched key, passed through untouched.
    Handle(SshKey),
    /// Look up by name (case-insensitive).
    Name(String),
    /// Fetch by ID.
    Id(i64),
}

impl From<SshKey> for SshKeyRef {
    fn from(key: SshKey) -> Self {
        Self::Handle(key)
    }
}

impl From<&SshKey> for SshKeyRef {
    fn from(key: &SshKey) -> Self {
        Self::Handle(key.clone())
    }
}

impl From<&str> for SshKeyRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SshKeyRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for SshKeyRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl TryFrom<Value> for SshKeyRef {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Number(id) => id
                .as_i64()
                .map(Self::Id)
                .ok_or_else(|| Error::UnsupportedReference(format!("not a key ID: {id}"))),
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(Self::Handle)
                .map_err(|e| Error::UnsupportedReference(format!("not an SSH key object: {e}"))),
            other => Err(Error::UnsupportedReference(format!(
                "cannot reference an SSH key by {other}"
            ))),
        }
    }
}

impl std::fmt::Display for SshKeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handle(key) => write!(f, "{}", key.name),
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// SSH key operations on the account.
#[derive(Clone)]
pub struct SshKeyRegistry {
    /// Remote API handle.
    api: Arc<dyn DoApi>,
    /// Local public key consulted when no material is given explicitly.
    public_key_path: PathBuf,
}

impl SshKeyRegistry {
    /// New registry over an API handle, reading default key material from
    /// `public_key_path`.
    #[must_use]
    pub fn new(api: Arc<dyn DoApi>, public_key_path: PathBuf) -> Self {
        Self {
            api,
            public_key_path,
        }
    }

    /// Every SSH key on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_all(&self) -> Result<Vec<SshKey>> {
        self.api.list_ssh_keys().await
    }

    /// IDs of every SSH key on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_all_ids(&self) -> Result<Vec<i64>> {
        Ok(self.list_all().await?.into_iter().map(|key| key.id).collect())
    }

    /// Names of every SSH key on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_all_names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .map(|key| key.name)
            .collect())
    }

    /// First key whose name matches, ignoring case. Logs and returns `None`
    /// when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<SshKey>> {
        let found = self
            .list_all()
            .await?
            .into_iter()
            .find(|key| key.name.eq_ignore_ascii_case(name));
        if found.is_none() {
            warn!(key = %name, "SSH key not found");
        }
        Ok(found)
    }

    /// Fetch a key by ID. A missing or unreadable key logs a warning and
    /// comes back as `None`; transport failures propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transport.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<SshKey>> {
        match self.api.get_ssh_key(id).await {
            Ok(key) => Ok(Some(key)),
            Err(e) if e.is_read_error() => {
                warn!(key_id = id, error = %e, "SSH key not readable");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Find the registered key whose material matches exactly. Uses the
    /// provided text, or the default local public key file when `None`. If
    /// no material can be resolved at all, logs and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup request fails.
    pub async fn find_by_public_key(&self, public_key: Option<&str>) -> Result<Option<SshKey>> {
        let material = match public_key {
            Some(text) => Some(text.trim().to_string()),
            None => self.read_default_public_key(),
        };
        let Some(material) = material else {
            warn!(path = %self.public_key_path.display(), "No public key material to look up");
            return Ok(None);
        };
        self.api.find_ssh_key_by_public_key(&material).await
    }

    /// Resolve a reference to a key. Returns `None`, with a logged
    /// diagnostic, when the reference does not match any key.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote request fails in transport.
    pub async fn resolve(&self, key: impl Into<SshKeyRef>) -> Result<Option<SshKey>> {
        match key.into() {
            SshKeyRef::Handle(key) => Ok(Some(key)),
            SshKeyRef::Name(name) => self.find_by_name(&name).await,
            SshKeyRef::Id(id) => self.find_by_id(id).await,
        }
    }

    /// Guarded view over a resolved reference.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote request fails in transport.
    pub async fn info(&self, key: impl Into<SshKeyRef>) -> Result<SshKeyInfo> {
        Ok(SshKeyInfo::new(self.resolve(key).await?))
    }

    /// Whether a key with this name (ignoring case) is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self
            .list_all()
            .await?
            .iter()
            .any(|key| key.name.eq_ignore_ascii_case(name)))
    }

    /// ID of the key with this name (ignoring case).
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn id_by_name(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.find_by_name(name).await?.map(|key| key.id))
    }

    /// Contents of the default local public key file, trimmed. Logs and
    /// returns `None` when the file is missing or unreadable.
    #[must_use]
    pub fn read_default_public_key(&self) -> Option<String> {
        match std::fs::read_to_string(&self.public_key_path) {
            Ok(contents) => Some(contents.trim().to_string()),
            Err(e) => {
                warn!(path = %self.public_key_path.display(), error = %e, "Public key file not readable");
                None
            }
        }
    }

    /// Register a new SSH key.
    ///
    /// The name must be free (ignoring case) and the material must not
    /// already be registered under any name. Material comes from
    /// `public_key` or, when `None`, the default local file. After the
    /// remote create, the key is looked up again by name; if the service
    /// does not return it yet, this logs an error and returns `Ok(None)`
    /// rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKeyName`] or [`Error::DuplicateKeyMaterial`]
    /// on the duplicate checks, [`Error::MissingPublicKey`] when no material
    /// can be found, or any error from the remote requests.
    pub async fn create(&self, name: &str, public_key: Option<&str>) -> Result<Option<SshKey>> {
        if self.exists_by_name(name).await? {
            error!(key = %name, "An SSH key with this name already exists");
            return Err(Error::DuplicateKeyName(name.to_string()));
        }

        let material = match public_key {
            Some(text) => text.trim().to_string(),
            None => self.read_default_public_key().ok_or_else(|| {
                error!(path = %self.public_key_path.display(), "No public key material available");
                Error::MissingPublicKey(self.public_key_path.clone())
            })?,
        };

        if let Some(existing) = self.api.find_ssh_key_by_public_key(&material).await? {
            error!(
                key = %name,
                existing = %existing.name,
                "This public key is already registered"
            );
            return Err(Error::DuplicateKeyMaterial {
                name: existing.name,
            });
        }

        let request = CreateSshKeyRequest {
            name: name.to_string(),
            public_key: material,
        };
        self.api.create_ssh_key(&request).await?;

        match self.find_by_name(name).await? {
            Some(key) => {
                info!(key = %name, key_id = key.id, "SSH key registered");
                Ok(Some(key))
            }
            None => {
                error!(key = %name, "SSH key was created but is not yet visible");
                Ok(None)
            }
        }
    }
}
