//! Droplet lookup, lifecycle, and project membership.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::info::{DropletInfo, DropletSummary};
use crate::api::models::{
    CreateDropletRequest, Droplet, DropletStatus, ImageIdentifier, SshKeyIdentifier,
};
use crate::api::DoApi;
use crate::config::OceanConfig;
use crate::error::{Error, Result};
use crate::projects::{ProjectRef, ProjectRegistry};

/// Resource URN for a droplet, as used in project resource sets.
#[must_use]
pub fn droplet_urn(id: i64) -> String {
    format!("do:droplet:{id}")
}

/// Reference to a droplet: an already-fetched handle, a name, or an ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum DropletRef {
    /// Already-fetched droplet, passed through untouched.
    Handle(Droplet),
    /// Look up by exact name.
    Name(String),
    /// Fetch by ID.
    Id(i64),
}

impl From<Droplet> for DropletRef {
    fn from(droplet: Droplet) -> Self {
        Self::Handle(droplet)
    }
}

impl From<&Droplet> for DropletRef {
    fn from(droplet: &Droplet) -> Self {
        Self::Handle(droplet.clone())
    }
}

impl From<&str> for DropletRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for DropletRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for DropletRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl TryFrom<Value> for DropletRef {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Number(id) => id
                .as_i64()
                .map(Self::Id)
                .ok_or_else(|| Error::UnsupportedReference(format!("not a droplet ID: {id}"))),
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(Self::Handle)
                .map_err(|e| Error::UnsupportedReference(format!("not a droplet object: {e}"))),
            other => Err(Error::UnsupportedReference(format!(
                "cannot reference a droplet by {other}"
            ))),
        }
    }
}

impl std::fmt::Display for DropletRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handle(droplet) => write!(f, "{}", droplet.name),
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Options for creating a droplet.
#[derive(Debug, Clone)]
pub struct CreateDropletOptions {
    /// Droplet name.
    pub name: String,
    /// Region slug.
    pub region: String,
    /// Size (plan) slug.
    pub size: String,
    /// Image to boot from.
    pub image: ImageIdentifier,
    /// SSH keys to install.
    pub ssh_keys: Vec<SshKeyIdentifier>,
    /// Enable automated backups.
    pub backups: bool,
    /// Block until the droplet reaches "active" before returning.
    pub wait_until_up: bool,
}

impl CreateDropletOptions {
    /// Options with the required fields; keys, backups, and waiting are
    /// off by default.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        size: impl Into<String>,
        image: impl Into<ImageIdentifier>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            size: size.into(),
            image: image.into(),
            ssh_keys: Vec::new(),
            backups: false,
            wait_until_up: false,
        }
    }
}

/// Droplet operations on the account.
#[derive(Clone)]
pub struct DropletRegistry {
    /// Remote API handle.
    api: Arc<dyn DoApi>,
    /// Project registry for membership and assignment operations.
    projects: ProjectRegistry,
    /// Seconds between polls in [`wait_until_active`](Self::wait_until_active).
    poll_interval_secs: u64,
    /// Seconds before [`wait_until_active`](Self::wait_until_active) gives up.
    wait_timeout_secs: u64,
}

impl DropletRegistry {
    /// New registry over an API handle.
    #[must_use]
    pub fn new(api: Arc<dyn DoApi>, projects: ProjectRegistry, config: &OceanConfig) -> Self {
        Self {
            api,
            projects,
            poll_interval_secs: config.poll_interval_secs,
            wait_timeout_secs: config.wait_timeout_secs,
        }
    }

    /// Every droplet on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_all(&self) -> Result<Vec<Droplet>> {
        self.api.list_droplets().await
    }

    /// Names of every droplet on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .map(|droplet| droplet.name)
            .collect())
    }

    /// First droplet with exactly this name. Logs and returns `None` when
    /// no droplet matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Droplet>> {
        let found = self
            .list_all()
            .await?
            .into_iter()
            .find(|droplet| droplet.name == name);
        if found.is_none() {
            warn!(droplet = %name, "Droplet not found");
        }
        Ok(found)
    }

    /// Fetch a droplet by ID. A missing or unreadable droplet logs a
    /// warning and comes back as `None`; transport failures propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transport.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Droplet>> {
        match self.api.get_droplet(id).await {
            Ok(droplet) => Ok(Some(droplet)),
            Err(e) if e.is_read_error() => {
                warn!(droplet_id = id, error = %e, "Droplet not readable");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a reference to a droplet. Returns `None`, with a logged
    /// diagnostic, when the reference does not match any droplet.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote request fails in transport.
    pub async fn resolve(&self, droplet: impl Into<DropletRef>) -> Result<Option<Droplet>> {
        match droplet.into() {
            DropletRef::Handle(droplet) => Ok(Some(droplet)),
            DropletRef::Name(name) => self.find_by_name(&name).await,
            DropletRef::Id(id) => self.find_by_id(id).await,
        }
    }

    /// Create a droplet. With `wait_until_up` set, blocks until the
    /// droplet reaches "active" (configured interval and timeout) and
    /// returns the refreshed handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the create request fails, or if the optional
    /// wait times out.
    pub async fn create(&self, options: CreateDropletOptions) -> Result<Droplet> {
        let CreateDropletOptions {
            name,
            region,
            size,
            image,
            ssh_keys,
            backups,
            wait_until_up,
        } = options;

        info!(droplet = %name, region = %region, size = %size, "Creating droplet");
        let request = CreateDropletRequest {
            name,
            region,
            size,
            image,
            ssh_keys,
            backups,
        };
        let droplet = self.api.create_droplet(&request).await?;
        info!(droplet = %droplet.name, droplet_id = droplet.id, "Droplet created");

        if wait_until_up {
            return self.wait_until_active(droplet).await;
        }
        Ok(droplet)
    }

    /// Guarded view over a resolved reference. With `load` set the droplet
    /// is refreshed first; a refresh that fails at the API level nulls the
    /// backing droplet instead of erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote request fails in transport.
    pub async fn info(&self, droplet: impl Into<DropletRef>, load: bool) -> Result<DropletInfo> {
        let resolved = self.resolve(droplet).await?;
        if load {
            DropletInfo::load(Arc::clone(&self.api), resolved).await
        } else {
            Ok(DropletInfo::new(Arc::clone(&self.api), resolved))
        }
    }

    /// Poll until the droplet reaches `status`, refreshing every
    /// `interval_secs`, for at most `timeout_secs` of wall-clock time.
    /// Status comparison is case-insensitive by construction: statuses
    /// parse into [`DropletStatus`] before comparing. The caller is
    /// occupied for the whole wait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the reference does not resolve,
    /// [`Error::StatusWaitTimeout`] if the status is not reached in time,
    /// or any error from the refresh requests.
    pub async fn wait_for_status(
        &self,
        droplet: impl Into<DropletRef>,
        status: DropletStatus,
        interval_secs: u64,
        timeout_secs: u64,
    ) -> Result<Droplet> {
        let reference = droplet.into();
        let Some(mut current) = self.resolve(reference.clone()).await? else {
            error!(droplet = %reference, "Cannot wait on an unresolved droplet");
            return Err(Error::NotFound(format!("droplet '{reference}'")));
        };

        let start = Instant::now();
        let timeout = Duration::from_secs(timeout_secs);
        let interval = Duration::from_secs(interval_secs);
        info!(droplet = %current.name, status = %status, "Waiting for droplet status");

        loop {
            current = self.api.get_droplet(current.id).await?;

            if current.status == status {
                info!(
                    droplet = %current.name,
                    status = %status,
                    ip = ?current.public_ipv4(),
                    "Droplet reached status"
                );
                return Ok(current);
            }

            if start.elapsed() > timeout {
                error!(
                    droplet = %current.name,
                    status = %status,
                    timeout_secs,
                    "Timeout reached waiting for droplet status"
                );
                return Err(Error::StatusWaitTimeout {
                    droplet: current.name,
                    status: status.to_string(),
                    timeout_secs,
                });
            }

            info!(
                droplet = %current.name,
                current_status = %current.status,
                elapsed_secs = start.elapsed().as_secs(),
                "Still waiting"
            );
            tokio::time::sleep(interval).await;
        }
    }

    /// Poll until the droplet is "active", with the configured interval
    /// and timeout.
    ///
    /// # Errors
    ///
    /// Same as [`wait_for_status`](Self::wait_for_status).
    pub async fn wait_until_active(&self, droplet: impl Into<DropletRef>) -> Result<Droplet> {
        self.wait_for_status(
            droplet,
            DropletStatus::Active,
            self.poll_interval_secs,
            self.wait_timeout_secs,
        )
        .await
    }

    /// Destroy a droplet. The droplet is refreshed first so the removal
    /// log reflects its final state; if that read fails the last known
    /// state is logged instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the destroy request fails, or if the refresh
    /// fails in transport.
    pub async fn delete(&self, droplet: &Droplet) -> Result<()> {
        let summary = match self.api.get_droplet(droplet.id).await {
            Ok(fresh) => DropletSummary::from(&fresh),
            Err(e) if e.is_read_error() => {
                warn!(droplet = %droplet.name, error = %e, "Refresh before delete failed, using last known state");
                DropletSummary::from(droplet)
            }
            Err(e) => return Err(e),
        };

        self.api.delete_droplet(droplet.id).await?;

        info!(
            droplet = %summary.name,
            ip = ?summary.ip_address,
            created_at = %summary.created_at,
            "Droplet removed"
        );
        Ok(())
    }

    /// Name of the project the droplet is assigned to, scanning every
    /// project's resource URNs. `None` when the reference does not resolve
    /// or no project contains the droplet.
    ///
    /// # Errors
    ///
    /// Returns an error if a listing request fails.
    pub async fn project_name_of(&self, droplet: impl Into<DropletRef>) -> Result<Option<String>> {
        let Some(droplet) = self.resolve(droplet).await? else {
            return Ok(None);
        };
        let urn = droplet_urn(droplet.id);
        for project in self.projects.list_all().await? {
            let resources = self.api.list_project_resources(&project.id).await?;
            if resources.iter().any(|resource| resource.urn == urn) {
                return Ok(Some(project.name));
            }
        }
        debug!(droplet = %droplet.name, "Droplet is not assigned to any project");
        Ok(None)
    }

    /// Whether the droplet's URN is in the project's resource set. `false`
    /// when either reference does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if a listing request fails.
    pub async fn is_in_project(
        &self,
        droplet: impl Into<DropletRef>,
        project: impl Into<ProjectRef>,
    ) -> Result<bool> {
        let Some(droplet) = self.resolve(droplet).await? else {
            return Ok(false);
        };
        let urn = droplet_urn(droplet.id);
        match self.projects.resources_of(project).await? {
            Some(resources) => Ok(resources.contains(&urn)),
            None => Ok(false),
        }
    }

    /// Assign the droplet to a project. `None` when either reference does
    /// not resolve, or when the droplet is already a member (logged no-op);
    /// `Some(true)` once the assignment is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or the assignment request fails.
    pub async fn move_to_project(
        &self,
        droplet: impl Into<DropletRef>,
        project: impl Into<ProjectRef>,
    ) -> Result<Option<bool>> {
        let Some(droplet) = self.resolve(droplet).await? else {
            return Ok(None);
        };
        let Some(project) = self.projects.resolve(project).await? else {
            return Ok(None);
        };

        let urn = droplet_urn(droplet.id);
        let resources = self.api.list_project_resources(&project.id).await?;
        if resources.iter().any(|resource| resource.urn == urn) {
            info!(
                droplet = %droplet.name,
                project = %project.name,
                "Droplet is already in project"
            );
            return Ok(None);
        }

        info!(droplet = %droplet.name, project = %project.name, "Moving droplet to project");
        self.projects.assign_resources(&project, &[urn]).await
    }
}
