//! Guarded view over a possibly-absent droplet.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::models::{Action, Droplet, DropletStatus, Networks};
use crate::api::DoApi;
use crate::error::Result;

/// Accessor wrapper around a droplet that may have failed to resolve.
///
/// Every accessor re-checks for absence and logs instead of panicking.
/// Remote accessors additionally soften read failures to `None`, so a
/// diagnostic call chain never takes the caller down.
#[derive(Clone)]
pub struct DropletInfo {
    /// Remote API handle for snapshot/action listings.
    api: Arc<dyn DoApi>,
    /// Backing droplet, absent when resolution or refresh failed.
    droplet: Option<Droplet>,
}

impl DropletInfo {
    /// Wrap a resolution result without refreshing it.
    pub(crate) fn new(api: Arc<dyn DoApi>, droplet: Option<Droplet>) -> Self {
        Self { api, droplet }
    }

    /// Wrap a resolution result, refreshing the droplet first. A refresh
    /// that fails at the API level nulls the backing droplet (logged)
    /// instead of erroring.
    pub(crate) async fn load(api: Arc<dyn DoApi>, droplet: Option<Droplet>) -> Result<Self> {
        let droplet = match droplet {
            Some(stale) => match api.get_droplet(stale.id).await {
                Ok(fresh) => Some(fresh),
                Err(e) if e.is_read_error() => {
                    warn!(droplet = %stale.name, error = %e, "Droplet refresh failed");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        Ok(Self { api, droplet })
    }

    /// Whether the backing droplet resolved.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.droplet.is_some()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> Option<DropletStatus> {
        self.guard().map(|droplet| droplet.status)
    }

    /// Droplet ID.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.guard().map(|droplet| droplet.id)
    }

    /// Droplet name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.guard().map(|droplet| droplet.name.clone())
    }

    /// Public IPv4 address.
    #[must_use]
    pub fn ip_address(&self) -> Option<String> {
        self.guard().and_then(Droplet::public_ipv4)
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.guard().map(|droplet| droplet.created_at)
    }

    /// Network configuration.
    #[must_use]
    pub fn networks(&self) -> Option<Networks> {
        self.guard().map(|droplet| droplet.networks.clone())
    }

    /// Display summary of the droplet.
    #[must_use]
    pub fn basic_info(&self) -> Option<DropletSummary> {
        self.guard().map(DropletSummary::from)
    }

    /// Names of the droplet's snapshots. Read failures log and yield `None`.
    pub async fn snapshots(&self) -> Option<Vec<String>> {
        let droplet = self.guard()?;
        match self.api.list_droplet_snapshots(droplet.id).await {
            Ok(snapshots) => Some(snapshots.into_iter().map(|snapshot| snapshot.name).collect()),
            Err(e) => {
                warn!(droplet = %droplet.name, error = %e, "Could not list snapshots");
                None
            }
        }
    }

    /// Summaries of the actions performed on the droplet. Read failures
    /// log and yield `None`.
    pub async fn actions(&self) -> Option<Vec<ActionSummary>> {
        let droplet = self.guard()?;
        match self.api.list_droplet_actions(droplet.id).await {
            Ok(actions) => Some(actions.iter().map(ActionSummary::from).collect()),
            Err(e) => {
                warn!(droplet = %droplet.name, error = %e, "Could not list actions");
                None
            }
        }
    }

    /// Absence guard shared by every accessor.
    fn guard(&self) -> Option<&Droplet> {
        if self.droplet.is_none() {
            error!("Droplet was not found");
        }
        self.droplet.as_ref()
    }
}

/// Summary of a droplet, keyed for display.
#[derive(Debug, Clone, Serialize)]
pub struct DropletSummary {
    /// Droplet ID.
    #[serde(rename = "ID")]
    pub id: i64,
    /// Droplet name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Memory in MB.
    #[serde(rename = "Memory")]
    pub memory: i64,
    /// vCPU count.
    #[serde(rename = "VCPUs")]
    pub vcpus: i32,
    /// Disk size in GB.
    #[serde(rename = "Disk")]
    pub disk: i64,
    /// Region name.
    #[serde(rename = "Region")]
    pub region: String,
    /// Image slug.
    #[serde(rename = "Image")]
    pub image: Option<String>,
    /// Size (plan) slug.
    #[serde(rename = "Size")]
    pub size: String,
    /// Public IPv4 address.
    #[serde(rename = "IP Address")]
    pub ip_address: Option<String>,
    /// Current status.
    #[serde(rename = "Status")]
    pub status: DropletStatus,
    /// Creation time.
    #[serde(rename = "Created At")]
    pub created_at: DateTime<Utc>,
}

impl From<&Droplet> for DropletSummary {
    fn from(droplet: &Droplet) -> Self {
        Self {
            id: droplet.id,
            name: droplet.name.clone(),
            memory: droplet.memory,
            vcpus: droplet.vcpus,
            disk: droplet.disk,
            region: droplet.region.name.clone(),
            image: droplet.image.slug.clone(),
            size: droplet.size_slug.clone(),
            ip_address: droplet.public_ipv4(),
            status: droplet.status,
            created_at: droplet.created_at,
        }
    }
}

/// Summary of a droplet action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionSummary {
    /// Action ID.
    pub id: i64,
    /// Action type.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Action status.
    pub status: String,
}

impl From<&Action> for ActionSummary {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            action_type: action.action_type.clone(),
            status: action.status.clone(),
        }
    }
}
