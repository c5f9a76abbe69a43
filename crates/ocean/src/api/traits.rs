//! The remote API contract the registries are written against.

use async_trait::async_trait;

use super::models::{
    Action, CreateDropletRequest, CreateSshKeyRequest, Droplet, Project, ProjectResource,
    Snapshot, SshKey,
};
use crate::error::Result;

/// Operations the DigitalOcean API provides.
///
/// [`ApiClient`](super::ApiClient) is the HTTP implementation. Anything that
/// holds registries takes this as `Arc<dyn DoApi>`, so tests can substitute
/// scripted implementations without a network.
#[async_trait]
pub trait DoApi: Send + Sync {
    /// List every droplet on the account.
    async fn list_droplets(&self) -> Result<Vec<Droplet>>;

    /// Get a droplet by ID.
    async fn get_droplet(&self, id: i64) -> Result<Droplet>;

    /// Create a new droplet.
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet>;

    /// Destroy a droplet.
    async fn delete_droplet(&self, id: i64) -> Result<()>;

    /// List snapshots taken of a droplet.
    async fn list_droplet_snapshots(&self, id: i64) -> Result<Vec<Snapshot>>;

    /// List actions performed on a droplet.
    async fn list_droplet_actions(&self, id: i64) -> Result<Vec<Action>>;

    /// List every SSH key on the account.
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>>;

    /// Get an SSH key by ID.
    async fn get_ssh_key(&self, id: i64) -> Result<SshKey>;

    /// Register a new SSH key.
    async fn create_ssh_key(&self, request: &CreateSshKeyRequest) -> Result<SshKey>;

    /// Find the key whose material matches `public_key` exactly.
    async fn find_ssh_key_by_public_key(&self, public_key: &str) -> Result<Option<SshKey>>;

    /// List every project on the account.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Get a project by ID.
    async fn get_project(&self, id: &str) -> Result<Project>;

    /// List the resources assigned to a project.
    async fn list_project_resources(&self, id: &str) -> Result<Vec<ProjectResource>>;

    /// Assign resources (by URN) to a project.
    async fn assign_project_resources(&self, id: &str, urns: &[String]) -> Result<()>;
}
