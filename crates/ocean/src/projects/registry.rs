//! Project lookup and resource assignment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::models::Project;
use crate::api::DoApi;
use crate::error::{Error, Result};

/// Reference to a project: an already-fetched handle, a name, or an ID.
///
/// Bare strings are treated as names; project IDs (UUIDs) must be passed
/// explicitly as [`ProjectRef::Id`].
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ProjectRef {
    /// Already-fetched project, passed through untouched.
    Handle(Project),
    /// Look up by exact name.
    Name(String),
    /// Fetch by ID.
    Id(String),
}

impl From<Project> for ProjectRef {
    fn from(project: Project) -> Self {
        Self::Handle(project)
    }
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self::Handle(project.clone())
    }
}

impl From<&str> for ProjectRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl TryFrom<Value> for ProjectRef {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(Self::Handle)
                .map_err(|e| Error::UnsupportedReference(format!("not a project object: {e}"))),
            other => Err(Error::UnsupportedReference(format!(
                "cannot reference a project by {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handle(project) => write!(f, "{}", project.name),
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Summary of a project, keyed for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    /// Project ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Project name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Purpose.
    #[serde(rename = "Purpose")]
    pub purpose: String,
    /// Environment.
    #[serde(rename = "Environment")]
    pub environment: Option<String>,
    /// Description.
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(rename = "Created At")]
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            purpose: project.purpose.clone(),
            environment: project.environment.clone(),
            description: project.description.clone(),
            created_at: project.created_at,
        }
    }
}

/// Project operations on the account.
#[derive(Clone)]
pub struct ProjectRegistry {
    /// Remote API handle.
    api: Arc<dyn DoApi>,
}

impl ProjectRegistry {
    /// New registry over an API handle.
    #[must_use]
    pub fn new(api: Arc<dyn DoApi>) -> Self {
        Self { api }
    }

    /// Every project on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn list_all(&self) -> Result<Vec<Project>> {
        self.api.list_projects().await
    }

    /// First project with exactly this name. Logs and returns `None` when
    /// no project matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Project>> {
        let found = self
            .list_all()
            .await?
            .into_iter()
            .find(|project| project.name == name);
        if found.is_none() {
            warn!(project = %name, "Project not found");
        }
        Ok(found)
    }

    /// Fetch a project by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or the request fails;
    /// unlike name lookup, ID fetch does not soften misses.
    pub async fn find_by_id(&self, id: &str) -> Result<Project> {
        self.api.get_project(id).await
    }

    /// Resolve a reference to a project. Returns `None`, with a logged
    /// diagnostic, when the reference does not match any project.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote request fails in transport.
    pub async fn resolve(&self, project: impl Into<ProjectRef>) -> Result<Option<Project>> {
        match project.into() {
            ProjectRef::Handle(project) => Ok(Some(project)),
            ProjectRef::Name(name) => self.find_by_name(&name).await,
            ProjectRef::Id(id) => match self.find_by_id(&id).await {
                Ok(project) => Ok(Some(project)),
                Err(e) if e.is_read_error() => {
                    warn!(project = %id, error = %e, "Project not readable");
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Resource URNs assigned to a project. `None` when the reference does
    /// not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource listing fails.
    pub async fn resources_of(
        &self,
        project: impl Into<ProjectRef>,
    ) -> Result<Option<Vec<String>>> {
        let Some(project) = self.resolve(project).await? else {
            return Ok(None);
        };
        let resources = self.api.list_project_resources(&project.id).await?;
        Ok(Some(
            resources.into_iter().map(|resource| resource.urn).collect(),
        ))
    }

    /// Assign resources (by URN) to a project. `None` when the reference
    /// does not resolve, `Some(true)` once the assignment is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment request fails.
    pub async fn assign_resources(
        &self,
        project: impl Into<ProjectRef>,
        urns: &[String],
    ) -> Result<Option<bool>> {
        let Some(project) = self.resolve(project).await? else {
            return Ok(None);
        };
        self.api
            .assign_project_resources(&project.id, urns)
            .await?;
        info!(project = %project.name, count = urns.len(), "Resources assigned to project");
        Ok(Some(true))
    }

    /// Display summary of a project. `None` when the reference does not
    /// resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup request fails.
    pub async fn summary(&self, project: impl Into<ProjectRef>) -> Result<Option<ProjectSummary>> {
        Ok(self
            .resolve(project)
            .await?
            .as_ref()
            .map(ProjectSummary::from))
    }
}
