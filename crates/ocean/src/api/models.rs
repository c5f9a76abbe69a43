//! DigitalOcean API request and response models.
//!
//! Only the fields this crate consumes are declared; unknown response
//! fields are ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Droplet types
// ============================================================================

/// Droplet (instance) from API.
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    /// Droplet ID.
    pub id: i64,
    /// Droplet name.
    pub name: String,
    /// Memory in MB.
    pub memory: i64,
    /// vCPU count.
    pub vcpus: i32,
    /// Disk size in GB.
    pub disk: i64,
    /// Current status.
    pub status: DropletStatus,
    /// Region info.
    pub region: Region,
    /// Size (plan) slug.
    pub size_slug: String,
    /// Networks.
    pub networks: Networks,
    /// Image info.
    pub image: Image,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Droplet {
    /// Public IPv4 address, if one is attached.
    #[must_use]
    pub fn public_ipv4(&self) -> Option<String> {
        self.networks
            .v4
            .iter()
            .find(|ip| ip.address_type == "public")
            .map(|ip| ip.ip_address.clone())
    }
}

/// Droplet lifecycle status.
///
/// Parsing is case-insensitive; values the API grows later map to
/// [`DropletStatus::Unknown`] instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DropletStatus {
    /// Being provisioned.
    New,
    /// Up and running.
    Active,
    /// Powered off.
    Off,
    /// Archived.
    Archive,
    /// Unrecognized status.
    Unknown,
}

impl From<&str> for DropletStatus {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("new") {
            Self::New
        } else if s.eq_ignore_ascii_case("active") {
            Self::Active
        } else if s.eq_ignore_ascii_case("off") {
            Self::Off
        } else if s.eq_ignore_ascii_case("archive") {
            Self::Archive
        } else {
            Self::Unknown
        }
    }
}

impl From<String> for DropletStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl std::fmt::Display for DropletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Active => write!(f, "active"),
            Self::Off => write!(f, "off"),
            Self::Archive => write!(f, "archive"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Networks {
    /// IPv4 addresses.
    #[serde(default)]
    pub v4: Vec<NetworkAddress>,
    /// IPv6 addresses.
    #[serde(default)]
    pub v6: Vec<NetworkAddress>,
}

/// Network address.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkAddress {
    /// IP address.
    pub ip_address: String,
    /// Netmask.
    pub netmask: Option<Netmask>,
    /// Gateway.
    pub gateway: Option<String>,
    /// Type: "public" or "private".
    #[serde(rename = "type")]
    pub address_type: String,
}

/// Netmask as returned by the API. IPv4 entries carry a dotted-quad
/// string, IPv6 entries carry a numeric prefix length.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Netmask {
    /// Dotted-quad form, e.g. "255.255.240.0".
    Mask(String),
    /// Prefix length, e.g. 64.
    PrefixLength(u8),
}

/// Region information.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    /// Region slug.
    pub slug: String,
    /// Region name.
    pub name: String,
}

/// Image information.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    /// Image ID.
    pub id: i64,
    /// Image name.
    pub name: String,
    /// Image slug.
    pub slug: Option<String>,
    /// Distribution.
    pub distribution: String,
}

/// Droplet list response.
#[derive(Debug, Deserialize)]
pub struct DropletListResponse {
    /// List of droplets.
    pub droplets: Vec<Droplet>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Single droplet response.
#[derive(Debug, Deserialize)]
pub struct DropletResponse {
    /// Droplet details.
    pub droplet: Droplet,
}

// ============================================================================
// Create Droplet types
// ============================================================================

/// Request body for creating a droplet.
#[derive(Debug, Serialize)]
pub struct CreateDropletRequest {
    /// Droplet name.
    pub name: String,
    /// Region slug.
    pub region: String,
    /// Size (plan) slug.
    pub size: String,
    /// Image slug or ID.
    pub image: ImageIdentifier,
    /// SSH keys to install, by ID or fingerprint.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<SshKeyIdentifier>,
    /// Enable automated backups.
    pub backups: bool,
}

/// Image identifier (can be slug or ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageIdentifier {
    /// Image slug.
    Slug(String),
    /// Image ID.
    Id(i64),
}

impl From<&str> for ImageIdentifier {
    fn from(slug: &str) -> Self {
        Self::Slug(slug.to_string())
    }
}

impl From<String> for ImageIdentifier {
    fn from(slug: String) -> Self {
        Self::Slug(slug)
    }
}

impl From<i64> for ImageIdentifier {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

// ============================================================================
// Snapshot and action types
// ============================================================================

/// Droplet snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Snapshot ID.
    pub id: i64,
    /// Snapshot name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Snapshot list response.
#[derive(Debug, Deserialize)]
pub struct SnapshotListResponse {
    /// Snapshots of the droplet.
    pub snapshots: Vec<Snapshot>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Droplet action.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    /// Action ID.
    pub id: i64,
    /// Action status: "in-progress", "completed", "errored".
    pub status: String,
    /// Action type, e.g. "create" or "power_off".
    #[serde(rename = "type")]
    pub action_type: String,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Action list response.
#[derive(Debug, Deserialize)]
pub struct ActionListResponse {
    /// Actions performed on the droplet.
    pub actions: Vec<Action>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

// ============================================================================
// SSH Key types
// ============================================================================

/// SSH key.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKey {
    /// Key ID.
    pub id: i64,
    /// Key fingerprint.
    pub fingerprint: String,
    /// Key name.
    pub name: String,
    /// Public key content.
    pub public_key: String,
}

/// SSH key reference in a create-droplet request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SshKeyIdentifier {
    /// Key ID.
    Id(i64),
    /// Key fingerprint.
    Fingerprint(String),
}

impl From<i64> for SshKeyIdentifier {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for SshKeyIdentifier {
    fn from(fingerprint: &str) -> Self {
        Self::Fingerprint(fingerprint.to_string())
    }
}

/// Create SSH key request.
#[derive(Debug, Serialize)]
pub struct CreateSshKeyRequest {
    /// Key name.
    pub name: String,
    /// Public key content.
    pub public_key: String,
}

/// SSH key list response.
#[derive(Debug, Deserialize)]
pub struct SshKeyListResponse {
    /// Keys registered on the account.
    pub ssh_keys: Vec<SshKey>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Single SSH key response.
#[derive(Debug, Deserialize)]
pub struct SshKeyResponse {
    /// Key details.
    pub ssh_key: SshKey,
}

// ============================================================================
// Project types
// ============================================================================

/// Project from API.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project ID (a UUID).
    pub id: String,
    /// UUID of the account owning the project.
    pub owner_uuid: String,
    /// Project name.
    pub name: String,
    /// Purpose of the project.
    pub purpose: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Environment: "Development", "Staging", or "Production".
    pub environment: Option<String>,
    /// Whether this is the account's default project.
    #[serde(default)]
    pub is_default: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Project list response.
#[derive(Debug, Deserialize)]
pub struct ProjectListResponse {
    /// Projects on the account.
    pub projects: Vec<Project>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Single project response.
#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    /// Project details.
    pub project: Project,
}

/// Resource assigned to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResource {
    /// Resource URN, e.g. `do:droplet:123456`.
    pub urn: String,
    /// When the resource was assigned.
    pub assigned_at: Option<DateTime<Utc>>,
    /// Assignment status.
    pub status: Option<String>,
}

/// Project resource list response.
#[derive(Debug, Deserialize)]
pub struct ProjectResourceListResponse {
    /// Resources in the project.
    pub resources: Vec<ProjectResource>,
    /// Links for pagination.
    pub links: Option<Links>,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Request body for assigning resources to a project.
#[derive(Debug, Serialize)]
pub struct AssignResourcesRequest {
    /// Resource URNs to assign.
    pub resources: Vec<String>,
}

// ============================================================================
// Pagination
// ============================================================================

/// Pagination links.
#[derive(Debug, Clone, Deserialize)]
pub struct Links {
    /// Pages.
    pub pages: Option<Pages>,
}

impl Links {
    /// URL of the next page, when the listing is truncated.
    #[must_use]
    pub fn next_url(&self) -> Option<String> {
        self.pages.as_ref().and_then(|pages| pages.next.clone())
    }
}

/// Page links.
#[derive(Debug, Clone, Deserialize)]
pub struct Pages {
    /// First page.
    pub first: Option<String>,
    /// Previous page.
    pub prev: Option<String>,
    /// Next page.
    pub next: Option<String>,
    /// Last page.
    pub last: Option<String>,
}

/// Response metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    /// Total count.
    pub total: i32,
}
