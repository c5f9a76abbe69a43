//! DigitalOcean droplet, SSH key, and project management toolkit.
//!
//! This crate wraps the DigitalOcean REST API with registries that accept
//! polymorphic references (an already-fetched handle, a name, or an ID),
//! a poll-until-status primitive for droplet lifecycle transitions, and
//! duplicate-safe SSH key registration. Lookups that miss degrade to
//! `None` with a logged diagnostic; duplicate registrations and timeouts
//! fail hard with typed errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use ocean::{CreateDropletOptions, DigitalOcean};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Token is read from ~/.do/access_token
//!     let ocean = DigitalOcean::new()?;
//!
//!     let mut options =
//!         CreateDropletOptions::new("web-1", "ams3", "s-1vcpu-1gb", "ubuntu-22-04-x64");
//!     options.wait_until_up = true;
//!     let droplet = ocean.droplets.create(options).await?;
//!
//!     ocean.droplets.move_to_project(&droplet, "Production").await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod config;
pub mod droplets;
pub mod error;
pub mod manager;
pub mod projects;
pub mod ssh_keys;

pub use api::models::{Droplet, DropletStatus, ImageIdentifier, Project, SshKey, SshKeyIdentifier};
pub use api::{ApiClient, DoApi};
pub use auth::TokenFile;
pub use config::OceanConfig;
pub use droplets::{
    droplet_urn, ActionSummary, CreateDropletOptions, DropletInfo, DropletRef, DropletRegistry,
    DropletSummary,
};
pub use error::{Error, Result};
pub use manager::DigitalOcean;
pub use projects::{ProjectRef, ProjectRegistry, ProjectSummary};
pub use ssh_keys::{SshKeyInfo, SshKeyRef, SshKeyRegistry};
