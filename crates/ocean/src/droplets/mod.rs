//! Droplet operations: lookup by handle, name, or ID, create/wait/delete
//! lifecycle, guarded droplet views, and project membership by URN.

mod info;
mod registry;

pub use info::{ActionSummary, DropletInfo, DropletSummary};
pub use registry::{droplet_urn, CreateDropletOptions, DropletRef, DropletRegistry};
