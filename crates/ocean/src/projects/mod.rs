//! Project operations: lookup by handle, name, or ID, and resource
//! assignment by URN.

mod registry;

pub use registry::{ProjectRef, ProjectRegistry, ProjectSummary};
