//! SSH key operations: lookup by handle, name, or ID, duplicate-safe
//! registration, and guarded key views.

mod info;
mod registry;

pub use info::SshKeyInfo;
pub use registry::{SshKeyRef, SshKeyRegistry};
