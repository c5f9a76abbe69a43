//! Guarded view over a possibly-absent SSH key.

use tracing::error;

use crate::api::models::SshKey;

/// Accessor wrapper around an SSH key that may have failed to resolve.
///
/// Every accessor re-checks for absence and logs instead of panicking, so
/// callers can chain lookups without matching on each step.
#[derive(Debug, Clone)]
pub struct SshKeyInfo {
    key: Option<SshKey>,
}

impl SshKeyInfo {
    /// Wrap a resolution result. Usually obtained via
    /// [`SshKeyRegistry::info`](super::SshKeyRegistry::info).
    #[must_use]
    pub fn new(key: Option<SshKey>) -> Self {
        Self { key }
    }

    /// Whether the backing key resolved.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.key.is_some()
    }

    /// Key name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.guard().map(|key| key.name.clone())
    }

    /// Public key content.
    #[must_use]
    pub fn public_key(&self) -> Option<String> {
        self.guard().map(|key| key.public_key.clone())
    }

    /// Key ID.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.guard().map(|key| key.id)
    }

    /// Key fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        self.guard().map(|key| key.fingerprint.clone())
    }

    /// Absence guard shared by every accessor.
    fn guard(&self) -> Option<&SshKey> {
        if self.key.is_none() {
            error!("SSH key was not found");
        }
        self.key.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> SshKey {
        serde_json::from_value(serde_json::json!({
            "id": 512_189,
            "fingerprint": "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa",
            "name": "ci-deploy",
            "public_key": "ssh-rsa AAAAB3NzaC1yc2EAAAADAQAB example"
        }))
        .unwrap()
    }

    #[test]
    fn present_key_exposes_fields() {
        let info = SshKeyInfo::new(Some(sample_key()));
        assert!(info.is_present());
        assert_eq!(info.name().as_deref(), Some("ci-deploy"));
        assert_eq!(info.id(), Some(512_189));
        assert_eq!(
            info.fingerprint().as_deref(),
            Some("3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa")
        );
    }

    #[test]
    fn absent_key_yields_none_everywhere() {
        let info = SshKeyInfo::new(None);
        assert!(!info.is_present());
        assert!(info.name().is_none());
        assert!(info.public_key().is_none());
        assert!(info.id().is_none());
        assert!(info.fingerprint().is_none());
    }
}
