//! Domain models for the tenant context module.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which per-tenant registry a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    /// Configuration registry as seen by the current user.
    UserConfig,
    /// Configuration registry with system privileges.
    SystemConfig,
    /// Governance registry as seen by the current user.
    UserGovernance,
    /// Governance registry with system privileges.
    SystemGovernance,
    /// Node-local repository, not shared across the cluster.
    LocalRepository,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 5] = [
        RegistryKind::UserConfig,
        RegistryKind::SystemConfig,
        RegistryKind::UserGovernance,
        RegistryKind::SystemGovernance,
        RegistryKind::LocalRepository,
    ];

    /// User kinds are resolved with the caller's username as well as the tenant.
    #[must_use]
    pub fn is_user_scoped(self) -> bool {
        matches!(self, RegistryKind::UserConfig | RegistryKind::UserGovernance)
    }
}

/// Canonical name of a capability, e.g. `"com.example.billing.InvoiceStore"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(String);

impl CapabilityId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CapabilityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CapabilityId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Initialization properties for a naming context.
pub type NamingEnvironment = HashMap<String, String>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn capability_id_serializes_as_plain_string() {
        let id = CapabilityId::from("com.example.mail.Mailer");

        let json = serde_json::to_string(&id).unwrap();
        let back: CapabilityId = serde_json::from_str(&json).unwrap();

        assert_eq!(json, r#""com.example.mail.Mailer""#);
        assert_eq!(back, id);
        assert_eq!(back.as_str(), "com.example.mail.Mailer");
    }

    #[test]
    fn only_user_kinds_are_user_scoped() {
        let user: Vec<_> = RegistryKind::ALL
            .into_iter()
            .filter(|k| k.is_user_scoped())
            .collect();

        assert_eq!(
            user,
            vec![RegistryKind::UserConfig, RegistryKind::UserGovernance]
        );
    }
}
