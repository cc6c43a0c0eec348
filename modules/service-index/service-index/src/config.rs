//! Configuration for the service index module.

use serde::Deserialize;

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceIndexConfig {
    /// Service name the implementations register under in the service hub.
    pub service_name: String,
}

impl Default for ServiceIndexConfig {
    fn default() -> Self {
        Self {
            service_name: "user-store-manager".to_owned(),
        }
    }
}
