//! Configuration for the tenant context module.

use serde::Deserialize;

/// Default allow-list file name, resolved against the application config directory.
pub const DEFAULT_ALLOW_LIST_FILE: &str = "capability-services.properties";

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenantContextConfig {
    /// Properties file whose values are the capability names callers may look up.
    /// Relative paths are resolved against `config_dir`. A missing file disables
    /// all capability lookups.
    pub allow_list_file: String,

    /// Applications trusted to read the tenant id. Empty trusts every caller.
    pub trusted_applications: Vec<String>,
}

impl Default for TenantContextConfig {
    fn default() -> Self {
        Self {
            allow_list_file: DEFAULT_ALLOW_LIST_FILE.to_owned(),
            trusted_applications: Vec::new(),
        }
    }
}
