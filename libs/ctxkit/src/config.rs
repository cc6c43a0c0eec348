//! Application configuration and typed module sections.
//!
//! Configuration is layered: built-in defaults, then a YAML file, then
//! environment variables prefixed with `CTX__` (`CTX__LOGGING__LEVEL=debug`
//! maps to `logging.level`).
//!
//! Each module owns a section under `modules.<name>.config`. Sections are read
//! through [`ConfigProvider`] so modules can be tested with in-memory maps:
//!
//! - [`module_config_or_default`] falls back to `T::default()` when the section is missing.
//! - [`module_config_required`] refuses to run without it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::telemetry::LoggingConfig;

/// Environment prefix for overrides.
pub const ENV_PREFIX: &str = "CTX__";

/// Configuration error for typed config operations
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("module '{module}' not found")]
    ModuleNotFound { module: String },
    #[error("module '{module}' config must be an object")]
    InvalidModuleStructure { module: String },
    #[error("missing 'config' section in module '{module}'")]
    MissingConfigSection { module: String },
    #[error("invalid config for module '{module}': {source}")]
    InvalidConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

fn config_section<'a>(
    provider: &'a dyn ConfigProvider,
    module_name: &str,
) -> Result<Option<&'a serde_json::Value>, ConfigError> {
    let Some(module_raw) = provider.get_module_config(module_name) else {
        return Ok(None);
    };
    let obj = module_raw
        .as_object()
        .ok_or_else(|| ConfigError::InvalidModuleStructure {
            module: module_name.to_owned(),
        })?;
    Ok(obj.get("config"))
}

fn parse_section<T: DeserializeOwned>(
    module_name: &str,
    section: &serde_json::Value,
) -> Result<T, ConfigError> {
    serde_json::from_value(section.clone()).map_err(|e| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source: e,
    })
}

/// Lenient loader: a missing module or a missing `config` field yields `T::default()`.
///
/// # Errors
/// Returns `ConfigError::InvalidModuleStructure` if the module entry is not an object,
/// or `ConfigError::InvalidConfig` if the section exists but cannot be deserialized.
pub fn module_config_or_default<T: DeserializeOwned + Default>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    match config_section(provider, module_name)? {
        Some(section) => parse_section(module_name, section),
        None => Ok(T::default()),
    }
}

/// Strict loader: the module and its `config` field must both be present.
///
/// # Errors
/// Returns `ConfigError` if the module is not found, has invalid structure, or config is invalid.
pub fn module_config_required<T: DeserializeOwned>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    if provider.get_module_config(module_name).is_none() {
        return Err(ConfigError::ModuleNotFound {
            module: module_name.to_owned(),
        });
    }
    let section =
        config_section(provider, module_name)?.ok_or_else(|| ConfigError::MissingConfigSection {
            module: module_name.to_owned(),
        })?;
    parse_section(module_name, section)
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding auxiliary config files (allow-lists and the like).
    pub config_dir: Option<PathBuf>,
    pub logging: LoggingConfig,
    /// Raw module sections: `modules.<name> = { config: {...} }`.
    pub modules: HashMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or values have the wrong shape.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Yaml},
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file(config_path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment.extract().with_context(|| {
            format!(
                "failed to load config from '{}'",
                config_path.as_ref().display()
            )
        })?;

        tracing::debug!(
            path = %config_path.as_ref().display(),
            modules = config.modules.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from file, or defaults (plus env overrides) when no file is given.
    ///
    /// # Errors
    /// Same as [`AppConfig::load_layered`].
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> anyhow::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Serialized},
        };

        if let Some(path) = config_path {
            return Self::load_layered(path);
        }
        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load default config")
    }

    /// Directory for auxiliary config files; `.` when unset.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        self.config_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

impl ConfigProvider for AppConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[derive(Debug, PartialEq, Deserialize, Default)]
    #[serde(default, deny_unknown_fields)]
    struct TestConfig {
        service_name: String,
        refresh: bool,
    }

    struct MockConfigProvider {
        modules: HashMap<String, serde_json::Value>,
    }

    impl MockConfigProvider {
        fn new() -> Self {
            let mut modules = HashMap::new();
            modules.insert(
                "with_config".to_owned(),
                json!({ "config": { "service_name": "user-store-manager", "refresh": true } }),
            );
            modules.insert("no_config".to_owned(), json!({ "other": 1 }));
            modules.insert("not_object".to_owned(), json!("nope"));
            modules.insert(
                "bad_config".to_owned(),
                json!({ "config": { "unexpected": 1 } }),
            );
            Self { modules }
        }
    }

    impl ConfigProvider for MockConfigProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.modules.get(module_name)
        }
    }

    #[test]
    fn test_lenient_success() {
        let provider = MockConfigProvider::new();
        let cfg: TestConfig = module_config_or_default(&provider, "with_config").unwrap();
        assert_eq!(
            cfg,
            TestConfig {
                service_name: "user-store-manager".to_owned(),
                refresh: true,
            }
        );
    }

    #[test]
    fn test_lenient_defaults_when_missing() {
        let provider = MockConfigProvider::new();
        let missing: TestConfig = module_config_or_default(&provider, "absent").unwrap();
        let no_section: TestConfig = module_config_or_default(&provider, "no_config").unwrap();
        assert_eq!(missing, TestConfig::default());
        assert_eq!(no_section, TestConfig::default());
    }

    #[test]
    fn test_lenient_rejects_invalid_section() {
        let provider = MockConfigProvider::new();
        let err = module_config_or_default::<TestConfig>(&provider, "bad_config").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { module, .. } if module == "bad_config"));
    }

    #[test]
    fn test_lenient_rejects_non_object_module() {
        let provider = MockConfigProvider::new();
        let err = module_config_or_default::<TestConfig>(&provider, "not_object").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidModuleStructure { .. }));
    }

    #[test]
    fn test_strict_errors() {
        let provider = MockConfigProvider::new();
        assert!(matches!(
            module_config_required::<TestConfig>(&provider, "absent"),
            Err(ConfigError::ModuleNotFound { .. })
        ));
        assert!(matches!(
            module_config_required::<TestConfig>(&provider, "no_config"),
            Err(ConfigError::MissingConfigSection { .. })
        ));
        assert!(module_config_required::<TestConfig>(&provider, "with_config").is_ok());
    }

    #[test]
    fn test_load_layered_yaml_and_env() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "config_dir: /etc/tenant-context\nlogging:\n  level: info\nmodules:\n  service_index:\n    config:\n      service_name: user-store-manager\n"
        )
        .unwrap();

        temp_env::with_var("CTX__LOGGING__LEVEL", Some("debug"), || {
            let cfg = AppConfig::load_layered(file.path()).unwrap();
            assert_eq!(cfg.config_dir(), Path::new("/etc/tenant-context"));
            assert_eq!(cfg.logging.level, "debug");
            assert!(cfg.get_module_config("service_index").is_some());
        });
    }

    #[test]
    fn test_load_or_default_with_file_reads_it() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "config_dir: /srv/ctx\n").unwrap();

        temp_env::with_var_unset("CTX__CONFIG_DIR", || {
            let cfg = AppConfig::load_or_default(Some(file.path())).unwrap();
            assert_eq!(cfg.config_dir(), Path::new("/srv/ctx"));
        });
    }

    #[test]
    fn test_load_or_default_without_file() {
        temp_env::with_var_unset("CTX__LOGGING__LEVEL", || {
            let cfg = AppConfig::load_or_default(None::<&Path>).unwrap();
            assert_eq!(cfg.config_dir(), Path::new("."));
            assert_eq!(cfg.logging.level, LoggingConfig::default().level);
            assert!(cfg.modules.is_empty());
        });
    }
}
