//! `tracing` subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level: "trace", "debug", "info", "warn", "error" or "off".
    pub level: String,
    pub format: LogFormat,
    /// Per-target overrides, e.g. `{ "tenant_context": "debug" }`.
    pub targets: std::collections::BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Plain,
            targets: std::collections::BTreeMap::new(),
        }
    }
}

/// Build the filter directive string; `RUST_LOG` is not consulted here.
#[must_use]
pub fn filter_directives(cfg: &LoggingConfig) -> String {
    let mut directives = vec![cfg.level.to_ascii_lowercase()];
    directives.extend(
        cfg.targets
            .iter()
            .map(|(target, level)| format!("{target}={}", level.to_ascii_lowercase())),
    );
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over the config.
///
/// # Errors
/// Fails if the directives are malformed or a global subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.is_empty() => EnvFilter::try_new(from_env)?,
        _ => EnvFilter::try_new(filter_directives(cfg))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match cfg.format {
        LogFormat::Plain => registry.with(fmt::layer().with_target(true)).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?,
    }

    tracing::debug!(level = %cfg.level, format = ?cfg.format, "logging initialized");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn directives_include_target_overrides() {
        let mut cfg = LoggingConfig {
            level: "WARN".to_owned(),
            ..LoggingConfig::default()
        };
        cfg.targets
            .insert("tenant_context".to_owned(), "Debug".to_owned());
        cfg.targets.insert("ctxkit".to_owned(), "trace".to_owned());

        assert_eq!(
            filter_directives(&cfg),
            "warn,ctxkit=trace,tenant_context=debug"
        );
    }

    #[test]
    fn logging_config_deserializes_with_defaults() {
        let cfg: LoggingConfig = serde_json::from_str(r#"{ "format": "json" }"#).unwrap();
        assert_eq!(cfg.level, "info");
        assert_eq!(cfg.format, LogFormat::Json);
        assert!(cfg.targets.is_empty());
    }

    #[test]
    fn init_logging_installs_once() {
        temp_env::with_var_unset("RUST_LOG", || {
            let cfg = LoggingConfig::default();
            assert!(init_logging(&cfg).is_ok());
            assert!(init_logging(&cfg).is_err());
        });
    }
}
