//! Shared runtime pieces for the tenant context modules.
//!
//! - [`service_hub`] - live registry of named services with scoped trackers
//! - [`config`] - layered application config and typed module sections
//! - [`telemetry`] - `tracing` subscriber setup

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod service_hub;
pub mod telemetry;

pub use config::{
    AppConfig, ConfigError, ConfigProvider, module_config_or_default, module_config_required,
};
pub use service_hub::{
    RegistrationId, ServiceHub, ServiceHubError, ServiceObject, ServiceSource, ServiceTracker,
    TrackerId, downcast_service,
};
pub use telemetry::{LogFormat, LoggingConfig, init_logging};
