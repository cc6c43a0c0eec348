//! Service Index Module
//!
//! Watches a live collection of pluggable service implementations and keeps
//! a read-through index of the default properties each one advertises.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   service_index:
//!     config:
//!       service_name: "user-store-manager"
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::ServiceIndexConfig;
pub use domain::{HubServiceFeed, ServiceIndex};

/// Name of this module's config section.
pub const MODULE_NAME: &str = "service_index";
