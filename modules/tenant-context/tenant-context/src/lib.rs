//! Tenant Context Module
//!
//! Per-request facade over tenant-scoped resources. A [`ContextServices`]
//! value is built once at startup (allow-list, caller gate, providers) and
//! shared; each request binds it to its own [`TenantHandle`]:
//!
//! ```ignore
//! let ctx = services.context(&handle);
//! let registry = ctx.registry(RegistryKind::SystemConfig).await;
//! let store = ctx.capability::<dyn InvoiceStore>(&"com.example.InvoiceStore".into())?;
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! config_dir: "/etc/tenant-context"
//! modules:
//!   tenant_context:
//!     config:
//!       allow_list_file: "capability-services.properties"
//!       trusted_applications: ["billing"]
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::TenantContextConfig;
pub use ctxkit_security::TenantHandle;
pub use domain::{
    CapabilityAllowList, ContextServices, ContextServicesBuilder, InMemoryQueue,
    InMemoryQueueManager, TenantContext,
};

/// Name of this module's config section.
pub const MODULE_NAME: &str = "tenant_context";
