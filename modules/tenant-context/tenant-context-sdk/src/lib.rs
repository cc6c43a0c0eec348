//! Tenant Context SDK
//!
//! This crate provides the public API for the `tenant-context` module:
//!
//! - [`RegistryService`], [`Registry`] - per-tenant configuration and governance stores
//! - [`QueueManager`], [`Queue`] - named in-process queues
//! - [`NamingContextFactory`], [`NamingContext`] - naming lookups
//! - [`DiscoveryProvider`] - endpoint discovery by scope
//! - [`RegistryKind`], [`CapabilityId`] - models
//! - [`TenantContextError`] and the provider error types
//!
//! User realms and tenant handles come from `ctxkit-security` and are re-exported here.

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::{
    DiscoveryProvider, NamingContext, NamingContextFactory, Queue, QueueManager, QueueRef,
    Registry, RegistryRef, RegistryService,
};
pub use ctxkit_security::{TenantHandle, TenantId, UserRealm, UserRealmRef};
pub use error::{DiscoveryError, NamingError, RegistryError, TenantContextError};
pub use models::{CapabilityId, NamingEnvironment, RegistryKind};
