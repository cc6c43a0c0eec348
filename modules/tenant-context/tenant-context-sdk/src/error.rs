//! Error types for the tenant context module.

use ctxkit_security::{GateError, TenantId};
use thiserror::Error;

use crate::models::RegistryKind;

/// Errors surfaced by the tenant context facade.
///
/// Registry and discovery failures are not listed: the facade absorbs them
/// and reports an absent or empty result.
#[derive(Debug, Error)]
pub enum TenantContextError {
    /// The caller gate rejected the request, or the capability is not allow-listed.
    #[error("access denied: {reason}")]
    AccessDenied {
        /// What was denied.
        reason: String,
    },

    /// A single-capability lookup found no live instance.
    #[error("no live instance of capability {capability}")]
    NotFound {
        /// The capability that was looked up.
        capability: String,
    },

    /// A live instance was registered under a different type than requested.
    #[error("capability {capability} is registered with a different type")]
    TypeMismatch {
        /// The capability that was looked up.
        capability: String,
    },

    /// The capability registry failed while collecting instances.
    #[error("capability registry unavailable for {capability}: {reason}")]
    CapabilityUnavailable {
        /// The capability that was looked up.
        capability: String,
        /// Error reported by the registry.
        reason: String,
    },

    /// Naming context construction failed.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// Startup configuration could not be loaded.
    #[error("tenant context initialization failed: {reason}")]
    Initialization {
        /// Why startup failed.
        reason: String,
    },
}

impl From<GateError> for TenantContextError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Denied { reason } => TenantContextError::AccessDenied { reason },
        }
    }
}

/// Errors reported by a [`crate::RegistryService`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The tenant has no registry of this kind.
    #[error("no {kind:?} registry for tenant {tenant_id}")]
    NoSuchRegistry {
        /// Requested kind.
        kind: RegistryKind,
        /// Requested tenant.
        tenant_id: TenantId,
    },

    /// The registry backend failed.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by naming context construction and lookups.
#[derive(Debug, Error)]
pub enum NamingError {
    /// Nothing is bound under the name.
    #[error("name not bound: {name}")]
    NameNotFound {
        /// Looked up name.
        name: String,
    },

    /// An environment property was rejected.
    #[error("invalid naming environment property '{key}': {reason}")]
    InvalidEnvironment {
        /// Offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The naming provider failed.
    #[error("naming provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a [`crate::DiscoveryProvider`].
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery backend failed.
    #[error("discovery unavailable: {0}")]
    Unavailable(String),
}
