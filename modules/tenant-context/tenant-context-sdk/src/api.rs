//! Provider traits the tenant context facade delegates to.
//!
//! Each trait stands for a subsystem owned elsewhere (registry kernel,
//! queue manager, naming service, discovery). The facade only calls them;
//! implementations are injected when the facade's services are built.

use std::sync::Arc;

use async_trait::async_trait;
use ctxkit::ServiceObject;
use ctxkit_security::TenantId;
use url::Url;

use crate::error::{DiscoveryError, NamingError, RegistryError};
use crate::models::{NamingEnvironment, RegistryKind};

/// Type alias for a shared registry instance
pub type RegistryRef = Arc<dyn Registry>;

/// Type alias for a shared queue
pub type QueueRef = Arc<dyn Queue>;

/// A per-tenant hierarchical resource store.
#[async_trait]
pub trait Registry: Send + Sync {
    fn kind(&self) -> RegistryKind;

    fn tenant_id(&self) -> TenantId;

    /// Content stored at `path`, if any.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the store cannot be read
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, RegistryError>;

    /// Store `content` at `path`, replacing what was there.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the store cannot be written
    async fn put(&self, path: &str, content: Vec<u8>) -> Result<(), RegistryError>;
}

/// Hands out registries per tenant (and per user for user-scoped kinds).
///
/// # Errors
///
/// Every method returns `NoSuchRegistry` when the tenant has no registry of
/// that kind and `Unavailable` when the backend fails.
#[async_trait]
pub trait RegistryService: Send + Sync {
    async fn config_user_registry(
        &self,
        username: Option<&str>,
        tenant_id: TenantId,
    ) -> Result<RegistryRef, RegistryError>;

    async fn config_system_registry(&self, tenant_id: TenantId)
    -> Result<RegistryRef, RegistryError>;

    async fn governance_user_registry(
        &self,
        username: Option<&str>,
        tenant_id: TenantId,
    ) -> Result<RegistryRef, RegistryError>;

    async fn governance_system_registry(
        &self,
        tenant_id: TenantId,
    ) -> Result<RegistryRef, RegistryError>;

    async fn local_repository(&self, tenant_id: TenantId) -> Result<RegistryRef, RegistryError>;
}

/// Named FIFO of JSON messages.
pub trait Queue: Send + Sync {
    fn name(&self) -> &str;

    fn push(&self, item: serde_json::Value);

    fn pop(&self) -> Option<serde_json::Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide owner of named queues.
pub trait QueueManager: Send + Sync {
    /// Queue registered under `name`, created on first use.
    fn queue(&self, name: &str) -> QueueRef;
}

/// A naming context built from an environment.
pub trait NamingContext: Send + Sync {
    /// Environment the context was created with.
    fn environment(&self) -> &NamingEnvironment;

    /// # Errors
    ///
    /// - `NameNotFound` if nothing is bound under `name`
    fn lookup(&self, name: &str) -> Result<ServiceObject, NamingError>;

    /// # Errors
    ///
    /// - `Unavailable` if the context cannot be written
    fn bind(&self, name: &str, object: ServiceObject) -> Result<(), NamingError>;
}

/// Builds fresh naming contexts.
pub trait NamingContextFactory: Send + Sync {
    /// `None` means the provider's default environment.
    ///
    /// # Errors
    ///
    /// - `InvalidEnvironment` if a property is rejected
    /// - `Unavailable` if the provider fails
    fn create(
        &self,
        environment: Option<&NamingEnvironment>,
    ) -> Result<Box<dyn NamingContext>, NamingError>;
}

/// Probes for service endpoints within scopes.
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// Endpoints matching `service_types` within `scopes` for `tenant_id`.
    ///
    /// `None` for `service_types` or `match_by` means "any" / provider default.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the probe fails
    async fn probe(
        &self,
        service_types: Option<&[String]>,
        scopes: &[Url],
        match_by: Option<&str>,
        tenant_id: TenantId,
    ) -> Result<Vec<String>, DiscoveryError>;
}
