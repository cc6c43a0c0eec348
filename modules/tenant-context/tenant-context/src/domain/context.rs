//! Per-request facade.

use std::sync::Arc;

use ctxkit::{ServiceTracker, downcast_service};
use ctxkit_security::{TenantGrant, TenantHandle, TenantId, UserRealmRef, authorize};
use tenant_context_sdk::{
    CapabilityId, NamingContext, NamingEnvironment, NamingError, QueueRef, RegistryError,
    RegistryKind, RegistryRef, TenantContextError,
};
use url::Url;

use super::services::ContextServices;

/// Tenant-scoped view of [`ContextServices`] for one request.
///
/// Cheap to create; holds only references. Obtain one with
/// [`ContextServices::context`].
pub struct TenantContext<'a> {
    services: &'a ContextServices,
    handle: &'a TenantHandle,
}

impl<'a> TenantContext<'a> {
    pub(crate) fn new(services: &'a ContextServices, handle: &'a TenantHandle) -> Self {
        Self { services, handle }
    }

    #[must_use]
    pub fn handle(&self) -> &TenantHandle {
        self.handle
    }

    /// Run the caller gate once and return the grant for follow-up calls.
    ///
    /// # Errors
    /// [`TenantContextError::AccessDenied`] if the gate rejects the caller.
    pub fn authorize(&self) -> Result<TenantGrant, TenantContextError> {
        Ok(authorize(self.services.gate.as_ref(), self.handle)?)
    }

    /// Tenant id of the request, after the caller gate.
    ///
    /// # Errors
    /// [`TenantContextError::AccessDenied`] if the gate rejects the caller.
    pub fn tenant_id(&self) -> Result<TenantId, TenantContextError> {
        self.authorize().map(|grant| grant.tenant_id())
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.handle.username()
    }

    #[must_use]
    pub fn tenant_domain(&self) -> Option<&str> {
        self.handle.tenant_domain()
    }

    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.handle.application_name()
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.handle.property(name)
    }

    #[must_use]
    pub fn user_realm(&self) -> Option<UserRealmRef> {
        self.handle.user_realm()
    }

    /// Registry of `kind` for the request's tenant, or `None`.
    ///
    /// `None` covers an unbound tenant, no registry service, and any provider
    /// failure; use [`TenantContext::try_registry`] to tell them apart.
    pub async fn registry(&self, kind: RegistryKind) -> Option<RegistryRef> {
        self.try_registry(kind).await.unwrap_or_else(|e| {
            tracing::debug!(
                tenant_id = self.handle.tenant_id(),
                kind = ?kind,
                error = %e,
                "registry unavailable"
            );
            None
        })
    }

    /// Like [`TenantContext::registry`], but surfaces provider errors.
    ///
    /// The tenant id is read without the caller gate: this call hands out a
    /// tenant-scoped store, not the id itself.
    ///
    /// # Errors
    /// The registry service's [`RegistryError`].
    pub async fn try_registry(
        &self,
        kind: RegistryKind,
    ) -> Result<Option<RegistryRef>, RegistryError> {
        let tenant_id = self.handle.tenant_id();
        if !self.handle.has_valid_tenant() {
            return Ok(None);
        }
        let Some(registries) = self.services.registries.as_deref() else {
            return Ok(None);
        };

        let username = self.handle.username();
        let registry = match kind {
            RegistryKind::UserConfig => registries.config_user_registry(username, tenant_id).await,
            RegistryKind::SystemConfig => registries.config_system_registry(tenant_id).await,
            RegistryKind::UserGovernance => {
                registries
                    .governance_user_registry(username, tenant_id)
                    .await
            }
            RegistryKind::SystemGovernance => {
                registries.governance_system_registry(tenant_id).await
            }
            RegistryKind::LocalRepository => registries.local_repository(tenant_id).await,
        }?;
        Ok(Some(registry))
    }

    /// Named queue from the shared queue manager.
    #[must_use]
    pub fn queue(&self, name: &str) -> QueueRef {
        self.services.queues.queue(name)
    }

    /// Fresh naming context, optionally with initialization properties.
    ///
    /// # Errors
    /// [`TenantContextError::Naming`] if no naming provider is installed or it fails.
    pub fn naming_context(
        &self,
        environment: Option<&NamingEnvironment>,
    ) -> Result<Box<dyn NamingContext>, TenantContextError> {
        let factory = self
            .services
            .naming
            .as_deref()
            .ok_or_else(|| NamingError::Unavailable("no naming provider installed".to_owned()))?;
        Ok(factory.create(environment)?)
    }

    /// Endpoints within `scopes` for the request's tenant. Empty on any failure.
    pub async fn discover(&self, scopes: &[Url]) -> Vec<String> {
        let Some(discovery) = self.services.discovery.as_deref() else {
            return Vec::new();
        };
        discovery
            .probe(None, scopes, None, self.handle.tenant_id())
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(
                    tenant_id = self.handle.tenant_id(),
                    scopes = scopes.len(),
                    error = %e,
                    "discovery failed"
                );
                Vec::new()
            })
    }

    /// First live instance of an allow-listed capability.
    ///
    /// # Errors
    /// - `AccessDenied` if `id` is not allow-listed (the registry is not contacted)
    /// - `NotFound` if nothing is registered under `id`
    /// - `TypeMismatch` if instances are registered but none is a `T`
    /// - `CapabilityUnavailable` if the registry fails
    pub fn capability<T>(&self, id: &CapabilityId) -> Result<Arc<T>, TenantContextError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let (found, skipped) = self.collect::<T>(id)?;
        match found.into_iter().next() {
            Some(first) => Ok(first),
            None if skipped > 0 => Err(TenantContextError::TypeMismatch {
                capability: id.to_string(),
            }),
            None => Err(TenantContextError::NotFound {
                capability: id.to_string(),
            }),
        }
    }

    /// All live instances of an allow-listed capability that are a `T`, in
    /// registration order. Instances of other types are skipped.
    ///
    /// # Errors
    /// `AccessDenied` and `CapabilityUnavailable` as for [`TenantContext::capability`].
    pub fn capabilities<T>(&self, id: &CapabilityId) -> Result<Vec<Arc<T>>, TenantContextError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.collect::<T>(id).map(|(found, _)| found)
    }

    /// Matching instances plus the number of registrations of another type.
    fn collect<T>(&self, id: &CapabilityId) -> Result<(Vec<Arc<T>>, usize), TenantContextError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if !self.services.allow_list.permits(id) {
            tracing::warn!(capability = %id, "capability is not allow-listed");
            return Err(TenantContextError::AccessDenied {
                reason: format!("capability {id} cannot be accessed through the tenant context"),
            });
        }

        let unavailable = |e: ctxkit::ServiceHubError| TenantContextError::CapabilityUnavailable {
            capability: id.to_string(),
            reason: e.to_string(),
        };

        // The tracker closes when it goes out of scope, including on the error paths below.
        let tracker = ServiceTracker::open(Arc::clone(&self.services.capabilities), id.as_str())
            .map_err(unavailable)?;
        let objects = tracker.services().map_err(unavailable)?;
        drop(tracker);

        let mut found = Vec::with_capacity(objects.len());
        let mut skipped = 0;
        for obj in &objects {
            if let Some(svc) = downcast_service::<T>(obj) {
                found.push(svc);
            } else {
                skipped += 1;
                tracing::warn!(
                    capability = %id,
                    "skipping registration of a different type"
                );
            }
        }
        Ok((found, skipped))
    }
}
