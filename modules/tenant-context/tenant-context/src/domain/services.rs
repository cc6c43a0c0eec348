//! Shared state behind every [`TenantContext`].

use std::path::Path;
use std::sync::Arc;

use ctxkit::{AppConfig, ServiceSource, module_config_or_default};
use ctxkit_security::{ApplicationAllowGate, CallerGateRef, TenantHandle, TrustedCallerGate};
use tenant_context_sdk::{
    DiscoveryProvider, NamingContextFactory, QueueManager, RegistryService, TenantContextError,
};

use super::allow_list::CapabilityAllowList;
use super::context::TenantContext;
use super::queue::InMemoryQueueManager;
use crate::MODULE_NAME;
use crate::config::TenantContextConfig;

/// Providers, gate and allow-list shared by all requests.
///
/// Built once at startup and read-only afterwards. Optional providers that
/// are not installed behave like a provider that always fails.
pub struct ContextServices {
    pub(crate) allow_list: CapabilityAllowList,
    pub(crate) gate: CallerGateRef,
    pub(crate) capabilities: Arc<dyn ServiceSource>,
    pub(crate) registries: Option<Arc<dyn RegistryService>>,
    pub(crate) queues: Arc<dyn QueueManager>,
    pub(crate) naming: Option<Arc<dyn NamingContextFactory>>,
    pub(crate) discovery: Option<Arc<dyn DiscoveryProvider>>,
}

impl ContextServices {
    /// Start building services over the capability registry `capabilities`.
    #[must_use]
    pub fn builder(capabilities: Arc<dyn ServiceSource>) -> ContextServicesBuilder {
        ContextServicesBuilder {
            allow_list: CapabilityAllowList::empty(),
            gate: Arc::new(TrustedCallerGate),
            capabilities,
            registries: None,
            queues: None,
            naming: None,
            discovery: None,
        }
    }

    /// Builder pre-loaded from the `tenant_context` config section: allow-list file
    /// (resolved against `config_dir`) and caller gate.
    ///
    /// # Errors
    /// Returns [`TenantContextError::Initialization`] if the section is invalid or the
    /// allow-list file exists but cannot be read.
    pub fn from_config(
        app: &AppConfig,
        capabilities: Arc<dyn ServiceSource>,
    ) -> Result<ContextServicesBuilder, TenantContextError> {
        let cfg: TenantContextConfig =
            module_config_or_default(app, MODULE_NAME).map_err(|e| {
                TenantContextError::Initialization {
                    reason: e.to_string(),
                }
            })?;

        let file = Path::new(&cfg.allow_list_file);
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            app.config_dir().join(file)
        };
        let allow_list = CapabilityAllowList::load(&path)?;

        let gate: CallerGateRef = if cfg.trusted_applications.is_empty() {
            Arc::new(TrustedCallerGate)
        } else {
            Arc::new(ApplicationAllowGate::new(cfg.trusted_applications))
        };

        Ok(Self::builder(capabilities).allow_list(allow_list).gate(gate))
    }

    /// Bind the shared services to one request's handle.
    #[must_use]
    pub fn context<'a>(&'a self, handle: &'a TenantHandle) -> TenantContext<'a> {
        TenantContext::new(self, handle)
    }

    #[must_use]
    pub fn allow_list(&self) -> &CapabilityAllowList {
        &self.allow_list
    }
}

pub struct ContextServicesBuilder {
    allow_list: CapabilityAllowList,
    gate: CallerGateRef,
    capabilities: Arc<dyn ServiceSource>,
    registries: Option<Arc<dyn RegistryService>>,
    queues: Option<Arc<dyn QueueManager>>,
    naming: Option<Arc<dyn NamingContextFactory>>,
    discovery: Option<Arc<dyn DiscoveryProvider>>,
}

impl ContextServicesBuilder {
    #[must_use]
    pub fn allow_list(mut self, allow_list: CapabilityAllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    #[must_use]
    pub fn gate(mut self, gate: CallerGateRef) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn registry_service(mut self, registries: Arc<dyn RegistryService>) -> Self {
        self.registries = Some(registries);
        self
    }

    #[must_use]
    pub fn queue_manager(mut self, queues: Arc<dyn QueueManager>) -> Self {
        self.queues = Some(queues);
        self
    }

    #[must_use]
    pub fn naming(mut self, naming: Arc<dyn NamingContextFactory>) -> Self {
        self.naming = Some(naming);
        self
    }

    #[must_use]
    pub fn discovery(mut self, discovery: Arc<dyn DiscoveryProvider>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Queues default to an [`InMemoryQueueManager`].
    #[must_use]
    pub fn build(self) -> ContextServices {
        tracing::debug!(
            allowed_capabilities = self.allow_list.len(),
            registries = self.registries.is_some(),
            naming = self.naming.is_some(),
            discovery = self.discovery.is_some(),
            "tenant context services built"
        );
        ContextServices {
            allow_list: self.allow_list,
            gate: self.gate,
            capabilities: self.capabilities,
            registries: self.registries,
            queues: self
                .queues
                .unwrap_or_else(|| Arc::new(InMemoryQueueManager::new())),
            naming: self.naming,
            discovery: self.discovery,
        }
    }
}
