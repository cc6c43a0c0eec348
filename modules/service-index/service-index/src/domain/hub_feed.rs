//! Feed backed by a [`ServiceSource`] such as the in-process `ServiceHub`.

use std::sync::Arc;

use ctxkit::{ServiceSource, ServiceTracker, downcast_service};
use service_index_sdk::{LiveServiceSet, ManagedService, ServiceFeed, ServiceIndexError};

use crate::config::ServiceIndexConfig;

/// Opens a long-lived tracker on `service_name`.
///
/// Services must be registered as `Arc<dyn ManagedService>`; anything else
/// under the same name is skipped.
pub struct HubServiceFeed {
    source: Arc<dyn ServiceSource>,
    service_name: String,
}

impl HubServiceFeed {
    #[must_use]
    pub fn new(source: Arc<dyn ServiceSource>, service_name: impl Into<String>) -> Self {
        Self {
            source,
            service_name: service_name.into(),
        }
    }

    #[must_use]
    pub fn from_config(source: Arc<dyn ServiceSource>, cfg: &ServiceIndexConfig) -> Self {
        Self::new(source, cfg.service_name.clone())
    }
}

impl ServiceFeed for HubServiceFeed {
    fn open(&self) -> Result<Box<dyn LiveServiceSet>, ServiceIndexError> {
        let tracker = ServiceTracker::open(Arc::clone(&self.source), &self.service_name)
            .map_err(|e| ServiceIndexError::initialization(e.to_string()))?;
        Ok(Box::new(TrackedServiceSet { tracker }))
    }
}

/// Keeps the tracker open for as long as the index lives.
struct TrackedServiceSet {
    tracker: ServiceTracker,
}

impl LiveServiceSet for TrackedServiceSet {
    fn snapshot(&self) -> Vec<Arc<dyn ManagedService>> {
        let services = self.tracker.services().unwrap_or_else(|e| {
            tracing::warn!(service = self.tracker.name(), error = %e, "live service scan failed");
            Vec::new()
        });

        services
            .iter()
            .filter_map(|obj| {
                let svc = downcast_service::<dyn ManagedService>(obj);
                if svc.is_none() {
                    tracing::warn!(
                        service = self.tracker.name(),
                        "skipping registration that is not a ManagedService"
                    );
                }
                svc
            })
            .collect()
    }
}
