use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use service_index_sdk::{LiveServiceSet, PropertyBag, ServiceFeed, ServiceIndexError};

/// Read-through index of live implementations and their default properties.
///
/// Every lookup rescans the live set and replaces the cached map, so a
/// deregistered implementation disappears on the next call.
pub struct ServiceIndex {
    live: Box<dyn LiveServiceSet>,
    cache: RwLock<HashMap<String, PropertyBag>>,
}

impl ServiceIndex {
    /// Open the feed and build the index.
    ///
    /// # Errors
    /// Returns [`ServiceIndexError::Initialization`] if the feed cannot be opened.
    pub fn initialize(feed: &dyn ServiceFeed) -> Result<Self, ServiceIndexError> {
        let live = feed.open().inspect_err(|e| {
            tracing::error!(error = %e, "service index initialization failed");
        })?;
        tracing::debug!(
            registered = live.snapshot().len(),
            "service index initialized"
        );
        Ok(Self {
            live,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn refresh(&self) -> HashMap<String, PropertyBag> {
        let mut fresh = HashMap::new();
        for svc in self.live.snapshot() {
            match svc.default_properties() {
                Some(props) => {
                    fresh.insert(svc.implementation_key().to_owned(), props);
                }
                None => {
                    tracing::trace!(
                        implementation = svc.implementation_key(),
                        "implementation has no default properties"
                    );
                }
            }
        }
        let mut w = self.cache.write();
        w.clone_from(&fresh);
        fresh
    }

    /// Keys of implementations live right now that advertise properties.
    #[must_use]
    pub fn implementation_keys(&self) -> BTreeSet<String> {
        self.refresh().into_keys().collect()
    }

    /// Default properties of one implementation, if it is live.
    #[must_use]
    pub fn properties(&self, key: &str) -> Option<PropertyBag> {
        self.refresh().remove(key)
    }

    /// Properties from the last scan, without rescanning.
    #[must_use]
    pub fn cached_properties(&self, key: &str) -> Option<PropertyBag> {
        self.cache.read().get(key).cloned()
    }
}
