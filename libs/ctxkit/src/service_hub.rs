//! Live registry of named services.
//!
//! Design goals:
//! - Providers register any number of implementations under a canonical service name.
//! - Consumers never hold the registry's lock; they open a [`ServiceTracker`] for a name,
//!   read the services that are live *right now*, and drop the tracker.
//! - Registrations come and go at runtime; a tracker always reflects current state.
//!
//! Implementation details:
//! - Value = `Arc<T>` boxed once more into `Arc<dyn Any + Send + Sync>` so `T` can be a
//!   trait object (`dyn my_api::Store`); [`downcast_service`] undoes it.
//! - Registration order is preserved per name; the first registration is the "first match".
//! - Open trackers are counted so leaks show up in `open_trackers()`.

use parking_lot::{Mutex, RwLock};
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Type-erased registered service.
pub type ServiceObject = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TrackerId(u64);

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tracker-{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceHubError {
    #[error("tracker {tracker} is closed")]
    TrackerClosed { tracker: TrackerId },

    #[error("service source unavailable: {0}")]
    Unavailable(String),
}

/// Recover the typed `Arc<T>` from a service registered with [`ServiceHub::register`].
///
/// Returns `None` when the service was registered under a different type.
#[must_use]
pub fn downcast_service<T>(service: &ServiceObject) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    service.downcast_ref::<Arc<T>>().cloned()
}

/// Source of live services that hands them out through trackers.
///
/// [`ServiceHub`] is the in-process implementation; other sources (remote
/// registries, test doubles) plug in behind the same seam.
pub trait ServiceSource: Send + Sync {
    /// Start watching services registered under `name`.
    ///
    /// # Errors
    /// Returns an error if the source cannot hand out trackers.
    fn open_tracker(&self, name: &str) -> Result<TrackerId, ServiceHubError>;

    /// Services currently registered under the tracker's name.
    ///
    /// # Errors
    /// Returns [`ServiceHubError::TrackerClosed`] for unknown trackers, or a
    /// source-specific error.
    fn tracked_services(&self, tracker: TrackerId) -> Result<Vec<ServiceObject>, ServiceHubError>;

    /// Stop watching. Closing an unknown tracker is a no-op.
    fn close_tracker(&self, tracker: TrackerId);
}

/// Scoped watch over one service name; closes itself on drop.
pub struct ServiceTracker {
    source: Arc<dyn ServiceSource>,
    id: TrackerId,
    name: Arc<str>,
}

impl ServiceTracker {
    /// Open a tracker on `source` for `name`.
    ///
    /// # Errors
    /// Propagates the source's error; nothing is left open in that case.
    pub fn open(source: Arc<dyn ServiceSource>, name: &str) -> Result<Self, ServiceHubError> {
        let id = source.open_tracker(name)?;
        tracing::trace!(tracker = %id, service = name, "tracker opened");
        Ok(Self {
            source,
            id,
            name: name.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> TrackerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the services live at call time.
    ///
    /// # Errors
    /// Propagates the source's error.
    pub fn services(&self) -> Result<Vec<ServiceObject>, ServiceHubError> {
        self.source.tracked_services(self.id)
    }
}

impl Drop for ServiceTracker {
    fn drop(&mut self) {
        self.source.close_tracker(self.id);
        tracing::trace!(tracker = %self.id, service = %self.name, "tracker closed");
    }
}

impl fmt::Debug for ServiceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTracker")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

struct Registration {
    id: RegistrationId,
    service: ServiceObject,
}

/// In-process registry of services keyed by canonical name.
pub struct ServiceHub {
    services: RwLock<HashMap<Arc<str>, Vec<Registration>>>,
    trackers: Mutex<HashMap<TrackerId, Arc<str>>>,
    next_id: AtomicU64,
}

impl ServiceHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            trackers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ServiceHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceHub {
    /// Register `service` under `name`. `T` can be a trait object like `dyn my_api::Store`.
    pub fn register<T>(&self, name: impl Into<Arc<str>>, service: Arc<T>) -> RegistrationId
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let name = name.into();
        let id = RegistrationId(self.next());
        let boxed: ServiceObject = Arc::new(service);
        tracing::debug!(service = %name, registration = id.0, "service registered");
        self.services
            .write()
            .entry(name)
            .or_default()
            .push(Registration { id, service: boxed });
        id
    }

    /// Remove one registration; returns `false` if it was already gone.
    pub fn unregister(&self, id: RegistrationId) -> bool {
        let mut w = self.services.write();
        let mut removed = false;
        w.retain(|name, regs| {
            let before = regs.len();
            regs.retain(|r| r.id != id);
            if regs.len() != before {
                removed = true;
                tracing::debug!(service = %name, registration = id.0, "service unregistered");
            }
            !regs.is_empty()
        });
        removed
    }

    /// Open a tracker on this hub.
    ///
    /// # Errors
    /// Never fails for the in-process hub; the signature mirrors [`ServiceTracker::open`].
    pub fn track(self: &Arc<Self>, name: &str) -> Result<ServiceTracker, ServiceHubError> {
        ServiceTracker::open(Arc::clone(self) as Arc<dyn ServiceSource>, name)
    }

    /// Number of registrations under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.services.read().get(name).map_or(0, Vec::len)
    }

    /// Introspection: trackers that were opened and not yet closed.
    pub fn open_trackers(&self) -> usize {
        self.trackers.lock().len()
    }

    /// Introspection: total registrations across all names.
    pub fn len(&self) -> usize {
        self.services.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    /// Drop every registration (useful in tests). Open trackers stay open.
    pub fn clear(&self) {
        self.services.write().clear();
    }
}

impl ServiceSource for ServiceHub {
    fn open_tracker(&self, name: &str) -> Result<TrackerId, ServiceHubError> {
        let id = TrackerId(self.next());
        self.trackers.lock().insert(id, name.into());
        Ok(id)
    }

    fn tracked_services(&self, tracker: TrackerId) -> Result<Vec<ServiceObject>, ServiceHubError> {
        let name = self
            .trackers
            .lock()
            .get(&tracker)
            .cloned()
            .ok_or(ServiceHubError::TrackerClosed { tracker })?;

        let r = self.services.read();
        Ok(r.get(&name)
            .map(|regs| regs.iter().map(|reg| Arc::clone(&reg.service)).collect())
            .unwrap_or_default())
    }

    fn close_tracker(&self, tracker: TrackerId) {
        self.trackers.lock().remove(&tracker);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_owned()
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_owned()
        }
    }

    fn greetings(tracker: &ServiceTracker) -> Vec<String> {
        tracker
            .services()
            .unwrap()
            .iter()
            .map(|s| downcast_service::<dyn Greeter>(s).unwrap().greet())
            .collect()
    }

    #[test]
    fn register_and_track_dyn_trait() {
        let hub = Arc::new(ServiceHub::new());
        hub.register::<dyn Greeter>("greeter", Arc::new(English));

        let tracker = hub.track("greeter").unwrap();

        assert_eq!(greetings(&tracker), vec!["hello".to_owned()]);
        assert_eq!(tracker.name(), "greeter");
    }

    #[test]
    fn registration_order_is_preserved() {
        let hub = Arc::new(ServiceHub::new());
        hub.register::<dyn Greeter>("greeter", Arc::new(French));
        hub.register::<dyn Greeter>("greeter", Arc::new(English));

        let tracker = hub.track("greeter").unwrap();

        assert_eq!(
            greetings(&tracker),
            vec!["bonjour".to_owned(), "hello".to_owned()]
        );
    }

    #[test]
    fn tracker_sees_registrations_made_after_it_was_opened() {
        let hub = Arc::new(ServiceHub::new());
        let tracker = hub.track("greeter").unwrap();
        assert!(tracker.services().unwrap().is_empty());

        let id = hub.register::<dyn Greeter>("greeter", Arc::new(English));
        assert_eq!(tracker.services().unwrap().len(), 1);

        assert!(hub.unregister(id));
        assert!(tracker.services().unwrap().is_empty());
    }

    #[test]
    fn unregister_unknown_returns_false() {
        let hub = ServiceHub::new();
        let id = hub.register::<dyn Greeter>("greeter", Arc::new(English));

        assert!(hub.unregister(id));
        assert!(!hub.unregister(id));
        assert!(hub.is_empty());
    }

    #[test]
    fn names_are_independent() {
        let hub = Arc::new(ServiceHub::new());
        hub.register::<dyn Greeter>("greeter.en", Arc::new(English));
        hub.register::<dyn Greeter>("greeter.fr", Arc::new(French));

        assert_eq!(hub.count("greeter.en"), 1);
        assert_eq!(hub.count("greeter.fr"), 1);
        assert_eq!(hub.count("greeter"), 0);
        assert_eq!(hub.len(), 2);
    }

    #[test]
    fn dropping_tracker_closes_it() {
        let hub = Arc::new(ServiceHub::new());
        let tracker = hub.track("greeter").unwrap();
        let id = tracker.id();
        assert_eq!(hub.open_trackers(), 1);

        drop(tracker);

        assert_eq!(hub.open_trackers(), 0);
        assert!(matches!(
            hub.tracked_services(id),
            Err(ServiceHubError::TrackerClosed { tracker }) if tracker == id
        ));
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let hub = Arc::new(ServiceHub::new());
        hub.register::<String>("greeter", Arc::new("not a greeter".to_owned()));

        let tracker = hub.track("greeter").unwrap();
        let services = tracker.services().unwrap();

        assert!(downcast_service::<dyn Greeter>(&services[0]).is_none());
        assert_eq!(
            downcast_service::<String>(&services[0]).unwrap().as_str(),
            "not a greeter"
        );
    }

    #[test]
    fn clear_keeps_trackers_open() {
        let hub = Arc::new(ServiceHub::new());
        hub.register::<dyn Greeter>("greeter", Arc::new(English));
        let tracker = hub.track("greeter").unwrap();

        hub.clear();

        assert!(hub.is_empty());
        assert!(tracker.services().unwrap().is_empty());
        assert_eq!(hub.open_trackers(), 1);
    }

    #[tokio::test]
    async fn hub_is_thread_safe_under_concurrent_access() {
        let hub = Arc::new(ServiceHub::new());

        let mut handles = vec![];
        for _ in 0..10 {
            let hub = Arc::clone(&hub);
            handles.push(tokio::spawn(async move {
                let id = hub.register::<dyn Greeter>("greeter", Arc::new(English));
                let tracker = hub.track("greeter").unwrap();
                let seen = tracker.services().unwrap().len();
                hub.unregister(id);
                seen
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap() >= 1);
        }

        assert!(hub.is_empty());
        assert_eq!(hub.open_trackers(), 0);
    }
}
