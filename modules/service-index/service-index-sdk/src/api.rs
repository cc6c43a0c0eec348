//! Traits connecting the index to the live services it watches.

use std::sync::Arc;

use crate::error::ServiceIndexError;
use crate::models::PropertyBag;

/// A pluggable implementation that can be indexed.
pub trait ManagedService: Send + Sync {
    /// Stable identity of the implementation (one key per implementation type).
    fn implementation_key(&self) -> &str;

    /// Default properties the implementation advertises.
    ///
    /// Implementations returning `None` are left out of the index.
    fn default_properties(&self) -> Option<PropertyBag>;
}

/// Open view over the services that are currently registered.
pub trait LiveServiceSet: Send + Sync {
    /// Services live at call time. An empty vector means nothing is registered.
    fn snapshot(&self) -> Vec<Arc<dyn ManagedService>>;
}

/// Opens a [`LiveServiceSet`].
pub trait ServiceFeed: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ServiceIndexError::Initialization`] if the live set cannot be opened.
    fn open(&self) -> Result<Box<dyn LiveServiceSet>, ServiceIndexError>;
}
