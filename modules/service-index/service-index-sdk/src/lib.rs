//! Service Index SDK
//!
//! This crate provides the public API for the `service-index` module:
//!
//! - [`ManagedService`] - trait a pluggable implementation exposes to be indexed
//! - [`LiveServiceSet`], [`ServiceFeed`] - the live collection the index scans
//! - [`PropertyBag`] - default properties advertised by an implementation
//! - [`ServiceIndexError`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! let index = ServiceIndex::initialize(&feed)?;
//!
//! for key in index.implementation_keys() {
//!     let props = index.properties(&key);
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::{LiveServiceSet, ManagedService, ServiceFeed};
pub use error::ServiceIndexError;
pub use models::PropertyBag;
