//! Error types for the service index module.

use thiserror::Error;

/// Errors that can occur when using the service index.
///
/// Lookups never fail: a key that is not live is simply absent.
#[derive(Debug, Error)]
pub enum ServiceIndexError {
    /// The live service set could not be opened.
    #[error("service index initialization failed: {reason}")]
    Initialization {
        /// Why the feed refused to open.
        reason: String,
    },
}

impl ServiceIndexError {
    pub fn initialization(reason: impl Into<String>) -> Self {
        Self::Initialization {
            reason: reason.into(),
        }
    }
}
