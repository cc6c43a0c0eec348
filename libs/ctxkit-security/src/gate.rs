use std::collections::HashSet;
use std::sync::Arc;

use crate::TenantHandle;
use crate::constants::TenantId;

/// Type alias for a reference-counted caller gate
pub type CallerGateRef = Arc<dyn CallerGate>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("caller denied: {reason}")]
    Denied { reason: String },
}

/// Caller Gate - verifies the identity of whoever is asking for tenant-scoped data
/// before any privileged value leaves the context.
pub trait CallerGate: Send + Sync {
    /// # Errors
    /// Returns [`GateError::Denied`] when the caller must not see tenant data.
    fn check(&self, handle: &TenantHandle) -> Result<(), GateError>;
}

/// Gate that trusts every caller.
pub struct TrustedCallerGate;

impl Default for TrustedCallerGate {
    fn default() -> Self {
        TrustedCallerGate
    }
}

impl CallerGate for TrustedCallerGate {
    fn check(&self, _handle: &TenantHandle) -> Result<(), GateError> {
        Ok(())
    }
}

/// Gate that only trusts platform code and a fixed set of applications.
///
/// Requests without an application name are platform requests and always pass.
#[derive(Debug, Clone, Default)]
pub struct ApplicationAllowGate {
    trusted: HashSet<String>,
}

impl ApplicationAllowGate {
    #[must_use]
    pub fn new<I, S>(trusted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trusted: trusted.into_iter().map(Into::into).collect(),
        }
    }
}

impl CallerGate for ApplicationAllowGate {
    fn check(&self, handle: &TenantHandle) -> Result<(), GateError> {
        match handle.application_name() {
            None => Ok(()),
            Some(app) if self.trusted.contains(app) => Ok(()),
            Some(app) => Err(GateError::Denied {
                reason: format!("application '{app}' is not trusted"),
            }),
        }
    }
}

/// Proof that a handle passed the caller gate.
///
/// Only [`authorize`] creates grants, so holding one means the check ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantGrant {
    tenant_id: TenantId,
}

impl TenantGrant {
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Run the gate once for `handle` and hand back a grant for the privileged section.
///
/// # Errors
/// Propagates the gate's [`GateError`].
pub fn authorize(gate: &dyn CallerGate, handle: &TenantHandle) -> Result<TenantGrant, GateError> {
    gate.check(handle).inspect_err(|e| {
        tracing::warn!(tenant_id = handle.tenant_id(), error = %e, "caller gate rejected request");
    })?;
    Ok(TenantGrant {
        tenant_id: handle.tenant_id(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn trusted_gate_grants_handle_tenant() {
        let handle = TenantHandle::builder().tenant_id(12).build();

        let grant = authorize(&TrustedCallerGate, &handle).unwrap();

        assert_eq!(grant.tenant_id(), 12);
    }

    #[test]
    fn application_gate_passes_platform_requests() {
        let gate = ApplicationAllowGate::new(["billing"]);
        let handle = TenantHandle::builder().tenant_id(3).build();

        assert!(authorize(&gate, &handle).is_ok());
    }

    #[test]
    fn application_gate_passes_trusted_application() {
        let gate = ApplicationAllowGate::new(["billing"]);
        let handle = TenantHandle::builder()
            .tenant_id(3)
            .application_name("billing")
            .build();

        assert_eq!(authorize(&gate, &handle).unwrap().tenant_id(), 3);
    }

    #[test]
    fn application_gate_denies_unknown_application() {
        let gate = ApplicationAllowGate::new(["billing"]);
        let handle = TenantHandle::builder()
            .tenant_id(3)
            .application_name("guestbook")
            .build();

        let err = authorize(&gate, &handle).unwrap_err();

        assert_eq!(
            err,
            GateError::Denied {
                reason: "application 'guestbook' is not trusted".to_owned()
            }
        );
    }
}
