#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod constants;
pub mod context;
pub mod gate;
pub mod realm;

pub use constants::{INVALID_TENANT_ID, SUPER_TENANT_DOMAIN, SUPER_TENANT_ID, TenantId};
pub use context::{TenantHandle, TenantHandleBuilder};
pub use gate::{
    ApplicationAllowGate, CallerGate, CallerGateRef, GateError, TenantGrant, TrustedCallerGate,
    authorize,
};
pub use realm::{UserRealm, UserRealmRef};
