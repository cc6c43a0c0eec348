/// Numeric tenant identifier.
pub type TenantId = i32;

/// Sentinel carried by handles that are not bound to any tenant.
/// Tenant-scoped resources are never resolved for it.
pub const INVALID_TENANT_ID: TenantId = -1;

/// Tenant that owns the platform itself.
pub const SUPER_TENANT_ID: TenantId = -1234;
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";
