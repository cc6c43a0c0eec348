use std::sync::Arc;

use crate::TenantId;

/// Type alias for a shared user realm
pub type UserRealmRef = Arc<dyn UserRealm>;

/// User realm bound to a tenant: the user store and authorization view
/// a request runs against.
///
/// Realms are attached to a [`crate::TenantHandle`] by whoever builds the
/// handle; this crate only carries them.
pub trait UserRealm: Send + Sync {
    /// Tenant the realm belongs to.
    fn tenant_id(&self) -> TenantId;

    /// Implementation key of the user store backing this realm.
    fn user_store_key(&self) -> &str;

    /// Whether `username` may perform `action` on `resource`.
    fn is_authorized(&self, username: &str, resource: &str, action: &str) -> bool;
}
