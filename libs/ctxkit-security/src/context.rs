use std::collections::HashMap;
use std::fmt;

use crate::constants::{INVALID_TENANT_ID, TenantId};
use crate::realm::UserRealmRef;

/// `TenantHandle` carries the tenant-related information of a single request or session.
///
/// Handles are built by the caller (request middleware, a job runner, a test)
/// and passed explicitly to whatever needs them. Nothing in this workspace
/// mutates a handle after it is built.
#[derive(Clone)]
pub struct TenantHandle {
    tenant_id: TenantId,
    username: Option<String>,
    tenant_domain: Option<String>,
    application_name: Option<String>,
    properties: HashMap<String, serde_json::Value>,
    user_realm: Option<UserRealmRef>,
}

impl TenantHandle {
    /// Create a new `TenantHandle` builder
    #[must_use]
    pub fn builder() -> TenantHandleBuilder {
        TenantHandleBuilder::default()
    }

    /// Create a handle that is not bound to any tenant
    #[must_use]
    pub fn unbound() -> Self {
        TenantHandleBuilder::default().build()
    }

    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns true unless the handle carries the invalid-tenant sentinel.
    #[must_use]
    pub fn has_valid_tenant(&self) -> bool {
        self.tenant_id != INVALID_TENANT_ID
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn tenant_domain(&self) -> Option<&str> {
        self.tenant_domain.as_deref()
    }

    /// Name of the application the request runs inside, if any.
    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Arbitrary named property attached to the handle.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn user_realm(&self) -> Option<UserRealmRef> {
        self.user_realm.clone()
    }
}

impl fmt::Debug for TenantHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantHandle")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .field("tenant_domain", &self.tenant_domain)
            .field("application_name", &self.application_name)
            .field("properties", &self.properties)
            .field("user_realm", &self.user_realm.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct TenantHandleBuilder {
    tenant_id: Option<TenantId>,
    username: Option<String>,
    tenant_domain: Option<String>,
    application_name: Option<String>,
    properties: HashMap<String, serde_json::Value>,
    user_realm: Option<UserRealmRef>,
}

impl TenantHandleBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_owned());
        self
    }

    #[must_use]
    pub fn tenant_domain(mut self, tenant_domain: &str) -> Self {
        self.tenant_domain = Some(tenant_domain.to_owned());
        self
    }

    #[must_use]
    pub fn application_name(mut self, application_name: &str) -> Self {
        self.application_name = Some(application_name.to_owned());
        self
    }

    #[must_use]
    pub fn property(mut self, name: &str, value: serde_json::Value) -> Self {
        self.properties.insert(name.to_owned(), value);
        self
    }

    #[must_use]
    pub fn user_realm(mut self, realm: UserRealmRef) -> Self {
        self.user_realm = Some(realm);
        self
    }

    /// Missing tenant id defaults to [`INVALID_TENANT_ID`].
    #[must_use]
    pub fn build(self) -> TenantHandle {
        TenantHandle {
            tenant_id: self.tenant_id.unwrap_or(INVALID_TENANT_ID),
            username: self.username,
            tenant_domain: self.tenant_domain,
            application_name: self.application_name,
            properties: self.properties,
            user_realm: self.user_realm,
        }
    }
}
