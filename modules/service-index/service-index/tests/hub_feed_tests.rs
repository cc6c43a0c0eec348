#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use ctxkit::{AppConfig, ServiceHub, module_config_or_default};
use service_index::{HubServiceFeed, MODULE_NAME, ServiceIndex, ServiceIndexConfig};
use service_index_sdk::{ManagedService, PropertyBag};
use tracing_test::traced_test;

struct JdbcUserStore;

impl ManagedService for JdbcUserStore {
    fn implementation_key(&self) -> &str {
        "org.example.user.store.JdbcUserStoreManager"
    }

    fn default_properties(&self) -> Option<PropertyBag> {
        Some(
            [("ReadOnly", "false"), ("MaxUserNameListLength", "100")]
                .into_iter()
                .collect(),
        )
    }
}

struct LdapUserStore;

impl ManagedService for LdapUserStore {
    fn implementation_key(&self) -> &str {
        "org.example.user.store.ReadOnlyLdapUserStoreManager"
    }

    fn default_properties(&self) -> Option<PropertyBag> {
        None
    }
}

fn index_over(hub: &Arc<ServiceHub>) -> ServiceIndex {
    let feed = HubServiceFeed::from_config(hub.clone(), &ServiceIndexConfig::default());
    ServiceIndex::initialize(&feed).unwrap()
}

#[test]
fn indexes_services_registered_in_hub() {
    let hub = Arc::new(ServiceHub::new());
    hub.register::<dyn ManagedService>("user-store-manager", Arc::new(JdbcUserStore));
    hub.register::<dyn ManagedService>("user-store-manager", Arc::new(LdapUserStore));
    let index = index_over(&hub);

    let keys = index.implementation_keys();

    assert_eq!(keys.len(), 1);
    assert!(keys.contains("org.example.user.store.JdbcUserStoreManager"));
    let props = index
        .properties("org.example.user.store.JdbcUserStoreManager")
        .unwrap();
    assert_eq!(props.get("MaxUserNameListLength"), Some("100"));
}

#[test]
fn deregistered_service_disappears() {
    let hub = Arc::new(ServiceHub::new());
    let id = hub.register::<dyn ManagedService>("user-store-manager", Arc::new(JdbcUserStore));
    let index = index_over(&hub);
    assert_eq!(index.implementation_keys().len(), 1);

    hub.unregister(id);

    assert!(index.implementation_keys().is_empty());
}

#[test]
fn index_holds_tracker_until_dropped() {
    let hub = Arc::new(ServiceHub::new());
    let index = index_over(&hub);
    assert_eq!(hub.open_trackers(), 1);

    drop(index);

    assert_eq!(hub.open_trackers(), 0);
}

#[test]
#[traced_test]
fn foreign_registrations_are_skipped() {
    let hub = Arc::new(ServiceHub::new());
    hub.register::<String>("user-store-manager", Arc::new("stray".to_owned()));
    hub.register::<dyn ManagedService>("user-store-manager", Arc::new(JdbcUserStore));
    let index = index_over(&hub);

    assert_eq!(index.implementation_keys().len(), 1);
    assert!(logs_contain("skipping registration that is not a ManagedService"));
}

#[test]
fn service_name_comes_from_module_config() {
    let mut app = AppConfig::default();
    app.modules.insert(
        MODULE_NAME.to_owned(),
        serde_json::json!({ "config": { "service_name": "tenant-store" } }),
    );
    let cfg: ServiceIndexConfig = module_config_or_default(&app, MODULE_NAME).unwrap();

    let hub = Arc::new(ServiceHub::new());
    hub.register::<dyn ManagedService>("tenant-store", Arc::new(JdbcUserStore));
    hub.register::<dyn ManagedService>("user-store-manager", Arc::new(JdbcUserStore));
    let index = ServiceIndex::initialize(&HubServiceFeed::from_config(hub.clone(), &cfg)).unwrap();

    assert_eq!(cfg.service_name, "tenant-store");
    assert_eq!(index.implementation_keys().len(), 1);
}
