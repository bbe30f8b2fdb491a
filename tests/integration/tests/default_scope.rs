//! Process-default scope configuration.
//!
//! The defaults are process-global, so everything runs in one test
//! function to stay independent of test ordering.

use credstore::{configure_defaults, reset_defaults, Error, ErrorKind, Scope, Storable};
use credstore_integration_tests::memory_store;
use serde::{Deserialize, Serialize};

/// Record that leaves service and access group to the process defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DefaultScoped {
    name: String,
    token: String,
}

impl Storable for DefaultScoped {
    fn account(&self) -> &str {
        &self.name
    }
}

#[test]
fn test_configure_and_reset_defaults_govern_operations() {
    let (store, _) = memory_store();
    let record = DefaultScoped {
        name: "cfg-account".to_owned(),
        token: "t0".to_owned(),
    };

    configure_defaults("svc-x", Some("grp-y"));
    assert_eq!(Scope::default().service, "svc-x");
    assert_eq!(Scope::default().access_group.as_deref(), Some("grp-y"));

    // The record picks the configured defaults up through its provided
    // trait methods.
    store.store(&record).unwrap();
    let explicit = Scope::new("svc-x").with_access_group("grp-y");
    assert_eq!(
        store.retrieve_accounts(&explicit).unwrap(),
        vec!["cfg-account".to_owned()]
    );
    let got: DefaultScoped = store
        .retrieve_value("cfg-account", &Scope::default())
        .unwrap();
    assert_eq!(got, record);

    // After a reset the default scope points elsewhere and no longer
    // sees the record.
    reset_defaults();
    assert_ne!(Scope::default().service, "svc-x");
    let missing: credstore::Result<DefaultScoped> =
        store.retrieve_value("cfg-account", &Scope::default());
    assert!(matches!(
        missing,
        Err(Error::Backend(ErrorKind::ItemNotFound))
    ));

    // The record itself is still reachable through its explicit scope.
    let got: DefaultScoped = store.retrieve_value("cfg-account", &explicit).unwrap();
    assert_eq!(got, record);
}
