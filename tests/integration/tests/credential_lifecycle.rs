//! End-to-end credential lifecycle against the memory backend.

use credstore::{Error, ErrorKind, Scope};
use credstore_integration_tests::{memory_store, TestCredential, TEST_SERVICE};

fn scope() -> Scope {
    Scope::new(TEST_SERVICE)
}

#[test]
fn test_store_retrieve_update_delete() {
    let (store, _) = memory_store();
    let first = TestCredential::new("a@x.com", "p1", 1234);
    let second = TestCredential::new("a@x.com", "p2", 5678);

    store.store(&first).unwrap();
    let got: TestCredential = store.retrieve_value("a@x.com", &scope()).unwrap();
    assert_eq!(got, first);

    store.store(&second).unwrap();
    let got: TestCredential = store.retrieve_value("a@x.com", &scope()).unwrap();
    assert_eq!(got, second);

    store.delete(&second).unwrap();
    let missing: credstore::Result<TestCredential> = store.retrieve_value("a@x.com", &scope());
    assert!(matches!(
        missing,
        Err(Error::Backend(ErrorKind::ItemNotFound))
    ));
}

#[test]
fn test_multiple_accounts_are_independent() {
    let (store, _) = memory_store();
    let one = TestCredential::new("test@example.com", "foobar", 1234);
    let two = TestCredential::new("newuser@example.com", "password", 5678);

    store.store(&one).unwrap();
    store.store(&two).unwrap();

    let got_one: TestCredential = store.retrieve_value(&one.email, &scope()).unwrap();
    let got_two: TestCredential = store.retrieve_value(&two.email, &scope()).unwrap();
    assert_eq!(got_one, one);
    assert_eq!(got_two, two);

    store.delete(&one).unwrap();
    let got_two: TestCredential = store.retrieve_value(&two.email, &scope()).unwrap();
    assert_eq!(got_two, two);
}

#[test]
fn test_enumeration_and_clear_all() {
    let (store, backend) = memory_store();
    assert_eq!(
        store.retrieve_accounts(&scope()).unwrap(),
        Vec::<String>::new()
    );

    let accounts = ["a@x.com", "b@x.com", "c@x.com"];
    for (i, email) in accounts.iter().enumerate() {
        store
            .store(&TestCredential::new(email, "pw", i as u32))
            .unwrap();
    }

    let mut listed = store.retrieve_accounts(&scope()).unwrap();
    listed.sort();
    assert_eq!(listed, accounts);

    store.clear_all(&scope()).unwrap();
    assert_eq!(
        store.retrieve_accounts(&scope()).unwrap(),
        Vec::<String>::new()
    );
    assert!(backend.is_empty());
}
