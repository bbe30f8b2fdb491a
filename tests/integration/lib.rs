//! Shared fixtures for the integration test binaries.

use credstore::{MemoryBackend, Storable, Store};
use serde::{Deserialize, Serialize};

/// Service namespace used by tests that pin their scope explicitly.
pub const TEST_SERVICE: &str = "com.credstore.tests";

/// Minimal credential record in the shape applications typically store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCredential {
    pub email: String,
    pub password: String,
    pub pin: u32,
}

impl TestCredential {
    pub fn new(email: &str, password: &str, pin: u32) -> Self {
        Self {
            email: email.to_owned(),
            password: password.to_owned(),
            pin,
        }
    }
}

impl Storable for TestCredential {
    fn account(&self) -> &str {
        &self.email
    }

    fn service(&self) -> String {
        TEST_SERVICE.to_owned()
    }
}

/// A store over a fresh memory backend, plus a handle to the backend.
pub fn memory_store() -> (Store, MemoryBackend) {
    let backend = MemoryBackend::new();
    (Store::with_backend(Box::new(backend.clone())), backend)
}
