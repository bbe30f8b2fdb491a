//! # credstore
//!
//! Typed credential storage over an OS secure-storage backend.
//!
//! Records are any serde-serializable type implementing [`Storable`];
//! they are stored as opaque encoded payloads under an account name,
//! partitioned by a (service, access group) [`Scope`] and guarded by an
//! [`Accessibility`] policy. The backend is injectable through the
//! [`ItemBackend`] trait: macOS gets the system keychain, tests and
//! other platforms get the in-memory backend.
//!
//! ```no_run
//! use credstore::{Scope, Storable, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Credential {
//!     email: String,
//!     token: String,
//! }
//!
//! impl Storable for Credential {
//!     fn account(&self) -> &str {
//!         &self.email
//!     }
//! }
//!
//! # fn main() -> credstore::Result<()> {
//! let store = Store::new();
//! store.store(&Credential {
//!     email: "a@x.com".into(),
//!     token: "t0".into(),
//! })?;
//! let cred: Credential = store.retrieve_value("a@x.com", &Scope::default())?;
//! # Ok(())
//! # }
//! ```

pub mod accessibility;
pub mod backend;
pub mod codec;
pub mod error;
pub mod memory;
pub mod query;
pub mod scope;
pub mod storable;
pub mod store;

#[cfg(target_os = "macos")]
pub mod keychain;

pub use accessibility::Accessibility;
pub use backend::{ItemBackend, MatchResult, Status, STATUS_OK};
pub use codec::{Codec, JsonCodec};
pub use error::{Error, ErrorKind, Result};
pub use memory::MemoryBackend;
pub use query::{attr, AttrValue, AttributeQuery, MatchLimit};
pub use scope::{configure_defaults, reset_defaults, Scope};
pub use storable::Storable;
pub use store::Store;

#[cfg(target_os = "macos")]
pub use keychain::SystemKeychain;
