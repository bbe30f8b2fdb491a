//! The backend capability consumed by the store.
//!
//! A backend is the narrow interface to a secure-storage subsystem: four
//! operations over attribute maps, each reporting a raw status code that
//! the store normalizes through [`ErrorKind::from_status`]. The backend
//! is expected to provide confidentiality, access control, and a
//! uniqueness constraint on (service, access group, account) itself.
//!
//! [`ErrorKind::from_status`]: crate::ErrorKind::from_status

use crate::query::AttributeQuery;

/// Raw backend status code.
pub type Status = i32;

/// The status code backends report on success.
pub const STATUS_OK: Status = 0;

/// Payload returned by a successful match operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The stored payload bytes (one-match, data-returning queries).
    Bytes(Vec<u8>),
    /// One attribute map per matched item (all-match queries).
    Attributes(Vec<AttributeQuery>),
}

/// Secure-storage operations the store depends on.
///
/// Implementations must serialize their own physical access; the store
/// adds no locking of its own. See [`MemoryBackend`] for an in-process
/// implementation and, on macOS, `SystemKeychain` for the OS keychain.
///
/// [`MemoryBackend`]: crate::MemoryBackend
pub trait ItemBackend: Send + Sync {
    /// Insert a new item described entirely by `attributes`.
    fn add(&self, attributes: &AttributeQuery) -> Status;

    /// Apply `update` to the item(s) matching `query`.
    fn update(&self, query: &AttributeQuery, update: &AttributeQuery) -> Status;

    /// Remove the item(s) matching `query`.
    fn delete(&self, query: &AttributeQuery) -> Status;

    /// Look up items matching `query`, returning the requested payload
    /// alongside the status.
    fn copy_matching(&self, query: &AttributeQuery) -> (Status, Option<MatchResult>);
}

/// The backend used by [`Store::new`](crate::Store::new) on this platform.
#[cfg(target_os = "macos")]
pub(crate) fn platform_default() -> Box<dyn ItemBackend> {
    Box::new(crate::keychain::SystemKeychain::new())
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn platform_default() -> Box<dyn ItemBackend> {
    tracing::warn!(
        "no OS secure store is integrated on this platform; \
         falling back to an in-process memory backend"
    );
    Box::new(crate::memory::MemoryBackend::new())
}
