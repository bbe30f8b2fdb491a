//! In-process backend for tests and platforms without an OS keychain.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use zeroize::Zeroizing;

use crate::accessibility::Accessibility;
use crate::backend::{ItemBackend, MatchResult, Status, STATUS_OK};
use crate::error::ErrorKind;
use crate::query::{attr, AttrValue, AttributeQuery, MatchLimit};

/// (service, access group, account): the backend uniqueness key.
type Key = (String, Option<String>, String);

struct Entry {
    /// Encoded payload; wiped when the entry is overwritten or dropped.
    payload: Zeroizing<Vec<u8>>,
    accessible: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

/// Forced per-operation statuses for failure-injection tests.
#[derive(Default)]
struct Forced {
    add: Option<Status>,
    update: Option<Status>,
    delete: Option<Status>,
    copy: Option<Status>,
}

#[derive(Default)]
struct Inner {
    items: Mutex<BTreeMap<Key, Entry>>,
    forced: Mutex<Forced>,
}

/// Thread-safe in-memory [`ItemBackend`].
///
/// Behaves like a real backend (uniqueness constraint on add,
/// accessibility-matched updates, scope enumeration with timestamps)
/// and additionally lets tests force any operation to fail with a chosen
/// [`ErrorKind`]. Clones share the same underlying store, so a test can
/// keep a handle after moving a clone into a
/// [`Store`](crate::Store).
///
/// Entries live only as long as the process; nothing is persisted.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `add` to report `kind` (or behave normally again on `None`).
    pub fn force_add_error(&self, kind: Option<ErrorKind>) {
        self.inner.forced.lock().add = kind.map(|k| k.code());
    }

    /// Force `update` to report `kind`.
    pub fn force_update_error(&self, kind: Option<ErrorKind>) {
        self.inner.forced.lock().update = kind.map(|k| k.code());
    }

    /// Force `delete` to report `kind`.
    pub fn force_delete_error(&self, kind: Option<ErrorKind>) {
        self.inner.forced.lock().delete = kind.map(|k| k.code());
    }

    /// Force `copy_matching` to report `kind`.
    pub fn force_copy_error(&self, kind: Option<ErrorKind>) {
        self.inner.forced.lock().copy = kind.map(|k| k.code());
    }

    /// Number of stored items across all scopes.
    pub fn len(&self) -> usize {
        self.inner.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a query to a stored key. A query without an access group
    /// matches an item in any group, mirroring how the OS store treats
    /// the attribute as an additional constraint rather than a wildcard
    /// mismatch.
    fn find_key(
        items: &BTreeMap<Key, Entry>,
        service: &str,
        group: Option<&str>,
        account: &str,
    ) -> Option<Key> {
        if let Some(group) = group {
            let key = (service.to_owned(), Some(group.to_owned()), account.to_owned());
            return items.contains_key(&key).then_some(key);
        }
        items
            .keys()
            .find(|(svc, _, acct)| svc == service && acct == account)
            .cloned()
    }
}

impl ItemBackend for MemoryBackend {
    fn add(&self, attributes: &AttributeQuery) -> Status {
        if let Some(status) = self.inner.forced.lock().add {
            return status;
        }
        let (Some(service), Some(account), Some(payload)) = (
            attributes.get_str(attr::SERVICE),
            attributes.get_str(attr::ACCOUNT),
            attributes.get_bytes(attr::VALUE_DATA),
        ) else {
            return ErrorKind::InvalidParameters.code();
        };
        let accessible = attributes
            .get_str(attr::ACCESSIBLE)
            .unwrap_or(Accessibility::WhenUnlocked.token())
            .to_owned();
        let key = (
            service.to_owned(),
            attributes.get_str(attr::ACCESS_GROUP).map(str::to_owned),
            account.to_owned(),
        );
        let mut items = self.inner.items.lock();
        if items.contains_key(&key) {
            return ErrorKind::DuplicateItem.code();
        }
        let now = Utc::now();
        items.insert(
            key,
            Entry {
                payload: Zeroizing::new(payload.to_vec()),
                accessible,
                created_at: now,
                modified_at: now,
            },
        );
        STATUS_OK
    }

    fn update(&self, query: &AttributeQuery, update: &AttributeQuery) -> Status {
        if let Some(status) = self.inner.forced.lock().update {
            return status;
        }
        let (Some(service), Some(account)) = (
            query.get_str(attr::SERVICE),
            query.get_str(attr::ACCOUNT),
        ) else {
            return ErrorKind::InvalidParameters.code();
        };
        if update.is_empty() {
            return ErrorKind::InvalidParameters.code();
        }
        let mut items = self.inner.items.lock();
        let Some(key) =
            Self::find_key(&items, service, query.get_str(attr::ACCESS_GROUP), account)
        else {
            return ErrorKind::ItemNotFound.code();
        };
        let entry = items.get_mut(&key).expect("key was just resolved");
        // An accessibility constraint in the query must match the stored
        // item, like any other attribute.
        if let Some(token) = query.get_str(attr::ACCESSIBLE) {
            if token != entry.accessible {
                return ErrorKind::ItemNotFound.code();
            }
        }
        if let Some(bytes) = update.get_bytes(attr::VALUE_DATA) {
            entry.payload = Zeroizing::new(bytes.to_vec());
        }
        if let Some(token) = update.get_str(attr::ACCESSIBLE) {
            entry.accessible = token.to_owned();
        }
        entry.modified_at = Utc::now();
        STATUS_OK
    }

    fn delete(&self, query: &AttributeQuery) -> Status {
        if let Some(status) = self.inner.forced.lock().delete {
            return status;
        }
        let Some(service) = query.get_str(attr::SERVICE) else {
            return ErrorKind::InvalidParameters.code();
        };
        let group = query.get_str(attr::ACCESS_GROUP);
        let mut items = self.inner.items.lock();
        match query.get_str(attr::ACCOUNT) {
            Some(account) => match Self::find_key(&items, service, group, account) {
                Some(key) => {
                    items.remove(&key);
                    STATUS_OK
                }
                None => ErrorKind::ItemNotFound.code(),
            },
            // No account: delete everything in the scope.
            None => {
                let keys: Vec<Key> = items
                    .keys()
                    .filter(|(svc, grp, _)| {
                        svc == service && group.map_or(true, |g| grp.as_deref() == Some(g))
                    })
                    .cloned()
                    .collect();
                if keys.is_empty() {
                    return ErrorKind::ItemNotFound.code();
                }
                for key in keys {
                    items.remove(&key);
                }
                STATUS_OK
            }
        }
    }

    fn copy_matching(&self, query: &AttributeQuery) -> (Status, Option<MatchResult>) {
        if let Some(status) = self.inner.forced.lock().copy {
            return (status, None);
        }
        let Some(service) = query.get_str(attr::SERVICE) else {
            return (ErrorKind::InvalidParameters.code(), None);
        };
        let group = query.get_str(attr::ACCESS_GROUP);
        let items = self.inner.items.lock();

        if let Some(account) = query.get_str(attr::ACCOUNT) {
            let Some(key) = Self::find_key(&items, service, group, account) else {
                return (ErrorKind::ItemNotFound.code(), None);
            };
            let entry = &items[&key];
            let result = query
                .get_flag(attr::RETURN_DATA)
                .unwrap_or(false)
                .then(|| MatchResult::Bytes(entry.payload.to_vec()));
            return (STATUS_OK, result);
        }

        let matched: Vec<(&Key, &Entry)> = items
            .iter()
            .filter(|((svc, grp, _), _)| {
                svc == service && group.map_or(true, |g| grp.as_deref() == Some(g))
            })
            .collect();
        if matched.is_empty() {
            return (ErrorKind::ItemNotFound.code(), None);
        }
        if !query.get_flag(attr::RETURN_ATTRIBUTES).unwrap_or(false) {
            return (STATUS_OK, None);
        }
        let mut results: Vec<AttributeQuery> = matched
            .into_iter()
            .map(|((svc, grp, acct), entry)| {
                let mut attrs = AttributeQuery::new();
                attrs.insert(attr::SERVICE, AttrValue::Str(svc.clone()));
                attrs.insert(attr::ACCOUNT, AttrValue::Str(acct.clone()));
                if let Some(grp) = grp {
                    attrs.insert(attr::ACCESS_GROUP, AttrValue::Str(grp.clone()));
                }
                attrs.insert(attr::ACCESSIBLE, AttrValue::Str(entry.accessible.clone()));
                attrs.insert(
                    attr::CREATED_AT,
                    AttrValue::Str(entry.created_at.to_rfc3339()),
                );
                attrs.insert(
                    attr::MODIFIED_AT,
                    AttrValue::Str(entry.modified_at.to_rfc3339()),
                );
                attrs
            })
            .collect();
        if query.get_limit(attr::MATCH_LIMIT) == Some(MatchLimit::One) {
            results.truncate(1);
        }
        (STATUS_OK, Some(MatchResult::Attributes(results)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build, Retrieval};
    use crate::scope::Scope;

    fn add_query(service: &str, account: &str, payload: &[u8]) -> AttributeQuery {
        let mut query = build(
            Some(account),
            &Scope::new(service),
            Some(Accessibility::WhenUnlocked),
            Retrieval::None,
        );
        query.insert(attr::VALUE_DATA, AttrValue::Bytes(payload.to_vec()));
        query
    }

    #[test]
    fn test_add_then_copy_one() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.add(&add_query("svc", "a", b"p1")), STATUS_OK);

        let probe = build(Some("a"), &Scope::new("svc"), None, Retrieval::One);
        let (status, result) = backend.copy_matching(&probe);
        assert_eq!(status, STATUS_OK);
        assert_eq!(result, Some(MatchResult::Bytes(b"p1".to_vec())));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.add(&add_query("svc", "a", b"p1")), STATUS_OK);
        assert_eq!(
            backend.add(&add_query("svc", "a", b"p2")),
            ErrorKind::DuplicateItem.code()
        );
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_same_account_different_scope_coexists() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.add(&add_query("svc-1", "a", b"p1")), STATUS_OK);
        assert_eq!(backend.add(&add_query("svc-2", "a", b"p2")), STATUS_OK);
        assert_eq!(backend.len(), 2);
    }

    #[test]
    fn test_update_missing_item_not_found() {
        let backend = MemoryBackend::new();
        let query = build(Some("a"), &Scope::new("svc"), None, Retrieval::None);
        let mut update = AttributeQuery::new();
        update.insert(attr::VALUE_DATA, AttrValue::Bytes(b"p".to_vec()));
        assert_eq!(
            backend.update(&query, &update),
            ErrorKind::ItemNotFound.code()
        );
    }

    #[test]
    fn test_update_with_mismatched_accessibility_misses() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.add(&add_query("svc", "a", b"p1")), STATUS_OK);

        let query = build(
            Some("a"),
            &Scope::new("svc"),
            Some(Accessibility::Always),
            Retrieval::None,
        );
        let mut update = AttributeQuery::new();
        update.insert(attr::VALUE_DATA, AttrValue::Bytes(b"p2".to_vec()));
        assert_eq!(
            backend.update(&query, &update),
            ErrorKind::ItemNotFound.code()
        );
    }

    #[test]
    fn test_update_replaces_payload() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.add(&add_query("svc", "a", b"p1")), STATUS_OK);

        let query = build(Some("a"), &Scope::new("svc"), None, Retrieval::None);
        let mut update = AttributeQuery::new();
        update.insert(attr::VALUE_DATA, AttrValue::Bytes(b"p2".to_vec()));
        assert_eq!(backend.update(&query, &update), STATUS_OK);

        let probe = build(Some("a"), &Scope::new("svc"), None, Retrieval::One);
        let (_, result) = backend.copy_matching(&probe);
        assert_eq!(result, Some(MatchResult::Bytes(b"p2".to_vec())));
    }

    #[test]
    fn test_delete_scope_wide() {
        let backend = MemoryBackend::new();
        backend.add(&add_query("svc", "a", b"p1"));
        backend.add(&add_query("svc", "b", b"p2"));
        backend.add(&add_query("other", "c", b"p3"));

        let query = build(None, &Scope::new("svc"), None, Retrieval::None);
        assert_eq!(backend.delete(&query), STATUS_OK);
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.delete(&query), ErrorKind::ItemNotFound.code());
    }

    #[test]
    fn test_enumeration_returns_attribute_maps() {
        let backend = MemoryBackend::new();
        backend.add(&add_query("svc", "b", b"p2"));
        backend.add(&add_query("svc", "a", b"p1"));

        let query = build(None, &Scope::new("svc"), None, Retrieval::All);
        let (status, result) = backend.copy_matching(&query);
        assert_eq!(status, STATUS_OK);
        let Some(MatchResult::Attributes(entries)) = result else {
            panic!("expected attribute maps");
        };
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.get_str(attr::SERVICE), Some("svc"));
            assert!(entry.get_str(attr::ACCOUNT).is_some());
            assert!(entry.get_str(attr::CREATED_AT).is_some());
            assert!(entry.get_str(attr::MODIFIED_AT).is_some());
        }
    }

    #[test]
    fn test_enumeration_of_empty_scope_is_not_found() {
        let backend = MemoryBackend::new();
        let query = build(None, &Scope::new("svc"), None, Retrieval::All);
        let (status, result) = backend.copy_matching(&query);
        assert_eq!(status, ErrorKind::ItemNotFound.code());
        assert_eq!(result, None);
    }

    #[test]
    fn test_access_group_partitions_enumeration() {
        let backend = MemoryBackend::new();
        let grouped = Scope::new("svc").with_access_group("grp");
        let mut query = build(Some("a"), &grouped, Some(Accessibility::WhenUnlocked), Retrieval::None);
        query.insert(attr::VALUE_DATA, AttrValue::Bytes(b"p1".to_vec()));
        backend.add(&query);
        backend.add(&add_query("svc", "b", b"p2"));

        let all = build(None, &grouped, None, Retrieval::All);
        let (status, result) = backend.copy_matching(&all);
        assert_eq!(status, STATUS_OK);
        let Some(MatchResult::Attributes(entries)) = result else {
            panic!("expected attribute maps");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get_str(attr::ACCOUNT), Some("a"));
        assert_eq!(entries[0].get_str(attr::ACCESS_GROUP), Some("grp"));
    }

    #[test]
    fn test_forced_statuses() {
        let backend = MemoryBackend::new();
        backend.force_add_error(Some(ErrorKind::MissingEntitlement));
        assert_eq!(
            backend.add(&add_query("svc", "a", b"p1")),
            ErrorKind::MissingEntitlement.code()
        );
        backend.force_add_error(None);
        assert_eq!(backend.add(&add_query("svc", "a", b"p1")), STATUS_OK);

        backend.force_copy_error(Some(ErrorKind::InteractionNotAllowed));
        let probe = build(Some("a"), &Scope::new("svc"), None, Retrieval::One);
        let (status, result) = backend.copy_matching(&probe);
        assert_eq!(status, ErrorKind::InteractionNotAllowed.code());
        assert_eq!(result, None);
    }
}
