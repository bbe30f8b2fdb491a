//! Attribute queries for backend operations.
//!
//! Every backend call is driven by an [`AttributeQuery`]: an unordered
//! map from well-known attribute keys to heterogeneous values, built
//! fresh per operation and never persisted.

use std::collections::HashMap;

use crate::accessibility::Accessibility;
use crate::scope::Scope;

/// Well-known attribute keys understood by backends.
pub mod attr {
    /// Item class discriminator; always present.
    pub const CLASS: &str = "class";
    /// Service namespace; always present.
    pub const SERVICE: &str = "service";
    /// Account identifier within a scope.
    pub const ACCOUNT: &str = "account";
    /// Optional sharing group.
    pub const ACCESS_GROUP: &str = "access-group";
    /// Accessibility policy token; write path only.
    pub const ACCESSIBLE: &str = "accessible";
    /// Match limit for retrieval queries.
    pub const MATCH_LIMIT: &str = "match-limit";
    /// Request the raw payload bytes in the match result.
    pub const RETURN_DATA: &str = "return-data";
    /// Request attribute maps instead of payload bytes.
    pub const RETURN_ATTRIBUTES: &str = "return-attributes";
    /// The encoded payload itself, on add/update.
    pub const VALUE_DATA: &str = "value-data";
    /// Creation instant, reported by backends in attribute results.
    pub const CREATED_AT: &str = "created-at";
    /// Last-modification instant, reported by backends in attribute results.
    pub const MODIFIED_AT: &str = "modified-at";

    /// The only item class this crate stores.
    pub const GENERIC_PASSWORD: &str = "generic-password";
}

/// How many items a match operation may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLimit {
    /// At most one item.
    One,
    /// Every matching item.
    All,
}

/// A value in an attribute query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Limit(MatchLimit),
}

/// Unordered attribute map passed to backend operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeQuery {
    entries: HashMap<&'static str, AttrValue>,
}

impl AttributeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any existing value.
    pub fn insert(&mut self, key: &'static str, value: AttrValue) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// String value under `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Byte value under `key`, if present and bytes.
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.entries.get(key) {
            Some(AttrValue::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// Boolean value under `key`, if present and a flag.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Match limit under `key`, if present and a limit.
    pub fn get_limit(&self, key: &str) -> Option<MatchLimit> {
        match self.entries.get(key) {
            Some(AttrValue::Limit(limit)) => Some(*limit),
            _ => None,
        }
    }

    /// Merge `other` into `self`; values from `other` win on conflict.
    pub fn merge(&mut self, other: AttributeQuery) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// Retrieval mode for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Retrieval {
    /// Identity query only; no match or return flags (add/update/delete).
    None,
    /// Single match, payload bytes requested.
    One,
    /// All matches, attribute maps requested.
    All,
}

/// Build the attribute query for one operation.
///
/// Class and service are always set. The account is set only when given
/// (enumeration queries omit it), the access group only when the scope
/// carries one, and the accessibility token only when a policy is
/// passed; identity probes and deletes leave it out so they do not
/// over-constrain the match.
pub(crate) fn build(
    account: Option<&str>,
    scope: &Scope,
    accessibility: Option<Accessibility>,
    retrieval: Retrieval,
) -> AttributeQuery {
    let mut query = AttributeQuery::new();
    query.insert(attr::CLASS, AttrValue::Str(attr::GENERIC_PASSWORD.to_owned()));
    query.insert(attr::SERVICE, AttrValue::Str(scope.service.clone()));
    if let Some(account) = account {
        query.insert(attr::ACCOUNT, AttrValue::Str(account.to_owned()));
    }
    if let Some(group) = &scope.access_group {
        query.insert(attr::ACCESS_GROUP, AttrValue::Str(group.clone()));
    }
    if let Some(policy) = accessibility {
        query.insert(attr::ACCESSIBLE, AttrValue::Str(policy.token().to_owned()));
    }
    match retrieval {
        Retrieval::None => {}
        Retrieval::One => {
            query.insert(attr::MATCH_LIMIT, AttrValue::Limit(MatchLimit::One));
            query.insert(attr::RETURN_DATA, AttrValue::Bool(true));
        }
        Retrieval::All => {
            query.insert(attr::MATCH_LIMIT, AttrValue::Limit(MatchLimit::All));
            query.insert(attr::RETURN_ATTRIBUTES, AttrValue::Bool(true));
        }
    }
    query
}
