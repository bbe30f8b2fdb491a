//! macOS keychain backend.
//!
//! Adapts the portable attribute-query interface onto the system
//! keychain through `security-framework`'s generic-password calls, with
//! item search for scope enumeration. Framework error codes are passed
//! through unchanged as raw statuses, so the normalizer sees exactly
//! what the OS reported (e.g. -25300 for a missing item).
//!
//! Note: the high-level password API does not take accessibility or
//! access-group attributes; applying those requires the lower-level
//! item-dictionary API. Until then this backend stores items with the
//! system default protection and ignores both attributes.

use security_framework::item::{ItemClass, ItemSearchOptions, Limit};
use security_framework::passwords::{
    delete_generic_password, get_generic_password, set_generic_password,
};
use tracing::debug;

use crate::backend::{ItemBackend, MatchResult, Status, STATUS_OK};
use crate::error::ErrorKind;
use crate::query::{attr, AttrValue, AttributeQuery};

/// [`ItemBackend`] over the macOS keychain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    pub fn new() -> Self {
        Self
    }
}

impl ItemBackend for SystemKeychain {
    fn add(&self, attributes: &AttributeQuery) -> Status {
        let (Some(service), Some(account), Some(payload)) = (
            attributes.get_str(attr::SERVICE),
            attributes.get_str(attr::ACCOUNT),
            attributes.get_bytes(attr::VALUE_DATA),
        ) else {
            return ErrorKind::InvalidParameters.code();
        };
        debug!(service, account, "keychain add");
        // set_generic_password upserts; the store only calls add after a
        // not-found probe, so the duplicate check happens one level up.
        match set_generic_password(service, account, payload) {
            Ok(()) => STATUS_OK,
            Err(e) => e.code(),
        }
    }

    fn update(&self, query: &AttributeQuery, update: &AttributeQuery) -> Status {
        let (Some(service), Some(account), Some(payload)) = (
            query.get_str(attr::SERVICE),
            query.get_str(attr::ACCOUNT),
            update.get_bytes(attr::VALUE_DATA),
        ) else {
            return ErrorKind::InvalidParameters.code();
        };
        debug!(service, account, "keychain update");
        match set_generic_password(service, account, payload) {
            Ok(()) => STATUS_OK,
            Err(e) => e.code(),
        }
    }

    fn delete(&self, query: &AttributeQuery) -> Status {
        let (Some(service), Some(account)) = (
            query.get_str(attr::SERVICE),
            query.get_str(attr::ACCOUNT),
        ) else {
            return ErrorKind::InvalidParameters.code();
        };
        debug!(service, account, "keychain delete");
        match delete_generic_password(service, account) {
            Ok(()) => STATUS_OK,
            Err(e) => e.code(),
        }
    }

    fn copy_matching(&self, query: &AttributeQuery) -> (Status, Option<MatchResult>) {
        let Some(service) = query.get_str(attr::SERVICE) else {
            return (ErrorKind::InvalidParameters.code(), None);
        };

        if let Some(account) = query.get_str(attr::ACCOUNT) {
            debug!(service, account, "keychain copy one");
            return match get_generic_password(service, account) {
                Ok(payload) => {
                    let result = query
                        .get_flag(attr::RETURN_DATA)
                        .unwrap_or(false)
                        .then(|| MatchResult::Bytes(payload));
                    (STATUS_OK, result)
                }
                Err(e) => (e.code(), None),
            };
        }

        debug!(service, "keychain enumerate");
        let mut search = ItemSearchOptions::new();
        search
            .class(ItemClass::generic_password())
            .service(service)
            .load_attributes(true)
            .limit(Limit::All);
        let results = match search.search() {
            Ok(results) => results,
            Err(e) => return (e.code(), None),
        };

        let group = query.get_str(attr::ACCESS_GROUP);
        let mut entries = Vec::new();
        for result in &results {
            let Some(dict) = result.simplify_dict() else {
                continue;
            };
            // The search API has no access-group filter; apply it here.
            if let Some(group) = group {
                if dict.get("agrp").map(String::as_str) != Some(group) {
                    continue;
                }
            }
            let Some(account) = dict.get("acct") else {
                continue;
            };
            let mut attrs = AttributeQuery::new();
            attrs.insert(attr::SERVICE, AttrValue::Str(service.to_owned()));
            attrs.insert(attr::ACCOUNT, AttrValue::Str(account.clone()));
            if let Some(grp) = dict.get("agrp") {
                attrs.insert(attr::ACCESS_GROUP, AttrValue::Str(grp.clone()));
            }
            entries.push(attrs);
        }
        if entries.is_empty() {
            return (ErrorKind::ItemNotFound.code(), None);
        }
        if !query.get_flag(attr::RETURN_ATTRIBUTES).unwrap_or(false) {
            return (STATUS_OK, None);
        }
        (STATUS_OK, Some(MatchResult::Attributes(entries)))
    }
}
