//! The credential store facade.
//!
//! [`Store`] turns typed record operations into backend calls: it builds
//! the attribute query, lets the codec handle the payload bytes, and
//! normalizes every raw status through [`ErrorKind::from_status`]. All
//! operations are synchronous round trips to the backend; callers
//! wanting timeouts wrap the calls themselves.

use tracing::debug;

use crate::backend::{self, ItemBackend, MatchResult};
use crate::codec::{Codec, JsonCodec};
use crate::error::{Error, ErrorKind, Result};
use crate::query::{self, attr, AttrValue, AttributeQuery, Retrieval};
use crate::scope::Scope;
use crate::storable::Storable;

/// Typed secret storage over an [`ItemBackend`].
///
/// Holds only immutable references after construction; share `&Store`
/// freely across threads once the process defaults are stable.
pub struct Store<C: Codec = JsonCodec> {
    backend: Box<dyn ItemBackend>,
    codec: C,
}

impl Store<JsonCodec> {
    /// Store over the platform default backend with the JSON codec.
    ///
    /// On macOS this is the system keychain; elsewhere an in-process
    /// memory backend is used and a warning is logged.
    pub fn new() -> Self {
        Self::with_backend(backend::platform_default())
    }

    /// Store over an explicit backend with the JSON codec.
    pub fn with_backend(backend: Box<dyn ItemBackend>) -> Self {
        Self::with_codec(backend, JsonCodec)
    }
}

impl Default for Store<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Store<C> {
    /// Store over an explicit backend and codec.
    pub fn with_codec(backend: Box<dyn ItemBackend>, codec: C) -> Self {
        Self { backend, codec }
    }

    /// Persist `record` under its account, inserting or updating as
    /// needed.
    ///
    /// The backend is first probed for an existing item; a hit becomes an
    /// update carrying the new payload and accessibility policy, a
    /// not-found probe becomes an add. The not-found case is the one
    /// failure treated as control flow rather than an error; any other
    /// probe failure propagates unchanged.
    ///
    /// Two concurrent `store` calls for the same account can both probe
    /// not-found and both attempt the add; the backend's uniqueness
    /// constraint then fails the second with
    /// [`ErrorKind::DuplicateItem`], which callers should treat as a
    /// retryable conflict.
    pub fn store<T: Storable>(&self, record: &T) -> Result<()> {
        let payload = self.codec.encode(record)?;
        let scope = record.scope();
        let account = record.account();

        let mut new_attrs = AttributeQuery::new();
        new_attrs.insert(attr::VALUE_DATA, AttrValue::Bytes(payload));
        new_attrs.insert(
            attr::ACCESSIBLE,
            AttrValue::Str(record.accessibility().token().to_owned()),
        );

        let status = if self.copy_data(account, &scope)?.is_some() {
            debug!(account, service = %scope.service, "updating existing item");
            let query = query::build(
                Some(account),
                &scope,
                Some(record.accessibility()),
                Retrieval::None,
            );
            self.backend.update(&query, &new_attrs)
        } else {
            debug!(account, service = %scope.service, "adding new item");
            let mut query = query::build(
                Some(account),
                &scope,
                Some(record.accessibility()),
                Retrieval::None,
            );
            query.merge(new_attrs);
            self.backend.add(&query)
        };
        match ErrorKind::from_status(status) {
            None => Ok(()),
            Some(kind) => Err(kind.into()),
        }
    }

    /// Retrieve and decode the record stored under `account` in `scope`.
    ///
    /// Fails with [`ErrorKind::ItemNotFound`] when nothing is stored,
    /// with [`Error::Decode`] when the payload is malformed, and with the
    /// normalized backend error otherwise.
    pub fn retrieve_value<T: Storable>(&self, account: &str, scope: &Scope) -> Result<T> {
        match self.copy_data(account, scope)? {
            Some(bytes) => self.codec.decode(&bytes),
            None => Err(ErrorKind::ItemNotFound.into()),
        }
    }

    /// All account identifiers stored in `scope`.
    ///
    /// Returns an empty vector when the scope holds nothing. Ordering
    /// follows backend enumeration order and is implementation-defined.
    pub fn retrieve_accounts(&self, scope: &Scope) -> Result<Vec<String>> {
        let query = query::build(None, scope, None, Retrieval::All);
        let (status, result) = self.backend.copy_matching(&query);
        match ErrorKind::from_status(status) {
            Some(ErrorKind::ItemNotFound) => return Ok(Vec::new()),
            Some(kind) => return Err(kind.into()),
            None => {}
        }
        match result {
            Some(MatchResult::Attributes(entries)) => Ok(entries
                .iter()
                .filter_map(|entry| entry.get_str(attr::ACCOUNT).map(str::to_owned))
                .collect()),
            Some(MatchResult::Bytes(_)) => Err(Error::InvalidResult),
            None => Ok(Vec::new()),
        }
    }

    /// Delete the item stored under `record`'s account and scope.
    ///
    /// Fails with [`ErrorKind::ItemNotFound`] when nothing is stored.
    pub fn delete<T: Storable>(&self, record: &T) -> Result<()> {
        self.delete_account(record.account(), &record.scope())
    }

    /// Delete every item in `scope`, one account at a time.
    ///
    /// The first failing delete aborts the batch and is returned as-is;
    /// accounts after it are left in place.
    pub fn clear_all(&self, scope: &Scope) -> Result<()> {
        let accounts = self.retrieve_accounts(scope)?;
        debug!(service = %scope.service, count = accounts.len(), "clearing scope");
        for account in &accounts {
            self.delete_account(account, scope)?;
        }
        Ok(())
    }

    fn delete_account(&self, account: &str, scope: &Scope) -> Result<()> {
        debug!(account, service = %scope.service, "deleting item");
        let query = query::build(Some(account), scope, None, Retrieval::None);
        match ErrorKind::from_status(self.backend.delete(&query)) {
            None => Ok(()),
            Some(kind) => Err(kind.into()),
        }
    }

    /// One-match probe for the payload under (account, scope).
    ///
    /// `Ok(None)` means the backend reported not-found; every other
    /// failure propagates.
    fn copy_data(&self, account: &str, scope: &Scope) -> Result<Option<Vec<u8>>> {
        let query = query::build(Some(account), scope, None, Retrieval::One);
        let (status, result) = self.backend.copy_matching(&query);
        match ErrorKind::from_status(status) {
            Some(ErrorKind::ItemNotFound) => Ok(None),
            Some(kind) => Err(kind.into()),
            None => match result {
                Some(MatchResult::Bytes(bytes)) => Ok(Some(bytes)),
                Some(MatchResult::Attributes(_)) => Err(Error::InvalidResult),
                None => Ok(None),
            },
        }
    }
}
