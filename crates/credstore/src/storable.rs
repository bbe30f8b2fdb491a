//! The record capability trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::accessibility::Accessibility;
use crate::scope::Scope;

/// A value the store can persist under an account identifier.
///
/// Only [`account`](Storable::account) must be supplied; service and
/// access group default to the process-wide configuration and the
/// accessibility policy to [`Accessibility::WhenUnlocked`]. The account
/// is the lookup key and must be unique within its (service, access
/// group) scope.
pub trait Storable: Serialize + DeserializeOwned {
    /// Account identifier this record is stored under.
    fn account(&self) -> &str;

    /// Service namespace; defaults to the process-wide default service.
    fn service(&self) -> String {
        Scope::default().service
    }

    /// Sharing group; defaults to the process-wide default access group.
    fn access_group(&self) -> Option<String> {
        Scope::default().access_group
    }

    /// Policy governing when the backend may release this record.
    fn accessibility(&self) -> Accessibility {
        Accessibility::WhenUnlocked
    }

    /// The scope this record lives in.
    fn scope(&self) -> Scope {
        Scope {
            service: self.service(),
            access_group: self.access_group(),
        }
    }
}
