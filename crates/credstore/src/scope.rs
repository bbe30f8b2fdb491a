//! Storage scopes and process-wide default configuration.
//!
//! A [`Scope`] partitions the backend namespace into a service name plus
//! an optional sharing group. The process defaults are seeded from the
//! executable name and can be overridden once at startup; mutating them
//! while other threads run store operations is not synchronized beyond a
//! read/write lock, so treat reconfiguration as a startup-time step.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Service name used when no application identity can be derived.
const FALLBACK_SERVICE: &str = "com.credstore.service";

static PROCESS_DEFAULTS: Lazy<RwLock<Scope>> = Lazy::new(|| RwLock::new(seeded()));

/// A (service, access group) pair partitioning the storage namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Logical service namespace the item belongs to.
    pub service: String,
    /// Optional sharing group for access across cooperating applications.
    pub access_group: Option<String>,
}

impl Scope {
    /// Create a scope for `service` with no access group.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            access_group: None,
        }
    }

    /// Attach an access group to this scope.
    pub fn with_access_group(mut self, access_group: impl Into<String>) -> Self {
        self.access_group = Some(access_group.into());
        self
    }
}

/// The default scope is the current process-wide configuration.
impl Default for Scope {
    fn default() -> Self {
        PROCESS_DEFAULTS.read().clone()
    }
}

/// Override the process-wide default service and access group.
///
/// Intended to be called once during application startup, before store
/// operations that rely on the defaults are in flight.
pub fn configure_defaults(service: &str, access_group: Option<&str>) {
    let mut defaults = PROCESS_DEFAULTS.write();
    defaults.service = service.to_owned();
    defaults.access_group = access_group.map(str::to_owned);
}

/// Restore the originally seeded process-wide defaults.
pub fn reset_defaults() {
    *PROCESS_DEFAULTS.write() = seeded();
}

/// Initial defaults: the executable stem as service name, no access
/// group. Falls back to a fixed service name when the executable path is
/// unavailable.
fn seeded() -> Scope {
    let service = std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| FALLBACK_SERVICE.to_owned());
    Scope {
        service,
        access_group: None,
    }
}
