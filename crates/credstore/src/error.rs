//! Error types for credential storage.
//!
//! Backend failures are reported as raw status codes and normalized into
//! [`ErrorKind`] through a flat lookup table; everything the crate itself
//! can get wrong (codec failures, malformed backend responses) lives on
//! [`Error`].

use thiserror::Error;

use crate::backend::Status;

/// Convenience result alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend operation failed with a normalized status code.
    #[error(transparent)]
    Backend(#[from] ErrorKind),

    /// The codec could not encode the record.
    #[error("failed to encode record: {0}")]
    Encode(String),

    /// The codec could not decode a stored payload.
    #[error("failed to decode stored payload: {0}")]
    Decode(String),

    /// The backend reported success but returned a result whose shape
    /// does not match the requested return mode.
    #[error("backend returned an unexpected result shape")]
    InvalidResult,
}

/// Normalized backend failure categories.
///
/// Each variant corresponds to one raw backend status code and carries a
/// fixed human-readable description. Values are only ever constructed by
/// [`ErrorKind::from_status`]; an unrecognized code becomes [`Unknown`]
/// rather than an error in the normalizer itself.
///
/// [`Unknown`]: ErrorKind::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("Failed to allocate memory.")]
    Allocate,
    #[error("Authorization and/or authentication failed.")]
    AuthenticationFailed,
    #[error("The buffer is too small.")]
    BufferTooSmall,
    #[error("The attempt to create a certificate chain failed.")]
    CreateChainFailed,
    #[error("The data is not available.")]
    DataNotAvailable,
    #[error("The data is not modifiable.")]
    DataNotModifiable,
    #[error("The data is too large for the particular data type.")]
    DataTooLarge,
    #[error("Unable to decode the provided data.")]
    Decode,
    #[error("More than one callback of the same name exists.")]
    DuplicateCallback,
    #[error("The item already exists.")]
    DuplicateItem,
    #[error("A keychain with the same name already exists.")]
    DuplicateKeychain,
    #[error("The user interface cannot be displayed because the system is in a dark wake state.")]
    InDarkWake,
    #[error("Interaction with the Security Server is not allowed.")]
    InteractionNotAllowed,
    #[error("User interaction is required.")]
    InteractionRequired,
    #[error("The callback is not valid.")]
    InvalidCallback,
    #[error("The item reference is invalid.")]
    InvalidItemReference,
    #[error("The keychain is not valid.")]
    InvalidKeychain,
    #[error("One or more parameters passed to the function are not valid.")]
    InvalidParameters,
    #[error("The preference domain specified is invalid.")]
    InvalidPreferenceDomain,
    #[error("The search reference is invalid.")]
    InvalidSearchReference,
    #[error("The item cannot be found.")]
    ItemNotFound,
    #[error("The key size is not allowed.")]
    KeySizeNotAllowed,
    #[error("Keychain entitlement has not been added.")]
    MissingEntitlement,
    #[error("There is no certificate module available.")]
    NoCertificateModule,
    #[error("A default keychain does not exist.")]
    NoDefaultKeychain,
    #[error("There is no policy module available.")]
    NoPolicyModule,
    #[error("There is no storage module available.")]
    NoStorageModule,
    #[error("The attribute does not exist.")]
    NoSuchAttribute,
    #[error("The keychain item class does not exist.")]
    NoSuchClass,
    #[error("The keychain does not exist.")]
    NoSuchKeychain,
    #[error("No trust results are available.")]
    NotAvailable,
    #[error("Read only error.")]
    ReadOnly,
    #[error("The attribute is read only.")]
    ReadOnlyAttribute,
    #[error("A function or operation is not implemented.")]
    Unimplemented,
    #[error("The version is incorrect.")]
    WrongVersion,
    #[error("An unknown error occurred.")]
    Unknown,
}

/// Flat status-code-to-kind table. Kept as an array of pairs so the
/// mapping stays data, not control flow.
const KNOWN_CODES: &[(Status, ErrorKind)] = &[
    (-108, ErrorKind::Allocate),
    (-25293, ErrorKind::AuthenticationFailed),
    (-25301, ErrorKind::BufferTooSmall),
    (-25318, ErrorKind::CreateChainFailed),
    (-25316, ErrorKind::DataNotAvailable),
    (-25317, ErrorKind::DataNotModifiable),
    (-25302, ErrorKind::DataTooLarge),
    (-26275, ErrorKind::Decode),
    (-25297, ErrorKind::DuplicateCallback),
    (-25299, ErrorKind::DuplicateItem),
    (-25296, ErrorKind::DuplicateKeychain),
    (-25320, ErrorKind::InDarkWake),
    (-25308, ErrorKind::InteractionNotAllowed),
    (-25315, ErrorKind::InteractionRequired),
    (-25298, ErrorKind::InvalidCallback),
    (-25304, ErrorKind::InvalidItemReference),
    (-25295, ErrorKind::InvalidKeychain),
    (-50, ErrorKind::InvalidParameters),
    (-25319, ErrorKind::InvalidPreferenceDomain),
    (-25305, ErrorKind::InvalidSearchReference),
    (-25300, ErrorKind::ItemNotFound),
    (-25311, ErrorKind::KeySizeNotAllowed),
    (-34018, ErrorKind::MissingEntitlement),
    (-25313, ErrorKind::NoCertificateModule),
    (-25307, ErrorKind::NoDefaultKeychain),
    (-25314, ErrorKind::NoPolicyModule),
    (-25312, ErrorKind::NoStorageModule),
    (-25303, ErrorKind::NoSuchAttribute),
    (-25306, ErrorKind::NoSuchClass),
    (-25294, ErrorKind::NoSuchKeychain),
    (-25291, ErrorKind::NotAvailable),
    (-25292, ErrorKind::ReadOnly),
    (-25309, ErrorKind::ReadOnlyAttribute),
    (-4, ErrorKind::Unimplemented),
    (-25310, ErrorKind::WrongVersion),
    (-1, ErrorKind::Unknown),
];

impl ErrorKind {
    /// Normalize a raw backend status code.
    ///
    /// Returns `None` for the success code, the matching kind for every
    /// code in the known table, and [`ErrorKind::Unknown`] for anything
    /// else. Never fails.
    pub fn from_status(status: Status) -> Option<Self> {
        if status == crate::backend::STATUS_OK {
            return None;
        }
        let kind = KNOWN_CODES
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Unknown);
        Some(kind)
    }

    /// The raw status code this kind normalizes from.
    ///
    /// Mainly useful for backends that need to fabricate statuses, such
    /// as [`MemoryBackend`](crate::MemoryBackend) in failure-injection
    /// tests.
    pub fn code(&self) -> Status {
        KNOWN_CODES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(code, _)| *code)
            .unwrap_or(-1)
    }
}
