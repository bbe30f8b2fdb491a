//! Accessibility policies for stored items.
//!
//! A policy tells the backend under which device conditions it may
//! release an item to the process. Policies travel as string tokens in
//! the attribute query, never inside the encoded payload.

/// Condition under which the backend may release a stored item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Accessibility {
    /// Accessible once the device has been unlocked after boot.
    AfterFirstUnlock,
    /// Like `AfterFirstUnlock`, but never migrated to another device.
    AfterFirstUnlockThisDeviceOnly,
    /// Always accessible.
    Always,
    /// Always accessible, never migrated to another device.
    AlwaysThisDeviceOnly,
    /// Accessible only while a passcode is set; never migrated.
    WhenPasscodeSetThisDeviceOnly,
    /// Accessible only while the device is unlocked.
    #[default]
    WhenUnlocked,
    /// Like `WhenUnlocked`, but never migrated to another device.
    WhenUnlockedThisDeviceOnly,
}

const AFTER_FIRST_UNLOCK: &str = "after-first-unlock";
const AFTER_FIRST_UNLOCK_THIS_DEVICE_ONLY: &str = "after-first-unlock-this-device-only";
const ALWAYS: &str = "always";
const ALWAYS_THIS_DEVICE_ONLY: &str = "always-this-device-only";
const WHEN_PASSCODE_SET_THIS_DEVICE_ONLY: &str = "when-passcode-set-this-device-only";
const WHEN_UNLOCKED: &str = "when-unlocked";
const WHEN_UNLOCKED_THIS_DEVICE_ONLY: &str = "when-unlocked-this-device-only";

impl Accessibility {
    /// The backend token for this policy. Every variant has exactly one.
    pub fn token(&self) -> &'static str {
        match self {
            Self::AfterFirstUnlock => AFTER_FIRST_UNLOCK,
            Self::AfterFirstUnlockThisDeviceOnly => AFTER_FIRST_UNLOCK_THIS_DEVICE_ONLY,
            Self::Always => ALWAYS,
            Self::AlwaysThisDeviceOnly => ALWAYS_THIS_DEVICE_ONLY,
            Self::WhenPasscodeSetThisDeviceOnly => WHEN_PASSCODE_SET_THIS_DEVICE_ONLY,
            Self::WhenUnlocked => WHEN_UNLOCKED,
            Self::WhenUnlockedThisDeviceOnly => WHEN_UNLOCKED_THIS_DEVICE_ONLY,
        }
    }

    /// Resolve a backend token back into a policy.
    ///
    /// Unrecognized tokens coerce to [`Accessibility::WhenUnlocked`]
    /// instead of failing, so this does not round-trip tokens the crate
    /// never produced. Callers needing strict validation must check the
    /// token themselves first.
    pub fn from_token(token: &str) -> Self {
        match token {
            AFTER_FIRST_UNLOCK => Self::AfterFirstUnlock,
            AFTER_FIRST_UNLOCK_THIS_DEVICE_ONLY => Self::AfterFirstUnlockThisDeviceOnly,
            ALWAYS => Self::Always,
            ALWAYS_THIS_DEVICE_ONLY => Self::AlwaysThisDeviceOnly,
            WHEN_PASSCODE_SET_THIS_DEVICE_ONLY => Self::WhenPasscodeSetThisDeviceOnly,
            WHEN_UNLOCKED => Self::WhenUnlocked,
            WHEN_UNLOCKED_THIS_DEVICE_ONLY => Self::WhenUnlockedThisDeviceOnly,
            _ => Self::WhenUnlocked,
        }
    }
}
