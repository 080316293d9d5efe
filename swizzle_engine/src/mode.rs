//! Install modes and identity keys.
//!
//! A [`SwizzleMode`] decides whether an install proceeds given what has been
//! recorded for its [`SwizzleKey`] so far.
//!
//! # Modes
//!
//! | Mode | Blocks when |
//! |---|---|
//! | `Always` | never |
//! | `OncePerType` | `(class, key)` already recorded |
//! | `OncePerTypeAndAncestors` | `(class or any ancestor, key)` already recorded |
//!
//! `OncePerTypeAndAncestors` only guards against ancestors patched *before*
//! the descendant. Patching a subclass first and its ancestor second installs
//! both, and a send to the subclass then runs both replacements.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

// =============================================================================
// Swizzle Mode
// =============================================================================

/// Idempotency policy for one install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwizzleMode {
    /// Always patch. The caller is responsible for not installing twice.
    #[default]
    Always = 0,
    /// Skip if this exact class was already patched with the same key.
    OncePerType = 1,
    /// Skip if this class or one of its ancestors was already patched with
    /// the same key.
    OncePerTypeAndAncestors = 2,
}

impl SwizzleMode {
    /// Whether this mode consults the registry and therefore needs a key.
    #[inline]
    pub fn requires_key(self) -> bool {
        self != SwizzleMode::Always
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwizzleMode::Always => "always",
            SwizzleMode::OncePerType => "once-per-type",
            SwizzleMode::OncePerTypeAndAncestors => "once-per-type-and-ancestors",
        }
    }
}

impl fmt::Display for SwizzleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown swizzle mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for SwizzleMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "always" => Ok(SwizzleMode::Always),
            "1" | "once-per-type" | "once_per_type" => Ok(SwizzleMode::OncePerType),
            "2" | "once-per-type-and-ancestors" | "once_per_type_and_ancestors" => {
                Ok(SwizzleMode::OncePerTypeAndAncestors)
            }
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

// =============================================================================
// Swizzle Key
// =============================================================================

static NEXT_UNIQUE_KEY: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyRepr {
    Unique(u64),
    Address(usize),
}

/// Identity key for idempotent installs.
///
/// Keys compare by identity only: two keys are equal when they came from the
/// same `unique()` call or point at the same static.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwizzleKey(KeyRepr);

impl SwizzleKey {
    /// A key distinct from every other key in the process.
    pub fn unique() -> Self {
        SwizzleKey(KeyRepr::Unique(NEXT_UNIQUE_KEY.fetch_add(1, Ordering::Relaxed)))
    }

    /// Key identified by the address of a static.
    ///
    /// Zero-sized statics may share an address; use a sized one.
    pub fn of<T>(anchor: &'static T) -> Self {
        SwizzleKey(KeyRepr::Address(anchor as *const T as usize))
    }
}
