//! Patch registry.
//!
//! Records which `(class, key)` pairs have been patched and answers the
//! mode-based "should this install proceed" question. Records are
//! append-only and live for the whole process.
//!
//! The registry has no lock of its own: the only instance sits inside the
//! global install lock (see [`crate::lock`]), so holding a `&mut
//! PatchRegistry` already means holding that lock.

use crate::mode::{SwizzleKey, SwizzleMode};
use rustc_hash::FxHashSet;
use swizzle_runtime::{ClassId, ClassRef};

/// Set of `(class identity, key identity)` pairs.
#[derive(Debug, Default)]
pub struct PatchRegistry {
    records: FxHashSet<(ClassId, SwizzleKey)>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `(class, key)` has been recorded.
    #[inline]
    pub fn is_recorded(&self, class: ClassId, key: SwizzleKey) -> bool {
        self.records.contains(&(class, key))
    }

    /// Whether an install of `key` on `class` is already satisfied under
    /// `mode`, i.e. should be skipped.
    ///
    /// `OncePerTypeAndAncestors` walks the ancestor chain as it is now; an
    /// ancestor patched later does not block descendants patched earlier.
    pub fn is_satisfied(
        &self,
        class: &ClassRef,
        key: Option<SwizzleKey>,
        mode: SwizzleMode,
    ) -> bool {
        let Some(key) = key else {
            return false;
        };
        match mode {
            SwizzleMode::Always => false,
            SwizzleMode::OncePerType => self.is_recorded(class.id(), key),
            SwizzleMode::OncePerTypeAndAncestors => class
                .ancestors()
                .iter()
                .any(|ancestor| self.is_recorded(ancestor.id(), key)),
        }
    }

    /// Record a completed install. Returns `false` if it was already present.
    #[inline]
    pub fn record(&mut self, class: ClassId, key: SwizzleKey) -> bool {
        self.records.insert((class, key))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
