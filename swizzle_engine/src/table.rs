//! Dispatch table accessor.
//!
//! Reads and writes a class's *own* entries and walks ancestors for the
//! effective one. Reads are lock-free with respect to installs; the single
//! write path requires the install guard.

use crate::error::InterceptResult;
use crate::lock::InstallGuard;
use swizzle_runtime::{ClassRef, Entry, Selector};

/// Entry defined directly on `class`, if any.
#[inline]
pub fn own_entry(class: &ClassRef, sel: Selector) -> Option<Entry> {
    class.own_entry(sel)
}

/// Entry a send to an instance of `class` would run: `class` first, then
/// its ancestors.
///
/// Fails with `MessageNotFound` when no class in the chain defines `sel`.
pub fn effective_entry(class: &ClassRef, sel: Selector) -> InterceptResult<Entry> {
    Ok(class.effective_entry(sel)?)
}

/// Install or replace `class`'s own entry for `sel`.
pub(crate) fn set_own_entry(
    _guard: &InstallGuard<'_>,
    class: &ClassRef,
    sel: Selector,
    entry: Entry,
) -> Option<Entry> {
    class.replace_own_entry(sel, entry)
}
