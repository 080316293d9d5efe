//! Interned message identifiers.
//!
//! A [`Selector`] names a method. Selectors are interned in a process-wide
//! table so that equal names always produce the same handle, and comparing
//! two selectors is a single integer compare.
//!
//! # Thread Safety
//!
//! The table is guarded by a `parking_lot::RwLock`. The common case (name
//! already interned) only takes the read lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

// =============================================================================
// Selector
// =============================================================================

/// Opaque, process-stable handle naming a method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(u32);

impl Selector {
    /// Intern `name`, returning the selector shared by every caller that
    /// interns the same string.
    pub fn intern(name: &str) -> Self {
        selector_table().intern(name)
    }

    /// The name this selector was interned from.
    pub fn name(self) -> Arc<str> {
        selector_table().name(self)
    }

    /// Raw table index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({}, {:?})", self.0, &*self.name())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::intern(name)
    }
}

// =============================================================================
// Selector Table
// =============================================================================

#[derive(Default)]
struct TableInner {
    ids: FxHashMap<Arc<str>, Selector>,
    names: Vec<Arc<str>>,
}

/// Process-wide selector interning table.
pub struct SelectorTable {
    inner: RwLock<TableInner>,
}

impl SelectorTable {
    fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner::default()),
        }
    }

    fn intern(&self, name: &str) -> Selector {
        if let Some(&sel) = self.inner.read().ids.get(name) {
            return sel;
        }

        let mut inner = self.inner.write();
        // Another thread may have won the race between the two locks.
        if let Some(&sel) = inner.ids.get(name) {
            return sel;
        }
        let sel = Selector(inner.names.len() as u32);
        let name: Arc<str> = Arc::from(name);
        inner.names.push(name.clone());
        inner.ids.insert(name, sel);
        sel
    }

    fn name(&self, sel: Selector) -> Arc<str> {
        self.inner.read().names[sel.0 as usize].clone()
    }

    /// Number of interned selectors.
    pub fn len(&self) -> usize {
        self.inner.read().names.len()
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static SELECTOR_TABLE: OnceLock<SelectorTable> = OnceLock::new();

/// Get the global selector table.
pub fn selector_table() -> &'static SelectorTable {
    SELECTOR_TABLE.get_or_init(SelectorTable::new)
}
