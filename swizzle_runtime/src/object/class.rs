//! Class records.
//!
//! A [`Class`] represents a runtime type. It contains:
//! - The class name
//! - An optional parent (single inheritance, fixed at creation)
//! - A metaclass holding the class-side methods
//! - Its *own* method table (never inherited entries)
//!
//! # Architecture
//!
//! ```text
//! Class
//! ├── id: ClassId (unique for this class)
//! ├── name: Arc<str>
//! ├── parent: Option<ClassRef>
//! ├── meta: Option<ClassRef> (None for metaclasses)
//! ├── flags: ClassFlags
//! └── methods: MethodTable (selector → entry)
//! ```
//!
//! The parent link is immutable, so the ancestor chain of a class can never
//! change or form a cycle and every walk terminates at a root.

use crate::dispatch::{DispatchError, DispatchResult};
use crate::object::entry::Entry;
use crate::selector::Selector;
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Shared handle to a class record.
pub type ClassRef = Arc<Class>;

/// Ancestor chain, receiver class first. Most hierarchies are shallow.
pub type Ancestors = SmallVec<[ClassRef; 8]>;

// =============================================================================
// Class Identity
// =============================================================================

/// Process-unique class identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Global counter for allocating unique ClassIds.
static NEXT_CLASS_ID: AtomicU32 = AtomicU32::new(1);

fn allocate_class_id() -> ClassId {
    ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
}

// =============================================================================
// Class Flags
// =============================================================================

bitflags::bitflags! {
    /// Flags describing what kind of class record this is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u32 {
        /// Record holds class-side methods of another class.
        const META = 1 << 0;
        /// Record has no parent.
        const ROOT = 1 << 1;
    }
}

// =============================================================================
// Method Table
// =============================================================================

/// A class's own selector → entry mapping.
///
/// Readers clone the entry out and drop the guard before calling it, so an
/// entry that dispatches back into the same class never runs under the lock.
#[derive(Default)]
pub struct MethodTable {
    entries: RwLock<FxHashMap<Selector, Entry>>,
}

impl MethodTable {
    #[inline]
    pub fn get(&self, sel: Selector) -> Option<Entry> {
        self.entries.read().get(&sel).cloned()
    }

    /// Insert or replace, returning the displaced entry.
    #[inline]
    pub fn insert(&self, sel: Selector, entry: Entry) -> Option<Entry> {
        self.entries.write().insert(sel, entry)
    }

    #[inline]
    pub fn contains(&self, sel: Selector) -> bool {
        self.entries.read().contains_key(&sel)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All entries ordered by selector.
    pub fn snapshot(&self) -> Vec<(Selector, Entry)> {
        let mut out: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(sel, entry)| (*sel, entry.clone()))
            .collect();
        out.sort_by_key(|(sel, _)| *sel);
        out
    }
}

// =============================================================================
// Method Slot
// =============================================================================

/// Result of a method lookup through the ancestor chain.
#[derive(Debug, Clone)]
pub struct MethodSlot {
    /// The resolved entry.
    pub entry: Entry,
    /// Class whose own table holds the entry.
    pub defining_class: ClassRef,
    /// Distance from the starting class (0 = the class itself).
    pub depth: usize,
}

// =============================================================================
// Class
// =============================================================================

/// Runtime class record.
///
/// # Thread Safety
///
/// The method table uses an RwLock for concurrent access. Name, parent,
/// metaclass and flags are immutable after construction.
pub struct Class {
    id: ClassId,
    name: Arc<str>,
    parent: Option<ClassRef>,
    meta: Option<ClassRef>,
    flags: ClassFlags,
    methods: MethodTable,
}

impl Class {
    /// Create a class with no parent.
    pub fn new_root(name: &str) -> ClassRef {
        Self::build(name, None)
    }

    /// Create a subclass of `parent`.
    ///
    /// The new class's metaclass inherits from the parent's metaclass, so
    /// class-side methods are inherited the same way instance methods are.
    pub fn new(name: &str, parent: &ClassRef) -> ClassRef {
        Self::build(name, Some(parent))
    }

    fn build(name: &str, parent: Option<&ClassRef>) -> ClassRef {
        let name: Arc<str> = Arc::from(name);
        let root = if parent.is_none() {
            ClassFlags::ROOT
        } else {
            ClassFlags::empty()
        };

        let meta_parent = parent.and_then(|p| p.meta.clone());
        let mut meta_flags = ClassFlags::META;
        if meta_parent.is_none() {
            meta_flags |= ClassFlags::ROOT;
        }
        let meta = Arc::new(Class {
            id: allocate_class_id(),
            name: name.clone(),
            flags: meta_flags,
            parent: meta_parent,
            meta: None,
            methods: MethodTable::default(),
        });

        Arc::new(Class {
            id: allocate_class_id(),
            name,
            parent: parent.cloned(),
            meta: Some(meta),
            flags: root,
            methods: MethodTable::default(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// The metaclass, or `None` if this record is itself a metaclass.
    #[inline]
    pub fn metaclass(&self) -> Option<&ClassRef> {
        self.meta.as_ref()
    }

    #[inline]
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    #[inline]
    pub fn is_meta(&self) -> bool {
        self.flags.contains(ClassFlags::META)
    }

    /// The raw own-method table.
    #[inline]
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// This class followed by every ancestor up to the root.
    pub fn ancestors(self: &Arc<Self>) -> Ancestors {
        let mut chain = Ancestors::new();
        let mut cursor = Some(self.clone());
        while let Some(class) = cursor {
            cursor = class.parent.clone();
            chain.push(class);
        }
        chain
    }

    /// Whether `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut cursor = Some(self);
        while let Some(class) = cursor {
            if class.id == other.id {
                return true;
            }
            cursor = class.parent.as_deref();
        }
        false
    }

    // =========================================================================
    // Method Definition
    // =========================================================================

    /// Define (or redefine) an instance method on this class.
    ///
    /// Meant for building classes before they are shared. Replacing entries
    /// on a live class goes through the interception installer, which
    /// serializes writers.
    pub fn define_method<F>(&self, name: &str, imp: F)
    where
        F: Fn(&Value, Selector, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.methods.insert(Selector::intern(name), Entry::new(imp));
    }

    /// Define a class-side method (an instance method of the metaclass).
    /// Ignored on metaclasses, which have no metaclass of their own.
    pub fn define_class_method<F>(&self, name: &str, imp: F)
    where
        F: Fn(&Value, Selector, &[Value]) -> Value + Send + Sync + 'static,
    {
        if let Some(meta) = &self.meta {
            meta.define_method(name, imp);
        }
    }

    /// Install `entry` as this class's own entry for `sel`, returning the
    /// displaced own entry.
    ///
    /// Unsynchronized raw write. Callers patching a live class must hold the
    /// engine's install lock; the engine only reaches this through its
    /// guard-taking accessor.
    #[doc(hidden)]
    pub fn replace_own_entry(&self, sel: Selector, entry: Entry) -> Option<Entry> {
        self.methods.insert(sel, entry)
    }

    // =========================================================================
    // Method Lookup
    // =========================================================================

    /// Entry defined directly on this class, ignoring ancestors.
    #[inline]
    pub fn own_entry(&self, sel: Selector) -> Option<Entry> {
        self.methods.get(sel)
    }

    /// Walk this class then its ancestors; first match wins.
    pub fn lookup(self: &Arc<Self>, sel: Selector) -> Option<MethodSlot> {
        let mut cursor = Some(self.clone());
        let mut depth = 0usize;
        while let Some(class) = cursor {
            if let Some(entry) = class.methods.get(sel) {
                return Some(MethodSlot {
                    entry,
                    defining_class: class,
                    depth,
                });
            }
            cursor = class.parent.clone();
            depth += 1;
        }
        None
    }

    /// Entry that a message send to an instance of this class would run.
    pub fn effective_entry(self: &Arc<Self>, sel: Selector) -> DispatchResult<Entry> {
        self.lookup(sel)
            .map(|slot| slot.entry)
            .ok_or_else(|| DispatchError::MessageNotFound {
                class: self.name.to_string(),
                selector: sel,
            })
    }

    /// Whether instances respond to `sel`, directly or by inheritance.
    pub fn responds_to(self: &Arc<Self>, sel: Selector) -> bool {
        self.lookup(sel).is_some()
    }
}

impl Drop for Class {
    /// Unlink the parent chain iteratively so dropping the last handle to a
    /// deep hierarchy does not recurse once per ancestor.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(class) = next {
            next = Arc::into_inner(class).and_then(|mut inner| inner.parent.take());
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("meta", &self.is_meta())
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .field("methods", &self.methods.len())
            .finish()
    }
}
