//! Instance objects.
//!
//! An [`Object`] is an instance of a [`Class`]. Its class is fixed at
//! creation; message sends to it resolve through that class's ancestor chain.
//! Instance variables live in a small selector-keyed map.

use crate::object::class::ClassRef;
use crate::selector::Selector;
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared handle to an instance.
pub type ObjectRef = Arc<Object>;

/// Global counter for object ids (debug output only).
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Instance of a class.
pub struct Object {
    id: u64,
    class: ClassRef,
    ivars: RwLock<FxHashMap<Selector, Value>>,
}

impl Object {
    /// Allocate a new instance of `class`.
    pub fn new(class: &ClassRef) -> ObjectRef {
        Arc::new(Self {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: class.clone(),
            ivars: RwLock::new(FxHashMap::default()),
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The instance's class.
    #[inline]
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Read an instance variable; `Nil` when unset.
    pub fn get(&self, name: &str) -> Value {
        self.ivars
            .read()
            .get(&Selector::intern(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Write an instance variable, returning the previous value.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.ivars.write().insert(Selector::intern(name), value.into())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .finish()
    }
}
