//! Method entries.
//!
//! An [`Entry`] is the callable stored in a class's method table for one
//! selector. It is invoked with the receiver, the selector it was dispatched
//! under and the argument slice.

use crate::selector::Selector;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every method implementation.
pub type ImpFn = dyn Fn(&Value, Selector, &[Value]) -> Value + Send + Sync;

/// A method implementation bound into a method table.
///
/// Cloning is cheap (one `Arc` bump) and clones share identity.
#[derive(Clone)]
pub struct Entry {
    imp: Arc<ImpFn>,
}

impl Entry {
    /// Wrap a closure as an entry.
    pub fn new<F>(imp: F) -> Self
    where
        F: Fn(&Value, Selector, &[Value]) -> Value + Send + Sync + 'static,
    {
        Self { imp: Arc::new(imp) }
    }

    /// Entry that ignores its inputs and returns a fixed value.
    pub fn constant(value: Value) -> Self {
        Self::new(move |_, _, _| value.clone())
    }

    /// Invoke the implementation.
    #[inline]
    pub fn call(&self, receiver: &Value, sel: Selector, args: &[Value]) -> Value {
        (self.imp)(receiver, sel, args)
    }

    /// Whether two entries are the same implementation.
    #[inline]
    pub fn ptr_eq(a: &Entry, b: &Entry) -> bool {
        Arc::ptr_eq(&a.imp, &b.imp)
    }

    /// Address of the implementation, stable for the entry's lifetime.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.imp) as *const () as usize
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({:#x})", self.addr())
    }
}
