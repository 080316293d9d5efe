//! Original-implementation resolver.
//!
//! Every replacement receives an [`OriginalResolver`] bound to the
//! `(class, selector)` it was installed on. Calling [`OriginalResolver::fetch`]
//! yields the entry that would have run had the replacement not been there.
//!
//! # Semantics
//!
//! - If the class already had its own entry at install time, that displaced
//!   entry is the original. It belongs to the class and nothing else can
//!   replace it except another install on the same class, which in turn
//!   captures *this* replacement as its original.
//! - If the entry was inherited, the original is whatever the *parent's*
//!   chain resolves to at call time. The walk starts after the patched class,
//!   like `super()`, and is redone on every fetch, so patches layered on
//!   ancestors later are picked up.
//!
//! Fetching never takes the install lock and may happen from any thread, any
//! number of times, including from inside the replacement itself.
//!
//! The returned entry must be called with the same calling convention as the
//! patched method (receiver, selector, arguments). Nothing checks this.

use swizzle_runtime::{ClassRef, Entry, FromValue, Selector, Value};

/// Where the replaced entry comes from.
#[derive(Clone)]
enum Origin {
    /// The class's own entry at install time.
    Own(Entry),
    /// Inherited; re-resolved from the parent on each fetch.
    ///
    /// The install-time check guarantees the parent chain resolves the
    /// selector, and entries are never removed, so the parent walk always
    /// succeeds and `stub` is only a fallback that is never expected to run.
    /// It forwards the same way, so using it would not change the result.
    Inherited { stub: Entry },
}

/// Deferred handle to "whatever would otherwise have run".
#[derive(Clone)]
pub struct OriginalResolver {
    class: ClassRef,
    selector: Selector,
    origin: Origin,
}

impl OriginalResolver {
    /// Resolver for a class that had its own entry.
    pub(crate) fn own(class: ClassRef, selector: Selector, entry: Entry) -> Self {
        Self {
            class,
            selector,
            origin: Origin::Own(entry),
        }
    }

    /// Resolver for a class that only inherited `selector` from `parent`.
    pub(crate) fn inherited(class: ClassRef, parent: &ClassRef, selector: Selector) -> Self {
        Self {
            class,
            selector,
            origin: Origin::Inherited {
                stub: forwarding_stub(parent),
            },
        }
    }

    /// The class the replacement was installed on.
    #[inline]
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// The intercepted selector.
    #[inline]
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Whether the original comes from an ancestor.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        matches!(self.origin, Origin::Inherited { .. })
    }

    /// Resolve the original entry as of now.
    pub fn fetch(&self) -> Entry {
        match &self.origin {
            Origin::Own(entry) => entry.clone(),
            Origin::Inherited { stub } => self
                .class
                .parent()
                .and_then(|parent| parent.lookup(self.selector))
                .map(|slot| slot.entry)
                .unwrap_or_else(|| stub.clone()),
        }
    }

    /// Fetch the original and call it with the bound selector.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Value {
        self.fetch().call(receiver, self.selector, args)
    }

    /// [`call`](Self::call), converting the result. `None` when the original
    /// returned a different kind of value.
    pub fn call_as<T: FromValue>(&self, receiver: &Value, args: &[Value]) -> Option<T> {
        T::from_value(self.call(receiver, args))
    }
}

impl std::fmt::Debug for OriginalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginalResolver")
            .field("class", &self.class.name())
            .field("selector", &self.selector)
            .field("inherited", &self.is_inherited())
            .finish()
    }
}

/// Stub entry that invokes `parent`'s current effective entry with the same
/// arguments. Fallback only; see [`Origin::Inherited`].
fn forwarding_stub(parent: &ClassRef) -> Entry {
    let parent = parent.clone();
    Entry::new(move |receiver, sel, args| match parent.effective_entry(sel) {
        Ok(entry) => entry.call(receiver, sel, args),
        Err(err) => {
            tracing::error!(%err, "forwarding stub lost its ancestor entry");
            Value::Nil
        }
    })
}
