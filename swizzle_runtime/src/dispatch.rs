//! Native message dispatch.
//!
//! `send` is the runtime's ordinary message-send path: find the receiver's
//! dynamic class, walk its ancestor chain for the selector and call the first
//! entry found. It takes no install lock; table reads are short `RwLock`
//! read sections that end before the entry runs.
//!
//! # Receivers
//!
//! | Value | Dispatch class |
//! |---|---|
//! | `Object(obj)` | `obj.class()` |
//! | `Class(cls)` | `cls.metaclass()` (class-side methods) |
//! | anything else | not a receiver |

use crate::object::class::ClassRef;
use crate::selector::Selector;
use crate::value::Value;
use thiserror::Error;

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Errors raised by native dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No class in the receiver's chain defines the selector.
    #[error("'{class}' does not respond to '{selector}'")]
    MessageNotFound { class: String, selector: Selector },

    /// The value cannot receive messages.
    #[error("cannot send messages to a {kind} value")]
    NotAReceiver { kind: &'static str },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

// =============================================================================
// Dispatch
// =============================================================================

/// The class whose method tables answer messages sent to `receiver`.
pub fn class_of(receiver: &Value) -> DispatchResult<ClassRef> {
    match receiver {
        Value::Object(obj) => Ok(obj.class().clone()),
        Value::Class(class) => class
            .metaclass()
            .cloned()
            .ok_or(DispatchError::NotAReceiver { kind: "metaclass" }),
        other => Err(DispatchError::NotAReceiver { kind: other.kind() }),
    }
}

/// Send `sel` with `args` to `receiver`.
pub fn send(receiver: &Value, sel: Selector, args: &[Value]) -> DispatchResult<Value> {
    let class = class_of(receiver)?;
    let entry = class.effective_entry(sel)?;
    Ok(entry.call(receiver, sel, args))
}

/// Send by name, interning the selector.
pub fn send_named(receiver: &Value, name: &str, args: &[Value]) -> DispatchResult<Value> {
    send(receiver, Selector::intern(name), args)
}
