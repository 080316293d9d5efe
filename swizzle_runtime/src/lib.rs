//! Object model and native message dispatch for the swizzle engine.
//!
//! This crate provides:
//! - Interned selectors (process-stable method names)
//! - Dynamic values passed to and returned from methods
//! - Class records with a parent chain, a metaclass and an own method table
//! - Instances with instance variables
//! - `send`, the ordinary (unpatched) message-send path

pub mod dispatch;
pub mod object;
pub mod selector;
pub mod value;

// Re-export commonly used items
pub use dispatch::{DispatchError, DispatchResult, class_of, send, send_named};
pub use object::{
    Ancestors, Class, ClassFlags, ClassId, ClassRef, Entry, MethodSlot, Object, ObjectRef,
};
pub use selector::{Selector, selector_table};
pub use value::{FromValue, Value};
