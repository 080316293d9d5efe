//! Object model: classes, instances and method entries.

pub mod class;
pub mod entry;
pub mod instance;

pub use class::{Ancestors, Class, ClassFlags, ClassId, ClassRef, MethodSlot, MethodTable};
pub use entry::{Entry, ImpFn};
pub use instance::{Object, ObjectRef};
