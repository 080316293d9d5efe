//! Runtime method interception.
//!
//! Installs replacement implementations for `(class, selector)` pairs in the
//! `swizzle_runtime` object model. A replacement receives an
//! [`OriginalResolver`] through which it can call whatever would otherwise
//! have run, resolved at call time so later patches on ancestors are seen.
//!
//! This crate provides:
//! - The installer ([`Swizzler`] and the `intercept*` free functions)
//! - Idempotent installs keyed by [`SwizzleKey`] under a [`SwizzleMode`]
//! - The patch registry and the process-wide install lock
//! - The dispatch table accessor used by the installer
//!
//! # Example
//!
//! ```
//! use swizzle_engine::{Entry, Selector, Value, intercept};
//! use swizzle_runtime::{Class, Object, send};
//!
//! let counter = Class::new_root("Counter");
//! counter.define_method("value", |_, _, _| Value::Int(41));
//!
//! let sel = Selector::intern("value");
//! intercept(sel, &counter, |original, _, _| {
//!     Entry::new(move |recv, _, args| {
//!         Value::Int(original.call_as::<i64>(recv, args).unwrap_or(0) + 1)
//!     })
//! })
//! .unwrap();
//!
//! let obj = Value::Object(Object::new(&counter));
//! assert_eq!(send(&obj, sel, &[]).unwrap(), Value::Int(42));
//! ```

pub mod config;
pub mod error;
pub mod installer;
pub mod lock;
pub mod mode;
pub mod registry;
pub mod resolver;
pub mod table;

pub use config::EngineConfig;
pub use error::{InterceptError, InterceptResult};
pub use installer::Swizzler;
pub use mode::{ParseModeError, SwizzleKey, SwizzleMode};
pub use registry::PatchRegistry;
pub use resolver::OriginalResolver;

// Re-export the object model types a replacement needs
pub use swizzle_runtime::{ClassRef, Entry, Selector, Value};

// =============================================================================
// Global Entry Points
// =============================================================================

/// Replace `sel` on `class` unconditionally, using the global swizzler.
pub fn intercept<F>(sel: Selector, class: &ClassRef, factory: F) -> InterceptResult<bool>
where
    F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
{
    Swizzler::global().intercept(sel, class, factory)
}

/// Replace `sel` on `class` under `mode`/`key`, using the global swizzler.
pub fn intercept_with<F>(
    sel: Selector,
    class: &ClassRef,
    factory: F,
    mode: SwizzleMode,
    key: Option<SwizzleKey>,
) -> InterceptResult<bool>
where
    F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
{
    Swizzler::global().intercept_with(sel, class, factory, mode, key)
}

/// Replace the class-side method `sel` of `class`, using the global
/// swizzler.
pub fn intercept_class_method<F>(
    sel: Selector,
    class: &ClassRef,
    factory: F,
    mode: SwizzleMode,
    key: Option<SwizzleKey>,
) -> InterceptResult<bool>
where
    F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
{
    Swizzler::global().intercept_class_method(sel, class, factory, mode, key)
}
