//! Interception installer.
//!
//! Installs a replacement entry for `(class, selector)`, handing the
//! replacement factory an [`OriginalResolver`] so the new code can call
//! through to what would otherwise have run.
//!
//! # Algorithm
//!
//! All steps run under the process-wide install lock:
//!
//! 1. Ask the registry whether `mode`/`key` already satisfy this install;
//!    if so return `false`.
//! 2. Find the class's own entry. If there is none, the parent's chain must
//!    resolve the selector, otherwise fail with `MessageNotFound`.
//! 3. Without an own entry, synthesize a forwarding stub so the patch is
//!    scoped to this class and leaves siblings alone.
//! 4. Build the resolver for `(class, selector)`.
//! 5. Call the factory.
//! 6. Write the factory's entry as the class's own entry.
//! 7. Record `(class, key)`, whatever the mode.
//!
//! Steps 1 and 2 are the only ones that can fail or decline, and both run
//! before any write, so no caller ever sees a half-installed patch.
//!
//! # Factories
//!
//! The factory runs while the install lock is held. It must not call back
//! into the installer, including [`Swizzler::is_patched`] (that deadlocks),
//! and should only build the entry.
//! Replacement entries, by contrast, run without the lock and may send
//! messages or install further patches freely.

use crate::config::EngineConfig;
use crate::error::{InterceptError, InterceptResult};
use crate::lock::lock_installs;
use crate::mode::{SwizzleKey, SwizzleMode};
use crate::resolver::OriginalResolver;
use crate::table;
use std::sync::OnceLock;
use swizzle_runtime::{ClassRef, Entry, Selector, Value, class_of};

// =============================================================================
// Swizzler
// =============================================================================

/// Front end for installing replacements.
///
/// Every `Swizzler` shares the single process-wide install lock and patch
/// registry; the instance only carries configuration.
#[derive(Debug, Clone, Default)]
pub struct Swizzler {
    config: EngineConfig,
}

static GLOBAL_SWIZZLER: OnceLock<Swizzler> = OnceLock::new();

impl Swizzler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Process-wide swizzler configured from the environment.
    pub fn global() -> &'static Swizzler {
        GLOBAL_SWIZZLER.get_or_init(|| Swizzler::new(EngineConfig::from_env()))
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Instance Methods
    // =========================================================================

    /// Replace `sel` on `class` unconditionally.
    pub fn intercept<F>(&self, sel: Selector, class: &ClassRef, factory: F) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        self.install(class, sel, factory, SwizzleMode::Always, None)
    }

    /// Replace `sel` on `class` under `mode`, deduplicated by `key`.
    ///
    /// Returns `Ok(false)` when the registry says this install already
    /// happened. Modes other than `Always` need a key.
    pub fn intercept_with<F>(
        &self,
        sel: Selector,
        class: &ClassRef,
        factory: F,
        mode: SwizzleMode,
        key: Option<SwizzleKey>,
    ) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        self.install(class, sel, factory, mode, key)
    }

    /// [`intercept_with`](Self::intercept_with) using the configured
    /// default mode.
    pub fn intercept_keyed<F>(
        &self,
        sel: Selector,
        class: &ClassRef,
        factory: F,
        key: SwizzleKey,
    ) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        self.install(class, sel, factory, self.config.default_mode, Some(key))
    }

    // =========================================================================
    // Class-Side and Receiver-Driven
    // =========================================================================

    /// Replace the class-side method `sel` of `class`, i.e. patch its
    /// metaclass.
    pub fn intercept_class_method<F>(
        &self,
        sel: Selector,
        class: &ClassRef,
        factory: F,
        mode: SwizzleMode,
        key: Option<SwizzleKey>,
    ) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        let meta = class.metaclass().ok_or_else(|| InterceptError::NoMetaclass {
            class: class.name().to_owned(),
        })?;
        self.install(meta, sel, factory, mode, key)
    }

    /// Replace `sel` on the class that answers messages sent to `receiver`:
    /// an object's class, or a class value's metaclass.
    ///
    /// This patches the whole class, not just `receiver`.
    pub fn intercept_receiver<F>(
        &self,
        receiver: &Value,
        sel: Selector,
        factory: F,
        mode: SwizzleMode,
        key: Option<SwizzleKey>,
    ) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        let class = class_of(receiver)?;
        self.install(&class, sel, factory, mode, key)
    }

    /// Whether `(class, key)` has been recorded by a previous install.
    ///
    /// Takes the install lock, so like the `intercept*` methods it must not
    /// be called from inside a factory (that deadlocks).
    pub fn is_patched(&self, class: &ClassRef, key: SwizzleKey) -> bool {
        lock_installs().is_recorded(class.id(), key)
    }

    // =========================================================================
    // Install
    // =========================================================================

    fn install<F>(
        &self,
        class: &ClassRef,
        sel: Selector,
        factory: F,
        mode: SwizzleMode,
        key: Option<SwizzleKey>,
    ) -> InterceptResult<bool>
    where
        F: FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry,
    {
        if mode.requires_key() && key.is_none() {
            return Err(InterceptError::MissingKey { mode });
        }

        let mut guard = lock_installs();

        if guard.is_satisfied(class, key, mode) {
            tracing::trace!(
                class = class.name(),
                selector = %sel,
                %mode,
                "install skipped, already satisfied"
            );
            return Ok(false);
        }

        let resolver = match table::own_entry(class, sel) {
            Some(entry) => OriginalResolver::own(class.clone(), sel, entry),
            None => match class.parent() {
                Some(parent) if table::effective_entry(parent, sel).is_ok() => {
                    OriginalResolver::inherited(class.clone(), parent, sel)
                }
                _ => {
                    tracing::warn!(
                        class = class.name(),
                        selector = %sel,
                        "intercept target does not respond to selector"
                    );
                    return Err(not_found(class, sel));
                }
            },
        };
        let stub = resolver.is_inherited();

        let entry = factory(resolver, class, sel);
        table::set_own_entry(&guard, class, sel, entry);

        if let Some(key) = key {
            guard.record(class.id(), key);
        }
        drop(guard);

        if self.config.trace_installs {
            tracing::info!(
                class = class.name(),
                selector = %sel,
                %mode,
                stub,
                "installed replacement"
            );
        } else {
            tracing::debug!(
                class = class.name(),
                selector = %sel,
                %mode,
                stub,
                "installed replacement"
            );
        }
        Ok(true)
    }
}

fn not_found(class: &ClassRef, sel: Selector) -> InterceptError {
    InterceptError::MessageNotFound {
        class: class.name().to_owned(),
        selector: sel,
    }
}
