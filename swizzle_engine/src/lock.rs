//! The process-wide install lock.
//!
//! One `parking_lot::Mutex` serializes every install in the process. Its
//! payload is the patch registry, so the registry can only be read or written
//! while the lock is held. The guard doubles as the capability the dispatch
//! table accessor demands before it writes an entry.
//!
//! Message sends and original lookups never take this lock.

use crate::registry::PatchRegistry;
use parking_lot::{Mutex, MutexGuard};
use std::sync::OnceLock;

/// Held for the duration of one install.
pub type InstallGuard<'a> = MutexGuard<'a, PatchRegistry>;

static INSTALL_LOCK: OnceLock<Mutex<PatchRegistry>> = OnceLock::new();

fn install_lock() -> &'static Mutex<PatchRegistry> {
    INSTALL_LOCK.get_or_init(|| Mutex::new(PatchRegistry::new()))
}

/// Acquire the install lock, blocking until it is free.
///
/// Not reentrant: acquiring it again on the same thread deadlocks.
pub fn lock_installs() -> InstallGuard<'static> {
    install_lock().lock()
}
