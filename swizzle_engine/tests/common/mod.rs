//! Shared helpers for the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use swizzle_engine::{ClassRef, Entry, OriginalResolver, Selector, Value};
use swizzle_runtime::{Class, Object, send};

// =============================================================================
// Test Log
// =============================================================================

/// String accumulator that replacements append markers to.
///
/// Each test owns its own log so parallel tests never interleave.
#[derive(Clone, Default)]
pub struct TestLog(Arc<Mutex<String>>);

impl TestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, marker: &str) {
        self.0.lock().push_str(marker);
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    pub fn is(&self, expected: &str) -> bool {
        *self.0.lock() == expected
    }

    pub fn contents(&self) -> String {
        self.0.lock().clone()
    }
}

/// Assert the log holds exactly `expected`, then clear it.
#[track_caller]
pub fn assert_log_is(log: &TestLog, expected: &str) {
    assert_eq!(log.contents(), expected, "unexpected log");
    log.clear();
}

// =============================================================================
// Fixtures
// =============================================================================

/// Define `sel_name` on `class` so that it appends `marker` to `log`.
pub fn define_logging_method(class: &ClassRef, sel_name: &str, log: &TestLog, marker: &str) {
    let log = log.clone();
    let marker = marker.to_owned();
    class.define_method(sel_name, move |_, _, _| {
        log.log(&marker);
        Value::Nil
    });
}

/// Factory whose replacement logs `marker` and then calls the original.
pub fn logging_factory(
    log: &TestLog,
    marker: &str,
) -> impl FnOnce(OriginalResolver, &ClassRef, Selector) -> Entry + use<> {
    let log = log.clone();
    let marker = marker.to_owned();
    move |original, _, _| {
        Entry::new(move |recv, _, args| {
            log.log(&marker);
            original.call(recv, args)
        })
    }
}

/// Root class with a method logging the class name.
pub fn root_class(name: &str, sel_name: &str, log: &TestLog) -> ClassRef {
    let class = Class::new_root(name);
    define_logging_method(&class, sel_name, log, name);
    class
}

/// Send `sel_name` to a fresh instance of `class`.
pub fn send_to_instance(class: &ClassRef, sel_name: &str) -> Value {
    let obj = Value::Object(Object::new(class));
    send(&obj, Selector::intern(sel_name), &[]).expect("send failed")
}

/// Own entries of `class` and its metaclass, as (selector, entry address).
pub fn table_snapshot(class: &ClassRef) -> Vec<(Selector, usize)> {
    let mut out: Vec<_> = class
        .methods()
        .snapshot()
        .into_iter()
        .map(|(sel, entry)| (sel, entry.addr()))
        .collect();
    if let Some(meta) = class.metaclass() {
        out.extend(meta.methods().snapshot().into_iter().map(|(sel, entry)| (sel, entry.addr())));
    }
    out
}
