//! Ordered listener registry and notification passes.
//!
//! A notification pass works on a copy of the registry taken when the pass starts:
//! - listeners added during the pass wait for the next event;
//! - listeners removed during the pass still receive the current event, but no later ones;
//! - fire-once entries leave the registry before they are invoked.

use std::{
    cell::RefCell,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use crate::InsetSnapshot;

type ListenerFn = dyn Fn(&InsetSnapshot) -> Result<(), String>;

/// Cloneable listener handle; clones compare equal and remove each other.
#[derive(Clone)]
pub struct InsetsListener {
    callback: Rc<ListenerFn>,
}

impl InsetsListener {
    /// Wraps a fallible callback. A returned error is logged and does not stop delivery.
    pub fn new(callback: impl Fn(&InsetSnapshot) -> Result<(), String> + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Wraps a callback that cannot fail.
    pub fn from_fn(callback: impl Fn(&InsetSnapshot) + 'static) -> Self {
        Self::new(move |insets| {
            callback(insets);
            Ok(())
        })
    }

    /// Returns whether both handles point at the same callback.
    pub fn same_listener(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }

    fn call(&self, insets: &InsetSnapshot) -> Result<(), String> {
        (self.callback)(insets)
    }
}

impl PartialEq for InsetsListener {
    fn eq(&self, other: &Self) -> bool {
        self.same_listener(other)
    }
}

impl Eq for InsetsListener {}

impl std::fmt::Debug for InsetsListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsetsListener")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerKind {
    Persistent,
    Once,
}

#[derive(Debug, Clone)]
struct ListenerEntry {
    id: u64,
    kind: ListenerKind,
    listener: InsetsListener,
}

/// Ordered listener registry; duplicates are allowed and delivered once per registration.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerRegistry {
    /// Appends a persistent listener.
    pub fn add(&mut self, listener: InsetsListener) {
        self.push(ListenerKind::Persistent, listener);
    }

    /// Appends a listener that is removed before its first delivery runs.
    pub(crate) fn add_once(&mut self, listener: InsetsListener) {
        self.push(ListenerKind::Once, listener);
    }

    /// Removes the first registration of `listener`. Returns `false` when it was not registered.
    pub fn remove(&mut self, listener: &InsetsListener) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.listener.same_listener(listener))
        else {
            return false;
        };
        self.entries.remove(index);
        true
    }

    /// Number of registrations, fire-once entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops fire-once entries that never got a delivery.
    pub(crate) fn remove_once_entries(&mut self) {
        self.entries.retain(|entry| entry.kind != ListenerKind::Once);
    }

    fn push(&mut self, kind: ListenerKind, listener: InsetsListener) {
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(ListenerEntry {
            id: self.next_id,
            kind,
            listener,
        });
    }

    fn snapshot(&self) -> Vec<ListenerEntry> {
        self.entries.clone()
    }

    fn take_entry(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }
}

/// Runs one notification pass for `insets`.
///
/// No registry borrow is held while a listener runs, so listeners may add or remove
/// registrations, including their own.
pub(crate) fn notify_listeners(registry: &RefCell<ListenerRegistry>, insets: &InsetSnapshot) {
    let pass = registry.borrow().snapshot();
    for entry in pass {
        if entry.kind == ListenerKind::Once && !registry.borrow_mut().take_entry(entry.id) {
            continue;
        }
        deliver(&entry, insets);
    }
}

/// Calls one listener and logs its failure.
///
/// Returned errors are always isolated. A panic is only caught on targets that unwind;
/// `wasm32-unknown-unknown` aborts instead.
fn deliver(entry: &ListenerEntry, insets: &InsetSnapshot) {
    match catch_unwind(AssertUnwindSafe(|| entry.listener.call(insets))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(listener = entry.id, "insets listener failed: {err}"),
        Err(_) => tracing::warn!(listener = entry.id, "insets listener panicked"),
    }
}
