//! Resolve-once cell.
//!
//! A `ResolveOnce` starts pending and moves to resolved exactly once. The
//! first caller of `resolve_with` runs the producer while holding the lock;
//! every concurrent caller blocks until the value is stored and then reads
//! the same value. After resolution, reads never take the lock.

use std::fmt;
use std::sync::{Condvar, Mutex, PoisonError};

use once_cell::sync::OnceCell;

pub struct ResolveOnce<T> {
    lock: Mutex<()>,
    ready: Condvar,
    slot: OnceCell<T>,
}

impl<T> Default for ResolveOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResolveOnce<T> {
    pub fn new() -> Self {
        ResolveOnce {
            lock: Mutex::new(()),
            ready: Condvar::new(),
            slot: OnceCell::new(),
        }
    }

    /// A cell that is already resolved to `value`.
    pub fn resolved(value: T) -> Self {
        ResolveOnce {
            lock: Mutex::new(()),
            ready: Condvar::new(),
            slot: OnceCell::with_value(value),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The value, if resolution has completed.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Resolve by running `producer`, unless another caller already has.
    ///
    /// The producer runs at most once. A producer that re-enters the same
    /// cell deadlocks.
    pub fn resolve_with<F>(&self, producer: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.slot.get() {
            return value;
        }
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let value = self.slot.get_or_init(producer);
        self.ready.notify_all();
        value
    }

    /// Store `value` if the cell is still pending. Returns whether it was
    /// stored.
    pub fn try_resolve(&self, value: T) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = self.slot.set(value).is_ok();
        if stored {
            self.ready.notify_all();
        }
        stored
    }

    /// Block until some other caller resolves the cell.
    pub fn wait(&self) -> &T {
        if let Some(value) = self.slot.get() {
            return value;
        }
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(value) = self.slot.get() {
                return value;
            }
            guard = self
                .ready
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove the resolved value, leaving the cell pending.
    pub(crate) fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}

impl<T> fmt::Debug for ResolveOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_resolved() { "resolved" } else { "pending" };
        write!(f, "ResolveOnce({state})")
    }
}
