//! Pluggable locking strategy for the handoff cell.
//!
//! The one-shot channel never touches its shared cell except through a
//! [`Lock`], so the synchronization cost is chosen at construction time:
//!
//! - [`MutexLock`] (the default) is a real mutual-exclusion lock and makes
//!   the channel endpoints safe to split across threads.
//! - [`LocalLock`] is `RefCell`-backed for strictly single-threaded
//!   pipelines. Endpoints built over it are `!Send`, so moving one to
//!   another thread is a compile error rather than a data race.
//!
//! A custom strategy (a spinlock, an instrumented lock) only has to provide
//! scoped exclusive access with guaranteed release.

use std::cell::RefCell;

/// Scoped exclusive access to a value.
///
/// `with` must provide the closure exclusive access to the value and
/// release that access when the closure returns, including on panic.
pub trait Lock<T> {
    /// Wraps an initial value.
    fn new(value: T) -> Self;

    /// Runs `f` with exclusive access to the value.
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

/// The default strategy: a mutual-exclusion lock.
///
/// Backed by `parking_lot::Mutex`, so there is no poisoning to handle and
/// the uncontended path is a single atomic exchange.
#[derive(Debug)]
pub struct MutexLock<T> {
    inner: parking_lot::Mutex<T>,
}

impl<T> Lock<T> for MutexLock<T> {
    fn new(value: T) -> Self {
        Self {
            inner: parking_lot::Mutex::new(value),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

/// The single-threaded strategy: no atomics, no lock.
///
/// Exclusive access is checked by `RefCell` borrow counting. Re-entrant use
/// from within a `with` closure is a programmer error and panics.
#[derive(Debug)]
pub struct LocalLock<T> {
    inner: RefCell<T>,
}

impl<T> Lock<T> for LocalLock<T> {
    fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}
