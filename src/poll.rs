//! The result of one poll attempt and the polling contract.
//!
//! [`Async`] is the tagged outcome of a single non-blocking poll: either the
//! computation's value is present ([`Async::Ready`]) or it is not yet
//! produced ([`Async::NotReady`]). A full poll result, [`Poll`], wraps
//! `Async` in a `Result` so a poll can also report a propagated failure.
//!
//! The [`Future`] trait is the uniform contract this crate and anything
//! layered above it compose through. It is statically dispatched: consumers
//! take `F: Future` bounds, so `poll()` carries no runtime indirection and
//! stays monomorphized through combinator stacks.

use crate::error::PollError;

/// One poll attempt either fails with a propagated [`PollError`] or
/// succeeds with an [`Async`] outcome.
pub type Poll<T> = Result<Async<T>, PollError>;

/// The outcome of a single successful poll: the value, or not yet.
///
/// `NotReady` carries no payload, so a moved-from or default-constructed
/// `Async` is structurally empty; there is no stale ready flag to
/// double-release a payload through.
///
/// Cloning requires `T: Clone`; instantiating a clone of `Async<T>` for a
/// payload that cannot be cloned is a compile error, never a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Async<T> {
    /// The computation produced its value.
    Ready(T),
    /// The computation has not produced a value yet; poll again later.
    NotReady,
}

impl<T> Async<T> {
    /// Returns `true` if the value is present.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` if no value has been produced yet.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }

    /// Transforms a ready payload, passing `NotReady` through untouched.
    ///
    /// The closure is not invoked for `NotReady`.
    pub fn map<U, F>(self, f: F) -> Async<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ready(value) => Async::Ready(f(value)),
            Self::NotReady => Async::NotReady,
        }
    }

    /// Borrows the payload.
    ///
    /// # Panics
    ///
    /// Panics if the state is `NotReady`; asking a not-yet-produced value
    /// for its payload is a contract violation, not a recoverable failure.
    #[must_use]
    pub fn value(&self) -> &T {
        match self {
            Self::Ready(value) => value,
            Self::NotReady => panic!("a NotReady Async has no value to unwrap"),
        }
    }

    /// Mutably borrows the payload.
    ///
    /// # Panics
    ///
    /// Panics if the state is `NotReady`.
    #[must_use]
    pub fn value_mut(&mut self) -> &mut T {
        match self {
            Self::Ready(value) => value,
            Self::NotReady => panic!("a NotReady Async has no value to unwrap"),
        }
    }

    /// Moves the payload out.
    ///
    /// # Panics
    ///
    /// Panics if the state is `NotReady`.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::NotReady => panic!("a NotReady Async has no value to unwrap"),
        }
    }
}

impl<T> Default for Async<T> {
    fn default() -> Self {
        Self::NotReady
    }
}

/// A non-blocking, repeatedly pollable asynchronous computation.
///
/// `poll()` must return immediately, every time. It is called repeatedly by
/// an external driver until it yields a terminal result: `Ok(Ready(_))` or
/// `Err(_)`. What happens on a poll *after* a terminal result is up to the
/// implementation and must be documented per type; the implementations in
/// this crate panic, treating it as double consumption.
pub trait Future {
    /// The value this computation eventually produces.
    type Item;

    /// Attempts to drive the computation, never blocking.
    fn poll(&mut self) -> Poll<Self::Item>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_instances_are_equal() {
        assert_eq!(Async::<i32>::NotReady, Async::NotReady);
        assert_eq!(Async::<String>::default(), Async::NotReady);
    }

    #[test]
    fn ready_equality_follows_payload() {
        assert_eq!(Async::Ready(1), Async::Ready(1));
        assert_ne!(Async::Ready(1), Async::Ready(2));
        assert_ne!(Async::Ready(1), Async::NotReady);
    }

    #[test]
    fn map_transforms_ready() {
        let doubled = Async::Ready(21).map(|v| v * 2);
        assert_eq!(doubled, Async::Ready(42));
    }

    #[test]
    fn map_skips_not_ready() {
        let mapped = Async::<i32>::NotReady.map(|_| unreachable!("map must not run"));
        assert_eq!(mapped, Async::<()>::NotReady);
    }

    #[test]
    fn map_changes_payload_type() {
        let text = Async::Ready(7).map(|v| v.to_string());
        assert_eq!(text, Async::Ready("7".to_string()));
    }

    #[test]
    fn accessors_return_ready_payload() {
        let mut a = Async::Ready(5);
        assert_eq!(*a.value(), 5);
        *a.value_mut() += 1;
        assert_eq!(a.into_value(), 6);
    }

    #[test]
    #[should_panic(expected = "NotReady")]
    fn value_panics_on_not_ready() {
        let _ = Async::<i32>::NotReady.value();
    }

    #[test]
    #[should_panic(expected = "NotReady")]
    fn into_value_panics_on_not_ready() {
        let _ = Async::<i32>::NotReady.into_value();
    }

    #[test]
    fn clone_requires_cloneable_payload() {
        // Compiles because String is Clone; a non-Clone payload would fail
        // to instantiate this clone at compile time.
        let a = Async::Ready("x".to_string());
        let b = a.clone();
        assert_eq!(a, b);
    }
}
