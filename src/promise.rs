//! The producer/consumer pair built on the one-shot channel.
//!
//! A [`Promise`] owns a freshly connected sender/receiver pair whose
//! payload is a [`Try`]: the producer resolves with either a value
//! (`set_value`) or a captured failure (`set_error`), or it cancels. The
//! consumer side is extracted once with [`Promise::future`] and polled by
//! whatever drives the pipeline until a terminal result arrives.
//!
//! # Exactly-Once Resolution
//!
//! Exactly one of `set_value` / `set_error` / `cancel` takes effect per
//! promise. The losers of that race report `false` and have no observable
//! effect on the future's outcome. Dropping a promise that never resolved
//! delivers [`PollError::BrokenPromise`] to the paired future's next poll.
//!
//! # Example
//!
//! ```
//! use handover::{Future, PollError, Promise};
//!
//! let mut promise = Promise::new();
//! let mut future = promise.future();
//!
//! assert!(promise.cancel());
//! assert!(!promise.set_value(1), "resolution already committed");
//! assert!(matches!(future.poll(), Err(PollError::Cancelled)));
//! ```

use crate::channel::oneshot::{self, Receiver, Sender, Slot};
use crate::error::{Failure, PollError, Try};
use crate::lock::{LocalLock, Lock, MutexLock};
use crate::poll::{Async, Future, Poll};

/// A `Promise` over a [`LocalLock`]ed cell, for single-threaded pipelines.
pub type LocalPromise<T> = Promise<T, LocalLock<Slot<Try<T>>>>;

/// The producing side of a single asynchronously computed result.
#[derive(Debug)]
pub struct Promise<T, L: Lock<Slot<Try<T>>> = MutexLock<Slot<Try<T>>>> {
    sender: Sender<Try<T>, L>,
    receiver: Option<Receiver<Try<T>, L>>,
}

impl<T> Promise<T> {
    /// Creates a promise whose cell is guarded by the default mutex.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in()
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, L: Lock<Slot<Try<T>>>> Promise<T, L> {
    /// Creates a promise over a caller-chosen lock strategy.
    #[must_use]
    pub fn new_in() -> Self {
        let (sender, receiver) = oneshot::channel_in::<Try<T>, L>();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// Extracts the consumer side as a pollable future.
    ///
    /// Ownership of the receiving end moves into the returned future, so
    /// this succeeds at most once per promise.
    ///
    /// # Panics
    ///
    /// Panics with an invalid-promise-state message if called a second
    /// time, or if the receiving end is no longer usable.
    pub fn future(&mut self) -> PromiseFuture<T, L> {
        let receiver = self
            .receiver
            .take()
            .filter(Receiver::is_valid)
            .expect("invalid promise state: future already extracted");
        PromiseFuture {
            inner: Inner::Pending(receiver),
        }
    }

    /// Resolves the promise with a value.
    ///
    /// Returns `true` iff this call committed the resolution; `false` means
    /// an earlier resolution, a cancellation, or a dropped consumer already
    /// settled the cell and the value was discarded.
    pub fn set_value(&self, value: T) -> bool {
        self.sender.send(Ok(value))
    }

    /// Resolves the promise with a captured failure.
    ///
    /// The failure reaches the consumer as [`PollError::Failed`]. Returns
    /// the same boolean as [`set_value`](Self::set_value).
    pub fn set_error(&self, error: impl Into<Failure>) -> bool {
        self.sender.send(Err(error.into()))
    }

    /// Cancels the promise if it is still unresolved.
    ///
    /// Advisory only: the consumer observes [`PollError::Cancelled`] on its
    /// next poll, nothing is interrupted. Returns `false` if a resolution
    /// already committed.
    pub fn cancel(&self) -> bool {
        self.sender.cancel()
    }
}

/// The consuming side: a [`Future`] that is either pending on the channel
/// or ready-made from an existing [`Try`].
#[derive(Debug)]
pub struct PromiseFuture<T, L: Lock<Slot<Try<T>>> = MutexLock<Slot<Try<T>>>> {
    inner: Inner<T, L>,
}

#[derive(Debug)]
enum Inner<T, L: Lock<Slot<Try<T>>>> {
    /// Waiting on the paired promise.
    Pending(Receiver<Try<T>, L>),
    /// Built from an already-available result; no channel involved.
    Ready(Try<T>),
    /// A terminal result was handed out.
    Done,
}

impl<T> PromiseFuture<T> {
    /// Builds a future that is ready with `value` on its first poll.
    #[must_use]
    pub fn ready(value: T) -> Self {
        Self::from_try(Ok(value))
    }

    /// Builds a future that fails with `failure` on its first poll.
    #[must_use]
    pub fn failed(failure: Failure) -> Self {
        Self::from_try(Err(failure))
    }

    /// Builds a ready-made future from an existing result.
    #[must_use]
    pub fn from_try(result: Try<T>) -> Self {
        Self {
            inner: Inner::Ready(result),
        }
    }
}

impl<T, L: Lock<Slot<Try<T>>>> Future for PromiseFuture<T, L> {
    type Item = T;

    /// # Panics
    ///
    /// Panics if polled again after yielding a terminal result; both the
    /// pending and the ready-made form are single-consumption.
    fn poll(&mut self) -> Poll<T> {
        match std::mem::replace(&mut self.inner, Inner::Done) {
            Inner::Pending(mut receiver) => match receiver.poll() {
                Ok(Async::NotReady) => {
                    self.inner = Inner::Pending(receiver);
                    Ok(Async::NotReady)
                }
                Ok(Async::Ready(Ok(value))) => Ok(Async::Ready(value)),
                Ok(Async::Ready(Err(failure))) => Err(PollError::Failed(failure)),
                Err(error) => Err(error.into()),
            },
            Inner::Ready(Ok(value)) => Ok(Async::Ready(value)),
            Inner::Ready(Err(failure)) => Err(PollError::Failed(failure)),
            Inner::Done => panic!("promise future polled after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn unresolved_promise_polls_not_ready() {
        let mut promise = Promise::<u8>::new();
        let mut future = promise.future();
        for _ in 0..10 {
            assert!(matches!(future.poll(), Ok(Async::NotReady)));
        }
    }

    #[test]
    fn set_value_reaches_the_future() {
        let mut promise = Promise::new();
        let mut future = promise.future();
        assert!(promise.set_value(42));
        assert_eq!(future.poll().unwrap(), Async::Ready(42));
    }

    #[test]
    fn set_error_reaches_the_future_as_failure() {
        let mut promise = Promise::<u8>::new();
        let mut future = promise.future();
        assert!(promise.set_error(io::Error::other("backend went away")));

        let err = future.poll().unwrap_err();
        let failure = err.failure().expect("propagated failure");
        assert!(failure.is::<io::Error>());
        assert_eq!(failure.to_string(), "backend went away");
    }

    #[test]
    #[should_panic(expected = "invalid promise state")]
    fn second_future_extraction_panics() {
        let mut promise = Promise::<u8>::new();
        let _future = promise.future();
        let _ = promise.future();
    }

    #[test]
    fn only_the_first_resolution_takes_effect() {
        let mut promise = Promise::new();
        let mut future = promise.future();

        assert!(promise.set_value(1));
        assert!(!promise.set_value(2));
        assert!(!promise.set_error(Failure::msg("late")));
        assert!(!promise.cancel());

        assert_eq!(future.poll().unwrap(), Async::Ready(1));
    }

    #[test]
    fn cancel_then_set_value_is_rejected() {
        let mut promise = Promise::<u8>::new();
        let mut future = promise.future();

        assert!(promise.cancel());
        assert!(!promise.set_value(3));
        assert!(matches!(future.poll(), Err(PollError::Cancelled)));
    }

    #[test]
    fn dropping_the_promise_breaks_it() {
        let mut promise = Promise::<u8>::new();
        let mut future = promise.future();
        drop(promise);
        assert!(matches!(future.poll(), Err(PollError::BrokenPromise)));
    }

    #[test]
    fn ready_made_future_needs_no_channel() {
        let mut future = PromiseFuture::ready(7);
        assert_eq!(future.poll().unwrap(), Async::Ready(7));
    }

    #[test]
    fn failed_future_delivers_its_failure() {
        let mut future = PromiseFuture::<u8>::failed(Failure::msg("doomed"));
        let err = future.poll().unwrap_err();
        assert_eq!(err.to_string(), "doomed");
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn ready_made_future_is_single_consumption() {
        let mut future = PromiseFuture::ready(1);
        let _ = future.poll();
        let _ = future.poll();
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn pending_future_is_single_consumption_too() {
        let mut promise = Promise::new();
        let mut future = promise.future();
        assert!(promise.set_value(5));
        let _ = future.poll();
        let _ = future.poll();
    }

    #[test]
    fn local_promise_resolves_on_one_thread() {
        let mut promise = LocalPromise::<&str>::new_in();
        let mut future = promise.future();
        assert!(matches!(future.poll(), Ok(Async::NotReady)));
        assert!(promise.set_value("no mutex here"));
        assert_eq!(future.poll().unwrap(), Async::Ready("no mutex here"));
    }

    #[test]
    fn map_composes_over_a_polled_result() {
        let mut promise = Promise::new();
        let mut future = promise.future();
        assert!(promise.set_value(10));

        let outcome = future.poll().unwrap().map(|v| v * 3);
        assert_eq!(outcome, Async::Ready(30));
    }
}
