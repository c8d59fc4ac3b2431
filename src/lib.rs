//! Handover: poll-driven promise/future primitives over an exactly-once
//! one-shot handoff channel.
//!
//! # Overview
//!
//! Handover is the foundation layer for cooperative, non-blocking
//! asynchronous pipelines. A producer ([`Promise`]) hands exactly one value
//! or failure to a consumer ([`PromiseFuture`]) that repeatedly polls rather
//! than blocks. There is no executor, no waker, and no callback scheduling
//! in this crate: an external driver invokes [`Future::poll`] until it
//! observes a terminal result.
//!
//! # Core Guarantees
//!
//! - **Exactly-once delivery**: exactly one of `set_value`, `set_error`, or
//!   `cancel` ever takes effect per promise; later attempts report `false`
//!   and change nothing
//! - **Never blocks**: `poll()` always returns immediately with one of
//!   not-ready, ready, or failure
//! - **No silent loss**: dropping an unresolved producer surfaces
//!   [`PollError::BrokenPromise`] on the consumer's next poll
//! - **Cooperative cancellation**: `cancel()` records intent only; the
//!   consumer observes it on its next poll, nothing is preempted
//! - **Pluggable locking**: the handoff cell is guarded by a [`Lock`]
//!   strategy: a real mutex for cross-thread use, or a [`LocalLock`] that
//!   makes single-threaded pipelines `!Send` at zero synchronization cost
//!
//! # Module Structure
//!
//! - [`poll`]: the [`Async`] poll result and the [`Future`] contract
//! - [`error`]: the [`Failure`] carrier, [`Try`], and [`PollError`]
//! - [`lock`]: the pluggable [`Lock`] strategy
//! - [`channel`]: the exactly-once one-shot handoff channel
//! - [`promise`]: [`Promise`] and [`PromiseFuture`]
//! - [`codec`]: the frame [`Decoder`]/[`Encoder`] contract for protocol
//!   layers built above this core
//!
//! # Example
//!
//! ```
//! use handover::{Async, Future, Promise};
//!
//! let mut promise = Promise::new();
//! let mut future = promise.future();
//!
//! // Nothing resolved yet: polling is safe to repeat indefinitely.
//! assert_eq!(future.poll().unwrap(), Async::NotReady);
//!
//! assert!(promise.set_value(7));
//! assert_eq!(future.poll().unwrap(), Async::Ready(7));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

pub mod channel;
pub mod codec;
pub mod error;
pub mod lock;
pub mod poll;
pub mod promise;

pub use channel::oneshot::RecvError;
pub use codec::{Decoder, Encoder};
pub use error::{Failure, PollError, Try};
pub use lock::{LocalLock, Lock, MutexLock};
pub use poll::{Async, Future, Poll};
pub use promise::{LocalPromise, Promise, PromiseFuture};
