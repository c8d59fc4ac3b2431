//! Failure carrier and error types.
//!
//! Error handling in this crate follows two rules:
//!
//! - Every terminal outcome a consumer can observe (value, cancellation,
//!   broken promise, propagated failure) is an explicit, typed result
//!   returned from `poll()`, never a panic.
//! - Contract violations (unwrapping a not-ready value, extracting a
//!   promise's future twice, polling after consumption) are programmer
//!   errors and panic at the call site with a stable message.
//!
//! [`Failure`] is the type-erased carrier for propagated errors: any
//! `std::error::Error` payload behind reference-counted storage, so it is
//! cheap to clone and safe to hand across threads.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::channel::oneshot::RecvError;

/// A value, or the captured failure that prevented it.
///
/// This is the payload a [`Promise`](crate::Promise) hands through its
/// channel: `set_value` stores `Ok`, `set_error` stores `Err`.
pub type Try<T> = Result<T, Failure>;

/// A type-erased, cheaply clonable failure payload.
///
/// Holds any `std::error::Error + Send + Sync` value behind an `Arc`, so
/// propagating a failure to the consumer never copies the underlying error
/// and never requires it to be `Clone`.
#[derive(Clone)]
pub struct Failure(Arc<dyn StdError + Send + Sync + 'static>);

impl Failure {
    /// Wraps an error value.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Builds a failure from a plain message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self(Arc::new(MessageError(message.into())))
    }

    /// Borrows the underlying error.
    #[must_use]
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    /// Returns `true` if the underlying error is of type `E`.
    #[must_use]
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.0.is::<E>()
    }

    /// Downcasts the underlying error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

/// String-only payload backing [`Failure::msg`].
#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageError {}

/// The failure side of a [`Poll`](crate::Poll) result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PollError {
    /// The producer cancelled instead of resolving.
    #[error("promise was cancelled")]
    Cancelled,
    /// The producer was dropped without ever resolving.
    #[error("promise dropped before being resolved")]
    BrokenPromise,
    /// The producer resolved with a captured failure.
    #[error("{0}")]
    Failed(Failure),
}

impl PollError {
    /// Returns the propagated failure payload, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Cancelled | Self::BrokenPromise => None,
        }
    }
}

impl From<RecvError> for PollError {
    fn from(error: RecvError) -> Self {
        match error {
            RecvError::Cancelled => Self::Cancelled,
            RecvError::BrokenPromise => Self::BrokenPromise,
        }
    }
}
