//! One-shot (single-use) handoff channel.
//!
//! A pair of handles over one shared cell. The sender resolves the cell at
//! most once, with a value or a cancellation, and the receiver polls the
//! cell until it observes a terminal outcome. Neither side ever blocks, and
//! no notification is delivered: cancellation and resolution alike are
//! discovered on the consumer's next poll.
//!
//! # State Machine
//!
//! ```text
//!              send            cancel          drop tx         drop rx
//! Empty ──────► Value   Empty ──► Cancelled   Empty ──► SenderGone
//!   │                                          Empty ──► ReceiverGone
//!   └─ every transition out of Empty is terminal; when a drop races a
//!      resolution, whichever commits first under the lock wins and the
//!      later action is a no-op
//! ```
//!
//! A delivered outcome (value, cancellation, broken promise) additionally
//! marks the cell consumed. Polling a consumed cell is double consumption
//! and panics.
//!
//! # Locking
//!
//! Every cell access goes through a [`Lock`] strategy chosen at
//! construction. With the default [`MutexLock`] the endpoints may live on
//! different threads; with [`LocalLock`](crate::lock::LocalLock) (see
//! [`local_channel`]) they are `!Send` and synchronization costs nothing.
//!
//! # Example
//!
//! ```
//! use handover::channel::oneshot;
//! use handover::Async;
//!
//! let (tx, mut rx) = oneshot::channel();
//!
//! assert_eq!(rx.poll(), Ok(Async::NotReady));
//! assert!(tx.send("ping"));
//! assert_eq!(rx.poll(), Ok(Async::Ready("ping")));
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::lock::{LocalLock, Lock, MutexLock};
use crate::poll::Async;

/// Error delivered by [`Receiver::poll`] when the cell terminated without a
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecvError {
    /// The sender cancelled instead of sending.
    #[error("one-shot channel was cancelled")]
    Cancelled,
    /// The sender was dropped without resolving.
    #[error("one-shot sender dropped without resolving")]
    BrokenPromise,
}

/// The shared cell both endpoints hold a handle to.
///
/// Opaque: it only exists in signatures so a custom [`Lock`] strategy can
/// be written against it.
#[derive(Debug)]
pub struct Slot<T> {
    state: State<T>,
}

#[derive(Debug)]
enum State<T> {
    /// No resolution committed yet.
    Empty,
    /// A value was sent and not yet collected.
    Value(T),
    /// The sender cancelled.
    Cancelled,
    /// The sender was dropped while the cell was still empty.
    SenderGone,
    /// The receiver was dropped; any later send is discarded.
    ReceiverGone,
    /// A terminal outcome was delivered through `poll`.
    Consumed,
}

/// Creates a connected sender/receiver pair over a mutex-guarded cell.
#[must_use]
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    channel_in::<T, MutexLock<Slot<T>>>()
}

/// Creates a connected pair over a caller-chosen lock strategy.
#[must_use]
pub fn channel_in<T, L: Lock<Slot<T>>>() -> (Sender<T, L>, Receiver<T, L>) {
    let shared = Arc::new(L::new(Slot {
        state: State::Empty,
    }));
    (
        Sender {
            shared: Arc::clone(&shared),
            _payload: PhantomData,
        },
        Receiver {
            shared,
            _payload: PhantomData,
        },
    )
}

/// Creates a connected pair for strictly single-threaded use.
///
/// The endpoints are `!Send`; handing one to another thread fails to
/// compile.
#[must_use]
pub fn local_channel<T>() -> (
    Sender<T, LocalLock<Slot<T>>>,
    Receiver<T, LocalLock<Slot<T>>>,
) {
    channel_in()
}

/// The producing half: resolves the cell at most once.
#[derive(Debug)]
pub struct Sender<T, L: Lock<Slot<T>> = MutexLock<Slot<T>>> {
    shared: Arc<L>,
    _payload: PhantomData<fn(T)>,
}

impl<T, L: Lock<Slot<T>>> Sender<T, L> {
    /// Attempts to store a value in the cell.
    ///
    /// Returns `true` iff the cell was still empty and this call resolved
    /// it. Returns `false` (dropping the value, raising nothing) if the
    /// cell was already resolved, cancelled, or the receiver is gone.
    pub fn send(&self, value: T) -> bool {
        self.shared.with(|slot| {
            if matches!(slot.state, State::Empty) {
                slot.state = State::Value(value);
                trace!("oneshot: value committed");
                true
            } else {
                trace!("oneshot: send rejected, cell already terminal");
                false
            }
        })
    }

    /// Records cancellation intent if the cell is still empty.
    ///
    /// Purely advisory: no wakeup is delivered, the receiver discovers the
    /// cancellation on its next poll. Returns `false` if the cell had
    /// already left the empty state.
    pub fn cancel(&self) -> bool {
        self.shared.with(|slot| {
            if matches!(slot.state, State::Empty) {
                slot.state = State::Cancelled;
                trace!("oneshot: cancel committed");
                true
            } else {
                false
            }
        })
    }

    /// Returns `true` while this sender can still resolve the cell.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared.with(|slot| matches!(slot.state, State::Empty))
    }
}

impl<T, L: Lock<Slot<T>>> Drop for Sender<T, L> {
    fn drop(&mut self) {
        self.shared.with(|slot| {
            if matches!(slot.state, State::Empty) {
                slot.state = State::SenderGone;
                trace!("oneshot: sender dropped unresolved");
            }
        });
    }
}

/// The consuming half: polls the cell until a terminal outcome arrives.
#[derive(Debug)]
pub struct Receiver<T, L: Lock<Slot<T>> = MutexLock<Slot<T>>> {
    shared: Arc<L>,
    _payload: PhantomData<fn() -> T>,
}

impl<T, L: Lock<Slot<T>>> Receiver<T, L> {
    /// Checks the cell without blocking.
    ///
    /// - `Ok(Async::NotReady)` while the cell is still empty; safe to
    ///   repeat indefinitely.
    /// - `Ok(Async::Ready(value))` exactly once when a value was sent; this
    ///   is the single consumption point.
    /// - `Err(RecvError::Cancelled)` if the sender cancelled.
    /// - `Err(RecvError::BrokenPromise)` if the sender was dropped without
    ///   resolving.
    ///
    /// Each terminal outcome is delivered exactly once.
    ///
    /// # Panics
    ///
    /// Panics if called again after a terminal outcome was delivered;
    /// polling past consumption is a contract violation.
    ///
    /// # Errors
    ///
    /// See above: the error conveys how the cell terminated without a
    /// value.
    pub fn poll(&mut self) -> Result<Async<T>, RecvError> {
        self.shared
            .with(|slot| match std::mem::replace(&mut slot.state, State::Consumed) {
                State::Empty => {
                    slot.state = State::Empty;
                    Ok(Async::NotReady)
                }
                State::Value(value) => {
                    trace!("oneshot: value delivered");
                    Ok(Async::Ready(value))
                }
                State::Cancelled => {
                    trace!("oneshot: cancellation delivered");
                    Err(RecvError::Cancelled)
                }
                State::SenderGone => {
                    trace!("oneshot: broken promise delivered");
                    Err(RecvError::BrokenPromise)
                }
                State::Consumed => {
                    panic!("one-shot receiver polled after a terminal outcome was delivered")
                }
                State::ReceiverGone => {
                    unreachable!("live receiver polled a cell marked receiver-gone")
                }
            })
    }

    /// Returns `true` while the cell is live and unconsumed from this
    /// receiver's point of view.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared
            .with(|slot| matches!(slot.state, State::Empty | State::Value(_)))
    }
}

impl<T, L: Lock<Slot<T>>> Drop for Receiver<T, L> {
    fn drop(&mut self) {
        self.shared.with(|slot| match slot.state {
            State::Empty | State::Value(_) => {
                slot.state = State::ReceiverGone;
                trace!("oneshot: receiver dropped");
            }
            State::Cancelled | State::SenderGone | State::ReceiverGone | State::Consumed => {}
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_polls_not_ready_repeatedly() {
        let (_tx, mut rx) = channel::<i32>();
        for _ in 0..100 {
            assert_eq!(rx.poll(), Ok(Async::NotReady));
        }
    }

    #[test]
    fn send_then_poll_delivers_once() {
        let (tx, mut rx) = channel();
        assert!(tx.send(42));
        assert_eq!(rx.poll(), Ok(Async::Ready(42)));
    }

    #[test]
    #[should_panic(expected = "polled after a terminal outcome")]
    fn poll_after_consumption_panics() {
        let (tx, mut rx) = channel();
        assert!(tx.send(1));
        let _ = rx.poll();
        let _ = rx.poll();
    }

    #[test]
    fn second_send_is_rejected() {
        let (tx, mut rx) = channel();
        assert!(tx.send(1));
        assert!(!tx.send(2));
        assert_eq!(rx.poll(), Ok(Async::Ready(1)));
    }

    #[test]
    fn cancel_wins_over_later_send() {
        let (tx, mut rx) = channel::<i32>();
        assert!(tx.cancel());
        assert!(!tx.send(5));
        assert_eq!(rx.poll(), Err(RecvError::Cancelled));
    }

    #[test]
    fn cancel_after_send_is_a_no_op() {
        let (tx, mut rx) = channel();
        assert!(tx.send(9));
        assert!(!tx.cancel());
        assert_eq!(rx.poll(), Ok(Async::Ready(9)));
    }

    #[test]
    fn dropped_sender_breaks_the_promise() {
        let (tx, mut rx) = channel::<i32>();
        drop(tx);
        assert_eq!(rx.poll(), Err(RecvError::BrokenPromise));
    }

    #[test]
    fn send_after_receiver_drop_is_rejected() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(!tx.send(7));
    }

    #[test]
    fn validity_tracks_cell_life() {
        let (tx, mut rx) = channel();
        assert!(tx.is_valid());
        assert!(rx.is_valid());

        assert!(tx.send(3));
        assert!(!tx.is_valid(), "resolved sender has spent its one shot");
        assert!(rx.is_valid(), "value still waiting to be collected");

        assert_eq!(rx.poll(), Ok(Async::Ready(3)));
        assert!(!rx.is_valid(), "cell consumed");
    }

    #[test]
    fn local_channel_works_without_a_mutex() {
        let (tx, mut rx) = local_channel();
        assert_eq!(rx.poll(), Ok(Async::NotReady));
        assert!(tx.send("same thread"));
        assert_eq!(rx.poll(), Ok(Async::Ready("same thread")));
    }

    #[test]
    fn value_is_moved_not_cloned() {
        #[derive(Debug, PartialEq)]
        struct NonClone(u8);

        let (tx, mut rx) = channel();
        assert!(tx.send(NonClone(9)));
        assert_eq!(rx.poll(), Ok(Async::Ready(NonClone(9))));
    }

    #[test]
    fn unsent_value_is_released_on_receiver_drop() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct CountsDrops(Arc<AtomicUsize>);
        impl Drop for CountsDrops {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = channel();
        assert!(tx.send(CountsDrops(Arc::clone(&drops))));
        drop(rx);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
