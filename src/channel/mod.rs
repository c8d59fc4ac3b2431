//! Exactly-once handoff primitives.
//!
//! The only channel this crate needs is the one-shot: a single-use,
//! single-producer/single-consumer cell that hands exactly one value (or
//! one failure) from a [`oneshot::Sender`] to a [`oneshot::Receiver`]. The
//! receiver polls; nothing ever blocks and nothing is woken.

pub mod oneshot;

pub use oneshot::{channel, channel_in, local_channel, Receiver, RecvError, Sender, Slot};
