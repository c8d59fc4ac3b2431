//! Frame codec contract for protocol layers built above the futures core.
//!
//! Protocol handlers do not talk to this crate's channel directly; they sit
//! behind a pair of narrow traits. [`Decoder`] turns an accumulating byte
//! buffer into frames, tolerating partial input (`Ok(None)` means "feed me
//! more bytes"). [`Encoder`] serializes one outbound message into a buffer.
//! Both error types convert into [`Failure`] so a driver can propagate any
//! codec error through a [`PromiseFuture`](crate::PromiseFuture) unchanged.
//!
//! The framing driver that owns the buffers and the I/O is an external
//! collaborator; this module only fixes the seam it composes through.

pub mod line;

pub use line::{LineCodec, LineCodecError};

use bytes::BytesMut;

use crate::error::Failure;

/// Incremental, partial-frame-safe decoding of bytes into frames.
pub trait Decoder {
    /// The frame type produced.
    type Item;

    /// The decode failure type; convertible into the crate-wide [`Failure`]
    /// carrier.
    type Error: Into<Failure>;

    /// Attempts to extract one frame from the front of `src`.
    ///
    /// Consumed bytes must be removed from `src`. Returning `Ok(None)`
    /// signals that `src` does not yet hold a complete frame and decoding
    /// should resume once more bytes arrive; it must not consume partial
    /// frame bytes in a way that loses them.
    ///
    /// # Errors
    ///
    /// A decode error means the byte stream is corrupt from this codec's
    /// point of view; the driver decides whether the connection survives.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error>;
}

/// Serialization of one outbound message into a byte buffer.
pub trait Encoder<Item> {
    /// The encode failure type; convertible into the crate-wide [`Failure`]
    /// carrier.
    type Error: Into<Failure>;

    /// Appends the wire form of `item` to `dst`.
    ///
    /// # Errors
    ///
    /// An encode error means `item` cannot be represented by this codec.
    fn encode(&mut self, item: Item, dst: &mut BytesMut) -> Result<(), Self::Error>;
}
