//! Newline-delimited text frames: the smallest real codec.

use bytes::{BufMut, BytesMut};

use super::{Decoder, Encoder};

/// Decode failures for [`LineCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineCodecError {
    /// A line grew past the configured limit without a terminator.
    #[error("line exceeds the configured maximum length")]
    LineTooLong,
    /// The line's bytes are not valid UTF-8.
    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// Frames `\n`-terminated (optionally `\r\n`-terminated) UTF-8 lines.
///
/// The terminator is stripped from decoded frames and appended to encoded
/// ones. An unterminated line longer than the limit is rejected rather
/// than buffered forever.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line: usize,
}

impl LineCodec {
    /// A codec with no practical line-length limit.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_line(usize::MAX)
    }

    /// A codec rejecting lines longer than `max_line` bytes (terminator
    /// excluded).
    #[must_use]
    pub const fn with_max_line(max_line: usize) -> Self {
        Self { max_line }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LineCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, LineCodecError> {
        let Some(terminator) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > self.max_line {
                return Err(LineCodecError::LineTooLong);
            }
            return Ok(None);
        };

        if terminator > self.max_line {
            return Err(LineCodecError::LineTooLong);
        }

        let mut line = src.split_to(terminator + 1);
        line.truncate(terminator);
        if line.ends_with(b"\r") {
            line.truncate(line.len() - 1);
        }

        String::from_utf8(line.to_vec())
            .map(Some)
            .map_err(|_| LineCodecError::NotUtf8)
    }
}

impl Encoder<String> for LineCodec {
    type Error = LineCodecError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), LineCodecError> {
        if line.len() > self.max_line {
            return Err(LineCodecError::LineTooLong);
        }
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
