//! # Frame Reader
//!
//! Recovers the ordered blob sequence from a framed byte stream. Each call
//! to [`FrameReader::next_frame`] decodes one VLQ length prefix and hands
//! out a [`FrameCursor`], a bounded reader over exactly that many body
//! bytes.
//!
//! ## Frame Sequencing
//! The reader tracks one tagged state:
//!
//! ```text
//! Idle ──prefix──▶ FrameOpen { remaining } ──drained──▶ Idle
//!   │                      │
//!   └──clean end──▶ Done ◀─┘ (errors also park here)
//! ```
//!
//! At most one frame is active at a time. The cursor's borrow enforces
//! that statically; dropping a cursor with unread bytes and advancing
//! anyway is caught at runtime as [`FrameError::SequencingViolation`].
//! Unread bytes are never skipped silently. To discard a frame on
//! purpose, drain its cursor first, e.g. with
//! `std::io::copy(&mut cursor, &mut std::io::sink())`.
//!
//! ## Buffering
//! Prefix decoding pulls single bytes from the source. Wrap unbuffered
//! sources such as raw files in a `BufReader`; the file adapters do this
//! with the configured capacity.

use crate::config::FramingConfig;
use crate::core::vlq;
use crate::error::{FrameError, Result};
use num_bigint::BigUint;
use std::fmt;
use std::io::{self, Read};
use tracing::{trace, warn};

/// Pull-based reader producing one bounded sub-source per frame.
///
/// Frames come back strictly in stream order. A clean end of input at a
/// frame boundary yields `Ok(None)` from [`next_frame`](Self::next_frame)
/// and keeps yielding it; input that ends inside a prefix or body is an
/// error, never a silent stop.
pub struct FrameReader<R> {
    source: R,
    state: ReadState,
    max_frame_len: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum ReadState {
    /// Between frames, next prefix not yet decoded
    Idle,
    /// A frame was issued and `remaining` of its body bytes are unread
    FrameOpen { declared: u64, remaining: u64 },
    /// Clean end of stream, or a decoding failure parked the reader
    Done,
}

impl<R: Read> FrameReader<R> {
    /// Create a reader with default configuration.
    pub fn new(source: R) -> Self {
        Self::with_config(source, &FramingConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(source: R, config: &FramingConfig) -> Self {
        Self {
            source,
            state: ReadState::Idle,
            max_frame_len: config.max_frame_len,
        }
    }

    /// Advance to the next frame.
    ///
    /// Returns `Ok(Some(cursor))` with a bounded reader over the frame
    /// body, or `Ok(None)` once the stream ends at a frame boundary.
    ///
    /// # Errors
    /// - [`FrameError::SequencingViolation`] if the previous frame still
    ///   has unread bytes
    /// - [`FrameError::TruncatedInteger`] if the stream ends mid-prefix
    /// - [`FrameError::OversizedFrame`] if the declared length exceeds
    ///   `u64` or the configured `max_frame_len`
    pub fn next_frame(&mut self) -> Result<Option<FrameCursor<'_, R>>> {
        match self.state {
            ReadState::Done => return Ok(None),
            ReadState::FrameOpen { remaining, .. } if remaining > 0 => {
                warn!(remaining, "advance attempted with an open frame");
                return Err(FrameError::SequencingViolation { remaining });
            }
            ReadState::FrameOpen { .. } | ReadState::Idle => {}
        }

        let declared = match vlq::decode(&mut self.source) {
            Ok(Some(value)) => value,
            Ok(None) => {
                trace!("clean end of stream");
                self.state = ReadState::Done;
                return Ok(None);
            }
            Err(e) => {
                self.state = ReadState::Done;
                return Err(e);
            }
        };

        let declared = match self.bound_declared_len(declared) {
            Ok(len) => len,
            Err(e) => {
                self.state = ReadState::Done;
                return Err(e);
            }
        };

        self.state = ReadState::FrameOpen {
            declared,
            remaining: declared,
        };
        trace!(declared, "frame opened");
        Ok(Some(FrameCursor { reader: self }))
    }

    /// Unread byte count of the open frame, `None` when no frame is open.
    pub fn frame_remaining(&self) -> Option<u64> {
        match self.state {
            ReadState::FrameOpen { remaining, .. } => Some(remaining),
            ReadState::Idle | ReadState::Done => None,
        }
    }

    /// Whether the reader has reached the end of the stream.
    ///
    /// True after a clean `Ok(None)` and after any decoding failure; the
    /// reader does not resume either way.
    pub fn is_done(&self) -> bool {
        matches!(self.state, ReadState::Done)
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Consume the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    // Declared lengths live in u64; anything wider, or above the
    // configured cap, is refused before any body byte is consumed.
    fn bound_declared_len(&self, declared: BigUint) -> Result<u64> {
        let limit = self.max_frame_len.unwrap_or(u64::MAX);
        match u64::try_from(&declared) {
            Ok(len) if len <= limit => Ok(len),
            _ => {
                warn!(limit, "oversized frame declaration refused");
                Err(FrameError::OversizedFrame { declared, limit })
            }
        }
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            ReadState::Idle => "Idle",
            ReadState::FrameOpen { .. } => "FrameOpen",
            ReadState::Done => "Done",
        }
    }
}

/// Bounded reader over one frame body.
///
/// Yields exactly the declared number of bytes, then reports end of input
/// regardless of what follows in the stream. A zero-length frame is born
/// exhausted. Dropping the cursor consumes nothing.
pub struct FrameCursor<'a, R> {
    reader: &'a mut FrameReader<R>,
}

impl<R: Read> FrameCursor<'_, R> {
    /// Length declared by the frame's prefix.
    pub fn declared_len(&self) -> u64 {
        match self.reader.state {
            ReadState::FrameOpen { declared, .. } => declared,
            ReadState::Idle | ReadState::Done => 0,
        }
    }

    /// Body bytes not yet read through this cursor.
    pub fn remaining(&self) -> u64 {
        self.reader.frame_remaining().unwrap_or(0)
    }

    /// Whether the frame body has been fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

// Reports cursor progress without demanding `Debug` of the source.
impl<R: Read> fmt::Debug for FrameCursor<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCursor")
            .field("declared_len", &self.declared_len())
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<R: Read> Read for FrameCursor<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (declared, remaining) = match self.reader.state {
            ReadState::FrameOpen {
                declared,
                remaining,
            } => (declared, remaining),
            ReadState::Idle | ReadState::Done => return Ok(0),
        };

        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let window = remaining.min(buf.len() as u64) as usize;
        match self.reader.source.read(&mut buf[..window]) {
            Ok(0) => {
                // The stream ended off a frame boundary.
                Err(FrameError::TruncatedFrame {
                    declared,
                    missing: remaining,
                }
                .into())
            }
            Ok(n) => {
                self.reader.state = ReadState::FrameOpen {
                    declared,
                    remaining: remaining - n as u64,
                };
                Ok(n)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_reads_frames_in_order() {
        let stream = [0x03, b'a', b'b', b'c', 0x01, b'z', 0x00];
        let mut reader = FrameReader::new(&stream[..]);

        let mut first = Vec::new();
        reader
            .next_frame()
            .expect("first prefix")
            .expect("first frame")
            .read_to_end(&mut first)
            .expect("first body");
        assert_eq!(first, b"abc");

        let mut second = Vec::new();
        reader
            .next_frame()
            .expect("second prefix")
            .expect("second frame")
            .read_to_end(&mut second)
            .expect("second body");
        assert_eq!(second, b"z");

        let third = reader.next_frame().expect("third prefix").expect("third frame");
        assert_eq!(third.declared_len(), 0);
        assert!(third.is_exhausted());

        assert!(matches!(reader.next_frame(), Ok(None)));
        assert_eq!(reader.state_name(), "Done");
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_end_of_stream_is_idempotent() {
        let mut reader = FrameReader::new(&[][..]);
        assert!(matches!(reader.next_frame(), Ok(None)));
        assert!(matches!(reader.next_frame(), Ok(None)));
        assert_eq!(reader.state_name(), "Done");
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_undrained_frame_blocks_advancement() {
        let stream = [0x03, b'a', b'b', b'c', 0x00];
        let mut reader = FrameReader::new(&stream[..]);

        let mut cursor = reader.next_frame().expect("prefix").expect("frame");
        let mut one = [0u8; 1];
        cursor.read_exact(&mut one).expect("partial body");
        drop(cursor);

        assert!(matches!(
            reader.next_frame(),
            Err(FrameError::SequencingViolation { remaining: 2 })
        ));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_zero_length_frames_never_block() {
        let stream = [0x00, 0x00, 0x01, b'q', 0x00];
        let mut reader = FrameReader::new(&stream[..]);
        let mut bodies = Vec::new();

        while let Some(mut cursor) = reader.next_frame().expect("prefix") {
            let mut body = Vec::new();
            cursor.read_to_end(&mut body).expect("body");
            bodies.push(body);
        }

        assert_eq!(bodies, vec![b"".to_vec(), b"".to_vec(), b"q".to_vec(), b"".to_vec()]);
    }

    #[test]
    fn test_truncated_prefix_is_an_error() {
        let mut reader = FrameReader::new(&[0x81u8][..]);
        assert!(matches!(
            reader.next_frame(),
            Err(FrameError::TruncatedInteger { consumed: 1 })
        ));
        // The reader parks; no phantom clean end on retry paths.
        assert!(matches!(reader.next_frame(), Ok(None)));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_truncated_body_is_an_error() {
        let stream = [0x05, b'a', b'b'];
        let mut reader = FrameReader::new(&stream[..]);

        let mut cursor = reader.next_frame().expect("prefix").expect("frame");
        let mut body = Vec::new();
        let err = match cursor.read_to_end(&mut body) {
            Err(e) => e,
            Ok(_) => panic!("truncated body must not succeed"),
        };
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_max_frame_len_refuses_before_body() {
        let config = FramingConfig::default_with_overrides(|c| c.max_frame_len = Some(2));
        let stream = [0x03, b'a', b'b', b'c'];
        let mut reader = FrameReader::with_config(&stream[..], &config);

        let err = match reader.next_frame() {
            Err(e) => e,
            Ok(_) => panic!("oversized declaration must not succeed"),
        };
        match err {
            FrameError::OversizedFrame { declared, limit } => {
                assert_eq!(declared, BigUint::from(3u32));
                assert_eq!(limit, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_cursor_stops_at_declared_boundary() {
        let stream = [0x02, b'a', b'b', 0x01, b'c', 0x00];
        let mut reader = FrameReader::new(&stream[..]);

        let mut cursor = reader.next_frame().expect("prefix").expect("frame");
        let mut body = vec![0u8; 16];
        let n = cursor.read(&mut body).expect("read");
        assert_eq!(n, 2);
        assert_eq!(cursor.read(&mut body).expect("eof"), 0);
        assert!(cursor.is_exhausted());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_cursor_debug_reports_progress() {
        let stream = [0x04, b'w', b'x', b'y', b'z'];
        let mut reader = FrameReader::new(&stream[..]);

        let mut cursor = reader.next_frame().expect("prefix").expect("frame");
        let mut one = [0u8; 1];
        cursor.read_exact(&mut one).expect("partial body");

        let rendered = format!("{cursor:?}");
        assert!(rendered.contains("declared_len: 4"));
        assert!(rendered.contains("remaining: 3"));
    }
}
