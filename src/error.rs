//! # Error Types
//!
//! Comprehensive error handling for the framing codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding framed streams, from low-level I/O errors to framing violations.
//!
//! ## Error Categories
//! - **I/O Errors**: Failures of the underlying byte source or sink
//! - **Encoding Errors**: Values that cannot be represented on the wire
//! - **Stream Errors**: Truncated prefixes and bodies, oversized declarations
//! - **Sequencing Errors**: Frame consumption out of protocol order
//!
//! All errors implement `std::error::Error` for interoperability. End of a
//! stream at a frame boundary is not an error; the decoding APIs report it
//! as `Ok(None)`.
//!
//! ## Example Usage
//! ```rust
//! use framepack::error::FrameError;
//! use framepack::core::vlq;
//!
//! fn classify(bytes: &[u8]) -> &'static str {
//!     match vlq::decode(&mut &bytes[..]) {
//!         Ok(Some(_)) => "complete integer",
//!         Ok(None) => "end of data",
//!         Err(FrameError::TruncatedInteger { .. }) => "cut off mid-integer",
//!         Err(_) => "other failure",
//!     }
//! }
//!
//! assert_eq!(classify(&[]), "end of data");
//! assert_eq!(classify(&[0x81, 0x00]), "complete integer");
//! assert_eq!(classify(&[0x81]), "cut off mid-integer");
//! ```

use num_bigint::BigUint;
use std::io;
use thiserror::Error;

// FrameError is the primary error type for all framing operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot encode a negative value as a length quantity")]
    NegativeValue,

    #[error("Length prefix truncated after {consumed} byte(s)")]
    TruncatedInteger { consumed: usize },

    #[error("Frame body truncated: declared {declared} bytes, {missing} missing")]
    TruncatedFrame { declared: u64, missing: u64 },

    #[error("Blob shorter than declared: promised {declared} bytes, supplied {supplied}")]
    ShortBlob { declared: u64, supplied: u64 },

    #[error("Previous frame still has {remaining} unread byte(s)")]
    SequencingViolation { remaining: u64 },

    #[error("Declared frame length {declared} exceeds limit of {limit} bytes")]
    OversizedFrame { declared: BigUint, limit: u64 },

    #[error("Length prefix did not terminate within {limit} groups")]
    PrefixTooLong { limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(inner) => inner,
            FrameError::TruncatedInteger { .. }
            | FrameError::TruncatedFrame { .. }
            | FrameError::ShortBlob { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

impl FrameError {
    /// Recover a framing error that crossed an `io::Error` boundary.
    ///
    /// The bounded readers surface their faults through the `Read`
    /// contract; this folds such an error back into its original variant
    /// instead of wrapping it a second time.
    pub fn from_io(err: io::Error) -> Self {
        match err.downcast::<FrameError>() {
            Ok(inner) => inner,
            Err(err) => FrameError::Io(err),
        }
    }
}

/// Type alias for Results using FrameError
pub type Result<T> = std::result::Result<T, FrameError>;
