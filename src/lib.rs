//! # framepack
//!
//! Self-describing binary framing: an unbounded variable-length-quantity
//! (VLQ) integer codec and a streaming packer/unpacker built on it. An
//! ordered sequence of opaque blobs becomes one byte stream, and comes
//! back out losslessly, one frame at a time, in order.
//!
//! ## Wire Format
//! ```text
//! stream := frame*
//! frame  := VLQ(size) byte{size}
//! ```
//!
//! No magic bytes, no version field, no checksums. The length prefix is
//! the only metadata; blob contents pass through untouched.
//!
//! ## Components
//! - [`FrameWriter`] / [`PackSource`]: push- and pull-style producers
//! - [`FrameReader`]: yields one bounded [`FrameCursor`] per frame
//! - [`FrameCodec`]: the same format over `Framed` async transports
//! - [`adapters`]: buffer and file-handle conveniences
//!
//! ## Quick Start
//! ```rust
//! use framepack::{FrameReader, FrameWriter};
//! use std::io::Read;
//!
//! # fn main() -> framepack::Result<()> {
//! let mut writer = FrameWriter::new(Vec::new());
//! writer.write_frame(b"alpha")?;
//! writer.write_frame(b"")?;
//! writer.write_frame(b"omega")?;
//! let packed = writer.into_inner();
//!
//! let mut reader = FrameReader::new(&packed[..]);
//! let mut bodies = Vec::new();
//! while let Some(mut frame) = reader.next_frame()? {
//!     let mut body = Vec::new();
//!     frame.read_to_end(&mut body)?;
//!     bodies.push(body);
//! }
//! assert_eq!(bodies, [&b"alpha"[..], &b""[..], &b"omega"[..]]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//! - Frames are recovered in write order, with exact lengths and contents
//! - End of stream at a frame boundary is `Ok(None)`, never an error
//! - A stream that ends inside a prefix or body reports truncation
//! - Memory stays O(1) in blob size for the streaming surfaces

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;

pub use crate::config::FramingConfig;
pub use crate::core::codec::FrameCodec;
pub use crate::core::reader::{FrameCursor, FrameReader};
pub use crate::core::writer::{FrameWriter, PackSource};
pub use crate::error::{FrameError, Result};
