//! # Core Framing Components
//!
//! Low-level integer coding and frame packing/unpacking.
//!
//! This module provides the foundation for the framing format: the VLQ
//! length codec, the streaming writer and reader, and the async codec.
//!
//! ## Components
//! - **vlq**: Big-endian base-128 integer codec for length prefixes
//! - **writer**: Push and pull producers of packed frame streams
//! - **reader**: Pull consumer yielding one bounded sub-source per frame
//! - **codec**: Tokio codec speaking the same format over async transports
//!
//! ## Wire Format
//! ```text
//! [VLQ(size) (1..N)] [Body(size)] [VLQ(size) (1..N)] [Body(size)] ...
//! ```
//!
//! ## Robustness
//! - Declared lengths are validated before body bytes are consumed
//! - End of stream at a frame boundary is a clean sentinel, not an error
//! - Truncation inside a prefix or body is always reported

pub mod codec;
pub mod reader;
pub mod vlq;
pub mod writer;
