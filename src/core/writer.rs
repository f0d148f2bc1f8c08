//! # Frame Writer
//!
//! Serializes ordered (length, blob) entries into the framed wire form:
//! each entry becomes a VLQ length prefix followed by exactly that many
//! body bytes, with nothing between frames.
//!
//! Two surfaces over the same emission logic:
//! - [`FrameWriter`] pushes frames into any [`Write`] sink
//! - [`PackSource`] is a [`Read`] that lazily produces the packed stream
//!   from an entry iterator, pulling body bytes on demand
//!
//! A blob source that ends before its declared length is a fatal
//! [`FrameError::ShortBlob`]: the prefix has already been committed to the
//! stream and cannot be retracted.

use crate::config::FramingConfig;
use crate::core::vlq;
use crate::error::{FrameError, Result};
use std::io::{self, Read, Write};
use tracing::{trace, warn};

/// Push-style writer producing the framed stream on a byte sink.
///
/// The writer never closes the sink; dropping it leaves the sink where the
/// last frame ended. Call [`flush`](FrameWriter::flush) before handing the
/// sink off.
pub struct FrameWriter<W: Write> {
    sink: W,
    copy_buf: Vec<u8>,
}

impl<W: Write> FrameWriter<W> {
    /// Create a writer with default configuration.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, &FramingConfig::default())
    }

    /// Create a writer with an explicit configuration.
    pub fn with_config(sink: W, config: &FramingConfig) -> Self {
        // Copy window is never empty, whatever the config says.
        let capacity = config.read_buffer_capacity.max(1);
        Self {
            sink,
            copy_buf: vec![0u8; capacity],
        }
    }

    /// Write one frame from an in-memory blob.
    ///
    /// Returns the total number of bytes emitted, prefix included.
    pub fn write_frame(&mut self, blob: &[u8]) -> Result<u64> {
        let mut prefix = Vec::with_capacity(vlq::MAX_GROUPS_U64);
        vlq::encode_u64_into(blob.len() as u64, &mut prefix);

        self.sink.write_all(&prefix)?;
        self.sink.write_all(blob)?;

        trace!(declared = blob.len() as u64, "frame written");
        Ok(prefix.len() as u64 + blob.len() as u64)
    }

    /// Write one frame, streaming `declared_len` body bytes from `source`.
    ///
    /// Exactly `declared_len` bytes are drawn; surplus bytes stay in the
    /// source. If the source ends early the stream is already poisoned by
    /// the committed prefix and [`FrameError::ShortBlob`] is returned.
    pub fn write_frame_from<R: Read>(&mut self, declared_len: u64, source: &mut R) -> Result<u64> {
        let mut prefix = Vec::with_capacity(vlq::MAX_GROUPS_U64);
        vlq::encode_u64_into(declared_len, &mut prefix);
        self.sink.write_all(&prefix)?;

        let mut remaining = declared_len;
        while remaining > 0 {
            let window = remaining.min(self.copy_buf.len() as u64) as usize;
            let read = match source.read(&mut self.copy_buf[..window]) {
                Ok(0) => {
                    let supplied = declared_len - remaining;
                    warn!(declared = declared_len, supplied, "blob source ended early");
                    return Err(FrameError::ShortBlob {
                        declared: declared_len,
                        supplied,
                    });
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FrameError::Io(e)),
            };
            self.sink.write_all(&self.copy_buf[..read])?;
            remaining -= read as u64;
        }

        trace!(declared = declared_len, "frame written");
        Ok(prefix.len() as u64 + declared_len)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Pull-style packed stream over an iterator of (length, source) entries.
///
/// Reads produce the same bytes [`FrameWriter`] would push: prefix, then
/// exactly the declared body length per entry. Entry sources are pulled
/// lazily, so memory stays bounded regardless of blob sizes. The stream is
/// forward-only; restarting means building a new `PackSource` over fresh
/// sources.
pub struct PackSource<I, R> {
    entries: I,
    state: PackState<R>,
}

enum PackState<R> {
    /// No frame in flight, next entry not yet taken
    Between,
    /// Emitting one frame: prefix first, then the body
    Emitting {
        prefix: Vec<u8>,
        prefix_pos: usize,
        body: R,
        declared: u64,
        remaining: u64,
    },
    /// Entry iterator exhausted or stream poisoned
    Finished,
}

impl<I, R> PackSource<I, R>
where
    I: Iterator<Item = (u64, R)>,
    R: Read,
{
    /// Create a packed stream over the given entries.
    pub fn new<T>(entries: T) -> Self
    where
        T: IntoIterator<Item = (u64, R), IntoIter = I>,
    {
        Self {
            entries: entries.into_iter(),
            state: PackState::Between,
        }
    }
}

impl<I, R> Read for PackSource<I, R>
where
    I: Iterator<Item = (u64, R)>,
    R: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match &mut self.state {
                PackState::Finished => return Ok(0),

                PackState::Between => match self.entries.next() {
                    None => {
                        self.state = PackState::Finished;
                        return Ok(0);
                    }
                    Some((declared, body)) => {
                        let mut prefix = Vec::with_capacity(vlq::MAX_GROUPS_U64);
                        vlq::encode_u64_into(declared, &mut prefix);
                        self.state = PackState::Emitting {
                            prefix,
                            prefix_pos: 0,
                            body,
                            declared,
                            remaining: declared,
                        };
                    }
                },

                PackState::Emitting {
                    prefix,
                    prefix_pos,
                    body,
                    declared,
                    remaining,
                } => {
                    if *prefix_pos < prefix.len() {
                        let n = (prefix.len() - *prefix_pos).min(buf.len());
                        buf[..n].copy_from_slice(&prefix[*prefix_pos..*prefix_pos + n]);
                        *prefix_pos += n;
                        return Ok(n);
                    }

                    if *remaining == 0 {
                        self.state = PackState::Between;
                        continue;
                    }

                    let window = (*remaining).min(buf.len() as u64) as usize;
                    match body.read(&mut buf[..window]) {
                        Ok(0) => {
                            let declared = *declared;
                            let supplied = declared - *remaining;
                            self.state = PackState::Finished;
                            return Err(FrameError::ShortBlob { declared, supplied }.into());
                        }
                        Ok(n) => {
                            *remaining -= n as u64;
                            return Ok(n);
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }
}
