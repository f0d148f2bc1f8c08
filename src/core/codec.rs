//! # Async Frame Codec
//!
//! [`Decoder`]/[`Encoder`] implementation speaking the same wire format as
//! the synchronous reader and writer, for use with `Framed` transports.
//! Bytes packed by [`FrameWriter`](crate::core::writer::FrameWriter) decode
//! here unchanged, and vice versa.
//!
//! Decoding is incremental: the codec waits until a complete prefix and
//! body are buffered, then extracts the body without copying via
//! `split_to(..).freeze()`.
//!
//! Unlike the synchronous reader, which decodes prefixes of any magnitude
//! before refusing ones that exceed `u64`, this codec refuses a prefix
//! that has not terminated within [`vlq::MAX_GROUPS_U64`] groups. Buffer
//! growth stays bounded against hostile input, and every minimal encoding
//! of a representable length still fits.
//!
//! ## Example
//! ```no_run
//! use bytes::Bytes;
//! use framepack::core::codec::FrameCodec;
//! use futures::SinkExt;
//! use tokio_util::codec::Framed;
//!
//! # async fn demo() -> framepack::error::Result<()> {
//! let (client, _server) = tokio::io::duplex(256);
//! let mut framed = Framed::new(client, FrameCodec::default());
//! framed.send(Bytes::from_static(b"payload")).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::FramingConfig;
use crate::core::vlq;
use crate::error::{FrameError, Result};
use bytes::{Bytes, BytesMut};
use num_bigint::BigUint;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Codec framing opaque byte payloads with a VLQ length prefix.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    max_frame_len: Option<u64>,
}

impl FrameCodec {
    /// Create a codec with no length cap beyond what fits in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec honoring the configured `max_frame_len`.
    pub fn with_config(config: &FramingConfig) -> Self {
        Self {
            max_frame_len: config.max_frame_len,
        }
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        // Locate the final prefix group: the first byte with bit 7 clear.
        let prefix_end = match src
            .iter()
            .take(vlq::MAX_GROUPS_U64)
            .position(|b| b & vlq::CONTINUATION_BIT == 0)
        {
            Some(pos) => pos,
            None if src.len() >= vlq::MAX_GROUPS_U64 => {
                return Err(FrameError::PrefixTooLong {
                    limit: vlq::MAX_GROUPS_U64,
                });
            }
            None => return Ok(None),
        };
        let prefix_len = prefix_end + 1;

        let declared_big = match vlq::decode_slice(&src[..prefix_len])? {
            Some((value, _)) => value,
            None => return Ok(None),
        };

        let limit = self.max_frame_len.unwrap_or(u64::MAX);
        let body_len = u64::try_from(&declared_big)
            .ok()
            .filter(|len| *len <= limit)
            .and_then(|len| usize::try_from(len).ok());
        let body_len = match body_len {
            Some(len) => len,
            None => {
                return Err(FrameError::OversizedFrame {
                    declared: declared_big,
                    limit,
                });
            }
        };

        if src.len() - prefix_len < body_len {
            // Reserve the rest of the frame so the transport can fill it
            // without regrowing the buffer. Trust the declared length only
            // up to 1 MiB; a hostile declaration must not force a giant
            // allocation before its bytes arrive.
            let frame_total = prefix_len.saturating_add(body_len);
            src.reserve(frame_total.saturating_sub(src.len()).min(1 << 20));
            return Ok(None);
        }

        let _ = src.split_to(prefix_len);
        let body = src.split_to(body_len).freeze();
        trace!(declared = body.len() as u64, "frame decoded");
        Ok(Some(body))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => match vlq::decode_slice(src)? {
                // Complete prefix, body cut short by the EOF.
                Some((declared_big, consumed)) => {
                    let buffered = (src.len() - consumed) as u64;
                    let declared = u64::try_from(&declared_big).unwrap_or(u64::MAX);
                    Err(FrameError::TruncatedFrame {
                        declared,
                        missing: declared - buffered,
                    })
                }
                None => Ok(None),
            },
        }
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        let declared = item.len() as u64;
        if let Some(limit) = self.max_frame_len {
            if declared > limit {
                return Err(FrameError::OversizedFrame {
                    declared: BigUint::from(declared),
                    limit,
                });
            }
        }

        let mut prefix = Vec::with_capacity(vlq::MAX_GROUPS_U64);
        vlq::encode_u64_into(declared, &mut prefix);

        dst.reserve(prefix.len() + item.len());
        dst.extend_from_slice(&prefix);
        dst.extend_from_slice(&item);
        Ok(())
    }
}
