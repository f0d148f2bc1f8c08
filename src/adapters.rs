//! # Stream Adapters
//!
//! Ergonomic surfaces over the frame writer and reader for the common
//! cases: in-memory buffers and seekable file handles. No wire behavior
//! lives here; every adapter produces or consumes exactly the format the
//! core components speak.
//!
//! ## Buffer Helpers
//! - [`pack_to_vec`] frames a sequence of in-memory blobs
//! - [`unpack_from_slice`] recovers zero-copy sub-slice views
//! - [`unpack_to_vecs`] drains any byte source into owned blobs
//!
//! ## File Helpers
//! - [`remaining_len`] measures a handle from its position to the end
//! - [`pack_seekable_sources`] frames each handle's remaining bytes
//! - [`read_file_frames`] opens a framed file behind a buffered reader

use crate::config::FramingConfig;
use crate::core::reader::FrameReader;
use crate::core::vlq;
use crate::core::writer::FrameWriter;
use crate::error::{FrameError, Result};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Pack in-memory blobs into a single framed buffer.
///
/// The declared length of each frame is the blob's own length, so this
/// cannot fail.
pub fn pack_to_vec<I, B>(blobs: I) -> Vec<u8>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for blob in blobs {
        let blob = blob.as_ref();
        vlq::encode_u64_into(blob.len() as u64, &mut out);
        out.extend_from_slice(blob);
    }
    out
}

/// Unpack a framed buffer into zero-copy views of its blobs.
///
/// The returned slices borrow from `buf`; nothing is copied.
pub fn unpack_from_slice(mut buf: &[u8]) -> Result<Vec<&[u8]>> {
    let mut blobs = Vec::new();

    loop {
        let (declared_big, consumed) = match vlq::decode_slice(buf)? {
            Some(pair) => pair,
            None => return Ok(blobs),
        };

        let body_len = u64::try_from(&declared_big)
            .ok()
            .and_then(|len| usize::try_from(len).ok());
        let body_len = match body_len {
            Some(len) => len,
            None => {
                return Err(FrameError::OversizedFrame {
                    declared: declared_big,
                    limit: u64::MAX,
                });
            }
        };

        buf = &buf[consumed..];
        if buf.len() < body_len {
            return Err(FrameError::TruncatedFrame {
                declared: body_len as u64,
                missing: (body_len - buf.len()) as u64,
            });
        }

        let (body, rest) = buf.split_at(body_len);
        blobs.push(body);
        buf = rest;
    }
}

/// Drain a framed byte source into owned blobs, in stream order.
pub fn unpack_to_vecs<R: Read>(source: R) -> Result<Vec<Vec<u8>>> {
    unpack_to_vecs_with_config(source, &FramingConfig::default())
}

/// [`unpack_to_vecs`] honoring an explicit configuration.
pub fn unpack_to_vecs_with_config<R: Read>(
    source: R,
    config: &FramingConfig,
) -> Result<Vec<Vec<u8>>> {
    let mut reader = FrameReader::with_config(source, config);
    let mut blobs = Vec::new();

    while let Some(mut cursor) = reader.next_frame()? {
        // Pre-allocation trusts the declared length only up to 1 MiB.
        let mut body = Vec::with_capacity(cursor.declared_len().min(1 << 20) as usize);
        cursor.read_to_end(&mut body).map_err(FrameError::from_io)?;
        blobs.push(body);
    }

    Ok(blobs)
}

/// Distance from the handle's current position to its end.
///
/// The position is restored before returning, so the handle reads the
/// same bytes afterwards.
pub fn remaining_len<S: Seek>(source: &mut S) -> io::Result<u64> {
    let current = source.stream_position()?;
    let end = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(current))?;
    Ok(end.saturating_sub(current))
}

/// Pack each handle's remaining bytes as one frame onto `sink`.
///
/// The declared length of every frame is taken from [`remaining_len`], so
/// handles may sit mid-file. Returns the total bytes written.
pub fn pack_seekable_sources<I, S, W>(sources: I, sink: W) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: Read + Seek,
    W: Write,
{
    pack_seekable_sources_with_config(sources, sink, &FramingConfig::default())
}

/// [`pack_seekable_sources`] honoring an explicit configuration.
pub fn pack_seekable_sources_with_config<I, S, W>(
    sources: I,
    sink: W,
    config: &FramingConfig,
) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: Read + Seek,
    W: Write,
{
    let mut writer = FrameWriter::with_config(sink, config);
    let mut total = 0u64;

    for mut source in sources {
        let declared = remaining_len(&mut source)?;
        total += writer.write_frame_from(declared, &mut source)?;
    }

    writer.flush()?;
    Ok(total)
}

/// Open a framed file for reading with default configuration.
pub fn read_file_frames<P: AsRef<Path>>(path: P) -> Result<FrameReader<BufReader<File>>> {
    read_file_frames_with_config(path, &FramingConfig::default())
}

/// [`read_file_frames`] honoring an explicit configuration.
pub fn read_file_frames_with_config<P: AsRef<Path>>(
    path: P,
    config: &FramingConfig,
) -> Result<FrameReader<BufReader<File>>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening framed file");

    let file = File::open(path)?;
    let buffered = BufReader::with_capacity(config.read_buffer_capacity.max(1), file);
    Ok(FrameReader::with_config(buffered, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_unpack_views_borrow_from_input() {
        let packed = pack_to_vec([&b"alpha"[..], &b"beta"[..]]);
        let views = unpack_from_slice(&packed).expect("unpack");

        assert_eq!(views, [&b"alpha"[..], &b"beta"[..]]);
        // Views point into the packed buffer, no copies.
        assert_eq!(views[0].as_ptr(), packed[1..].as_ptr());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_remaining_len_restores_position() {
        let mut handle = Cursor::new(b"0123456789".to_vec());
        handle.set_position(4);

        assert_eq!(remaining_len(&mut handle).expect("measure"), 6);
        assert_eq!(handle.position(), 4);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_pack_seekable_sources_uses_remaining_bytes() {
        let mut first = Cursor::new(b"skip-me:payload".to_vec());
        first.set_position(8);
        let second = Cursor::new(b"tail".to_vec());

        let mut packed = Vec::new();
        let written =
            pack_seekable_sources(vec![first, second], &mut packed).expect("pack");

        assert_eq!(packed, pack_to_vec([&b"payload"[..], &b"tail"[..]]));
        assert_eq!(written, packed.len() as u64);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_unpack_to_vecs_recovers_truncation_kind() {
        // Prefix declares five body bytes, stream carries two.
        let err = match unpack_to_vecs(&[0x05u8, b'a', b'b'][..]) {
            Err(e) => e,
            Ok(_) => panic!("truncated stream must not succeed"),
        };
        assert!(matches!(
            err,
            FrameError::TruncatedFrame {
                declared: 5,
                missing: 3
            }
        ));
    }
}
