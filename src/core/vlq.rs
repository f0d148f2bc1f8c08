//! # Variable-Length Quantity Codec
//!
//! Conversion between unbounded non-negative integers and the big-endian
//! base-128 wire form used for frame length prefixes.
//!
//! ## Wire Format
//! ```text
//! [1qqqqqqq] [1qqqqqqq] ... [0qqqqqqq]
//! ```
//!
//! Seven value bits per byte, most significant group first. Bit 7 marks a
//! group as non-final; the last group has it clear. Encodings are minimal:
//! no redundant leading `0x80` groups, and zero is the single byte `0x00`.
//!
//! ## Magnitudes
//! Values are [`BigUint`], so prefixes are not limited to machine integers.
//! Decoding widens the accumulator by seven bits per input byte and cannot
//! overflow.
//!
//! ## End of Data vs. Truncation
//! A source that is exhausted *before* the first group is a clean end of
//! data and decodes to `Ok(None)`. A source that ends *between* the first
//! group and the final one delivered an incomplete integer and fails with
//! [`FrameError::TruncatedInteger`].

use crate::error::{FrameError, Result};
use num_bigint::{BigInt, BigUint, Sign};
use std::io::{self, Read};

/// Flag bit marking a group as non-final
pub const CONTINUATION_BIT: u8 = 0x80;

/// Mask selecting the seven value bits of a group
pub const PAYLOAD_MASK: u8 = 0x7f;

/// Number of groups sufficient for any length that fits in `u64`
pub const MAX_GROUPS_U64: usize = 10;

/// Encode a non-negative integer into its VLQ byte sequence.
pub fn encode(value: &BigUint) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Encode a non-negative integer, appending the groups to `out`.
pub fn encode_into(value: &BigUint, out: &mut Vec<u8>) {
    // Base-128 digits are exactly the 7-bit groups, most significant first.
    // `to_radix_be` yields `[0]` for zero, which is the required `[0x00]`.
    let mut groups = value.to_radix_be(128);
    let last = groups.len() - 1;
    for group in &mut groups[..last] {
        *group |= CONTINUATION_BIT;
    }
    out.extend_from_slice(&groups);
}

/// Encode a machine-width length without big-integer allocation.
///
/// Produces byte-identical output to [`encode`] for the same value; this is
/// the path writers take for declared frame lengths.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_GROUPS_U64);
    encode_u64_into(value, &mut out);
    out
}

/// Encode a machine-width length, appending the groups to `out`.
pub fn encode_u64_into(value: u64, out: &mut Vec<u8>) {
    let mut groups = [0u8; MAX_GROUPS_U64];
    let mut start = MAX_GROUPS_U64 - 1;
    groups[start] = (value & u64::from(PAYLOAD_MASK)) as u8;
    let mut rest = value >> 7;
    while rest != 0 {
        start -= 1;
        groups[start] = (rest & u64::from(PAYLOAD_MASK)) as u8 | CONTINUATION_BIT;
        rest >>= 7;
    }
    out.extend_from_slice(&groups[start..]);
}

/// Encode a signed integer, rejecting negative values.
///
/// The wire form has no sign bit; a negative input is a caller error and
/// returns [`FrameError::NegativeValue`] before any byte is produced.
pub fn encode_signed(value: &BigInt) -> Result<Vec<u8>> {
    if value.sign() == Sign::Minus {
        return Err(FrameError::NegativeValue);
    }
    Ok(encode(value.magnitude()))
}

/// Decode one VLQ integer from a byte source.
///
/// Returns `Ok(None)` when the source is exhausted before the first group,
/// `Ok(Some(value))` after the final group, and
/// [`FrameError::TruncatedInteger`] when the source ends mid-integer.
pub fn decode<R: Read>(source: &mut R) -> Result<Option<BigUint>> {
    let mut value = BigUint::from(0u32);
    let mut consumed = 0usize;

    loop {
        let group = match read_group(source)? {
            Some(byte) => byte,
            None if consumed == 0 => return Ok(None),
            None => return Err(FrameError::TruncatedInteger { consumed }),
        };
        consumed += 1;

        value = (value << 7u32) + u32::from(group & PAYLOAD_MASK);
        if group & CONTINUATION_BIT == 0 {
            return Ok(Some(value));
        }
    }
}

/// Decode one VLQ integer from a slice, reporting the bytes consumed.
///
/// `Ok(Some((value, consumed)))` leaves `buf[consumed..]` positioned at the
/// first byte after the integer. An empty slice is a clean `Ok(None)`; a
/// non-empty slice without a final group is [`FrameError::TruncatedInteger`].
pub fn decode_slice(buf: &[u8]) -> Result<Option<(BigUint, usize)>> {
    let mut value = BigUint::from(0u32);

    for (index, &group) in buf.iter().enumerate() {
        value = (value << 7u32) + u32::from(group & PAYLOAD_MASK);
        if group & CONTINUATION_BIT == 0 {
            return Ok(Some((value, index + 1)));
        }
    }

    if buf.is_empty() {
        Ok(None)
    } else {
        Err(FrameError::TruncatedInteger { consumed: buf.len() })
    }
}

// Single-byte read that rides out EINTR. Ok(None) is end of source.
fn read_group<R: Read>(source: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(FrameError::Io(e)),
        }
    }
}
