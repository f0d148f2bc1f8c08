#![no_main]

use bytes::BytesMut;
use framepack::adapters::unpack_to_vecs;
use framepack::core::codec::FrameCodec;
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

// Drives the codec with input split into small slabs. On streams the codec
// accepts in full, the blocking reader must recover identical frames.
fuzz_target!(|data: &[u8]| {
    // First byte picks the slab size so the corpus explores fragmentation
    // patterns; the rest is the wire stream.
    let step = data.first().map_or(1, |b| usize::from(*b) % 7 + 1);
    let payload = &data[data.len().min(1)..];

    let mut codec = FrameCodec::new();
    let mut buffer = BytesMut::new();
    let mut frames: Vec<Vec<u8>> = Vec::new();
    let mut failed = false;

    for chunk in payload.chunks(step) {
        buffer.extend_from_slice(chunk);
        loop {
            match codec.decode(&mut buffer) {
                Ok(Some(frame)) => frames.push(frame.to_vec()),
                Ok(None) => break,
                Err(_) => {
                    failed = true;
                    break;
                }
            }
        }
        if failed {
            break;
        }
    }

    if !failed {
        loop {
            match codec.decode_eof(&mut buffer) {
                Ok(Some(frame)) => frames.push(frame.to_vec()),
                Ok(None) => break,
                Err(_) => {
                    failed = true;
                    break;
                }
            }
        }
    }

    if !failed {
        let blobs = unpack_to_vecs(payload).expect("codec-clean stream must unpack");
        assert_eq!(blobs, frames);
    }
});
