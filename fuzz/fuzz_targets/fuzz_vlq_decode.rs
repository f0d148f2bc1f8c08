#![no_main]

use framepack::core::vlq;
use framepack::error::FrameError;
use libfuzzer_sys::fuzz_target;

// The streaming and sliced decoders must agree on every input, and whatever
// either recovers must re-encode no longer than what was read.
fuzz_target!(|data: &[u8]| {
    let streamed = vlq::decode(&mut &data[..]);
    let sliced = vlq::decode_slice(data);

    match (streamed, sliced) {
        (Ok(None), Ok(None)) => assert!(data.is_empty()),
        (Ok(Some(a)), Ok(Some((b, consumed)))) => {
            assert_eq!(a, b);
            assert!(consumed <= data.len());
            assert!(vlq::encode(&b).len() <= consumed);
        }
        (
            Err(FrameError::TruncatedInteger { consumed: a }),
            Err(FrameError::TruncatedInteger { consumed: b }),
        ) => {
            assert_eq!(a, b);
            assert_eq!(a, data.len());
        }
        (streamed, sliced) => panic!("decoders disagree: {streamed:?} vs {sliced:?}"),
    }
});
