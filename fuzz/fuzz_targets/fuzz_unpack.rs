#![no_main]

use framepack::adapters::{pack_to_vec, unpack_to_vecs};
use libfuzzer_sys::fuzz_target;

// Unpacking arbitrary bytes must classify or succeed, never panic, and
// whatever it recovers must survive a repack cycle.
fuzz_target!(|data: &[u8]| {
    if let Ok(blobs) = unpack_to_vecs(data) {
        let repacked = pack_to_vec(blobs.iter());
        let recovered = unpack_to_vecs(&repacked[..]).expect("repacked stream is valid");
        assert_eq!(recovered, blobs);
    }
});
