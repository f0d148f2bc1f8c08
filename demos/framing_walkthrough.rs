//! Example: Framing a Byte Stream
//!
//! This example walks through packing blobs into a self-describing framed
//! stream, recovering them again, streaming a frame body, and classifying
//! a torn stream.
//!
//! Run with: `cargo run --example framing_walkthrough`

use framepack::adapters::{pack_to_vec, unpack_from_slice};
use framepack::error::FrameError;
use framepack::{FrameReader, FrameWriter};
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Self-Describing Framing Demo ===\n");

    // 1. Pack in-memory blobs
    println!("1. PACKING");
    let blobs: [&[u8]; 3] = [b"hello", b"", b"frame three"];
    let wire = pack_to_vec(blobs);
    println!("   - {} blobs became {} wire bytes", blobs.len(), wire.len());
    println!("   - Hex: {:02X?}", &wire[..wire.len().min(24)]);
    println!();

    // 2. Recover zero-copy views
    println!("2. UNPACKING");
    let views = unpack_from_slice(&wire)?;
    for (index, view) in views.iter().enumerate() {
        println!(
            "   - Frame {}: {} bytes: {:?}",
            index,
            view.len(),
            String::from_utf8_lossy(view)
        );
    }
    println!();

    // 3. Stream one frame at a time
    println!("3. STREAMING");
    let mut writer = FrameWriter::new(Vec::new());
    writer.write_frame(&[0xAB; 1000])?;
    writer.write_frame(b"tail")?;
    let stream = writer.into_inner();

    let mut reader = FrameReader::new(&stream[..]);
    while let Some(mut cursor) = reader.next_frame()? {
        let declared = cursor.declared_len();
        let mut body = Vec::new();
        cursor.read_to_end(&mut body)?;
        println!("   - Declared {} bytes, read {} bytes", declared, body.len());
    }
    println!();

    // 4. Classify a torn stream
    println!("4. TRUNCATION");
    let torn = &wire[..wire.len() - 3];
    match unpack_from_slice(torn) {
        Err(FrameError::TruncatedFrame { declared, missing }) => {
            println!(
                "   - Last frame declared {} bytes but {} never arrived",
                declared, missing
            );
        }
        other => println!("   - Unexpected outcome: {:?}", other),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
