//! Integration tests for the codec under tokio's framed transport
//!
//! These tests drive `FrameCodec` through `FramedRead`/`FramedWrite` over an
//! in-memory duplex pipe and check that the async path and the blocking
//! reader/writer agree on the wire format.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};

use framepack::adapters::unpack_from_slice;
use framepack::core::codec::FrameCodec;
use framepack::error::FrameError;
use framepack::{FrameWriter, FramingConfig};

#[tokio::test]
async fn test_framed_roundtrip_over_duplex() {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let mut sink = FramedWrite::new(client, FrameCodec::new());
    let mut stream = FramedRead::new(server, FrameCodec::new());

    let payloads: Vec<Bytes> = vec![
        Bytes::from_static(b"hello"),
        Bytes::new(),
        Bytes::from(vec![0xA5; 300]),
        Bytes::from_static(b"goodbye"),
    ];

    for payload in &payloads {
        sink.send(payload.clone()).await.expect("send frame");
    }
    sink.close().await.expect("close sink");

    let mut received = Vec::new();
    while let Some(frame) = stream.next().await {
        received.push(frame.expect("decode frame"));
    }

    assert_eq!(received, payloads);
}

#[tokio::test]
async fn test_framed_read_decodes_blocking_writer_bytes() {
    // Pack on the blocking side first
    let mut writer = FrameWriter::new(Vec::new());
    writer.write_frame(b"first").expect("write");
    writer.write_frame(b"").expect("write");
    writer.write_frame(b"third").expect("write");
    let wire = writer.into_inner();

    let (mut client, server) = tokio::io::duplex(64 * 1024);
    client.write_all(&wire).await.expect("write wire bytes");
    client.shutdown().await.expect("shutdown");

    let mut stream = FramedRead::new(server, FrameCodec::new());
    let mut received = Vec::new();
    while let Some(frame) = stream.next().await {
        received.push(frame.expect("decode frame").to_vec());
    }

    assert_eq!(received, [&b"first"[..], &b""[..], &b"third"[..]]);
}

#[tokio::test]
async fn test_blocking_reader_decodes_framed_write_output() {
    let (client, mut server) = tokio::io::duplex(64 * 1024);
    let mut sink = FramedWrite::new(client, FrameCodec::new());

    sink.send(Bytes::from_static(b"async")).await.expect("send");
    sink.send(Bytes::from(vec![7u8; 200])).await.expect("send");
    sink.close().await.expect("close");

    let mut wire = Vec::new();
    server.read_to_end(&mut wire).await.expect("drain pipe");

    let views = unpack_from_slice(&wire).expect("unpack");
    assert_eq!(views.len(), 2);
    assert_eq!(views[0], b"async");
    assert_eq!(views[1], vec![7u8; 200].as_slice());
}

#[tokio::test]
async fn test_framed_read_reports_truncated_frame_at_eof() {
    let (mut client, server) = tokio::io::duplex(1024);

    // Declare five body bytes, deliver two, then hang up
    client.write_all(&[0x05, b'a', b'b']).await.expect("write");
    client.shutdown().await.expect("shutdown");
    drop(client);

    let mut stream = FramedRead::new(server, FrameCodec::new());
    let err = stream
        .next()
        .await
        .expect("stream should yield an item")
        .expect_err("truncated body must error");
    assert!(matches!(
        err,
        FrameError::TruncatedFrame {
            declared: 5,
            missing: 3
        }
    ));
}

#[tokio::test]
async fn test_framed_read_reports_truncated_integer_at_eof() {
    let (mut client, server) = tokio::io::duplex(1024);

    // A lone continuation byte is an unfinished length prefix
    client.write_all(&[0x81]).await.expect("write");
    client.shutdown().await.expect("shutdown");
    drop(client);

    let mut stream = FramedRead::new(server, FrameCodec::new());
    let err = stream
        .next()
        .await
        .expect("stream should yield an item")
        .expect_err("truncated prefix must error");
    assert!(matches!(err, FrameError::TruncatedInteger { consumed: 1 }));
}

#[tokio::test]
async fn test_framed_read_clean_end_of_stream() {
    let (mut client, server) = tokio::io::duplex(1024);

    client.write_all(&[0x02, 0x10, 0x20]).await.expect("write");
    client.shutdown().await.expect("shutdown");
    drop(client);

    let mut stream = FramedRead::new(server, FrameCodec::new());
    let frame = stream.next().await.expect("one frame").expect("decode");
    assert_eq!(frame.as_ref(), &[0x10, 0x20]);

    // Exactly at a frame boundary the stream ends without an error
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_framed_read_rejects_oversized_declaration() {
    let config = FramingConfig::default_with_overrides(|c| c.max_frame_len = Some(16));
    let (mut client, server) = tokio::io::duplex(1024);

    // Prefix declares 100 bytes against a 16-byte cap
    client.write_all(&[0x64]).await.expect("write");

    let mut stream = FramedRead::new(server, FrameCodec::with_config(&config));
    let err = stream
        .next()
        .await
        .expect("stream should yield an item")
        .expect_err("over-cap declaration must error");
    assert!(matches!(err, FrameError::OversizedFrame { limit: 16, .. }));
}

#[tokio::test]
async fn test_framed_transfer_larger_than_pipe_buffer() {
    // The duplex buffer is far smaller than the frame, so the writer task
    // must interleave with the reader
    let (client, server) = tokio::io::duplex(256);
    let payload = Bytes::from(vec![0x5A; 32 * 1024]);

    let send_payload = payload.clone();
    let writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(client, FrameCodec::new());
        sink.send(send_payload).await.expect("send");
        sink.close().await.expect("close");
    });

    let mut stream = FramedRead::new(server, FrameCodec::new());
    let frame = stream.next().await.expect("one frame").expect("decode");
    assert_eq!(frame, payload);
    assert!(stream.next().await.is_none());

    writer.await.expect("writer task");
}
