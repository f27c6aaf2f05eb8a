use std::io::{self, Cursor, Write};

use packet_engine::{FrameCodec, FrameError, MAX_MESSAGE_BYTES};
use pretty_assertions::assert_eq;
use serde_json::json;

fn framed(body: &[u8]) -> Vec<u8> {
    let mut bytes = (body.len() as u32).to_le_bytes().to_vec();
    bytes.extend_from_slice(body);
    bytes
}

/// Records whether `flush` was called after the last write.
#[derive(Default)]
struct FlushTracker {
    bytes: Vec<u8>,
    flushed: bool,
}

impl Write for FlushTracker {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.flushed = false;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed = true;
        Ok(())
    }
}

#[test]
fn reads_consecutive_messages_then_closes_cleanly() {
    let mut bytes = framed(br#"{"a":1}"#);
    bytes.extend(framed("{\"name\":\"Zoë\"}".as_bytes()));
    let mut reader = Cursor::new(bytes);
    let codec = FrameCodec::default();

    assert_eq!(codec.read_message(&mut reader).unwrap().as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(
        codec.read_message(&mut reader).unwrap().as_deref(),
        Some("{\"name\":\"Zoë\"}")
    );
    assert_eq!(codec.read_message(&mut reader).unwrap(), None);
}

#[test]
fn short_prefix_is_end_of_stream() {
    let codec = FrameCodec::default();
    assert_eq!(codec.read_message(&mut Cursor::new(Vec::new())).unwrap(), None);
    assert_eq!(codec.read_message(&mut Cursor::new(vec![7, 0])).unwrap(), None);
}

#[test]
fn zero_length_is_rejected() {
    let result = FrameCodec::default().read_message(&mut Cursor::new(framed(b"")));
    assert!(matches!(result, Err(FrameError::EmptyMessage)));
}

#[test]
fn oversized_length_is_rejected_before_reading_body() {
    let declared = (MAX_MESSAGE_BYTES as u32 + 1).to_le_bytes().to_vec();
    let result = FrameCodec::default().read_message(&mut Cursor::new(declared));
    assert!(matches!(
        result,
        Err(FrameError::TooLarge { size, max_size })
            if size == MAX_MESSAGE_BYTES + 1 && max_size == MAX_MESSAGE_BYTES
    ));

    // Lengths with the top bit set would be negative as a signed prefix.
    let result = FrameCodec::default().read_message(&mut Cursor::new(u32::MAX.to_le_bytes()));
    assert!(matches!(result, Err(FrameError::TooLarge { .. })));
}

#[test]
fn message_at_the_cap_is_accepted() {
    let body = vec![b'x'; MAX_MESSAGE_BYTES];
    let message = FrameCodec::default()
        .read_message(&mut Cursor::new(framed(&body)))
        .unwrap()
        .unwrap();
    assert_eq!(message.len(), MAX_MESSAGE_BYTES);
}

#[test]
fn configured_cap_is_honoured() {
    let codec = FrameCodec::with_max_message_bytes(8);
    let result = codec.read_message(&mut Cursor::new(framed(b"123456789")));
    assert!(matches!(result, Err(FrameError::TooLarge { size: 9, max_size: 8 })));
}

#[test]
fn truncated_body_is_an_error() {
    let mut bytes = 10u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"abc");
    let result = FrameCodec::default().read_message(&mut Cursor::new(bytes));
    assert!(matches!(
        result,
        Err(FrameError::Truncated {
            expected: 10,
            received: 3
        })
    ));
}

#[test]
fn write_prefixes_length_and_flushes() {
    let mut out = FlushTracker::default();
    FrameCodec::default()
        .write_message(&mut out, &json!({"ok": true}))
        .unwrap();

    assert!(out.flushed);
    assert_eq!(&out.bytes[..4], &11u32.to_le_bytes());
    assert_eq!(&out.bytes[4..], br#"{"ok":true}"#);

    let echoed = FrameCodec::default()
        .read_message(&mut Cursor::new(out.bytes))
        .unwrap();
    assert_eq!(echoed.as_deref(), Some(r#"{"ok":true}"#));
}
