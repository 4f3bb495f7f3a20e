//! Incremental server-sent-events decoding for streaming completions.
//!
//! Network reads do not align with event boundaries — a `data:` line, or
//! even a single multibyte character, can arrive split across two chunks —
//! so the decoder buffers the incomplete tail as raw bytes and decodes
//! only complete lines. Comment lines (`:`), `event:` lines, and blank
//! separators are skipped; the OpenAI-style `[DONE]` sentinel is surfaced
//! as its own event.

/// One decoded SSE event.
#[derive(Clone, Debug, PartialEq)]
pub enum SseEvent {
    /// A `data:` payload (JSON text, undecoded).
    Data(String),
    /// The `data: [DONE]` terminator.
    Done,
}

/// Stateful decoder: feed raw byte chunks, get complete events back.
///
/// The tail is kept as bytes, not a string: decoding per chunk would turn
/// a multibyte character straddling a read boundary into U+FFFD garbage.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        SseDecoder::default()
    }

    /// Consume one network chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(payload.to_string()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_event() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b"data: {\"x\":1}\n\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".into())]);
    }

    #[test]
    fn multiple_events_in_one_chunk() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b"data: a\n\ndata: b\n\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("a".into()), SseEvent::Data("b".into())]
        );
    }

    #[test]
    fn event_split_across_chunks() {
        let mut dec = SseDecoder::new();
        assert!(dec.feed(b"data: {\"content\":").is_empty());
        let events = dec.feed(b"\"hi\"}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"content\":\"hi\"}".into())]);
    }

    #[test]
    fn done_sentinel() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b"data: a\n\ndata: [DONE]\n\n");
        assert_eq!(events, vec![SseEvent::Data("a".into()), SseEvent::Done]);
    }

    #[test]
    fn skips_comments_and_event_lines() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b": keep-alive\nevent: message\ndata: x\n\n");
        assert_eq!(events, vec![SseEvent::Data("x".into())]);
    }

    #[test]
    fn handles_crlf() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b"data: x\r\n\r\n");
        assert_eq!(events, vec![SseEvent::Data("x".into())]);
    }

    #[test]
    fn multibyte_char_split_across_chunks() {
        // "é" is 0xC3 0xA9; the read boundary falls between its two bytes.
        let mut dec = SseDecoder::new();
        assert!(dec.feed(b"data: h\xC3").is_empty());
        let events = dec.feed(b"\xA9llo\n");
        assert_eq!(events, vec![SseEvent::Data("héllo".into())]);
    }

    #[test]
    fn trailing_partial_is_held() {
        let mut dec = SseDecoder::new();
        let events = dec.feed(b"data: complete\ndata: parti");
        assert_eq!(events, vec![SseEvent::Data("complete".into())]);
        let events = dec.feed(b"al\n");
        assert_eq!(events, vec![SseEvent::Data("partial".into())]);
    }
}
