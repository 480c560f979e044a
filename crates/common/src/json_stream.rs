//! Incremental JSON-array transport for streamed text fragments.
//!
//! The service writes `["a","b",...]` piece by piece as fragments are produced and
//! the client decodes each string as soon as its closing quote arrives.

use futures::{stream, Stream, StreamExt};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonStreamError {
    #[error("unexpected byte {found:?} at offset {offset}, expected {expected}")]
    Unexpected {
        found: char,
        offset: usize,
        expected: &'static str,
    },
    #[error("invalid string element: {0}")]
    InvalidString(#[from] serde_json::Error),
    #[error("stream ended before the array was closed")]
    Truncated,
}

/// Wraps a fragment stream into the chunks of a JSON array of strings.
///
/// `[` is emitted before the first fragment is polled and `]` only once the
/// fragment stream completes. An error item is passed through as-is so the
/// body aborts with the array left open.
pub fn encode_json_array<S>(fragments: S) -> impl Stream<Item = anyhow::Result<String>> + Send
where
    S: Stream<Item = anyhow::Result<String>> + Send + 'static,
{
    let elements = fragments.enumerate().map(|(index, fragment)| -> anyhow::Result<String> {
        let encoded = serde_json::to_string(&fragment?)?;
        Ok(if index == 0 { encoded } else { format!(",{encoded}") })
    });

    stream::once(async { Ok("[".to_string()) })
        .chain(elements)
        .chain(stream::once(async { Ok("]".to_string()) }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    FirstElement,
    NextElement,
    InString { escaped: bool },
    AfterElement,
    Done,
}

/// Push-based decoder for a JSON array of strings split at arbitrary byte
/// boundaries.
#[derive(Debug)]
pub struct JsonArrayDecoder {
    state: State,
    current: Vec<u8>,
    offset: usize,
}

impl Default for JsonArrayDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArrayDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            current: Vec::new(),
            offset: 0,
        }
    }

    /// Feeds the next slice of the body, returning every string completed by it
    /// in order.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, JsonStreamError> {
        let mut completed = Vec::new();

        for &byte in bytes {
            let offset = self.offset;
            self.offset += 1;

            self.state = match self.state {
                State::InString { escaped } => {
                    self.current.push(byte);
                    match byte {
                        _ if escaped => State::InString { escaped: false },
                        b'\\' => State::InString { escaped: true },
                        b'"' => {
                            let element: String = serde_json::from_slice(&self.current)?;
                            self.current.clear();
                            completed.push(element);
                            State::AfterElement
                        }
                        _ => State::InString { escaped: false },
                    }
                }
                _ if byte.is_ascii_whitespace() => self.state,
                State::Start => match byte {
                    b'[' => State::FirstElement,
                    _ => return Err(unexpected(byte, offset, "'['")),
                },
                State::FirstElement | State::NextElement => match byte {
                    b'"' => {
                        self.current.push(byte);
                        State::InString { escaped: false }
                    }
                    b']' if self.state == State::FirstElement => State::Done,
                    _ => return Err(unexpected(byte, offset, "a string")),
                },
                State::AfterElement => match byte {
                    b',' => State::NextElement,
                    b']' => State::Done,
                    _ => return Err(unexpected(byte, offset, "',' or ']'")),
                },
                State::Done => return Err(unexpected(byte, offset, "end of stream")),
            };
        }

        Ok(completed)
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Call once the body has ended; fails if the closing `]` never arrived.
    pub fn finish(&self) -> Result<(), JsonStreamError> {
        if self.is_done() {
            Ok(())
        } else {
            Err(JsonStreamError::Truncated)
        }
    }
}

fn unexpected(byte: u8, offset: usize, expected: &'static str) -> JsonStreamError {
    JsonStreamError::Unexpected {
        found: byte as char,
        offset,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn encode(fragments: Vec<anyhow::Result<String>>) -> Vec<anyhow::Result<String>> {
        encode_json_array(stream::iter(fragments)).collect().await
    }

    #[tokio::test]
    async fn test_encode_keeps_fragment_order() {
        let chunks = encode(vec![Ok("hello ".into()), Ok("world ".into())]).await;
        let body: String = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(body, r#"["hello ","world "]"#);

        let parsed: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, vec!["hello ", "world "]);
    }

    #[tokio::test]
    async fn test_encode_empty_stream() {
        let body: String = encode(vec![]).await.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_encode_error_leaves_array_open() {
        let chunks = encode(vec![Ok("a".into()), Err(anyhow!("upstream died")), Ok("b".into())]).await;
        assert_eq!(chunks[0].as_ref().unwrap(), "[");
        assert_eq!(chunks[1].as_ref().unwrap(), "\"a\"");
        assert!(chunks[2].is_err());
    }

    #[test]
    fn test_decode_any_split() {
        let body = r#"[ "hello ", "wo\"rld", "é\n" , "ünï" ]"#.as_bytes();
        let expected = vec!["hello ", "wo\"rld", "é\n", "ünï"];

        for split in 0..=body.len() {
            let mut decoder = JsonArrayDecoder::new();
            let mut out = decoder.push(&body[..split]).unwrap();
            out.extend(decoder.push(&body[split..]).unwrap());
            decoder.finish().unwrap();
            assert_eq!(out, expected, "split at {split}");
        }
    }

    #[test]
    fn test_decode_byte_by_byte_yields_in_order() {
        let body = r#"["one","two","three"]"#.as_bytes();
        let mut decoder = JsonArrayDecoder::new();
        let mut seen = Vec::new();
        for byte in body {
            for element in decoder.push(std::slice::from_ref(byte)).unwrap() {
                seen.push(element);
            }
        }
        assert_eq!(seen, vec!["one", "two", "three"]);
        assert!(decoder.is_done());
    }

    #[test]
    fn test_decode_empty_array() {
        let mut decoder = JsonArrayDecoder::new();
        assert!(decoder.push(b" [ ] ").unwrap().is_empty());
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decode_truncated() {
        let mut decoder = JsonArrayDecoder::new();
        assert_eq!(decoder.push(br#"["partial", "unfinis"#).unwrap(), vec!["partial"]);
        assert!(matches!(decoder.finish(), Err(JsonStreamError::Truncated)));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(JsonArrayDecoder::new().push(br#"{"a":1}"#).is_err());
        assert!(JsonArrayDecoder::new().push(br#"[1,2]"#).is_err());
        assert!(JsonArrayDecoder::new().push(br#"["a",]"#).is_err());
        assert!(JsonArrayDecoder::new().push(br#"["a""b"]"#).is_err());
        assert!(JsonArrayDecoder::new().push(br#"["a"] x"#).is_err());
    }
}
