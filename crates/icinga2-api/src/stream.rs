//! Newline-delimited stream decoding.
//!
//! The event endpoint answers with a response body that never ends: one
//! JSON document per line, delivered in chunks whose boundaries have nothing
//! to do with line boundaries. [`LineBuffer`] re-segments the chunks;
//! [`lines`] and [`decode_events`] wrap it as lazy streams.
//!
//! The buffer grows without bound if the server never sends a newline.
//! Callers talking to untrusted servers should cap what they pull.

use futures_util::stream::{Stream, StreamExt};
use serde_json::Value;
use tracing::trace;

use crate::error::Error;

const DELIMITER: u8 = b'\n';

/// Accumulates byte chunks and yields every complete line exactly once.
///
/// At any point the buffer holds only the trailing fragment after the last
/// newline seen so far.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the lines it completed, delimiters stripped.
    ///
    /// Returns an empty `Vec` when the chunk contains no newline; the data is
    /// kept for the next call. Empty lines are returned as empty strings.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last) = self.pending.iter().rposition(|&b| b == DELIMITER) else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete[..last]
            .split(|&b| b == DELIMITER)
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Bytes received after the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Consume the buffer, returning the unterminated trailing fragment if
    /// there is one.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Re-segment a chunk stream into lines.
///
/// Lazy and single-pass: chunks are pulled only as lines are demanded. An
/// error from the source is passed through and ends the stream. When the
/// source ends, a non-empty unterminated fragment is yielded as a final line.
pub fn lines<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    async_stream::stream! {
        let mut buffer = LineBuffer::new();
        futures_util::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    for line in buffer.push(chunk.as_ref()) {
                        yield Ok(line);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        if let Some(rest) = buffer.finish() {
            trace!(len = rest.len(), "flushing unterminated final line");
            yield Ok(rest);
        }
    }
}

/// Decode a newline-delimited JSON chunk stream into one value per line.
///
/// Blank lines (keep-alives) are skipped. A line that is not valid JSON
/// yields [`Error::Deserialization`] and the stream continues with the
/// next line.
pub fn decode_events<S, B>(chunks: S) -> impl Stream<Item = Result<Value, Error>>
where
    S: Stream<Item = Result<B, Error>>,
    B: AsRef<[u8]>,
{
    lines(chunks).filter_map(|line| async move {
        match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => {
                trace!(len = line.len(), "event line");
                Some(serde_json::from_str(&line).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: line,
                }))
            }
            Err(e) => Some(Err(e)),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::stream;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn feed(chunks: &[&[u8]]) -> (Vec<String>, LineBuffer) {
        let mut buffer = LineBuffer::new();
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(buffer.push(chunk));
        }
        (out, buffer)
    }

    #[test]
    fn lines_are_emitted_in_order_without_delimiters() {
        let (out, buffer) = feed(&[b"one\ntwo\n", b"three\n"]);
        assert_eq!(out, vec!["one", "two", "three"]);
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn no_delimiter_keeps_everything_buffered() {
        let (out, buffer) = feed(&[b"{\"a\":", b"1", b"}"]);
        assert!(out.is_empty());
        assert_eq!(buffer.pending(), b"{\"a\":1}");
        assert_eq!(buffer.finish().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn delimiter_at_chunk_boundary() {
        let (out, buffer) = feed(&[b"first", b"\n", b"second\n"]);
        assert_eq!(out, vec!["first", "second"]);
        assert!(buffer.finish().is_none());

        let (out, _) = feed(&[b"first\n", b"second", b"\n"]);
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn partial_line_carries_over() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"{\"a\":1}\n{\"b\":2"), vec!["{\"a\":1}"]);
        assert_eq!(buffer.pending(), b"{\"b\":2");
        assert_eq!(buffer.push(b"}\n"), vec!["{\"b\":2}"]);
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn empty_lines_are_preserved() {
        let (out, _) = feed(&[b"a\n\nb\n", b"\n"]);
        assert_eq!(out, vec!["a", "", "b", ""]);
    }

    #[test]
    fn multibyte_characters_split_across_chunks() {
        let text = "Überwachung ✓\n".as_bytes();
        let (head, tail) = text.split_at(1);
        let (out, _) = feed(&[head, tail]);
        assert_eq!(out, vec!["Überwachung ✓"]);
    }

    #[tokio::test]
    async fn decode_events_never_yields_partial_messages() {
        let chunks: Vec<Result<&[u8], Error>> =
            vec![Ok(&b"{\"a\":1}\n{\"b\":2"[..]), Ok(&b"}\n"[..])];
        let events: Vec<Value> = decode_events(stream::iter(chunks))
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(events, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[tokio::test]
    async fn decode_events_skips_keepalives_and_flushes_tail() {
        let chunks: Vec<Result<&[u8], Error>> = vec![Ok(&b"\n{\"a\":1}\n\n"[..]), Ok(&b"{\"b\":2}"[..])];
        let events: Vec<Value> = decode_events(stream::iter(chunks))
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(events, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[tokio::test]
    async fn decode_events_reports_bad_lines_and_continues() {
        let chunks: Vec<Result<&[u8], Error>> = vec![Ok(&b"not json\n{\"ok\":true}\n"[..])];
        let events: Vec<Result<Value, Error>> = decode_events(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        match &events[0] {
            Err(Error::Deserialization { body, .. }) => assert_eq!(body, "not json"),
            other => panic!("expected Deserialization error, got {other:?}"),
        }
        assert_eq!(events[1].as_ref().unwrap(), &json!({"ok": true}));
    }

    #[tokio::test]
    async fn source_error_ends_the_stream() {
        let chunks: Vec<Result<&[u8], &str>> = vec![Ok(&b"a\nb"[..]), Err("reset"), Ok(&b"c\n"[..])];
        let out: Vec<Result<String, &str>> = lines(stream::iter(chunks)).collect().await;
        assert_eq!(out, vec![Ok("a".to_string()), Err("reset")]);
    }

    fn chunked(text: &str, cuts: &[usize]) -> Vec<Vec<u8>> {
        let bytes = text.as_bytes();
        let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
        points.sort_unstable();
        points.dedup();

        let mut chunks = Vec::new();
        let mut start = 0;
        for point in points {
            chunks.push(bytes[start..point].to_vec());
            start = point;
        }
        chunks.push(bytes[start..].to_vec());
        chunks
    }

    proptest! {
        #[test]
        fn any_chunking_yields_each_line_once(
            input in prop::collection::vec("[a-z0-9{}\":, ]{0,12}", 1..8),
            cuts in prop::collection::vec(any::<usize>(), 0..10),
        ) {
            let text: String = input.iter().map(|l| format!("{l}\n")).collect();
            let chunks = chunked(&text, &cuts);

            let mut buffer = LineBuffer::new();
            let mut out = Vec::new();
            for chunk in &chunks {
                out.extend(buffer.push(chunk));
            }

            prop_assert_eq!(&out, &input);
            prop_assert!(buffer.pending().is_empty());

            // A fresh buffer fed the same chunks produces the same output.
            let mut again = LineBuffer::new();
            let replay: Vec<String> = chunks.iter().flat_map(|c| again.push(c)).collect();
            prop_assert_eq!(replay, out);
        }

        #[test]
        fn no_delimiter_means_no_output(
            text in "[a-z0-9 ]{0,64}",
            cuts in prop::collection::vec(any::<usize>(), 0..10),
        ) {
            let mut buffer = LineBuffer::new();
            let mut out = Vec::new();
            for chunk in chunked(&text, &cuts) {
                out.extend(buffer.push(&chunk));
            }
            prop_assert!(out.is_empty());
            prop_assert_eq!(buffer.pending(), text.as_bytes());
        }
    }
}
