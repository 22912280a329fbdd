//! Streaming response decoding for agent runtime invocations.
//!
//! Turns one [`InvocationResponse`] into either a lazy sequence of text
//! fragments (event-stream framing), a single reassembled JSON document, or
//! an opaque passthrough, dispatched from the declared content-type.

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::{AgentCoreError, AgentCoreResult};
use crate::types::{BodyStream, ContentType, InvocationResponse, StreamEvent};

use super::sink::FragmentSink;

/// A fully dispatched invocation response.
///
/// Produced by [`StreamingResponseDecoder::decode`]. The event-stream arm is
/// lazy: no body bytes have been read yet when it is returned.
#[derive(Debug)]
pub enum DecodedResponse {
    /// `text/event-stream` body: pull fragments incrementally from the
    /// contained [`FragmentStream`].
    EventStream(FragmentStream),
    /// `application/json` body, fully reassembled and parsed.
    Json(serde_json::Value),
    /// Unrecognized content-type: the response, untouched, for caller-defined
    /// handling.
    Opaque(InvocationResponse),
}

/// Decoder for invocation responses.
///
/// Stateless; the decoding strategy is chosen once per response from the
/// declared content-type and dispatched exhaustively.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingResponseDecoder;

impl StreamingResponseDecoder {
    /// Decode one response according to its declared content-type.
    ///
    /// - event-stream: returns immediately with a lazy [`FragmentStream`];
    ///   body bytes are read as the caller pulls.
    /// - JSON: reads the body to completion, concatenates all chunks in
    ///   arrival order, and parses the concatenation as one document. Partial
    ///   chunks are never parsed individually.
    /// - anything else: returns the response unmodified.
    ///
    /// # Errors
    ///
    /// For the JSON arm: [`AgentCoreError::Transport`] on a chunk-source
    /// failure or invalid UTF-8, [`AgentCoreError::Decode`] if the complete
    /// body is not valid JSON. The event-stream arm reports errors through
    /// the returned stream instead.
    pub async fn decode(response: InvocationResponse) -> AgentCoreResult<DecodedResponse> {
        match response.resolved_content_type() {
            ContentType::EventStream => {
                let (_, body) = response.into_parts();
                Ok(DecodedResponse::EventStream(FragmentStream::from_body(body)))
            }
            ContentType::Json => {
                let (_, body) = response.into_parts();
                Ok(DecodedResponse::Json(decode_json_body(body).await?))
            }
            ContentType::Opaque => Ok(DecodedResponse::Opaque(response)),
        }
    }
}

/// Reassemble a chunked JSON body and parse it as one document.
async fn decode_json_body(mut body: BodyStream) -> AgentCoreResult<serde_json::Value> {
    use futures::StreamExt;

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = body.next().await {
        buf.extend_from_slice(&chunk?);
    }

    let text = std::str::from_utf8(&buf)
        .map_err(|e| AgentCoreError::Transport(format!("invalid UTF-8 in JSON body: {e}")))?;

    serde_json::from_str(text)
        .map_err(|e| AgentCoreError::Decode(format!("failed to parse JSON body: {e}")))
}

/// One processed line of an event-stream body.
#[derive(Debug)]
struct LineItem {
    /// Display text extracted from the `event.contentBlockDelta.delta.text`
    /// path, when every level was present and non-empty.
    fragment: Option<String>,
    /// The line's transcript entry: the JSON payload for `data: ` lines, the
    /// whole line verbatim otherwise.
    raw: String,
}

/// A lazy, forward-only, non-restartable stream of decoded text fragments.
///
/// Fragments are yielded strictly in arrival order, one event at a time;
/// there is no buffering or batching beyond the line currently being framed.
/// After exhaustion the full raw transcript is available via
/// [`transcript()`](Self::transcript) / [`into_transcript()`](Self::into_transcript).
///
/// Dropping the stream cancels the background parsing task.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: agentcore_rs::client::FragmentStream) {
/// while let Some(fragment) = stream.next().await {
///     match fragment {
///         Ok(text) => print!("{text}"),
///         Err(e) => eprintln!("stream error: {e}"),
///     }
/// }
/// println!("{} raw frames", stream.transcript().len());
/// # }
/// ```
pub struct FragmentStream {
    receiver: mpsc::Receiver<AgentCoreResult<LineItem>>,
    transcript: Vec<String>,
    /// Background task handle — kept so line parsing runs to completion,
    /// and aborted explicitly when the stream is dropped.
    task: tokio::task::JoinHandle<()>,
}

impl Drop for FragmentStream {
    fn drop(&mut self) {
        // A detached task would keep reading the body until its next send
        // fails; abort so drop releases the transport promptly.
        self.task.abort();
    }
}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream")
            .field("transcript_len", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

impl FragmentStream {
    /// Spawn the line-framing task over a raw body stream.
    pub(crate) fn from_body(body: BodyStream) -> Self {
        let (tx, rx) = mpsc::channel(64);

        let task = tokio::spawn(async move {
            split_and_decode_lines(body, &tx).await;
        });

        Self {
            receiver: rx,
            transcript: Vec::new(),
            task,
        }
    }

    /// Get the next text fragment.
    ///
    /// Returns `None` once the body is exhausted. Lines without displayable
    /// text are consumed silently (their raw form still lands in the
    /// transcript). A `data: ` line with an unparsable payload yields
    /// `Some(Err(Decode))`; subsequent lines are unaffected, so the caller
    /// may either abort or keep pulling.
    pub async fn next(&mut self) -> Option<AgentCoreResult<String>> {
        while let Some(item) = self.receiver.recv().await {
            match item {
                Ok(line) => {
                    self.transcript.push(line.raw);
                    if let Some(fragment) = line.fragment {
                        return Some(Ok(fragment));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    /// Drive the stream to exhaustion, emitting each fragment to `sink` as it
    /// arrives.
    ///
    /// Aborts on the first error; callers that prefer to skip bad frames
    /// should pull with [`next()`](Self::next) instead.
    pub async fn forward_to<S>(&mut self, sink: &mut S) -> AgentCoreResult<()>
    where
        S: FragmentSink + ?Sized,
    {
        while let Some(fragment) = self.next().await {
            sink.emit(&fragment?);
        }
        Ok(())
    }

    /// Raw frames seen so far; complete once [`next()`](Self::next) has
    /// returned `None`.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Consume the stream, yielding the accumulated transcript.
    pub fn into_transcript(mut self) -> Vec<String> {
        std::mem::take(&mut self.transcript)
    }
}

/// Split a chunked body into lines and decode each, sending results to `tx`.
///
/// Lines are framed on `\n` with a trailing `\r` trimmed; a trailing
/// unterminated line is flushed at end of body. Byte buffering happens before
/// UTF-8 decoding so multi-byte codepoints may straddle chunk boundaries.
async fn split_and_decode_lines(
    mut body: BodyStream,
    tx: &mpsc::Sender<AgentCoreResult<LineItem>>,
) {
    use futures::StreamExt;

    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk_result) = body.next().await {
        let chunk: Bytes = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                // Transport failure is fatal to the invocation.
                let _ = tx.send(Err(e)).await;
                return;
            }
        };
        buffer.extend_from_slice(&chunk);

        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
            let line_bytes = &line_bytes[..newline_pos];
            if !send_line(line_bytes, tx).await {
                // Receiver dropped — stop parsing.
                return;
            }
        }
    }

    // Flush a trailing line with no newline terminator.
    if !buffer.is_empty() {
        let line_bytes = std::mem::take(&mut buffer);
        send_line(&line_bytes, tx).await;
    }
}

/// Decode one framed line and send the result. Returns `false` once the
/// receiver is gone.
async fn send_line(line_bytes: &[u8], tx: &mpsc::Sender<AgentCoreResult<LineItem>>) -> bool {
    let line = match std::str::from_utf8(line_bytes) {
        Ok(s) => s.trim_end_matches('\r'),
        Err(e) => {
            let _ = tx
                .send(Err(AgentCoreError::Transport(format!(
                    "invalid UTF-8 in event stream: {e}"
                ))))
                .await;
            return false;
        }
    };

    match decode_stream_line(line) {
        Ok(None) => true,
        Ok(Some(item)) => tx.send(Ok(item)).await.is_ok(),
        Err(e) => tx.send(Err(e)).await.is_ok(),
    }
}

/// Decode a single event-stream line.
///
/// - empty line: `Ok(None)` (frame separator, nothing to retain)
/// - no `data: ` prefix: retained verbatim, no structured extraction
/// - `data: ` prefix: the remainder must be valid JSON; the optional chain
///   `event.contentBlockDelta.delta.text` is walked for a fragment, and
///   absence at any level is a normal branch, not an error
fn decode_stream_line(line: &str) -> AgentCoreResult<Option<LineItem>> {
    if line.is_empty() {
        return Ok(None);
    }

    let Some(payload) = line.strip_prefix("data: ") else {
        return Ok(Some(LineItem {
            fragment: None,
            raw: line.to_string(),
        }));
    };

    if payload.is_empty() {
        // Possibly a provider keep-alive, but the server contract says
        // `data: ` payloads are JSON. Logged distinctly so operators can tell
        // this apart from corruption.
        warn!("empty data frame in event stream");
        return Err(AgentCoreError::Decode(
            "empty payload in `data: ` frame".to_string(),
        ));
    }

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => Ok(Some(LineItem {
            fragment: event.text_fragment().map(str::to_string),
            raw: payload.to_string(),
        })),
        Err(_) => {
            // Distinguish unexpected-but-valid JSON shapes (no displayable
            // text) from actual JSON syntax errors.
            match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(_) => Ok(Some(LineItem {
                    fragment: None,
                    raw: payload.to_string(),
                })),
                Err(e) => Err(AgentCoreError::Decode(format!(
                    "failed to parse event data: {e} (data: {payload})"
                ))),
            }
        }
    }
}
