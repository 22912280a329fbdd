//! Output sinks for incrementally decoded text fragments.

use std::io::Write;

/// A consumer for decoded text fragments.
///
/// The decoder emits each fragment as it is produced, in arrival order, with
/// no buffering beyond the current event; implementations decide where the
/// text goes (console, buffer, log).
pub trait FragmentSink {
    /// Consume one fragment.
    fn emit(&mut self, fragment: &str);
}

/// Writes fragments to stdout without a trailing newline, flushing after each
/// so partial model output is visible as it streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl FragmentSink for ConsoleSink {
    fn emit(&mut self, fragment: &str) {
        let mut stdout = std::io::stdout();
        // Display is best-effort; a closed stdout must not kill the stream.
        let _ = stdout.write_all(fragment.as_bytes());
        let _ = stdout.flush();
    }
}

/// Collects fragments in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    fragments: Vec<String>,
}

impl BufferSink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragments collected so far, in emission order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// All fragments joined into one string.
    pub fn concatenated(&self) -> String {
        self.fragments.concat()
    }
}

impl FragmentSink for BufferSink {
    fn emit(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }
}

/// Adapts any `FnMut(&str)` into a sink.
///
/// ```
/// use agentcore_rs::client::{FnSink, FragmentSink};
///
/// let mut seen = String::new();
/// let mut sink = FnSink(|fragment: &str| seen.push_str(fragment));
/// sink.emit("a");
/// sink.emit("b");
/// drop(sink);
/// assert_eq!(seen, "ab");
/// ```
pub struct FnSink<F: FnMut(&str)>(pub F);

impl<F: FnMut(&str)> FragmentSink for FnSink<F> {
    fn emit(&mut self, fragment: &str) {
        (self.0)(fragment)
    }
}
