//! Node readiness detection from streamed output.

/// Marker the node prints once its HTTP-RPC server is listening
pub const HTTP_READY_MARKER: &str = "HTTP endpoint opened";
/// Marker the node prints once its WebSocket server is listening
pub const WS_READY_MARKER: &str = "WebSocket endpoint opened";

/// Endpoint readiness; flags only ever go from `false` to `true`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessState {
    pub http_ready: bool,
    pub ws_ready: bool,
}

impl ReadinessState {
    pub fn is_ready(&self) -> bool {
        self.http_ready && self.ws_ready
    }
}

/// Consumes node output lines in the order they were produced.
#[derive(Debug, Default)]
pub struct ReadinessClassifier {
    state: ReadinessState,
}

impl ReadinessClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> ReadinessState {
        if line.contains(HTTP_READY_MARKER) {
            self.state.http_ready = true;
        }
        if line.contains(WS_READY_MARKER) {
            self.state.ws_ready = true;
        }
        self.state
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_both_markers() {
        let mut classifier = ReadinessClassifier::new();
        for line in [
            "garbage",
            "INFO [01-01|00:00:00] HTTP endpoint opened url=http://127.0.0.1:8545",
            "garbage",
        ] {
            classifier.feed(line);
        }
        assert!(!classifier.is_ready());
        assert!(classifier.state().http_ready);

        let state = classifier.feed("INFO WebSocket endpoint opened url=ws://127.0.0.1:8546");
        assert!(state.is_ready());
        assert!(classifier.is_ready());
    }

    #[test]
    fn test_marker_order_is_irrelevant() {
        let mut classifier = ReadinessClassifier::new();
        classifier.feed("WebSocket endpoint opened");
        assert!(!classifier.is_ready());
        classifier.feed("HTTP endpoint opened");
        assert!(classifier.is_ready());
    }

    #[test]
    fn test_ready_is_monotonic() {
        let mut classifier = ReadinessClassifier::new();
        classifier.feed("HTTP endpoint opened");
        classifier.feed("WebSocket endpoint opened");
        for line in ["", "HTTP endpoint closed", "\u{fffd}\u{0}", "fatal error"] {
            assert!(classifier.feed(line).is_ready());
        }
    }

    #[test]
    fn test_single_line_with_both_markers() {
        let mut classifier = ReadinessClassifier::new();
        assert!(classifier.feed("HTTP endpoint opened; WebSocket endpoint opened").is_ready());
    }
}
