//! One-shot pane status probes.

use agentmux_core::{Classification, classify_capture};
use agentmux_proto::{CaptureSource, RawCapture, ToolVariant};
use tracing::debug;

/// Captures `session`, treating a failed capture as an empty pane.
pub async fn capture_session(
    capture: &dyn CaptureSource,
    session: &str,
    variant: ToolVariant,
    max_lines: Option<usize>,
) -> RawCapture {
    let text = match capture.capture_pane(session, max_lines).await {
        Ok(text) => text,
        Err(e) => {
            debug!(session, error = %e, "capture failed, treating pane as empty");
            String::new()
        }
    };
    RawCapture::new(text, variant)
}

/// Captures and classifies `session` in one step.
///
/// Never fails: an unreachable session classifies as `no_signal`.
pub async fn detect_pane_status(
    capture: &dyn CaptureSource,
    session: &str,
    variant: ToolVariant,
    max_lines: Option<usize>,
) -> Classification {
    let raw = capture_session(capture, session, variant, max_lines).await;
    classify_capture(&raw)
}
