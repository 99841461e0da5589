//! Session status classification.
//!
//! The classifier is re-run from scratch on every poll tick; nothing is
//! carried over between calls. Rules are evaluated in strict priority order
//! over fixed windows counted from the last non-blank line of the capture:
//!
//! 1. A decision prompt in the last [`PROMPT_WINDOW_LINES`] lines → `waiting`.
//!    Checked first so a prompt raised right after a finished operation is
//!    never reported as still thinking.
//! 2. A thinking indicator in the last [`THINKING_WINDOW_LINES`] lines →
//!    `running`. The narrow window keeps a completed-work summary line that
//!    has scrolled up past the response from reporting a busy session.
//! 3. The idle input marker on the last meaningful line → `ready`.
//! 4. Otherwise `running` with low confidence: a stale "busy" is preferred
//!    over a false "done".

use agentmux_proto::{PromptData, RawCapture, StatusDetectionResult, ToolVariant};
use tracing::trace;

use crate::patterns::PatternSet;
use crate::prompt::extract_prompt;
use crate::text::{content_lines, normalize, tail};

/// Lines searched for an active decision prompt.
pub const PROMPT_WINDOW_LINES: usize = 15;

/// Lines searched for a thinking indicator.
pub const THINKING_WINDOW_LINES: usize = 5;

/// A classification together with the prompt that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub result: StatusDetectionResult,
    /// Present exactly when `result.has_active_prompt` is true.
    pub prompt: Option<PromptData>,
}

impl Classification {
    fn without_prompt(result: StatusDetectionResult) -> Self {
        Self {
            result,
            prompt: None,
        }
    }
}

/// Classifies raw (un-normalized) pane text captured from a `variant` session.
///
/// Never fails: an empty or unreadable capture is `no_signal`.
pub fn classify(raw: &str, variant: ToolVariant) -> Classification {
    let normalized = normalize(raw);
    let lines = content_lines(&normalized);
    if lines.is_empty() {
        return Classification::without_prompt(StatusDetectionResult::no_signal());
    }

    let prompt_window = tail(&lines, PROMPT_WINDOW_LINES).join("\n");
    if let Some(prompt) = extract_prompt(&prompt_window, variant) {
        trace!(%variant, question = %prompt.question, "active prompt in window");
        return Classification {
            result: StatusDetectionResult::waiting_on_prompt(),
            prompt: Some(prompt),
        };
    }

    let patterns = PatternSet::for_variant(variant);
    if tail(&lines, THINKING_WINDOW_LINES)
        .iter()
        .any(|line| patterns.is_thinking(line))
    {
        trace!(%variant, "thinking indicator in window");
        return Classification::without_prompt(StatusDetectionResult::thinking());
    }

    // Everything below the last meaningful line is blank or chrome, so a
    // spinner under the marker would have been the meaningful line itself.
    if let Some(index) = patterns.last_meaningful_line(&lines)
        && patterns.is_idle_input(lines[index])
    {
        trace!(%variant, "idle input marker");
        return Classification::without_prompt(StatusDetectionResult::ready_for_input());
    }

    Classification::without_prompt(StatusDetectionResult::no_signal())
}

/// Classifies a capture, returning only the status result.
pub fn detect_session_status(raw: &str, variant: ToolVariant) -> StatusDetectionResult {
    classify(raw, variant).result
}

/// Classifies a [`RawCapture`] produced by the poller.
pub fn classify_capture(capture: &RawCapture) -> Classification {
    classify(&capture.text, capture.tool_variant)
}
