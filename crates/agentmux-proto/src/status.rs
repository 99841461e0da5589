//! Session status classification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::variant::ToolVariant;

/// Coarse state of an agent session as seen from its rendered pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Nothing is running and nothing is being asked.
    Idle,
    /// The agent is working (or is assumed to be, absent a clear signal).
    Running,
    /// The agent is blocked on an interactive decision prompt.
    Waiting,
    /// The agent's input prompt is showing and it accepts new input.
    Ready,
}

/// How much weight the caller should give a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReason {
    /// A spinner or interrupt marker in the thinking window.
    ThinkingIndicator,
    /// The idle input marker on the last non-empty line.
    InputPrompt,
    /// A decision prompt in the prompt window.
    ActivePrompt,
    /// No rule matched; the low-confidence fallback.
    NoSignal,
}

/// Result of classifying a single pane capture.
///
/// A pure value: the caller diffs it against earlier results if it needs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetectionResult {
    pub status: SessionStatus,
    pub confidence: Confidence,
    pub reason: StatusReason,
    pub has_active_prompt: bool,
}

impl StatusDetectionResult {
    /// A decision prompt is waiting for an answer.
    pub const fn waiting_on_prompt() -> Self {
        Self {
            status: SessionStatus::Waiting,
            confidence: Confidence::High,
            reason: StatusReason::ActivePrompt,
            has_active_prompt: true,
        }
    }

    /// The agent is visibly thinking.
    pub const fn thinking() -> Self {
        Self {
            status: SessionStatus::Running,
            confidence: Confidence::High,
            reason: StatusReason::ThinkingIndicator,
            has_active_prompt: false,
        }
    }

    /// The input prompt is showing.
    pub const fn ready_for_input() -> Self {
        Self {
            status: SessionStatus::Ready,
            confidence: Confidence::High,
            reason: StatusReason::InputPrompt,
            has_active_prompt: false,
        }
    }

    /// Nothing conclusive: assume the agent is still busy.
    pub const fn no_signal() -> Self {
        Self {
            status: SessionStatus::Running,
            confidence: Confidence::Low,
            reason: StatusReason::NoSignal,
            has_active_prompt: false,
        }
    }
}

/// Raw pane text produced by the poller for one tick. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    /// Scrollback text, possibly containing ANSI escapes.
    pub text: String,
    pub tool_variant: ToolVariant,
    pub captured_at: DateTime<Utc>,
}

impl RawCapture {
    /// Wraps captured text, stamping it with the current time.
    pub fn new(text: impl Into<String>, tool_variant: ToolVariant) -> Self {
        Self {
            text: text.into(),
            tool_variant,
            captured_at: Utc::now(),
        }
    }
}
