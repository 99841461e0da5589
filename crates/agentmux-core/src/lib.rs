//! # agentmux-core
//!
//! Terminal session orchestration logic for agentmux.
//!
//! Everything here is a pure function of its inputs:
//! - Normalizing captured pane text (ANSI stripping, line endings)
//! - Per-tool pattern tables for spinners, dialogs, prompts and input markers
//! - Extracting structured decision prompts from a window of text
//! - Classifying a capture into a [`StatusDetectionResult`]
//! - Validating outbound payloads into a [`SessionCommand`]
//! - Pulling the last rendered response out of an idle session
//! - Loading [`OrchestratorConfig`] from YAML and the environment
//!
//! Process I/O (tmux, timers) lives in `agentmux-adapters`.

pub mod command;
mod config;
pub mod patterns;
mod prompt;
mod response;
mod status;
mod text;

pub use agentmux_proto::{
    Confidence, PromptData, SessionStatus, StatusDetectionResult, StatusReason, ToolVariant,
};
pub use command::{
    DEFAULT_INTER_KEY_DELAY_MS, MAX_PAYLOAD_BYTES, MAX_PAYLOAD_LINES, SessionCommand,
    TransmissionMode, validate_payload, validate_session_name,
};
pub use config::{ConfigError, OrchestratorConfig};
pub use patterns::PatternSet;
pub use prompt::extract_prompt;
pub use response::extract_last_response;
pub use status::{
    Classification, PROMPT_WINDOW_LINES, THINKING_WINDOW_LINES, classify, classify_capture,
    detect_session_status,
};
pub use text::normalize;
