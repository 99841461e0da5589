//! # agentmux-proto
//!
//! Shared types, error definitions, and traits for agentmux.
//!
//! This crate provides the foundational abstractions used across all agentmux
//! crates, including:
//! - The agent tool variants and the classification result model
//! - Structured interactive-prompt data
//! - Error types for dispatch, transport, and bootstrap failures
//! - The [`SessionTransport`] and [`CaptureSource`] collaborator traits

mod error;
mod prompt;
mod status;
mod transport;
mod variant;

pub use error::{BootstrapError, DispatchError, TransportError};
pub use prompt::{
    MultipleChoiceOption, PromptAnswer, PromptData, PromptOptions, PromptStatus, PromptType,
    YesNoOptions,
};
pub use status::{Confidence, RawCapture, SessionStatus, StatusDetectionResult, StatusReason};
pub use transport::{CaptureSource, SessionTransport};
pub use variant::{ToolVariant, UnknownToolVariant};
