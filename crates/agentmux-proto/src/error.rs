//! Error types for transport, dispatch and bootstrap failures.

use thiserror::Error;

/// Failure of the out-of-process call into the terminal multiplexer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The multiplexer control process could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The multiplexer control process ran but reported failure.
    #[error("`{command}` exited with {}: {stderr}", exit_code_display(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_code_display(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}

/// Errors raised while validating or transmitting a command.
///
/// Validation variants are always returned before any I/O happens.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Session names are restricted to ASCII alphanumerics, `-` and `_`.
    #[error("invalid session name {0:?}: only letters, digits, '-' and '_' are allowed")]
    InvalidSessionName(String),

    #[error("payload contains a null byte at offset {position}")]
    NullByte { position: usize },

    /// Any control character other than newline and tab.
    #[error("payload contains forbidden control character U+{code:04X} at offset {position}")]
    ControlCharacter { code: u32, position: usize },

    #[error("payload has {lines} lines (max {max})")]
    TooManyLines { lines: usize, max: usize },

    #[error("payload is {bytes} bytes (max {max})")]
    PayloadTooLarge { bytes: usize, max: usize },

    /// The multiplexer rejected the transmission. Never retried internally.
    #[error("transmission failed: {0}")]
    Transport(#[from] TransportError),
}

impl DispatchError {
    /// Whether the error was raised before any I/O took place.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DispatchError::Transport(_))
    }
}

/// Errors raised by the trust-dialog bootstrap handshake.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No input prompt appeared before the deadline.
    #[error("timed out after {timeout_ms}ms waiting for the agent input prompt (enter sent: {enter_sent})")]
    Timeout { timeout_ms: u64, enter_sent: bool },

    /// Acknowledging the dialog failed.
    #[error("failed to acknowledge trust dialog: {0}")]
    Dispatch(#[from] DispatchError),
}
