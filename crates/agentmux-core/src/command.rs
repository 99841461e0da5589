//! Validation of outbound text into a ready-to-transmit [`SessionCommand`].
//!
//! Validation is fail-fast and runs entirely before any I/O:
//! 1. the session name must be a plain identifier (`[A-Za-z0-9_-]+`)
//! 2. the payload must not contain a null byte
//! 3. the payload must not contain any other control character except `\n`
//!    and `\t`
//! 4. the payload must have at most [`MAX_PAYLOAD_LINES`] lines
//! 5. the payload must be at most [`MAX_PAYLOAD_BYTES`] bytes
//!
//! A payload containing a newline is sent in [`TransmissionMode::Literal`];
//! anything else uses [`TransmissionMode::Standard`].

use agentmux_proto::DispatchError;

/// Maximum number of lines in one payload.
pub const MAX_PAYLOAD_LINES: usize = 10_000;

/// Maximum payload size in bytes (100 KiB).
pub const MAX_PAYLOAD_BYTES: usize = 100 * 1024;

/// Delay between a literal payload and its Enter key, unless overridden.
pub const DEFAULT_INTER_KEY_DELAY_MS: u64 = 100;

/// How a payload is handed to the multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionMode {
    /// Single-line text through the normal key path, then Enter separately.
    Standard,
    /// Multi-line text injected byte-for-byte in one operation, then Enter
    /// separately after the inter-key delay.
    Literal,
}

/// A validated dispatch request.
///
/// Only constructible through [`SessionCommand::new`], so holding one means
/// the session name and payload already passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCommand {
    session_name: String,
    payload: String,
    transmission_mode: TransmissionMode,
    inter_key_delay_ms: u64,
}

impl SessionCommand {
    /// Validates the request and selects a transmission mode.
    pub fn new(
        session_name: impl Into<String>,
        payload: impl Into<String>,
        inter_key_delay_ms: u64,
    ) -> Result<Self, DispatchError> {
        let session_name = session_name.into();
        let payload = payload.into();

        validate_session_name(&session_name)?;
        validate_payload(&payload)?;

        let transmission_mode = if payload.contains('\n') {
            TransmissionMode::Literal
        } else {
            TransmissionMode::Standard
        };

        Ok(Self {
            session_name,
            payload,
            transmission_mode,
            inter_key_delay_ms,
        })
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn transmission_mode(&self) -> TransmissionMode {
        self.transmission_mode
    }

    pub fn inter_key_delay_ms(&self) -> u64 {
        self.inter_key_delay_ms
    }
}

/// Rejects anything but ASCII letters, digits, `-` and `_`.
///
/// Keeps shell metacharacters and tmux target syntax (`:`, `.`, `=`) out of
/// the target argument.
pub fn validate_session_name(name: &str) -> Result<(), DispatchError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DispatchError::InvalidSessionName(name.to_string()))
    }
}

/// Applies the payload rules in order, returning the first violation.
pub fn validate_payload(payload: &str) -> Result<(), DispatchError> {
    if let Some(position) = payload.find('\0') {
        return Err(DispatchError::NullByte { position });
    }

    if let Some((position, c)) = payload
        .char_indices()
        .find(|&(_, c)| c.is_control() && c != '\n' && c != '\t')
    {
        return Err(DispatchError::ControlCharacter {
            code: u32::from(c),
            position,
        });
    }

    let lines = payload.lines().count();
    if lines > MAX_PAYLOAD_LINES {
        return Err(DispatchError::TooManyLines {
            lines,
            max: MAX_PAYLOAD_LINES,
        });
    }

    let bytes = payload.len();
    if bytes > MAX_PAYLOAD_BYTES {
        return Err(DispatchError::PayloadTooLarge {
            bytes,
            max: MAX_PAYLOAD_BYTES,
        });
    }

    Ok(())
}
