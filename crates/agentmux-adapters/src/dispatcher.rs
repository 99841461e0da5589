//! Safe command dispatch.
//!
//! Payloads are validated into a [`SessionCommand`] before anything touches
//! the transport, then sent in one of two modes:
//!
//! - **Standard** (single line): the text byte-for-byte, then `Enter` as a
//!   separate operation with no delay.
//! - **Literal** (contains a newline): the whole payload byte-for-byte in one
//!   operation, a pause of the inter-key delay, then `Enter`. Sending the
//!   newlines literally keeps the agent from submitting each line on its own.
//!
//! Failed transmissions are surfaced, never retried: the text may already be
//! half-typed into the pane.

use std::sync::Arc;
use std::time::Duration;

use agentmux_core::{SessionCommand, TransmissionMode, validate_session_name};
use agentmux_proto::{DispatchError, SessionTransport};
use tracing::{debug, info, warn};

/// Key name used to submit the typed text.
const ENTER: &str = "Enter";

/// Validates and transmits text into agent sessions.
///
/// Holds no per-session state; callers serialize dispatches per session.
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn SessionTransport>,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher").finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        Self { transport }
    }

    /// Validates `payload` and sends it, followed by Enter, to `session`.
    ///
    /// `inter_key_delay_ms` separates a literal payload from its Enter key
    /// (see [`agentmux_core::DEFAULT_INTER_KEY_DELAY_MS`]). Returns the
    /// command that was sent. Validation errors are returned before any
    /// transport call.
    pub async fn dispatch(
        &self,
        session: &str,
        payload: &str,
        inter_key_delay_ms: u64,
    ) -> Result<SessionCommand, DispatchError> {
        let command = SessionCommand::new(session, payload, inter_key_delay_ms)
            .inspect_err(|e| debug!(session, error = %e, "rejected payload"))?;
        self.send(&command).await?;
        Ok(command)
    }

    /// Transmits an already validated command.
    pub async fn send(&self, command: &SessionCommand) -> Result<(), DispatchError> {
        let session = command.session_name();
        let payload = command.payload();
        let mode = command.transmission_mode();

        info!(
            session,
            mode = ?mode,
            bytes = payload.len(),
            lines = payload.lines().count(),
            "dispatching command"
        );

        match mode {
            TransmissionMode::Standard => {
                // Literal even for one line: tmux would otherwise read a
                // payload such as `Escape` or `C-c` as a key name.
                if !payload.is_empty() {
                    self.transport
                        .send_literal_keys(session, payload)
                        .await
                        .inspect_err(|e| warn!(session, error = %e, "text transmission failed"))?;
                }
            }
            TransmissionMode::Literal => {
                self.transport
                    .send_literal_keys(session, payload)
                    .await
                    .inspect_err(|e| warn!(session, error = %e, "literal transmission failed"))?;
                let delay = command.inter_key_delay_ms();
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }

        self.press_enter(session).await
    }

    /// Presses Enter in `session` without sending any text.
    pub async fn send_enter(&self, session: &str) -> Result<(), DispatchError> {
        validate_session_name(session)?;
        self.press_enter(session).await
    }

    async fn press_enter(&self, session: &str) -> Result<(), DispatchError> {
        self.transport
            .send_key(session, ENTER)
            .await
            .inspect_err(|e| warn!(session, error = %e, "enter key transmission failed"))?;
        Ok(())
    }
}
