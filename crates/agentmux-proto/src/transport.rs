//! Collaborator traits for talking to a terminal multiplexer.
//!
//! The orchestration core never spawns processes itself. It reads panes
//! through a [`CaptureSource`] and writes keystrokes through a
//! [`SessionTransport`]; the tmux-backed implementation lives in
//! `agentmux-adapters`, and tests substitute in-memory doubles.

use async_trait::async_trait;

use crate::error::TransportError;

/// Injects keystrokes into a named session.
///
/// Implementations assume at most one in-flight call per session name;
/// serializing writers is the caller's job.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Sends `text` byte-for-byte, bypassing key-name interpretation.
    async fn send_literal_keys(&self, session: &str, text: &str) -> Result<(), TransportError>;

    /// Sends a named key (e.g. `Enter`) through the normal key path. Never
    /// used for caller-supplied text.
    async fn send_key(&self, session: &str, key: &str) -> Result<(), TransportError>;
}

/// Reads rendered scrollback from a named session.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Returns raw pane text (ANSI escapes preserved), at most `max_lines`
    /// lines of history when given.
    async fn capture_pane(
        &self,
        session: &str,
        max_lines: Option<usize>,
    ) -> Result<String, TransportError>;
}
