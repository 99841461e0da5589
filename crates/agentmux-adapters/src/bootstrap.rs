//! Trust-dialog bootstrap handshake.
//!
//! Freshly started agents may open a "do you trust this folder?" dialog
//! before showing their input prompt. [`TrustBootstrapper::bootstrap`] polls
//! the pane until the input prompt appears, pressing Enter (which accepts the
//! highlighted "Yes" option) the first time the dialog is seen.
//!
//! The dialog usually stays on screen for a few polls after Enter while the
//! agent re-renders. The Enter latch lives in the call's own poll state, so
//! each bootstrap attempt presses Enter at most once and concurrent attempts
//! on other sessions never share it.

use std::sync::Arc;
use std::time::Duration;

use agentmux_core::{PatternSet, StatusReason, classify, normalize, validate_session_name};
use agentmux_proto::{BootstrapError, CaptureSource, DispatchError, ToolVariant};
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, info, warn};

use crate::dispatcher::CommandDispatcher;

/// Floor for the poll interval; tokio rejects a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Successful bootstrap summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// Whether a trust dialog was acknowledged on the way.
    pub enter_sent: bool,
    /// Captures taken, including the one that saw the input prompt.
    pub polls: u32,
}

/// What a single capture shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    InputPrompt,
    TrustDialog,
    Pending,
}

fn observe(raw: &str, variant: ToolVariant) -> Observation {
    // Readiness first: a dialog still in the scrollback above a live prompt
    // must not hold the session in bootstrap.
    if classify(raw, variant).result.reason == StatusReason::InputPrompt {
        return Observation::InputPrompt;
    }
    if PatternSet::for_variant(variant).has_trust_dialog(&normalize(raw)) {
        Observation::TrustDialog
    } else {
        Observation::Pending
    }
}

/// Per-call poll state. Never shared between bootstrap attempts.
#[derive(Debug, Default)]
struct PollState {
    enter_sent: bool,
    polls: u32,
}

/// Drives the trust-dialog handshake for newly started sessions.
#[derive(Clone)]
pub struct TrustBootstrapper {
    capture: Arc<dyn CaptureSource>,
    dispatcher: CommandDispatcher,
    capture_lines: Option<usize>,
}

impl std::fmt::Debug for TrustBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustBootstrapper")
            .field("capture_lines", &self.capture_lines)
            .finish_non_exhaustive()
    }
}

impl TrustBootstrapper {
    pub fn new(capture: Arc<dyn CaptureSource>, dispatcher: CommandDispatcher) -> Self {
        Self {
            capture,
            dispatcher,
            capture_lines: None,
        }
    }

    /// Limits how much scrollback each poll captures.
    pub fn with_capture_lines(mut self, lines: usize) -> Self {
        self.capture_lines = Some(lines);
        self
    }

    /// Polls `session` every `poll_interval` until its input prompt shows,
    /// acknowledging a trust dialog at most once.
    ///
    /// Fails with [`BootstrapError::Timeout`] once `timeout_after` elapses,
    /// and with [`BootstrapError::Dispatch`] for an invalid session name or a
    /// failed Enter. A failed capture counts as an empty pane.
    pub async fn bootstrap(
        &self,
        session: &str,
        variant: ToolVariant,
        timeout_after: Duration,
        poll_interval: Duration,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        validate_session_name(session)?;

        let mut state = PollState::default();
        let outcome = timeout(
            timeout_after,
            self.poll_until_ready(session, variant, poll_interval, &mut state),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                info!(
                    session,
                    %variant,
                    enter_sent = state.enter_sent,
                    polls = state.polls,
                    "session ready"
                );
                Ok(BootstrapOutcome {
                    enter_sent: state.enter_sent,
                    polls: state.polls,
                })
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                let timeout_ms = u64::try_from(timeout_after.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    session,
                    %variant,
                    timeout_ms,
                    enter_sent = state.enter_sent,
                    polls = state.polls,
                    "bootstrap timed out"
                );
                Err(BootstrapError::Timeout {
                    timeout_ms,
                    enter_sent: state.enter_sent,
                })
            }
        }
    }

    async fn poll_until_ready(
        &self,
        session: &str,
        variant: ToolVariant,
        poll_interval: Duration,
        state: &mut PollState,
    ) -> Result<(), DispatchError> {
        let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            state.polls += 1;

            let raw = match self.capture.capture_pane(session, self.capture_lines).await {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(session, error = %e, "capture failed, treating pane as empty");
                    String::new()
                }
            };

            match observe(&raw, variant) {
                Observation::InputPrompt => return Ok(()),
                Observation::TrustDialog if !state.enter_sent => {
                    // Latch before sending: a send cut off by the timeout
                    // still counts as sent.
                    state.enter_sent = true;
                    info!(session, %variant, poll = state.polls, "trust dialog detected, sending Enter");
                    self.dispatcher.send_enter(session).await?;
                }
                Observation::TrustDialog => {
                    debug!(session, poll = state.polls, "trust dialog still visible");
                }
                Observation::Pending => {
                    debug!(session, poll = state.polls, "waiting for input prompt");
                }
            }
        }
    }
}
