//! # agentmux-adapters
//!
//! Process-facing half of agentmux:
//! - [`TmuxTransport`] drives `tmux send-keys` and `tmux capture-pane`
//! - [`CommandDispatcher`] validates payloads and picks the transmission mode
//! - [`TrustBootstrapper`] acknowledges first-run trust dialogs at most once
//! - [`detect_pane_status`] captures and classifies a pane in one call
//!
//! The [`testing`] module provides in-memory doubles for both collaborator
//! traits.

mod bootstrap;
mod dispatcher;
mod monitor;
pub mod testing;
mod tmux;

pub use bootstrap::{BootstrapOutcome, TrustBootstrapper};
pub use dispatcher::CommandDispatcher;
pub use monitor::{capture_session, detect_pane_status};
pub use tmux::TmuxTransport;
