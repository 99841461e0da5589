//! tmux-backed [`SessionTransport`] and [`CaptureSource`].
//!
//! Every operation is one short-lived `tmux` invocation. Targets are passed
//! after `-t` and payloads after `--`, so neither is ever parsed as a flag.

use std::path::PathBuf;
use std::process::Stdio;

use agentmux_core::OrchestratorConfig;
use agentmux_proto::{CaptureSource, SessionTransport, TransportError};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Talks to a tmux server through its command-line client.
#[derive(Debug, Clone)]
pub struct TmuxTransport {
    tmux_bin: PathBuf,
    socket_name: Option<String>,
    capture_lines: usize,
}

impl TmuxTransport {
    /// Creates a transport for the default tmux server.
    pub fn new() -> Self {
        Self::from_config(&OrchestratorConfig::default())
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self {
            tmux_bin: config.tmux_bin.clone(),
            socket_name: config.socket_name.clone(),
            capture_lines: config.capture_lines,
        }
    }

    /// Arguments for one invocation, including the server socket selector.
    fn args<'a>(&'a self, subcommand: &[&'a str]) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(subcommand.len() + 2);
        if let Some(socket) = &self.socket_name {
            args.push("-L");
            args.push(socket.as_str());
        }
        args.extend_from_slice(subcommand);
        args
    }

    /// Runs `tmux <subcommand...>` and returns its stdout.
    ///
    /// `label` names the operation in errors and logs; payload text never
    /// appears there.
    async fn run(&self, label: &str, subcommand: &[&str]) -> Result<String, TransportError> {
        let command_label = format!("{} {label}", self.tmux_bin.display());

        let output = Command::new(&self.tmux_bin)
            .args(self.args(subcommand))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| {
                warn!(command = %command_label, error = %source, "failed to spawn tmux");
                TransportError::Spawn {
                    command: command_label.clone(),
                    source,
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(command = %command_label, code = ?output.status.code(), %stderr, "tmux command failed");
            return Err(TransportError::NonZeroExit {
                command: command_label,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Whether a session with exactly this name exists.
    pub async fn has_session(&self, session: &str) -> bool {
        let target = format!("={session}");
        self.run("has-session", &["has-session", "-t", &target])
            .await
            .is_ok()
    }
}

impl Default for TmuxTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionTransport for TmuxTransport {
    async fn send_literal_keys(&self, session: &str, text: &str) -> Result<(), TransportError> {
        debug!(session, bytes = text.len(), "tmux send-keys -l");
        self.run("send-keys -l", &["send-keys", "-t", session, "-l", "--", text])
            .await
            .map(drop)
    }

    async fn send_key(&self, session: &str, key: &str) -> Result<(), TransportError> {
        debug!(session, bytes = key.len(), "tmux send-keys");
        self.run("send-keys", &["send-keys", "-t", session, "--", key])
            .await
            .map(drop)
    }
}

#[async_trait]
impl CaptureSource for TmuxTransport {
    async fn capture_pane(
        &self,
        session: &str,
        max_lines: Option<usize>,
    ) -> Result<String, TransportError> {
        let start = format!("-{}", max_lines.unwrap_or(self.capture_lines));
        self.run(
            "capture-pane",
            &["capture-pane", "-p", "-e", "-J", "-t", session, "-S", &start],
        )
        .await
    }
}
