//! Runtime configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! `AGENTMUX_*` environment variables. Classifier windows and dispatch limits
//! are fixed constants and deliberately not configurable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::command::DEFAULT_INTER_KEY_DELAY_MS;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A setting was present but unusable.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Configuration shared by the adapters and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// tmux executable.
    pub tmux_bin: PathBuf,
    /// tmux server socket name (`tmux -L`), default server when unset.
    pub socket_name: Option<String>,
    /// Scrollback lines requested per capture.
    pub capture_lines: usize,
    /// Delay between a literal multi-line payload and its Enter key.
    pub inter_key_delay_ms: u64,
    /// Upper bound for the trust-dialog bootstrap handshake.
    pub bootstrap_timeout_ms: u64,
    /// Interval between bootstrap polls.
    pub poll_interval_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tmux_bin: PathBuf::from("tmux"),
            socket_name: None,
            capture_lines: 200,
            inter_key_delay_ms: DEFAULT_INTER_KEY_DELAY_MS,
            bootstrap_timeout_ms: 30_000,
            poll_interval_ms: 500,
        }
    }
}

impl OrchestratorConfig {
    /// Loads `path` if given (defaults otherwise), then applies environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a YAML config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `AGENTMUX_*` overrides looked up through `lookup`.
    ///
    /// Values that are set but do not parse are rejected rather than ignored.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(bin) = lookup("AGENTMUX_TMUX_BIN") {
            self.tmux_bin = PathBuf::from(bin);
        }
        if let Some(socket) = lookup("AGENTMUX_TMUX_SOCKET") {
            self.socket_name = (!socket.is_empty()).then_some(socket);
        }
        if let Some(value) = parse_var(&lookup, "AGENTMUX_CAPTURE_LINES")? {
            self.capture_lines = value;
        }
        if let Some(value) = parse_var(&lookup, "AGENTMUX_INTER_KEY_DELAY_MS")? {
            self.inter_key_delay_ms = value;
        }
        if let Some(value) = parse_var(&lookup, "AGENTMUX_BOOTSTRAP_TIMEOUT_MS")? {
            self.bootstrap_timeout_ms = value;
        }
        if let Some(value) = parse_var(&lookup, "AGENTMUX_POLL_INTERVAL_MS")? {
            self.poll_interval_ms = value;
        }
        self.validated()
    }

    pub fn inter_key_delay(&self) -> Duration {
        Duration::from_millis(self.inter_key_delay_ms)
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.bootstrap_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.capture_lines == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture_lines".to_string(),
                value: "0".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "poll_interval_ms".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.tmux_bin, PathBuf::from("tmux"));
        assert_eq!(config.socket_name, None);
        assert_eq!(config.inter_key_delay_ms, 100);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.bootstrap_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = OrchestratorConfig::default()
            .with_env_overrides(env(&[
                ("AGENTMUX_TMUX_BIN", "/opt/bin/tmux"),
                ("AGENTMUX_TMUX_SOCKET", "agents"),
                ("AGENTMUX_INTER_KEY_DELAY_MS", "0"),
                ("AGENTMUX_POLL_INTERVAL_MS", " 250 "),
            ]))
            .unwrap();
        assert_eq!(config.tmux_bin, PathBuf::from("/opt/bin/tmux"));
        assert_eq!(config.socket_name.as_deref(), Some("agents"));
        assert_eq!(config.inter_key_delay_ms, 0);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.capture_lines, 200);
    }

    #[test]
    fn test_empty_socket_clears_setting() {
        let config = OrchestratorConfig {
            socket_name: Some("old".to_string()),
            ..Default::default()
        }
        .with_env_overrides(env(&[("AGENTMUX_TMUX_SOCKET", "")]))
        .unwrap();
        assert_eq!(config.socket_name, None);
    }

    #[test]
    fn test_unparseable_env_is_rejected() {
        let err = OrchestratorConfig::default()
            .with_env_overrides(env(&[("AGENTMUX_CAPTURE_LINES", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "AGENTMUX_CAPTURE_LINES"));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = OrchestratorConfig::default()
            .with_env_overrides(env(&[("AGENTMUX_POLL_INTERVAL_MS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agentmux.yml");
        std::fs::write(&path, "socket_name: agents\nbootstrap_timeout_ms: 5000\n").unwrap();

        let config = OrchestratorConfig::from_file(&path).unwrap();
        assert_eq!(config.socket_name.as_deref(), Some("agents"));
        assert_eq!(config.bootstrap_timeout_ms, 5000);
        assert_eq!(config.capture_lines, 200);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yml");
        assert!(matches!(
            OrchestratorConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.yml");
        std::fs::write(&bad, "capture_lines: [not, a, number]\n").unwrap();
        assert!(matches!(
            OrchestratorConfig::from_file(&bad),
            Err(ConfigError::Parse { .. })
        ));
    }
}
