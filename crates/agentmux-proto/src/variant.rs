//! Supported agent tool variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The interactive CLI agent running inside a session.
///
/// Each variant selects its own pattern set in the pattern library. Adding a
/// variant is a compile-time-checked change: every pattern table matches on
/// this enum exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolVariant {
    /// Anthropic's Claude Code CLI.
    Claude,
    /// Google's Gemini CLI.
    Gemini,
    /// OpenAI's Codex CLI.
    Codex,
}

impl ToolVariant {
    /// All supported variants, in registry order.
    pub const ALL: [ToolVariant; 3] = [ToolVariant::Claude, ToolVariant::Gemini, ToolVariant::Codex];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolVariant::Claude => "claude",
            ToolVariant::Gemini => "gemini",
            ToolVariant::Codex => "codex",
        }
    }
}

impl fmt::Display for ToolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tool name does not map to a supported variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool variant '{0}' (expected one of: claude, gemini, codex)")]
pub struct UnknownToolVariant(pub String);

impl FromStr for ToolVariant {
    type Err = UnknownToolVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" | "claude-code" => Ok(ToolVariant::Claude),
            "gemini" | "gemini-cli" => Ok(ToolVariant::Gemini),
            "codex" | "codex-cli" => Ok(ToolVariant::Codex),
            _ => Err(UnknownToolVariant(s.to_string())),
        }
    }
}
