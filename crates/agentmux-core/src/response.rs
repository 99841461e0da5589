//! Extraction of the most recent agent response from an idle pane.

use agentmux_proto::ToolVariant;

use crate::patterns::PatternSet;
use crate::text::{content_lines, normalize, unbox};

/// Returns the agent's last rendered response.
///
/// The pane must be idle: its last meaningful line is the input marker and a
/// response separator sits above it (only blank lines or chrome between).
/// The response is everything between the last submitted input line and that
/// separator, without thinking/summary lines and surrounding blank lines.
/// Returns `None` for a busy pane, a pane without a separator, or an empty
/// response.
pub fn extract_last_response(raw: &str, variant: ToolVariant) -> Option<String> {
    let patterns = PatternSet::for_variant(variant);
    let normalized = normalize(raw);
    let lines = content_lines(&normalized);

    let input_index = patterns.last_meaningful_line(&lines)?;
    if !patterns.is_idle_input(lines[input_index]) {
        return None;
    }

    // Only blank lines and chrome may sit between the separator and the input.
    let search_from = lines[..input_index]
        .iter()
        .rposition(|line| !unbox(line).is_empty() && !patterns.is_chrome(line))
        .map_or(0, |i| i + 1);
    let separator_index = lines[search_from..input_index]
        .iter()
        .rposition(|line| patterns.is_separator(unbox(line)))
        .map(|offset| search_from + offset)?;

    let start = lines[..separator_index]
        .iter()
        .rposition(|line| {
            let content = unbox(line);
            patterns.is_idle_input(content) && content.chars().count() > 1
        })
        .map_or(0, |i| i + 1);

    let body: Vec<&str> = lines[start..separator_index]
        .iter()
        .copied()
        .filter(|line| !patterns.is_thinking(line))
        .collect();
    let text = body.join("\n");
    let text = text.trim_matches('\n').trim_end();

    (!text.trim().is_empty()).then(|| text.to_string())
}
