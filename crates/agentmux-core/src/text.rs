//! Text normalization for captured pane content.
//!
//! All pattern matching in this crate runs on normalized text only.

/// Strips ANSI escape sequences and canonicalizes line endings.
///
/// CSI sequences (SGR colors, cursor movement, erase) and OSC sequences
/// (titles, hyperlinks) are removed; printable text, tabs and newlines
/// survive.
/// `\r\n` and lone `\r` both become `\n` before stripping so that carriage
/// returns never glue two rendered lines together.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use agentmux_core::normalize;
///
/// assert_eq!(normalize("\x1b[1;36m✳ Planning…\x1b[0m\r\n❯ "), "✳ Planning…\n❯ ");
/// ```
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    // The stripper keeps newlines but drops tabs, so strip between them.
    unified
        .split('\t')
        .map(|segment| String::from_utf8_lossy(&strip_ansi_escapes::strip(segment.as_bytes())).into_owned())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Splits normalized text into lines, ignoring trailing blank rows.
///
/// tmux pads a captured pane with empty rows below the cursor; windows are
/// counted from the last row that has content.
pub(crate) fn content_lines(normalized: &str) -> Vec<&str> {
    normalized.trim_end().lines().collect()
}

/// The last `n` lines of `lines` (all of them if there are fewer).
pub(crate) fn tail<'a, 'b>(lines: &'b [&'a str], n: usize) -> &'b [&'a str] {
    &lines[lines.len().saturating_sub(n)..]
}

/// Removes surrounding whitespace and box-drawing side borders.
///
/// Agents render dialogs and input areas inside boxes (`│ ❯ 1. Yes   │`);
/// patterns are written against the content between the borders.
pub(crate) fn unbox(line: &str) -> &str {
    const BORDERS: &[char] = &['│', '┃', '║', '|'];
    line.trim()
        .trim_start_matches(BORDERS)
        .trim_end_matches(BORDERS)
        .trim()
}
