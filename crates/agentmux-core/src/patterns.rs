//! Per-tool pattern tables.
//!
//! Each [`ToolVariant`] owns one immutable [`PatternSet`], compiled from the
//! static source table below on first use and shared for the life of the
//! process. Every method is a pure predicate or extractor over a string.
//!
//! Thinking patterns deliberately match both a live spinner (`✳ Planning…`)
//! and the summary line the agent leaves behind once the work is finished
//! (`✳ Churned for 41s…`). Telling the two apart is the classifier's job,
//! done by windowing.

use std::sync::LazyLock;

use agentmux_proto::{MultipleChoiceOption, ToolVariant};
use regex::Regex;

/// Regex sources for one tool variant.
struct PatternSource {
    /// Spinner line or interrupt marker, matched against an unboxed line.
    thinking: &'static str,
    /// Multi-line trust dialog; must capture the safety phrase as `phrase`.
    trust_dialog: &'static str,
    /// Idle input marker, matched against an unboxed line.
    idle_input: &'static str,
    /// UI chrome rendered below the input area (box edges, footer hints).
    chrome: &'static str,
}

const CLAUDE: PatternSource = PatternSource {
    thinking: r"^[·✢✳✶✻✽]\s*\S.*?(?:…|\.\.\.)|(?i:\(?esc to interrupt\)?)",
    trust_dialog: r"(?s)(?P<phrase>Do you trust the files in this folder\?|Is this a project you created or one you trust\?).*?Yes, (?:I trust this(?: folder)?|proceed).*?No, exit",
    idle_input: r"^[❯>](?:\s.*)?$",
    chrome: r"^[╭╰┌└][─━╮╯┐┘\s]*$|^\?\s+for shortcuts|^⏵⏵|^Context left until|(?i:^(?:auto-accept|bypass permissions|plan mode))",
};

const GEMINI: PatternSource = PatternSource {
    thinking: r"^[⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏]\s*\S.*?(?:…|\.\.\.|\(esc to cancel)|(?i:\(?esc to cancel)",
    trust_dialog: r"(?s)(?P<phrase>Do you trust this folder\?|Do you trust the files in this folder\?).*?(?:Yes, I trust this(?: folder)?|Trust folder).*?(?:No, exit|Don't trust)",
    idle_input: r"^>(?:\s.*)?$",
    chrome: r"^[╭╰┌└][─━╮╯┐┘\s]*$|(?i:^(?:using:|~/|no sandbox|accepting edits|yolo mode))|\(\d+% context left\)",
};

const CODEX: PatternSource = PatternSource {
    thinking: r"^[•◦]\s*(?:Working|Thinking)\b|^[⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏]\s*\S.*?(?:…|\.\.\.)|(?i:\(?esc to interrupt\)?)",
    trust_dialog: r"(?s)(?P<phrase>Do you trust the contents of this directory\?|Allow Codex to work in this folder without asking for approval\?).*?Yes, (?:I trust this|continue|allow).*?No, (?:exit|quit)",
    idle_input: r"^[›>▌](?:\s.*)?$",
    chrome: r"^[╭╰┌└][─━╮╯┐┘\s]*$|(?i:^⏎ send|% context left$|^ctrl\+)",
};

/// Line ending in `(y/n)`, `[Y/n]`, `(yes/no)` and similar.
const YES_NO_MARKER: &str =
    r"(?i)^(?P<question>.*?)\s*[(\[](?:y/n|yes/no)[)\]]\s*[:?]?\s*$";

/// Selection cursors drawn in front of the highlighted option. Shared by all
/// variants: tools borrow each other's glyphs across releases.
const OPTION_CURSORS: &str = "❯›>●▶";

/// Horizontal rule closing a rendered response.
const SEPARATOR: &str = r"^[─━═╌-]{8,}$";

fn compile(source: &str) -> Regex {
    Regex::new(source).expect("pattern table entries are valid regexes")
}

/// Compiled patterns for one tool variant.
#[derive(Debug)]
pub struct PatternSet {
    thinking: Regex,
    trust_dialog: Regex,
    yes_no_marker: Regex,
    styled_yes: Regex,
    styled_no: Regex,
    numbered_option: Regex,
    idle_input: Regex,
    chrome: Regex,
    separator: Regex,
}

static CLAUDE_SET: LazyLock<PatternSet> = LazyLock::new(|| PatternSet::compile(&CLAUDE));
static GEMINI_SET: LazyLock<PatternSet> = LazyLock::new(|| PatternSet::compile(&GEMINI));
static CODEX_SET: LazyLock<PatternSet> = LazyLock::new(|| PatternSet::compile(&CODEX));

impl PatternSet {
    /// The shared pattern set for `variant`.
    pub fn for_variant(variant: ToolVariant) -> &'static PatternSet {
        match variant {
            ToolVariant::Claude => &CLAUDE_SET,
            ToolVariant::Gemini => &GEMINI_SET,
            ToolVariant::Codex => &CODEX_SET,
        }
    }

    fn compile(source: &PatternSource) -> Self {
        let cursor = OPTION_CURSORS;
        Self {
            thinking: compile(source.thinking),
            trust_dialog: compile(source.trust_dialog),
            yes_no_marker: compile(YES_NO_MARKER),
            styled_yes: compile(&format!(r"^(?:[{cursor}]\s*)?Yes$")),
            styled_no: compile(&format!(r"^(?:[{cursor}]\s*)?No$")),
            numbered_option: compile(&format!(
                r"^(?:(?P<cursor>[{cursor}])\s*)?(?P<number>\d{{1,2}})[.)]\s+(?P<label>\S.*)$"
            )),
            idle_input: compile(source.idle_input),
            chrome: compile(source.chrome),
            separator: compile(SEPARATOR),
        }
    }

    /// Whether `line` is a spinner/summary line or an interrupt marker.
    pub fn is_thinking(&self, line: &str) -> bool {
        self.thinking.is_match(crate::text::unbox(line))
    }

    /// The safety phrase of a trust dialog found anywhere in `text`.
    ///
    /// Requires the phrase followed by both the accept and the exit option;
    /// an exit option on its own never matches.
    pub fn trust_dialog_phrase<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.trust_dialog
            .captures(text)
            .and_then(|caps| caps.name("phrase"))
            .map(|m| m.as_str())
    }

    /// Whether `text` contains a trust dialog.
    pub fn has_trust_dialog(&self, text: &str) -> bool {
        self.trust_dialog.is_match(text)
    }

    /// For a line ending in a `(y/n)`-style marker, the text before it.
    pub fn yes_no_question<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.yes_no_marker
            .captures(crate::text::unbox(line))
            .and_then(|caps| caps.name("question"))
            .map(|m| m.as_str().trim())
    }

    /// Whether `line` is a standalone styled `Yes` option.
    pub fn is_styled_yes(&self, line: &str) -> bool {
        self.styled_yes.is_match(crate::text::unbox(line))
    }

    /// Whether `line` is a standalone styled `No` option.
    pub fn is_styled_no(&self, line: &str) -> bool {
        self.styled_no.is_match(crate::text::unbox(line))
    }

    /// Parses `1. Label`, `❯ 2) Label` and the like.
    ///
    /// An option is flagged default when the selection cursor sits on it or
    /// its label is annotated `(default)` / `(recommended)`.
    pub fn parse_numbered_option(&self, line: &str) -> Option<MultipleChoiceOption> {
        let caps = self.numbered_option.captures(crate::text::unbox(line))?;
        let number = caps.name("number")?.as_str().parse().ok()?;
        let label = caps.name("label")?.as_str().trim().to_string();
        let lowered = label.to_lowercase();
        let is_default = caps.name("cursor").is_some()
            || lowered.ends_with("(default)")
            || lowered.ends_with("(recommended)");
        Some(MultipleChoiceOption {
            number,
            label,
            is_default,
        })
    }

    /// Whether `line` is the tool's idle input prompt, empty or with typed text.
    pub fn is_idle_input(&self, line: &str) -> bool {
        self.idle_input.is_match(crate::text::unbox(line))
    }

    /// Whether `line` is a horizontal rule ending a response.
    pub fn is_separator(&self, line: &str) -> bool {
        self.separator.is_match(line.trim())
    }

    /// Whether `line` is decoration the tool renders around its input area.
    pub fn is_chrome(&self, line: &str) -> bool {
        let content = crate::text::unbox(line);
        self.chrome.is_match(content) || self.is_separator(content)
    }

    /// Index of the last line that is neither blank nor chrome.
    pub fn last_meaningful_line(&self, lines: &[&str]) -> Option<usize> {
        lines
            .iter()
            .rposition(|line| !crate::text::unbox(line).is_empty() && !self.is_chrome(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claude() -> &'static PatternSet {
        PatternSet::for_variant(ToolVariant::Claude)
    }

    #[test]
    fn test_every_variant_compiles() {
        for variant in ToolVariant::ALL {
            let patterns = PatternSet::for_variant(variant);
            assert!(!patterns.is_thinking("plain output"), "{variant}");
            assert!(!patterns.has_trust_dialog("plain output"), "{variant}");
        }
    }

    #[test]
    fn test_thinking_matches_spinner_and_summary() {
        let p = claude();
        assert!(p.is_thinking("✳ Planning…"));
        assert!(p.is_thinking("✶ Reticulating... (12s · ↑ 1.2k tokens)"));
        assert!(p.is_thinking("✳ Churned for 41s…"));
        assert!(p.is_thinking("  (esc to interrupt)"));
        assert!(!p.is_thinking("⏺ Read(src/main.rs)"));
        assert!(!p.is_thinking("Here is the summary…"));
        assert!(!p.is_thinking("❯ "));
    }

    #[test]
    fn test_thinking_per_variant() {
        let gemini = PatternSet::for_variant(ToolVariant::Gemini);
        assert!(gemini.is_thinking("⠏ Counting electrons... (esc to cancel, 3s)"));
        assert!(!gemini.is_thinking("✳ Planning…"));

        let codex = PatternSet::for_variant(ToolVariant::Codex);
        assert!(codex.is_thinking("• Working (5s • Esc to interrupt)"));
        assert!(codex.is_thinking("• Working"));
        assert!(!codex.is_thinking("• Added a helper to parse args"));
    }

    #[test]
    fn test_trust_dialog_with_padding() {
        let dialog = "\n\n\n Do you trust the files in this folder?\n\n /home/me/project\n\n ❯ 1. Yes, proceed\n   2. No, exit\n\n\n";
        assert_eq!(
            claude().trust_dialog_phrase(dialog),
            Some("Do you trust the files in this folder?")
        );
    }

    #[test]
    fn test_trust_dialog_requires_phrase() {
        assert!(!claude().has_trust_dialog("Choose 2. No, exit to leave the tool"));
        assert!(!claude().has_trust_dialog("No, exit"));
    }

    #[test]
    fn test_yes_no_marker() {
        let p = claude();
        assert_eq!(p.yes_no_question("Do you want to proceed? (y/n)"), Some("Do you want to proceed?"));
        assert_eq!(p.yes_no_question("Overwrite file [Y/n]:"), Some("Overwrite file"));
        assert_eq!(p.yes_no_question("Continue (yes/no)?"), Some("Continue"));
        assert_eq!(p.yes_no_question("(y/n)"), Some(""));
        assert_eq!(p.yes_no_question("press y/n later to decide"), None);
    }

    #[test]
    fn test_styled_yes_no() {
        let p = claude();
        assert!(p.is_styled_yes("❯ Yes"));
        assert!(p.is_styled_yes("│  Yes   │"));
        assert!(p.is_styled_no("  No"));
        assert!(!p.is_styled_yes("Yes, and don't ask again"));
    }

    #[test]
    fn test_numbered_option() {
        let p = claude();
        let option = p.parse_numbered_option("│ ❯ 1. Yes │").unwrap();
        assert_eq!(option.number, 1);
        assert_eq!(option.label, "Yes");
        assert!(option.is_default);

        let option = p.parse_numbered_option("  2) No, and tell Claude what to do").unwrap();
        assert_eq!(option.number, 2);
        assert!(!option.is_default);

        let option = p.parse_numbered_option("3. Keep going (recommended)").unwrap();
        assert!(option.is_default);

        assert!(p.parse_numbered_option("1.5 liters").is_none());
        assert!(p.parse_numbered_option("Step 1. do it").is_none());
    }

    #[test]
    fn test_idle_input() {
        let p = claude();
        assert!(p.is_idle_input("❯ "));
        assert!(p.is_idle_input("❯"));
        assert!(p.is_idle_input("│ > Try \"refactor auth\" │"));
        assert!(!p.is_idle_input("❯❯ nope"));
        assert!(!p.is_idle_input("Response text"));

        let codex = PatternSet::for_variant(ToolVariant::Codex);
        assert!(codex.is_idle_input("› Ask Codex to do anything"));
    }

    #[test]
    fn test_separator_and_chrome() {
        let p = claude();
        assert!(p.is_separator("────────"));
        assert!(p.is_separator("  ──────────────────────  "));
        assert!(!p.is_separator("───"));
        assert!(p.is_chrome("╰──────────────╯"));
        assert!(p.is_chrome("  ? for shortcuts"));
        assert!(!p.is_chrome("❯ "));
    }

    #[test]
    fn test_last_meaningful_line_skips_chrome() {
        let lines = ["response", "╭────╮", "│ > │", "╰────╯", "  ? for shortcuts", ""];
        assert_eq!(claude().last_meaningful_line(&lines), Some(2));
        assert_eq!(claude().last_meaningful_line(&["", "  "]), None);
    }
}
