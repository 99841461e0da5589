//! Interactive decision-prompt extraction.

use agentmux_proto::{MultipleChoiceOption, PromptData, ToolVariant};

use crate::patterns::PatternSet;
use crate::text::unbox;

/// Detects and parses a decision prompt inside `window_text`.
///
/// Recognized shapes, most specific first:
/// - the tool's trust dialog, reported as yes/no with the dialog's safety
///   phrase as the question; it wins over anything else in the window
/// - a line ending in a `(y/n)`-style marker
/// - a standalone styled `Yes` / `No` option pair
/// - a question followed by a numbered option run (`1. …`, `2. …`)
///
/// When several of the last three are present the one rendered lowest in the
/// window wins. The result is always `pending`.
pub fn extract_prompt(window_text: &str, variant: ToolVariant) -> Option<PromptData> {
    let patterns = PatternSet::for_variant(variant);

    if let Some(phrase) = patterns.trust_dialog_phrase(window_text) {
        return Some(PromptData::yes_no(phrase));
    }

    let lines: Vec<&str> = window_text.lines().collect();
    [
        marker_prompt(patterns, &lines),
        styled_pair_prompt(patterns, &lines),
        numbered_prompt(patterns, &lines),
    ]
    .into_iter()
    .flatten()
    .max_by_key(|(anchor, _)| *anchor)
    .map(|(_, prompt)| prompt)
}

/// Nearest non-blank line above `index`.
fn question_above<'a>(lines: &[&'a str], index: usize) -> Option<&'a str> {
    lines[..index]
        .iter()
        .rev()
        .map(|line| unbox(line))
        .find(|line| !line.is_empty())
}

fn marker_prompt(patterns: &PatternSet, lines: &[&str]) -> Option<(usize, PromptData)> {
    lines.iter().enumerate().rev().find_map(|(index, line)| {
        let inline = patterns.yes_no_question(line)?;
        let question = if inline.is_empty() {
            question_above(lines, index).unwrap_or_default()
        } else {
            inline
        };
        Some((index, PromptData::yes_no(question)))
    })
}

fn styled_pair_prompt(patterns: &PatternSet, lines: &[&str]) -> Option<(usize, PromptData)> {
    let mut found = None;
    for (index, line) in lines.iter().enumerate() {
        if !patterns.is_styled_yes(line) {
            continue;
        }
        let no_index = lines[index + 1..]
            .iter()
            .position(|l| !unbox(l).is_empty())
            .map(|offset| index + 1 + offset)
            .filter(|&i| patterns.is_styled_no(lines[i]));
        if let Some(no_index) = no_index {
            let question = question_above(lines, index).unwrap_or_default();
            found = Some((no_index, PromptData::yes_no(question)));
        }
    }
    found
}

/// Parses the last numbered run in the window.
///
/// The run must be unbroken, start at 1, and count up by one; a blank or
/// unrelated line splitting the options invalidates the prompt instead of
/// yielding a partial list. A run followed by the idle input marker, a
/// response separator or a thinking indicator is a list inside a response
/// (finished or still streaming), not a prompt.
fn numbered_prompt(patterns: &PatternSet, lines: &[&str]) -> Option<(usize, PromptData)> {
    let last = lines
        .iter()
        .rposition(|line| patterns.parse_numbered_option(line).is_some())?;

    let mut options: Vec<MultipleChoiceOption> = Vec::new();
    let mut first = last;
    for index in (0..=last).rev() {
        match patterns.parse_numbered_option(lines[index]) {
            Some(option) => {
                options.push(option);
                first = index;
            }
            None => break,
        }
    }
    options.reverse();

    if options.len() < 2 {
        return None;
    }
    let sequential = options
        .iter()
        .zip(1u32..)
        .all(|(option, expected)| option.number == expected);
    if !sequential {
        return None;
    }

    let question = question_above(lines, first)?;
    if patterns.parse_numbered_option(question).is_some() {
        return None;
    }

    let not_awaiting_choice = lines[last + 1..].iter().any(|line| {
        let content = unbox(line);
        !content.is_empty()
            && (patterns.is_idle_input(content)
                || patterns.is_separator(content)
                || patterns.is_thinking(content))
    });
    if not_awaiting_choice {
        return None;
    }

    Some((last, PromptData::multiple_choice(question, options)))
}
