use agentmux_core::{
    Confidence, PROMPT_WINDOW_LINES, SessionStatus, StatusDetectionResult, StatusReason,
    THINKING_WINDOW_LINES, ToolVariant, classify, detect_session_status, extract_last_response,
};
use agentmux_proto::{PromptOptions, PromptType};

fn filler(count: usize) -> String {
    (0..count)
        .map(|i| format!("rendered response line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps every non-space character run in color codes.
fn colorize(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\x1b[38;5;208m\x1b[1m{line}\x1b[0m\x1b[K")
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

const PROMPTS: &[&str] = &[
    "Do you want to proceed? (y/n)",
    "Overwrite existing file? [y/N]",
    "Which package manager?\n❯ 1. npm\n  2. pnpm\n  3. yarn",
];

/// Prompts carrying an explicit answer marker.
const MARKED_PROMPTS: &[&str] = &["Do you want to proceed? (y/n)", "Overwrite existing file? [y/N]"];

const THINKING: &[(ToolVariant, &str)] = &[
    (ToolVariant::Claude, "✳ Planning…"),
    (ToolVariant::Claude, "✻ Churned for 2m 3s…"),
    (ToolVariant::Gemini, "⠼ Reading the codebase... (esc to cancel, 12s)"),
    (ToolVariant::Codex, "• Working (8s • Esc to interrupt)"),
];

#[test]
fn prompt_in_window_wins_over_thinking() {
    for variant in ToolVariant::ALL {
        for prompt in PROMPTS {
            for (position, capture) in [
                format!("✳ Planning…\n{prompt}"),
                format!("{}\n{prompt}\n{}", filler(20), filler(3)),
            ]
            .iter()
            .enumerate()
            {
                let classification = classify(capture, variant);
                assert_eq!(
                    classification.result,
                    StatusDetectionResult::waiting_on_prompt(),
                    "variant {variant}, case {position}: {capture:?}"
                );
                assert!(classification.prompt.is_some());
            }
        }
        for prompt in MARKED_PROMPTS {
            let capture = format!("{prompt}\n✳ Planning…\n(esc to interrupt)");
            assert_eq!(
                detect_session_status(&capture, variant),
                StatusDetectionResult::waiting_on_prompt(),
                "variant {variant}: {capture:?}"
            );
        }
    }
}

#[test]
fn prompt_pushed_out_of_window_is_not_active() {
    let capture = format!("Do you want to proceed? (y/n)\n{}", filler(PROMPT_WINDOW_LINES + 1));
    let result = detect_session_status(&capture, ToolVariant::Claude);
    assert!(!result.has_active_prompt);
    assert_ne!(result.status, SessionStatus::Waiting);

    let inside = format!("Do you want to proceed? (y/n)\n{}", filler(PROMPT_WINDOW_LINES - 1));
    assert!(detect_session_status(&inside, ToolVariant::Claude).has_active_prompt);
}

#[test]
fn thinking_line_within_window_is_running() {
    for (variant, line) in THINKING {
        for after in 0..THINKING_WINDOW_LINES {
            let capture = format!("❯ do the thing\n{line}\n{}", filler(after));
            let capture = capture.trim_end();
            let result = detect_session_status(capture, *variant);
            assert_eq!(
                result,
                StatusDetectionResult::thinking(),
                "{variant}: {line:?} followed by {after} lines"
            );
        }
    }
}

#[test]
fn thinking_line_beyond_window_never_reports_thinking() {
    for (variant, line) in THINKING {
        for after in THINKING_WINDOW_LINES..THINKING_WINDOW_LINES + 4 {
            let capture = format!("{line}\n{}", filler(after));
            let result = detect_session_status(&capture, *variant);
            assert!(
                !(result.status == SessionStatus::Running
                    && result.reason == StatusReason::ThinkingIndicator),
                "{variant}: {line:?} followed by {after} lines was {result:?}"
            );
        }
    }
}

#[test]
fn normalization_is_transparent() {
    let scenarios = [
        (ToolVariant::Claude, "❯ Tell me about X\n\n✳ Churned for 41s…\n\n<response text>\n\n────────\n❯ "),
        (ToolVariant::Claude, "❯ Refactor auth\n\n✳ Planning…"),
        (ToolVariant::Claude, "Which package manager?\n❯ 1. npm\n  2. pnpm"),
        (ToolVariant::Gemini, "✦ Done\n│ > │"),
        (ToolVariant::Codex, "Do you want to proceed? (y/n)"),
        (ToolVariant::Codex, "cargo build output"),
    ];
    for (variant, plain) in scenarios {
        let plain_result = classify(plain, variant);
        let colored_result = classify(&colorize(plain), variant);
        assert_eq!(plain_result, colored_result, "{variant}: {plain:?}");
    }
}

#[test]
fn documented_examples() {
    let finished = "❯ Tell me about X\n\n✳ Churned for 41s…\n\n<response text>\n\n────────\n❯ ";
    let result = detect_session_status(finished, ToolVariant::Claude);
    assert_eq!(result.status, SessionStatus::Ready);
    assert_eq!(result.reason, StatusReason::InputPrompt);
    assert!(!result.has_active_prompt);
    assert_eq!(
        extract_last_response(finished, ToolVariant::Claude).as_deref(),
        Some("<response text>")
    );

    let busy = detect_session_status("❯ Refactor auth\n\n✳ Planning…", ToolVariant::Claude);
    assert_eq!(busy.status, SessionStatus::Running);
    assert_eq!(busy.reason, StatusReason::ThinkingIndicator);
    assert_eq!(busy.confidence, Confidence::High);
}

#[test]
fn streaming_numbered_list_is_running_not_waiting() {
    let capture =
        "❯ plan the migration\n\n⏺ Steps:\n1. Add the users table\n2. Write the migration\n\n✳ Writing…";
    let classification = classify(capture, ToolVariant::Claude);
    assert_eq!(classification.result, StatusDetectionResult::thinking());
    assert!(classification.prompt.is_none());

    let codex = "› plan it\n\nPlan:\n1. Parse input\n2. Emit output\n• Working (4s • Esc to interrupt)";
    assert_eq!(
        detect_session_status(codex, ToolVariant::Codex),
        StatusDetectionResult::thinking()
    );
}

#[test]
fn multiple_choice_prompt_is_structured() {
    let capture = "\
⏺ Bash(rm -rf target)

╭─────────────────────────────────────────╮
│ Do you want to proceed?                 │
│ ❯ 1. Yes                                │
│   2. No, and tell Claude what to do     │
╰─────────────────────────────────────────╯";
    let classification = classify(capture, ToolVariant::Claude);
    let prompt = classification.prompt.expect("prompt");
    assert_eq!(prompt.prompt_type, PromptType::MultipleChoice);
    assert_eq!(prompt.question, "Do you want to proceed?");
    match prompt.options {
        PromptOptions::MultipleChoice(options) => {
            assert_eq!(options.len(), 2);
            assert_eq!(options[0].number, 1);
            assert!(options[0].is_default);
            assert_eq!(options[1].label, "No, and tell Claude what to do");
        }
        PromptOptions::YesNo(_) => panic!("expected numbered options"),
    }
}

#[test]
fn empty_capture_is_no_signal() {
    for variant in ToolVariant::ALL {
        assert_eq!(
            detect_session_status("", variant),
            StatusDetectionResult::no_signal()
        );
    }
}
