//! Structured data for interactive decision prompts.

use serde::{Deserialize, Serialize};

/// Kind of decision an agent is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    YesNo,
    MultipleChoice,
}

/// Lifecycle of a prompt from the caller's point of view.
///
/// Detection always produces `Pending`; only the caller moves a prompt to
/// `Answered`, after it has dispatched a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStatus {
    Pending,
    Answered,
}

/// The fixed option pair of a yes/no prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoOptions {
    pub yes: String,
    pub no: String,
}

impl Default for YesNoOptions {
    fn default() -> Self {
        Self {
            yes: "yes".to_string(),
            no: "no".to_string(),
        }
    }
}

/// One numbered entry of a multiple-choice prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceOption {
    pub number: u32,
    pub label: String,
    pub is_default: bool,
}

/// Options attached to a prompt, shaped by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptOptions {
    YesNo(YesNoOptions),
    MultipleChoice(Vec<MultipleChoiceOption>),
}

/// A decision prompt extracted from a pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptData {
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    pub question: String,
    pub options: PromptOptions,
    pub status: PromptStatus,
}

/// An answer a caller (or auto-responder) wants to give to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Yes,
    No,
    /// The number of a multiple-choice option.
    Choice(u32),
}

impl PromptData {
    /// Builds a pending yes/no prompt.
    pub fn yes_no(question: impl Into<String>) -> Self {
        Self {
            prompt_type: PromptType::YesNo,
            question: question.into(),
            options: PromptOptions::YesNo(YesNoOptions::default()),
            status: PromptStatus::Pending,
        }
    }

    /// Builds a pending multiple-choice prompt.
    pub fn multiple_choice(question: impl Into<String>, options: Vec<MultipleChoiceOption>) -> Self {
        Self {
            prompt_type: PromptType::MultipleChoice,
            question: question.into(),
            options: PromptOptions::MultipleChoice(options),
            status: PromptStatus::Pending,
        }
    }

    /// The option flagged as default, if any.
    pub fn default_option(&self) -> Option<&MultipleChoiceOption> {
        match &self.options {
            PromptOptions::MultipleChoice(options) => options.iter().find(|o| o.is_default),
            PromptOptions::YesNo(_) => None,
        }
    }

    /// Returns a copy marked as answered. The original is left untouched.
    #[must_use]
    pub fn answered(&self) -> Self {
        Self {
            status: PromptStatus::Answered,
            ..self.clone()
        }
    }

    /// Text to dispatch into the session to give `answer`.
    ///
    /// Returns `None` when the answer does not fit this prompt, e.g. a yes/no
    /// answer to a numbered prompt or an option number that was not offered.
    /// A numeric response is never produced for a number that is not listed.
    pub fn response_payload(&self, answer: PromptAnswer) -> Option<String> {
        match (&self.options, answer) {
            (PromptOptions::YesNo(_), PromptAnswer::Yes) => Some("y".to_string()),
            (PromptOptions::YesNo(_), PromptAnswer::No) => Some("n".to_string()),
            (PromptOptions::MultipleChoice(options), PromptAnswer::Choice(n)) => options
                .iter()
                .any(|o| o.number == n)
                .then(|| n.to_string()),
            _ => None,
        }
    }
}
