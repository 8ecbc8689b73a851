// Quiz module
// This module parses provider output into structured quiz items


use std::sync::LazyLock;

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single parsed multiple-choice question.
///
/// `options` holds four answer texts on a well-formed response, but the
/// parser is best-effort and keeps whatever the provider returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

// Wire shape of a provider quiz item. The question key varies between
// responses, so both spellings are accepted; unknown keys are ignored and
// every field may be absent.
#[derive(Debug, Deserialize)]
struct RawQuizItem {
    #[serde(rename = "questionText", alias = "question", default)]
    question_text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(rename = "correctAnswer", default)]
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}

impl RawQuizItem {
    fn into_item(self) -> QuizItem {
        QuizItem {
            question_text: self.question_text,
            options: self.options.iter().map(|o| clean_option(o)).collect(),
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        }
    }
}

static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-D]\.\s*").expect("option label pattern is valid"));

/// Strip a leading "A. " style letter label from an option string.
fn clean_option(option: &str) -> String {
    OPTION_LABEL.replace(option, "").into_owned()
}

/// Best-effort extraction of the JSON array in loosely wrapped text.
///
/// Code-fence markers and surrounding prose are ignored; the candidate is
/// everything between the first `[` and the last `]`. `None` when no
/// bracket pair exists.
#[inline]
pub fn extract_json_array(raw: &str) -> Option<&str> {
    let stripped = strip_code_fences(raw);
    let start = stripped.find('[')?;
    let end = stripped.rfind(']')?;
    stripped.get(start..=end)
}

fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the opening fence line, including any language tag.
        text = rest.split_once('\n').map_or("", |(_, body)| body);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse provider output into quiz items.
///
/// Never fails: input without an extractable, valid JSON array yields an
/// empty list, and the caller decides what to show the student.
#[inline]
pub fn parse_quiz_response(raw: &str) -> Vec<QuizItem> {
    let Some(candidate) = extract_json_array(raw) else {
        warn!(
            "No JSON array found in provider response ({} characters)",
            raw.len()
        );
        return Vec::new();
    };

    match serde_json::from_str::<Vec<RawQuizItem>>(candidate) {
        Ok(raw_items) => raw_items.into_iter().map(RawQuizItem::into_item).collect(),
        Err(e) => {
            warn!("Provider response is not a valid quiz array: {}", e);
            Vec::new()
        }
    }
}

/// Integer percentage for `correct` answers out of `total`, zero when no
/// questions were answered.
#[inline]
pub fn score_percent(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0) as i64
}
