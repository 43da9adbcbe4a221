//! Answer normalization and comparison.

use crate::models::QuestionRecord;

/// Normalize an answer for comparison: trim surrounding whitespace and
/// lowercase. Applied identically to stored answers and user input.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Check a candidate answer against every accepted answer of a question.
pub fn is_correct(user_answer: &str, record: &QuestionRecord) -> bool {
    let candidate = normalize(user_answer);
    record
        .accepted_answers()
        .iter()
        .any(|accepted| normalize(accepted) == candidate)
}

/// The first accepted answer, verbatim, used for display when the user
/// answered incorrectly.
pub fn canonical_answer(record: &QuestionRecord) -> &str {
    record.accepted_answers().first().copied().unwrap_or_default()
}
