use serde::Deserialize;

/// A single trivia question from the corpus.
///
/// The answer field is a semicolon-delimited list of accepted answers;
/// the first entry is the canonical answer shown to the user.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "questionText")]
    pub text: String,
    #[serde(rename = "questionAnswer")]
    answer: String,
    #[serde(rename = "questionComment", default)]
    pub comment: String,
}

impl QuestionRecord {
    pub fn new(
        text: impl Into<String>,
        answer: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            comment: comment.into(),
        }
    }

    /// Split the raw answer field into individual accepted answers.
    ///
    /// Entries are trimmed and empty entries are dropped, so `"4; four"`
    /// yields `["4", "four"]`.
    pub fn accepted_answers(&self) -> Vec<&str> {
        self.answer
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
