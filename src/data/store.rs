use thiserror::Error;

use crate::models::QuestionRecord;

/// A question index did not resolve against the loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("question index {index} is out of range for a corpus of {len} questions")]
pub struct OutOfRangeQuestionIndex {
    pub index: usize,
    pub len: usize,
}

/// Ordered, read-only collection of questions loaded at startup.
#[derive(Debug)]
pub struct QuestionStore {
    questions: Vec<QuestionRecord>,
}

impl QuestionStore {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Resolve an index, failing fast instead of rendering missing content.
    pub fn get(&self, index: usize) -> Result<&QuestionRecord, OutOfRangeQuestionIndex> {
        self.questions.get(index).ok_or(OutOfRangeQuestionIndex {
            index,
            len: self.questions.len(),
        })
    }
}
