//! Quiz session state and transitions.
//!
//! The session owns the current question pointer, the in-progress answer
//! and the answered lock. Every other part of the application requests
//! transitions through the methods here and never mutates fields directly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{OutOfRangeQuestionIndex, QuestionStore};
use crate::evaluator;
use crate::models::QuestionRecord;

/// Feedback marker shown after a correct answer.
pub const CORRECT_MARKER: &str = "Correct!";

/// Feedback marker shown before the revealed answer after a miss.
pub const INCORRECT_MARKER: &str = "Incorrect. The correct answer is:";

/// Result message for the current question, empty until a submission
/// has occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct {
        comment: String,
    },
    Incorrect {
        correct_answer: String,
        comment: String,
    },
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        matches!(self, Feedback::None)
    }

    /// Compose the full result message as plain text.
    pub fn message(&self) -> String {
        match self {
            Feedback::None => String::new(),
            Feedback::Correct { comment } => {
                if comment.is_empty() {
                    CORRECT_MARKER.to_string()
                } else {
                    format!("{CORRECT_MARKER} {comment}")
                }
            }
            Feedback::Incorrect {
                correct_answer,
                comment,
            } => {
                if comment.is_empty() {
                    format!("{INCORRECT_MARKER} {correct_answer}")
                } else {
                    format!("{INCORRECT_MARKER} {correct_answer}. {comment}")
                }
            }
        }
    }
}

/// Outcome of a submission, reported back to the assistant host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub correct: bool,
    pub canonical_answer: String,
    /// Short human-readable summary for the host to render or speak.
    pub spoken: String,
}

/// Mutable state for one endless quiz run.
///
/// The question pointer is re-rolled uniformly on every new question.
/// One submission per question: `has_answered` locks out further
/// submissions until the next question is requested.
pub struct QuizSession {
    current_question_index: usize,
    draft_answer: String,
    has_answered: bool,
    feedback: Feedback,
    rng: StdRng,
}

impl QuizSession {
    /// Start a session over a corpus of `question_count` questions.
    ///
    /// `question_count` must be non-zero; the loader rejects empty
    /// corpora before a session is ever constructed.
    pub fn new(question_count: usize) -> Self {
        Self::with_rng(question_count, StdRng::from_entropy())
    }

    /// Start a session with an injected RNG, so tests can seed the
    /// question order deterministically.
    pub fn with_rng(question_count: usize, rng: StdRng) -> Self {
        let mut session = Self {
            current_question_index: 0,
            draft_answer: String::new(),
            has_answered: false,
            feedback: Feedback::None,
            rng,
        };
        session.start_new_session(question_count);
        session
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn draft_answer(&self) -> &str {
        &self.draft_answer
    }

    pub fn has_answered(&self) -> bool {
        self.has_answered
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Pick a fresh random question and reset everything else.
    pub fn start_new_session(&mut self, question_count: usize) {
        self.current_question_index = self.rng.gen_range(0..question_count);
        self.draft_answer.clear();
        self.has_answered = false;
        self.feedback = Feedback::None;
    }

    /// Same reset as `start_new_session`; allowed regardless of whether
    /// the current question was answered.
    pub fn advance_to_next_question(&mut self, question_count: usize) {
        self.start_new_session(question_count);
    }

    /// Store the not-yet-submitted answer text verbatim. Always allowed;
    /// once the answered lock is set this has no visible effect because
    /// submission is blocked.
    pub fn set_draft_answer(&mut self, text: impl Into<String>) {
        self.draft_answer = text.into();
    }

    pub fn current_question<'a>(
        &self,
        store: &'a QuestionStore,
    ) -> Result<&'a QuestionRecord, OutOfRangeQuestionIndex> {
        store.get(self.current_question_index)
    }

    /// Evaluate an answer for the current question.
    ///
    /// Returns `Ok(None)` without touching any state when the question
    /// was already answered. The candidate is `explicit` when given (the
    /// voice channel supplies the answer with the intent), otherwise the
    /// draft answer.
    pub fn submit_answer(
        &mut self,
        store: &QuestionStore,
        explicit: Option<&str>,
    ) -> Result<Option<SubmitOutcome>, OutOfRangeQuestionIndex> {
        if self.has_answered {
            return Ok(None);
        }

        let record = store.get(self.current_question_index)?;
        let candidate = explicit.unwrap_or(self.draft_answer.as_str());
        let correct = evaluator::is_correct(candidate, record);
        let canonical_answer = evaluator::canonical_answer(record).to_string();

        self.has_answered = true;
        self.feedback = if correct {
            Feedback::Correct {
                comment: record.comment.clone(),
            }
        } else {
            Feedback::Incorrect {
                correct_answer: canonical_answer.clone(),
                comment: record.comment.clone(),
            }
        };

        let spoken = if correct {
            CORRECT_MARKER.to_string()
        } else {
            format!("Incorrect, the correct answer is {canonical_answer}")
        };

        Ok(Some(SubmitOutcome {
            correct,
            canonical_answer,
            spoken,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionRecord;

    fn math_store() -> QuestionStore {
        QuestionStore::new(vec![QuestionRecord::new("2+2?", "4; four", "basic math")])
    }

    fn seeded_session(question_count: usize) -> QuizSession {
        QuizSession::with_rng(question_count, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_new_session_index_in_range() {
        let mut session = seeded_session(5);
        for _ in 0..200 {
            assert!(session.current_question_index() < 5);
            session.start_new_session(5);
        }
    }

    #[test]
    fn test_new_session_eventually_covers_all_indices() {
        let mut session = seeded_session(5);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[session.current_question_index()] = true;
            session.start_new_session(5);
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_correct_submission_via_draft() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        session.set_draft_answer("Four");
        let outcome = session.submit_answer(&store, None).unwrap().unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.canonical_answer, "4");
        assert!(session.has_answered());
        let message = session.feedback().message();
        assert!(message.contains(CORRECT_MARKER));
        assert!(message.contains("basic math"));
    }

    #[test]
    fn test_incorrect_submission_reveals_canonical_answer() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        let outcome = session.submit_answer(&store, Some("wrong")).unwrap().unwrap();

        assert!(!outcome.correct);
        assert_eq!(outcome.spoken, "Incorrect, the correct answer is 4");
        let message = session.feedback().message();
        assert!(message.contains(INCORRECT_MARKER));
        assert!(message.contains('4'));
        assert!(message.contains("basic math"));
    }

    #[test]
    fn test_second_submission_is_a_no_op() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        session.set_draft_answer("four");
        let first = session.submit_answer(&store, None).unwrap();
        assert!(first.is_some());
        let feedback_after_first = session.feedback().clone();

        let second = session.submit_answer(&store, Some("wrong")).unwrap();
        assert!(second.is_none());
        assert_eq!(session.feedback(), &feedback_after_first);
        assert!(session.has_answered());
    }

    #[test]
    fn test_explicit_answer_takes_precedence_over_draft() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        session.set_draft_answer("wrong");
        let outcome = session.submit_answer(&store, Some("4")).unwrap().unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn test_advance_resets_regardless_of_prior_state() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        session.set_draft_answer("four");
        session.submit_answer(&store, None).unwrap();
        assert!(session.has_answered());

        session.advance_to_next_question(store.len());
        assert!(!session.has_answered());
        assert!(session.draft_answer().is_empty());
        assert!(session.feedback().is_empty());

        // Also a reset when nothing was submitted yet.
        session.set_draft_answer("half-typed");
        session.advance_to_next_question(store.len());
        assert!(session.draft_answer().is_empty());
    }

    #[test]
    fn test_draft_changes_after_lock_do_not_touch_feedback() {
        let store = math_store();
        let mut session = seeded_session(store.len());

        session.submit_answer(&store, Some("4")).unwrap();
        let feedback = session.feedback().clone();

        session.set_draft_answer("something else");
        assert_eq!(session.feedback(), &feedback);
        assert!(session.submit_answer(&store, None).unwrap().is_none());
    }

    #[test]
    fn test_submission_out_of_range_fails_and_leaves_state() {
        let store = math_store();
        let mut session = seeded_session(5);

        // Force an index past the one-question corpus.
        while session.current_question_index() == 0 {
            session.start_new_session(5);
        }

        assert!(session.submit_answer(&store, Some("4")).is_err());
        assert!(!session.has_answered());
    }

    #[test]
    fn test_feedback_message_without_comment() {
        let feedback = Feedback::Incorrect {
            correct_answer: "Paris".to_string(),
            comment: String::new(),
        };
        assert_eq!(feedback.message(), format!("{INCORRECT_MARKER} Paris"));
    }
}
