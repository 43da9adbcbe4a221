use crate::data::{OutOfRangeQuestionIndex, QuestionStore};
use crate::models::QuestionRecord;
use crate::session::{QuizSession, SubmitOutcome};

/// Application state: the question store plus the session that runs on it.
///
/// Both the terminal input handler and the assistant bridge go through the
/// methods here; neither touches session fields directly.
pub struct App {
    store: QuestionStore,
    session: QuizSession,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: QuestionStore) -> Self {
        let session = QuizSession::new(store.len());
        Self {
            store,
            session,
            should_quit: false,
        }
    }

    #[cfg(test)]
    pub fn with_session(store: QuestionStore, session: QuizSession) -> Self {
        Self {
            store,
            session,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn current_question(&self) -> Result<&QuestionRecord, OutOfRangeQuestionIndex> {
        self.session.current_question(&self.store)
    }

    pub fn set_draft_answer(&mut self, text: impl Into<String>) {
        self.session.set_draft_answer(text);
    }

    pub fn submit_answer(
        &mut self,
        explicit: Option<&str>,
    ) -> Result<Option<SubmitOutcome>, OutOfRangeQuestionIndex> {
        self.session.submit_answer(&self.store, explicit)
    }

    pub fn next_question(&mut self) {
        self.session.advance_to_next_question(self.store.len());
    }

    /// Append a typed character to the draft. Ignored once the current
    /// question is answered; input stays locked until the next question.
    pub fn input_push(&mut self, c: char) {
        if self.session.has_answered() {
            return;
        }
        let mut draft = self.session.draft_answer().to_string();
        draft.push(c);
        self.session.set_draft_answer(draft);
    }

    pub fn input_pop(&mut self) {
        if self.session.has_answered() {
            return;
        }
        let mut draft = self.session.draft_answer().to_string();
        draft.pop();
        self.session.set_draft_answer(draft);
    }
}
