//! Dispatch between the host event stream and the quiz session.
//!
//! Inbound actions are translated into session transitions; submission
//! outcomes are reported back through the outbound channel with an
//! at-most-once acknowledgement. Telemetry kinds are logged and ignored.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::app::App;
use crate::data::OutOfRangeQuestionIndex;
use crate::session::SubmitOutcome;

use super::events::{AssistantAction, AssistantState, HostEvent, SendDataPayload};
use super::transport::{Outbound, TransportError};

/// Sender half of the outbound channel drained by the transport.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Error raised while dispatching an inbound event. Fatal to that single
/// dispatch call only; the session is left untouched and the next valid
/// event resumes normal operation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unhandled action kind \"{0}\"")]
    UnhandledActionKind(String),
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeQuestionIndex),
}

/// Handle one inbound host event.
pub fn dispatch(app: &mut App, event: &HostEvent, outbox: &OutboundSender) -> Result<(), BridgeError> {
    match event.kind.as_str() {
        "character" => {
            let id = event
                .character
                .as_ref()
                .and_then(|c| c.id.as_deref())
                .unwrap_or("unknown");
            tracing::debug!(character = id, "character event");
            Ok(())
        }
        "insets" => {
            tracing::debug!("insets event");
            Ok(())
        }
        kind => {
            let Some(value) = &event.action else {
                tracing::debug!(kind, "event without action, ignoring");
                return Ok(());
            };
            match parse_action(value)? {
                Some(action) => handle_action(app, action, outbox),
                None => Ok(()),
            }
        }
    }
}

/// Parse a raw action payload.
///
/// Returns `Ok(None)` for malformed payloads (nothing mutates) and
/// `UnhandledActionKind` when the kind matches none of the known intents.
fn parse_action(value: &serde_json::Value) -> Result<Option<AssistantAction>, BridgeError> {
    let Some(kind) = value.get("type").and_then(serde_json::Value::as_str) else {
        tracing::warn!("action payload without a type field, ignoring");
        return Ok(None);
    };

    match kind {
        "enter_answer" | "check_answer" | "next_question" | "read_question" => {
            match serde_json::from_value::<AssistantAction>(value.clone()) {
                Ok(action) => Ok(Some(action)),
                Err(err) => {
                    tracing::warn!(kind, %err, "malformed action payload, ignoring");
                    Ok(None)
                }
            }
        }
        other => Err(BridgeError::UnhandledActionKind(other.to_string())),
    }
}

fn handle_action(
    app: &mut App,
    action: AssistantAction,
    outbox: &OutboundSender,
) -> Result<(), BridgeError> {
    tracing::info!(?action, "dispatching assistant action");

    match action {
        AssistantAction::EnterAnswer { answer } => {
            app.set_draft_answer(answer);
            Ok(())
        }
        AssistantAction::CheckAnswer { answer } => {
            if let Some(outcome) = app.submit_answer(answer.as_deref())? {
                send_outcome(outbox, &outcome);
            }
            Ok(())
        }
        AssistantAction::NextQuestion => {
            app.next_question();
            Ok(())
        }
        AssistantAction::ReadQuestion => {
            let text = app.current_question()?.text.clone();
            send_payload(outbox, SendDataPayload::new(text));
            Ok(())
        }
    }
}

/// Report a submission outcome to the host.
pub fn send_outcome(outbox: &OutboundSender, outcome: &SubmitOutcome) {
    send_payload(outbox, SendDataPayload::new(outcome.spoken.clone()));
}

/// Push a payload through the transport, observing the acknowledgement
/// exactly once. Acknowledgement failures are logged and never reach
/// session state; a missing acknowledgement simply never fires.
fn send_payload(outbox: &OutboundSender, payload: SendDataPayload) {
    let action_id = payload.action.action_id.clone();
    let (ack_tx, ack_rx) = oneshot::channel::<Result<(), TransportError>>();

    if outbox.send(Outbound::Data { payload, ack: ack_tx }).is_err() {
        tracing::debug!(%action_id, "no transport attached, dropping payload");
        return;
    }

    tokio::spawn(async move {
        match ack_rx.await {
            Ok(Ok(())) => tracing::debug!(%action_id, "payload acknowledged"),
            Ok(Err(err)) => tracing::warn!(%action_id, %err, "payload acknowledgement failed"),
            Err(_) => tracing::debug!(%action_id, "transport dropped before acknowledgement"),
        }
    });
}

/// The minimal state the host pulls for voice grounding: just the current
/// question text.
pub fn state_snapshot(app: &App) -> AssistantState {
    match app.current_question() {
        Ok(question) => AssistantState::new(question.text.clone()),
        Err(err) => {
            tracing::warn!(%err, "state snapshot requested with unresolved question");
            AssistantState::new("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestionStore;
    use crate::models::QuestionRecord;
    use crate::session::QuizSession;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_app() -> App {
        let store = QuestionStore::new(vec![QuestionRecord::new("2+2?", "4; four", "basic math")]);
        let session = QuizSession::with_rng(store.len(), StdRng::seed_from_u64(1));
        App::with_session(store, session)
    }

    fn event(json: &str) -> HostEvent {
        serde_json::from_str(json).unwrap()
    }

    fn channel() -> (OutboundSender, mpsc::UnboundedReceiver<Outbound>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn test_enter_answer_sets_draft() {
        let mut app = test_app();
        let (tx, _rx) = channel();

        let e = event(r#"{"type":"smart_app_data","action":{"type":"enter_answer","answer":"four"}}"#);
        dispatch(&mut app, &e, &tx).unwrap();

        assert_eq!(app.session().draft_answer(), "four");
        assert!(!app.session().has_answered());
    }

    #[tokio::test]
    async fn test_check_answer_evaluates_and_reports() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        let e = event(r#"{"type":"smart_app_data","action":{"type":"check_answer","answer":"four"}}"#);
        dispatch(&mut app, &e, &tx).unwrap();

        assert!(app.session().has_answered());
        let Outbound::Data { payload, ack } = rx.try_recv().unwrap() else {
            panic!("expected data payload");
        };
        assert_eq!(payload.action.parameters.value, "Correct!");
        let _ = ack.send(Ok(()));
    }

    #[tokio::test]
    async fn test_check_answer_uses_draft_when_no_payload_answer() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        dispatch(
            &mut app,
            &event(r#"{"type":"smart_app_data","action":{"type":"enter_answer","answer":"wrong"}}"#),
            &tx,
        )
        .unwrap();
        dispatch(
            &mut app,
            &event(r#"{"type":"smart_app_data","action":{"type":"check_answer"}}"#),
            &tx,
        )
        .unwrap();

        let Outbound::Data { payload, .. } = rx.try_recv().unwrap() else {
            panic!("expected data payload");
        };
        assert_eq!(payload.action.parameters.value, "Incorrect, the correct answer is 4");
    }

    #[tokio::test]
    async fn test_repeated_check_answer_reports_once() {
        let mut app = test_app();
        let (tx, mut rx) = channel();
        let e = event(r#"{"type":"smart_app_data","action":{"type":"check_answer","answer":"4"}}"#);

        dispatch(&mut app, &e, &tx).unwrap();
        dispatch(&mut app, &e, &tx).unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_next_question_resets_session() {
        let mut app = test_app();
        let (tx, _rx) = channel();

        dispatch(
            &mut app,
            &event(r#"{"type":"smart_app_data","action":{"type":"check_answer","answer":"4"}}"#),
            &tx,
        )
        .unwrap();
        assert!(app.session().has_answered());

        dispatch(
            &mut app,
            &event(r#"{"type":"smart_app_data","action":{"type":"next_question"}}"#),
            &tx,
        )
        .unwrap();
        assert!(!app.session().has_answered());
        assert!(app.session().feedback().is_empty());
    }

    #[tokio::test]
    async fn test_read_question_emits_text_without_mutation() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        dispatch(
            &mut app,
            &event(r#"{"type":"smart_app_data","action":{"type":"read_question"}}"#),
            &tx,
        )
        .unwrap();

        let Outbound::Data { payload, .. } = rx.try_recv().unwrap() else {
            panic!("expected data payload");
        };
        assert_eq!(payload.action.parameters.value, "2+2?");
        assert!(!app.session().has_answered());
        assert!(app.session().draft_answer().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action_kind_fails_and_leaves_state() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        app.set_draft_answer("in progress");
        let index_before = app.session().current_question_index();

        let e = event(r#"{"type":"smart_app_data","action":{"type":"frobnicate"}}"#);
        let err = dispatch(&mut app, &e, &tx).unwrap_err();
        assert!(matches!(err, BridgeError::UnhandledActionKind(kind) if kind == "frobnicate"));

        assert_eq!(app.session().current_question_index(), index_before);
        assert_eq!(app.session().draft_answer(), "in progress");
        assert!(!app.session().has_answered());
        assert!(app.session().feedback().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_action_is_a_no_op() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        // Known kind, missing required payload field.
        let e = event(r#"{"type":"smart_app_data","action":{"type":"enter_answer"}}"#);
        dispatch(&mut app, &e, &tx).unwrap();
        assert!(app.session().draft_answer().is_empty());

        // Missing action entirely.
        let e = event(r#"{"type":"smart_app_data"}"#);
        dispatch(&mut app, &e, &tx).unwrap();

        // Action without a type field.
        let e = event(r#"{"type":"smart_app_data","action":{"answer":"4"}}"#);
        dispatch(&mut app, &e, &tx).unwrap();
        assert!(app.session().draft_answer().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_telemetry_kinds_do_not_dispatch() {
        let mut app = test_app();
        let (tx, mut rx) = channel();

        dispatch(&mut app, &event(r#"{"type":"character","character":{"id":"joy"}}"#), &tx).unwrap();
        dispatch(&mut app, &event(r#"{"type":"insets"}"#), &tx).unwrap();

        assert!(app.session().draft_answer().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_state_snapshot_contains_only_question_text() {
        let app = test_app();
        let snapshot = state_snapshot(&app);
        assert_eq!(snapshot.question.current_question, "2+2?");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["question"]["currentQuestion"], "2+2?");
        assert!(json.as_object().unwrap().len() == 1);
    }
}
