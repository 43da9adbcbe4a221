//! Wire types exchanged with the assistant host.
//!
//! Inbound events arrive as JSON `{ "type": ..., "action": ... }`; the
//! action payload is dispatched by its own `type` tag. Outbound data is
//! pushed with the host's `send_data` shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One event delivered by the host runtime.
///
/// `character` and `insets` events are telemetry; any other kind may carry
/// an action. The action is kept as raw JSON here so an unknown action
/// kind can be reported by name during dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct HostEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub character: Option<CharacterInfo>,
    #[serde(default)]
    pub action: Option<serde_json::Value>,
}

/// The assistant persona attached to `character` telemetry.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterInfo {
    #[serde(default)]
    pub id: Option<String>,
}

/// A recognized user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantAction {
    /// Dictated answer text to store as the draft.
    EnterAnswer { answer: String },

    /// Evaluate an answer; carries it directly on the voice channel.
    CheckAnswer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
    },

    /// Move on to another random question.
    NextQuestion,

    /// Read the current question aloud.
    ReadQuestion,
}

/// Payload for the host's `send_data` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDataPayload {
    pub action: SendDataAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDataAction {
    pub action_id: String,
    pub parameters: SendDataParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDataParameters {
    pub value: String,
}

impl SendDataPayload {
    /// Wrap a human-readable value with a fresh action id.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            action: SendDataAction {
                action_id: Uuid::new_v4().to_string(),
                parameters: SendDataParameters {
                    value: value.into(),
                },
            },
        }
    }
}

/// Snapshot the host can pull at any time for voice grounding.
///
/// Deliberately minimal: only the current question text, never the full
/// session state.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantState {
    pub question: QuestionState,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionState {
    #[serde(rename = "currentQuestion")]
    pub current_question: String,
}

impl AssistantState {
    pub fn new(current_question: impl Into<String>) -> Self {
        Self {
            question: QuestionState {
                current_question: current_question.into(),
            },
        }
    }
}
