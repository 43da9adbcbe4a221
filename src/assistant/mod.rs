//! Assistant host integration.
//!
//! Translates the inbound host event stream into quiz session calls and
//! reports submission outcomes back to the host.

mod bridge;
mod events;
mod transport;

pub use bridge::{BridgeError, OutboundSender, dispatch, send_outcome, state_snapshot};
pub use events::{
    AssistantAction, AssistantState, CharacterInfo, HostEvent, QuestionState, SendDataPayload,
};
pub use transport::{Outbound, SharedApp, TransportError, run};
