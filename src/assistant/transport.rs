//! WebSocket transport to the assistant host.
//!
//! One connection per run: inbound frames are parsed into host events and
//! dispatched, outbound payloads are drained from a channel by a single
//! writer task. In development the connection goes to the local smartapp
//! debugger and announces itself with a token and init phrase.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;

use crate::app::App;
use crate::config::{Config, LaunchMode};

use super::bridge::{self, OutboundSender};
use super::events::{AssistantState, HostEvent, SendDataPayload};

/// Shared app state, mutated by one event at a time.
pub type SharedApp = Arc<Mutex<App>>;

/// A frame queued for the host.
pub enum Outbound {
    /// A `send_data` payload; the acknowledgement fires exactly once.
    Data {
        payload: SendDataPayload,
        ack: oneshot::Sender<Result<(), TransportError>>,
    },
    /// A state snapshot pushed for voice grounding.
    State(AssistantState),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed to encode outbound frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Connect to the assistant host and process events until the connection
/// closes. The UI keeps running if this returns; the app degrades to
/// keyboard-only input.
pub async fn run(
    config: Config,
    url: String,
    app: SharedApp,
    outbox: OutboundSender,
    outbox_rx: mpsc::UnboundedReceiver<Outbound>,
) -> Result<(), TransportError> {
    tracing::info!(%url, "connecting to assistant host");
    let (ws_stream, _) = tokio_tungstenite::connect_async(&url).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // The debugger wants to know which smartapp to launch.
    if let LaunchMode::Debugger = config.mode {
        let announce = serde_json::json!({
            "type": "announce",
            "token": config.token,
            "initPhrase": config.init_phrase(),
        });
        ws_sender
            .send(Message::Text(announce.to_string().into()))
            .await?;
    }

    // Initial snapshot so the host can ground voice immediately.
    let snapshot = {
        let app = app.lock().await;
        bridge::state_snapshot(&app)
    };
    ws_sender
        .send(Message::Text(state_frame(&snapshot)?.into()))
        .await?;

    // Single writer drains the outbound channel.
    let writer = tokio::spawn(async move {
        let mut outbox_rx = outbox_rx;
        while let Some(outbound) = outbox_rx.recv().await {
            match outbound {
                Outbound::Data { payload, ack } => {
                    let result = match serde_json::to_string(&payload) {
                        Ok(json) => ws_sender
                            .send(Message::Text(json.into()))
                            .await
                            .map_err(TransportError::from),
                        Err(err) => Err(TransportError::from(err)),
                    };
                    let _ = ack.send(result);
                }
                Outbound::State(state) => {
                    let sent = match state_frame(&state) {
                        Ok(json) => ws_sender
                            .send(Message::Text(json.into()))
                            .await
                            .map_err(TransportError::from),
                        Err(err) => Err(err),
                    };
                    if let Err(err) = sent {
                        tracing::warn!(%err, "failed to push state frame");
                    }
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => {
                tracing::info!("connection closed by host");
                break;
            }
            Err(err) => {
                tracing::warn!(%err, "connection error");
                break;
            }
            _ => continue,
        };

        let event: HostEvent = match serde_json::from_str(&text) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(%err, "unparseable host event, skipping");
                continue;
            }
        };

        tracing::debug!(kind = %event.kind, "host event received");

        let snapshot = {
            let mut app = app.lock().await;
            if let Err(err) = bridge::dispatch(&mut app, &event, &outbox) {
                // Fatal to this dispatch only; the session is untouched.
                tracing::error!(%err, "failed to dispatch host event");
            }
            bridge::state_snapshot(&app)
        };

        if !is_telemetry(&event.kind) {
            let _ = outbox.send(Outbound::State(snapshot));
        }
    }

    writer.abort();
    Ok(())
}

fn is_telemetry(kind: &str) -> bool {
    matches!(kind, "character" | "insets")
}

fn state_frame(state: &AssistantState) -> Result<String, TransportError> {
    let frame = serde_json::json!({
        "type": "app_state",
        "state": state,
    });
    Ok(serde_json::to_string(&frame)?)
}
