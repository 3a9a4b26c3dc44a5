//! WebSocket handler.
//!
//! One connection = one session: binary frames are raw audio forwarded to
//! the transcription collaborator, text frames are control messages.
//! Insights fan out to every connected listener; transcript echoes and
//! control replies stay on this connection's channel.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};

use insight_core::{OutboundMessage, Transcriber};
use insight_llm::TextGenerator;

use crate::control::{handle_control, ControlMessage};
use crate::session::SessionState;
use crate::state::AppState;

/// Grace period for in-flight transcript handling on disconnect.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Handle WebSocket upgrade
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Fatal initialization failures are the only errors a client ever
    // sees at connection level.
    let llm_ready = state.llm.is_ready();
    let stt_ready = state.transcriber.is_ready().await;
    tracing::info!(llm_ready, stt_ready, "New WebSocket connection");

    if !llm_ready || !stt_ready {
        tracing::error!("Backend clients not ready during connection");
        let msg = OutboundMessage::Error {
            message: "Backend AI/speech services not ready. Please try again later.".to_string(),
        };
        let _ = sink
            .send(Message::Text(serde_json::to_string(&msg).unwrap()))
            .await;
        let _ = sink.close().await;
        return;
    }

    // Register as a broadcast listener; the writer task is the only thing
    // touching the socket sink.
    let handle = state.broadcaster.register();
    let listener_id = handle.id;
    let reply_tx = handle.tx;
    let mut outbox_rx = handle.rx;

    let writer_task = tokio::spawn(async move {
        while let Some(json) = outbox_rx.recv().await {
            if sink.send(Message::Text(json)).await.is_err() {
                // Receiver side of the outbox is dropped with this task;
                // the broadcaster prunes us on its next send.
                break;
            }
        }
    });

    // Start the transcription stream for this connection.
    let (audio_tx, mut transcript_rx) = match state.transcriber.start_stream().await {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start transcription stream");
            let msg = OutboundMessage::Error {
                message: "Failed to start transcription. Please reconnect.".to_string(),
            };
            let _ = reply_tx.send(serde_json::to_string(&msg).unwrap());
            state.broadcaster.unregister(listener_id);
            writer_task.abort();
            return;
        }
    };

    // Transcript-consumption task: echo everything, route finals.
    let deps = state.session_deps();
    let settings = state.settings.clone();
    let transcript_tx = reply_tx.clone();
    let session_task = tokio::spawn(async move {
        let mut session = SessionState::new(&settings);
        while let Some(event) = transcript_rx.recv().await {
            let echo = OutboundMessage::Transcript {
                text: event.text.clone(),
                is_final: event.is_final,
            };
            let _ = transcript_tx.send(serde_json::to_string(&echo).unwrap());

            if event.is_final {
                tracing::info!(text = %event.text, "Final transcript");
                session.handle_final_segment(&event.text, &deps).await;
            } else {
                tracing::debug!(text = %event.text, "Interim transcript");
            }
        }
        tracing::debug!("Transcript consumption ended");
    });
    let session_abort = session_task.abort_handle();

    // Main receive loop.
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Binary(data)) => {
                if audio_tx.send(data).await.is_err() {
                    tracing::warn!("Transcription stream closed, dropping audio");
                }
            }
            Ok(Message::Text(text)) => match serde_json::from_str::<ControlMessage>(&text) {
                Ok(control) => {
                    let reply = handle_control(&state, control).await;
                    let _ = reply_tx.send(serde_json::to_string(&reply).unwrap());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Unrecognized control message");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup: closing the audio channel ends the transcription stream,
    // which lets the session task drain within the grace period. In-flight
    // agent dispatches are detached and finish (or fail) on their own.
    drop(audio_tx);
    match tokio::time::timeout(SHUTDOWN_GRACE, session_task).await {
        Ok(_) => tracing::debug!("Session task finished cleanly"),
        Err(_) => {
            tracing::warn!("Timeout waiting for session task, aborting");
            session_abort.abort();
        }
    }

    state.broadcaster.unregister(listener_id);
    writer_task.abort();
    tracing::info!(listener = %listener_id, "WebSocket closed");
}
