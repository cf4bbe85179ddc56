use crate::api::AppState;
use crate::error::AppError;
use crate::services::auth::verify_jwt;
use crate::services::realtime::{Notifier, ServerEvent};
use axum::{
    extract::{
        Query, State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::Extensions,
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tower_http::request_id::RequestId;
use tracing::{Instrument, warn};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct WsParams {
    token: String,
}

/// Client-to-server frames. Mirrors the server event envelope: a tagged
/// `event`/`data` pair, with an optional `ackId` the server echoes back.
#[derive(Debug, Deserialize)]
struct ClientFrame {
    #[serde(flatten)]
    event: ClientEvent,
    #[serde(rename = "ackId")]
    ack_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
enum ClientEvent {
    #[serde(rename = "join:conversation")]
    Join { conversation_id: Uuid },
    #[serde(rename = "leave:conversation")]
    Leave { conversation_id: Uuid },
    #[serde(rename = "message:send")]
    Send { conversation_id: Uuid, content: String },
    #[serde(rename = "typing:start")]
    TypingStart { conversation_id: Uuid },
    #[serde(rename = "typing:stop")]
    TypingStop { conversation_id: Uuid },
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    extensions: Extensions,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let request_id = extensions
        .get::<RequestId>()
        .map(|id| id.header_value().to_str().unwrap_or_default().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match verify_jwt(&params.token, &state.config.auth.jwt_secret) {
        Ok(claims) => ws.on_upgrade(move |socket| handle_socket(socket, state, claims.sub, request_id)),
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket handshake failed: invalid token");
            axum::http::StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

fn text_frame(event: &ServerEvent) -> Option<WsMessage> {
    match serde_json::to_string(event) {
        Ok(payload) => Some(WsMessage::Text(payload.into())),
        Err(e) => {
            warn!(error = %e, "Failed to serialize outbound event");
            None
        }
    }
}

fn ack_frame(ack_id: u64, result: Result<serde_json::Value, &AppError>) -> WsMessage {
    let data = match result {
        Ok(extra) => {
            let mut data = json!({ "success": true });
            if let (Some(obj), Some(extra)) = (data.as_object_mut(), extra.as_object()) {
                for (k, v) in extra {
                    obj.insert(k.clone(), v.clone());
                }
            }
            data
        }
        Err(e) => json!({ "success": false, "error": e.to_string(), "code": e.code() }),
    };
    WsMessage::Text(json!({ "event": "ack", "ackId": ack_id, "data": data }).to_string().into())
}

/// Forwards one room's broadcast events into the session's outbound queue.
/// Ends when the room channel closes or the session goes away.
fn spawn_room_forwarder(
    mut room_rx: broadcast::Receiver<ServerEvent>,
    outbound_tx: mpsc::Sender<WsMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match room_rx.recv().await {
                Ok(event) => {
                    let Some(frame) = text_frame(&event) else { continue };
                    if outbound_tx.send(frame).await.is_err() {
                        break;
                    }
                }
                // Dropped events are not replayed; clients refetch on demand.
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Uuid, request_id: String) {
    let span = tracing::info_span!(
        "websocket_session",
        request_id = %request_id,
        user_id = %user_id,
        ws.session_id = %Uuid::new_v4()
    );

    async move {
        tracing::info!("WebSocket connected");

        let mut user_rx = state.notifier.subscribe_user(user_id);
        let (mut ws_sink, mut ws_stream) = socket.split();

        let (outbound_tx, mut outbound_rx) = mpsc::channel(state.config.websocket.outbound_buffer_size);
        let mut rooms: HashMap<Uuid, tokio::task::JoinHandle<()>> = HashMap::new();

        let mut shutdown_rx = state.shutdown_rx.clone();

        loop {
            if *shutdown_rx.borrow() {
                tracing::info!("Shutdown signal received, closing WebSocket");
                let _ = ws_sink
                    .send(WsMessage::Close(Some(axum::extract::ws::CloseFrame {
                        code: axum::extract::ws::close_code::AWAY,
                        reason: "Server shutting down".into(),
                    })))
                    .await;
                break;
            }

            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {}

                msg = ws_stream.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            let frame = match serde_json::from_str::<ClientFrame>(&text) {
                                Ok(frame) => frame,
                                Err(e) => {
                                    warn!(error = %e, "Failed to decode client frame");
                                    continue;
                                }
                            };
                            let reply = handle_client_frame(&state, user_id, frame, &mut rooms, &outbound_tx).await;
                            if let Some(reply) = reply
                                && ws_sink.send(reply).await.is_err()
                            {
                                break;
                            }
                        }
                        Some(Ok(WsMessage::Close(_))) => break,
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }

                res = outbound_rx.recv() => {
                    match res {
                        Some(msg) => {
                            if ws_sink.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                result = user_rx.recv() => {
                    match result {
                        Ok(event) => {
                            if let Some(frame) = text_frame(&event)
                                && ws_sink.send(frame).await.is_err()
                            {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "User channel lagged, events dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        let _ = ws_sink.close().await;
        for (_, forwarder) in rooms {
            forwarder.abort();
        }
        tracing::info!("WebSocket disconnected");
    }
    .instrument(span)
    .await;
}

/// Dispatches one inbound frame. Returns the reply frame to send, if any.
async fn handle_client_frame(
    state: &AppState,
    user_id: Uuid,
    frame: ClientFrame,
    rooms: &mut HashMap<Uuid, tokio::task::JoinHandle<()>>,
    outbound_tx: &mpsc::Sender<WsMessage>,
) -> Option<WsMessage> {
    match frame.event {
        ClientEvent::Join { conversation_id } => {
            let result = state.conversation_service.require_participant(conversation_id, user_id).await;
            match result {
                Ok(_) => {
                    rooms.entry(conversation_id).or_insert_with(|| {
                        let room_rx = state.notifier.subscribe_room(conversation_id);
                        spawn_room_forwarder(room_rx, outbound_tx.clone())
                    });
                    frame.ack_id.map(|id| ack_frame(id, Ok(json!({ "conversationId": conversation_id }))))
                }
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Room join rejected");
                    frame.ack_id.map(|id| ack_frame(id, Err(&e)))
                }
            }
        }
        ClientEvent::Leave { conversation_id } => {
            if let Some(forwarder) = rooms.remove(&conversation_id) {
                forwarder.abort();
            }
            frame.ack_id.map(|id| ack_frame(id, Ok(json!({ "conversationId": conversation_id }))))
        }
        ClientEvent::Send { conversation_id, content } => {
            match state.message_service.send(conversation_id, user_id, &content).await {
                Ok(message) => frame.ack_id.map(|id| ack_frame(id, Ok(json!({ "message": message })))),
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Socket send failed");
                    frame.ack_id.map(|id| ack_frame(id, Err(&e)))
                }
            }
        }
        ClientEvent::TypingStart { conversation_id } => {
            // Ephemeral relay; no persistence, no membership re-check beyond
            // the join gate on the room itself.
            state.notifier.emit_to_room(conversation_id, ServerEvent::TypingStart { conversation_id, user_id });
            None
        }
        ClientEvent::TypingStop { conversation_id } => {
            state.notifier.emit_to_room(conversation_id, ServerEvent::TypingStop { conversation_id, user_id });
            None
        }
    }
}
