pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    future::BoxFuture,
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::dataset::{load_roster, DatasetError};
use crate::protocol::{ClientMessage, ServerMessage, PROTOCOL_VERSION};
use crate::session::GameSession;
use crate::share::ClientClipboard;
use crate::state::AppState;
use crate::types::Senator;

type PendingLoad = BoxFuture<'static, Result<Vec<Senator>, DatasetError>>;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Start reading the roster for one session
fn start_load(state: &AppState) -> PendingLoad {
    let source = state.roster_source.clone();
    let timeout = state.config.load_timeout;
    Box::pin(async move { load_roster(source.as_ref(), timeout).await })
}

/// Serialize and send; returns false once the socket is gone
async fn send_message<S>(sender: &mut S, msg: &ServerMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            true
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    run_session(receiver, sender, state).await;
}

/// Run one game session until the client goes away.
///
/// `receiver` and `sender` are the two halves of the socket.
pub async fn run_session<R, S>(mut receiver: R, mut sender: S, state: Arc<AppState>)
where
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
    S: Sink<Message> + Unpin,
{
    let info = state.open_session().await;
    tracing::info!("WebSocket connected, session {}", info.id);

    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let clipboard = ClientClipboard::new(out_tx);
    let mut session = GameSession::new(info.id.clone(), state.config.clone(), timer_tx);

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        session_id: info.id.clone(),
        server_now: chrono::Utc::now().to_rfc3339(),
    };

    if !send_message(&mut sender, &welcome).await
        || !send_message(&mut sender, &session.snapshot()).await
    {
        tracing::error!("Failed to send welcome message");
        state.close_session(&info.id).await;
        return;
    }

    let mut pending_load: Option<PendingLoad> = None;

    loop {
        if session.is_loading() && pending_load.is_none() {
            pending_load = Some(start_load(&state));
        }

        tokio::select! {
            // Dataset read for this session
            result = async {
                match pending_load.as_mut() {
                    Some(load) => load.await,
                    None => std::future::pending().await,
                }
            } => {
                pending_load = None;
                let msg = session.finish_load(result);
                if !send_message(&mut sender, &msg).await {
                    break;
                }
            }

            // Feedback and "copied" timers
            Some(event) = timer_rx.recv() => {
                if let Some(msg) = session.on_timer(event) {
                    if !send_message(&mut sender, &msg).await {
                        break;
                    }
                }
            }

            // Clipboard payloads for the browser
            Some(msg) = out_rx.recv() => {
                if !send_message(&mut sender, &msg).await {
                    break;
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                let response =
                                    handlers::handle_message(client_msg, &mut session, &clipboard).await;

                                // Clipboard payloads queued by the handler go out before its response
                                let mut closed = false;
                                while let Ok(msg) = out_rx.try_recv() {
                                    if !send_message(&mut sender, &msg).await {
                                        closed = true;
                                        break;
                                    }
                                }
                                if closed {
                                    break;
                                }

                                if let Some(response) = response {
                                    if !send_message(&mut sender, &response).await {
                                        tracing::error!("Failed to send response");
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                };
                                let _ = send_message(&mut sender, &error).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    // Dropping the session aborts any pending timers
    drop(session);
    if let Some(info) = state.close_session(&info.id).await {
        tracing::info!(
            "WebSocket connection closed for session {} (connected at {})",
            info.id,
            info.connected_at
        );
    }
}
