//! WebSocket message dispatch
//!
//! Maps client messages onto session transitions.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::GameSession;
use crate::share::Clipboard;

/// Handle a client message and return an optional response
pub async fn handle_message(
    msg: ClientMessage,
    session: &mut GameSession,
    clipboard: &dyn Clipboard,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Guess { party } => session.guess(party),

        ClientMessage::Share => Some(session.share(clipboard).await),

        ClientMessage::ClipboardDenied => session.clipboard_denied(),

        ClientMessage::RetryLoad => {
            let response = session.retry_load();
            if response.is_none() {
                tracing::debug!("Session {}: retry requested but load did not fail", session.id());
            }
            response
        }

        ClientMessage::Sync => Some(session.snapshot()),
    }
}
