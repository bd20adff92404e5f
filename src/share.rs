//! Score sharing

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::protocol::ServerMessage;
use crate::types::Score;

/// Errors from writing to a clipboard
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard is unavailable")]
    Unavailable,

    #[error("Clipboard access was denied")]
    Denied,
}

/// Somewhere to put share text
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Hands the text to the connected browser, which performs the actual copy
pub struct ClientClipboard {
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ClientClipboard {
    pub fn new(tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Clipboard for ClientClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.tx
            .send(ServerMessage::CopyToClipboard {
                text: text.to_string(),
            })
            .map_err(|_| ClipboardError::Unavailable)
    }
}

/// Text copied by the share button
pub fn share_text(score: &Score, site_url: &str) -> String {
    format!(
        "Senatordle\n\nScore: {}/{}\nAccuracy: {}%\n\n{}",
        score.correct,
        score.total,
        score.accuracy(),
        site_url
    )
}
