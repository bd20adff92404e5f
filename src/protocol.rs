use crate::types::*;
use serde::{Deserialize, Serialize};

/// Protocol version announced in `welcome`
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    Guess {
        party: Guess,
    },
    Share,
    /// The browser refused the clipboard write from `copy_to_clipboard`
    ClipboardDenied,
    /// Try loading the dataset again after `load_failed`
    RetryLoad,
    /// Ask for the current state again (e.g. after a page regains focus)
    Sync,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        session_id: SessionId,
        server_now: String,
    },
    Loading,
    LoadFailed {
        msg: String,
        retryable: bool,
    },
    /// A new Senator awaits a guess
    Round {
        round_no: u64,
        senator: SenatorCard,
        score: ScoreView,
        roster_size: usize,
        seen_count: usize,
        lap: u32,
    },
    /// Result of the last guess, shown until the next round starts
    Feedback {
        result: Feedback,
        message: String,
        senator: Senator,
        score: ScoreView,
        advance_in_ms: u64,
    },
    CopyToClipboard {
        text: String,
    },
    /// State of the share button. `fallback` asks the client to offer manual copy of `text`.
    ShareStatus {
        copied: bool,
        fallback: bool,
        text: String,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// What a client may see of a Senator before guessing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenatorCard {
    pub id: SenatorId,
    pub portrait_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreView {
    pub correct: u32,
    pub total: u32,
    /// Percentage with one decimal, e.g. "66.7"
    pub accuracy: String,
}

impl From<&Score> for ScoreView {
    fn from(s: &Score) -> Self {
        Self {
            correct: s.correct,
            total: s.total,
            accuracy: s.accuracy(),
        }
    }
}

/// Line revealing the Senator after a guess
pub fn feedback_message(correct: bool, senator: &Senator) -> String {
    let prefix = if correct { "✓ Correct!" } else { "✗ Wrong!" };
    format!(
        "{} {} is a {} from {}",
        prefix, senator.display_name, senator.party, senator.state
    )
}
