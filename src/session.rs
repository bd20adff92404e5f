//! Game session controller
//!
//! One `GameSession` per connected browser tab. It owns the load phase, the
//! game itself and the timers that drive the feedback → next round
//! transition. All methods are plain state transitions returning the message
//! to send back; the WebSocket loop decides when to call them.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::GameConfig;
use crate::dataset::DatasetError;
use crate::protocol::{feedback_message, ScoreView, SenatorCard, ServerMessage};
use crate::share::{share_text, Clipboard};
use crate::state::round::{self, RandomIndex};
use crate::state::Game;
use crate::timer::{ScopedTimer, TimerEvent};
use crate::types::*;

/// Dataset lifecycle of a session
#[derive(Debug)]
pub enum LoadPhase {
    Loading,
    Ready(Game),
    Failed(String),
}

pub struct GameSession {
    id: SessionId,
    config: Arc<GameConfig>,
    phase: LoadPhase,
    rng: Box<dyn RandomIndex>,
    timers: mpsc::UnboundedSender<TimerEvent>,
    feedback_timer: Option<ScopedTimer>,
    feedback_deadline: Option<Instant>,
    copied_timer: Option<ScopedTimer>,
    copied: bool,
    share_generation: u64,
}

impl GameSession {
    pub fn new(
        id: SessionId,
        config: Arc<GameConfig>,
        timers: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            id,
            config,
            phase: LoadPhase::Loading,
            rng: round::os_seeded(),
            timers,
            feedback_timer: None,
            feedback_deadline: None,
            copied_timer: None,
            copied: false,
            share_generation: 0,
        }
    }

    /// Replace the randomness source (tests use a seeded or scripted one)
    pub fn with_rng(mut self, rng: Box<dyn RandomIndex>) -> Self {
        self.rng = rng;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading)
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.phase {
            LoadPhase::Ready(game) => Some(game),
            _ => None,
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Whether a feedback timer is still waiting to fire
    pub fn has_pending_advance(&self) -> bool {
        self.feedback_timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Apply the result of reading the dataset
    pub fn finish_load(&mut self, result: Result<Vec<Senator>, DatasetError>) -> ServerMessage {
        if !self.is_loading() {
            tracing::warn!("Session {}: ignoring load result outside Loading", self.id);
            return self.snapshot();
        }

        let started = result
            .map_err(|e| e.to_string())
            .and_then(|roster| Game::start(roster, self.rng.as_mut()).map_err(|e| e.to_string()));

        match started {
            Ok(game) => {
                tracing::info!(
                    "Session {}: roster ready with {} senators",
                    self.id,
                    game.roster().len()
                );
                let msg = round_message(&game, &self.config);
                self.phase = LoadPhase::Ready(game);
                msg
            }
            Err(msg) => {
                tracing::error!("Session {}: failed to load roster: {}", self.id, msg);
                self.phase = LoadPhase::Failed(msg.clone());
                ServerMessage::LoadFailed {
                    msg,
                    retryable: true,
                }
            }
        }
    }

    /// Go back to Loading after a failure. Returns `None` when there is nothing to retry.
    pub fn retry_load(&mut self) -> Option<ServerMessage> {
        match self.phase {
            LoadPhase::Failed(_) => {
                tracing::info!("Session {}: retrying dataset load", self.id);
                self.phase = LoadPhase::Loading;
                Some(ServerMessage::Loading)
            }
            _ => None,
        }
    }

    /// Evaluate a guess. Ignored while loading or while feedback is showing.
    pub fn guess(&mut self, guess: Guess) -> Option<ServerMessage> {
        let LoadPhase::Ready(game) = &mut self.phase else {
            tracing::debug!("Session {}: guess before roster is ready", self.id);
            return None;
        };

        let Some(outcome) = game.guess(guess) else {
            tracing::debug!("Session {}: guess while feedback is showing", self.id);
            return None;
        };

        let delay = self.config.feedback_delay;
        self.feedback_timer = Some(ScopedTimer::schedule(
            delay,
            self.timers.clone(),
            TimerEvent::AdvanceRound {
                round_no: game.round_no(),
            },
        ));
        self.feedback_deadline = Some(Instant::now() + delay);

        tracing::debug!(
            "Session {}: round {} guessed {:?} for {} ({}) -> {:?}",
            self.id,
            game.round_no(),
            outcome.guess,
            outcome.senator.id,
            outcome.senator.party,
            outcome.feedback
        );

        Some(ServerMessage::Feedback {
            result: outcome.feedback,
            message: feedback_message(outcome.feedback == Feedback::Correct, &outcome.senator),
            senator: outcome.senator,
            score: ScoreView::from(&outcome.score),
            advance_in_ms: delay.as_millis() as u64,
        })
    }

    /// React to one of this session's timers firing
    pub fn on_timer(&mut self, event: TimerEvent) -> Option<ServerMessage> {
        match event {
            TimerEvent::AdvanceRound { round_no } => self.advance_round(round_no),
            TimerEvent::ClearCopied { generation } => {
                if generation != self.share_generation || !self.copied {
                    return None;
                }
                self.copied = false;
                self.copied_timer = None;
                let text = self.current_share_text()?;
                Some(ServerMessage::ShareStatus {
                    copied: false,
                    fallback: false,
                    text,
                })
            }
        }
    }

    fn advance_round(&mut self, round_no: u64) -> Option<ServerMessage> {
        let LoadPhase::Ready(game) = &mut self.phase else {
            return None;
        };

        if game.round_no() != round_no || !game.feedback().is_showing() {
            tracing::debug!(
                "Session {}: stale advance for round {} (now {})",
                self.id,
                round_no,
                game.round_no()
            );
            return None;
        }

        self.feedback_timer = None;
        self.feedback_deadline = None;

        match game.advance(self.rng.as_mut()) {
            Ok(_) => Some(round_message(game, &self.config)),
            Err(e) => {
                tracing::error!("Session {}: failed to advance round: {}", self.id, e);
                Some(ServerMessage::Error {
                    code: "ROUND_FAILED".to_string(),
                    msg: e.to_string(),
                })
            }
        }
    }

    /// Copy the share text and set the transient "copied" flag
    pub async fn share(&mut self, clipboard: &dyn Clipboard) -> ServerMessage {
        let Some(game) = self.game() else {
            return ServerMessage::Error {
                code: "NOT_READY".to_string(),
                msg: "Roster is not loaded yet".to_string(),
            };
        };

        let score = game.score();
        if score.total == 0 {
            return ServerMessage::Error {
                code: "NOTHING_TO_SHARE".to_string(),
                msg: "Make a guess before sharing".to_string(),
            };
        }

        let text = share_text(&score, &self.config.share_site_url);
        match clipboard.write_text(&text).await {
            Ok(()) => {
                self.copied = true;
                self.share_generation += 1;
                self.copied_timer = Some(ScopedTimer::schedule(
                    self.config.copied_reset,
                    self.timers.clone(),
                    TimerEvent::ClearCopied {
                        generation: self.share_generation,
                    },
                ));
                ServerMessage::ShareStatus {
                    copied: true,
                    fallback: false,
                    text,
                }
            }
            Err(e) => {
                tracing::warn!("Session {}: clipboard write failed: {}", self.id, e);
                self.fallback_share(text)
            }
        }
    }

    /// The browser could not write the clipboard; offer the text for manual copy
    pub fn clipboard_denied(&mut self) -> Option<ServerMessage> {
        let text = self.current_share_text()?;
        tracing::warn!("Session {}: client denied clipboard access", self.id);
        Some(self.fallback_share(text))
    }

    fn fallback_share(&mut self, text: String) -> ServerMessage {
        self.copied = false;
        self.copied_timer = None;
        ServerMessage::ShareStatus {
            copied: false,
            fallback: true,
            text,
        }
    }

    fn current_share_text(&self) -> Option<String> {
        let score = self.game()?.score();
        (score.total > 0).then(|| share_text(&score, &self.config.share_site_url))
    }

    /// Message describing the current state from scratch
    pub fn snapshot(&self) -> ServerMessage {
        match &self.phase {
            LoadPhase::Loading => ServerMessage::Loading,
            LoadPhase::Failed(msg) => ServerMessage::LoadFailed {
                msg: msg.clone(),
                retryable: true,
            },
            LoadPhase::Ready(game) if game.feedback().is_showing() => {
                let remaining = self
                    .feedback_deadline
                    .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                    .unwrap_or_default();
                ServerMessage::Feedback {
                    result: game.feedback(),
                    message: feedback_message(game.feedback() == Feedback::Correct, game.current()),
                    senator: game.current().clone(),
                    score: ScoreView::from(&game.score()),
                    advance_in_ms: remaining.as_millis() as u64,
                }
            }
            LoadPhase::Ready(game) => round_message(game, &self.config),
        }
    }
}

fn round_message(game: &Game, config: &GameConfig) -> ServerMessage {
    let senator = game.current();
    ServerMessage::Round {
        round_no: game.round_no(),
        senator: SenatorCard {
            id: senator.id.clone(),
            portrait_url: config.portrait_url(&senator.portrait_file),
        },
        score: ScoreView::from(&game.score()),
        roster_size: game.roster().len(),
        seen_count: game.seen_count(),
        lap: game.lap(),
    }
}
