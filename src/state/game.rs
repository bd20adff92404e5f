use super::round::RandomIndex;
use super::GameError;
use crate::types::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of an accepted guess
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub guess: Guess,
    pub feedback: Feedback,
    pub senator: Senator,
    pub score: Score,
}

/// Game state of one session once the roster has been loaded
#[derive(Debug, Clone)]
pub struct Game {
    roster: Arc<[Senator]>,
    current: usize,
    seen: HashSet<SenatorId>,
    score: Score,
    feedback: Feedback,
    round_no: u64,
    lap: u32,
}

impl Game {
    /// Start a game on a loaded roster, picking the first Senator uniformly
    pub fn start(roster: Vec<Senator>, rng: &mut dyn RandomIndex) -> Result<Self, GameError> {
        if roster.is_empty() {
            return Err(GameError::EmptyRoster);
        }

        let mut ids = HashSet::with_capacity(roster.len());
        for senator in &roster {
            if !ids.insert(senator.id.as_str()) {
                return Err(GameError::DuplicateId(senator.id.clone()));
            }
        }

        let current = rng.pick(roster.len());
        Ok(Self {
            roster: roster.into(),
            current,
            seen: HashSet::new(),
            score: Score::default(),
            feedback: Feedback::None,
            round_no: 1,
            lap: 0,
        })
    }

    pub fn current(&self) -> &Senator {
        &self.roster[self.current]
    }

    pub fn roster(&self) -> &[Senator] {
        &self.roster
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// 1-based number of the round currently shown
    pub fn round_no(&self) -> u64 {
        self.round_no
    }

    /// Number of completed passes through the roster
    pub fn lap(&self) -> u32 {
        self.lap
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Evaluate a guess against the current Senator.
    ///
    /// Returns `None` while feedback from the previous guess is still shown,
    /// so one round can never be scored twice.
    pub fn guess(&mut self, guess: Guess) -> Option<GuessOutcome> {
        if self.feedback.is_showing() {
            return None;
        }

        let senator = self.current().clone();
        let correct = guess.matches(senator.party);
        self.feedback = if correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };
        self.score.record(correct);

        Some(GuessOutcome {
            guess,
            feedback: self.feedback,
            senator,
            score: self.score,
        })
    }

    /// Leave the feedback state and move on to the next Senator
    pub fn advance(&mut self, rng: &mut dyn RandomIndex) -> Result<&Senator, GameError> {
        if !self.feedback.is_showing() {
            return Err(GameError::NotShowingFeedback);
        }
        self.feedback = Feedback::None;
        self.next_senator(rng)?;
        self.round_no += 1;
        Ok(self.current())
    }

    fn next_senator(&mut self, rng: &mut dyn RandomIndex) -> Result<(), GameError> {
        let finished = self.current().id.clone();
        self.seen.insert(finished);

        if self.seen.len() >= self.roster.len() {
            self.seen.clear();
            self.lap += 1;
            tracing::debug!("Roster exhausted, starting lap {}", self.lap + 1);
        }

        let available: Vec<usize> = self
            .roster
            .iter()
            .enumerate()
            .filter(|(_, s)| !self.seen.contains(&s.id))
            .map(|(i, _)| i)
            .collect();

        if available.is_empty() {
            return Err(GameError::NoSenatorsAvailable);
        }

        self.current = available[rng.pick(available.len())];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::round::{seeded, FirstIndex};

    fn senator(id: &str, party: Party) -> Senator {
        Senator {
            id: id.to_string(),
            display_name: format!("Senator {}", id),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            state: "VT".to_string(),
            party,
            portrait_file: format!("{}.jpg", id),
        }
    }

    fn roster(n: usize) -> Vec<Senator> {
        (0..n)
            .map(|i| senator(&format!("S{:03}", i), Party::Republican))
            .collect()
    }

    /// Guess and advance, returning the id of the Senator shown next
    fn play_round(game: &mut Game, rng: &mut dyn RandomIndex) -> String {
        game.guess(Guess::Republican).unwrap();
        game.advance(rng).unwrap().id.clone()
    }

    #[test]
    fn test_start_rejects_empty_roster() {
        let result = Game::start(vec![], &mut FirstIndex);
        assert!(matches!(result, Err(GameError::EmptyRoster)));
    }

    #[test]
    fn test_start_rejects_duplicate_ids() {
        let roster = vec![
            senator("A", Party::Democrat),
            senator("A", Party::Republican),
        ];
        let result = Game::start(roster, &mut FirstIndex);
        assert!(matches!(result, Err(GameError::DuplicateId(id)) if id == "A"));
    }

    #[test]
    fn test_guess_scores_once_per_round() {
        let mut game = Game::start(vec![senator("A", Party::Democrat)], &mut FirstIndex).unwrap();

        let outcome = game.guess(Guess::Democrat).unwrap();
        assert_eq!(outcome.feedback, Feedback::Correct);
        assert_eq!(outcome.score, Score { correct: 1, total: 1 });

        // Feedback still showing: ignored
        assert!(game.guess(Guess::Republican).is_none());
        assert_eq!(game.score(), Score { correct: 1, total: 1 });
    }

    #[test]
    fn test_incorrect_guess_counts_total_only() {
        let mut game =
            Game::start(vec![senator("A", Party::Independent)], &mut FirstIndex).unwrap();

        let outcome = game.guess(Guess::Republican).unwrap();
        assert_eq!(outcome.feedback, Feedback::Incorrect);
        assert_eq!(game.score(), Score { correct: 0, total: 1 });
    }

    #[test]
    fn test_advance_requires_feedback() {
        let mut game = Game::start(roster(3), &mut FirstIndex).unwrap();
        let result = game.advance(&mut FirstIndex);
        assert!(matches!(result, Err(GameError::NotShowingFeedback)));
    }

    #[test]
    fn test_advance_clears_feedback() {
        let mut game = Game::start(roster(3), &mut FirstIndex).unwrap();
        game.guess(Guess::Democrat).unwrap();
        assert!(game.feedback().is_showing());

        game.advance(&mut FirstIndex).unwrap();
        assert_eq!(game.feedback(), Feedback::None);
        assert_eq!(game.round_no(), 2);
    }

    #[test]
    fn test_no_repeats_within_a_lap() {
        let mut rng = seeded(99);
        let n = 20;
        let mut game = Game::start(roster(n), rng.as_mut()).unwrap();

        let mut shown = HashSet::new();
        shown.insert(game.current().id.clone());
        for _ in 1..n {
            let id = play_round(&mut game, rng.as_mut());
            assert!(shown.insert(id), "Senator repeated within a lap");
        }
        assert_eq!(shown.len(), n);
        assert_eq!(game.lap(), 0);
    }

    #[test]
    fn test_seen_stays_below_roster_size() {
        let mut rng = seeded(3);
        let n = 5;
        let mut game = Game::start(roster(n), rng.as_mut()).unwrap();

        for _ in 0..(n * 4) {
            play_round(&mut game, rng.as_mut());
            assert!(game.seen_count() < n);
        }
    }

    #[test]
    fn test_lap_resets_seen_set() {
        let n = 4;
        let mut game = Game::start(roster(n), &mut FirstIndex).unwrap();
        assert_eq!(game.current().id, "S000");

        for expected in ["S001", "S002", "S003"] {
            assert_eq!(play_round(&mut game, &mut FirstIndex), expected);
        }
        assert_eq!(game.seen_count(), 3);

        // Last Senator of the lap done: seen clears and the roster is open again
        let next = play_round(&mut game, &mut FirstIndex);
        assert_eq!(next, "S000");
        assert_eq!(game.lap(), 1);
        assert_eq!(game.seen_count(), 0);
    }

    #[test]
    fn test_single_senator_roster_repeats() {
        let mut game = Game::start(vec![senator("ONLY", Party::Democrat)], &mut FirstIndex).unwrap();
        for _ in 0..3 {
            assert_eq!(play_round(&mut game, &mut FirstIndex), "ONLY");
        }
        assert_eq!(game.lap(), 3);
    }
}
