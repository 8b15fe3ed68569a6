//! Player score tracking.

use crate::core::{AppResult, Listener};
use crate::game::{GameEnd, GameStart};

/// Accumulates points during a game and keeps the final score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    points: u64,
    final_score: Option<u64>,
    games_played: u32,
}

impl ScoreKeeper {
    /// Empty score keeper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to the running score.
    pub fn add_points(&mut self, points: u32) {
        self.points += u64::from(points);
    }

    /// Running score of the current or last game.
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Score of the last finished game, if any.
    pub const fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Number of finished games.
    pub const fn games_played(&self) -> u32 {
        self.games_played
    }
}

impl Listener<GameStart> for ScoreKeeper {
    fn on_event(&mut self, _event: &GameStart) -> AppResult<()> {
        self.points = 0;
        self.final_score = None;
        Ok(())
    }
}

impl Listener<GameEnd> for ScoreKeeper {
    fn on_event(&mut self, _event: &GameEnd) -> AppResult<()> {
        self.final_score = Some(self.points);
        self.games_played += 1;
        tracing::info!("game {} over, score {}", self.games_played, self.points);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_cycle() {
        let mut score = ScoreKeeper::new();
        Listener::<GameStart>::on_event(&mut score, &GameStart).unwrap();
        score.add_points(1);
        score.add_points(5);
        Listener::<GameEnd>::on_event(&mut score, &GameEnd).unwrap();
        assert_eq!(score.final_score(), Some(6));

        Listener::<GameStart>::on_event(&mut score, &GameStart).unwrap();
        assert_eq!(score.points(), 0);
        assert_eq!(score.final_score(), None);
        assert_eq!(score.games_played(), 1);
    }
}
