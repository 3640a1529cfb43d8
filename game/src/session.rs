use std::time::Instant;

use crate::level::{InvalidLevel, LevelConfig, LevelRules};
use crate::puzzle::PuzzleCore;
use crate::timer::SessionTimer;

/// One in-progress attempt at a level: config, board, and clock, owned
/// together so leaving a level drops everything at once.
#[derive(Debug, Clone)]
pub struct Session {
    config: LevelConfig,
    puzzle: PuzzleCore,
    timer: SessionTimer,
}

impl Session {
    /// Deals a fresh board for `level_index` and starts its timer.
    pub fn begin(
        rules: LevelRules,
        level_index: usize,
        max_pegs: Option<usize>,
        seed: u64,
        now: Instant,
    ) -> Result<Self, InvalidLevel> {
        let config = LevelConfig::for_level(rules, level_index, max_pegs)?;
        let mut puzzle = PuzzleCore::new(config.peg_count, config.total_plates, seed);
        puzzle.deal();
        Ok(Self {
            config,
            puzzle,
            timer: SessionTimer::start(now),
        })
    }

    pub fn level_index(&self) -> usize {
        self.config.level_index
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn puzzle(&self) -> &PuzzleCore {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut PuzzleCore {
        &mut self.puzzle
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut SessionTimer {
        &mut self.timer
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.timer.elapsed_secs(now)
    }

    pub fn remaining_secs(&self, now: Instant) -> u64 {
        self.timer.remaining(now, self.config.time_limit).as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn begin_deals_the_configured_board() {
        let now = Instant::now();
        let session = Session::begin(LevelRules::default(), 0, None, 11, now).unwrap();

        assert_eq!(session.config().total_plates, 4);
        assert_eq!(session.puzzle().peg_count(), 3);
        let dealt: usize = session.puzzle().pegs().iter().map(Vec::len).sum();
        assert_eq!(dealt, 4);
        assert_eq!(session.puzzle().moves(), 0);
        assert_eq!(session.remaining_secs(now), 45);
    }

    #[test]
    fn begin_rejects_out_of_range_levels() {
        let now = Instant::now();
        assert!(Session::begin(LevelRules::default(), 9, None, 11, now).is_err());
    }

    #[test]
    fn remaining_follows_the_level_time_limit() {
        let now = Instant::now();
        let session = Session::begin(LevelRules::default(), 1, None, 11, now).unwrap();
        assert_eq!(session.remaining_secs(now + Duration::from_secs(30)), 60);
    }
}
