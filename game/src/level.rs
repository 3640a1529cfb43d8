use std::error::Error;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seconds of play time granted per level step.
pub const TIME_PER_LEVEL: Duration = Duration::from_secs(45);

/// The knobs that shape level difficulty. Configurable via settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRules {
    pub base_total_plates: usize,
    pub plates_increment: usize,
    pub base_stacks: usize,
    pub max_levels: usize,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            base_total_plates: 4,
            plates_increment: 2,
            base_stacks: 3,
            max_levels: 5,
        }
    }
}

impl LevelRules {
    /// Clamps values a settings file could set to something unplayable.
    pub fn sanitized(mut self) -> Self {
        self.base_total_plates = self.base_total_plates.max(1);
        self.base_stacks = self.base_stacks.max(2);
        self.max_levels = self.max_levels.max(1);
        self
    }
}

/// One level's derived parameters. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub level_index: usize,
    pub total_plates: usize,
    pub peg_count: usize,
    pub time_limit: Duration,
}

impl LevelConfig {
    /// Derives the level parameters for `level_index`.
    ///
    /// `max_pegs` is the display-driven upper bound on peg count supplied by
    /// the caller; the count is clamped to it but never below
    /// `rules.base_stacks`.
    pub fn for_level(
        rules: LevelRules,
        level_index: usize,
        max_pegs: Option<usize>,
    ) -> Result<Self, InvalidLevel> {
        if level_index >= rules.max_levels {
            return Err(InvalidLevel {
                level_index,
                max_levels: rules.max_levels,
            });
        }

        let total_plates = rules.base_total_plates + rules.plates_increment * level_index;
        let mut peg_count = rules.base_stacks + level_index / 2;
        if let Some(cap) = max_pegs {
            if peg_count > cap {
                peg_count = cap.max(rules.base_stacks);
            }
        }
        let time_limit = TIME_PER_LEVEL * (level_index as u32 + 1);

        Ok(Self {
            level_index,
            total_plates,
            peg_count,
            time_limit,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLevel {
    pub level_index: usize,
    pub max_levels: usize,
}

impl fmt::Display for InvalidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} is out of range (0..{})",
            self.level_index, self.max_levels
        )
    }
}

impl Error for InvalidLevel {}
