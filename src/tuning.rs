//! Data-driven game balance
//!
//! All gameplay knobs live in one serializable struct so balance passes are
//! data edits, not code edits. Invalid values are rejected at construction
//! and never reach the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::sim::layout::Board;
use crate::sim::state::Category;

/// Invalid-configuration conditions
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("at least one column is required")]
    NoColumns,
    #[error("fall speed must be positive (got {0})")]
    NonPositiveFallSpeed(f32),
    #[error("spawn interval bounds must be positive with min <= base (min {min}, base {base})")]
    BadSpawnInterval { min: f32, base: f32 },
    #[error("level-up score threshold must be at least 1")]
    ZeroLevelThreshold,
    #[error("max active blocks must be at least 1")]
    ZeroBlockCap,
    #[error("lives must be at least 1")]
    ZeroLives,
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Column order; a block's target column is its category's index here
    pub columns: Vec<Category>,
    pub board_width: f32,
    pub board_height: f32,
    /// Seconds between spawns at level 1
    pub spawn_interval_base: f32,
    /// Spawn interval floor
    pub spawn_interval_min: f32,
    /// Spawn interval reduction per level
    pub spawn_interval_step: f32,
    /// Vertical speed at level 1 (px/s)
    pub fall_speed_base: f32,
    /// Vertical speed gained per level (px/s)
    pub fall_speed_per_level: f32,
    /// Score needed per level
    pub level_up_score: u32,
    /// Cap on concurrently active blocks
    pub max_active_blocks: usize,
    /// Starting lives
    pub lives: u32,
    /// Points for a matched landing, before the level bonus
    pub match_base_points: u32,
    /// Extra points per level for a matched landing
    pub match_level_bonus: u32,
    /// Points lost on a mismatch (score floors at 0)
    pub mismatch_penalty: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            columns: Category::ALL.to_vec(),
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            spawn_interval_base: 1.6,
            spawn_interval_min: 0.6,
            spawn_interval_step: 0.13,
            fall_speed_base: 70.0,
            fall_speed_per_level: 12.0,
            level_up_score: 120,
            max_active_blocks: 5,
            lives: 3,
            match_base_points: 10,
            match_level_bonus: 5,
            mismatch_penalty: 8,
        }
    }
}

impl Tuning {
    /// Default tuning, checked once so the invariants hold for callers
    pub fn validated() -> Result<Self, TuningError> {
        let tuning = Self::default();
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configuration misuse before a session starts
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.columns.is_empty() {
            return Err(TuningError::NoColumns);
        }
        if self.fall_speed_base <= 0.0 {
            return Err(TuningError::NonPositiveFallSpeed(self.fall_speed_base));
        }
        if self.spawn_interval_min <= 0.0 || self.spawn_interval_min > self.spawn_interval_base {
            return Err(TuningError::BadSpawnInterval {
                min: self.spawn_interval_min,
                base: self.spawn_interval_base,
            });
        }
        if self.level_up_score == 0 {
            return Err(TuningError::ZeroLevelThreshold);
        }
        if self.max_active_blocks == 0 {
            return Err(TuningError::ZeroBlockCap);
        }
        if self.lives == 0 {
            return Err(TuningError::ZeroLives);
        }
        Ok(())
    }

    /// Playfield geometry for this tuning
    pub fn board(&self) -> Board {
        Board::new(self.board_width, self.board_height, self.columns.len())
    }

    /// Derived level for a score (level 1 at score 0)
    pub fn level_for_score(&self, score: u32) -> u32 {
        1 + score / self.level_up_score
    }

    /// Spawn interval at a level, floored at the minimum
    pub fn spawn_interval_for_level(&self, level: u32) -> f32 {
        (self.spawn_interval_base - (level - 1) as f32 * self.spawn_interval_step)
            .max(self.spawn_interval_min)
    }

    /// Fall speed at a level
    pub fn fall_speed_for_level(&self, level: u32) -> f32 {
        self.fall_speed_base + (level - 1) as f32 * self.fall_speed_per_level
    }

    /// Points for a matched landing at a level
    pub fn match_points(&self, level: u32) -> u32 {
        self.match_base_points + self.match_level_bonus * level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_columns() {
        let mut t = Tuning::default();
        t.columns.clear();
        assert_eq!(t.validate(), Err(TuningError::NoColumns));
    }

    #[test]
    fn test_rejects_non_positive_fall_speed() {
        let mut t = Tuning::default();
        t.fall_speed_base = 0.0;
        assert!(matches!(
            t.validate(),
            Err(TuningError::NonPositiveFallSpeed(_))
        ));
        t.fall_speed_base = -5.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_spawn_bounds() {
        let mut t = Tuning::default();
        t.spawn_interval_min = 2.0; // above base
        assert!(matches!(
            t.validate(),
            Err(TuningError::BadSpawnInterval { .. })
        ));
    }

    #[test]
    fn test_level_thresholds() {
        let t = Tuning::default();
        assert_eq!(t.level_for_score(0), 1);
        assert_eq!(t.level_for_score(119), 1);
        assert_eq!(t.level_for_score(120), 2);
        assert_eq!(t.level_for_score(360), 4);
    }

    #[test]
    fn test_spawn_interval_floors_at_min() {
        let t = Tuning::default();
        assert!((t.spawn_interval_for_level(1) - t.spawn_interval_base).abs() < f32::EPSILON);
        // Far beyond the crossover level the floor holds
        assert!((t.spawn_interval_for_level(50) - t.spawn_interval_min).abs() < f32::EPSILON);
        // Monotonically non-increasing
        for level in 1..20 {
            assert!(t.spawn_interval_for_level(level + 1) <= t.spawn_interval_for_level(level));
        }
    }

    #[test]
    fn test_fall_speed_grows_with_level() {
        let t = Tuning::default();
        for level in 1..20 {
            assert!(t.fall_speed_for_level(level + 1) > t.fall_speed_for_level(level));
        }
    }
}
