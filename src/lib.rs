//! Expense Drop - the falling-category arcade game on the budget dashboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blocks, landing rules, difficulty)
//! - `render`: Pure scene projection consumed by the canvas shell
//! - `platform`: Storage abstraction (LocalStorage on web)
//! - `tuning`: Data-driven game balance, validated at construction
//! - `highscores`: Single-integer high score persistence

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts (tab-switch stall guard)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Board dimensions in canvas pixels
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 500.0;
    /// Height of the landing strip at the bottom of the board
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Block defaults
    pub const BLOCK_HEIGHT: f32 = 44.0;
    pub const BLOCK_MAX_WIDTH: f32 = 120.0;
    /// Fraction of the column width a block may occupy
    pub const BLOCK_WIDTH_FRACTION: f32 = 0.86;
    /// Spawn height above the top edge
    pub const SPAWN_Y: f32 = -40.0;

    /// Vertical speed multiplier while soft-drop is held
    pub const SOFT_DROP_MULTIPLIER: f32 = 4.0;
    /// Exponential smoothing rate for lateral column moves (per second)
    pub const COLUMN_LERP_RATE: f32 = 8.0;
    /// How long a landed block stays visible before removal (seconds)
    pub const LANDED_LINGER_SECS: f32 = 0.42;
    /// Blocks past this margin below the board are dropped regardless of linger
    pub const OFFSCREEN_MARGIN: f32 = 200.0;
}

/// Exponential approach of `current` toward `target`, clamped so a large
/// frame delta never overshoots.
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}
