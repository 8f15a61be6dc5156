//! Game state and core simulation types
//!
//! Everything that must survive a serde round-trip for replay/determinism
//! lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::Board;
use crate::consts::*;
use crate::tuning::Tuning;

/// Budget categories, one per column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Bills,
    Entertainment,
    Savings,
}

impl Category {
    /// Canonical column order
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Entertainment,
        Category::Savings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Savings => "Savings",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Food => "\u{1F37D}\u{FE0F}",
            Category::Transport => "\u{1F68C}",
            Category::Bills => "\u{1F9FE}",
            Category::Entertainment => "\u{1F3AE}",
            Category::Savings => "\u{1F4B0}",
        }
    }

    /// Display color as 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            Category::Food => 0xFF6A00,
            Category::Transport => 0x008A1A,
            Category::Bills => 0xD10000,
            Category::Entertainment => 0x4A24FF,
            Category::Savings => 0x003EBB,
        }
    }
}

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No simulation running yet
    #[default]
    Idle,
    /// Spawn timer and fall simulation active
    Running,
    /// Simulation frozen, re-entrant to Running
    Paused,
    /// Lives hit zero; terminal for the session
    GameOver,
}

/// A falling block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Center position; x column-centered, y grows downward
    pub pos: Vec2,
    /// Vertical speed (recomputed each frame from fall speed)
    pub vy: f32,
    /// 1 normally, 4 while soft-drop is held
    pub drop_multiplier: f32,
    pub width: f32,
    pub height: f32,
    pub category: Category,
    /// Column matching the category (ground truth)
    pub target_column: usize,
    /// Column the player has steered to
    pub current_column: usize,
    /// Set exactly once when the block crosses the ground line
    pub landed: bool,
    /// Countdown after landing; block removed when it reaches zero
    pub linger: f32,
}

impl Block {
    pub fn new(
        id: u32,
        category: Category,
        target_column: usize,
        spawn_column: usize,
        board: &Board,
    ) -> Self {
        Self {
            id,
            pos: Vec2::new(board.column_center_x(spawn_column), SPAWN_Y),
            vy: 0.0,
            drop_multiplier: 1.0,
            width: board.block_width(),
            height: BLOCK_HEIGHT,
            category,
            target_column,
            current_column: spawn_column,
            landed: false,
            linger: 0.0,
        }
    }

    /// Bottom edge of the block
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Whether the player steered this block into its matching column
    pub fn matched(&self) -> bool {
        self.current_column == self.target_column
    }
}

/// One-shot cues emitted by the simulation, drained by the shell each frame.
/// Never gameplay-affecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Block reached the ground line
    BlockLanded { matched: bool, column: usize },
    /// Level threshold crossed
    LevelUp { level: u32 },
    /// Lives hit zero
    GameOver { score: u32 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Active blocks, oldest first
    pub blocks: Vec<Block>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Seconds accumulated toward the next spawn
    pub spawn_timer: f32,
    /// Seconds between spawns (shrinks with level)
    pub spawn_interval: f32,
    /// Base vertical speed in px/s (grows with level)
    pub fall_speed: f32,
    /// Best score from previous sessions, loaded at session start
    pub high_score: u32,
    /// Cue queue for the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh Idle session with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            blocks: Vec::new(),
            score: 0,
            lives: tuning.lives,
            level: 1,
            spawn_timer: 0.0,
            spawn_interval: tuning.spawn_interval_base,
            fall_speed: tuning.fall_speed_base,
            high_score: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one block with independently drawn category and spawn column.
    /// No-op at the active-block cap.
    pub fn spawn_block(&mut self, tuning: &Tuning) {
        if self.blocks.len() >= tuning.max_active_blocks {
            return;
        }
        let board = tuning.board();
        let category = tuning.columns[self.rng.random_range(0..tuning.columns.len())];
        let target_column = tuning
            .columns
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        // Spawn column is an independent draw; a lucky block may already be
        // aligned with its target.
        let spawn_column = self.rng.random_range(0..tuning.columns.len());
        let id = self.next_entity_id();
        self.blocks
            .push(Block::new(id, category, target_column, spawn_column, &board));
    }

    /// The single controllable block: active, non-landed, greatest y
    pub fn player_block_mut(&mut self) -> Option<&mut Block> {
        self.blocks
            .iter_mut()
            .filter(|b| !b.landed)
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Difficulty label for the HUD
    pub fn difficulty_label(&self) -> &'static str {
        if self.level < 2 {
            "Normal"
        } else if self.level < 4 {
            "Hard"
        } else {
            "Insane"
        }
    }
}
