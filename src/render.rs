//! Pure scene projection
//!
//! `scene` turns the current game state into an ordered draw-command list
//! with no side effects, so any surface (the canvas shell, a test) can
//! consume it without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::GROUND_HEIGHT;
use crate::sim::{GamePhase, GameState};
use crate::tuning::Tuning;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing primitive, in paint order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: u32,
        alpha: f32,
    },
    RoundedRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: u32,
        alpha: f32,
        outline: bool,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: u32,
        alpha: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: u32,
        size: f32,
        align: TextAlign,
    },
}

/// Dashboard-facing counters, drawn outside the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub high_score: u32,
    pub difficulty: &'static str,
    pub phase: GamePhase,
}

/// A full frame: paint-ordered commands plus the HUD values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCmd>,
    pub hud: Hud,
}

/// Project the game state into a frame. Pure: `state` is untouched.
pub fn scene(state: &GameState, tuning: &Tuning) -> Scene {
    let board = tuning.board();
    let col_w = board.column_width();
    let ground_y = board.ground_y();
    let mut commands = Vec::new();

    // Column bands, separators and titles
    for (i, category) in tuning.columns.iter().enumerate() {
        let x = i as f32 * col_w;
        commands.push(DrawCmd::Rect {
            x,
            y: 0.0,
            w: col_w,
            h: board.height,
            color: category.color(),
            alpha: 0.10,
        });
        commands.push(DrawCmd::Text {
            x: x + col_w / 2.0,
            y: 28.0,
            text: format!("{} {}", category.emoji(), category.label()),
            color: 0x000000,
            size: 14.0,
            align: TextAlign::Center,
        });
        commands.push(DrawCmd::Line {
            x1: x + col_w,
            y1: 0.0,
            x2: x + col_w,
            y2: board.height,
            color: 0x000000,
            alpha: 0.06,
        });
    }

    // Ground strip and landing slots
    commands.push(DrawCmd::Rect {
        x: 0.0,
        y: ground_y,
        w: board.width,
        h: GROUND_HEIGHT,
        color: 0x000000,
        alpha: 0.10,
    });
    for (i, category) in tuning.columns.iter().enumerate() {
        let x = i as f32 * col_w + 10.0;
        commands.push(DrawCmd::RoundedRect {
            x,
            y: ground_y + 8.0,
            w: col_w - 20.0,
            h: 56.0,
            radius: 10.0,
            color: category.color(),
            alpha: 0.18,
            outline: true,
        });
        commands.push(DrawCmd::Text {
            x: x + 10.0,
            y: ground_y + 40.0,
            text: category.label().to_string(),
            color: 0x000000,
            size: 13.0,
            align: TextAlign::Left,
        });
    }

    // Falling blocks, oldest first
    for block in &state.blocks {
        let left = block.pos.x - block.width / 2.0;
        let top = block.pos.y - block.height / 2.0;
        commands.push(DrawCmd::RoundedRect {
            x: left,
            y: top,
            w: block.width,
            h: block.height,
            radius: 8.0,
            color: block.category.color(),
            alpha: 0.30,
            outline: true,
        });
        commands.push(DrawCmd::Text {
            x: left + 10.0,
            y: top + block.height / 2.0 + 6.0,
            text: format!("{} {}", block.category.emoji(), block.category.label()),
            color: 0x000000,
            size: 18.0,
            align: TextAlign::Left,
        });
    }

    // Phase overlays
    let overlay = match state.phase {
        GamePhase::Idle => Some("Press Start"),
        GamePhase::Paused => Some("Paused"),
        GamePhase::GameOver => Some("Game Over"),
        GamePhase::Running => None,
    };
    if let Some(text) = overlay {
        commands.push(DrawCmd::Rect {
            x: 0.0,
            y: 0.0,
            w: board.width,
            h: board.height,
            color: 0xFFFFFF,
            alpha: 0.55,
        });
        commands.push(DrawCmd::Text {
            x: board.width / 2.0,
            y: board.height / 2.0,
            text: text.to_string(),
            color: 0x000000,
            size: 32.0,
            align: TextAlign::Center,
        });
    }

    Scene {
        width: board.width,
        height: board.height,
        commands,
        hud: Hud {
            score: state.score,
            lives: state.lives,
            level: state.level,
            high_score: state.high_score,
            difficulty: state.difficulty_label(),
            phase: state.phase,
        },
    }
}
