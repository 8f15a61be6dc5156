//! Board and column geometry
//!
//! Pure helpers shared by the simulation and the scene projection.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The playfield: a fixed-size board divided into equal-width columns,
/// with a landing strip along the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f32,
    pub height: f32,
    pub columns: usize,
}

impl Board {
    pub fn new(width: f32, height: f32, columns: usize) -> Self {
        Self {
            width,
            height,
            columns,
        }
    }

    /// Width of one column
    pub fn column_width(&self) -> f32 {
        self.width / self.columns as f32
    }

    /// X coordinate of the center of a column
    pub fn column_center_x(&self, column: usize) -> f32 {
        column as f32 * self.column_width() + self.column_width() / 2.0
    }

    /// Clamp a signed column index into `[0, columns - 1]`
    pub fn clamp_column(&self, column: isize) -> usize {
        column.clamp(0, self.columns as isize - 1) as usize
    }

    /// Y coordinate of the ground line (top of the landing strip)
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }

    /// Block width for this board
    pub fn block_width(&self) -> f32 {
        BLOCK_MAX_WIDTH.min(self.column_width() * BLOCK_WIDTH_FRACTION)
    }
}
