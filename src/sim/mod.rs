//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta-time stepping with a clamped maximum
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod layout;
pub mod state;
pub mod tick;

pub use layout::Board;
pub use state::{Block, Category, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, advance};
