//! Per-frame simulation step
//!
//! Delta-time driven: the shell supplies `dt` from its animation-frame
//! timestamps and the step clamps it, so a stalled tab cannot teleport
//! blocks through the ground.

use super::state::{GameEvent, GamePhase, GameState};
use crate::approach;
use crate::consts::*;
use crate::tuning::Tuning;

/// Input commands for a single frame (deterministic)
///
/// The shell collects key/pointer events into this struct and the step
/// processes it exactly once, so input capture stays separate from
/// simulation mutation.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer the controllable block one column left
    pub move_left: bool,
    /// Steer the controllable block one column right
    pub move_right: bool,
    /// Soft drop; held, not one-shot
    pub soft_drop: bool,
    /// Start a session (from Idle or GameOver)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abandon the session and return to Idle
    pub reset: bool,
}

/// Advance the game state by one frame
pub fn advance(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    if input.reset {
        abandon_session(state, tuning);
        return;
    }

    if input.start && matches!(state.phase, GamePhase::Idle | GamePhase::GameOver) {
        start_session(state, tuning);
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let board = tuning.board();

    // Steering affects only the controllable block (lowest non-landed)
    if input.move_left || input.move_right {
        if let Some(block) = state.player_block_mut() {
            let mut col = block.current_column as isize;
            if input.move_left {
                col -= 1;
            }
            if input.move_right {
                col += 1;
            }
            block.current_column = board.clamp_column(col);
        }
    }
    if let Some(block) = state.player_block_mut() {
        block.drop_multiplier = if input.soft_drop {
            SOFT_DROP_MULTIPLIER
        } else {
            1.0
        };
    }

    // Spawn on a timer, capped by max_active_blocks
    state.spawn_timer += dt;
    if state.spawn_timer >= state.spawn_interval {
        state.spawn_block(tuning);
        state.spawn_timer = 0.0;
    }

    // Integrate and detect landings
    let mut landings: Vec<(bool, usize)> = Vec::new();
    let fall_speed = state.fall_speed;
    for block in &mut state.blocks {
        block.vy = fall_speed * block.drop_multiplier;
        block.pos.y += block.vy * dt;

        let target_x = board.column_center_x(block.current_column);
        block.pos.x = approach(block.pos.x, target_x, COLUMN_LERP_RATE, dt);

        if !block.landed {
            if block.bottom() >= board.ground_y() {
                block.landed = true;
                block.linger = LANDED_LINGER_SECS;
                landings.push((block.matched(), block.current_column));
            }
        } else {
            block.linger -= dt;
        }
    }

    for (matched, column) in landings {
        if matched {
            state.score += tuning.match_points(state.level);
        } else {
            state.lives = state.lives.saturating_sub(1);
            state.score = state.score.saturating_sub(tuning.mismatch_penalty);
        }
        state.events.push(GameEvent::BlockLanded { matched, column });
    }

    // Landed blocks linger briefly for the landing animation, then go
    state
        .blocks
        .retain(|b| (!b.landed || b.linger > 0.0) && b.pos.y < board.height + OFFSCREEN_MARGIN);

    update_difficulty(state, tuning);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Recompute level and the level-derived knobs from the current score
fn update_difficulty(state: &mut GameState, tuning: &Tuning) {
    let level = tuning.level_for_score(state.score);
    if level > state.level {
        state.events.push(GameEvent::LevelUp { level });
    }
    state.level = level;
    state.spawn_interval = tuning.spawn_interval_for_level(level);
    state.fall_speed = tuning.fall_speed_for_level(level);
}

/// Fresh Running session; the high score carries over for the HUD
fn start_session(state: &mut GameState, tuning: &Tuning) {
    state.phase = GamePhase::Running;
    state.blocks.clear();
    state.score = 0;
    state.level = 1;
    state.lives = tuning.lives;
    state.spawn_timer = 0.0;
    state.spawn_interval = tuning.spawn_interval_base;
    state.fall_speed = tuning.fall_speed_base;
    state.events.clear();
    // First block appears immediately rather than after a full interval
    state.spawn_block(tuning);
}

/// Synchronous cancellation: drop all in-flight blocks, back to Idle
fn abandon_session(state: &mut GameState, tuning: &Tuning) {
    state.phase = GamePhase::Idle;
    state.blocks.clear();
    state.score = 0;
    state.level = 1;
    state.lives = tuning.lives;
    state.spawn_timer = 0.0;
    state.spawn_interval = tuning.spawn_interval_base;
    state.fall_speed = tuning.fall_speed_base;
    state.events.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::Board;
    use crate::sim::state::{Block, Category};

    const DT: f32 = 1.0 / 60.0;

    fn tuning() -> Tuning {
        Tuning::validated().expect("default tuning must validate")
    }

    fn running_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(42, tuning);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        advance(&mut state, &input, tuning, DT);
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    /// Push a block hovering just above the ground line
    fn push_block_near_ground(
        state: &mut GameState,
        board: &Board,
        target_column: usize,
        current_column: usize,
    ) -> u32 {
        let id = state.next_entity_id();
        let mut block = Block::new(id, Category::Food, target_column, current_column, board);
        block.pos.y = board.ground_y() - block.height / 2.0 - 1.0;
        block.pos.x = board.column_center_x(current_column);
        state.blocks.push(block);
        id
    }

    #[test]
    fn test_idle_until_started() {
        let t = tuning();
        let mut state = GameState::new(1, &t);
        assert_eq!(state.phase, GamePhase::Idle);

        advance(&mut state, &TickInput::default(), &t, DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.blocks.is_empty());

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        advance(&mut state, &input, &t, DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.blocks.len(), 1);
    }

    #[test]
    fn test_pause_freezes_state() {
        let t = tuning();
        let mut state = running_state(&t);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        advance(&mut state, &pause, &t, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.clone();
        for _ in 0..100 {
            advance(&mut state, &TickInput::default(), &t, DT);
        }
        assert_eq!(state.score, frozen.score);
        assert_eq!(state.blocks.len(), frozen.blocks.len());
        for (a, b) in state.blocks.iter().zip(&frozen.blocks) {
            assert_eq!(a.pos, b.pos);
        }

        // Re-entrant to Running
        advance(&mut state, &pause, &t, DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_moves_clamp_to_columns() {
        let t = tuning();
        let mut state = running_state(&t);
        let columns = t.columns.len();

        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..20 {
            advance(&mut state, &left, &t, DT);
        }
        let col = state.player_block_mut().expect("block exists").current_column;
        assert_eq!(col, 0);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            advance(&mut state, &right, &t, DT);
        }
        let col = state.player_block_mut().expect("block exists").current_column;
        assert_eq!(col, columns - 1);
    }

    #[test]
    fn test_matched_landing_scores_and_keeps_lives() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        let board = t.board();
        push_block_near_ground(&mut state, &board, 2, 2);

        advance(&mut state, &TickInput::default(), &t, DT);

        assert_eq!(state.score, t.match_base_points + t.match_level_bonus);
        assert_eq!(state.lives, t.lives);
        assert!(state
            .events
            .iter()
            .any(|e| *e == GameEvent::BlockLanded { matched: true, column: 2 }));
    }

    #[test]
    fn test_mismatch_costs_life_and_floors_score() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        state.score = 5; // below the penalty, must floor at 0
        let board = t.board();
        push_block_near_ground(&mut state, &board, 0, 3);

        advance(&mut state, &TickInput::default(), &t, DT);

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, t.lives - 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_last_life_triggers_game_over() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        state.lives = 1;
        let board = t.board();
        push_block_near_ground(&mut state, &board, 0, 3);

        advance(&mut state, &TickInput::default(), &t, DT);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_spawn_is_noop_at_cap() {
        let t = tuning();
        let mut state = running_state(&t);
        while state.blocks.len() < t.max_active_blocks {
            state.spawn_block(&t);
        }
        assert_eq!(state.blocks.len(), t.max_active_blocks);

        state.spawn_block(&t);
        assert_eq!(state.blocks.len(), t.max_active_blocks);
    }

    #[test]
    fn test_landed_block_lingers_then_despawns() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        let board = t.board();
        let id = push_block_near_ground(&mut state, &board, 1, 1);

        advance(&mut state, &TickInput::default(), &t, DT);
        assert!(state.blocks.iter().any(|b| b.id == id && b.landed));

        // Keep the linger window tight: no other spawns, just time passing
        state.spawn_timer = f32::MIN;
        let frames = (LANDED_LINGER_SECS / DT).ceil() as usize + 2;
        for _ in 0..frames {
            advance(&mut state, &TickInput::default(), &t, DT);
        }
        assert!(!state.blocks.iter().any(|b| b.id == id));
    }

    #[test]
    fn test_soft_drop_multiplier_reverts_on_release() {
        let t = tuning();
        let mut state = running_state(&t);

        let held = TickInput {
            soft_drop: true,
            ..Default::default()
        };
        advance(&mut state, &held, &t, DT);
        let mult = state.player_block_mut().expect("block exists").drop_multiplier;
        assert_eq!(mult, SOFT_DROP_MULTIPLIER);

        advance(&mut state, &TickInput::default(), &t, DT);
        let mult = state.player_block_mut().expect("block exists").drop_multiplier;
        assert_eq!(mult, 1.0);
    }

    #[test]
    fn test_level_up_recomputes_difficulty() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        state.score = t.level_up_score - t.match_base_points - t.match_level_bonus + 1;
        let board = t.board();
        push_block_near_ground(&mut state, &board, 2, 2);

        advance(&mut state, &TickInput::default(), &t, DT);

        assert_eq!(state.level, 2);
        assert!(state.events.iter().any(|e| *e == GameEvent::LevelUp { level: 2 }));
        assert!(state.spawn_interval < t.spawn_interval_base);
        assert!(state.fall_speed > t.fall_speed_base);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let t = tuning();
        let mut state = running_state(&t);
        state.score = 77;

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        advance(&mut state, &reset, &t, DT);

        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.blocks.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, t.lives);
    }

    #[test]
    fn test_determinism() {
        let t = tuning();
        let mut state1 = GameState::new(99999, &t);
        let mut state2 = GameState::new(99999, &t);

        let inputs = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                soft_drop: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..600 {
            for input in &inputs {
                advance(&mut state1, input, &t, DT);
                advance(&mut state2, input, &t, DT);
            }
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.blocks.len(), state2.blocks.len());
        for (a, b) in state1.blocks.iter().zip(&state2.blocks) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_dt_is_clamped() {
        let t = tuning();
        let mut state = running_state(&t);
        state.blocks.clear();
        let board = t.board();
        push_block_near_ground(&mut state, &board, 1, 1);
        let y_before = state.blocks[0].pos.y;

        // A 10 second stall must advance at most MAX_FRAME_DT worth
        advance(&mut state, &TickInput::default(), &t, 10.0);
        let moved = state.blocks[0].pos.y - y_before;
        assert!(moved <= state.fall_speed * MAX_FRAME_DT + 0.001);
    }
}
