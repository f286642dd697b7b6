//! Per-frame simulation step
//!
//! Collision checks run first against the positions from the previous frame,
//! then the outcome is settled, then everything moves.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Outcome, roll_spawn_interval};
use crate::consts::*;

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BlockBroken { index: usize },
    GemCaught { slot: usize },
    GemMissed { slot: usize },
    GemDropped { slot: usize },
    PaddleBounce,
    WallBounce,
    CeilingBounce,
    LifeLost { remaining: u8 },
    Won,
    Lost,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let ball_box = state.ball.bounds();
    let paddle_box = state.paddle.bounds();

    // Blocks
    for (index, block) in state.blocks.iter_mut().enumerate() {
        if block.visible && block.bounds().contains(&ball_box) {
            state.ball.direction.y *= -1.0;
            block.visible = false;
            state.score += BLOCK_SCORE;
            events.push(GameEvent::BlockBroken { index });
        }
    }

    // Gems caught by the paddle
    for (slot, gem) in state.gems.slots.iter_mut().enumerate() {
        if gem.visible && gem.bounds().contains(&paddle_box) {
            gem.visible = false;
            state.gems.on_screen = state.gems.on_screen.saturating_sub(1);
            state.score += GEM_SCORE;
            events.push(GameEvent::GemCaught { slot });
        }
    }

    // Paddle bounce, independent of the block pass above
    if paddle_box.contains(&ball_box) {
        state.ball.direction.y *= -1.0;
        events.push(GameEvent::PaddleBounce);
    }

    // Side walls
    if ball_box.right > GAME_WIDTH || ball_box.left < 0.0 {
        state.ball.direction.x *= -1.0;
        events.push(GameEvent::WallBounce);
    }

    // Ceiling
    if ball_box.top < 0.0 {
        state.ball.direction.y *= -1.0;
        events.push(GameEvent::CeilingBounce);
    }

    // Missed ball
    if state.ball.pos.y > GAME_HEIGHT + MISS_MARGIN && state.outcome == Outcome::InProgress {
        state.lives = state.lives.saturating_sub(1);
        if state.lives > 0 {
            state.reset_ball();
            events.push(GameEvent::LifeLost {
                remaining: state.lives,
            });
        } else {
            state.outcome = Outcome::Lost;
            events.push(GameEvent::Lost);
        }
    }

    // Wave clear
    if state.outcome == Outcome::InProgress && state.blocks.iter().all(|b| !b.visible) {
        state.outcome = Outcome::Won;
        events.push(GameEvent::Won);
    }

    if state.in_menu {
        return events;
    }

    // Movement
    state.paddle.pos.x += PADDLE_SPEED * dt * f32::from(state.paddle_move);
    let ball_step = BALL_SPEED * dt * state.ball.speed;
    state.ball.pos += ball_step * state.ball.direction;

    for (slot, gem) in state.gems.slots.iter_mut().enumerate() {
        if !gem.visible {
            continue;
        }
        gem.pos.y += GEM_SPEED * dt * gem.direction.y;
        if gem.pos.y > GAME_HEIGHT {
            gem.visible = false;
            state.gems.on_screen = state.gems.on_screen.saturating_sub(1);
            events.push(GameEvent::GemMissed { slot });
        }
    }

    // Gem spawning stops once the run is decided
    if state.outcome == Outcome::InProgress {
        state.gems.timer += dt;
        if state.gems.timer > state.gems.next_spawn {
            if let Some(slot) = drop_gem(state) {
                events.push(GameEvent::GemDropped { slot });
            }
            state.gems.next_spawn = roll_spawn_interval(&mut state.rng);
            state.gems.timer = 0.0;
        }
    }

    events
}

/// Re-arm the next free gem slot at a random x just above the screen
///
/// Slots are tried round-robin from the pool cursor. Returns the slot used,
/// or `None` when every gem is already falling.
pub fn drop_gem(state: &mut GameState) -> Option<usize> {
    let pool = &mut state.gems;
    let slot = (0..GEM_POOL_SIZE)
        .map(|offset| (pool.cursor + offset) % GEM_POOL_SIZE)
        .find(|&slot| !pool.slots[slot].visible)?;

    let gem = &mut pool.slots[slot];
    let max_x = (GAME_WIDTH - gem.size.x).max(0.0);
    let x = state.rng.random_range(0.0..=max_x);
    gem.pos = Vec2::new(x, -gem.size.y);
    gem.visible = true;

    pool.on_screen += 1;
    pool.cursor = (slot + 1) % GEM_POOL_SIZE;
    Some(slot)
}
