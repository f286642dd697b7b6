//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Time advances only through `tick(dt)`
//! - Seeded RNG only
//! - Stable iteration order (by entity index)

pub mod rect;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::{Ball, Entity, EntitySizes, GameState, GemPool, Outcome, block_position};
pub use tick::{GameEvent, drop_gem, tick};
