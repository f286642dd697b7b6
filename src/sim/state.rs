//! Game state and core simulation types
//!
//! Everything the update step reads or writes lives here. Entities are plain
//! values owned by `GameState`; blocks and gems are addressed by index.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Result of the run so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Tri-state integer view: 0 in progress, 1 won, -1 lost
    pub fn as_i8(&self) -> i8 {
        match self {
            Outcome::InProgress => 0,
            Outcome::Won => 1,
            Outcome::Lost => -1,
        }
    }

    pub fn is_decided(&self) -> bool {
        *self != Outcome::InProgress
    }
}

/// Anything with a position and a sprite-sized box (ball, paddle, block, gem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Top-left corner
    pub pos: Vec2,
    /// Width/height reported by the sprite
    pub size: Vec2,
    pub visible: bool,
    /// Unit-ish direction; each axis is flipped on bounces
    pub direction: Vec2,
    pub speed: f32,
}

impl Entity {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            visible: true,
            direction: Vec2::ZERO,
            speed: 1.0,
        }
    }

    pub fn hidden(pos: Vec2, size: Vec2) -> Self {
        Self {
            visible: false,
            ..Self::new(pos, size)
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Sprite dimensions for each entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySizes {
    pub block: Vec2,
    pub ball: Vec2,
    pub paddle: Vec2,
    pub gem: Vec2,
}

impl Default for EntitySizes {
    /// Dimensions of the puzzle-pack textures the game ships with
    fn default() -> Self {
        Self {
            block: Vec2::new(64.0, 32.0),
            ball: Vec2::new(22.0, 22.0),
            paddle: Vec2::new(104.0, 24.0),
            gem: Vec2::new(32.0, 32.0),
        }
    }
}

/// Top-left corner of block `index` in the grid
pub fn block_position(index: usize) -> Vec2 {
    let col = (index % BLOCK_COLUMNS) as f32;
    let row = (index / BLOCK_COLUMNS) as f32;
    Vec2::new(
        BLOCK_ORIGIN_X + col * BLOCK_SPACING_X,
        BLOCK_ORIGIN_Y + row * BLOCK_SPACING_Y,
    )
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub lives: u8,
    pub score: u64,
    pub outcome: Outcome,
    /// Title screen is showing; nothing moves until Enter
    pub in_menu: bool,
    /// Paddle input: -1 left, 0 still, 1 right
    pub paddle_move: i8,
    pub ball: Ball,
    pub paddle: Entity,
    /// Fixed grid, never resized
    pub blocks: Vec<Entity>,
    pub gems: GemPool,
}

/// The single ball (an entity with a non-zero direction)
pub type Ball = Entity;

/// Fixed-capacity ring of reusable falling gems
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemPool {
    pub slots: [Entity; GEM_POOL_SIZE],
    /// Next slot to try when spawning
    pub cursor: usize,
    pub on_screen: usize,
    /// Seconds accumulated toward the next spawn
    pub timer: f32,
    /// Spawn when `timer` exceeds this
    pub next_spawn: f32,
}

impl GemPool {
    fn new(size: Vec2, next_spawn: f32) -> Self {
        let slot = || {
            let mut gem = Entity::hidden(Vec2::new(0.0, -size.y), size);
            gem.direction = Vec2::Y;
            gem
        };
        Self {
            slots: [slot(), slot(), slot()],
            cursor: 0,
            on_screen: 0,
            timer: 0.0,
            next_spawn,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|g| g.visible).count()
    }
}

impl GameState {
    /// Create a new game with the default sprite sizes
    pub fn new(seed: u64) -> Self {
        Self::with_sizes(seed, EntitySizes::default())
    }

    /// Create a new game using the sprite sizes reported by the renderer
    pub fn with_sizes(seed: u64, sizes: EntitySizes) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_spawn = roll_spawn_interval(&mut rng);

        let blocks = (0..BLOCK_COUNT)
            .map(|i| Entity::new(block_position(i), sizes.block))
            .collect();

        let mut ball = Entity::new(Vec2::from(BALL_SPAWN), sizes.ball);
        ball.direction = Vec2::ONE;

        Self {
            seed,
            rng,
            lives: STARTING_LIVES,
            score: 0,
            outcome: Outcome::InProgress,
            in_menu: true,
            paddle_move: 0,
            ball,
            paddle: Entity::new(Vec2::from(PADDLE_SPAWN), sizes.paddle),
            blocks,
            gems: GemPool::new(sizes.gem, next_spawn),
        }
    }

    /// Put the ball back at its spawn point (direction is kept)
    pub fn reset_ball(&mut self) {
        self.ball.pos = Vec2::from(BALL_SPAWN);
    }

    pub fn blocks_remaining(&self) -> usize {
        self.blocks.iter().filter(|b| b.visible).count()
    }
}

/// Draw a new gem spawn interval
pub fn roll_spawn_interval(rng: &mut Pcg32) -> f32 {
    rng.random_range(GEM_INTERVAL_MIN..GEM_INTERVAL_MAX)
}
