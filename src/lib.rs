//! Breakout - a minimal brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, per-frame update)
//! - `session`: Game session driven by the engine's frame loop
//! - `input`: Key/click events delivered by the engine
//! - `platform`: Render/input engine boundary plus a headless implementation
//! - `settings`: Presentation preferences

pub mod input;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{GameSession, InitError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 640.0;
    pub const GAME_HEIGHT: f32 = 920.0;
    /// How far below the playfield the ball falls before a life is lost
    pub const MISS_MARGIN: f32 = 100.0;

    /// Block grid (6 columns x 8 rows)
    pub const BLOCK_COUNT: usize = 48;
    pub const BLOCK_COLUMNS: usize = 6;
    pub const BLOCK_ORIGIN_X: f32 = 38.0;
    pub const BLOCK_ORIGIN_Y: f32 = 30.0;
    pub const BLOCK_SPACING_X: f32 = 100.0;
    pub const BLOCK_SPACING_Y: f32 = 50.0;

    /// Falling gem pool size
    pub const GEM_POOL_SIZE: usize = 3;

    /// Paddle speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 500.0;
    /// Ball speed factor (pixels/s at speed 1.0)
    pub const BALL_SPEED: f32 = 400.0;
    /// Gem fall speed (pixels/s)
    pub const GEM_SPEED: f32 = 300.0;

    /// Gem spawn interval bounds (seconds)
    pub const GEM_INTERVAL_MIN: f32 = 2.0;
    pub const GEM_INTERVAL_MAX: f32 = 5.0;

    /// Spawn positions
    pub const BALL_SPAWN: (f32, f32) = (300.0, 700.0);
    pub const PADDLE_SPAWN: (f32, f32) = (250.0, 850.0);

    pub const STARTING_LIVES: u8 = 3;
    pub const BLOCK_SCORE: u64 = 2;
    pub const GEM_SCORE: u64 = 5;
}

/// Sprite asset paths handed to the render surface
pub mod assets {
    pub const BLOCK: &str = "Resources/Textures/puzzlepack/png/element_purple_rectangle.png";
    pub const BALL: &str = "Resources/Textures/puzzlepack/png/ballGrey.png";
    pub const PADDLE: &str = "Resources/Textures/puzzlepack/png/paddleBlue.png";
    pub const GEM: &str = "Resources/Textures/puzzlepack/png/element_green_diamond.png";
}
