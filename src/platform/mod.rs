//! Platform abstraction layer
//!
//! The game never talks to a window, GPU or OS input queue directly. The
//! engine hands it a `RenderSurface` and an `InputSource`; `run_frames` is the
//! frame loop that ties them to a `GameSession`.

pub mod headless;

pub use headless::{DrawCommand, HeadlessSurface, ScriptedInput};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{EventKind, InputEvent};
use crate::session::GameSession;

/// Opaque handle to a sprite owned by the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub u32);

/// Opaque handle to an input subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// RGB clear colour (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

impl Default for Colour {
    fn default() -> Self {
        Colour::BLACK
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine could not bring up its window/graphics API
    #[error("render backend failed to start: {0}")]
    Backend(String),
    #[error("asset not found: {0}")]
    AssetNotFound(String),
}

/// Drawing side of the engine
pub trait RenderSurface {
    /// Bring up the window/graphics API at the given playfield size
    fn open(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn set_window_title(&mut self, title: &str);

    fn set_clear_colour(&mut self, colour: Colour);

    /// Load an image and return a handle to a sprite showing it
    fn create_sprite(&mut self, path: &str) -> Result<SpriteHandle, RenderError>;

    /// Width/height of a sprite in playfield pixels
    fn sprite_size(&self, sprite: SpriteHandle) -> Vec2;

    /// Called once per frame before any draw calls
    fn begin_frame(&mut self) {}

    fn draw_sprite(&mut self, sprite: SpriteHandle, pos: Vec2);

    fn draw_text(&mut self, text: &str, x: f32, y: f32);
}

/// Input side of the engine
pub trait InputSource {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Events that arrived since the last poll, for live subscriptions only
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Drive a session: input, update, render, once per frame
///
/// Stops when the session asks to exit or after `max_frames` frames.
/// Returns the number of frames that were updated.
pub fn run_frames<R, I>(
    session: &mut GameSession,
    surface: &mut R,
    input: &mut I,
    dt: f32,
    max_frames: u64,
) -> u64
where
    R: RenderSurface,
    I: InputSource,
{
    let mut frames = 0;
    while frames < max_frames {
        for event in input.poll() {
            session.handle_event(event);
        }
        if session.should_exit() {
            log::info!("Exit requested after {} frames", frames);
            break;
        }

        session.update(dt);
        surface.begin_frame();
        session.render(surface);
        frames += 1;
    }
    frames
}
