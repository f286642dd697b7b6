//! Game session
//!
//! Owns the simulation state plus everything tied to the engine: sprite
//! handles, input subscriptions and the exit flag. The engine's frame loop
//! calls `init` once, then `update` and `render` every frame.

use glam::Vec2;
use thiserror::Error;

use crate::assets;
use crate::consts::*;
use crate::input::{EventKind, InputEvent, KeyAction, KeyCode};
use crate::platform::{InputSource, RenderError, RenderSurface, SpriteHandle, SubscriptionId};
use crate::settings::Settings;
use crate::sim::{EntitySizes, GameEvent, GameState, Outcome, tick};

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{failed} sprite(s) failed to load")]
    Assets { failed: usize },
}

/// Sprite handle per entity; `None` when the texture failed to load
#[derive(Debug, Clone, Default)]
struct Sprites {
    blocks: Vec<Option<SpriteHandle>>,
    ball: Option<SpriteHandle>,
    paddle: Option<SpriteHandle>,
    gems: [Option<SpriteHandle>; GEM_POOL_SIZE],
}

/// Creates sprites and counts failures
struct SpriteLoader<'a, R: RenderSurface> {
    surface: &'a mut R,
    failed: usize,
}

impl<R: RenderSurface> SpriteLoader<'_, R> {
    fn load(&mut self, path: &str) -> Option<SpriteHandle> {
        match self.surface.create_sprite(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{}", e);
                self.failed += 1;
                None
            }
        }
    }

    /// Size of a loaded sprite, or `fallback` when it failed to load
    fn size_of(&self, sprite: Option<SpriteHandle>, fallback: Vec2) -> Vec2 {
        sprite.map_or(fallback, |s| self.surface.sprite_size(s))
    }
}

/// One run of the game
pub struct GameSession {
    settings: Settings,
    state: GameState,
    sprites: Sprites,
    subscriptions: Vec<SubscriptionId>,
    exit_requested: bool,
    assets_loaded: bool,
    /// Duration of the last non-empty frame, for the FPS counter
    frame_time: f32,
}

impl GameSession {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed();
        Self {
            settings,
            state: GameState::new(seed),
            sprites: Sprites::default(),
            subscriptions: Vec::new(),
            exit_requested: false,
            assets_loaded: true,
            frame_time: 0.0,
        }
    }

    /// Open the window, subscribe to input and load every sprite
    ///
    /// Only a backend failure aborts startup unless `strict_assets` is set,
    /// in which case any missing texture does too.
    pub fn init<R, I>(&mut self, surface: &mut R, input: &mut I) -> Result<(), InitError>
    where
        R: RenderSurface,
        I: InputSource,
    {
        surface.open(GAME_WIDTH as u32, GAME_HEIGHT as u32)?;
        surface.set_window_title(&self.settings.title);
        surface.set_clear_colour(self.settings.clear_colour);

        self.subscriptions.push(input.subscribe(EventKind::Key));
        self.subscriptions.push(input.subscribe(EventKind::MouseClick));

        let mut loader = SpriteLoader { surface, failed: 0 };
        let sprites = Sprites {
            blocks: (0..BLOCK_COUNT).map(|_| loader.load(assets::BLOCK)).collect(),
            ball: loader.load(assets::BALL),
            paddle: loader.load(assets::PADDLE),
            gems: std::array::from_fn(|_| loader.load(assets::GEM)),
        };

        let defaults = EntitySizes::default();
        let first_block = sprites.blocks.iter().flatten().next().copied();
        let first_gem = sprites.gems.iter().flatten().next().copied();
        let sizes = EntitySizes {
            block: loader.size_of(first_block, defaults.block),
            ball: loader.size_of(sprites.ball, defaults.ball),
            paddle: loader.size_of(sprites.paddle, defaults.paddle),
            gem: loader.size_of(first_gem, defaults.gem),
        };
        let failed = loader.failed;

        self.sprites = sprites;
        self.state = GameState::with_sizes(self.state.seed, sizes);
        self.assets_loaded = failed == 0;

        if failed > 0 {
            log::warn!("{} sprite(s) failed to load", failed);
            if self.settings.strict_assets {
                return Err(InitError::Assets { failed });
            }
        }

        log::info!("Breakout initialized with seed: {}", self.state.seed);
        Ok(())
    }

    /// Input callback target
    pub fn handle_event(&mut self, event: InputEvent) {
        let state = &mut self.state;
        match event {
            InputEvent::Key {
                key: KeyCode::Escape,
                ..
            } => {
                log::info!("Escape pressed, exiting");
                self.exit_requested = true;
            }
            InputEvent::Key {
                key: KeyCode::Enter,
                action: KeyAction::Pressed,
            } => {
                if state.in_menu {
                    log::info!("Leaving menu");
                    state.in_menu = false;
                }
            }
            InputEvent::Key {
                key: KeyCode::A,
                action: KeyAction::Pressed,
            } => state.paddle_move = -1,
            InputEvent::Key {
                key: KeyCode::D,
                action: KeyAction::Pressed,
            } => state.paddle_move = 1,
            // A release only stops the paddle if it was moving that way
            InputEvent::Key {
                key: KeyCode::A,
                action: KeyAction::Released,
            } if state.paddle_move == -1 => state.paddle_move = 0,
            InputEvent::Key {
                key: KeyCode::D,
                action: KeyAction::Released,
            } if state.paddle_move == 1 => state.paddle_move = 0,
            InputEvent::Click { x, y, button } => {
                log::trace!("Click {:?} at ({}, {})", button, x, y);
            }
            _ => {}
        }
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.frame_time = dt;
        }

        for event in tick(&mut self.state, dt) {
            match event {
                GameEvent::LifeLost { remaining } => {
                    log::info!("Ball lost, {} lives left", remaining)
                }
                GameEvent::Won => log::info!("All blocks cleared! Score: {}", self.state.score),
                GameEvent::Lost => log::info!("Game over. Score: {}", self.state.score),
                other => log::debug!("{:?}", other),
            }
        }
    }

    /// Draw the current frame; never mutates the session
    pub fn render<R: RenderSurface>(&self, surface: &mut R) {
        let state = &self.state;

        if state.in_menu {
            surface.draw_text("breakout", 200.0, 200.0);
            surface.draw_text("press enter to start", 200.0, 250.0);
            return;
        }

        for (block, sprite) in state.blocks.iter().zip(&self.sprites.blocks) {
            if let (true, Some(sprite)) = (block.visible, sprite) {
                surface.draw_sprite(*sprite, block.pos);
            }
        }
        for (gem, sprite) in state.gems.slots.iter().zip(&self.sprites.gems) {
            if let (true, Some(sprite)) = (gem.visible, sprite) {
                surface.draw_sprite(*sprite, gem.pos);
            }
        }
        if let Some(sprite) = self.sprites.ball {
            surface.draw_sprite(sprite, state.ball.pos);
        }
        if let Some(sprite) = self.sprites.paddle {
            surface.draw_sprite(sprite, state.paddle.pos);
        }

        surface.draw_text(&state.lives.to_string(), 40.0, 20.0);
        surface.draw_text(&format!("score: {}", state.score), 520.0, 20.0);

        match state.outcome {
            Outcome::Won => surface.draw_text("you win!!!!", 300.0, 500.0),
            Outcome::Lost => surface.draw_text("you lose!!!!", 300.0, 500.0),
            Outcome::InProgress => {}
        }

        if self.settings.show_fps && self.frame_time > 0.0 {
            let fps = format!("{:.0} fps", 1.0 / self.frame_time);
            surface.draw_text(&fps, 560.0, 900.0);
        }
    }

    /// Drop the input subscriptions made by `init`
    pub fn shutdown<I: InputSource>(&mut self, input: &mut I) {
        for id in self.subscriptions.drain(..) {
            input.unsubscribe(id);
        }
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    /// False if any sprite failed to load during `init`
    pub fn assets_loaded(&self) -> bool {
        self.assets_loaded
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessSurface, ScriptedInput, run_frames};

    fn settings() -> Settings {
        Settings {
            rng_seed: Some(12345),
            ..Settings::default()
        }
    }

    fn started() -> (GameSession, HeadlessSurface, ScriptedInput) {
        let mut surface = HeadlessSurface::new();
        let mut input = ScriptedInput::new();
        let mut session = GameSession::new(settings());
        session.init(&mut surface, &mut input).unwrap();
        (session, surface, input)
    }

    #[test]
    fn test_init_opens_window_and_loads_sprites() {
        let (session, surface, input) = started();
        assert_eq!(surface.opened(), Some((640, 920)));
        assert_eq!(surface.title(), "Breakout!");
        assert_eq!(surface.sprite_count(), BLOCK_COUNT + 2 + GEM_POOL_SIZE);
        assert_eq!(input.subscription_count(), 2);
        assert!(session.assets_loaded());
        assert_eq!(session.state().ball.size, Vec2::new(22.0, 22.0));
        assert!(session.state().in_menu);
    }

    #[test]
    fn test_init_backend_failure_aborts() {
        let mut surface = HeadlessSurface::new();
        surface.with_failing_open();
        let mut input = ScriptedInput::new();
        let mut session = GameSession::new(settings());
        let err = session.init(&mut surface, &mut input).unwrap_err();
        assert!(matches!(err, InitError::Render(RenderError::Backend(_))));
        assert_eq!(input.subscription_count(), 0);
    }

    #[test]
    fn test_missing_asset_keeps_going() {
        let mut surface = HeadlessSurface::new();
        surface.with_missing(assets::PADDLE);
        let mut input = ScriptedInput::new();
        let mut session = GameSession::new(settings());
        session.init(&mut surface, &mut input).unwrap();
        assert!(!session.assets_loaded());
        // Falls back to the stock paddle size
        assert_eq!(session.state().paddle.size, EntitySizes::default().paddle);

        session.handle_event(InputEvent::press(KeyCode::Enter));
        session.render(&mut surface);
        assert_eq!(surface.drawn(assets::PADDLE), 0);
        assert_eq!(surface.drawn(assets::BALL), 1);
    }

    #[test]
    fn test_missing_asset_strict() {
        let mut surface = HeadlessSurface::new();
        surface.with_missing(assets::GEM);
        let mut input = ScriptedInput::new();
        let mut session = GameSession::new(Settings {
            strict_assets: true,
            ..settings()
        });
        let err = session.init(&mut surface, &mut input).unwrap_err();
        assert!(matches!(err, InitError::Assets { failed: 3 }));
    }

    #[test]
    fn test_enter_leaves_menu() {
        let (mut session, _, _) = started();
        session.handle_event(InputEvent::release(KeyCode::Enter));
        assert!(session.state().in_menu);
        session.handle_event(InputEvent::press(KeyCode::Enter));
        assert!(!session.state().in_menu);
    }

    #[test]
    fn test_escape_requests_exit() {
        let (mut session, _, _) = started();
        session.handle_event(InputEvent::release(KeyCode::Escape));
        assert!(session.should_exit());
    }

    #[test]
    fn test_press_a_moves_paddle_left() {
        let (mut session, _, _) = started();
        session.handle_event(InputEvent::press(KeyCode::Enter));
        session.handle_event(InputEvent::press(KeyCode::A));
        let start = session.state().paddle.pos.x;
        session.update(0.1);
        let moved = start - session.state().paddle.pos.x;
        assert!((moved - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_release_only_stops_matching_direction() {
        let (mut session, _, _) = started();
        session.handle_event(InputEvent::press(KeyCode::A));
        session.handle_event(InputEvent::press(KeyCode::D));
        assert_eq!(session.state().paddle_move, 1);

        // Releasing A while D is held keeps moving right
        session.handle_event(InputEvent::release(KeyCode::A));
        assert_eq!(session.state().paddle_move, 1);

        session.handle_event(InputEvent::release(KeyCode::D));
        assert_eq!(session.state().paddle_move, 0);
    }

    #[test]
    fn test_click_has_no_effect() {
        let (mut session, _, _) = started();
        let before = session.state().clone();
        session.handle_event(InputEvent::Click {
            x: 10.0,
            y: 20.0,
            button: crate::input::MouseButton::Left,
        });
        assert_eq!(session.state().paddle_move, before.paddle_move);
        assert_eq!(session.state().in_menu, before.in_menu);
        assert!(!session.should_exit());
    }

    #[test]
    fn test_render_menu() {
        let (session, mut surface, _) = started();
        session.render(&mut surface);
        assert!(surface.has_text("breakout"));
        assert_eq!(surface.drawn(assets::BLOCK), 0);
    }

    #[test]
    fn test_render_playing() {
        let (mut session, mut surface, _) = started();
        session.handle_event(InputEvent::press(KeyCode::Enter));
        session.state_mut().blocks[3].visible = false;
        session.state_mut().gems.slots[0].visible = true;
        session.update(1.0 / 60.0);

        surface.begin_frame();
        session.render(&mut surface);
        assert_eq!(surface.drawn(assets::BLOCK), BLOCK_COUNT - 1);
        assert_eq!(surface.drawn(assets::GEM), 1);
        assert_eq!(surface.drawn(assets::BALL), 1);
        assert_eq!(surface.drawn(assets::PADDLE), 1);
        assert!(surface.has_text("3"));
        assert!(surface.has_text("score: 0"));
        assert!(surface.has_text("60 fps"));
        assert!(!surface.has_text("you win!!!!"));
    }

    #[test]
    fn test_render_banners() {
        let (mut session, mut surface, _) = started();
        session.handle_event(InputEvent::press(KeyCode::Enter));
        session.state_mut().outcome = Outcome::Lost;
        session.render(&mut surface);
        assert!(surface.has_text("you lose!!!!"));

        surface.begin_frame();
        session.state_mut().outcome = Outcome::Won;
        session.render(&mut surface);
        assert!(surface.has_text("you win!!!!"));
    }

    #[test]
    fn test_shutdown_unsubscribes() {
        let (mut session, _, mut input) = started();
        session.shutdown(&mut input);
        assert_eq!(input.subscription_count(), 0);
    }

    #[test]
    fn test_frame_loop_until_escape() {
        let mut surface = HeadlessSurface::new();
        let mut input = ScriptedInput::new()
            .at(0, InputEvent::press(KeyCode::Enter))
            .at(2, InputEvent::press(KeyCode::D))
            .at(10, InputEvent::press(KeyCode::Escape));
        let mut session = GameSession::new(settings());
        session.init(&mut surface, &mut input).unwrap();

        let start = session.state().paddle.pos.x;
        let frames = run_frames(&mut session, &mut surface, &mut input, 0.01, 1000);
        assert_eq!(frames, 10);
        assert!(session.should_exit());
        // D held for frames 2..10
        let moved = session.state().paddle.pos.x - start;
        assert!((moved - PADDLE_SPEED * 0.01 * 8.0).abs() < 1e-2);
    }
}
