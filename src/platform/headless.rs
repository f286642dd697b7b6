//! Headless engine backend
//!
//! Records draw calls instead of rasterising them and replays a fixed input
//! script. Used by the native binary and by tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;

use super::{Colour, InputSource, RenderError, RenderSurface, SpriteHandle, SubscriptionId};
use crate::assets;
use crate::input::{EventKind, InputEvent};
use crate::sim::EntitySizes;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite { path: String, pos: Vec2 },
    Text { text: String, x: f32, y: f32 },
}

/// Render surface that keeps the current frame's draw calls in memory
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    sizes: HashMap<String, Vec2>,
    missing: HashSet<String>,
    fail_open: bool,
    opened: Option<(u32, u32)>,
    title: String,
    clear_colour: Colour,
    /// Path of each created sprite, indexed by handle
    sprites: Vec<String>,
    commands: Vec<DrawCommand>,
}

impl HeadlessSurface {
    /// Surface that knows the game's textures at their real sizes
    pub fn new() -> Self {
        let defaults = EntitySizes::default();
        let mut surface = Self::default();
        surface
            .with_size(assets::BLOCK, defaults.block)
            .with_size(assets::BALL, defaults.ball)
            .with_size(assets::PADDLE, defaults.paddle)
            .with_size(assets::GEM, defaults.gem);
        surface
    }

    pub fn with_size(&mut self, path: &str, size: Vec2) -> &mut Self {
        self.sizes.insert(path.to_string(), size);
        self
    }

    /// Make `create_sprite` fail for this path
    pub fn with_missing(&mut self, path: &str) -> &mut Self {
        self.missing.insert(path.to_string());
        self
    }

    /// Make `open` fail
    pub fn with_failing_open(&mut self) -> &mut Self {
        self.fail_open = true;
        self
    }

    pub fn opened(&self) -> Option<(u32, u32)> {
        self.opened
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn clear_colour(&self) -> Colour {
        self.clear_colour
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Draw calls since the last `begin_frame`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of sprites drawn this frame using the given texture
    pub fn drawn(&self, path: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { path: p, .. } if p == path))
            .count()
    }

    /// True if `text` was drawn this frame
    pub fn has_text(&self, text: &str) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text: t, .. } if t == text))
    }
}

impl RenderSurface for HeadlessSurface {
    fn open(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if self.fail_open {
            return Err(RenderError::Backend("headless surface told to fail".into()));
        }
        self.opened = Some((width, height));
        Ok(())
    }

    fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_clear_colour(&mut self, colour: Colour) {
        self.clear_colour = colour;
    }

    fn create_sprite(&mut self, path: &str) -> Result<SpriteHandle, RenderError> {
        if self.missing.contains(path) {
            return Err(RenderError::AssetNotFound(path.to_string()));
        }
        let handle = SpriteHandle(self.sprites.len() as u32);
        self.sprites.push(path.to_string());
        Ok(handle)
    }

    fn sprite_size(&self, sprite: SpriteHandle) -> Vec2 {
        self.sprites
            .get(sprite.0 as usize)
            .and_then(|path| self.sizes.get(path))
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, pos: Vec2) {
        let path = self
            .sprites
            .get(sprite.0 as usize)
            .cloned()
            .unwrap_or_default();
        self.commands.push(DrawCommand::Sprite { path, pos });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// Input source that replays events at fixed frame numbers
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: BTreeMap<u64, Vec<InputEvent>>,
    frame: u64,
    subscriptions: HashMap<SubscriptionId, EventKind>,
    next_id: u32,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for delivery on the `frame`th poll (0-based)
    pub fn at(mut self, frame: u64, event: InputEvent) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl InputSource for ScriptedInput {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }

    fn poll(&mut self) -> Vec<InputEvent> {
        let events = self.script.remove(&self.frame).unwrap_or_default();
        self.frame += 1;
        events
            .into_iter()
            .filter(|e| self.subscriptions.values().any(|k| *k == e.kind()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_sprite_sizes_by_path() {
        let mut surface = HeadlessSurface::new();
        let ball = surface.create_sprite(assets::BALL).unwrap();
        assert_eq!(surface.sprite_size(ball), Vec2::new(22.0, 22.0));

        let unknown = surface.create_sprite("nope.png").unwrap();
        assert_eq!(surface.sprite_size(unknown), Vec2::ZERO);
    }

    #[test]
    fn test_missing_asset_fails() {
        let mut surface = HeadlessSurface::new();
        surface.with_missing(assets::GEM);
        assert!(matches!(
            surface.create_sprite(assets::GEM),
            Err(RenderError::AssetNotFound(_))
        ));
        assert_eq!(surface.sprite_count(), 0);
    }

    #[test]
    fn test_begin_frame_clears_commands() {
        let mut surface = HeadlessSurface::new();
        surface.draw_text("hi", 0.0, 0.0);
        assert!(surface.has_text("hi"));
        surface.begin_frame();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_script_respects_subscriptions() {
        let mut input = ScriptedInput::new()
            .at(0, InputEvent::press(KeyCode::Enter))
            .at(1, InputEvent::press(KeyCode::A));

        // Nothing subscribed yet: frame 0 is dropped
        assert!(input.poll().is_empty());

        let id = input.subscribe(EventKind::Key);
        assert_eq!(input.poll(), vec![InputEvent::press(KeyCode::A)]);
        assert!(input.poll().is_empty());

        input.unsubscribe(id);
        assert_eq!(input.subscription_count(), 0);
    }
}
