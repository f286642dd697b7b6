//! Breakout entry point
//!
//! Runs the game against the headless engine backend with a scripted player:
//! start from the menu, then sweep the paddle back and forth until the run
//! is decided or the frame cap is hit.

use breakout::input::{InputEvent, KeyCode};
use breakout::platform::{HeadlessSurface, ScriptedInput, run_frames};
use breakout::{GameSession, Settings};

/// Frame rate of the headless loop
const FRAME_DT: f32 = 1.0 / 120.0;
/// Two minutes of play
const MAX_FRAMES: u64 = 120 * 120;
/// Frames between paddle direction changes
const SWEEP_FRAMES: u64 = 60;

fn scripted_player() -> ScriptedInput {
    let mut input = ScriptedInput::new().at(0, InputEvent::press(KeyCode::Enter));
    let mut frame = 1;
    while frame < MAX_FRAMES {
        let (held, other) = if (frame / SWEEP_FRAMES) % 2 == 0 {
            (KeyCode::D, KeyCode::A)
        } else {
            (KeyCode::A, KeyCode::D)
        };
        input = input
            .at(frame, InputEvent::release(other))
            .at(frame, InputEvent::press(held));
        frame += SWEEP_FRAMES;
    }
    input.at(MAX_FRAMES - 1, InputEvent::press(KeyCode::Escape))
}

fn main() {
    env_logger::init();
    log::info!("Breakout (headless) starting...");

    let settings = Settings::load();
    let mut surface = HeadlessSurface::new();
    let mut input = scripted_player();
    let mut session = GameSession::new(settings);

    if let Err(e) = session.init(&mut surface, &mut input) {
        log::error!("Failed to start: {}", e);
        std::process::exit(1);
    }

    let frames = run_frames(&mut session, &mut surface, &mut input, FRAME_DT, MAX_FRAMES);

    let state = session.state();
    log::info!(
        "Ran {} frames: outcome {:?}, lives {}, score {}, blocks left {}",
        frames,
        state.outcome,
        state.lives,
        state.score,
        state.blocks_remaining()
    );
    match serde_json::to_string(state) {
        Ok(json) => log::debug!("Final state: {}", json),
        Err(e) => log::warn!("Could not serialize final state: {}", e),
    }

    session.shutdown(&mut input);
}
