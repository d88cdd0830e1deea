//! Lane Blitz - headless runner
//!
//! Plays a full run with the autopilot on a simulated 60 fps clock.
//!
//! Usage: `lane-blitz [settings.json] [catalog.json]`

use std::process::ExitCode;

use lane_blitz::audio::LogSink;
use lane_blitz::platform::{AutoplayInput, GameLoop, HeadlessFrontend};
use lane_blitz::sim::GameSession;
use lane_blitz::{GameSettings, LevelCatalog};

/// Simulated frame interval (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after this many simulated frames (~15 minutes)
const MAX_FRAMES: u64 = 60 * 60 * 15;

fn load() -> lane_blitz::error::Result<GameSession> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => GameSettings::load(&path)?,
        None => GameSettings::default(),
    };
    let catalog = match args.next() {
        Some(path) => LevelCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => LevelCatalog::builtin(),
    };
    GameSession::new(settings, catalog)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Lane Blitz (headless) starting...");

    let session = match load() {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut game = GameLoop::new(session, LogSink);
    let mut input = AutoplayInput;
    let mut frontend = HeadlessFrontend::default();
    let mut hud = HeadlessFrontend::default();

    let mut now = 0.0;
    while game.frames() < MAX_FRAMES {
        game.frame(now, &mut input, &mut frontend, &mut hud);
        now += FRAME_MS;
        if game.session.run.phase.is_terminal() {
            break;
        }
    }

    let summary = game.session.hud();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
    log::info!(
        "Finished after {} frames: {}",
        game.frames(),
        summary.phase.as_str()
    );
    ExitCode::SUCCESS
}
