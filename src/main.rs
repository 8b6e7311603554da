//! Ultra Pong entry point
//!
//! Loads settings, synthesizes the sound bank, takes over the terminal and
//! runs the game loop until the player quits.

use std::fs::File;

use ultra_pong::audio::AudioManager;
use ultra_pong::leaderboard::FileLeaderboard;
use ultra_pong::tui::{TerminalGuard, TerminalInput, TerminalRenderer};
use ultra_pong::{EngineContext, Game, GameError, Settings};

fn init_logging(settings: &Settings) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // The terminal belongs to the game screen
    match File::create(&settings.log_path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!(
                "ultra-pong: cannot create log file {} ({e}), logging disabled",
                settings.log_path.display()
            );
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn run() -> Result<(), GameError> {
    let config_path = Settings::default_path();
    let (settings, load_error) = match Settings::load(&config_path) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_logging(&settings);
    log::info!("Ultra Pong starting (settings: {})", config_path.display());
    if let Some(e) = load_error {
        log::warn!("Ignoring settings file, using defaults: {e}");
    }

    // Bad synthesis parameters fail here, before the terminal is touched
    let ctx = EngineContext::new(settings)?;

    let audio = AudioManager::new(ctx.sounds.clone(), ctx.settings.audio.muted);
    let leaderboard = FileLeaderboard::new(&ctx.settings.leaderboard_path);

    let guard = TerminalGuard::enter()?;
    let input = TerminalInput::new(&guard);
    let renderer = TerminalRenderer::new(&guard);

    let mut game = Game::new(&ctx, input, audio, renderer, leaderboard);
    let result = game.run();
    drop(guard);
    result
}

fn main() {
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("ultra-pong: {e}");
        std::process::exit(1);
    }
}
