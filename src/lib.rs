//! Ultra Pong - terminal Pong with synthesized chip-tune sound
//!
//! Core modules:
//! - `synth`: Square, triangle and LFSR-noise PCM generators
//! - `sim`: Deterministic simulation (paddles, ball, collisions, scoring)
//! - `game`: Fixed-tick loop, screens and the collaborator traits it drives
//! - `audio`: Pre-generated sound bank and fire-and-forget playback
//! - `leaderboard`: Append-only match log
//! - `tui`: Terminal input and presentation
//! - `settings`: JSON settings

pub mod audio;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod settings;
pub mod sim;
pub mod synth;
pub mod tui;

pub use error::{GameError, SynthError};
pub use game::{EngineContext, Flow, Game, Screen};
pub use settings::{Playfield, Settings};

/// Default game configuration
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const WIDTH: i32 = 800;
    pub const HEIGHT: i32 = 600;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 10;
    pub const PADDLE_HEIGHT: i32 = 100;
    /// Pixels per tick
    pub const PADDLE_SPEED: i32 = 5;

    /// Ball defaults
    pub const BALL_SIZE: i32 = 10;
    /// Pixels per tick on each axis
    pub const BALL_SPEED: i32 = 5;

    /// Points needed to win a match
    pub const WIN_SCORE: u32 = 5;

    /// Fixed loop rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Audio sample rate (Hz)
    pub const SAMPLE_RATE: u32 = 44_100;
}
