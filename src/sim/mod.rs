//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, integer positions
//! - No randomness
//! - No rendering, audio or platform dependencies; outcomes are reported as
//!   [`GameEvent`]s for the caller to act on

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{ball_goal_check, ball_paddle_collision};
pub use rect::Rect;
pub use state::{Ball, GameEvent, GameState, MatchPhase, Paddle, Score, Side};
pub use tick::{TickInput, tick};
