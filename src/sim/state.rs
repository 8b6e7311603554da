//! Match state and core simulation types

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::Playfield;

/// Distance of the player paddle from the left wall
pub const PLAYER_PADDLE_X: i32 = 20;
/// Distance of the opponent paddle's right edge from the right wall
pub const OPPONENT_PADDLE_MARGIN: i32 = 20;

/// One side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Keyboard-controlled, left
    Player,
    /// Scripted, right
    Opponent,
}

impl Side {
    /// Label used on the game-over screen and in the leaderboard
    pub fn label(&self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Opponent => "OPPONENT",
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Ball in play
    Playing,
    /// Someone reached the win score
    Finished { winner: Side },
}

/// Something the simulation wants the outside world to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball reflected off the top or bottom wall
    WallBounce,
    /// Ball reflected off a paddle
    PaddleHit,
    /// Ball left the field; the given side gets the point
    Scored(Side),
    /// The given side reached the win score
    MatchWon(Side),
}

/// A paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    /// Paddle at horizontal position `x`, vertically centered
    pub fn new(x: i32, field: &Playfield) -> Self {
        Self {
            rect: Rect::new(
                x,
                field.height / 2 - field.paddle_height / 2,
                field.paddle_width,
                field.paddle_height,
            ),
        }
    }

    /// Move vertically by `dy`, staying inside the playfield
    pub fn move_by(&mut self, dy: i32, field_height: i32) {
        self.rect.translate(IVec2::new(0, dy));
        self.rect.clamp_vertical(field_height);
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    /// Pixels per tick
    pub vel: IVec2,
}

impl Ball {
    /// Centered ball serving toward the bottom right
    pub fn new(field: &Playfield) -> Self {
        let half = field.ball_size / 2;
        Self {
            rect: Rect::new(
                field.width / 2 - half,
                field.height / 2 - half,
                field.ball_size,
                field.ball_size,
            ),
            vel: IVec2::splat(field.ball_speed),
        }
    }

    /// Move one tick, reflecting off the top and bottom walls
    ///
    /// Returns true if the ball bounced.
    pub fn advance(&mut self, field_height: i32) -> bool {
        self.rect.translate(self.vel);
        if self.rect.top() <= 0 || self.rect.bottom() >= field_height {
            self.vel.y = -self.vel.y;
            return true;
        }
        false
    }
}

/// Points per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
}

impl Score {
    pub fn add_point(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Opponent => self.opponent += 1,
        }
    }

    /// Side that has reached `win_score`, if any (player checked first)
    pub fn winner(&self, win_score: u32) -> Option<Side> {
        if self.player >= win_score {
            Some(Side::Player)
        } else if self.opponent >= win_score {
            Some(Side::Opponent)
        } else {
            None
        }
    }
}

/// Complete state of one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub field: Playfield,
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    pub score: Score,
    pub phase: MatchPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh match: centered paddles and ball, scores zeroed
    pub fn new(field: Playfield) -> Self {
        let opponent_x = field.width - OPPONENT_PADDLE_MARGIN - field.paddle_width;
        Self {
            field,
            player: Paddle::new(PLAYER_PADDLE_X, &field),
            opponent: Paddle::new(opponent_x, &field),
            ball: Ball::new(&field),
            score: Score::default(),
            phase: MatchPhase::Playing,
            time_ticks: 0,
        }
    }

    /// Replace the ball with a freshly served one
    pub fn reset_ball(&mut self) {
        self.ball = Ball::new(&self.field);
    }
}
