//! Collision detection and response
//!
//! Pure bounding-box tests: the ball reflects on the axis it hit and is never
//! pushed back out, so it may overlap a paddle for a tick.

use super::rect::Rect;
use super::state::{Ball, Side};

/// Reflect the ball horizontally if it overlaps either paddle
///
/// Returns true on a hit.
pub fn ball_paddle_collision(ball: &mut Ball, player: &Rect, opponent: &Rect) -> bool {
    if ball.rect.overlaps(player) || ball.rect.overlaps(opponent) {
        ball.vel.x = -ball.vel.x;
        return true;
    }
    false
}

/// Side that scores if the ball has reached a goal line
///
/// Touching the left wall scores for the opponent, the right wall for the
/// player.
pub fn ball_goal_check(ball: &Ball, field_width: i32) -> Option<Side> {
    if ball.rect.left() <= 0 {
        Some(Side::Opponent)
    } else if ball.rect.right() >= field_width {
        Some(Side::Player)
    } else {
        None
    }
}
