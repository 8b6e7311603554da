//! Fixed timestep simulation tick
//!
//! Advances a match by exactly one tick. Deterministic: the same state and
//! input always produce the same next state and events.

use super::collision::{ball_goal_check, ball_paddle_collision};
use super::state::{GameEvent, GameState, MatchPhase};

/// Player intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
}

/// Scripted opponent: chase the ball's vertical center, no prediction
fn opponent_ai(state: &mut GameState) {
    let speed = state.field.paddle_speed;
    let paddle_y = state.opponent.rect.center_y();
    let ball_y = state.ball.rect.center_y();

    if paddle_y < ball_y {
        state.opponent.move_by(speed, state.field.height);
    } else if paddle_y > ball_y {
        state.opponent.move_by(-speed, state.field.height);
    }
}

/// Advance the match by one tick and report what happened, in order
///
/// Does nothing once the match is finished.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != MatchPhase::Playing {
        return events;
    }

    state.time_ticks += 1;
    let field = state.field;

    // Both keys held cancel out
    if input.up {
        state.player.move_by(-field.paddle_speed, field.height);
    }
    if input.down {
        state.player.move_by(field.paddle_speed, field.height);
    }

    opponent_ai(state);

    if state.ball.advance(field.height) {
        events.push(GameEvent::WallBounce);
    }

    if ball_paddle_collision(&mut state.ball, &state.player.rect, &state.opponent.rect) {
        events.push(GameEvent::PaddleHit);
    }

    if let Some(side) = ball_goal_check(&state.ball, field.width) {
        state.score.add_point(side);
        state.reset_ball();
        events.push(GameEvent::Scored(side));
        log::debug!(
            "{} scores ({} - {})",
            side.label(),
            state.score.player,
            state.score.opponent
        );
    }

    if let Some(winner) = state.score.winner(field.win_score) {
        state.phase = MatchPhase::Finished { winner };
        events.push(GameEvent::MatchWon(winner));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Playfield;
    use crate::sim::state::{Score, Side};
    use glam::IVec2;

    fn new_state() -> GameState {
        GameState::new(Playfield::default())
    }

    #[test]
    fn test_first_tick_moves_ball() {
        let mut state = new_state();
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.ball.rect.pos, IVec2::new(400, 300));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player_input() {
        let mut state = new_state();
        tick(&mut state, &TickInput { up: true, down: false });
        assert_eq!(state.player.rect.top(), 245);

        tick(&mut state, &TickInput { up: false, down: true });
        assert_eq!(state.player.rect.top(), 250);

        tick(&mut state, &TickInput { up: true, down: true });
        assert_eq!(state.player.rect.top(), 250);
    }

    #[test]
    fn test_opponent_tracks_ball() {
        let mut state = new_state();
        state.ball.rect.pos.y = 100;
        state.ball.vel = IVec2::new(5, 0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.opponent.rect.top(), 245);

        state.ball.rect.pos.y = 500;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.opponent.rect.top(), 250);

        // Centers equal: stay put
        state.ball.rect.pos.y = 295;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.opponent.rect.top(), 250);
    }

    #[test]
    fn test_ball_reset_on_player_score() {
        let mut state = new_state();
        state.ball.rect.pos = IVec2::new(795, 100);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(events, vec![GameEvent::Scored(Side::Player)]);
        assert_eq!(state.score, Score { player: 1, opponent: 0 });
        assert_eq!(state.ball.rect.pos, IVec2::new(395, 295));
        assert_eq!(state.ball.vel, IVec2::new(5, 5));
    }

    #[test]
    fn test_ball_reset_on_opponent_score() {
        let mut state = new_state();
        state.ball.rect.pos = IVec2::new(3, 450);
        state.ball.vel = IVec2::new(-5, 5);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(events, vec![GameEvent::Scored(Side::Opponent)]);
        assert_eq!(state.score, Score { player: 0, opponent: 1 });
        // Serve direction does not depend on who scored
        assert_eq!(state.ball.vel, IVec2::new(5, 5));
    }

    #[test]
    fn test_hit_and_bounce_same_tick() {
        let mut state = new_state();
        state.player.rect.pos.y = 0;
        state.ball.rect.pos = IVec2::new(25, 2);
        state.ball.vel = IVec2::new(-5, -5);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(events, vec![GameEvent::WallBounce, GameEvent::PaddleHit]);
        assert_eq!(state.ball.vel, IVec2::new(5, 5));
    }

    #[test]
    fn test_win_ends_match() {
        let mut state = new_state();
        state.score = Score { player: 4, opponent: 3 };
        state.ball.rect.pos = IVec2::new(795, 100);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(
            events,
            vec![GameEvent::Scored(Side::Player), GameEvent::MatchWon(Side::Player)]
        );
        assert_eq!(state.phase, MatchPhase::Finished { winner: Side::Player });

        // Finished matches are frozen
        let frozen = state.clone();
        assert!(tick(&mut state, &TickInput { up: true, down: false }).is_empty());
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state();
        let mut state2 = new_state();

        let inputs = [
            TickInput { up: true, down: false },
            TickInput::default(),
            TickInput { up: false, down: true },
            TickInput { up: true, down: true },
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            let e1 = tick(&mut state1, input);
            let e2 = tick(&mut state2, input);
            assert_eq!(e1, e2);
        }
        assert_eq!(state1, state2);
    }
}
