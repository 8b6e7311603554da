//! Game loop tests against recording collaborators

use std::collections::VecDeque;
use std::io;

use glam::IVec2;
use ultra_pong::audio::{AudioSink, SoundEffect};
use ultra_pong::game::{
    Frame, GameOverChoice, InputSnapshot, InputSource, Overlay, Renderer,
};
use ultra_pong::leaderboard::{Leaderboard, MatchRecord};
use ultra_pong::sim::{Score, Side};
use ultra_pong::{EngineContext, Flow, Game, GameError, Screen, Settings};

#[derive(Default)]
struct ScriptedInput {
    script: VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    fn push(&mut self, snapshot: InputSnapshot) {
        self.script.push_back(snapshot);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<InputSnapshot, GameError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Field(Score),
    Menu,
    Leaderboard(Vec<String>),
    GameOver(Side, GameOverChoice),
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Shown>,
    fail: bool,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), GameError> {
        if self.fail {
            return Err(GameError::Terminal("display lost".to_string()));
        }
        self.frames.push(match frame.overlay {
            None => Shown::Field(frame.score),
            Some(Overlay::Menu) => Shown::Menu,
            Some(Overlay::Leaderboard(entries)) => Shown::Leaderboard(entries.to_vec()),
            Some(Overlay::GameOver { winner, choice }) => Shown::GameOver(winner, choice),
        });
        Ok(())
    }
}

#[derive(Default)]
struct MemoryLeaderboard {
    records: Vec<MatchRecord>,
    broken: bool,
}

impl Leaderboard for MemoryLeaderboard {
    fn append(&mut self, record: &MatchRecord) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> io::Result<Vec<String>> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        let skip = self.records.len().saturating_sub(limit);
        Ok(self.records.iter().skip(skip).map(MatchRecord::to_line).collect())
    }
}

fn context() -> EngineContext {
    EngineContext::new(Settings::default()).unwrap()
}

fn confirm() -> InputSnapshot {
    InputSnapshot {
        confirm: true,
        ..Default::default()
    }
}

#[test]
fn test_menu_starts_match() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut audio = RecordingAudio::default();
    let mut renderer = RecordingRenderer::default();
    let mut board = MemoryLeaderboard::default();

    input.push(InputSnapshot::default());
    input.push(confirm());

    let mut game = Game::new(&ctx, &mut input, &mut audio, &mut renderer, &mut board);
    assert_eq!(game.screen(), &Screen::Menu);
    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert_eq!(game.screen(), &Screen::Playing);
    drop(game);

    assert_eq!(renderer.frames, vec![Shown::Menu, Shown::Field(Score::default())]);
}

#[test]
fn test_menu_escape_quits() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    input.push(InputSnapshot {
        back: true,
        ..Default::default()
    });
    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        RecordingRenderer::default(),
        MemoryLeaderboard::default(),
    );
    assert_eq!(game.step().unwrap(), Flow::Quit);
}

#[test]
fn test_leaderboard_screen_round_trip() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut renderer = RecordingRenderer::default();

    input.push(InputSnapshot {
        leaderboard: true,
        ..Default::default()
    });
    input.push(InputSnapshot {
        back: true,
        ..Default::default()
    });

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        &mut renderer,
        MemoryLeaderboard::default(),
    );
    game.step().unwrap();
    assert!(matches!(game.screen(), Screen::Leaderboard { entries } if entries.is_empty()));
    game.step().unwrap();
    assert_eq!(game.screen(), &Screen::Menu);
    drop(game);

    assert_eq!(renderer.frames, vec![Shown::Leaderboard(Vec::new()), Shown::Menu]);
}

#[test]
fn test_win_records_once_and_plays_game_over() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut audio = RecordingAudio::default();
    let mut renderer = RecordingRenderer::default();
    let mut board = MemoryLeaderboard::default();

    let mut game = Game::new(&ctx, &mut input, &mut audio, &mut renderer, &mut board);
    game.start_match();
    game.state_mut().score = Score { player: 4, opponent: 3 };
    game.state_mut().ball.rect.pos = IVec2::new(795, 100);

    game.step().unwrap();
    assert_eq!(
        game.screen(),
        &Screen::GameOver {
            winner: Side::Player,
            choice: GameOverChoice::Restart
        }
    );

    // Idle on the game-over screen: nothing else gets recorded
    for _ in 0..10 {
        assert_eq!(game.step().unwrap(), Flow::Continue);
    }
    drop(game);

    assert_eq!(board.records.len(), 1);
    let record = &board.records[0];
    assert_eq!(record.winner, Side::Player);
    assert_eq!(record.player_score, 5);
    assert_eq!(record.opponent_score, 3);

    assert_eq!(audio.played, vec![SoundEffect::Score, SoundEffect::GameOver]);
    assert_eq!(
        renderer.frames[0],
        Shown::GameOver(Side::Player, GameOverChoice::Restart)
    );
}

#[test]
fn test_unreadable_leaderboard_shows_empty_list() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut renderer = RecordingRenderer::default();
    input.push(InputSnapshot {
        leaderboard: true,
        ..Default::default()
    });
    let board = MemoryLeaderboard {
        records: vec![MatchRecord {
            timestamp: chrono::NaiveDate::from_ymd_opt(2025, 9, 20)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
            winner: Side::Player,
            player_score: 5,
            opponent_score: 1,
        }],
        broken: true,
    };

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        &mut renderer,
        board,
    );
    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert_eq!(
        game.screen(),
        &Screen::Leaderboard {
            entries: Vec::new()
        }
    );
    drop(game);

    assert_eq!(renderer.frames, vec![Shown::Leaderboard(Vec::new())]);
}

#[test]
fn test_game_over_escape_quits() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    input.push(InputSnapshot::default());
    input.push(InputSnapshot {
        back: true,
        ..Default::default()
    });

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        RecordingRenderer::default(),
        MemoryLeaderboard::default(),
    );
    game.start_match();
    game.state_mut().score = Score { player: 4, opponent: 2 };
    game.state_mut().ball.rect.pos = IVec2::new(795, 100);

    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert!(matches!(game.screen(), Screen::GameOver { .. }));
    assert_eq!(game.step().unwrap(), Flow::Quit);
}

#[test]
fn test_restart_after_game_over() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut board = MemoryLeaderboard::default();

    input.push(InputSnapshot::default());
    input.push(confirm());

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        RecordingRenderer::default(),
        &mut board,
    );
    game.start_match();
    game.state_mut().score = Score { player: 3, opponent: 4 };
    game.state_mut().ball.rect.pos = IVec2::new(3, 450);
    game.state_mut().ball.vel = IVec2::new(-5, 5);

    game.step().unwrap();
    assert!(matches!(
        game.screen(),
        Screen::GameOver {
            winner: Side::Opponent,
            ..
        }
    ));

    game.step().unwrap();
    assert_eq!(game.screen(), &Screen::Playing);
    assert_eq!(game.state().score, Score::default());
    assert_eq!(game.state().ball.rect.pos, IVec2::new(395, 295));
    assert_eq!(game.state().time_ticks, 0);
    drop(game);

    assert_eq!(board.records.len(), 1);
    assert_eq!(board.records[0].winner, Side::Opponent);
}

#[test]
fn test_game_over_quit_choice() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    input.push(InputSnapshot::default());
    input.push(InputSnapshot {
        right: true,
        ..Default::default()
    });
    input.push(confirm());

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        RecordingRenderer::default(),
        MemoryLeaderboard::default(),
    );
    game.start_match();
    game.state_mut().score = Score { player: 4, opponent: 0 };
    game.state_mut().ball.rect.pos = IVec2::new(795, 100);

    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert_eq!(
        game.screen(),
        &Screen::GameOver {
            winner: Side::Player,
            choice: GameOverChoice::Quit
        }
    );
    assert_eq!(game.step().unwrap(), Flow::Quit);
}

#[test]
fn test_hit_and_bounce_both_play() {
    let ctx = context();
    let mut audio = RecordingAudio::default();
    let mut game = Game::new(
        &ctx,
        ScriptedInput::default(),
        &mut audio,
        RecordingRenderer::default(),
        MemoryLeaderboard::default(),
    );
    game.start_match();
    game.state_mut().player.rect.pos.y = 0;
    game.state_mut().ball.rect.pos = IVec2::new(25, 2);
    game.state_mut().ball.vel = IVec2::new(-5, -5);

    game.step().unwrap();
    drop(game);

    assert_eq!(audio.played, vec![SoundEffect::Bounce, SoundEffect::Hit]);
}

#[test]
fn test_quit_mid_match_skips_tick() {
    let ctx = context();
    let mut input = ScriptedInput::default();
    let mut renderer = RecordingRenderer::default();
    input.push(InputSnapshot {
        quit: true,
        down: true,
        ..Default::default()
    });

    let mut game = Game::new(
        &ctx,
        &mut input,
        RecordingAudio::default(),
        &mut renderer,
        MemoryLeaderboard::default(),
    );
    game.start_match();
    let before = game.state().clone();

    assert_eq!(game.step().unwrap(), Flow::Quit);
    assert_eq!(game.state(), &before);
    drop(game);

    assert!(renderer.frames.is_empty());
}

#[test]
fn test_broken_leaderboard_is_not_fatal() {
    let ctx = context();
    let mut audio = RecordingAudio::default();
    let board = MemoryLeaderboard {
        broken: true,
        ..Default::default()
    };

    let mut game = Game::new(
        &ctx,
        ScriptedInput::default(),
        &mut audio,
        RecordingRenderer::default(),
        board,
    );
    game.start_match();
    game.state_mut().score = Score { player: 4, opponent: 4 };
    game.state_mut().ball.rect.pos = IVec2::new(795, 100);

    assert_eq!(game.step().unwrap(), Flow::Continue);
    assert!(matches!(game.screen(), Screen::GameOver { .. }));
    drop(game);

    assert_eq!(audio.played.last(), Some(&SoundEffect::GameOver));
}

#[test]
fn test_render_failure_propagates() {
    let ctx = context();
    let renderer = RecordingRenderer {
        fail: true,
        ..Default::default()
    };
    let mut game = Game::new(
        &ctx,
        ScriptedInput::default(),
        RecordingAudio::default(),
        renderer,
        MemoryLeaderboard::default(),
    );
    assert!(matches!(game.step(), Err(GameError::Terminal(_))));
}

#[test]
fn test_invalid_settings_fail_fast() {
    let mut settings = Settings::default();
    settings.audio.sample_rate = 0;
    assert!(EngineContext::new(settings).is_err());
}

#[test]
fn test_match_plays_to_completion() {
    let mut settings = Settings::default();
    settings.playfield.win_score = 2;
    let ctx = EngineContext::new(settings).unwrap();
    let mut board = MemoryLeaderboard::default();

    let mut game = Game::new(
        &ctx,
        ScriptedInput::default(),
        RecordingAudio::default(),
        RecordingRenderer::default(),
        &mut board,
    );
    game.start_match();

    // The idle player paddle never moves, so the opponent eventually wins
    let mut ticks = 0;
    while game.screen() == &Screen::Playing {
        game.step().unwrap();
        ticks += 1;
        assert!(ticks < 100_000, "match never ended");
    }
    drop(game);

    assert_eq!(board.records.len(), 1);
    let record = &board.records[0];
    assert_eq!(record.winner, Side::Opponent);
    assert_eq!((record.player_score, record.opponent_score), (0, 2));
}
