//! Game loop controller
//!
//! Owns the current screen and match, polls input once per tick, steps the
//! simulation, turns simulation events into sound cues and leaderboard
//! entries, and hands a [`Frame`] to the renderer. Input, audio, rendering and
//! persistence are reached only through the traits below, so the loop runs
//! the same against the terminal or against test doubles.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::audio::{AudioSink, SoundBank, SoundEffect};
use crate::error::GameError;
use crate::leaderboard::{Leaderboard, MAX_SHOWN_ENTRIES, MatchRecord};
use crate::settings::{Playfield, Settings};
use crate::sim::{GameEvent, GameState, Rect, Score, Side, TickInput, tick};

/// Keys held or pressed since the last poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Leave the game from any screen
    pub quit: bool,
    /// Player paddle up (held)
    pub up: bool,
    /// Player paddle down (held)
    pub down: bool,
    pub confirm: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Open the leaderboard from the menu
    pub leaderboard: bool,
}

impl InputSnapshot {
    fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
        }
    }
}

/// Non-blocking input snapshot per tick
pub trait InputSource {
    fn poll(&mut self) -> Result<InputSnapshot, GameError>;
}

/// Choice on the game-over screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameOverChoice {
    #[default]
    Restart,
    Quit,
}

impl GameOverChoice {
    fn toggled(self) -> Self {
        match self {
            GameOverChoice::Restart => GameOverChoice::Quit,
            GameOverChoice::Quit => GameOverChoice::Restart,
        }
    }
}

/// Screen drawn on top of (or instead of) the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    Menu,
    Leaderboard(&'a [String]),
    GameOver { winner: Side, choice: GameOverChoice },
}

/// Everything the renderer needs for one tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub field: &'a Playfield,
    pub player: Rect,
    pub opponent: Rect,
    pub ball: Rect,
    pub score: Score,
    pub overlay: Option<Overlay<'a>>,
}

/// Draws frames
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), GameError>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn poll(&mut self) -> Result<InputSnapshot, GameError> {
        (**self).poll()
    }
}

impl<T: AudioSink + ?Sized> AudioSink for &mut T {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect)
    }
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), GameError> {
        (**self).render(frame)
    }
}

impl<T: Leaderboard + ?Sized> Leaderboard for &mut T {
    fn append(&mut self, record: &MatchRecord) -> io::Result<()> {
        (**self).append(record)
    }

    fn recent(&self, limit: usize) -> io::Result<Vec<String>> {
        (**self).recent(limit)
    }
}

/// Startup state shared by the loop and its collaborators
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub settings: Settings,
    pub sounds: SoundBank,
}

impl EngineContext {
    /// Validate settings and synthesize every sound effect
    pub fn new(settings: Settings) -> Result<Self, GameError> {
        settings.validate()?;
        let sounds = SoundBank::generate(settings.audio.sample_rate)?;
        Ok(Self { settings, sounds })
    }
}

/// Current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Leaderboard { entries: Vec<String> },
    Playing,
    GameOver { winner: Side, choice: GameOverChoice },
}

/// Whether the driver should keep ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The game loop with its collaborators
pub struct Game<I, A, R, L> {
    field: Playfield,
    tick_rate: u32,
    state: GameState,
    screen: Screen,
    input: I,
    audio: A,
    renderer: R,
    leaderboard: L,
}

impl<I, A, R, L> Game<I, A, R, L>
where
    I: InputSource,
    A: AudioSink,
    R: Renderer,
    L: Leaderboard,
{
    /// New game sitting on the main menu
    pub fn new(ctx: &EngineContext, input: I, audio: A, renderer: R, leaderboard: L) -> Self {
        let field = ctx.settings.playfield;
        Self {
            field,
            tick_rate: ctx.settings.tick_rate,
            state: GameState::new(field),
            screen: Screen::Menu,
            input,
            audio,
            renderer,
            leaderboard,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Fresh paddles, fresh ball, scores zeroed
    pub fn start_match(&mut self) {
        self.state = GameState::new(self.field);
        self.screen = Screen::Playing;
        log::info!("Match started");
    }

    /// Run at the configured tick rate until a quit is requested
    ///
    /// Each tick sleeps for whatever time is left; slow ticks are not made up.
    pub fn run(&mut self) -> Result<(), GameError> {
        let tick_time = Duration::from_secs_f64(1.0 / f64::from(self.tick_rate));
        loop {
            let started = Instant::now();
            if self.step()? == Flow::Quit {
                log::info!("Quit requested");
                return Ok(());
            }
            if let Some(rest) = tick_time.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    /// One tick: input, screen logic, render
    ///
    /// A quit returns straight away without simulating or rendering.
    pub fn step(&mut self) -> Result<Flow, GameError> {
        let input = self.input.poll()?;
        if input.quit {
            return Ok(Flow::Quit);
        }

        match self.screen {
            Screen::Menu => {
                if input.back {
                    return Ok(Flow::Quit);
                }
                if input.confirm {
                    self.start_match();
                } else if input.leaderboard {
                    self.open_leaderboard();
                }
            }
            Screen::Leaderboard { .. } => {
                if input.confirm || input.back {
                    self.screen = Screen::Menu;
                }
            }
            Screen::Playing => self.play_tick(&input),
            Screen::GameOver { winner, choice } => {
                if input.back {
                    return Ok(Flow::Quit);
                }
                if input.confirm {
                    match choice {
                        GameOverChoice::Restart => self.start_match(),
                        GameOverChoice::Quit => return Ok(Flow::Quit),
                    }
                } else if input.left || input.right {
                    self.screen = Screen::GameOver {
                        winner,
                        choice: choice.toggled(),
                    };
                }
            }
        }

        self.render()?;
        Ok(Flow::Continue)
    }

    fn open_leaderboard(&mut self) {
        let entries = self
            .leaderboard
            .recent(MAX_SHOWN_ENTRIES)
            .unwrap_or_else(|e| {
                log::error!("Error reading leaderboard: {e}");
                Vec::new()
            });
        self.screen = Screen::Leaderboard { entries };
    }

    fn play_tick(&mut self, input: &InputSnapshot) {
        for event in tick(&mut self.state, &input.tick_input()) {
            match event {
                GameEvent::WallBounce => self.audio.play(SoundEffect::Bounce),
                GameEvent::PaddleHit => self.audio.play(SoundEffect::Hit),
                GameEvent::Scored(_) => self.audio.play(SoundEffect::Score),
                GameEvent::MatchWon(winner) => self.finish_match(winner),
            }
        }
    }

    /// Record the result and switch to the game-over screen
    fn finish_match(&mut self, winner: Side) {
        let record = MatchRecord {
            timestamp: Local::now().naive_local(),
            winner,
            player_score: self.state.score.player,
            opponent_score: self.state.score.opponent,
        };
        log::info!("Match over: {}", record.to_line());

        // A broken leaderboard must not end the game
        if let Err(e) = self.leaderboard.append(&record) {
            log::error!("Error saving to leaderboard: {e}");
        }
        self.audio.play(SoundEffect::GameOver);
        self.screen = Screen::GameOver {
            winner,
            choice: GameOverChoice::Restart,
        };
    }

    fn render(&mut self) -> Result<(), GameError> {
        let overlay = match &self.screen {
            Screen::Menu => Some(Overlay::Menu),
            Screen::Leaderboard { entries } => Some(Overlay::Leaderboard(entries)),
            Screen::Playing => None,
            Screen::GameOver { winner, choice } => Some(Overlay::GameOver {
                winner: *winner,
                choice: *choice,
            }),
        };
        let frame = Frame {
            field: &self.field,
            player: self.state.player.rect,
            opponent: self.state.opponent.rect,
            ball: self.state.ball.rect,
            score: self.state.score,
            overlay,
        };
        self.renderer.render(&frame)
    }
}
