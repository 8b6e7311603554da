//! Terminal front end
//!
//! Input and presentation on top of crossterm. The playfield is scaled to
//! whatever size the terminal has; a cell stands for a block of playfield
//! pixels.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color};
use crossterm::{cursor, execute, queue, terminal};

use crate::error::GameError;
use crate::game::{Frame, GameOverChoice, InputSnapshot, InputSource, Overlay, Renderer};
use crate::settings::Playfield;
use crate::sim::Rect;

/// Without release events a key counts as held this long after its last press
/// or auto-repeat
const HOLD_WINDOW: Duration = Duration::from_millis(200);

const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const GRAY: Color = Color::Rgb { r: 100, g: 100, b: 100 };
const LIGHT_BLUE: Color = Color::Rgb { r: 100, g: 150, b: 255 };
const RED: Color = Color::Rgb { r: 255, g: 50, b: 50 };
const GREEN: Color = Color::Rgb { r: 50, g: 255, b: 50 };
const YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };

/// Raw mode and alternate screen for as long as this lives
pub struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self, GameError> {
        terminal::enable_raw_mode()
            .map_err(|e| GameError::Terminal(format!("failed to enable raw mode: {e}")))?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

        // Key release events give exact held-key state where supported
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("Terminal ready (key release events: {enhanced})");
        Ok(Self { enhanced })
    }

    /// Whether the terminal reports key releases
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.enhanced {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Held state of one movement key
#[derive(Debug, Default)]
struct HeldKey {
    down: bool,
    last_seen: Option<Instant>,
}

impl HeldKey {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.last_seen = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
        self.last_seen = None;
    }

    fn is_held(&self, exact: bool, now: Instant) -> bool {
        if exact {
            self.down
        } else {
            self.last_seen
                .is_some_and(|t| now.duration_since(t) < HOLD_WINDOW)
        }
    }
}

/// Keyboard input from the terminal
#[derive(Debug)]
pub struct TerminalInput {
    exact_release: bool,
    up: HeldKey,
    down: HeldKey,
}

impl TerminalInput {
    pub fn new(guard: &TerminalGuard) -> Self {
        Self {
            exact_release: guard.reports_releases(),
            up: HeldKey::default(),
            down: HeldKey::default(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &mut InputSnapshot, now: Instant) {
        let held = match key.code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(&mut self.up),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(&mut self.down),
            _ => None,
        };
        if let Some(held) = held {
            match key.kind {
                KeyEventKind::Release => held.release(),
                KeyEventKind::Press | KeyEventKind::Repeat => held.press(now),
            }
            return;
        }

        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                snapshot.quit = true
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => snapshot.quit = true,
            KeyCode::Enter => snapshot.confirm = true,
            KeyCode::Esc => snapshot.back = true,
            KeyCode::Left => snapshot.left = true,
            KeyCode::Right => snapshot.right = true,
            KeyCode::Char('l') | KeyCode::Char('L') => snapshot.leaderboard = true,
            _ => {}
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<InputSnapshot, GameError> {
        let mut snapshot = InputSnapshot::default();
        let now = Instant::now();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, &mut snapshot, now);
            }
        }
        snapshot.up = self.up.is_held(self.exact_release, now);
        snapshot.down = self.down.is_held(self.exact_release, now);
        Ok(snapshot)
    }
}

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: WHITE };

/// A frame laid out in terminal cells
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    field_w: i32,
    field_h: i32,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, field: &Playfield) -> Self {
        Self {
            cols,
            rows,
            field_w: field.width,
            field_h: field.height,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row as usize * self.cols as usize + col as usize])
        } else {
            None
        }
    }

    /// Text of one row, trailing blanks included
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row))
            .map(|c| c.ch)
            .collect()
    }

    fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if col >= 0 && row >= 0 && col < i32::from(self.cols) && row < i32::from(self.rows) {
            self.cells[row as usize * self.cols as usize + col as usize] = cell;
        }
    }

    fn col(&self, x: i32) -> i32 {
        x.clamp(0, self.field_w - 1) * i32::from(self.cols) / self.field_w
    }

    fn row(&self, y: i32) -> i32 {
        y.clamp(0, self.field_h - 1) * i32::from(self.rows) / self.field_h
    }

    /// Fill every cell the rectangle touches (at least one)
    fn fill_rect(&mut self, rect: &Rect, ch: char, color: Color) {
        let cell = Cell { ch, color };
        for row in self.row(rect.top())..=self.row(rect.bottom() - 1) {
            for col in self.col(rect.left())..=self.col(rect.right() - 1) {
                self.set(col, row, cell);
            }
        }
    }

    fn text_at(&mut self, col: i32, y: i32, text: &str, color: Color) {
        let row = self.row(y);
        for (i, ch) in text.chars().enumerate() {
            self.set(col + i as i32, row, Cell { ch, color });
        }
    }

    /// Text centered on playfield x coordinate `x`, at playfield y `y`
    fn text_centered_on(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let start = self.col(x) - text.chars().count() as i32 / 2;
        self.text_at(start, y, text, color);
    }

    fn text_centered(&mut self, y: i32, text: &str, color: Color) {
        self.text_centered_on(self.field_w / 2, y, text, color);
    }

    fn draw_field(&mut self, frame: &Frame<'_>) {
        let w = self.field_w;
        let h = self.field_h;

        // Dashed center line: 10 px dash every 20 px
        let mut y = 10;
        while y < h {
            self.fill_rect(&Rect::new(w / 2, y, 1, 10), '\u{2502}', GRAY);
            y += 20;
        }

        self.fill_rect(&frame.player, '\u{2588}', WHITE);
        self.fill_rect(&frame.opponent, '\u{2588}', WHITE);
        self.fill_rect(&frame.ball, '\u{25cf}', WHITE);

        self.text_centered_on(w / 4, 20, &frame.score.player.to_string(), WHITE);
        self.text_centered_on(w * 3 / 4, 20, &frame.score.opponent.to_string(), WHITE);
    }

    fn draw_menu(&mut self) {
        self.text_centered(100, "ULTRA ! PONG", LIGHT_BLUE);
        self.text_centered(170, "[TERMINAL EDITION]", WHITE);
        self.text_centered(300, "PRESS ENTER TO START", WHITE);
        self.text_centered(350, "Press L for Leaderboard", GRAY);
        self.text_centered(450, "By Team Flames Pong", GRAY);
        self.text_centered(480, "[C] Atari", GRAY);
    }

    fn draw_leaderboard(&mut self, entries: &[String]) {
        self.text_centered(50, "LEADERBOARD", YELLOW);
        if entries.is_empty() {
            self.text_centered(200, "No games played yet!", WHITE);
        } else {
            let step = (self.field_h / 20).max(1);
            for (i, entry) in entries.iter().enumerate() {
                self.text_centered(120 + i as i32 * step, entry, WHITE);
            }
        }
        self.text_centered(self.field_h * 5 / 6, "Press ENTER or ESC to go back", GRAY);
    }

    fn draw_game_over(&mut self, frame: &Frame<'_>, winner: &str, choice: GameOverChoice) {
        let score = &frame.score;
        self.text_centered(80, "GAME OVER", RED);
        self.text_centered(160, &format!("{winner} WINS!"), WHITE);
        self.text_centered(
            210,
            &format!("Final Score: {} - {}", score.player, score.opponent),
            WHITE,
        );

        let (restart, quit) = match choice {
            GameOverChoice::Restart => (("> RESTART <", GREEN), ("  QUIT  ", WHITE)),
            GameOverChoice::Quit => (("  RESTART  ", WHITE), ("> QUIT <", GREEN)),
        };
        let center = self.field_w / 2;
        self.text_centered_on(center - 100, 300, restart.0, restart.1);
        self.text_centered_on(center + 100, 300, quit.0, quit.1);
        self.text_centered(400, "Use LEFT/RIGHT to select, ENTER to confirm", GRAY);
    }

    /// Lay out a whole frame
    pub fn draw(frame: &Frame<'_>, cols: u16, rows: u16) -> Self {
        let mut canvas = Self::new(cols, rows, frame.field);
        match frame.overlay {
            None => canvas.draw_field(frame),
            Some(Overlay::Menu) => canvas.draw_menu(),
            Some(Overlay::Leaderboard(entries)) => canvas.draw_leaderboard(entries),
            Some(Overlay::GameOver { winner, choice }) => {
                canvas.draw_game_over(frame, winner.label(), choice)
            }
        }
        canvas
    }

    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let mut color = None;
        for row in 0..self.rows {
            queue!(out, cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                if color != Some(cell.color) {
                    queue!(out, style::SetForegroundColor(cell.color))?;
                    color = Some(cell.color);
                }
                queue!(out, style::Print(cell.ch))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

/// Draws frames to stdout
pub struct TerminalRenderer {
    out: Stdout,
}

impl TerminalRenderer {
    pub fn new(_guard: &TerminalGuard) -> Self {
        Self { out: io::stdout() }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), GameError> {
        let (cols, rows) = terminal::size()?;
        if cols == 0 || rows == 0 {
            return Ok(());
        }
        Canvas::draw(frame, cols, rows).write_to(&mut self.out)?;
        Ok(())
    }
}
