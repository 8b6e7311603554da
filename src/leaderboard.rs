//! Match leaderboard
//!
//! An append-only text log, one line per finished match:
//!
//! ```text
//! ULTRA PONG LEADERBOARD
//! ======================
//!
//! 2026-10-19 21:04:11 | PLAYER | Player: 5 - Opponent: 3
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::sim::Side;

/// Number of entries shown on the leaderboard screen
pub const MAX_SHOWN_ENTRIES: usize = 10;

const HEADER: &str = "ULTRA PONG LEADERBOARD\n======================\n\n";
const HEADER_LINES: usize = 2;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of one finished match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub timestamp: NaiveDateTime,
    pub winner: Side,
    pub player_score: u32,
    pub opponent_score: u32,
}

impl MatchRecord {
    /// One log line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{} | {} | Player: {} - Opponent: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.winner.label(),
            self.player_score,
            self.opponent_score
        )
    }
}

/// Where finished matches are recorded
pub trait Leaderboard {
    /// Record a match; never rewrites earlier entries
    fn append(&mut self, record: &MatchRecord) -> io::Result<()>;

    /// Most recent `limit` entries, oldest first
    fn recent(&self, limit: usize) -> io::Result<Vec<String>>;
}

/// Leaderboard stored in a text file
#[derive(Debug, Clone)]
pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Leaderboard for FileLeaderboard {
    fn append(&mut self, record: &MatchRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            file.write_all(HEADER.as_bytes())?;
        }
        writeln!(file, "{}", record.to_line())?;
        log::info!("Recorded match in {}", self.path.display());
        Ok(())
    }

    fn recent(&self, limit: usize) -> io::Result<Vec<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let entries: Vec<String> = contents
            .lines()
            .skip(HEADER_LINES)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).collect())
    }
}
