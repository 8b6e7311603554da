//! Game settings
//!
//! Persisted as pretty-printed JSON next to the game. Every field has a
//! default, so a partial file only overrides what it names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::GameError;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV: &str = "ULTRA_PONG_CONFIG";

/// Default settings file name (working directory)
pub const DEFAULT_CONFIG_FILE: &str = "ultra_pong.json";

/// Playfield geometry and match rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: i32,
    pub height: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    pub ball_size: i32,
    /// Paddle travel per tick (player and opponent)
    pub paddle_speed: i32,
    /// Ball travel per tick on each axis
    pub ball_speed: i32,
    /// First side to reach this score wins
    pub win_score: u32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: consts::WIDTH,
            height: consts::HEIGHT,
            paddle_width: consts::PADDLE_WIDTH,
            paddle_height: consts::PADDLE_HEIGHT,
            ball_size: consts::BALL_SIZE,
            paddle_speed: consts::PADDLE_SPEED,
            ball_speed: consts::BALL_SPEED,
            win_score: consts::WIN_SCORE,
        }
    }
}

/// Audio output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Sample rate used both for synthesis and playback
    pub sample_rate: u32,
    /// Generate the sound bank but never play it
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: consts::SAMPLE_RATE,
            muted: false,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playfield: Playfield,
    /// Simulation and render ticks per second
    pub tick_rate: u32,
    pub audio: AudioSettings,
    /// Append-only match log
    pub leaderboard_path: PathBuf,
    /// Log output (the terminal belongs to the game screen)
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            tick_rate: consts::TICK_RATE,
            audio: AudioSettings::default(),
            leaderboard_path: PathBuf::from("pong_leaderboard.txt"),
            log_path: PathBuf::from("ultra_pong.log"),
        }
    }
}

impl Settings {
    /// Settings file location: `$ULTRA_PONG_CONFIG` or `./ultra_pong.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load settings from a JSON file
    ///
    /// A missing file yields defaults. Unreadable or malformed files are
    /// errors; the caller decides whether to fall back.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json)
            .map_err(|e| GameError::Config(format!("malformed {}: {e}", path.display())))
    }

    /// Write settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| GameError::Config(e.to_string()))?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation or synthesizer cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let p = &self.playfield;
        let positive = [
            ("playfield.width", p.width),
            ("playfield.height", p.height),
            ("playfield.paddle_width", p.paddle_width),
            ("playfield.paddle_height", p.paddle_height),
            ("playfield.ball_size", p.ball_size),
            ("playfield.paddle_speed", p.paddle_speed),
            ("playfield.ball_speed", p.ball_speed),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(GameError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if p.paddle_height > p.height || p.ball_size > p.height {
            return Err(GameError::Config(
                "paddle and ball must fit inside the playfield".to_string(),
            ));
        }
        if p.win_score == 0 {
            return Err(GameError::Config("playfield.win_score must be positive".to_string()));
        }
        if self.tick_rate == 0 {
            return Err(GameError::Config("tick_rate must be positive".to_string()));
        }
        if self.audio.sample_rate == 0 {
            return Err(GameError::Config("audio.sample_rate must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.playfield.width, 800);
        assert_eq!(settings.playfield.height, 600);
        assert_eq!(settings.playfield.win_score, 5);
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.audio.sample_rate, 44100);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "playfield": { "win_score": 3 }, "audio": { "muted": true } }"#)
                .unwrap();
        assert_eq!(settings.playfield.win_score, 3);
        assert_eq!(settings.playfield.width, 800);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.sample_rate, 44100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.playfield.ball_speed = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.tick_rate = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.playfield.paddle_height = 700;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.tick_rate = 30;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_is_default_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load(&missing).unwrap(), Settings::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(Settings::load(&broken), Err(GameError::Config(_))));
    }
}
