//! Error types shared across the crate

use thiserror::Error;

/// Rejected waveform synthesis parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("invalid synthesis parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Fatal errors that end the run
#[derive(Debug, Error)]
pub enum GameError {
    #[error("sound synthesis failed: {0}")]
    Synth(#[from] SynthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
