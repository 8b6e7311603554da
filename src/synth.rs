//! Chip-tune waveform synthesis
//!
//! Every generator returns a freshly allocated buffer of signed 16-bit mono
//! samples, `round(sample_rate * duration)` long. Buffers are built once at
//! startup and replayed by reference afterwards.

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Full-scale amplitude of a 16-bit sample
const FULL_SCALE: f64 = 32767.0;

/// One period of the triangle channel: a palindromic 4-bit staircase
const TRIANGLE_STEPS: [u8; 32] = [
    15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, //
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
];

/// Midpoint of the triangle staircase
const TRIANGLE_CENTER: f64 = 7.5;

/// LFSR state after reset
const LFSR_SEED: u16 = 1;

/// LFSR feedback tap selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseMode {
    /// Taps bits 0 and 1: full 15-bit period, hissy noise
    #[default]
    Long,
    /// Taps bits 0 and 6: short loop, metallic buzz
    Short,
}

impl NoiseMode {
    /// Bit XOR-ed with bit 0 to produce the feedback bit
    fn tap(self) -> u16 {
        match self {
            NoiseMode::Long => 1,
            NoiseMode::Short => 6,
        }
    }
}

impl From<u8> for NoiseMode {
    fn from(mode: u8) -> Self {
        if mode == 0 {
            NoiseMode::Long
        } else {
            NoiseMode::Short
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SynthError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidParameter { name, value })
    }
}

/// Validate the shared parameters and return the buffer length
fn sample_count(freq: f64, duration: f64, sample_rate: u32) -> Result<usize, SynthError> {
    check_positive("freq", freq)?;
    check_positive("duration", duration)?;
    check_positive("sample_rate", f64::from(sample_rate))?;
    Ok((f64::from(sample_rate) * duration).round() as usize)
}

/// Square wave with a configurable duty cycle
///
/// Within each period of `floor(sample_rate / freq)` samples, the first
/// `floor(period * duty)` are high and the rest low.
pub fn square(
    freq: f64,
    duration: f64,
    volume: f64,
    sample_rate: u32,
    duty: f64,
) -> Result<Vec<i16>, SynthError> {
    let len = sample_count(freq, duration, sample_rate)?;
    let period = (f64::from(sample_rate) / freq).floor() as usize;
    if period == 0 {
        return Err(SynthError::InvalidParameter { name: "freq", value: freq });
    }
    let high = (period as f64 * duty).floor() as usize;
    let amp = (FULL_SCALE * volume).round() as i16;

    Ok((0..len)
        .map(|i| if i % period < high { amp } else { amp.saturating_neg() })
        .collect())
}

/// Quantized triangle wave stepping through a 32-entry staircase
pub fn triangle(
    freq: f64,
    duration: f64,
    volume: f64,
    sample_rate: u32,
) -> Result<Vec<i16>, SynthError> {
    let len = sample_count(freq, duration, sample_rate)?;
    let period = f64::from(sample_rate) / freq;
    let step_len = period / TRIANGLE_STEPS.len() as f64;
    let scale = FULL_SCALE * volume / TRIANGLE_CENTER;

    Ok((0..len)
        .map(|i| {
            let step = (i as f64 / step_len) % TRIANGLE_STEPS.len() as f64;
            let level = f64::from(TRIANGLE_STEPS[step as usize]);
            ((level - TRIANGLE_CENTER) * scale) as i16
        })
        .collect())
}

/// 15-bit linear-feedback shift register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lfsr {
    state: u16,
    tap: u16,
}

impl Lfsr {
    fn new(mode: NoiseMode) -> Self {
        Self {
            state: LFSR_SEED,
            tap: mode.tap(),
        }
    }

    fn step(&mut self) {
        let feedback = (self.state ^ (self.state >> self.tap)) & 1;
        self.state = (self.state >> 1) | (feedback << 14);
    }

    fn low_bit_clear(&self) -> bool {
        self.state & 1 == 0
    }
}

/// LFSR noise
///
/// The register only advances when the tone clock (`sample_rate / freq`
/// samples per tick, fractional remainder carried) fires, but a sample is
/// emitted on every output tick from the register's current low bit.
pub fn noise(
    freq: f64,
    duration: f64,
    volume: f64,
    sample_rate: u32,
    mode: NoiseMode,
) -> Result<Vec<i16>, SynthError> {
    let len = sample_count(freq, duration, sample_rate)?;
    let period = f64::from(sample_rate) / freq;
    let amp = (FULL_SCALE * volume) as i16;

    let mut lfsr = Lfsr::new(mode);
    let mut clock = 0.0;
    let mut samples = Vec::with_capacity(len);
    for _ in 0..len {
        clock += 1.0;
        if clock >= period {
            clock -= period;
            lfsr.step();
        }
        samples.push(if lfsr.low_bit_clear() { amp } else { amp.saturating_neg() });
    }
    Ok(samples)
}
