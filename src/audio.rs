//! Sound effects
//!
//! Every cue is synthesized once at startup (see [`crate::synth`]) and then
//! replayed from a shared, immutable buffer. Playback goes through rodio: each
//! `play` gets its own detached sink, so overlapping cues mix instead of
//! cutting each other off.

use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::SynthError;
use crate::synth::{self, NoiseMode};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits top or bottom wall
    Bounce,
    /// Ball hits a paddle
    Hit,
    /// Point scored
    Score,
    /// Match over
    GameOver,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Bounce,
        SoundEffect::Hit,
        SoundEffect::Score,
        SoundEffect::GameOver,
    ];
}

/// Anything that can play a cue without blocking the caller
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// A generated 16-bit mono sound
#[derive(Debug, Clone)]
pub struct Sound {
    pub samples: Arc<[i16]>,
    pub sample_rate: u32,
}

impl Sound {
    fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }
}

/// Pre-generated buffer for every cue
#[derive(Debug, Clone)]
pub struct SoundBank {
    bounce: Sound,
    hit: Sound,
    score: Sound,
    game_over: Sound,
}

impl SoundBank {
    /// Synthesize all cues
    ///
    /// Fails on parameters the synthesizer rejects, e.g. a zero sample rate.
    pub fn generate(sample_rate: u32) -> Result<Self, SynthError> {
        let bank = Self {
            // Triangle blip, C5
            bounce: Sound::new(synth::triangle(523.0, 0.1, 0.5, sample_rate)?, sample_rate),
            // Thin 12.5% pulse, E5
            hit: Sound::new(synth::square(659.0, 0.1, 0.5, sample_rate, 0.125)?, sample_rate),
            // Metallic short-loop noise
            score: Sound::new(
                synth::noise(1000.0, 0.2, 0.5, sample_rate, NoiseMode::Short)?,
                sample_rate,
            ),
            // Low rumble
            game_over: Sound::new(
                synth::noise(200.0, 0.5, 0.7, sample_rate, NoiseMode::Long)?,
                sample_rate,
            ),
        };
        log::info!("Generated {} sound effects at {} Hz", SoundEffect::ALL.len(), sample_rate);
        Ok(bank)
    }

    pub fn get(&self, effect: SoundEffect) -> &Sound {
        match effect {
            SoundEffect::Bounce => &self.bounce,
            SoundEffect::Hit => &self.hit,
            SoundEffect::Score => &self.score,
            SoundEffect::GameOver => &self.game_over,
        }
    }
}

/// rodio source reading a shared buffer from the start
struct PcmSource {
    samples: Arc<[i16]>,
    sample_rate: u32,
    pos: usize,
}

impl PcmSource {
    fn new(sound: &Sound) -> Self {
        Self {
            samples: Arc::clone(&sound.samples),
            sample_rate: sound.sample_rate,
            pos: 0,
        }
    }
}

impl Iterator for PcmSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl Source for PcmSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.pos)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.samples.len() as f64 / f64::from(self.sample_rate),
        ))
    }
}

/// Audio manager for the game
pub struct AudioManager {
    // The stream must outlive every sink created from its handle
    output: Option<(OutputStream, OutputStreamHandle)>,
    sounds: SoundBank,
    muted: bool,
}

impl AudioManager {
    /// Open the default output device
    ///
    /// A missing device only disables audio; the game still runs.
    pub fn new(sounds: SoundBank, muted: bool) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                log::warn!("Failed to open audio output ({e}) - audio disabled");
                None
            }
        };
        Self {
            output,
            sounds,
            muted,
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some((_, handle)) = &self.output else {
            return;
        };

        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.append(PcmSource::new(self.sounds.get(effect)));
                sink.detach();
            }
            Err(e) => log::warn!("Dropped {effect:?}: {e}"),
        }
    }
}
