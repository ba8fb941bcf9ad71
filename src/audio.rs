//! Audio Parameter Mapper — pointer position and speed → synthesis parameters.
//!
//! Pure functions only. Oscillator graphs, envelope scheduling and speech
//! belong to the page's audio backend; this module decides *what* to play:
//! a pitch from the vertical position, a loudness and an envelope character
//! from the drawing speed.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Oscillator waveform requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    /// Accepted by the backend; no envelope class selects it yet.
    Square,
    Sawtooth,
    /// Accepted by the backend; no envelope class selects it yet.
    Triangle,
}

/// Linear ADSR shape, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adsr {
    pub attack: f64,
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    pub release: f64,
}

/// Envelope character selected from drawing speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeClass {
    /// Slow strokes: soft attack, long tail.
    Calm,
    /// Fast strokes: plucked attack, short tail.
    Energetic,
}

impl EnvelopeClass {
    pub fn adsr(&self) -> Adsr {
        match self {
            EnvelopeClass::Calm => Adsr {
                attack: 0.05,
                decay: 0.2,
                sustain: 0.6,
                release: 0.4,
            },
            EnvelopeClass::Energetic => Adsr {
                attack: 0.005,
                decay: 0.08,
                sustain: 0.3,
                release: 0.12,
            },
        }
    }

    pub fn waveform(&self) -> Waveform {
        match self {
            EnvelopeClass::Calm => Waveform::Sine,
            EnvelopeClass::Energetic => Waveform::Sawtooth,
        }
    }
}

/// Mapper tuning. Defaults match the brush page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioMapperConfig {
    /// Frequency at the bottom edge of the canvas (Hz).
    pub min_frequency: f64,
    /// Frequency at the top edge of the canvas (Hz).
    pub max_frequency: f64,
    /// Speed (px/ms) at or above which strokes sound energetic.
    pub energetic_speed: f64,
    /// Gain for a stationary pointer.
    pub base_volume: f64,
    /// Gain added per px/ms of speed.
    pub volume_per_speed: f64,
    /// Gain ceiling.
    pub max_volume: f64,
}

impl Default for AudioMapperConfig {
    fn default() -> Self {
        AudioMapperConfig {
            min_frequency: 200.0,
            max_frequency: 800.0,
            energetic_speed: 2.0,
            base_volume: 0.1,
            volume_per_speed: 0.1,
            max_volume: 0.5,
        }
    }
}

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }
}

/// Everything the backend needs to voice one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Hz.
    pub frequency: f64,
    /// Linear gain.
    pub volume: f64,
    pub waveform: Waveform,
    pub envelope: EnvelopeClass,
    pub adsr: Adsr,
}

/// Stateless mapper; holds only its configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioMapper {
    config: AudioMapperConfig,
}

impl AudioMapper {
    pub fn new(config: AudioMapperConfig) -> Self {
        AudioMapper { config }
    }

    /// Frequency for a vertical position: top edge → `max_frequency`,
    /// bottom edge → `min_frequency`, linear in between.
    ///
    /// Positions outside the canvas are clamped. A canvas without a usable
    /// height maps to the middle of the range.
    pub fn frequency(&self, y: f64, canvas_height: f64) -> f64 {
        let lo = finite_or(self.config.min_frequency, 0.0);
        let hi = finite_or(self.config.max_frequency, lo);
        let t = if canvas_height.is_finite() && canvas_height > 0.0 && !y.is_nan() {
            (y / canvas_height).clamp(0.0, 1.0)
        } else {
            0.5
        };
        hi + (lo - hi) * t
    }

    pub fn envelope(&self, speed: f64) -> EnvelopeClass {
        if speed >= self.config.energetic_speed {
            EnvelopeClass::Energetic
        } else {
            EnvelopeClass::Calm
        }
    }

    pub fn volume(&self, speed: f64) -> f64 {
        let c = &self.config;
        let speed = finite_or(speed, 0.0).max(0.0);
        let v = c.base_volume + speed * c.volume_per_speed;
        v.min(c.max_volume).max(c.base_volume)
    }

    /// Parameters for one pointer sample.
    pub fn map(&self, position: Point, canvas: CanvasSize, speed: f64) -> AudioParams {
        let envelope = self.envelope(speed);
        AudioParams {
            frequency: self.frequency(position.y, canvas.height),
            volume: self.volume(speed),
            waveform: envelope.waveform(),
            envelope,
            adsr: envelope.adsr(),
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
