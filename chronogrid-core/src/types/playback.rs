//! Playback metadata carried alongside a layer set.
//!
//! Nothing here drives a transport; these values are only reported in the
//! layer-set document for downstream players and clip writers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CYCLE_HZ: f64 = 1.0;
pub const DEFAULT_CLIP_LEN_BEATS: f64 = 4.0;

/// Direction the playhead travels around the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayDirection {
    #[default]
    Forward,
    Backward,
}

impl PlayDirection {
    /// `1` forward, `-1` backward (document encoding)
    pub fn as_sign(&self) -> i8 {
        match self {
            PlayDirection::Forward => 1,
            PlayDirection::Backward => -1,
        }
    }

    pub fn from_sign(sign: f64) -> Self {
        if sign < 0.0 {
            PlayDirection::Backward
        } else {
            PlayDirection::Forward
        }
    }
}

impl Serialize for PlayDirection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_sign())
    }
}

impl<'de> Deserialize<'de> for PlayDirection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sign = f64::deserialize(deserializer)?;
        Ok(PlayDirection::from_sign(sign))
    }
}

/// Cycle frequency, playhead and target clip length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    cycle_hz: f64,
    play_phase: f64,
    play_dir: PlayDirection,
    clip_len_beats: f64,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_hz(&self) -> f64 {
        self.cycle_hz
    }

    /// Length of one cycle in seconds
    pub fn cycle_sec(&self) -> f64 {
        1.0 / self.cycle_hz
    }

    /// Duration of one composite step in seconds
    pub fn step_dur_sec(&self, composite_steps: usize) -> f64 {
        self.cycle_sec() / composite_steps.max(1) as f64
    }

    pub fn play_phase(&self) -> f64 {
        self.play_phase
    }

    pub fn play_dir(&self) -> PlayDirection {
        self.play_dir
    }

    pub fn clip_len_beats(&self) -> f64 {
        self.clip_len_beats
    }

    /// Accepts only finite, positive frequencies. Returns whether it changed.
    pub fn set_cycle_hz(&mut self, hz: f64) -> bool {
        if hz.is_finite() && hz > 0.0 {
            self.cycle_hz = hz;
            true
        } else {
            false
        }
    }

    /// Accepts only finite, positive lengths. Returns whether it changed.
    pub fn set_clip_len_beats(&mut self, beats: f64) -> bool {
        if beats.is_finite() && beats > 0.0 {
            self.clip_len_beats = beats;
            true
        } else {
            false
        }
    }

    /// Move the playhead from a signed phase.
    ///
    /// The sign picks the direction; the fractional part of the magnitude is
    /// the phase, mirrored (`1 - frac`) when travelling backward.
    pub fn set_playhead(&mut self, phase: f64) {
        let phase = if phase.is_finite() { phase } else { 0.0 };
        self.play_dir = PlayDirection::from_sign(phase);
        let magnitude = phase.abs();
        let frac = magnitude - magnitude.floor();
        self.play_phase = match self.play_dir {
            PlayDirection::Forward => frac,
            PlayDirection::Backward => (1.0 - frac).rem_euclid(1.0),
        };
    }

    /// Restore raw values read from a document, validating each one
    pub fn restore(&mut self, cycle_hz: f64, play_phase: f64, play_dir: PlayDirection) {
        self.set_cycle_hz(cycle_hz);
        self.play_phase = if play_phase.is_finite() {
            play_phase.rem_euclid(1.0)
        } else {
            0.0
        };
        self.play_dir = play_dir;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            cycle_hz: DEFAULT_CYCLE_HZ,
            play_phase: 0.0,
            play_dir: PlayDirection::Forward,
            clip_len_beats: DEFAULT_CLIP_LEN_BEATS,
        }
    }
}
