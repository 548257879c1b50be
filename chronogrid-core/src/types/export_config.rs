//! Export configuration types
//!
//! Pure data shared by the exporters and the front-end. None of these carry
//! behavior beyond validation and parsing.

use super::time::DEFAULT_TICKS_PER_BEAT;
use serde::{Deserialize, Serialize};

/// Default fraction of a step that is actually sounded
pub const DEFAULT_GATE: f64 = 0.9;
/// Default tempo written to exported MIDI files
pub const DEFAULT_BPM: f64 = 120.0;

/// How a layer's rotation selects the source step during export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Floor of the fractional position, identical to the composite resampler
    #[default]
    Continuous,
    /// Rotation rounded half-up to whole steps (legacy clip writer behavior)
    Rounded,
}

impl RotationMode {
    /// Parse rotation mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<RotationMode> {
        match s.to_lowercase().as_str() {
            "continuous" | "cont" => Some(RotationMode::Continuous),
            "rounded" | "round" | "legacy" => Some(RotationMode::Rounded),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RotationMode::Continuous => "continuous",
            RotationMode::Rounded => "rounded",
        }
    }
}

/// Ordering of note-on and note-off events that share a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Note-ons sort before note-offs at the same tick
    #[default]
    NoteOnFirst,
    /// Note-offs sort before note-ons, so a repeated pitch is released first
    NoteOffFirst,
}

impl TieBreak {
    pub fn from_str(s: &str) -> Option<TieBreak> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "note_on_first" | "on" | "on_first" => Some(TieBreak::NoteOnFirst),
            "note_off_first" | "off" | "off_first" => Some(TieBreak::NoteOffFirst),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TieBreak::NoteOnFirst => "note-on-first",
            TieBreak::NoteOffFirst => "note-off-first",
        }
    }
}

/// Clamp a gate fraction into (0, 1]. Non-finite or non-positive values
/// fall back to the default gate.
pub fn clamp_gate(gate: f64) -> f64 {
    if !gate.is_finite() || gate <= 0.0 {
        DEFAULT_GATE
    } else {
        gate.min(1.0)
    }
}

/// Settings for note export and event serialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub gate: f64,
    pub ticks_per_beat: u16,
    pub bpm: f64,
    pub rotation: RotationMode,
    pub tie_break: TieBreak,
}

impl ExportConfig {
    pub fn new(gate: f64, ticks_per_beat: u16) -> Self {
        Self {
            gate: clamp_gate(gate),
            ticks_per_beat: ticks_per_beat.max(1),
            ..Self::default()
        }
    }

    pub fn with_gate(mut self, gate: f64) -> Self {
        self.gate = clamp_gate(gate);
        self
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        if bpm.is_finite() && bpm > 0.0 {
            self.bpm = bpm;
        }
        self
    }

    pub fn with_rotation(mut self, rotation: RotationMode) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gate: DEFAULT_GATE,
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            bpm: DEFAULT_BPM,
            rotation: RotationMode::default(),
            tie_break: TieBreak::default(),
        }
    }
}
