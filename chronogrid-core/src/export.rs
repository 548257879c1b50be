//! Note export: layers (or their composite) to timed note events.

use crate::composite::compute_composite;
use crate::error::{ChronoError, Result};
use crate::types::export_config::{clamp_gate, ExportConfig, RotationMode};
use crate::types::layer::{clamp_pitch, clamp_velocity};
use crate::types::PatternLayer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single exported note. Carries no reference to the layer it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Start in beats from the sequence origin
    pub start_beat: f64,
    /// Sounding length in beats
    pub duration_beats: f64,
    /// MIDI velocity (1-127)
    pub velocity: u8,
}

impl NoteEvent {
    pub fn new(pitch: u8, start_beat: f64, duration_beats: f64, velocity: u8) -> Self {
        Self {
            pitch,
            start_beat,
            duration_beats,
            velocity,
        }
    }

    /// Beat at which the note stops sounding
    #[inline]
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }
}

fn check_duration(duration_beats: f64) -> Result<()> {
    if duration_beats.is_finite() && duration_beats > 0.0 {
        Ok(())
    } else {
        Err(ChronoError::InvalidDuration {
            beats: duration_beats,
        })
    }
}

/// Events for one layer stretched over `duration_beats`.
///
/// Each native step gets `duration_beats / steps` beats; on-steps emit a note
/// lasting `gate` of that window. `gate` is clamped into (0, 1].
pub fn export_layer(
    layer: &PatternLayer,
    duration_beats: f64,
    gate: f64,
    rotation: RotationMode,
) -> Vec<NoteEvent> {
    let steps = layer.steps();
    let step_beats = duration_beats / steps as f64;
    let note_beats = step_beats * clamp_gate(gate);

    (0..steps)
        .filter(|&s| layer.step_is_on(s, rotation))
        .map(|s| NoteEvent::new(layer.pitch(), s as f64 * step_beats, note_beats, layer.velocity()))
        .collect()
}

/// Events for every layer, concatenated in layer-then-step order.
///
/// Uses the continuous rotation convention. Overlapping notes of the same
/// pitch from different layers are kept as independent events.
pub fn export_notes(layers: &[PatternLayer], duration_beats: f64, gate: f64) -> Result<Vec<NoteEvent>> {
    export_notes_with(
        layers,
        duration_beats,
        &ExportConfig::default().with_gate(gate),
    )
}

/// `export_notes` with an explicit configuration (gate and rotation convention)
pub fn export_notes_with(
    layers: &[PatternLayer],
    duration_beats: f64,
    config: &ExportConfig,
) -> Result<Vec<NoteEvent>> {
    if layers.is_empty() {
        return Err(ChronoError::EmptyInput);
    }
    check_duration(duration_beats)?;

    let events: Vec<NoteEvent> = layers
        .iter()
        .flat_map(|layer| export_layer(layer, duration_beats, config.gate, config.rotation))
        .collect();

    debug!(
        layers = layers.len(),
        events = events.len(),
        duration_beats,
        gate = config.gate,
        rotation = config.rotation.name(),
        "exported notes"
    );
    Ok(events)
}

/// Export the composite timeline as a single track at one pitch/velocity
pub fn export_composite(
    layers: &[PatternLayer],
    duration_beats: f64,
    gate: f64,
    pitch: i64,
    velocity: i64,
) -> Result<Vec<NoteEvent>> {
    if layers.is_empty() {
        return Err(ChronoError::EmptyInput);
    }
    check_duration(duration_beats)?;

    let composite = PatternLayer::new(compute_composite(layers)?)
        .with_pitch(clamp_pitch(pitch) as i64)
        .with_velocity(clamp_velocity(velocity) as i64);
    let events = export_layer(&composite, duration_beats, gate, RotationMode::Continuous);
    debug!(
        steps = composite.steps(),
        events = events.len(),
        "exported composite"
    );
    Ok(events)
}
