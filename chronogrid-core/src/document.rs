//! Layer-set document: the JSON form of a LayerSet plus playback metadata.
//!
//! Output always uses `rotation`/`velocity` and numeric `0`/`1` step lists.
//! Input is more forgiving so that documents from older producers load:
//! `rotate`/`rot`, `vel` and `patt` are accepted, and a pattern may be a list
//! of numbers, a list of booleans, or glyph text.

use crate::composite::compute_composite;
use crate::error::{ChronoError, Result};
use crate::types::layer::{default_pitch_for, DEFAULT_VELOCITY};
use crate::types::pattern_string::{parse_pattern, to_pattern_string};
use crate::types::playback::{DEFAULT_CLIP_LEN_BEATS, DEFAULT_CYCLE_HZ};
use crate::types::{LayerSet, PatternLayer, PlayDirection, PlaybackState};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSetDocument {
    #[serde(default = "default_clip_len")]
    pub clip_len_beats: f64,
    pub layers: Vec<LayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeRecord>,
}

fn default_clip_len() -> f64 {
    DEFAULT_CLIP_LEN_BEATS
}

/// One layer as stored in a document. Unknown keys (colours, radii) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    #[serde(alias = "patt")]
    pub pattern: PatternRepr,
    #[serde(default, alias = "rotate", alias = "rot")]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<i64>,
    #[serde(default, alias = "vel", skip_serializing_if = "Option::is_none")]
    pub velocity: Option<i64>,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternRepr {
    Text(String),
    Steps(Vec<StepValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    Flag(bool),
    Int(i64),
    Float(f64),
}

impl StepValue {
    fn is_on(self) -> bool {
        match self {
            StepValue::Flag(on) => on,
            StepValue::Int(n) => n != 0,
            StepValue::Float(x) => x != 0.0,
        }
    }
}

impl PatternRepr {
    fn from_steps(steps: &[bool]) -> Self {
        PatternRepr::Steps(steps.iter().map(|&on| StepValue::Int(on as i64)).collect())
    }

    pub fn to_steps(&self) -> Vec<bool> {
        match self {
            PatternRepr::Text(text) => parse_pattern(text),
            PatternRepr::Steps(values) => values.iter().map(|v| v.is_on()).collect(),
        }
    }
}

/// Derived composite summary. Only `cycle_hz`, `play_dir` and `play_phase`
/// are read back on load; the rest is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeRecord {
    pub steps: usize,
    pub list: Vec<u8>,
    pub pattern: String,
    pub cycle_hz: f64,
    pub cycle_sec: f64,
    pub step_dur_sec: f64,
    pub play_dir: PlayDirection,
    pub play_phase: f64,
}

impl Default for CompositeRecord {
    fn default() -> Self {
        CompositeRecord {
            steps: 1,
            list: vec![0],
            pattern: "0".to_string(),
            cycle_hz: DEFAULT_CYCLE_HZ,
            cycle_sec: 1.0 / DEFAULT_CYCLE_HZ,
            step_dur_sec: 1.0 / DEFAULT_CYCLE_HZ,
            play_dir: PlayDirection::Forward,
            play_phase: 0.0,
        }
    }
}

impl LayerRecord {
    fn from_layer(layer: &PatternLayer) -> Self {
        LayerRecord {
            steps: Some(layer.steps()),
            pattern: PatternRepr::from_steps(layer.pattern()),
            rotation: layer.rotation(),
            pitch: Some(layer.pitch() as i64),
            velocity: Some(layer.velocity() as i64),
            label: layer.label().to_string(),
        }
    }

    fn into_layer(self, index: usize) -> Result<PatternLayer> {
        if self.steps == Some(0) {
            return Err(ChronoError::MalformedDocument {
                reason: format!("layer {} has `steps` 0, expected at least 1", index),
            });
        }
        let mut layer = PatternLayer::new(self.pattern.to_steps())
            .with_rotation(self.rotation)
            .with_pitch(self.pitch.unwrap_or(default_pitch_for(index) as i64))
            .with_velocity(self.velocity.unwrap_or(DEFAULT_VELOCITY as i64))
            .with_label(self.label);
        if let Some(steps) = self.steps {
            layer = layer.with_explicit_steps(steps);
            if layer.has_explicit_steps() {
                warn!(
                    index,
                    steps,
                    pattern_len = layer.pattern().len(),
                    "document step count differs from pattern length, keeping it"
                );
            }
        }
        Ok(layer)
    }
}

impl LayerSetDocument {
    /// Snapshot a layer set and its playback state
    pub fn from_state(layers: &LayerSet, playback: &PlaybackState) -> Result<Self> {
        let composite = compute_composite(layers.layers())?;
        let steps = composite.len();
        Ok(LayerSetDocument {
            clip_len_beats: playback.clip_len_beats(),
            layers: layers.iter().map(LayerRecord::from_layer).collect(),
            composite: Some(CompositeRecord {
                steps,
                list: composite.iter().map(|&on| on as u8).collect(),
                pattern: to_pattern_string(&composite),
                cycle_hz: playback.cycle_hz(),
                cycle_sec: playback.cycle_sec(),
                step_dur_sec: playback.step_dur_sec(steps),
                play_dir: playback.play_dir(),
                play_phase: playback.play_phase(),
            }),
        })
    }

    /// Rebuild a layer set (nothing selected) and playback state
    pub fn into_state(self) -> Result<(LayerSet, PlaybackState)> {
        let mut playback = PlaybackState::new();
        playback.set_clip_len_beats(self.clip_len_beats);
        if let Some(composite) = &self.composite {
            playback.restore(composite.cycle_hz, composite.play_phase, composite.play_dir);
        }

        let layers = self
            .layers
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_layer(index))
            .collect::<Result<Vec<_>>>()?;
        Ok((LayerSet::from_layers(layers), playback))
    }
}

pub fn to_document(layers: &LayerSet, playback: &PlaybackState) -> Result<LayerSetDocument> {
    LayerSetDocument::from_state(layers, playback)
}

/// Pretty-printed JSON document
pub fn to_json(layers: &LayerSet, playback: &PlaybackState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(layers, playback)?)?)
}

/// Parse a document without building a layer set
pub fn parse_document(text: &str) -> Result<LayerSetDocument> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    match value.get("layers") {
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => {
            return Err(ChronoError::MalformedDocument {
                reason: "`layers` must be an array".to_string(),
            })
        }
        None => {
            return Err(ChronoError::MalformedDocument {
                reason: "missing `layers` field".to_string(),
            })
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a document into a layer set and playback state.
/// Any structural problem fails the whole load.
pub fn from_json(text: &str) -> Result<(LayerSet, PlaybackState)> {
    let document = parse_document(text)?;
    debug!(layers = document.layers.len(), "document parsed");
    document.into_state()
}
