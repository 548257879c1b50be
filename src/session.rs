//! Editing session: one layer set, its playback metadata and export settings.

use anyhow::{Context, Result};
use chronogrid_core::composite::composite_pattern_string;
use chronogrid_core::document;
use chronogrid_core::export::{export_composite, export_notes_with};
use chronogrid_core::midi_file::write_midi_named;
use chronogrid_core::serialize::{clip_notes, serialize_flat_tuples, ClipNotes};
use chronogrid_core::types::pattern_string::{relabel_glyphs, to_pattern_string};
use chronogrid_core::{
    composite_steps, compute_composite, ExportConfig, LayerSet, NoteEvent, PlaybackState,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Answer for queries about missing layers or unknown properties
pub const NULL_ANSWER: &str = "null";

/// State owned by one editor. Every command works against exactly one of these.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    layers: LayerSet,
    playback: PlaybackState,
    config: ExportConfig,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerSet {
        &mut self.layers
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackState {
        &mut self.playback
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExportConfig {
        &mut self.config
    }

    pub fn composite(&self) -> chronogrid_core::Result<Vec<bool>> {
        compute_composite(self.layers.layers())
    }

    /// Replace layers and playback state from document text. On failure the
    /// session is left untouched.
    pub fn load_document(&mut self, text: &str) -> chronogrid_core::Result<()> {
        let (layers, playback) = document::from_json(text)?;
        self.layers = layers;
        self.playback = playback;
        info!(layers = self.layers.len(), "document loaded");
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.load_document(&text)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn document_json(&self) -> chronogrid_core::Result<String> {
        document::to_json(&self.layers, &self.playback)
    }

    pub fn save_file(&self, path: &Path) -> Result<()> {
        let json = self.document_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "document saved");
        Ok(())
    }

    /// Notes for every layer stretched over the target clip length
    pub fn export_notes(&self) -> chronogrid_core::Result<Vec<NoteEvent>> {
        export_notes_with(
            self.layers.layers(),
            self.playback.clip_len_beats(),
            &self.config,
        )
    }

    pub fn clip_tuples(&self) -> chronogrid_core::Result<Vec<f64>> {
        Ok(serialize_flat_tuples(&self.export_notes()?))
    }

    pub fn clip_notes(&self) -> chronogrid_core::Result<ClipNotes> {
        Ok(clip_notes(&self.export_notes()?))
    }

    pub fn midi_bytes(&self, track_name: &str) -> chronogrid_core::Result<Vec<u8>> {
        write_midi_named(&self.export_notes()?, &self.config, track_name)
    }

    /// Write a Standard MIDI File and return the number of exported notes
    pub fn write_midi_file(&self, path: &Path) -> Result<usize> {
        let notes = self.export_notes()?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(chronogrid_core::midi_file::DEFAULT_TRACK_NAME);
        let bytes = write_midi_named(&notes, &self.config, name)?;
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), notes = notes.len(), "midi file written");
        Ok(notes.len())
    }

    /// Write the composite timeline as a single-pitch MIDI file
    pub fn write_composite_midi_file(&self, path: &Path, pitch: i64, velocity: i64) -> Result<usize> {
        let notes = export_composite(
            self.layers.layers(),
            self.playback.clip_len_beats(),
            self.config.gate,
            pitch,
            velocity,
        )?;
        let bytes = write_midi_named(&notes, &self.config, "composite")?;
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), notes = notes.len(), "composite midi file written");
        Ok(notes.len())
    }

    /// Read-only property lookup.
    ///
    /// Session-wide properties ignore `index`. Layer properties use `index`
    /// or the selected layer; a missing layer or unknown property answers
    /// `null`.
    pub fn query(&self, property: &str, index: Option<usize>) -> String {
        let property = property.to_lowercase();
        match property.as_str() {
            "selected" => {
                return self
                    .layers
                    .selected()
                    .map_or_else(|| "-1".to_string(), |i| i.to_string())
            }
            "layercount" => return self.layers.len().to_string(),
            "cliplen_beats" | "cliplen" => return self.playback.clip_len_beats().to_string(),
            "cycle_hz" | "cyclefreq" => return self.playback.cycle_hz().to_string(),
            "play_phase" => return self.playback.play_phase().to_string(),
            "play_dir" => return self.playback.play_dir().as_sign().to_string(),
            "compositesteps" => {
                return composite_steps(self.layers.iter())
                    .map_or_else(|_| NULL_ANSWER.to_string(), |steps| steps.to_string())
            }
            "compositepattern" => {
                return composite_pattern_string(self.layers.layers())
                    .unwrap_or_else(|_| NULL_ANSWER.to_string())
            }
            "compositemarks" => {
                return self.composite_answer(|c| relabel_glyphs(&to_pattern_string(c)))
            }
            "compositelist" => return self.composite_answer(|c| bit_list(c)),
            _ => {}
        }

        let Some(layer) = self.layers.layer_or_selected(index) else {
            return NULL_ANSWER.to_string();
        };
        match property.as_str() {
            "steps" | "stepsamount" => layer.steps().to_string(),
            "pattern" => layer.pattern_string(),
            "patternmarks" => relabel_glyphs(&layer.pattern_string()),
            "patternlist" => bit_list(layer.pattern()),
            "rotate" | "rotation" => layer.rotation().to_string(),
            "label" => layer.label().to_string(),
            "pitch" => layer.pitch().to_string(),
            "vel" | "velocity" => layer.velocity().to_string(),
            _ => NULL_ANSWER.to_string(),
        }
    }

    /// Composite-derived answer, `null` when the composite cannot be built
    fn composite_answer(&self, answer: impl FnOnce(&[bool]) -> String) -> String {
        match self.composite() {
            Ok(composite) => answer(&composite),
            Err(err) => {
                warn!(%err, "composite unavailable");
                NULL_ANSWER.to_string()
            }
        }
    }
}

fn bit_list(steps: &[bool]) -> String {
    steps
        .iter()
        .map(|&on| if on { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}
