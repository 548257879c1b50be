//! # Chronogrid Core
//!
//! Polyrhythmic step-pattern layers, their LCM composite, and export of the
//! layers as timed notes, delta-time event streams and Standard MIDI Files.
//! Has no terminal or file-system dependencies; the `chronogrid` crate is the
//! interactive front-end.
//!
//! ## Example
//!
//! ```
//! use chronogrid_core::types::LayerSet;
//! use chronogrid_core::{compute_composite, export_notes, serialize_delta_events};
//!
//! let mut layers = LayerSet::new();
//! layers.add_layer("1000", 0.0, "Kick");
//! layers.add_layer("101", 0.0, "Snare");
//!
//! assert_eq!(compute_composite(layers.layers())?.len(), 12);
//!
//! let notes = export_notes(layers.layers(), 4.0, 0.5)?;
//! let events = serialize_delta_events(&notes, 480);
//! assert_eq!(events.len(), notes.len() * 2);
//! # Ok::<(), chronogrid_core::ChronoError>(())
//! ```

pub mod composite;
pub mod document;
pub mod error;
pub mod export;
pub mod midi_file;
pub mod serialize;
pub mod types;

pub use composite::{composite_steps, compute_composite};
pub use document::{from_json, to_json, LayerSetDocument};
pub use error::{ChronoError, Result};
pub use export::{export_composite, export_notes, export_notes_with, NoteEvent};
pub use midi_file::write_midi;
pub use serialize::{serialize_delta_events, serialize_flat_tuples, EventKind, TimedEvent};
pub use types::{
    ExportConfig, LayerSet, PatternLayer, PlayDirection, PlaybackState, RotationMode, TieBreak,
};
