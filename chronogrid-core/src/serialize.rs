//! Sink-specific encodings of exported notes.
//!
//! - flat absolute tuples for host clip writes
//! - clip note records (`{"notes": [...]}`) for hosts taking a notes dictionary
//! - delta-time note-on/note-off streams for file formats

use crate::export::NoteEvent;
use crate::types::export_config::TieBreak;
use crate::types::time::{beats_to_ticks, Ticks};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of values per note in the flat tuple encoding
pub const FLAT_TUPLE_WIDTH: usize = 5;

/// `[pitch, start, duration, velocity, mute]` per note, in input order
pub fn serialize_flat_tuples(notes: &[NoteEvent]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(notes.len() * FLAT_TUPLE_WIDTH);
    for note in notes {
        flat.extend_from_slice(&[
            note.pitch as f64,
            note.start_beat,
            note.duration_beats,
            note.velocity as f64,
            0.0,
        ]);
    }
    flat
}

/// One note as a host clip expects it in a notes dictionary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipNote {
    pub pitch: u8,
    pub start_time: f64,
    pub duration: f64,
    pub velocity: u8,
    pub mute: u8,
}

impl From<&NoteEvent> for ClipNote {
    fn from(note: &NoteEvent) -> Self {
        ClipNote {
            pitch: note.pitch,
            start_time: note.start_beat,
            duration: note.duration_beats,
            velocity: note.velocity,
            mute: 0,
        }
    }
}

/// Notes dictionary payload: `{"notes": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipNotes {
    pub notes: Vec<ClipNote>,
}

pub fn clip_notes(notes: &[NoteEvent]) -> ClipNotes {
    ClipNotes {
        notes: notes.iter().map(ClipNote::from).collect(),
    }
}

/// Kind of a timed event in a delta stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::NoteOn => write!(f, "on"),
            EventKind::NoteOff => write!(f, "off"),
        }
    }
}

/// A note-on or note-off with both its absolute tick and its delta to the
/// previous event of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub tick: Ticks,
    pub delta: Ticks,
    pub kind: EventKind,
    pub pitch: u8,
    /// Note velocity for note-ons, 0 for note-offs
    pub velocity: u8,
}

fn kind_rank(kind: EventKind, tie_break: TieBreak) -> u8 {
    match (tie_break, kind) {
        (TieBreak::NoteOnFirst, EventKind::NoteOn) | (TieBreak::NoteOffFirst, EventKind::NoteOff) => 0,
        _ => 1,
    }
}

/// Delta-time stream with note-ons sorted before note-offs at equal ticks
pub fn serialize_delta_events(notes: &[NoteEvent], ticks_per_beat: u16) -> Vec<TimedEvent> {
    serialize_delta_events_with(notes, ticks_per_beat, TieBreak::NoteOnFirst)
}

/// Expand notes into note-on/note-off pairs, sort by tick, then kind
/// (per `tie_break`), then pitch, and compute deltas from origin 0.
pub fn serialize_delta_events_with(
    notes: &[NoteEvent],
    ticks_per_beat: u16,
    tie_break: TieBreak,
) -> Vec<TimedEvent> {
    let ticks_per_beat = ticks_per_beat.max(1);
    let mut events: Vec<TimedEvent> = Vec::with_capacity(notes.len() * 2);

    for note in notes {
        events.push(TimedEvent {
            tick: beats_to_ticks(note.start_beat, ticks_per_beat),
            delta: 0,
            kind: EventKind::NoteOn,
            pitch: note.pitch,
            velocity: note.velocity,
        });
        events.push(TimedEvent {
            tick: beats_to_ticks(note.end_beat(), ticks_per_beat),
            delta: 0,
            kind: EventKind::NoteOff,
            pitch: note.pitch,
            velocity: 0,
        });
    }

    // Stable sort keeps input order for fully tied events
    events.sort_by(|a, b| compare_events(a, b, tie_break));

    let mut last: Ticks = 0;
    for event in &mut events {
        event.delta = event.tick.saturating_sub(last);
        last = event.tick;
    }
    events
}

/// Order two events the way the stream does (for callers merging streams)
pub fn compare_events(a: &TimedEvent, b: &TimedEvent, tie_break: TieBreak) -> Ordering {
    a.tick
        .cmp(&b.tick)
        .then_with(|| kind_rank(a.kind, tie_break).cmp(&kind_rank(b.kind, tie_break)))
        .then_with(|| a.pitch.cmp(&b.pitch))
}
