//! Standard MIDI File encoding of exported notes.
//!
//! Produces a format 1 file with a tempo track followed by one note track on
//! channel 0. Event ordering comes from the delta stream in `serialize`.

use crate::error::{ChronoError, Result};
use crate::export::NoteEvent;
use crate::serialize::{serialize_delta_events_with, EventKind, TimedEvent};
use crate::types::export_config::ExportConfig;
use crate::types::time::micros_per_beat;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::debug;

pub const DEFAULT_TRACK_NAME: &str = "chronogrid layers";

const MAX_DELTA: u32 = 0x0FFF_FFFF;
const MAX_TICKS_PER_BEAT: u16 = 0x7FFF;

/// Delta times are 28-bit variable-length quantities
fn delta(ticks: u64) -> Result<u28> {
    u32::try_from(ticks)
        .ok()
        .filter(|&t| t <= MAX_DELTA)
        .map(u28::new)
        .ok_or(ChronoError::DeltaOutOfRange { ticks })
}

fn tempo_track<'a>(bpm: f64) -> Vec<TrackEvent<'a>> {
    vec![
        TrackEvent {
            delta: u28::new(0),
            // 4/4, 24 clocks per click, 8 32nds per quarter
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_beat(bpm)))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]
}

fn note_message(event: &TimedEvent) -> MidiMessage {
    let key = u7::new(event.pitch.min(127));
    match event.kind {
        EventKind::NoteOn => MidiMessage::NoteOn {
            key,
            vel: u7::new(event.velocity.min(127)),
        },
        EventKind::NoteOff => MidiMessage::NoteOff {
            key,
            vel: u7::new(0),
        },
    }
}

fn note_track<'a>(name: &'a str, events: &[TimedEvent]) -> Result<Vec<TrackEvent<'a>>> {
    let mut track = Vec::with_capacity(events.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });
    for event in events {
        track.push(TrackEvent {
            delta: delta(event.delta)?,
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: note_message(event),
            },
        });
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

/// Encode notes as SMF bytes using the default track name
pub fn write_midi(notes: &[NoteEvent], config: &ExportConfig) -> Result<Vec<u8>> {
    write_midi_named(notes, config, DEFAULT_TRACK_NAME)
}

/// Encode notes as SMF bytes with a custom name on the note track
pub fn write_midi_named(notes: &[NoteEvent], config: &ExportConfig, track_name: &str) -> Result<Vec<u8>> {
    let ticks_per_beat = config.ticks_per_beat.clamp(1, MAX_TICKS_PER_BEAT);
    let events = serialize_delta_events_with(notes, ticks_per_beat, config.tie_break);

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(ticks_per_beat)),
    ));
    smf.tracks.push(tempo_track(config.bpm));
    smf.tracks.push(note_track(track_name, &events)?);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;
    debug!(
        notes = notes.len(),
        events = events.len(),
        ticks_per_beat,
        bytes = bytes.len(),
        "encoded midi file"
    );
    Ok(bytes)
}
