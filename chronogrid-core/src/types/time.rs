//! Beat and tick conversions
//!
//! Beats are real-valued positions from the sequence origin (always 0).
//! Ticks are the fixed subdivision used by delta-time event streams.

/// Absolute position in ticks from the sequence origin
pub type Ticks = u64;

/// Default resolution for delta-time streams (matches common DAW exports)
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// Convert a beat position to ticks: `round(beats * ticks_per_beat)`.
///
/// Monotonic in `beats`. Negative and non-finite positions map to tick 0.
#[inline]
pub fn beats_to_ticks(beats: f64, ticks_per_beat: u16) -> Ticks {
    if !beats.is_finite() || beats <= 0.0 {
        return 0;
    }
    (beats * ticks_per_beat as f64).round() as Ticks
}

/// Microseconds per beat for a tempo in BPM (SMF tempo meta event)
pub fn micros_per_beat(bpm: f64) -> u32 {
    let bpm = if bpm.is_finite() && bpm > 0.0 { bpm } else { 120.0 };
    // The SMF tempo field is 24 bits wide
    (60_000_000.0 / bpm).round().clamp(1.0, 16_777_215.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_to_ticks_rounds() {
        assert_eq!(beats_to_ticks(1.0, 480), 480);
        assert_eq!(beats_to_ticks(2.0 * (4.0 / 3.0), 480), 1280);
        assert_eq!(beats_to_ticks(0.0005, 480), 0);
    }

    #[test]
    fn test_beats_to_ticks_never_negative() {
        assert_eq!(beats_to_ticks(-1.0, 480), 0);
        assert_eq!(beats_to_ticks(f64::NAN, 480), 0);
    }

    #[test]
    fn test_beats_to_ticks_monotonic() {
        let mut last = 0;
        for i in 0..1000 {
            let t = beats_to_ticks(i as f64 * 0.013, 96);
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn test_micros_per_beat() {
        assert_eq!(micros_per_beat(120.0), 500_000);
        assert_eq!(micros_per_beat(0.0), 500_000);
    }
}
