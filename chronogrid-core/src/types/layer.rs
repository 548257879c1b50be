//! PatternLayer - one independent binary step sequence.

use super::export_config::RotationMode;
use super::pattern_string::{parse_pattern, to_mark_string, to_pattern_string};
use std::fmt;

/// First pitch handed out to layers appended without an explicit pitch
pub const DEFAULT_BASE_PITCH: u8 = 36;
/// Velocity of layers appended without an explicit velocity
pub const DEFAULT_VELOCITY: u8 = 100;

/// Clamp any integer into the MIDI pitch range [0, 127]
#[inline]
pub fn clamp_pitch(pitch: i64) -> u8 {
    pitch.clamp(0, 127) as u8
}

/// Clamp any integer into the audible velocity range [1, 127]
#[inline]
pub fn clamp_velocity(velocity: i64) -> u8 {
    velocity.clamp(1, 127) as u8
}

/// Pitch a layer gets when appended at `index` without an explicit pitch
#[inline]
pub fn default_pitch_for(index: usize) -> u8 {
    clamp_pitch(DEFAULT_BASE_PITCH as i64 + index as i64)
}

/// A single rhythm layer.
///
/// `steps()` is the pattern length unless a document supplied an explicit
/// step count. Pattern lookups are always taken modulo the pattern length.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternLayer {
    pattern: Vec<bool>,
    /// Step count carried by a loaded document when it disagrees with the pattern
    explicit_steps: Option<usize>,
    /// Phase offset in this layer's own steps (may be fractional)
    rotation: f64,
    pitch: u8,
    velocity: u8,
    label: String,
}

impl PatternLayer {
    /// Create a layer from raw steps. An empty pattern becomes one on-step.
    pub fn new(pattern: Vec<bool>) -> Self {
        PatternLayer {
            pattern: normalize(pattern),
            explicit_steps: None,
            rotation: 0.0,
            pitch: DEFAULT_BASE_PITCH,
            velocity: DEFAULT_VELOCITY,
            label: String::new(),
        }
    }

    /// Create a layer from pattern text like `"x--x"` or `"1001"`
    pub fn parse(text: &str) -> Self {
        Self::new(parse_pattern(text))
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_pitch(mut self, pitch: i64) -> Self {
        self.set_pitch(pitch);
        self
    }

    pub fn with_velocity(mut self, velocity: i64) -> Self {
        self.set_velocity(velocity);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Keep a step count that differs from the pattern length (legacy documents).
    /// Zero is ignored; a value equal to the pattern length clears the override.
    pub fn with_explicit_steps(mut self, steps: usize) -> Self {
        self.explicit_steps = (steps >= 1 && steps != self.pattern.len()).then_some(steps);
        self
    }

    /// Number of native steps of this layer (always >= 1)
    pub fn steps(&self) -> usize {
        self.explicit_steps.unwrap_or(self.pattern.len()).max(1)
    }

    /// Whether `steps()` comes from a document rather than the pattern length
    pub fn has_explicit_steps(&self) -> bool {
        self.explicit_steps.is_some()
    }

    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Pattern value at `index`, wrapped by the pattern length
    #[inline]
    pub fn is_on(&self, index: usize) -> bool {
        self.pattern[index % self.pattern.len()]
    }

    /// Whether native step `step` sounds once rotation is applied.
    ///
    /// `Continuous` floors the fractional position `step - rotation`, the same
    /// rule the composite resampler uses. `Rounded` rounds the rotation half-up
    /// to whole steps first.
    pub fn step_is_on(&self, step: usize, mode: RotationMode) -> bool {
        let k = self.steps() as i64;
        let rotation = self.wrapped_rotation();
        let step = (step % self.steps()) as i64;
        let shifted = match mode {
            RotationMode::Continuous => (step as f64 - rotation).floor() as i64,
            RotationMode::Rounded => step - (rotation + 0.5).floor() as i64,
        };
        self.is_on(shifted.rem_euclid(k) as usize)
    }

    /// Rotation reduced into `[0, steps)`.
    ///
    /// Whole cycles never change which step sounds, and the reduction is
    /// exact in f64, so every integer conversion downstream stays small.
    pub fn wrapped_rotation(&self) -> f64 {
        let k = self.steps() as f64;
        let wrapped = self.rotation.rem_euclid(k);
        // rem_euclid rounds up to k for tiny negative remainders
        if wrapped >= k {
            0.0
        } else {
            wrapped
        }
    }

    /// Replace the pattern. Clears any explicit step count.
    pub fn set_pattern(&mut self, pattern: Vec<bool>) {
        self.pattern = normalize(pattern);
        self.explicit_steps = None;
    }

    /// Non-finite rotations are treated as no rotation
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = if rotation.is_finite() { rotation } else { 0.0 };
    }

    pub fn set_pitch(&mut self, pitch: i64) {
        self.pitch = clamp_pitch(pitch);
    }

    pub fn set_velocity(&mut self, velocity: i64) {
        self.velocity = clamp_velocity(velocity);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Reverse the step order. Rotation and step count are untouched.
    pub fn reverse(&mut self) {
        self.pattern.reverse();
    }

    /// Canonical `1`/`0` text of the pattern
    pub fn pattern_string(&self) -> String {
        to_pattern_string(&self.pattern)
    }
}

impl Default for PatternLayer {
    fn default() -> Self {
        Self::new(vec![true])
    }
}

impl fmt::Display for PatternLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_mark_string(&self.pattern))?;
        if self.rotation != 0.0 {
            write!(f, " rot {}", self.rotation)?;
        }
        write!(f, " pitch {} vel {}", self.pitch, self.velocity)?;
        if !self.label.is_empty() {
            write!(f, " \"{}\"", self.label)?;
        }
        Ok(())
    }
}

fn normalize(pattern: Vec<bool>) -> Vec<bool> {
    if pattern.is_empty() {
        vec![true]
    } else {
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_empty_pattern_normalized() {
        let layer = PatternLayer::new(vec![]);
        assert_eq!(layer.pattern(), &[true]);
        assert_eq!(layer.steps(), 1);
    }

    #[test]
    fn test_parse_sets_steps() {
        let layer = PatternLayer::parse("x--x-");
        assert_eq!(layer.steps(), 5);
        assert_eq!(layer.pattern_string(), "10010");
    }

    #[test_case(-5, 0 ; "below range")]
    #[test_case(64, 64 ; "in range")]
    #[test_case(300, 127 ; "above range")]
    fn test_pitch_clamped(input: i64, expected: u8) {
        assert_eq!(PatternLayer::default().with_pitch(input).pitch(), expected);
    }

    #[test_case(0, 1 ; "zero")]
    #[test_case(-20, 1 ; "negative")]
    #[test_case(90, 90 ; "in range")]
    #[test_case(1000, 127 ; "above range")]
    fn test_velocity_clamped(input: i64, expected: u8) {
        assert_eq!(PatternLayer::default().with_velocity(input).velocity(), expected);
    }

    #[test]
    fn test_non_finite_rotation_is_zero() {
        let layer = PatternLayer::default().with_rotation(f64::NAN);
        assert_eq!(layer.rotation(), 0.0);
    }

    #[test_case(1e40 ; "huge positive")]
    #[test_case(-1e40 ; "huge negative")]
    #[test_case(-1e19 ; "below i64 range")]
    fn test_huge_rotation_is_whole_cycles(rotation: f64) {
        // Each of these is an exact multiple of 4 steps
        let layer = PatternLayer::parse("1000").with_rotation(rotation);
        assert_eq!(layer.wrapped_rotation(), 0.0);
        for mode in [RotationMode::Continuous, RotationMode::Rounded] {
            let steps: Vec<bool> = (0..4).map(|s| layer.step_is_on(s, mode)).collect();
            assert_eq!(steps, vec![true, false, false, false]);
        }
    }

    #[test]
    fn test_wrapped_rotation_keeps_fraction() {
        let layer = PatternLayer::parse("1000").with_rotation(-1.25);
        assert_eq!(layer.wrapped_rotation(), 2.75);
        for mode in [RotationMode::Continuous, RotationMode::Rounded] {
            let steps: Vec<bool> = (0..4).map(|s| layer.step_is_on(s, mode)).collect();
            assert_eq!(steps, vec![false, false, false, true]);
        }
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let mut layer = PatternLayer::parse("1100101").with_rotation(2.5);
        let original = layer.clone();
        layer.reverse();
        assert_eq!(layer.pattern_string(), "1010011");
        assert_eq!(layer.rotation(), 2.5);
        layer.reverse();
        assert_eq!(layer, original);
    }

    #[test]
    fn test_explicit_steps_wrap_pattern_lookup() {
        let layer = PatternLayer::parse("10").with_explicit_steps(5);
        assert_eq!(layer.steps(), 5);
        assert!(layer.has_explicit_steps());
        // index 4 wraps to pattern index 0, never out of range
        assert!(layer.step_is_on(4, RotationMode::Continuous));
        assert!(!layer.step_is_on(3, RotationMode::Continuous));
    }

    #[test]
    fn test_set_pattern_clears_explicit_steps() {
        let mut layer = PatternLayer::parse("10").with_explicit_steps(5);
        layer.set_pattern(vec![true; 3]);
        assert_eq!(layer.steps(), 3);
        assert!(!layer.has_explicit_steps());
    }

    #[test]
    fn test_explicit_steps_equal_to_length_is_dropped() {
        let layer = PatternLayer::parse("1010").with_explicit_steps(4);
        assert!(!layer.has_explicit_steps());
        let layer = PatternLayer::parse("1010").with_explicit_steps(0);
        assert_eq!(layer.steps(), 4);
    }

    #[test]
    fn test_integer_rotation_modes_agree() {
        let layer = PatternLayer::parse("1000").with_rotation(1.0);
        for mode in [RotationMode::Continuous, RotationMode::Rounded] {
            let on: Vec<bool> = (0..4).map(|s| layer.step_is_on(s, mode)).collect();
            assert_eq!(on, vec![false, true, false, false]);
        }
    }

    #[test]
    fn test_fractional_rotation_modes() {
        let layer = PatternLayer::parse("1000").with_rotation(0.3);
        // continuous: floor(s - 0.3) -> the on-step lands on step 1
        assert!(layer.step_is_on(1, RotationMode::Continuous));
        // rounded: round(0.3) = 0 -> no shift
        assert!(layer.step_is_on(0, RotationMode::Rounded));
    }

    #[test]
    fn test_negative_rotation() {
        let layer = PatternLayer::parse("1000").with_rotation(-1.0);
        assert!(layer.step_is_on(3, RotationMode::Continuous));
        assert!(layer.step_is_on(3, RotationMode::Rounded));
    }

    #[test]
    fn test_display() {
        let layer = PatternLayer::parse("1010").with_pitch(38).with_label("Snare");
        assert_eq!(layer.to_string(), "x-x- pitch 38 vel 100 \"Snare\"");
    }
}
