//! Composite resampling of layers with different step counts.
//!
//! Every layer is sampled on a shared timeline of `lcm(steps...)` slots and
//! the results are OR-ed together, so a 4-step and a 3-step layer overlay on
//! 12 slots without aliasing.

use crate::error::{ChronoError, Result};
use crate::types::pattern_string::to_pattern_string;
use crate::types::PatternLayer;
use num_integer::Integer;

/// Largest composite timeline that will be built
pub const MAX_COMPOSITE_STEPS: usize = 1 << 20;

/// Least common multiple of all layer step counts. An empty input yields 1.
///
/// Fails with `CompositeTooLarge` once the multiple passes
/// `MAX_COMPOSITE_STEPS`.
pub fn composite_steps<'a, I>(layers: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a PatternLayer>,
{
    layers
        .into_iter()
        .map(PatternLayer::steps)
        .try_fold(1usize, |acc, steps| {
            let steps = steps.max(1);
            (acc / acc.gcd(&steps))
                .checked_mul(steps)
                .filter(|&total| total <= MAX_COMPOSITE_STEPS)
                .ok_or(ChronoError::CompositeTooLarge {
                    limit: MAX_COMPOSITE_STEPS,
                })
        })
}

/// Whether `layer` is on at composite slot `index` of a timeline with
/// `total` slots.
///
/// The native position is `(index / total) * k - rotation`, floored and
/// wrapped into `[0, k)`. The integer part is computed exactly: with
/// `index * k = a * total + b` and `rotation = n + f` (`f` in `[0, 1)`),
/// `floor(pos) = a - n - [b < f * total]`.
pub fn layer_contribution(layer: &PatternLayer, index: usize, total: usize) -> bool {
    let total = total.max(1) as u128;
    let k = layer.steps() as i128;
    let scaled = (index as u128 % total) * k as u128;
    let whole = (scaled / total) as i128;
    let remainder = (scaled % total) as f64;

    // In [0, k), so the whole part always fits
    let rotation = layer.wrapped_rotation();
    let rot_whole = rotation.floor();
    let rot_frac = rotation - rot_whole;

    let borrow = i128::from(remainder < rot_frac * total as f64);
    let base = (whole - rot_whole as i128 - borrow).rem_euclid(k);
    layer.is_on(base as usize)
}

/// Composite bit sequence of length `composite_steps(layers)`.
/// An empty input yields a single off-step.
pub fn compute_composite(layers: &[PatternLayer]) -> Result<Vec<bool>> {
    let total = composite_steps(layers)?;
    Ok((0..total)
        .map(|i| layers.iter().any(|layer| layer_contribution(layer, i, total)))
        .collect())
}

/// One layer resampled onto a timeline of `total` slots
pub fn resample_layer(layer: &PatternLayer, total: usize) -> Vec<bool> {
    (0..total.max(1))
        .map(|i| layer_contribution(layer, i, total))
        .collect()
}

/// Composite in canonical `1`/`0` text form
pub fn composite_pattern_string(layers: &[PatternLayer]) -> Result<String> {
    Ok(to_pattern_string(&compute_composite(layers)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layer(text: &str) -> PatternLayer {
        PatternLayer::parse(text)
    }

    #[test]
    fn test_empty_composite_is_single_off_step() {
        let empty: Vec<PatternLayer> = Vec::new();
        assert_eq!(composite_steps(&empty).unwrap(), 1);
        assert_eq!(compute_composite(&[]).unwrap(), vec![false]);
    }

    #[test]
    fn test_lcm_length() {
        let layers = vec![layer("1000"), layer("101"), layer("10")];
        assert_eq!(composite_steps(&layers).unwrap(), 12);
        assert_eq!(compute_composite(&layers).unwrap().len(), 12);
    }

    #[test]
    fn test_single_layer_composites_to_itself() {
        let l = layer("1101001");
        assert_eq!(compute_composite(std::slice::from_ref(&l)).unwrap(), l.pattern());
    }

    #[test]
    fn test_two_layer_example() {
        let layers = vec![layer("1000"), layer("101")];
        // A holds its on-step for 3 slots, B for 4
        assert_eq!(composite_pattern_string(&layers).unwrap(), "111100001111");
        assert!(compute_composite(&layers).unwrap()[0]);
    }

    #[test]
    fn test_always_on_single_step_dominates() {
        let layers = vec![layer("0000000"), layer("1"), layer("00000")];
        assert!(compute_composite(&layers).unwrap().iter().all(|&on| on));
    }

    #[test]
    fn test_integer_rotation() {
        let l = layer("1000").with_rotation(1.0);
        assert_eq!(resample_layer(&l, 4), vec![false, true, false, false]);
        let l = layer("1000").with_rotation(-1.0);
        assert_eq!(resample_layer(&l, 4), vec![false, false, false, true]);
    }

    #[test]
    fn test_full_cycle_rotation_is_noop() {
        let base = layer("1100101");
        let rotated = base.clone().with_rotation(7.0);
        assert_eq!(resample_layer(&base, 14), resample_layer(&rotated, 14));
        let with_other = |l: &PatternLayer| compute_composite(&[l.clone(), layer("100")]).unwrap();
        assert_eq!(with_other(&base), with_other(&rotated));
    }

    #[test]
    fn test_fractional_rotation_on_finer_grid() {
        // Half a step on a 2-step layer, sampled at 4 slots alongside a 4-step layer
        let l = layer("10").with_rotation(0.5);
        let layers = vec![l.clone(), layer("0000")];
        // pos = i/4*2 - 0.5 -> -0.5, 0.0, 0.5, 1.0 -> floor 1, 0, 0, 1
        assert_eq!(compute_composite(&layers).unwrap(), vec![false, true, true, false]);
        assert_eq!(resample_layer(&l, 4), vec![false, true, true, false]);
    }

    #[test]
    fn test_fractional_rotation_on_native_grid() {
        // pos = s - 0.25 floors to s - 1
        let l = layer("1000").with_rotation(0.25);
        assert_eq!(resample_layer(&l, 4), vec![false, true, false, false]);
    }

    #[test]
    fn test_explicit_steps_use_steps_for_lcm() {
        let l = layer("10").with_explicit_steps(3);
        assert_eq!(composite_steps(std::slice::from_ref(&l)).unwrap(), 3);
        assert_eq!(resample_layer(&l, 3), vec![true, false, true]);
    }

    #[test]
    fn test_huge_rotations_resample_like_whole_cycles() {
        let base = layer("1000");
        for rotation in [1e40, -1e40, -1e19, 1e19] {
            let rotated = base.clone().with_rotation(rotation);
            assert_eq!(resample_layer(&rotated, 4), resample_layer(&base, 4));
            assert_eq!(resample_layer(&rotated, 12), resample_layer(&base, 12));
        }
    }

    #[test]
    fn test_negative_fractional_rotation_wraps() {
        // -1.25 is the same phase as 2.75
        let l = layer("1000").with_rotation(-1.25);
        assert_eq!(resample_layer(&l, 4), vec![false, false, false, true]);
    }

    #[test]
    fn test_prime_layers_exceed_the_cap() {
        let primes = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
        let layers: Vec<PatternLayer> = primes
            .iter()
            .map(|&p| PatternLayer::new(vec![true; p]))
            .collect();
        assert!(matches!(
            composite_steps(&layers),
            Err(ChronoError::CompositeTooLarge { .. })
        ));
        assert!(matches!(
            compute_composite(&layers[4..12]),
            Err(ChronoError::CompositeTooLarge { .. })
        ));
        // 2*3*5*7*11*13 stays well inside
        assert_eq!(composite_steps(&layers[..6]).unwrap(), 30_030);
    }
}
