//! Compact text form of step patterns.
//!
//! `1`, `x` and `X` mark an on-step, `0` and `-` a blank one. Parsing drops
//! every other character; the canonical rendering is `1`/`0`, the
//! mark/blank rendering is `x`/`-`.

/// Glyph written for an on-step in mark/blank form
pub const MARK: char = 'x';
/// Glyph written for an off-step in mark/blank form
pub const BLANK: char = '-';

/// Classify a single glyph. `None` for characters that carry no step.
#[inline]
pub fn glyph_value(c: char) -> Option<bool> {
    match c {
        '1' | 'x' | 'X' => Some(true),
        '0' | '-' => Some(false),
        _ => None,
    }
}

/// Parse pattern text into steps. Never fails: text without any
/// recognized glyph yields a single on-step.
pub fn parse_pattern(text: &str) -> Vec<bool> {
    let steps: Vec<bool> = text.trim().chars().filter_map(glyph_value).collect();
    if steps.is_empty() {
        vec![true]
    } else {
        steps
    }
}

/// Parse a token sequence (e.g. command arguments) as one pattern
pub fn parse_pattern_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<bool> {
    let joined: String = tokens.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(" ");
    parse_pattern(&joined)
}

/// Canonical `1`/`0` rendering
pub fn to_pattern_string(steps: &[bool]) -> String {
    steps.iter().map(|&on| if on { '1' } else { '0' }).collect()
}

/// `x`/`-` rendering
pub fn to_mark_string(steps: &[bool]) -> String {
    steps.iter().map(|&on| if on { MARK } else { BLANK }).collect()
}

/// Reformat existing text from `1`/`0` to `x`/`-`, passing every other
/// character through unchanged.
pub fn relabel_glyphs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '1' => MARK,
            '0' => BLANK,
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1010", &[true, false, true, false] ; "digits")]
    #[test_case("x-x-", &[true, false, true, false] ; "marks")]
    #[test_case("X - x", &[true, false, true] ; "mixed with spaces")]
    #[test_case("1a0b1", &[true, false, true] ; "drops unknown glyphs")]
    fn test_parse_pattern(input: &str, expected: &[bool]) {
        assert_eq!(parse_pattern(input), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    #[test_case("hello" ; "no glyphs")]
    fn test_parse_degrades_to_single_on_step(input: &str) {
        assert_eq!(parse_pattern(input), vec![true]);
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(
            parse_pattern_tokens(&["10", "x-"]),
            vec![true, false, true, false]
        );
        let none: [&str; 0] = [];
        assert_eq!(parse_pattern_tokens(&none), vec![true]);
    }

    #[test]
    fn test_canonical_roundtrip() {
        for text in ["1", "0", "1001", "0000000001", "1111"] {
            assert_eq!(to_pattern_string(&parse_pattern(text)), text);
        }
        for text in ["x", "x--x", "-x-x-x"] {
            assert_eq!(to_mark_string(&parse_pattern(text)), text);
        }
    }

    #[test]
    fn test_non_canonical_characters_are_not_roundtripped() {
        assert_eq!(to_pattern_string(&parse_pattern("1 0|1")), "101");
    }

    #[test]
    fn test_relabel_is_lossless_for_other_characters() {
        assert_eq!(relabel_glyphs("1 0|1"), "x -|x");
        assert_eq!(relabel_glyphs("text 1010"), "text x-x-");
    }
}
