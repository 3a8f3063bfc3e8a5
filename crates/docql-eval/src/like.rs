//! `LIKE` pattern matching.
//!
//! Patterns compile to a small matcher over code points: `_` matches any
//! single code point, `%` any (possibly empty) run, everything else itself.
//! Matching is case-sensitive and anchored at both ends. With `ESCAPE c`,
//! the escape may precede only `_`, `%`, or `c` itself; any other escape is
//! rejected.

use docql_common::{EvalError, EvalErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LikePart {
    /// `_`
    AnyOne,
    /// `%`
    AnyRun,
    Literal(char),
}

/// Compile a pattern, validating escape usage.
pub(crate) fn compile(pattern: &str, escape: Option<char>) -> Result<Vec<LikePart>, EvalError> {
    let mut parts = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if Some(c) == escape {
            match chars.next() {
                Some(next) if next == '_' || next == '%' || Some(next) == escape => {
                    parts.push(LikePart::Literal(next));
                }
                _ => return Err(EvalError::new(EvalErrorCode::InvalidArguments)),
            }
        } else if c == '_' {
            parts.push(LikePart::AnyOne);
        } else if c == '%' {
            parts.push(LikePart::AnyRun);
        } else {
            parts.push(LikePart::Literal(c));
        }
    }
    Ok(parts)
}

/// Anchored match of the whole text against the compiled pattern.
pub(crate) fn matches(parts: &[LikePart], text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    match_at(parts, &chars)
}

fn match_at(parts: &[LikePart], chars: &[char]) -> bool {
    match parts.split_first() {
        None => chars.is_empty(),
        Some((LikePart::AnyOne, rest)) => {
            !chars.is_empty() && match_at(rest, &chars[1..])
        }
        Some((LikePart::Literal(c), rest)) => {
            chars.first() == Some(c) && match_at(rest, &chars[1..])
        }
        Some((LikePart::AnyRun, rest)) => {
            if rest.is_empty() {
                return true;
            }
            (0..=chars.len()).any(|skip| match_at(rest, &chars[skip..]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_match(pattern: &str, escape: Option<char>, text: &str) -> bool {
        matches(&compile(pattern, escape).unwrap(), text)
    }

    #[test]
    fn underscore_matches_exactly_one_code_point() {
        assert!(is_match("K_mo", None, "Kumo"));
        assert!(!is_match("K_mo", None, "Kuumo"));
        assert!(!is_match("K_mo", None, "Kmo"));
    }

    #[test]
    fn percent_matches_any_run() {
        assert!(is_match("%", None, ""));
        assert!(is_match("K%", None, "Kumo"));
        assert!(is_match("%o", None, "Kumo"));
        assert!(is_match("%u%", None, "Kumo"));
        assert!(!is_match("%x%", None, "Kumo"));
    }

    #[test]
    fn matching_is_anchored_and_case_sensitive() {
        assert!(!is_match("umo", None, "Kumo"));
        assert!(!is_match("kumo", None, "Kumo"));
        assert!(is_match("Kumo", None, "Kumo"));
    }

    #[test]
    fn escape_makes_meta_characters_literal() {
        // `1%[%` with escape `[` means: `1`, any run, then a literal `%`.
        assert!(is_match("1%[%", Some('['), "100%"));
        assert!(!is_match("1%[%", Some('['), "100"));
        // Escaped escape matches itself.
        assert!(is_match("a[[b", Some('['), "a[b"));
    }

    #[test]
    fn escape_before_other_characters_is_rejected() {
        let err = compile("a[bc", Some('[')).unwrap_err();
        assert_eq!(err.code, EvalErrorCode::InvalidArguments);
        // Trailing escape is rejected too.
        assert!(compile("abc[", Some('[')).is_err());
    }

    #[test]
    fn matches_code_points_not_bytes() {
        assert!(is_match("_", None, "é"));
        assert!(is_match("_né", None, "øné"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_text() {
        assert!(is_match("", None, ""));
        assert!(!is_match("", None, "x"));
    }
}
