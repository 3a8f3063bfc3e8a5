use std::fmt;

use serde::Serialize;

/// 1-indexed line/column position of a code point in query source text.
///
/// Every token carries the position of its first code point, and every
/// user-facing error carries the position it was raised at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    /// Create a new position from 1-indexed line and column numbers.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tracks the position of the most recently consumed code point.
///
/// `CR`, `LF`, and `CR LF` all count as a single newline. The column resets
/// to zero on a newline and increments on every other code point, so the
/// first visible code point of a line sits at column 1.
#[derive(Debug)]
pub struct PositionTracker {
    line: u32,
    column: u32,
    after_cr: bool,
}

impl PositionTracker {
    /// Create a tracker positioned before the first code point (line 1, column 0).
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 0,
            after_cr: false,
        }
    }

    /// Consume one code point and move the tracked position onto it.
    pub fn advance(&mut self, c: char) {
        match c {
            '\r' => {
                self.line += 1;
                self.column = 0;
                self.after_cr = true;
            }
            '\n' => {
                // An LF directly after a CR is the second half of one newline.
                if !self.after_cr {
                    self.line += 1;
                    self.column = 0;
                }
                self.after_cr = false;
            }
            _ => {
                self.column += 1;
                self.after_cr = false;
            }
        }
    }

    /// Position of the most recently consumed code point.
    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(source: &str) -> Vec<(char, SourcePosition)> {
        let mut tracker = PositionTracker::new();
        source
            .chars()
            .map(|c| {
                tracker.advance(c);
                (c, tracker.position())
            })
            .collect()
    }

    #[test]
    fn single_line_columns() {
        let positions = track("abc");
        assert_eq!(positions[0].1, SourcePosition::new(1, 1));
        assert_eq!(positions[1].1, SourcePosition::new(1, 2));
        assert_eq!(positions[2].1, SourcePosition::new(1, 3));
    }

    #[test]
    fn lf_starts_a_new_line() {
        let positions = track("a\nb");
        assert_eq!(positions[2].1, SourcePosition::new(2, 1));
    }

    #[test]
    fn cr_starts_a_new_line() {
        let positions = track("a\rb");
        assert_eq!(positions[2].1, SourcePosition::new(2, 1));
    }

    #[test]
    fn crlf_is_one_newline() {
        let positions = track("a\r\nb");
        assert_eq!(positions[3].1, SourcePosition::new(2, 1));
    }

    #[test]
    fn lf_lf_is_two_newlines() {
        let positions = track("a\n\nb");
        assert_eq!(positions[3].1, SourcePosition::new(3, 1));
    }

    #[test]
    fn display_is_line_colon_column() {
        assert_eq!(SourcePosition::new(3, 14).to_string(), "3:14");
    }
}
