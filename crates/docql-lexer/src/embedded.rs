//! Backtick-quoted embedded literals.
//!
//! The body between the backticks is a value in the embedding data syntax,
//! which may itself contain backticks inside its own strings and comments.
//! This permissive sub-scanner only finds the closing backtick; the body is
//! then handed to the document text reader for actual parsing.

use docql_common::{LexError, LexErrorKind, PositionTracker};

/// Scan the body of an embedded literal. The opening backtick has already
/// been consumed; on success the closing backtick has been consumed too and
/// the returned string is everything in between.
pub(crate) fn scan_embedded(
    chars: &[char],
    index: &mut usize,
    tracker: &mut PositionTracker,
) -> Result<String, LexError> {
    let mut body = String::new();

    let mut bump = |index: &mut usize, tracker: &mut PositionTracker| -> Option<char> {
        let c = *chars.get(*index)?;
        *index += 1;
        tracker.advance(c);
        Some(c)
    };

    loop {
        let Some(c) = bump(index, tracker) else {
            return Err(LexError::new(LexErrorKind::UnexpectedEof, tracker.position()));
        };
        match c {
            '`' => return Ok(body),

            // Double-quoted string with backslash escapes.
            '"' => {
                body.push(c);
                loop {
                    let Some(c) = bump(index, tracker) else {
                        return Err(LexError::new(
                            LexErrorKind::UnexpectedEof,
                            tracker.position(),
                        ));
                    };
                    body.push(c);
                    match c {
                        '\\' => {
                            if let Some(escaped) = bump(index, tracker) {
                                body.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }

            // Single-quoted symbol or triple-quoted long string.
            '\'' => {
                body.push(c);
                let triple = chars.get(*index) == Some(&'\'')
                    && chars.get(*index + 1) == Some(&'\'');
                if triple {
                    body.push(bump(index, tracker).unwrap_or('\''));
                    body.push(bump(index, tracker).unwrap_or('\''));
                    // Scan to the closing `'''`.
                    let mut quotes = 0;
                    loop {
                        let Some(c) = bump(index, tracker) else {
                            return Err(LexError::new(
                                LexErrorKind::UnexpectedEof,
                                tracker.position(),
                            ));
                        };
                        body.push(c);
                        match c {
                            '\\' => {
                                quotes = 0;
                                if let Some(escaped) = bump(index, tracker) {
                                    body.push(escaped);
                                }
                            }
                            '\'' => {
                                quotes += 1;
                                if quotes == 3 {
                                    break;
                                }
                            }
                            _ => quotes = 0,
                        }
                    }
                } else {
                    loop {
                        let Some(c) = bump(index, tracker) else {
                            return Err(LexError::new(
                                LexErrorKind::UnexpectedEof,
                                tracker.position(),
                            ));
                        };
                        body.push(c);
                        match c {
                            '\\' => {
                                if let Some(escaped) = bump(index, tracker) {
                                    body.push(escaped);
                                }
                            }
                            '\'' => break,
                            _ => {}
                        }
                    }
                }
            }

            // `//` line comment and `/* */` block comment.
            '/' => {
                body.push(c);
                match chars.get(*index) {
                    Some('/') => {
                        while let Some(c) = bump(index, tracker) {
                            body.push(c);
                            if c == '\n' || c == '\r' {
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        body.push(bump(index, tracker).unwrap_or('*'));
                        let mut star = false;
                        loop {
                            let Some(c) = bump(index, tracker) else {
                                return Err(LexError::new(
                                    LexErrorKind::UnexpectedEof,
                                    tracker.position(),
                                ));
                            };
                            body.push(c);
                            if star && c == '/' {
                                break;
                            }
                            star = c == '*';
                        }
                    }
                    _ => {}
                }
            }

            _ => body.push(c),
        }
    }
}
