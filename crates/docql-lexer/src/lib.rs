// DocQL lexer -- scans query text into a stream of positioned tokens.
//
// The scan is driven by the state table in `table.rs`: maximal munch over
// code points, flushing a token whenever no transition exists out of a
// terminal node. Whitespace and comments flush as suppressed tokens.

mod embedded;
mod table;

use std::str::FromStr;

use docql_common::{
    is_keyword, is_word_operator, LexError, LexErrorKind, PositionTracker, SourcePosition,
    TokenType,
};
use docql_value::{parse_value, Value};
use rust_decimal::Decimal;

use table::{LexTable, LexType, NodeId, Replacement, StateKind};

/// A positioned token.
///
/// The payload is a document value: lower-cased keyword or canonical
/// operator text as a symbol, identifier text as a symbol, or the literal
/// itself. Punctuation carries no payload.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub value: Option<Value>,
    pub position: SourcePosition,
}

impl Token {
    /// Text payload, if the payload is textual.
    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_text)
    }

    /// Whether this is the given keyword (keyword text is lower-cased).
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.text() == Some(keyword)
    }

    /// Whether this is the given operator (canonical form).
    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.text() == Some(operator)
    }
}

/// Scan `source` into a finite token list.
///
/// Any character without a transition aborts the scan, as does end of
/// input in the middle of a token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    index: usize,
    tracker: PositionTracker,
    table: &'static LexTable,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            tracker: PositionTracker::new(),
            table: table::lex_table(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let initial = self.table.initial;

        let mut node: NodeId = initial;
        let mut text = String::new();
        let mut position = SourcePosition::new(1, 1);

        loop {
            if node == initial {
                let Some(&c) = self.chars.get(self.index) else {
                    break;
                };

                // Embedded literals are handed to a sub-scanner; the whole
                // backtick-quoted body becomes one literal token.
                if c == '`' {
                    self.bump(c);
                    position = self.tracker.position();
                    let body =
                        embedded::scan_embedded(&self.chars, &mut self.index, &mut self.tracker)?;
                    tokens.push(embedded_token(&body, position)?);
                    continue;
                }

                match self.step(initial, c)? {
                    Some(next) => {
                        self.bump(c);
                        position = self.tracker.position();
                        text.clear();
                        self.accumulate(&mut text, next, c);
                        node = next;
                    }
                    None => {
                        self.bump(c);
                        return Err(LexError::new(
                            LexErrorKind::InvalidCharacter(c),
                            self.tracker.position(),
                        ));
                    }
                }
                continue;
            }

            let Some(&c) = self.chars.get(self.index) else {
                // End of input: a terminal node flushes, anything else is
                // a truncated token.
                if !self.table.node(node).kind.ends_token() {
                    return Err(LexError::new(
                        LexErrorKind::UnexpectedEof,
                        self.tracker.position(),
                    ));
                }
                self.flush(&mut tokens, node, &text, position)?;
                node = initial;
                continue;
            };

            match self.step(node, c)? {
                Some(next) => {
                    self.bump(c);
                    self.accumulate(&mut text, next, c);
                    node = next;
                }
                None => {
                    if self.table.node(node).kind.ends_token() {
                        // Flush and reprocess `c` from the initial state.
                        self.flush(&mut tokens, node, &text, position)?;
                        node = initial;
                    } else {
                        self.bump(c);
                        return Err(LexError::new(
                            LexErrorKind::InvalidCharacter(c),
                            self.tracker.position(),
                        ));
                    }
                }
            }
        }

        Ok(tokens)
    }

    /// One table transition; an explicit Error node aborts immediately.
    fn step(&mut self, from: NodeId, c: char) -> Result<Option<NodeId>, LexError> {
        match self.table.lookup(from, c) {
            Some(next) if self.table.node(next).kind == StateKind::Error => {
                self.bump(c);
                Err(LexError::new(
                    LexErrorKind::InvalidCharacter(c),
                    self.tracker.position(),
                ))
            }
            other => Ok(other),
        }
    }

    fn bump(&mut self, c: char) {
        self.index += 1;
        self.tracker.advance(c);
    }

    fn accumulate(&self, text: &mut String, node: NodeId, c: char) {
        match self.table.node(node).replacement {
            Replacement::Same => text.push(c),
            Replacement::Nothing => {}
        }
    }

    fn flush(
        &self,
        tokens: &mut Vec<Token>,
        node: NodeId,
        text: &str,
        position: SourcePosition,
    ) -> Result<(), LexError> {
        let node = self.table.node(node);
        let token = match node.lex_type {
            LexType::Whitespace => return Ok(()),
            LexType::Word => word_token(text, position),
            LexType::Operator => Token {
                token_type: TokenType::Operator,
                value: Some(Value::symbol(canonical_operator(text))),
                position,
            },
            LexType::Int => Token {
                token_type: TokenType::Literal,
                value: Some(Value::int(parse_int(text, position)?)),
                position,
            },
            LexType::Decimal => Token {
                token_type: TokenType::Literal,
                value: Some(Value::decimal(parse_decimal(text, position)?)),
                position,
            },
            LexType::ENotation => Token {
                token_type: TokenType::Literal,
                value: Some(Value::decimal(parse_e_notation(text, position)?)),
                position,
            },
            LexType::SqString => Token {
                token_type: TokenType::Literal,
                value: Some(Value::string(text)),
                position,
            },
            LexType::DqIdentifier => Token {
                token_type: TokenType::Identifier,
                value: Some(Value::symbol(text)),
                position,
            },
            LexType::None => {
                let token_type = node
                    .token_type
                    .unwrap_or(TokenType::Operator);
                Token {
                    token_type,
                    value: None,
                    position,
                }
            }
        };
        tokens.push(token);
        Ok(())
    }
}

/// Resolve an identifier-shaped word: boolean literal, keyword, word
/// operator, or plain identifier.
fn word_token(text: &str, position: SourcePosition) -> Token {
    let lower = text.to_lowercase();
    if lower == "true" || lower == "false" {
        return Token {
            token_type: TokenType::Literal,
            value: Some(Value::bool(lower == "true")),
            position,
        };
    }
    if is_keyword(&lower) {
        return Token {
            token_type: TokenType::Keyword,
            value: Some(Value::symbol(lower)),
            position,
        };
    }
    if is_word_operator(&lower) {
        return Token {
            token_type: TokenType::Operator,
            value: Some(Value::symbol(lower)),
            position,
        };
    }
    Token {
        token_type: TokenType::Identifier,
        value: Some(Value::symbol(text)),
        position,
    }
}

/// Operator alias normalization.
fn canonical_operator(text: &str) -> String {
    match text {
        "!=" => "<>".to_string(),
        other => other.to_string(),
    }
}

fn parse_int(text: &str, position: SourcePosition) -> Result<i64, LexError> {
    i64::from_str(text)
        .map_err(|_| LexError::new(LexErrorKind::InvalidNumberLiteral(text.to_string()), position))
}

/// `.5` and `-.5` need a leading zero for the decimal parser.
fn normalize_decimal_text(text: &str) -> String {
    if let Some(rest) = text.strip_prefix('.') {
        format!("0.{rest}")
    } else if let Some(rest) = text.strip_prefix("-.") {
        format!("-0.{rest}")
    } else if let Some(rest) = text.strip_prefix("+.") {
        format!("0.{rest}")
    } else {
        text.to_string()
    }
}

fn parse_decimal(text: &str, position: SourcePosition) -> Result<Decimal, LexError> {
    Decimal::from_str(&normalize_decimal_text(text))
        .map_err(|_| LexError::new(LexErrorKind::InvalidNumberLiteral(text.to_string()), position))
}

fn parse_e_notation(text: &str, position: SourcePosition) -> Result<Decimal, LexError> {
    let normalized = normalize_decimal_text(text).to_lowercase();
    Decimal::from_scientific(&normalized)
        .map_err(|_| LexError::new(LexErrorKind::InvalidNumberLiteral(text.to_string()), position))
}

fn embedded_token(body: &str, position: SourcePosition) -> Result<Token, LexError> {
    let value = parse_value(body).map_err(|e| {
        LexError::new(LexErrorKind::InvalidEmbeddedLiteral(e.message), position)
    })?;
    Ok(Token {
        token_type: TokenType::Literal,
        value: Some(value),
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn punctuation_tokens_have_distinct_types() {
        assert_eq!(
            kinds("( ) [ ] { } : , *"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBracket,
                TokenType::RightBracket,
                TokenType::LeftCurly,
                TokenType::RightCurly,
                TokenType::Colon,
                TokenType::Comma,
                TokenType::Star,
            ]
        );
    }

    #[test]
    fn keywords_lower_case_and_identifiers_preserve_case() {
        let tokens = tokenize("SELECT Foo").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Keyword);
        assert_eq!(tokens[0].text(), Some("select"));
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].text(), Some("Foo"));
    }

    #[test]
    fn word_operators_lex_as_operators() {
        let tokens = tokenize("a AND b").unwrap();
        assert_eq!(tokens[1].token_type, TokenType::Operator);
        assert_eq!(tokens[1].text(), Some("and"));
    }

    #[test]
    fn bang_eq_is_aliased_to_diamond() {
        let tokens = tokenize("a != b").unwrap();
        assert_eq!(tokens[1].text(), Some("<>"));
        let tokens = tokenize("a <> b").unwrap();
        assert_eq!(tokens[1].text(), Some("<>"));
    }

    #[test]
    fn single_quoted_strings_strip_quotes_and_collapse_doubling() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Literal);
        assert_eq!(tokens[0].text(), Some("it's"));
    }

    #[test]
    fn double_quoted_identifiers_preserve_case() {
        let tokens = tokenize("\"MiXeD\"").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[0].text(), Some("MiXeD"));
    }

    #[test]
    fn comments_are_suppressed() {
        assert_eq!(kinds("1 -- comment\n2"), vec![TokenType::Literal, TokenType::Literal]);
        assert_eq!(kinds("1 /* x */ 2"), vec![TokenType::Literal, TokenType::Literal]);
    }

    #[test]
    fn invalid_character_aborts_with_position() {
        let err = tokenize("a ^ b").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidCharacter('^'));
        assert_eq!(err.position, SourcePosition::new(1, 3));
    }

    #[test]
    fn eof_inside_token_aborts() {
        let err = tokenize("'open").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedEof);
        let err = tokenize("/* open").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedEof);
    }

    #[test]
    fn positions_are_of_the_first_code_point() {
        let tokens = tokenize("5 BETWEEN 1  10").unwrap();
        let positions: Vec<(u32, u32)> = tokens
            .iter()
            .map(|t| (t.position.line, t.position.column))
            .collect();
        assert_eq!(positions, vec![(1, 1), (1, 3), (1, 11), (1, 14)]);
    }

    #[test]
    fn newlines_reset_columns() {
        let tokens = tokenize("a\nbb\r\nc").unwrap();
        let positions: Vec<(u32, u32)> = tokens
            .iter()
            .map(|t| (t.position.line, t.position.column))
            .collect();
        assert_eq!(positions, vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn embedded_literal_parses_body() {
        let tokens = tokenize("`[1, 2]`").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Literal);
        let value = tokens[0].value.as_ref().unwrap();
        assert_eq!(value.size(), Some(2));
    }

    #[test]
    fn int_literal_out_of_range_is_an_error() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::InvalidNumberLiteral(_)));
    }
}
