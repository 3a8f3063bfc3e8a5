//! The token-stream parser.
//!
//! Expressions go through precedence climbing in `expressions`; the SELECT
//! statement form is recursive descent in `select`.

mod expressions;
mod select;

use docql_common::{ParseError, ParseErrorCode, TokenType};
use docql_lexer::Token;

use crate::ast::Expr;
use crate::error;

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Parse one expression spanning the whole token stream.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = expressions::parse_expr(&mut self, 0)?;
        if let Some(token) = self.peek() {
            return Err(error::at_token(ParseErrorCode::UnexpectedToken, Some(token)));
        }
        Ok(expr)
    }

    // ── Token stream access ────────────────────────────────────────────

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// The most recently consumed token; error context at end of input.
    pub(crate) fn last(&self) -> Option<&Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    /// The token a parse error should point at: the current one, or the
    /// last one when the stream is exhausted.
    pub(crate) fn error_context(&self) -> Option<&Token> {
        self.peek().or_else(|| self.last())
    }

    // ── Conditional consumption ────────────────────────────────────────

    pub(crate) fn eat_token(&mut self, token_type: TokenType) -> bool {
        if self.peek().map(|t| t.token_type) == Some(token_type) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_operator(&mut self, operator: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_operator(operator)) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    // ── Required consumption ───────────────────────────────────────────

    pub(crate) fn expect_token(&mut self, token_type: TokenType) -> Result<Token, ParseError> {
        if self.peek().map(|t| t.token_type) == Some(token_type) {
            Ok(self.advance().expect("peeked token must advance"))
        } else {
            Err(error::expected_token_type(token_type, self.error_context()))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(error::expected_keyword(keyword, self.error_context()))
        }
    }
}
