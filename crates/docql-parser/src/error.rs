//! Constructors for parse errors.
//!
//! Every error carries the position, type, and payload of the token it was
//! raised at, plus whatever kind-specific properties its code calls for.

use docql_common::{ParseError, ParseErrorCode, Property, PropertyValue, TokenType};
use docql_lexer::Token;

/// An error at the given token (or at end of input when `None`).
pub(crate) fn at_token(code: ParseErrorCode, token: Option<&Token>) -> ParseError {
    let mut error = ParseError::new(code);
    if let Some(token) = token {
        error = error
            .with(
                Property::LineNumber,
                PropertyValue::Integer(i64::from(token.position.line)),
            )
            .with(
                Property::ColumnNumber,
                PropertyValue::Integer(i64::from(token.position.column)),
            )
            .with(
                Property::TokenType,
                PropertyValue::TokenType(token.token_type),
            );
        if let Some(value) = &token.value {
            error = error.with(Property::TokenValue, PropertyValue::Text(value.to_string()));
        }
    }
    error
}

pub(crate) fn expected_keyword(keyword: &str, token: Option<&Token>) -> ParseError {
    at_token(ParseErrorCode::ExpectedKeyword, token).with(
        Property::Keyword,
        PropertyValue::Text(keyword.to_uppercase()),
    )
}

pub(crate) fn expected_token_type(expected: TokenType, token: Option<&Token>) -> ParseError {
    at_token(ParseErrorCode::ExpectedTokenType, token).with(
        Property::ExpectedTokenType,
        PropertyValue::TokenType(expected),
    )
}

pub(crate) fn expected_2_token_types(
    first: TokenType,
    second: TokenType,
    token: Option<&Token>,
) -> ParseError {
    at_token(ParseErrorCode::Expected2TokenTypes, token)
        .with(
            Property::ExpectedTokenType1Of2,
            PropertyValue::TokenType(first),
        )
        .with(
            Property::ExpectedTokenType2Of2,
            PropertyValue::TokenType(second),
        )
}

pub(crate) fn cast_arity(
    type_name: &str,
    min: usize,
    max: usize,
    token: Option<&Token>,
) -> ParseError {
    at_token(ParseErrorCode::CastArity, token)
        .with(Property::ExpectedArityMin, PropertyValue::Integer(min as i64))
        .with(Property::ExpectedArityMax, PropertyValue::Integer(max as i64))
        .with(
            Property::CastTo,
            PropertyValue::Text(type_name.to_uppercase()),
        )
}
