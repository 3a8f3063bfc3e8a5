use std::fmt;

use serde::Serialize;

use crate::pos::SourcePosition;
use crate::token::TokenType;

/// Keys of the structured property map attached to every engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Property {
    LineNumber,
    ColumnNumber,
    TokenType,
    TokenValue,
    Keyword,
    ExpectedTokenType,
    ExpectedTokenType1Of2,
    ExpectedTokenType2Of2,
    ExpectedArityMin,
    ExpectedArityMax,
    CastFrom,
    CastTo,
}

impl Property {
    /// The canonical upper-case name of this property key.
    pub fn name(&self) -> &'static str {
        match self {
            Property::LineNumber => "LINE_NUMBER",
            Property::ColumnNumber => "COLUMN_NUMBER",
            Property::TokenType => "TOKEN_TYPE",
            Property::TokenValue => "TOKEN_VALUE",
            Property::Keyword => "KEYWORD",
            Property::ExpectedTokenType => "EXPECTED_TOKEN_TYPE",
            Property::ExpectedTokenType1Of2 => "EXPECTED_TOKEN_TYPE_1_OF_2",
            Property::ExpectedTokenType2Of2 => "EXPECTED_TOKEN_TYPE_2_OF_2",
            Property::ExpectedArityMin => "EXPECTED_ARITY_MIN",
            Property::ExpectedArityMax => "EXPECTED_ARITY_MAX",
            Property::CastFrom => "CAST_FROM",
            Property::CastTo => "CAST_TO",
        }
    }
}

/// A value stored under a [`Property`] key.
///
/// Token payloads are stored as their document-text rendering so the map
/// stays self-contained in this leaf crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValue {
    Integer(i64),
    Text(String),
    TokenType(TokenType),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::TokenType(t) => f.write_str(t.name()),
        }
    }
}

/// Ordered map of error properties.
///
/// Kept as a sorted vector of pairs: the key space is tiny and rendering
/// wants a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyMap {
    entries: Vec<(Property, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value under `key`.
    pub fn insert(&mut self, key: Property, value: PropertyValue) {
        match self.entries.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (key, value)),
        }
    }

    pub fn get(&self, key: Property) -> Option<&PropertyValue> {
        self.entries
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The source position recorded in this map, if any.
    pub fn position(&self) -> Option<SourcePosition> {
        let line = match self.get(Property::LineNumber)? {
            PropertyValue::Integer(n) => *n,
            _ => return None,
        };
        let column = match self.get(Property::ColumnNumber)? {
            PropertyValue::Integer(n) => *n,
            _ => return None,
        };
        Some(SourcePosition::new(line as u32, column as u32))
    }
}

/// Error codes raised while turning tokens into an AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorCode {
    ExpectedKeyword,
    ExpectedTypeName,
    MissingIdentAfterAt,
    UnexpectedToken,
    UnexpectedKeyword,
    InvalidPathComponent,
    CastArity,
    InvalidTypeParam,
    ExpectedWhenClause,
    UnexpectedOperator,
    ExpectedExpression,
    ExpectedTokenType,
    Expected2TokenTypes,
    ExpectedLeftParenAfterCast,
    ExpectedLeftParenValueConstructor,
    UnexpectedTerm,
    SelectMissingFrom,
    UnsupportedLiteralsGroupBy,
    ExpectedIdentForAlias,
    ExpectedIdentForAt,
    ExpectedLeftParenBuiltinFunctionCall,
    ExpectedRightParenBuiltinFunctionCall,
    ExpectedArgumentDelimiter,
}

impl ParseErrorCode {
    pub fn name(&self) -> &'static str {
        match self {
            ParseErrorCode::ExpectedKeyword => "PARSE_EXPECTED_KEYWORD",
            ParseErrorCode::ExpectedTypeName => "PARSE_EXPECTED_TYPE_NAME",
            ParseErrorCode::MissingIdentAfterAt => "PARSE_MISSING_IDENT_AFTER_AT",
            ParseErrorCode::UnexpectedToken => "PARSE_UNEXPECTED_TOKEN",
            ParseErrorCode::UnexpectedKeyword => "PARSE_UNEXPECTED_KEYWORD",
            ParseErrorCode::InvalidPathComponent => "PARSE_INVALID_PATH_COMPONENT",
            ParseErrorCode::CastArity => "PARSE_CAST_ARITY",
            ParseErrorCode::InvalidTypeParam => "PARSE_INVALID_TYPE_PARAM",
            ParseErrorCode::ExpectedWhenClause => "PARSE_EXPECTED_WHEN_CLAUSE",
            ParseErrorCode::UnexpectedOperator => "PARSE_UNEXPECTED_OPERATOR",
            ParseErrorCode::ExpectedExpression => "PARSE_EXPECTED_EXPRESSION",
            ParseErrorCode::ExpectedTokenType => "PARSE_EXPECTED_TOKEN_TYPE",
            ParseErrorCode::Expected2TokenTypes => "PARSE_EXPECTED_2_TOKEN_TYPES",
            ParseErrorCode::ExpectedLeftParenAfterCast => "PARSE_EXPECTED_LEFT_PAREN_AFTER_CAST",
            ParseErrorCode::ExpectedLeftParenValueConstructor => {
                "PARSE_EXPECTED_LEFT_PAREN_VALUE_CONSTRUCTOR"
            }
            ParseErrorCode::UnexpectedTerm => "PARSE_UNEXPECTED_TERM",
            ParseErrorCode::SelectMissingFrom => "PARSE_SELECT_MISSING_FROM",
            ParseErrorCode::UnsupportedLiteralsGroupBy => "PARSE_UNSUPPORTED_LITERALS_GROUPBY",
            ParseErrorCode::ExpectedIdentForAlias => "PARSE_EXPECTED_IDENT_FOR_ALIAS",
            ParseErrorCode::ExpectedIdentForAt => "PARSE_EXPECTED_IDENT_FOR_AT",
            ParseErrorCode::ExpectedLeftParenBuiltinFunctionCall => {
                "PARSE_EXPECTED_LEFT_PAREN_BUILTIN_FUNCTION_CALL"
            }
            ParseErrorCode::ExpectedRightParenBuiltinFunctionCall => {
                "PARSE_EXPECTED_RIGHT_PAREN_BUILTIN_FUNCTION_CALL"
            }
            ParseErrorCode::ExpectedArgumentDelimiter => "PARSE_EXPECTED_ARGUMENT_DELIMITER",
        }
    }
}

/// Error codes raised while executing an AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvalErrorCode {
    CastFailed,
    CastFailedNoLocation,
    InvalidCast,
    InvalidCastNoLocation,
    IntOverflow,
    BindingNotFound,
    InvalidArguments,
    Generic,
}

impl EvalErrorCode {
    pub fn name(&self) -> &'static str {
        match self {
            EvalErrorCode::CastFailed => "EVALUATOR_CAST_FAILED",
            EvalErrorCode::CastFailedNoLocation => "EVALUATOR_CAST_FAILED_NO_LOCATION",
            EvalErrorCode::InvalidCast => "EVALUATOR_INVALID_CAST",
            EvalErrorCode::InvalidCastNoLocation => "EVALUATOR_INVALID_CAST_NO_LOCATION",
            EvalErrorCode::IntOverflow => "EVALUATOR_INT_OVERFLOW",
            EvalErrorCode::BindingNotFound => "EVALUATOR_BINDING_NOT_FOUND",
            EvalErrorCode::InvalidArguments => "EVALUATOR_INVALID_ARGUMENTS",
            EvalErrorCode::Generic => "EVALUATOR_GENERIC",
        }
    }
}

/// A structured parse failure: code, property map, and whether it signals
/// an engine bug rather than bad input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub properties: PropertyMap,
    pub internal: bool,
}

impl ParseError {
    pub fn new(code: ParseErrorCode) -> Self {
        Self {
            code,
            properties: PropertyMap::new(),
            internal: false,
        }
    }

    /// Builder-style property attachment.
    pub fn with(mut self, key: Property, value: PropertyValue) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.properties.position()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.name())?;
        if let Some(pos) = self.position() {
            write!(f, " at {pos}")?;
        }
        for (key, value) in self.properties.iter() {
            if !matches!(key, Property::LineNumber | Property::ColumnNumber) {
                write!(f, " {}={}", key.name(), value)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// A structured evaluation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub code: EvalErrorCode,
    pub properties: PropertyMap,
    pub internal: bool,
}

impl EvalError {
    pub fn new(code: EvalErrorCode) -> Self {
        Self {
            code,
            properties: PropertyMap::new(),
            internal: false,
        }
    }

    pub fn with(mut self, key: Property, value: PropertyValue) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.properties.position()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.name())?;
        if let Some(pos) = self.position() {
            write!(f, " at {pos}")?;
        }
        for (key, value) in self.properties.iter() {
            if !matches!(key, Property::LineNumber | Property::ColumnNumber) {
                write!(f, " {}={}", key.name(), value)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

/// The specific kind of lexer failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    /// A code point no DFA transition accepts.
    InvalidCharacter(char),
    /// End of input while a token was still incomplete.
    UnexpectedEof,
    /// A number literal whose text cannot be represented.
    InvalidNumberLiteral(String),
    /// A backtick-quoted literal whose body is not a single document value.
    InvalidEmbeddedLiteral(String),
}

/// A lexer failure with the position it was raised at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: SourcePosition,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::InvalidCharacter(c) => {
                write!(f, "invalid character {c:?} at {}", self.position)
            }
            LexErrorKind::UnexpectedEof => {
                write!(f, "unexpected end of input at {}", self.position)
            }
            LexErrorKind::InvalidNumberLiteral(text) => {
                write!(f, "invalid number literal {text:?} at {}", self.position)
            }
            LexErrorKind::InvalidEmbeddedLiteral(message) => {
                write!(
                    f,
                    "invalid embedded literal at {}: {message}",
                    self.position
                )
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Any failure the pipeline can surface to an embedder.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => e.fmt(f),
            Error::Parse(e) => e.fmt(f),
            Error::Eval(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}
