use std::fmt;

use serde::Serialize;

/// Every kind of token the DocQL lexer can produce.
///
/// Punctuation characters each get a distinct type; everything word-shaped
/// resolves to `Keyword`, `Identifier`, `Operator`, or `Literal` after the
/// lexer consults the keyword and operator tables below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    /// Reserved word, e.g. `select`, `from`, `between`.
    Keyword,
    /// Bare or double-quoted identifier.
    Identifier,
    /// Symbolic operator (`+`, `<>`, `||`, …) or word operator (`and`, `like`, …).
    Operator,
    /// Literal value: number, string, boolean, or backtick-quoted document value.
    Literal,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftCurly,
    /// `}`
    RightCurly,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `*`
    Star,
    /// `.`
    Dot,
}

impl TokenType {
    /// The canonical upper-case name used in error property maps.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Keyword => "KEYWORD",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Operator => "OPERATOR",
            TokenType::Literal => "LITERAL",
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBracket => "LEFT_BRACKET",
            TokenType::RightBracket => "RIGHT_BRACKET",
            TokenType::LeftCurly => "LEFT_CURLY",
            TokenType::RightCurly => "RIGHT_CURLY",
            TokenType::Colon => "COLON",
            TokenType::Comma => "COMMA",
            TokenType::Star => "STAR",
            TokenType::Dot => "DOT",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved words of the dialect.
///
/// Type names (`integer`, `varchar`, …) are deliberately not reserved; the
/// parser resolves them contextually inside `CAST` and `IS`.
const KEYWORDS: &[&str] = &[
    "all", "as", "asc", "at", "between", "both", "by", "case", "cast", "desc", "distinct",
    "else", "end", "escape", "except", "for", "from", "group", "having", "intersect",
    "leading", "limit", "missing", "null", "order", "pivot", "select", "substring", "then",
    "trailing", "trim", "union", "unpivot", "values", "when", "where",
];

/// Words that lex as `Operator` rather than `Keyword`.
const WORD_OPERATORS: &[&str] = &["and", "or", "not", "like", "is", "in"];

/// Whether the (already lower-cased) word is a reserved keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.binary_search(&word).is_ok()
}

/// Whether the (already lower-cased) word is a word-shaped operator.
pub fn is_word_operator(word: &str) -> bool {
    WORD_OPERATORS.contains(&word)
}
