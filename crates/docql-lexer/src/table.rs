//! The lexer's state table.
//!
//! A DFA over code points: each node carries its state kind, the token type
//! and lex sub-type it would flush as, a replacement rule controlling what
//! the consumed code point contributes to the token text, explicit edges,
//! and an optional delegate edge taken when no explicit edge matches (the
//! compact "any other character" branch).
//!
//! The table is built once by a pure builder and shared behind a
//! process-wide `OnceLock`.

use std::sync::OnceLock;

use docql_common::TokenType;
use rustc_hash::FxHashMap;

/// What a node means for token boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateKind {
    /// The rest state between tokens.
    Initial,
    /// Begins a token but cannot end one.
    Start,
    /// Begins a token and is also a valid end.
    StartAndTerminal,
    /// Inside a token; flushing here is an error.
    Incomplete,
    /// A valid end of a token.
    Terminal,
    /// Explicit dead state; reaching it aborts the scan.
    Error,
}

impl StateKind {
    pub(crate) fn begins_token(self) -> bool {
        matches!(self, StateKind::Start | StateKind::StartAndTerminal)
    }

    pub(crate) fn ends_token(self) -> bool {
        matches!(self, StateKind::Terminal | StateKind::StartAndTerminal)
    }
}

/// Sub-type deciding how the flushed token text becomes a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexType {
    /// Punctuation; the token type alone is enough.
    None,
    /// Whitespace or comment; suppressed from the output stream.
    Whitespace,
    /// Identifier-shaped word, resolved to keyword/operator/boolean/identifier.
    Word,
    /// Symbolic operator, canonicalized through the alias table.
    Operator,
    Int,
    Decimal,
    ENotation,
    /// Single-quoted string; quotes already stripped by replacement rules.
    SqString,
    /// Double-quoted identifier; case preserved, quotes stripped.
    DqIdentifier,
}

/// What the code point consumed on entry to a node contributes to the
/// token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replacement {
    /// Append the code point as-is.
    Same,
    /// Append nothing (used for enclosing quotes).
    Nothing,
}

pub(crate) type NodeId = usize;

pub(crate) struct Node {
    pub(crate) kind: StateKind,
    pub(crate) token_type: Option<TokenType>,
    pub(crate) lex_type: LexType,
    pub(crate) replacement: Replacement,
    edges: FxHashMap<char, NodeId>,
    delegate: Option<NodeId>,
}

pub(crate) struct LexTable {
    nodes: Vec<Node>,
    pub(crate) initial: NodeId,
}

impl LexTable {
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// The node reached by consuming `c` from `from`, if any.
    pub(crate) fn lookup(&self, from: NodeId, c: char) -> Option<NodeId> {
        let node = &self.nodes[from];
        node.edges.get(&c).copied().or(node.delegate)
    }
}

/// The shared table, built on first use.
pub(crate) fn lex_table() -> &'static LexTable {
    static TABLE: OnceLock<LexTable> = OnceLock::new();
    TABLE.get_or_init(build)
}

struct Builder {
    nodes: Vec<Node>,
}

impl Builder {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn node(
        &mut self,
        kind: StateKind,
        token_type: Option<TokenType>,
        lex_type: LexType,
        replacement: Replacement,
    ) -> NodeId {
        self.nodes.push(Node {
            kind,
            token_type,
            lex_type,
            replacement,
            edges: FxHashMap::default(),
            delegate: None,
        });
        self.nodes.len() - 1
    }

    fn edge(&mut self, from: NodeId, c: char, to: NodeId) {
        let prev = self.nodes[from].edges.insert(c, to);
        debug_assert!(prev.is_none(), "duplicate edge on {c:?}");
    }

    fn edges(&mut self, from: NodeId, chars: impl IntoIterator<Item = char>, to: NodeId) {
        for c in chars {
            self.edge(from, c, to);
        }
    }

    fn delegate(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from].delegate = Some(to);
    }

    fn finish(self, initial: NodeId) -> LexTable {
        debug_assert!(
            self.nodes[initial]
                .edges
                .values()
                .all(|&id| self.nodes[id].kind.begins_token()),
            "every node reachable from initial must begin a token"
        );
        LexTable {
            nodes: self.nodes,
            initial,
        }
    }
}

const IDENT_START: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
const DIGITS: &str = "0123456789";

fn build() -> LexTable {
    use Replacement::{Nothing, Same};
    use StateKind::{Incomplete, Initial, Start, StartAndTerminal, Terminal};

    let mut b = Builder::new();
    let initial = b.node(Initial, None, LexType::None, Same);

    // ── Whitespace ─────────────────────────────────────────────────────
    let ws = b.node(StartAndTerminal, None, LexType::Whitespace, Nothing);
    b.edges(initial, " \t\r\n".chars(), ws);
    b.edges(ws, " \t\r\n".chars(), ws);

    // ── Punctuation ────────────────────────────────────────────────────
    for (c, token_type) in [
        ('(', TokenType::LeftParen),
        (')', TokenType::RightParen),
        ('[', TokenType::LeftBracket),
        (']', TokenType::RightBracket),
        ('{', TokenType::LeftCurly),
        ('}', TokenType::RightCurly),
        (':', TokenType::Colon),
        (',', TokenType::Comma),
        ('*', TokenType::Star),
    ] {
        let node = b.node(StartAndTerminal, Some(token_type), LexType::None, Same);
        b.edge(initial, c, node);
    }

    // ── Identifiers ────────────────────────────────────────────────────
    let word = b.node(
        StartAndTerminal,
        Some(TokenType::Identifier),
        LexType::Word,
        Same,
    );
    b.edges(initial, IDENT_START.chars(), word);
    b.edges(word, IDENT_START.chars().chain(DIGITS.chars()), word);

    // ── Numbers ────────────────────────────────────────────────────────
    // `.` and e-notation both promote the sub-type to DECIMAL.
    let int = b.node(StartAndTerminal, Some(TokenType::Literal), LexType::Int, Same);
    b.edges(initial, DIGITS.chars(), int);
    b.edges(int, DIGITS.chars(), int);

    let dec_point = b.node(Incomplete, None, LexType::None, Same);
    b.edge(int, '.', dec_point);

    let dec = b.node(Terminal, Some(TokenType::Literal), LexType::Decimal, Same);
    b.edges(dec_point, DIGITS.chars(), dec);
    b.edges(dec, DIGITS.chars(), dec);

    let e_mark = b.node(Incomplete, None, LexType::None, Same);
    b.edges(int, "eE".chars(), e_mark);
    b.edges(dec, "eE".chars(), e_mark);

    let e_sign = b.node(Incomplete, None, LexType::None, Same);
    b.edges(e_mark, "+-".chars(), e_sign);

    let e_digits = b.node(
        Terminal,
        Some(TokenType::Literal),
        LexType::ENotation,
        Same,
    );
    b.edges(e_mark, DIGITS.chars(), e_digits);
    b.edges(e_sign, DIGITS.chars(), e_digits);
    b.edges(e_digits, DIGITS.chars(), e_digits);

    // ── Dot: a lone `.` is a token; `.5` is a decimal ──────────────────
    let dot = b.node(StartAndTerminal, Some(TokenType::Dot), LexType::None, Same);
    b.edge(initial, '.', dot);
    b.edges(dot, DIGITS.chars(), dec);

    // ── Operators ──────────────────────────────────────────────────────
    let op = |b: &mut Builder| {
        b.node(
            StartAndTerminal,
            Some(TokenType::Operator),
            LexType::Operator,
            Same,
        )
    };

    // A sign directly followed by a digit folds into the number literal.
    let plus = op(&mut b);
    b.edge(initial, '+', plus);
    b.edges(plus, DIGITS.chars(), int);

    let minus = op(&mut b);
    b.edge(initial, '-', minus);
    b.edges(minus, DIGITS.chars(), int);

    let slash = op(&mut b);
    b.edge(initial, '/', slash);

    let percent = op(&mut b);
    b.edge(initial, '%', percent);

    let eq = op(&mut b);
    b.edge(initial, '=', eq);

    let lt = op(&mut b);
    b.edge(initial, '<', lt);
    let le = op(&mut b);
    b.edge(lt, '=', le);
    let ne = op(&mut b);
    b.edge(lt, '>', ne);

    let gt = op(&mut b);
    b.edge(initial, '>', gt);
    let ge = op(&mut b);
    b.edge(gt, '=', ge);

    // `@` introduces a scope-local binding reference.
    let at = op(&mut b);
    b.edge(initial, '@', at);

    // `!` is only valid as the start of `!=` (aliased to `<>` at flush).
    let bang = b.node(Start, None, LexType::None, Same);
    b.edge(initial, '!', bang);
    let bang_eq = op(&mut b);
    b.edge(bang, '=', bang_eq);

    // `|` is only valid as the start of the concatenation operator `||`.
    let pipe = b.node(Start, None, LexType::None, Same);
    b.edge(initial, '|', pipe);
    let concat = op(&mut b);
    b.edge(pipe, '|', concat);

    // ── Comments (whitespace sub-type, suppressed) ─────────────────────
    let line_comment = b.node(Terminal, None, LexType::Whitespace, Same);
    b.edge(minus, '-', line_comment);
    b.delegate(line_comment, line_comment);
    b.edge(line_comment, '\n', ws);
    b.edge(line_comment, '\r', ws);

    let block_body = b.node(Incomplete, None, LexType::Whitespace, Same);
    b.edge(slash, '*', block_body);
    b.delegate(block_body, block_body);
    let block_star = b.node(Incomplete, None, LexType::Whitespace, Same);
    b.edge(block_body, '*', block_star);
    b.edge(block_star, '*', block_star);
    b.delegate(block_star, block_body);
    let block_end = b.node(Terminal, None, LexType::Whitespace, Same);
    b.edge(block_star, '/', block_end);

    // ── Single-quoted strings (`''` is an escaped quote) ───────────────
    let sq_close = b.node(
        Terminal,
        Some(TokenType::Literal),
        LexType::SqString,
        Nothing,
    );
    let sq_body = b.node(Incomplete, None, LexType::None, Same);
    b.delegate(sq_body, sq_body);
    b.edge(sq_body, '\'', sq_close);
    b.edge(sq_close, '\'', sq_body);

    let sq_open = b.node(Start, None, LexType::None, Nothing);
    b.edge(initial, '\'', sq_open);
    b.delegate(sq_open, sq_body);
    b.edge(sq_open, '\'', sq_close);

    // ── Double-quoted identifiers (case preserved) ─────────────────────
    let dq_close = b.node(
        Terminal,
        Some(TokenType::Identifier),
        LexType::DqIdentifier,
        Nothing,
    );
    let dq_body = b.node(Incomplete, None, LexType::None, Same);
    b.delegate(dq_body, dq_body);
    b.edge(dq_body, '"', dq_close);
    b.edge(dq_close, '"', dq_body);

    let dq_open = b.node(Start, None, LexType::None, Nothing);
    b.edge(initial, '"', dq_open);
    b.delegate(dq_open, dq_body);
    b.edge(dq_open, '"', dq_close);

    b.finish(initial)
}
