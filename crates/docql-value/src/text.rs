//! Reader and writer for the document text form.
//!
//! This is the facade over the embedding data syntax: the lexer's backtick
//! literals, the test harness wire, and `Display` for [`Value`] all go
//! through here. Exactly one top-level value is accepted; a datagram of
//! several values is rejected.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rust_decimal::Decimal;

use crate::timestamp::Timestamp;
use crate::value::{Data, Value, ValueType};

/// A failure while reading a value from its text form.
#[derive(Debug, Clone, PartialEq)]
pub struct TextError {
    pub message: String,
}

impl TextError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TextError {}

/// Parse a single document value from text.
pub fn parse_value(text: &str) -> Result<Value, TextError> {
    let mut reader = Reader::new(text);
    reader.skip_trivia();
    let value = reader.read_value()?;
    reader.skip_trivia();
    if !reader.is_eof() {
        return Err(TextError::new(
            "more than one top-level value (datagram input is rejected)",
        ));
    }
    Ok(value)
}

const OPERATOR_CHARS: &str = "!#%&*+-./;<=>?@^|~";

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether symbol text can be written without quotes.
fn is_bare_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    let head_ok = chars.next().is_some_and(is_ident_start);
    head_ok
        && chars.all(is_ident_continue)
        && !matches!(text, "null" | "true" | "false" | "nan")
}

struct Reader<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn err(&self, message: impl Into<String>) -> TextError {
        TextError::new(message)
    }

    /// Skip whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek2() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek2() == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return,
                        }
                    }
                }
                _ => return,
            }
        }
    }

    // ── Values ─────────────────────────────────────────────────────────

    fn read_value(&mut self) -> Result<Value, TextError> {
        let mut annotations: Vec<String> = Vec::new();
        loop {
            self.skip_trivia();
            let Some(c) = self.peek() else {
                return Err(self.err("unexpected end of input"));
            };
            match c {
                '[' => return Ok(annotate(annotations, self.read_list()?)),
                '(' => return Ok(annotate(annotations, self.read_sexp()?)),
                '{' if self.peek2() == Some('{') => {
                    return Ok(annotate(annotations, self.read_lob()?))
                }
                '{' => return Ok(annotate(annotations, self.read_struct()?)),
                '"' => {
                    let s = self.read_string('"')?;
                    return Ok(annotate(annotations, Value::string(s)));
                }
                '\'' if self.rest().starts_with("'''") => {
                    let s = self.read_long_string()?;
                    return Ok(annotate(annotations, Value::string(s)));
                }
                '\'' => {
                    self.bump();
                    let text = self.read_string('\'')?;
                    if self.try_annotation_marker() {
                        annotations.push(text);
                        continue;
                    }
                    return Ok(annotate(annotations, Value::symbol(text)));
                }
                c if is_ident_start(c) => {
                    let word = self.read_word();
                    if self.try_annotation_marker() {
                        annotations.push(word);
                        continue;
                    }
                    return Ok(annotate(annotations, self.resolve_word(word)?));
                }
                c if c.is_ascii_digit() => {
                    return Ok(annotate(annotations, self.read_number_or_timestamp()?))
                }
                '-' | '+' if self.peek2().is_some_and(|d| d.is_ascii_digit()) => {
                    return Ok(annotate(annotations, self.read_number_or_timestamp()?))
                }
                c if OPERATOR_CHARS.contains(c) => {
                    let sym = self.read_operator_symbol();
                    return Ok(annotate(annotations, Value::symbol(sym)));
                }
                c => return Err(self.err(format!("unexpected character {c:?}"))),
            }
        }
    }

    /// After reading a symbol, check for the `::` annotation marker.
    fn try_annotation_marker(&mut self) -> bool {
        let saved = self.pos;
        self.skip_trivia();
        if self.eat_str("::") {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        self.source[start..self.pos].to_string()
    }

    fn read_operator_symbol(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            self.bump();
        }
        self.source[start..self.pos].to_string()
    }

    fn resolve_word(&mut self, word: String) -> Result<Value, TextError> {
        match word.as_str() {
            "null" => {
                // `null.int` and friends; the dot must be adjacent.
                if self.eat('.') {
                    let ty = self.read_word();
                    let ty = null_type_from_name(&ty)
                        .ok_or_else(|| self.err(format!("invalid null type: {ty:?}")))?;
                    Ok(Value::typed_null(ty))
                } else {
                    Ok(Value::null())
                }
            }
            "true" => Ok(Value::bool(true)),
            "false" => Ok(Value::bool(false)),
            "nan" => Ok(Value::float(f64::NAN)),
            _ => Ok(Value::symbol(word)),
        }
    }

    // ── Numbers and timestamps ─────────────────────────────────────────

    fn read_number_or_timestamp(&mut self) -> Result<Value, TextError> {
        let start = self.pos;
        let negative = if self.eat('-') {
            true
        } else {
            self.eat('+');
            false
        };

        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
        let int_digits = self.pos - digits_start;

        // A timestamp is four digits followed by `-` or `T`, unsigned.
        if !negative
            && start == digits_start
            && int_digits == 4
            && matches!(self.peek(), Some('-') | Some('T'))
        {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_digit() || "-+:TZ.".contains(c))
            {
                self.bump();
            }
            let text = &self.source[start..self.pos];
            return Timestamp::parse(text)
                .map(Value::timestamp)
                .map_err(|e| self.err(e));
        }

        // Hex and binary integer forms.
        if int_digits == 1
            && self.source[digits_start..].starts_with('0')
            && matches!(self.peek(), Some('x') | Some('X') | Some('b') | Some('B'))
        {
            let radix = if matches!(self.peek(), Some('x') | Some('X')) {
                16
            } else {
                2
            };
            self.bump();
            let body_start = self.pos;
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_hexdigit() || c == '_')
            {
                self.bump();
            }
            let body: String = self.source[body_start..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            let magnitude = i64::from_str_radix(&body, radix)
                .map_err(|_| self.err(format!("invalid integer: {:?}", &self.source[start..self.pos])))?;
            return Ok(Value::int(if negative { -magnitude } else { magnitude }));
        }

        let mut is_decimal = false;
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }

        // Exponent marker: `d` keeps it a decimal, `e` makes it a float.
        match self.peek() {
            Some('d') | Some('D') => {
                self.bump();
                self.read_exponent_digits()?;
                let text = self.number_text(start).replace(['d', 'D'], "e");
                let d = Decimal::from_scientific(&text)
                    .map_err(|_| self.err(format!("invalid decimal: {text:?}")))?;
                Ok(Value::decimal(d))
            }
            Some('e') | Some('E') => {
                self.bump();
                self.read_exponent_digits()?;
                let text = self.number_text(start);
                let f = f64::from_str(&text)
                    .map_err(|_| self.err(format!("invalid float: {text:?}")))?;
                Ok(Value::float(f))
            }
            _ if is_decimal => {
                let text = self.number_text(start);
                let d = Decimal::from_str(&text)
                    .map_err(|_| self.err(format!("invalid decimal: {text:?}")))?;
                Ok(Value::decimal(d))
            }
            _ => {
                let text = self.number_text(start);
                let n = i64::from_str(&text)
                    .map_err(|_| self.err(format!("integer out of range: {text:?}")))?;
                Ok(Value::int(n))
            }
        }
    }

    fn read_exponent_digits(&mut self) -> Result<(), TextError> {
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(self.err("missing exponent digits"));
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        Ok(())
    }

    fn number_text(&self, start: usize) -> String {
        self.source[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect()
    }

    // ── Strings and symbols ────────────────────────────────────────────

    /// Read string content up to the closing quote. The opening quote has
    /// already been consumed.
    fn read_string(&mut self, quote: char) -> Result<String, TextError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push_str(&self.read_escape()?),
                Some('\n') | Some('\r') => {
                    return Err(self.err("newline in short string"))
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Read a `'''…'''` long string, concatenating adjacent segments.
    fn read_long_string(&mut self) -> Result<String, TextError> {
        let mut out = String::new();
        loop {
            if !self.eat_str("'''") {
                break;
            }
            loop {
                if self.rest().starts_with("'''") {
                    self.pos += 3;
                    break;
                }
                match self.bump() {
                    None => return Err(self.err("unterminated long string")),
                    Some('\\') => out.push_str(&self.read_escape()?),
                    Some(c) => out.push(c),
                }
            }
            let saved = self.pos;
            self.skip_trivia();
            if !self.rest().starts_with("'''") {
                self.pos = saved;
                break;
            }
        }
        Ok(out)
    }

    fn read_escape(&mut self) -> Result<String, TextError> {
        let Some(c) = self.bump() else {
            return Err(self.err("unterminated escape sequence"));
        };
        let out = match c {
            'n' => '\n'.to_string(),
            't' => '\t'.to_string(),
            'r' => '\r'.to_string(),
            '0' => '\0'.to_string(),
            '\\' => '\\'.to_string(),
            '"' => '"'.to_string(),
            '\'' => '\''.to_string(),
            '/' => '/'.to_string(),
            // Escaped newline: line continuation, produces nothing.
            '\n' => String::new(),
            'x' => {
                let code = self.read_hex_digits(2)?;
                char::from_u32(code)
                    .ok_or_else(|| self.err("invalid \\x escape"))?
                    .to_string()
            }
            'u' => {
                let code = self.read_hex_digits(4)?;
                char::from_u32(code)
                    .ok_or_else(|| self.err("invalid \\u escape"))?
                    .to_string()
            }
            other => return Err(self.err(format!("invalid escape sequence: \\{other}"))),
        };
        Ok(out)
    }

    fn read_hex_digits(&mut self, count: usize) -> Result<u32, TextError> {
        let mut code = 0u32;
        for _ in 0..count {
            let Some(c) = self.bump() else {
                return Err(self.err("unterminated escape sequence"));
            };
            let digit = c
                .to_digit(16)
                .ok_or_else(|| self.err(format!("invalid hex digit {c:?} in escape")))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    // ── Containers ─────────────────────────────────────────────────────

    fn read_list(&mut self) -> Result<Value, TextError> {
        self.bump(); // [
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(']') {
                return Ok(Value::list(items));
            }
            items.push(self.read_value()?);
            self.skip_trivia();
            if !self.eat(',') && self.peek() != Some(']') {
                return Err(self.err("expected `,` or `]` in list"));
            }
        }
    }

    fn read_sexp(&mut self) -> Result<Value, TextError> {
        self.bump(); // (
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(')') {
                return Ok(Value::sexp(items));
            }
            if self.is_eof() {
                return Err(self.err("unterminated s-expression"));
            }
            items.push(self.read_value()?);
        }
    }

    fn read_struct(&mut self) -> Result<Value, TextError> {
        self.bump(); // {
        let mut fields = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Value::structure(fields));
            }
            let name = match self.peek() {
                Some('"') => {
                    self.bump();
                    self.read_string('"')?
                }
                Some('\'') => {
                    self.bump();
                    self.read_string('\'')?
                }
                Some(c) if is_ident_start(c) => self.read_word(),
                _ => return Err(self.err("expected field name in struct")),
            };
            self.skip_trivia();
            if !self.eat(':') {
                return Err(self.err("expected `:` after struct field name"));
            }
            let value = self.read_value()?;
            fields.push((name, value));
            self.skip_trivia();
            if !self.eat(',') && self.peek() != Some('}') {
                return Err(self.err("expected `,` or `}` in struct"));
            }
        }
    }

    /// `{{ "…" }}` is a clob, `{{ base64 }}` is a blob.
    fn read_lob(&mut self) -> Result<Value, TextError> {
        self.bump(); // {
        self.bump(); // {
        self.skip_trivia();
        if self.eat('"') {
            let text = self.read_string('"')?;
            if !text.is_ascii() {
                return Err(self.err("clob content must be ASCII"));
            }
            self.skip_trivia();
            if !self.eat_str("}}") {
                return Err(self.err("expected `}}` after clob"));
            }
            return Ok(Value::clob(text.into_bytes()));
        }
        let mut body = String::new();
        loop {
            match self.peek() {
                None => return Err(self.err("unterminated blob")),
                Some('}') => {
                    if self.eat_str("}}") {
                        break;
                    }
                    return Err(self.err("expected `}}` after blob"));
                }
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some(c) => {
                    body.push(c);
                    self.bump();
                }
            }
        }
        let bytes = BASE64
            .decode(body.as_bytes())
            .map_err(|_| self.err("invalid base64 in blob"))?;
        Ok(Value::blob(bytes))
    }
}

fn null_type_from_name(name: &str) -> Option<ValueType> {
    Some(match name {
        "null" => ValueType::Null,
        "bool" => ValueType::Bool,
        "int" => ValueType::Int,
        "float" => ValueType::Float,
        "decimal" => ValueType::Decimal,
        "timestamp" => ValueType::Timestamp,
        "symbol" => ValueType::Symbol,
        "string" => ValueType::String,
        "clob" => ValueType::Clob,
        "blob" => ValueType::Blob,
        "list" => ValueType::List,
        "sexp" => ValueType::Sexp,
        "struct" => ValueType::Struct,
        _ => return None,
    })
}

/// Apply the annotation rule: `missing::null.symbol` (exactly one
/// annotation) decodes to MISSING. Every other annotation is accepted and
/// dropped; the value model of the engine does not carry them.
fn annotate(annotations: Vec<String>, value: Value) -> Value {
    if annotations.len() == 1
        && annotations[0] == "missing"
        && value.is_null()
        && value.value_type() == ValueType::Symbol
    {
        return Value::missing();
    }
    value
}

// ── Writer ─────────────────────────────────────────────────────────────

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match &*value.data {
        Data::Missing => f.write_str("missing::null.symbol"),
        Data::Null(ValueType::Null) => f.write_str("null"),
        Data::Null(ty) => write!(f, "null.{}", ty.name()),
        Data::Bool(b) => write!(f, "{b}"),
        Data::Int(n) => write!(f, "{n}"),
        Data::Float(v) => write_float(f, *v),
        Data::Decimal(d) => {
            let text = d.to_string();
            if text.contains('.') {
                f.write_str(&text)
            } else {
                write!(f, "{text}.")
            }
        }
        Data::Timestamp(ts) => write!(f, "{ts}"),
        Data::Symbol(s) => write_symbol(f, s),
        Data::String(s) => {
            f.write_str("\"")?;
            write_escaped(f, s, '"')?;
            f.write_str("\"")
        }
        Data::Clob(bytes) => {
            f.write_str("{{\"")?;
            let text: String = bytes.iter().map(|b| *b as char).collect();
            write_escaped(f, &text, '"')?;
            f.write_str("\"}}")
        }
        Data::Blob(bytes) => write!(f, "{{{{{}}}}}", BASE64.encode(bytes)),
        Data::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str("]")
        }
        Data::Sexp(items) => write_sexp(f, None, items),
        Data::Bag(items) => write_sexp(f, Some("bag"), items),
        Data::Struct(fields) => {
            f.write_str("{")?;
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_symbol(f, name)?;
                f.write_str(": ")?;
                write_value(f, item)?;
            }
            f.write_str("}")
        }
    }
}

fn write_sexp(f: &mut fmt::Formatter<'_>, head: Option<&str>, items: &[Value]) -> fmt::Result {
    f.write_str("(")?;
    let mut first = true;
    if let Some(head) = head {
        f.write_str(head)?;
        first = false;
    }
    for item in items {
        if !first {
            f.write_str(" ")?;
        }
        first = false;
        write_value(f, item)?;
    }
    f.write_str(")")
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("nan")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "+inf" } else { "-inf" })
    } else {
        write!(f, "{v:e}")
    }
}

fn write_symbol(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if is_bare_symbol(text) || text.chars().all(|c| OPERATOR_CHARS.contains(c)) && !text.is_empty()
    {
        f.write_str(text)
    } else {
        f.write_str("'")?;
        write_escaped(f, text, '\'')?;
        f.write_str("'")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if (c as u32) < 0x20 => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_str(&c.to_string())?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(parse_value("42").unwrap().as_int(), Some(42));
        assert_eq!(parse_value("-7").unwrap().as_int(), Some(-7));
        assert_eq!(parse_value("true").unwrap().as_bool(), Some(true));
        assert_eq!(parse_value("\"hi\"").unwrap().as_text(), Some("hi"));
        assert_eq!(parse_value("hello").unwrap().as_text(), Some("hello"));
        assert_eq!(
            parse_value("hello").unwrap().value_type(),
            ValueType::Symbol
        );
    }

    #[test]
    fn parses_hex_and_binary_integers() {
        assert_eq!(parse_value("0x10").unwrap().as_int(), Some(16));
        assert_eq!(parse_value("0b101").unwrap().as_int(), Some(5));
        assert_eq!(parse_value("-0x10").unwrap().as_int(), Some(-16));
    }

    #[test]
    fn dot_makes_a_decimal_e_makes_a_float() {
        let d = parse_value("1.5").unwrap();
        assert_eq!(d.value_type(), ValueType::Decimal);
        let f = parse_value("1.5e0").unwrap();
        assert_eq!(f.value_type(), ValueType::Float);
        assert_eq!(f.as_float(), Some(1.5));
        let d2 = parse_value("15d-1").unwrap();
        assert_eq!(d2.value_type(), ValueType::Decimal);
        assert_eq!(d2.as_decimal(), Some(Decimal::new(15, 1)));
    }

    #[test]
    fn parses_typed_nulls() {
        let v = parse_value("null.int").unwrap();
        assert!(v.is_null());
        assert_eq!(v.value_type(), ValueType::Int);
        assert_eq!(parse_value("null").unwrap().value_type(), ValueType::Null);
    }

    #[test]
    fn missing_annotation_decodes_to_missing() {
        assert!(parse_value("missing::null.symbol").unwrap().is_missing());
        // Any other shape stays a typed null.
        assert!(!parse_value("missing::null.int").unwrap().is_missing());
        assert!(!parse_value("other::null.symbol").unwrap().is_missing());
    }

    #[test]
    fn other_annotations_are_dropped() {
        let v = parse_value("foo::42").unwrap();
        assert_eq!(v.as_int(), Some(42));
    }

    #[test]
    fn parses_containers() {
        let v = parse_value("[1, 2, 3]").unwrap();
        assert_eq!(v.value_type(), ValueType::List);
        assert_eq!(v.size(), Some(3));

        let v = parse_value("(bag 1 1 2)").unwrap();
        assert_eq!(v.value_type(), ValueType::Sexp);
        assert_eq!(v.elements().unwrap()[0].as_text(), Some("bag"));

        let v = parse_value("{name: \"Kumo\", age: 4}").unwrap();
        assert_eq!(v.get_field("name").and_then(Value::as_text), Some("Kumo"));
        assert_eq!(v.get_field("age").and_then(Value::as_int), Some(4));
    }

    #[test]
    fn parses_operator_symbols_in_sexp() {
        let v = parse_value("(+ 1 2)").unwrap();
        assert_eq!(v.elements().unwrap()[0].as_text(), Some("+"));
    }

    #[test]
    fn parses_strings_with_escapes() {
        assert_eq!(
            parse_value(r#""a\nb\"c""#).unwrap().as_text(),
            Some("a\nb\"c")
        );
        assert_eq!(
            parse_value("'''long '''").unwrap().as_text(),
            Some("long ")
        );
    }

    #[test]
    fn parses_comments_as_trivia() {
        let v = parse_value("// leading\n[1, /* inner */ 2]").unwrap();
        assert_eq!(v.size(), Some(2));
    }

    #[test]
    fn parses_lobs() {
        let blob = parse_value("{{aGVsbG8=}}").unwrap();
        assert_eq!(blob.value_type(), ValueType::Blob);
        assert_eq!(blob.as_bytes(), Some(&b"hello"[..]));

        let clob = parse_value("{{\"hi\"}}").unwrap();
        assert_eq!(clob.value_type(), ValueType::Clob);
        assert_eq!(clob.as_bytes(), Some(&b"hi"[..]));
    }

    #[test]
    fn parses_timestamps() {
        let v = parse_value("2007-06-05T10:30Z").unwrap();
        assert_eq!(v.value_type(), ValueType::Timestamp);
    }

    #[test]
    fn rejects_datagrams() {
        assert!(parse_value("1 2").is_err());
    }

    #[test]
    fn rejects_unterminated_containers() {
        assert!(parse_value("[1, 2").is_err());
        assert!(parse_value("(a b").is_err());
        assert!(parse_value("\"open").is_err());
    }

    #[test]
    fn writer_round_trips_scalars() {
        for text in [
            "42",
            "-7",
            "true",
            "null",
            "null.int",
            "missing::null.symbol",
            "1.5",
            "\"hi\\nthere\"",
            "hello",
            "2007-06-05T10:30Z",
            "[1, 2]",
            "{a: 1}",
        ] {
            let v = parse_value(text).unwrap();
            assert_eq!(v.to_string(), text, "rendering of {text:?}");
        }
    }

    #[test]
    fn writer_renders_bags_as_sexp_encoding() {
        let bag = Value::bag(vec![Value::int(1), Value::int(2)]);
        assert_eq!(bag.to_string(), "(bag 1 2)");
        assert_eq!(Value::bag(vec![]).to_string(), "(bag)");
    }

    #[test]
    fn writer_quotes_non_bare_symbols() {
        assert_eq!(Value::symbol("a b").to_string(), "'a b'");
        assert_eq!(Value::symbol("null").to_string(), "'null'");
        assert_eq!(Value::symbol("_1").to_string(), "_1");
    }

    #[test]
    fn writer_renders_scale_zero_decimals_with_trailing_dot() {
        let v = parse_value("5d0").unwrap();
        assert_eq!(v.to_string(), "5.");
    }
}
