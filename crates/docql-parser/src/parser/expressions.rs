//! Precedence-climbing expression parser.
//!
//! The binding-power ladder, loosest to tightest:
//! `OR < AND < NOT < comparison < BETWEEN/LIKE/IN/IS < + - < * / % <
//! unary sign < || and paths`.

use docql_common::{ParseError, ParseErrorCode, Property, PropertyValue, TokenType};
use docql_lexer::Token;
use docql_value::Value;

use crate::ast::{BinaryOp, Expr, PathComponent, UnaryOp};
use crate::error;
use crate::types::{SqlType, TypeName};

use super::{select, Parser};

// Binding powers. Left < right is left-associative.
const BP_OR: (u8, u8) = (1, 2);
const BP_AND: (u8, u8) = (3, 4);
const BP_NOT_PREFIX: u8 = 5;
const BP_COMPARE: (u8, u8) = (7, 8);
/// BETWEEN, LIKE, IN, IS, and their NOT forms.
const BP_TERM: (u8, u8) = (9, 10);
const BP_ADD: (u8, u8) = (11, 12);
const BP_MUL: (u8, u8) = (13, 14);
const BP_SIGN_PREFIX: u8 = 15;
const BP_CONCAT: (u8, u8) = (17, 18);

/// Plain binary operators and their binding powers.
fn infix_binding_power(token: &Token) -> Option<(u8, u8, BinaryOp)> {
    // `*` lexes as its own punctuation type but is multiplication here.
    if token.token_type == TokenType::Star {
        return Some((BP_MUL.0, BP_MUL.1, BinaryOp::Mul));
    }
    if token.token_type != TokenType::Operator {
        return None;
    }
    let (bp, op) = match token.text()? {
        "or" => (BP_OR, BinaryOp::Or),
        "and" => (BP_AND, BinaryOp::And),
        "=" => (BP_COMPARE, BinaryOp::Eq),
        "<>" => (BP_COMPARE, BinaryOp::Ne),
        "<" => (BP_COMPARE, BinaryOp::Lt),
        "<=" => (BP_COMPARE, BinaryOp::Le),
        ">" => (BP_COMPARE, BinaryOp::Gt),
        ">=" => (BP_COMPARE, BinaryOp::Ge),
        "in" => (BP_TERM, BinaryOp::In),
        "+" => (BP_ADD, BinaryOp::Add),
        "-" => (BP_ADD, BinaryOp::Sub),
        "/" => (BP_MUL, BinaryOp::Div),
        "%" => (BP_MUL, BinaryOp::Mod),
        "||" => (BP_CONCAT, BinaryOp::Concat),
        _ => return None,
    };
    Some((bp.0, bp.1, op))
}

/// Parse an expression with the given minimum binding power.
pub(crate) fn parse_expr(p: &mut Parser, min_bp: u8) -> Result<Expr, ParseError> {
    let mut lhs = parse_prefix(p)?;

    loop {
        let Some(token) = p.peek().cloned() else {
            break;
        };

        // ── IS [NOT] <type> ──
        if token.is_operator("is") && BP_TERM.0 >= min_bp {
            p.advance();
            let negated = p.eat_operator("not");
            let type_name = parse_type_name(p)?;
            lhs = Expr::IsType {
                value: Box::new(lhs),
                type_name,
            };
            if negated {
                lhs = Expr::Unary(UnaryOp::Not, Box::new(lhs));
            }
            continue;
        }

        // ── BETWEEN a AND b ──
        if token.is_keyword("between") && BP_TERM.0 >= min_bp {
            p.advance();
            lhs = parse_between(p, lhs)?;
            continue;
        }

        // ── LIKE pattern [ESCAPE c] ──
        if token.is_operator("like") && BP_TERM.0 >= min_bp {
            p.advance();
            lhs = parse_like(p, lhs)?;
            continue;
        }

        // ── NOT LIKE / NOT BETWEEN / NOT IN ──
        if token.is_operator("not") && BP_TERM.0 >= min_bp {
            p.advance();
            let negated = if p.eat_operator("like") {
                parse_like(p, lhs)?
            } else if p.eat_keyword("between") {
                parse_between(p, lhs)?
            } else if p.eat_operator("in") {
                let rhs = parse_expr(p, BP_TERM.1)?;
                Expr::Binary(BinaryOp::In, Box::new(lhs), Box::new(rhs))
            } else {
                return Err(error::at_token(
                    ParseErrorCode::UnexpectedOperator,
                    p.error_context(),
                ));
            };
            lhs = Expr::Unary(UnaryOp::Not, Box::new(negated));
            continue;
        }

        if let Some((left_bp, right_bp, op)) = infix_binding_power(&token) {
            if left_bp < min_bp {
                break;
            }
            p.advance();
            let rhs = parse_expr(p, right_bp)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
            continue;
        }

        break;
    }

    Ok(lhs)
}

/// `BETWEEN` bounds parse above comparison precedence so the `AND` here
/// stays a keyword, not the boolean operator.
fn parse_between(p: &mut Parser, value: Expr) -> Result<Expr, ParseError> {
    let lower = parse_expr(p, BP_TERM.1)?;
    if !p.eat_operator("and") {
        return Err(error::expected_keyword("AND", p.error_context()));
    }
    let upper = parse_expr(p, BP_TERM.1)?;
    Ok(Expr::Between {
        value: Box::new(value),
        lower: Box::new(lower),
        upper: Box::new(upper),
    })
}

fn parse_like(p: &mut Parser, value: Expr) -> Result<Expr, ParseError> {
    let pattern = parse_expr(p, BP_TERM.1)?;
    let escape = if p.eat_keyword("escape") {
        Some(Box::new(parse_expr(p, BP_TERM.1)?))
    } else {
        None
    };
    Ok(Expr::Like {
        value: Box::new(value),
        pattern: Box::new(pattern),
        escape,
    })
}

// ── Prefix, atoms, and paths ───────────────────────────────────────────

fn parse_prefix(p: &mut Parser) -> Result<Expr, ParseError> {
    let Some(token) = p.peek().cloned() else {
        return Err(error::at_token(
            ParseErrorCode::ExpectedExpression,
            p.last(),
        ));
    };

    if token.token_type == TokenType::Operator {
        match token.text() {
            Some("not") => {
                p.advance();
                let operand = parse_expr(p, BP_NOT_PREFIX)?;
                return Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)));
            }
            Some("+") => {
                p.advance();
                let operand = parse_expr(p, BP_SIGN_PREFIX)?;
                return Ok(Expr::Unary(UnaryOp::Pos, Box::new(operand)));
            }
            Some("-") => {
                p.advance();
                let operand = parse_expr(p, BP_SIGN_PREFIX)?;
                return Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)));
            }
            Some("@") => {
                p.advance();
                let next = p.peek().cloned();
                let name = match next {
                    Some(next) if next.token_type == TokenType::Identifier => {
                        p.advance();
                        next.text().unwrap_or_default().to_string()
                    }
                    other => {
                        return Err(error::at_token(
                            ParseErrorCode::MissingIdentAfterAt,
                            other.as_ref().or(Some(&token)),
                        ))
                    }
                };
                return parse_postfix(p, Expr::LocalId(name));
            }
            _ => {
                return Err(error::at_token(
                    ParseErrorCode::UnexpectedOperator,
                    Some(&token),
                ))
            }
        }
    }

    let atom = parse_atom(p, token)?;
    parse_postfix(p, atom)
}

fn parse_atom(p: &mut Parser, token: Token) -> Result<Expr, ParseError> {
    match token.token_type {
        TokenType::Literal => {
            p.advance();
            match token.value {
                Some(value) => Ok(Expr::Lit(value)),
                None => {
                    let mut error =
                        error::at_token(ParseErrorCode::UnexpectedToken, Some(&token));
                    error.internal = true;
                    Err(error)
                }
            }
        }
        TokenType::Identifier => {
            p.advance();
            let name = token.text().unwrap_or_default().to_string();
            if p.peek().map(|t| t.token_type) == Some(TokenType::LeftParen) {
                parse_call(p, name)
            } else {
                Ok(Expr::Id(name))
            }
        }
        TokenType::Keyword => {
            let keyword = token.text().unwrap_or_default().to_string();
            p.advance();
            match keyword.as_str() {
                "select" => select::parse_select(p),
                "case" => parse_case(p),
                "cast" => parse_cast(p),
                "values" => parse_values(p),
                "substring" => parse_substring(p),
                "trim" => parse_trim(p),
                "null" => Ok(Expr::Lit(Value::null())),
                "missing" => Ok(Expr::Lit(Value::missing())),
                _ => Err(error::at_token(
                    ParseErrorCode::UnexpectedKeyword,
                    Some(&token),
                )),
            }
        }
        TokenType::LeftParen => {
            p.advance();
            let expr = parse_expr(p, 0)?;
            p.expect_token(TokenType::RightParen)?;
            Ok(expr)
        }
        TokenType::LeftBracket => {
            p.advance();
            let mut items = Vec::new();
            if !p.eat_token(TokenType::RightBracket) {
                loop {
                    items.push(parse_expr(p, 0)?);
                    if p.eat_token(TokenType::Comma) {
                        continue;
                    }
                    p.expect_token(TokenType::RightBracket)?;
                    break;
                }
            }
            Ok(Expr::List(items))
        }
        TokenType::LeftCurly => {
            p.advance();
            let mut fields = Vec::new();
            if !p.eat_token(TokenType::RightCurly) {
                loop {
                    let name = parse_expr(p, 0)?;
                    p.expect_token(TokenType::Colon)?;
                    let value = parse_expr(p, 0)?;
                    fields.push((name, value));
                    if p.eat_token(TokenType::Comma) {
                        continue;
                    }
                    p.expect_token(TokenType::RightCurly)?;
                    break;
                }
            }
            Ok(Expr::Struct(fields))
        }
        _ => Err(error::at_token(
            ParseErrorCode::UnexpectedTerm,
            Some(&token),
        )),
    }
}

/// Postfix path components: `.ident`, `[expr]`, `.*`, `[*]`.
fn parse_postfix(p: &mut Parser, base: Expr) -> Result<Expr, ParseError> {
    let mut components = Vec::new();
    loop {
        match p.peek().map(|t| t.token_type) {
            Some(TokenType::Dot) => {
                p.advance();
                match p.peek().cloned() {
                    Some(next) if next.token_type == TokenType::Identifier => {
                        p.advance();
                        components
                            .push(PathComponent::Field(next.text().unwrap_or_default().into()));
                    }
                    Some(next) if next.token_type == TokenType::Star => {
                        p.advance();
                        components.push(PathComponent::UnpivotWildcard);
                    }
                    other => {
                        // Consecutive dots land here too.
                        return Err(error::at_token(
                            ParseErrorCode::InvalidPathComponent,
                            other.as_ref().or(p.last()),
                        ));
                    }
                }
            }
            Some(TokenType::LeftBracket) => {
                p.advance();
                if p.eat_token(TokenType::Star) {
                    p.expect_token(TokenType::RightBracket)?;
                    components.push(PathComponent::Wildcard);
                } else {
                    let index = parse_expr(p, 0)?;
                    p.expect_token(TokenType::RightBracket)?;
                    components.push(PathComponent::Index(index));
                }
            }
            _ => break,
        }
    }
    if components.is_empty() {
        Ok(base)
    } else {
        Ok(Expr::Path(Box::new(base), components))
    }
}

// ── Function-call forms ────────────────────────────────────────────────

fn parse_call(p: &mut Parser, name: String) -> Result<Expr, ParseError> {
    p.expect_token(TokenType::LeftParen)?;
    let mut args = Vec::new();
    if !p.eat_token(TokenType::RightParen) {
        loop {
            args.push(parse_expr(p, 0)?);
            if p.eat_token(TokenType::Comma) {
                continue;
            }
            if p.eat_token(TokenType::RightParen) {
                break;
            }
            return Err(error::expected_2_token_types(
                TokenType::Comma,
                TokenType::RightParen,
                p.error_context(),
            ));
        }
    }
    Ok(Expr::Call {
        name: name.to_lowercase(),
        args,
    })
}

fn parse_cast(p: &mut Parser) -> Result<Expr, ParseError> {
    if !p.eat_token(TokenType::LeftParen) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedLeftParenAfterCast,
            p.error_context(),
        ));
    }
    let value = parse_expr(p, 0)?;
    if !p.eat_keyword("as") {
        return Err(error::expected_keyword("AS", p.error_context()));
    }
    let type_name = parse_type_name(p)?;
    p.expect_token(TokenType::RightParen)?;
    Ok(Expr::Cast {
        value: Box::new(value),
        type_name,
    })
}

/// A type name with optional parenthesized integer parameters, checked
/// against the type's expected arity.
pub(crate) fn parse_type_name(p: &mut Parser) -> Result<TypeName, ParseError> {
    let Some(token) = p.peek().cloned() else {
        return Err(error::at_token(ParseErrorCode::ExpectedTypeName, p.last()));
    };
    let ty = match token.token_type {
        TokenType::Identifier | TokenType::Keyword => token
            .text()
            .map(str::to_lowercase)
            .as_deref()
            .and_then(SqlType::from_name),
        _ => None,
    };
    let Some(ty) = ty else {
        return Err(error::at_token(
            ParseErrorCode::ExpectedTypeName,
            Some(&token),
        ));
    };
    p.advance();

    let mut params = Vec::new();
    if p.eat_token(TokenType::LeftParen) {
        loop {
            let param = p.peek().cloned();
            let value = param
                .as_ref()
                .filter(|t| t.token_type == TokenType::Literal)
                .and_then(|t| t.value.as_ref())
                .and_then(Value::as_int)
                .filter(|n| *n >= 0);
            match value {
                Some(n) => {
                    p.advance();
                    params.push(n);
                }
                None => {
                    return Err(error::at_token(
                        ParseErrorCode::InvalidTypeParam,
                        param.as_ref().or_else(|| p.last()),
                    )
                    .with(
                        Property::CastTo,
                        PropertyValue::Text(ty.name().to_uppercase()),
                    ))
                }
            }
            if p.eat_token(TokenType::Comma) {
                continue;
            }
            p.expect_token(TokenType::RightParen)?;
            break;
        }
    }

    let (min, max) = ty.arity();
    if params.len() < min || params.len() > max {
        return Err(error::cast_arity(ty.name(), min, max, Some(&token)));
    }
    Ok(TypeName::new(ty, params))
}

fn parse_case(p: &mut Parser) -> Result<Expr, ParseError> {
    let operand = if p.peek().is_some_and(|t| t.is_keyword("when")) {
        None
    } else {
        Some(Box::new(parse_expr(p, 0)?))
    };

    if !p.peek().is_some_and(|t| t.is_keyword("when")) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedWhenClause,
            p.error_context(),
        ));
    }

    let mut whens = Vec::new();
    while p.eat_keyword("when") {
        let condition = parse_expr(p, 0)?;
        p.expect_keyword("then")?;
        let result = parse_expr(p, 0)?;
        whens.push((condition, result));
    }

    let otherwise = if p.eat_keyword("else") {
        Some(Box::new(parse_expr(p, 0)?))
    } else {
        None
    };
    p.expect_keyword("end")?;

    Ok(Expr::Case {
        operand,
        whens,
        otherwise,
    })
}

fn parse_values(p: &mut Parser) -> Result<Expr, ParseError> {
    let mut rows = Vec::new();
    loop {
        // Every row must be parenthesized.
        if !p.eat_token(TokenType::LeftParen) {
            return Err(error::at_token(
                ParseErrorCode::ExpectedLeftParenValueConstructor,
                p.error_context(),
            ));
        }
        let mut row = vec![parse_expr(p, 0)?];
        while p.eat_token(TokenType::Comma) {
            row.push(parse_expr(p, 0)?);
        }
        p.expect_token(TokenType::RightParen)?;
        rows.push(row);
        if !p.eat_token(TokenType::Comma) {
            break;
        }
    }
    Ok(Expr::Values(rows))
}

/// `SUBSTRING(s FROM n [FOR m])` and `SUBSTRING(s, n [, m])`.
fn parse_substring(p: &mut Parser) -> Result<Expr, ParseError> {
    if !p.eat_token(TokenType::LeftParen) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedLeftParenBuiltinFunctionCall,
            p.error_context(),
        ));
    }
    let mut args = vec![parse_expr(p, 0)?];
    if p.eat_keyword("from") {
        args.push(parse_expr(p, 0)?);
        if p.eat_keyword("for") {
            args.push(parse_expr(p, 0)?);
        }
    } else if p.eat_token(TokenType::Comma) {
        args.push(parse_expr(p, 0)?);
        if p.eat_token(TokenType::Comma) {
            args.push(parse_expr(p, 0)?);
        }
    } else {
        return Err(error::at_token(
            ParseErrorCode::ExpectedArgumentDelimiter,
            p.error_context(),
        ));
    }
    if !p.eat_token(TokenType::RightParen) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedRightParenBuiltinFunctionCall,
            p.error_context(),
        ));
    }
    Ok(Expr::Call {
        name: "substring".to_string(),
        args,
    })
}

/// `TRIM([[LEADING|TRAILING|BOTH] [chars] FROM] s)`.
///
/// Lowers to `call trim` with the trim kind as a leading symbol literal:
/// `(call trim (lit both) [chars] target)`.
fn parse_trim(p: &mut Parser) -> Result<Expr, ParseError> {
    if !p.eat_token(TokenType::LeftParen) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedLeftParenBuiltinFunctionCall,
            p.error_context(),
        ));
    }

    let kind = ["leading", "trailing", "both"]
        .into_iter()
        .find(|k| p.eat_keyword(k));
    let kind_expr = Expr::Lit(Value::symbol(kind.unwrap_or("both")));

    let mut args = vec![kind_expr];
    if kind.is_some() && p.eat_keyword("from") {
        // TRIM(BOTH FROM s): default chars.
        args.push(parse_expr(p, 0)?);
    } else {
        let first = parse_expr(p, 0)?;
        if p.eat_keyword("from") {
            args.push(first);
            args.push(parse_expr(p, 0)?);
        } else if kind.is_some() {
            return Err(error::expected_keyword("FROM", p.error_context()));
        } else {
            args.push(first);
        }
    }

    if !p.eat_token(TokenType::RightParen) {
        return Err(error::at_token(
            ParseErrorCode::ExpectedRightParenBuiltinFunctionCall,
            p.error_context(),
        ));
    }
    Ok(Expr::Call {
        name: "trim".to_string(),
        args,
    })
}
