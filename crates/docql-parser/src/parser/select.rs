//! Recursive descent for the SELECT statement form.

use docql_common::{ParseError, ParseErrorCode, TokenType};
use docql_value::ValueType;

use crate::ast::{
    Expr, FromKind, FromSource, OrderKey, Projection, Select, SelectItem,
};
use crate::error;

use super::expressions::parse_expr;
use super::Parser;

/// Parse a SELECT after its leading keyword has been consumed.
pub(crate) fn parse_select(p: &mut Parser) -> Result<Expr, ParseError> {
    let projection = parse_projection(p)?;

    if !p.eat_keyword("from") {
        return Err(error::at_token(
            ParseErrorCode::SelectMissingFrom,
            p.error_context(),
        ));
    }

    let mut from = vec![parse_from_source(p)?];
    while p.eat_token(TokenType::Comma) {
        from.push(parse_from_source(p)?);
    }

    let where_clause = if p.eat_keyword("where") {
        Some(parse_expr(p, 0)?)
    } else {
        None
    };

    let mut group_by = Vec::new();
    if p.eat_keyword("group") {
        p.expect_keyword("by")?;
        loop {
            group_by.push(parse_group_key(p)?);
            if !p.eat_token(TokenType::Comma) {
                break;
            }
        }
    }

    let having = if p.eat_keyword("having") {
        Some(parse_expr(p, 0)?)
    } else {
        None
    };

    let mut order_by = Vec::new();
    if p.eat_keyword("order") {
        p.expect_keyword("by")?;
        loop {
            let expr = parse_expr(p, 0)?;
            let descending = if p.eat_keyword("desc") {
                true
            } else {
                p.eat_keyword("asc");
                false
            };
            order_by.push(OrderKey { expr, descending });
            if !p.eat_token(TokenType::Comma) {
                break;
            }
        }
    }

    let limit = if p.eat_keyword("limit") {
        Some(parse_expr(p, 0)?)
    } else {
        None
    };

    Ok(Expr::Select(Box::new(Select {
        projection,
        from,
        where_clause,
        group_by,
        having,
        order_by,
        limit,
    })))
}

fn parse_projection(p: &mut Parser) -> Result<Projection, ParseError> {
    if p.eat_token(TokenType::Star) {
        return Ok(Projection::Star);
    }

    let mut items = Vec::new();
    loop {
        let expr = parse_expr(p, 0)?;
        let alias = if p.eat_keyword("as") {
            Some(expect_alias_identifier(
                p,
                ParseErrorCode::ExpectedIdentForAlias,
            )?)
        } else {
            None
        };
        items.push(SelectItem { expr, alias });
        if !p.eat_token(TokenType::Comma) {
            break;
        }
    }
    Ok(Projection::List(items))
}

/// One FROM source: `[UNPIVOT] expr [[AS] alias] [AT position_alias]`.
fn parse_from_source(p: &mut Parser) -> Result<FromSource, ParseError> {
    let kind = if p.eat_keyword("unpivot") {
        FromKind::Unpivot
    } else {
        FromKind::Scan
    };

    let expr = parse_expr(p, 0)?;

    let as_alias = if p.eat_keyword("as") {
        Some(expect_alias_identifier(
            p,
            ParseErrorCode::ExpectedIdentForAlias,
        )?)
    } else if p.peek().map(|t| t.token_type) == Some(TokenType::Identifier) {
        // Bare alias: `FROM animals a`.
        Some(expect_alias_identifier(
            p,
            ParseErrorCode::ExpectedIdentForAlias,
        )?)
    } else {
        None
    };

    let at_alias = if p.eat_keyword("at") {
        Some(expect_alias_identifier(
            p,
            ParseErrorCode::ExpectedIdentForAt,
        )?)
    } else {
        None
    };

    Ok(FromSource {
        kind,
        expr,
        as_alias,
        at_alias,
    })
}

/// Aliases must be identifiers; anything else surfaces the given code.
fn expect_alias_identifier(p: &mut Parser, code: ParseErrorCode) -> Result<String, ParseError> {
    let token = p.peek().cloned();
    match token {
        Some(token) if token.token_type == TokenType::Identifier => {
            p.advance();
            Ok(token.text().unwrap_or_default().to_string())
        }
        other => Err(error::at_token(code, other.as_ref().or_else(|| p.last()))),
    }
}

/// GROUP BY keys must be expressions, not ordinal literals.
fn parse_group_key(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek().cloned();
    let expr = parse_expr(p, 0)?;
    if let Expr::Lit(value) = &expr {
        if value.value_type() == ValueType::Int {
            return Err(error::at_token(
                ParseErrorCode::UnsupportedLiteralsGroupBy,
                start.as_ref().or_else(|| p.last()),
            ));
        }
    }
    Ok(expr)
}
