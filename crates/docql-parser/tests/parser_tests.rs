use docql_common::{
    Error, ParseError, ParseErrorCode, Property, PropertyValue, TokenType,
};
use docql_parser::parse;
use insta::assert_snapshot;

/// Parse and render the s-expression form.
fn sexp(source: &str) -> String {
    parse(source).expect("query should parse").to_sexp().to_string()
}

fn parse_error(source: &str) -> ParseError {
    match parse(source) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected parse error, got {other:?}"),
    }
}

// ── Expression shapes ──────────────────────────────────────────────────

#[test]
fn arithmetic_precedence() {
    assert_snapshot!(sexp("a + b * 2"), @"(+ (id a) (* (id b) (lit 2)))");
    assert_snapshot!(sexp("a * b + 2"), @"(+ (* (id a) (id b)) (lit 2))");
    assert_snapshot!(sexp("(a + b) * 2"), @"(* (+ (id a) (id b)) (lit 2))");
}

#[test]
fn boolean_precedence() {
    assert_snapshot!(
        sexp("1 < 2 and true or false"),
        @"(or (and (< (lit 1) (lit 2)) (lit true)) (lit false))"
    );
    assert_snapshot!(
        sexp("not a = b"),
        @"(not (= (id a) (id b)))"
    );
}

#[test]
fn comparison_operators_normalize() {
    assert_snapshot!(sexp("a != b"), @"(<> (id a) (id b))");
    assert_snapshot!(sexp("a <> b"), @"(<> (id a) (id b))");
}

#[test]
fn concatenation_binds_tightest() {
    assert_snapshot!(
        sexp("a || b = c"),
        @"(= (|| (id a) (id b)) (id c))"
    );
}

#[test]
fn between_parses_with_keyword_and() {
    assert_snapshot!(
        sexp("5 between 1 and 10"),
        @"(between (lit 5) (lit 1) (lit 10))"
    );
    // The boolean AND still works around it.
    assert_snapshot!(
        sexp("5 between 1 and 10 and x"),
        @"(and (between (lit 5) (lit 1) (lit 10)) (id x))"
    );
}

#[test]
fn like_with_escape() {
    assert_snapshot!(
        sexp("'100%' like '1%[%' escape '['"),
        @r#"(like (lit "100%") (lit "1%[%") (lit "["))"#
    );
}

#[test]
fn negated_term_operators() {
    assert_snapshot!(sexp("a not like b"), @"(not (like (id a) (id b)))");
    assert_snapshot!(
        sexp("a not between 1 and 2"),
        @"(not (between (id a) (lit 1) (lit 2)))"
    );
    assert_snapshot!(sexp("a not in [1, 2]"), @"(not (in (id a) (list (lit 1) (lit 2))))");
}

#[test]
fn is_type_tests() {
    assert_snapshot!(sexp("x is null"), @"(is (id x) (type null))");
    assert_snapshot!(sexp("x is not missing"), @"(not (is (id x) (type missing)))");
    assert_snapshot!(sexp("x is integer"), @"(is (id x) (type integer))");
}

#[test]
fn paths() {
    assert_snapshot!(sexp("a.b.c"), @r#"(path (id a) (lit "b") (lit "c"))"#);
    assert_snapshot!(sexp("a[0]"), @"(path (id a) (lit 0))");
    assert_snapshot!(sexp("a[*]"), @"(path (id a) (wildcard))");
    assert_snapshot!(sexp("a.*"), @"(path (id a) (unpivot_wildcard))");
    assert_snapshot!(sexp("@a.b"), @r#"(path (@ (id a)) (lit "b"))"#);
}

#[test]
fn cast_with_type_params() {
    assert_snapshot!(sexp("cast(a as integer)"), @"(cast (id a) (type integer))");
    assert_snapshot!(
        sexp("cast(a as varchar(10))"),
        @"(cast (id a) (type varchar 10))"
    );
    assert_snapshot!(
        sexp("cast(a as decimal(10, 2))"),
        @"(cast (id a) (type decimal 10 2))"
    );
}

#[test]
fn case_forms() {
    assert_snapshot!(
        sexp("case when a then 1 else 2 end"),
        @"(case (when (id a) (lit 1)) (else (lit 2)))"
    );
    assert_snapshot!(
        sexp("case x when 1 then 'one' end"),
        @r#"(case (id x) (when (lit 1) (lit "one")))"#
    );
}

#[test]
fn constructors() {
    assert_snapshot!(sexp("[1, 2]"), @"(list (lit 1) (lit 2))");
    assert_snapshot!(
        sexp("{'a': 1, 'b': 2}"),
        @r#"(struct ((lit "a") (lit 1)) ((lit "b") (lit 2)))"#
    );
    assert_snapshot!(
        sexp("values (1, 2), (3, 4)"),
        @"(values (list (lit 1) (lit 2)) (list (lit 3) (lit 4)))"
    );
}

#[test]
fn function_calls() {
    assert_snapshot!(sexp("char_length('abc')"), @r#"(call char_length (lit "abc"))"#);
    assert_snapshot!(
        sexp("substring('abc' from 2 for 1)"),
        @r#"(call substring (lit "abc") (lit 2) (lit 1))"#
    );
    assert_snapshot!(
        sexp("substring('abc', 2)"),
        @r#"(call substring (lit "abc") (lit 2))"#
    );
    assert_snapshot!(
        sexp("trim(leading 'x' from s)"),
        @r#"(call trim (lit leading) (lit "x") (id s))"#
    );
    assert_snapshot!(sexp("trim(s)"), @"(call trim (lit both) (id s))");
}

#[test]
fn select_star() {
    assert_snapshot!(
        sexp("select * from animals a"),
        @"(select (project (star)) (from (as a (id animals))))"
    );
}

#[test]
fn select_full_clause_list() {
    assert_snapshot!(
        sexp("select a.name as n from t as a at i where a.age > 4 group by a.kind having a.kind <> 'x' order by n desc limit 10"),
        @r#"(select (project (list (as n (path (id a) (lit "name"))))) (from (at i (as a (id t)))) (where (> (path (id a) (lit "age")) (lit 4))) (group_by (path (id a) (lit "kind"))) (having (<> (path (id a) (lit "kind")) (lit "x"))) (order_by (desc (id n))) (limit (lit 10)))"#
    );
}

#[test]
fn select_from_unpivot() {
    assert_snapshot!(
        sexp("select v, k from unpivot e as v at k"),
        @"(select (project (list (id v) (id k))) (from (at k (as v (unpivot (id e))))))"
    );
}

#[test]
fn embedded_literals_parse_as_literals() {
    assert_snapshot!(sexp("`[1, 2]`"), @"(lit [1, 2])");
}

// ── Error scenarios ────────────────────────────────────────────────────

#[test]
fn between_missing_and_keyword() {
    let e = parse_error("5 BETWEEN 1  10");
    assert_eq!(e.code, ParseErrorCode::ExpectedKeyword);
    assert_eq!(
        e.properties.get(Property::Keyword),
        Some(&PropertyValue::Text("AND".into()))
    );
    assert_eq!(
        e.properties.get(Property::LineNumber),
        Some(&PropertyValue::Integer(1))
    );
    assert_eq!(
        e.properties.get(Property::ColumnNumber),
        Some(&PropertyValue::Integer(14))
    );
    assert_eq!(
        e.properties.get(Property::TokenType),
        Some(&PropertyValue::TokenType(TokenType::Literal))
    );
    assert_eq!(
        e.properties.get(Property::TokenValue),
        Some(&PropertyValue::Text("10".into()))
    );
    assert!(!e.internal);
}

#[test]
fn is_requires_a_type_name() {
    let e = parse_error("x is 5");
    assert_eq!(e.code, ParseErrorCode::ExpectedTypeName);
}

#[test]
fn at_requires_an_identifier() {
    let e = parse_error("@5");
    assert_eq!(e.code, ParseErrorCode::MissingIdentAfterAt);
}

#[test]
fn cast_arity_violations() {
    let e = parse_error("cast(a as integer(1))");
    assert_eq!(e.code, ParseErrorCode::CastArity);
    assert_eq!(
        e.properties.get(Property::ExpectedArityMin),
        Some(&PropertyValue::Integer(0))
    );
    assert_eq!(
        e.properties.get(Property::ExpectedArityMax),
        Some(&PropertyValue::Integer(0))
    );
    assert_eq!(
        e.properties.get(Property::CastTo),
        Some(&PropertyValue::Text("INTEGER".into()))
    );

    // VARCHAR requires exactly one parameter.
    let e = parse_error("cast(a as varchar)");
    assert_eq!(e.code, ParseErrorCode::CastArity);
}

#[test]
fn cast_type_params_must_be_non_negative_integers() {
    let e = parse_error("cast(a as varchar('x'))");
    assert_eq!(e.code, ParseErrorCode::InvalidTypeParam);
}

#[test]
fn cast_requires_left_paren() {
    let e = parse_error("cast a as integer");
    assert_eq!(e.code, ParseErrorCode::ExpectedLeftParenAfterCast);
}

#[test]
fn select_requires_from() {
    let e = parse_error("select a");
    assert_eq!(e.code, ParseErrorCode::SelectMissingFrom);
}

#[test]
fn group_by_rejects_ordinal_literals() {
    let e = parse_error("select a from t group by 1");
    assert_eq!(e.code, ParseErrorCode::UnsupportedLiteralsGroupBy);
}

#[test]
fn aliases_must_be_identifiers() {
    let e = parse_error("select * from t as 5");
    assert_eq!(e.code, ParseErrorCode::ExpectedIdentForAlias);
    let e = parse_error("select * from t at 5");
    assert_eq!(e.code, ParseErrorCode::ExpectedIdentForAt);
}

#[test]
fn values_rows_must_be_parenthesized() {
    let e = parse_error("values 1, 2");
    assert_eq!(e.code, ParseErrorCode::ExpectedLeftParenValueConstructor);
}

#[test]
fn consecutive_dots_are_invalid_path_components() {
    let e = parse_error("a..b");
    assert_eq!(e.code, ParseErrorCode::InvalidPathComponent);
}

#[test]
fn case_requires_a_when_clause() {
    let e = parse_error("case a end");
    assert_eq!(e.code, ParseErrorCode::ExpectedWhenClause);
}

#[test]
fn case_when_requires_then() {
    let e = parse_error("case when a 1 end");
    assert_eq!(e.code, ParseErrorCode::ExpectedKeyword);
    assert_eq!(
        e.properties.get(Property::Keyword),
        Some(&PropertyValue::Text("THEN".into()))
    );
}

#[test]
fn call_arguments_need_delimiters() {
    let e = parse_error("f(a b)");
    assert_eq!(e.code, ParseErrorCode::Expected2TokenTypes);
    assert_eq!(
        e.properties.get(Property::ExpectedTokenType1Of2),
        Some(&PropertyValue::TokenType(TokenType::Comma))
    );
    assert_eq!(
        e.properties.get(Property::ExpectedTokenType2Of2),
        Some(&PropertyValue::TokenType(TokenType::RightParen))
    );
}

#[test]
fn substring_requires_delimiter_and_parens() {
    let e = parse_error("substring('abc' 2)");
    assert_eq!(e.code, ParseErrorCode::ExpectedArgumentDelimiter);
    let e = parse_error("substring 'abc'");
    assert_eq!(e.code, ParseErrorCode::ExpectedLeftParenBuiltinFunctionCall);
    let e = parse_error("substring('abc', 2");
    assert_eq!(e.code, ParseErrorCode::ExpectedRightParenBuiltinFunctionCall);
}

#[test]
fn trailing_tokens_are_rejected() {
    let e = parse_error("1 2");
    assert_eq!(e.code, ParseErrorCode::UnexpectedToken);
}

#[test]
fn unexpected_keyword_in_expression_position() {
    let e = parse_error("select distinct a from t");
    assert_eq!(e.code, ParseErrorCode::UnexpectedKeyword);
}

#[test]
fn eof_mid_expression_is_expected_expression() {
    let e = parse_error("1 +");
    assert_eq!(e.code, ParseErrorCode::ExpectedExpression);
}
