use docql_common::{Error, EvalError, EvalErrorCode};
use docql_eval::{compile, eval, Bindings};
use docql_value::{parse_value, pts_eq, ValueType};

fn bindings(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(name, text)| {
            (
                name.to_string(),
                parse_value(text).expect("environment value parses"),
            )
        })
        .collect()
}

/// Evaluate and compare against an expected value in text form, using PTS
/// equality as the oracle.
fn assert_result(source: &str, env: &[(&str, &str)], expected: &str) {
    let result = eval(source, bindings(env)).expect("query evaluates");
    let expected = parse_value(expected).expect("expected value parses");
    assert!(
        pts_eq(&result, &expected),
        "query {source:?}: got {result}, want {expected}"
    );
}

fn eval_error(source: &str, env: &[(&str, &str)]) -> EvalError {
    match eval(source, bindings(env)) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected evaluation error for {source:?}, got {other:?}"),
    }
}

const ANIMALS: (&str, &str) = (
    "animals",
    r#"[{name: "Kumo"}, {name: "Mochi"}, {name: "Lilikoi"}]"#,
);

// ── Scalars and operators ──────────────────────────────────────────────

#[test]
fn arithmetic() {
    assert_result("1 + 2 * 3", &[], "7");
    assert_result("7 / 2", &[], "3");
    assert_result("7 % 2", &[], "1");
    assert_result("1.0 + 2", &[], "3.0");
    // E-notation literals are DECIMAL in this dialect.
    assert_result("1 + 0.5e0", &[], "1.5");
    assert_result("- (1 + 2)", &[], "-3");
}

#[test]
fn division_by_zero_is_an_error() {
    let e = eval_error("1 / 0", &[]);
    assert_eq!(e.code, EvalErrorCode::Generic);
}

#[test]
fn int_overflow_in_arithmetic() {
    let e = eval_error("9223372036854775807 + 1", &[]);
    assert_eq!(e.code, EvalErrorCode::IntOverflow);
}

#[test]
fn equality_coerces_numerics_but_not_types() {
    assert_result("1 = 1.0", &[], "true");
    assert_result("1 = 1.5e0", &[], "false");
    assert_result("'a' = 'a'", &[], "true");
    assert_result("1 = '1'", &[], "false");
    assert_result("1 <> 2", &[], "true");
}

#[test]
fn sql_equality_is_unknown_on_null_or_missing() {
    assert_result("null = 1", &[], "null");
    assert_result("missing = missing", &[], "null");
    assert_result("null = null", &[], "null");
}

#[test]
fn three_valued_logic() {
    assert_result("null and false", &[], "false");
    assert_result("null and true", &[], "null");
    assert_result("null or true", &[], "true");
    assert_result("null or false", &[], "null");
    assert_result("not null", &[], "null");
}

#[test]
fn comparisons_follow_the_numeric_ladder() {
    assert_result("2 > 1.5", &[], "true");
    assert_result("0.5 between 0 and 1", &[], "true");
    assert_result("5 between 1 and 4", &[], "false");
    assert_result("'b' between 'a' and 'c'", &[], "true");
}

#[test]
fn concatenation() {
    assert_result("'foo' || 'bar'", &[], "\"foobar\"");
    assert_result("null || 'bar'", &[], "null");
}

#[test]
fn in_membership() {
    assert_result("2 in [1, 2, 3]", &[], "true");
    assert_result("4 in [1, 2, 3]", &[], "false");
    assert_result("null in [1]", &[], "null");
}

#[test]
fn case_expressions() {
    assert_result(
        "case when 1 > 2 then 'a' when 2 > 1 then 'b' else 'c' end",
        &[],
        "\"b\"",
    );
    assert_result("case 2 when 1 then 'a' when 2 then 'b' end", &[], "\"b\"");
    assert_result("case 9 when 1 then 'a' end", &[], "null");
}

#[test]
fn is_type_tests() {
    assert_result("5 is integer", &[], "true");
    assert_result("5 is decimal", &[], "false");
    assert_result("null is null", &[], "true");
    assert_result("missing is null", &[], "true");
    assert_result("missing is missing", &[], "true");
    assert_result("5 is not null", &[], "true");
}

// ── Paths ──────────────────────────────────────────────────────────────

#[test]
fn path_navigation() {
    let env = [("a", "{b: {c: 7}, xs: [10, 20]}")];
    assert_result("a.b.c", &env, "7");
    assert_result("a.xs[1]", &env, "20");
    assert_result("a['b'].c", &env, "7");
}

#[test]
fn absent_fields_and_indexes_are_missing() {
    let env = [("a", "{b: 1}")];
    assert_result("a.nope", &env, "missing::null.symbol");
    assert_result("a.b.c", &env, "missing::null.symbol");
}

#[test]
fn path_wildcards_produce_bags() {
    let env = [("a", "{xs: [1, 2, 3]}")];
    assert_result("a.xs[*]", &env, "(bag 1 2 3)");
    let env = [("a", "{b: 1, c: 2}")];
    assert_result("a.*", &env, "(bag 1 2)");
}

// ── Bindings ───────────────────────────────────────────────────────────

#[test]
fn unknown_binding_is_an_error() {
    let e = eval_error("nosuch", &[]);
    assert_eq!(e.code, EvalErrorCode::BindingNotFound);
}

#[test]
fn at_forces_scope_local_resolution() {
    // `y` resolves lexically to the root scope, but `@y` looks only in the
    // row scope and fails.
    assert_result("select y as y from [1] as x", &[("y", "42")], "(bag {y: 42})");
    let e = eval_error("select @y as y from [1] as x", &[("y", "42")]);
    assert_eq!(e.code, EvalErrorCode::BindingNotFound);
}

// ── SELECT / FROM / WHERE ──────────────────────────────────────────────

#[test]
fn select_star_emits_the_row_environment() {
    assert_result(
        "select * from animals a",
        &[ANIMALS],
        r#"(bag {a: {name: "Kumo"}} {a: {name: "Mochi"}} {a: {name: "Lilikoi"}})"#,
    );
}

#[test]
fn row_independent_like_filter_keeps_every_row() {
    // The filter is true independently of the row, so all three pass.
    assert_result(
        "select * from animals a where '100%' like '1%[%' escape '['",
        &[ANIMALS],
        r#"(bag {a: {name: "Kumo"}} {a: {name: "Mochi"}} {a: {name: "Lilikoi"}})"#,
    );
}

#[test]
fn row_independent_false_like_filter_drops_every_row() {
    let result = eval(
        "select * from animals a where 'Kuumo' like 'K_mo'",
        bindings(&[ANIMALS]),
    )
    .unwrap();
    assert_eq!(result.value_type(), ValueType::Bag);
    assert_eq!(result.size(), Some(0));
}

#[test]
fn like_filters_per_row() {
    assert_result(
        "select a.name as name from animals a where a.name like 'K%'",
        &[ANIMALS],
        r#"(bag {name: "Kumo"})"#,
    );
    assert_result(
        "select a.name as name from animals a where a.name like '%o%'",
        &[ANIMALS],
        r#"(bag {name: "Kumo"} {name: "Mochi"} {name: "Lilikoi"})"#,
    );
}

#[test]
fn where_drops_unknown_rows() {
    assert_result(
        "select x as x from [1, 2, null] as x where x > 1",
        &[],
        "(bag {x: 2})",
    );
}

#[test]
fn from_non_sequence_is_a_singleton() {
    assert_result("select x as x from 5 as x", &[], "(bag {x: 5})");
}

#[test]
fn from_at_binds_zero_based_positions() {
    assert_result(
        "select i as i from [10, 20] as x at i",
        &[],
        "(bag {i: 0} {i: 1})",
    );
}

#[test]
fn from_cross_joins_multiple_sources() {
    assert_result(
        "select x as x, y as y from [1, 2] as x, [10, 20] as y",
        &[],
        "(bag {x: 1, y: 10} {x: 1, y: 20} {x: 2, y: 10} {x: 2, y: 20})",
    );
}

#[test]
fn later_sources_see_earlier_bindings() {
    assert_result(
        "select y as y from [[1, 2], [3]] as x, x as y",
        &[],
        "(bag {y: 1} {y: 2} {y: 3})",
    );
}

#[test]
fn implicit_from_alias_comes_from_the_source_name() {
    assert_result(
        "select t as v from t",
        &[("t", "[7]")],
        "(bag {v: 7})",
    );
}

#[test]
fn limit_truncates_rows() {
    assert_result(
        "select x as x from [1, 2, 3] as x limit 2",
        &[],
        "(bag {x: 1} {x: 2})",
    );
    let empty = eval("select x as x from [1] as x limit 0", Bindings::default()).unwrap();
    assert_eq!(empty.value_type(), ValueType::Bag);
    assert_eq!(empty.size(), Some(0));
}

#[test]
fn projection_names_fall_back_to_ordinals() {
    assert_result(
        "select x + 1, x + 2 from [1] as x",
        &[],
        "(bag {_1: 2, _2: 3})",
    );
}

#[test]
fn values_rows_evaluate_to_a_bag_of_lists() {
    assert_result("values (1, 2), (3, 4)", &[], "(bag [1, 2] [3, 4])");
}

#[test]
fn group_by_parses_but_does_not_evaluate() {
    let executable = compile("select a from t group by a").expect("parses");
    let err = match executable.eval(bindings(&[("t", "[1]")])) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected evaluation error, got {other:?}"),
    };
    assert_eq!(err.code, EvalErrorCode::Generic);
    assert!(!err.internal);
}

// ── UNPIVOT ────────────────────────────────────────────────────────────

#[test]
fn unpivot_emits_one_named_value_per_field() {
    let env = [("e", "{a: 1, b: 2}")];
    assert_result(
        "select v as v, n as n from unpivot e as v at n",
        &env,
        "(bag {v: 1, n: a} {v: 2, n: b})",
    );
}

#[test]
fn unpivot_names_flow_into_unaliased_projection() {
    // Without an alias the projected column takes the value's name facet.
    let env = [("e", "{a: 1, b: 2}")];
    assert_result(
        "select v from unpivot e as v",
        &env,
        "(bag {a: 1} {b: 2})",
    );
}

#[test]
fn unpivot_of_a_non_struct_is_a_singleton_named_underscore_one() {
    assert_result(
        "select v as v, n as n from unpivot 5 as v at n",
        &[],
        "(bag {v: 5, n: _1})",
    );
}

// ── CAST scenarios ─────────────────────────────────────────────────────

#[test]
fn cast_normalization() {
    assert_result("cast('-0005' as int)", &[], "-5");
    assert_result("cast('+0x10' as int)", &[], "16");
    assert_result("cast('true' as boolean)", &[], "true");
    assert_result("cast('TrUe' as boolean)", &[], "true");
    assert_result("cast('other' as boolean)", &[], "false");
}

#[test]
fn cast_overflow() {
    let e = eval_error("cast('99999999999999999999' as int)", &[]);
    assert_eq!(e.code, EvalErrorCode::IntOverflow);
}

#[test]
fn cast_failures_and_invalid_casts() {
    let e = eval_error("cast('abc' as int)", &[]);
    assert_eq!(e.code, EvalErrorCode::CastFailedNoLocation);
    let e = eval_error("cast(true as timestamp)", &[]);
    assert_eq!(e.code, EvalErrorCode::InvalidCastNoLocation);
}

#[test]
fn cast_between_sequence_types() {
    assert_result("cast([1, 2] as bag)", &[], "(bag 1 2)");
    assert_result("cast([1, 2] as sexp)", &[], "(1 2)");
}

#[test]
fn cast_is_idempotent_for_matching_types() {
    assert_result("cast(cast('5' as int) as int)", &[], "5");
    assert_result("cast(cast(5 as string) as string)", &[], "\"5\"");
}

// ── Builtins through queries ───────────────────────────────────────────

#[test]
fn builtin_calls() {
    assert_result("char_length('hello')", &[], "5");
    assert_result("upper('abc')", &[], "\"ABC\"");
    assert_result("substring('abcdef' from 2 for 3)", &[], "\"bcd\"");
    assert_result("substring('abcdef', 4)", &[], "\"def\"");
    assert_result("trim(both ' ' from '  x  ')", &[], "\"x\"");
    assert_result("size([1, 2, 3])", &[], "3");
    assert_result("exists([])", &[], "false");
}

#[test]
fn like_escape_before_ordinary_character_is_rejected() {
    let e = eval_error("'abc' like 'a[bc' escape '['", &[]);
    assert_eq!(e.code, EvalErrorCode::InvalidArguments);
}

#[test]
fn like_escape_must_be_one_code_point() {
    let e = eval_error("'abc' like 'abc' escape 'xy'", &[]);
    assert_eq!(e.code, EvalErrorCode::InvalidArguments);
}

#[test]
fn struct_constructors_omit_missing_fields() {
    assert_result("{'a': 1, 'b': missing}", &[], "{a: 1}");
    assert_result("{'a': [1, 2][5]}", &[], "{}");
}

#[test]
fn embedded_literals_evaluate_to_their_value() {
    assert_result("`[1, 2]`", &[], "[1, 2]");
    assert_result("`{a: 1}`.a", &[], "1");
}
