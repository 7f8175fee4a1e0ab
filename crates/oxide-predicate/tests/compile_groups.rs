//! Tests for group compilation: AND within groups, OR across them.

mod common;
use common::*;

use oxide_predicate::{
    compile as compile_inputs, Compiler, ConditionGroup, Filter, FilterSpec, Input, Operators,
    SqlValue,
};

#[test]
fn two_groups_are_or_joined() {
    let compiled = compile(vec![
        ConditionGroup::new().eq("a", 1),
        ConditionGroup::new().eq("b", 2),
    ]);
    assert_eq!(compiled.condition, "(a = ?) OR (b = ?)");
    assert_eq!(compiled.params, ints(&[1, 2]));
    assert_eq!(compiled.order_by, "");
}

#[test]
fn fields_in_a_group_are_and_joined() {
    let compiled = compile(
        ConditionGroup::new()
            .eq("a", 1)
            .eq("b", "x")
            .is_not_null("c"),
    );
    assert_eq!(compiled.condition, "(a = ? AND b = ? AND c IS NOT NULL)");
    assert_eq!(compiled.params, vec![SqlValue::Int(1), text("x")]);
}

#[test]
fn no_groups_is_always_true() {
    let compiled = compile(FilterSpec::new());
    assert_eq!(compiled.condition, "1=1");
    assert!(compiled.params.is_empty());
    assert_eq!(compiled.order_by, "");
}

#[test]
fn empty_group_contributes_nothing() {
    let compiled = compile(vec![ConditionGroup::new(), ConditionGroup::new().eq("a", 1)]);
    assert_eq!(compiled.condition, "(a = ?)");
}

#[test]
fn null_value_is_null_test() {
    let compiled = compile(ConditionGroup::new().eq("a", None::<i64>));
    assert_eq!(compiled.condition, "(a IS NULL)");
    assert!(compiled.params.is_empty());
}

#[test]
fn in_list_expands_placeholders() {
    let compiled = compile(
        ConditionGroup::new().ops("a", Operators::new().in_list(vec![1, 2, 3])),
    );
    assert_eq!(compiled.condition, "(a IN(?,?,?))");
    assert_eq!(compiled.params, ints(&[1, 2, 3]));
}

#[test]
fn empty_in_list_binds_zero() {
    let compiled = compile(
        ConditionGroup::new().ops("a", Operators::new().in_list(Vec::<i64>::new())),
    );
    assert_eq!(compiled.condition, "(a IN(?))");
    assert_eq!(compiled.params, ints(&[0]));
}

#[test]
fn nested_groups_become_parenthesized_or() {
    let compiled = compile(
        ConditionGroup::new().nested(
            "any",
            vec![ConditionGroup::new().eq("b", 1), ConditionGroup::new().eq("c", 2)].into(),
        ),
    );
    assert_eq!(compiled.condition, "(((b = ?) OR (c = ?)))");
    assert_eq!(compiled.params, ints(&[1, 2]));
}

#[test]
fn nested_params_follow_outer_order() {
    let compiled = compile(
        ConditionGroup::new()
            .eq("a", 1)
            .nested(
                "alt",
                vec![ConditionGroup::new().eq("b", 2), ConditionGroup::new().eq("c", 3)].into(),
            )
            .eq("d", 4),
    );
    assert_eq!(
        compiled.condition,
        "(a = ? AND ((b = ?) OR (c = ?)) AND d = ?)"
    );
    assert_eq!(compiled.params, ints(&[1, 2, 3, 4]));
    assert_parity(&compiled);
}

#[test]
fn empty_nested_group_still_merges_ordering() {
    let compiled = compile(
        ConditionGroup::new()
            .eq("a", 1)
            .nested("sub", ConditionGroup::new().asc("b").into()),
    );
    assert_eq!(compiled.condition, "(a = ?)");
    assert_eq!(compiled.order_by, "ORDER BY b ASC");
}

#[test]
fn json_path_sort_is_coalesced() {
    let compiled = compile(ConditionGroup::new().desc("a.b"));
    assert_eq!(compiled.condition, "1=1");
    assert_eq!(compiled.order_by, "ORDER BY COALESCE((a->'b')::float8, 0) DESC");

    let compiled = compile(ConditionGroup::new().asc("a.b"));
    assert_eq!(compiled.order_by, "ORDER BY COALESCE((a->'b')::float8, 0) ASC");
}

#[test]
fn order_entries_follow_field_order() {
    let compiled = compile(vec![
        ConditionGroup::new().asc("x").eq("a", 1),
        ConditionGroup::new().random("r").desc("y"),
    ]);
    assert_eq!(compiled.order_by, "ORDER BY x ASC, RANDOM() ASC, y DESC");
}

#[test]
fn json_path_equality_binds_text() {
    let compiled = compile(ConditionGroup::new().eq("meta.flag", true));
    assert_eq!(compiled.condition, "(meta->>'flag' = ?)");
    assert_eq!(compiled.params, vec![text("true")]);
}

#[test]
fn array_index_field() {
    let compiled = compile(ConditionGroup::new().eq("tags:1", "red"));
    assert_eq!(compiled.condition, "(tags[1] = ?)");
}

#[test]
fn raw_query_splits_order_by() {
    let compiled = Compiler::new()
        .compile(&Filter::raw("x = 1 order by y", vec![]))
        .unwrap();
    assert_eq!(compiled.condition, "x = 1 ");
    assert!(compiled.params.is_empty());
    assert_eq!(compiled.order_by, "order by y");
}

#[test]
fn raw_query_without_order_by() {
    let compiled = Compiler::new()
        .compile(&Filter::raw("x = ?", vec![SqlValue::Int(5)]))
        .unwrap();
    assert_eq!(compiled.condition, "x = ?");
    assert_eq!(compiled.params, ints(&[5]));
    assert_eq!(compiled.order_by, "");
}

#[test]
fn raw_order_by_is_case_insensitive() {
    let compiled = Compiler::new()
        .compile(&Filter::raw("x = ? ORDER BY y DESC", vec![SqlValue::Int(1)]))
        .unwrap();
    assert_eq!(compiled.condition, "x = ? ");
    assert_eq!(compiled.order_by, "ORDER BY y DESC");
}

#[test]
fn positional_inputs_dispatch_on_shape() {
    let raw = compile_inputs([Input::from("a = ?"), Input::from(SqlValue::Int(1))]).unwrap();
    assert_eq!(raw.condition, "a = ?");
    assert_eq!(raw.params, ints(&[1]));

    let groups = compile_inputs([
        Input::from(ConditionGroup::new().eq("a", 1)),
        Input::from(ConditionGroup::new().eq("b", 2)),
    ])
    .unwrap();
    assert_eq!(groups.condition, "(a = ?) OR (b = ?)");
}

#[test]
fn group_after_literal_sql_binds_as_json() {
    let typed = compile_inputs([
        Input::from("a = ? AND b = ?"),
        Input::from(SqlValue::Int(1)),
        Input::from(ConditionGroup::new().eq("x", 1)),
    ])
    .unwrap();
    assert_eq!(typed.condition, "a = ? AND b = ?");
    assert_eq!(typed.params, vec![SqlValue::Int(1), text(r#"{"x":1}"#)]);
    assert_parity(&typed);

    let from_json = Compiler::new()
        .compile_json(&[
            serde_json::json!("a = ? AND b = ?"),
            serde_json::json!(1),
            serde_json::json!({"x": 1}),
        ])
        .unwrap();
    assert_eq!(typed, from_json);
}

#[test]
fn compilation_is_deterministic() {
    let spec: FilterSpec = vec![
        ConditionGroup::new()
            .eq("status", "active")
            .ops("age", Operators::new().gte(18).lt(65))
            .desc("created"),
        ConditionGroup::new().is_null("owner"),
    ]
    .into();
    let first = compile(spec.clone());
    let second = compile(spec);
    assert_eq!(first, second);
}

#[test]
fn parity_holds_across_operators() {
    let compiled = compile(vec![
        ConditionGroup::new()
            .eq("a", 1)
            .ops(
                "b",
                Operators::new()
                    .in_list(vec![1, 2])
                    .not_in_list(Vec::<i64>::new())
                    .one_of(vec![Some("x"), None])
                    .none_of(vec!["y", "z"])
                    .contains("it's ?")
                    .gt(3),
            ),
        ConditionGroup::new().ops(
            "tags",
            Operators::new()
                .any("red")
                .contains_all(vec![1, 2])
                .contained_by(vec!["a"]),
        ),
    ]);
    assert_parity(&compiled);
}
