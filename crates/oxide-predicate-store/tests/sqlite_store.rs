//! Tests running compiled filters against an in-memory SQLite database.

use oxide_predicate::{
    CompileError, CompileOptions, Compiled, Compiler, ConditionGroup, Filter, FilterSpec,
    LikeBinding, Operators, SqlValue,
};
use oxide_predicate_store::{SqliteStore, Store, StoreError};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Row;

async fn create_test_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::query(
        "CREATE TABLE items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            score REAL,
            owner TEXT,
            meta TEXT NOT NULL DEFAULT '{}'
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create table");

    for (id, name, score, owner, meta) in [
        (1, "Apple", Some(3.5), Some("ann"), r#"{"color":"red","rank":2}"#),
        (2, "banana", Some(7.0), None, r#"{"color":"yellow","rank":10}"#),
        (3, "Cherry", Some(9.25), Some("bob"), r#"{"color":"red","rank":1.5}"#),
        (4, "50% off", None, Some("ann"), "{}"),
    ] {
        sqlx::query("INSERT INTO items (id, name, score, owner, meta) VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(score)
            .bind(owner)
            .bind(meta)
            .execute(&pool)
            .await
            .expect("Failed to insert row");
    }

    SqliteStore::from_pool(pool)
}

fn compile(store: &SqliteStore, spec: impl Into<FilterSpec>) -> Compiled {
    store
        .compiler(CompileOptions::new().strict())
        .compile_spec(&spec.into())
        .expect("Failed to compile filter")
}

async fn ids(store: &SqliteStore, compiled: &Compiled) -> Vec<i64> {
    store
        .fetch_all("items", compiled)
        .await
        .expect("Failed to fetch rows")
        .iter()
        .map(|row| row.get::<i64, _>("id"))
        .collect()
}

#[tokio::test]
async fn test_or_across_groups() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        vec![
            ConditionGroup::new().eq("owner", "bob"),
            ConditionGroup::new().is_null("owner"),
        ],
    );
    assert_eq!(compiled.condition, "(\"owner\" = ?) OR (\"owner\" IS NULL)");
    assert_eq!(store.count("items", &compiled).await.unwrap(), 2);
}

#[tokio::test]
async fn test_order_by_is_applied() {
    let store = create_test_store().await;
    // A group holding only a sort adds ordering without a clause.
    let compiled = compile(
        &store,
        vec![
            ConditionGroup::new().ops("score", Operators::new().gt(1)),
            ConditionGroup::new().desc("score"),
        ],
    );
    assert_eq!(compiled.condition, "(\"score\" > ?)");
    assert_eq!(ids(&store, &compiled).await, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_empty_filter_matches_everything() {
    let store = create_test_store().await;
    let compiled = compile(&store, FilterSpec::new());
    assert_eq!(store.count("items", &compiled).await.unwrap(), 4);
}

#[tokio::test]
async fn test_in_and_empty_in() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        vec![
            ConditionGroup::new().ops("id", Operators::new().in_list(vec![1, 3, 9])),
            ConditionGroup::new().asc("id"),
        ],
    );
    assert_eq!(ids(&store, &compiled).await, vec![1, 3]);

    let compiled = compile(
        &store,
        ConditionGroup::new().ops("id", Operators::new().in_list(Vec::<i64>::new())),
    );
    assert_eq!(store.count("items", &compiled).await.unwrap(), 0);
}

#[tokio::test]
async fn test_contains_is_case_insensitive() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        ConditionGroup::new().ops("name", Operators::new().contains("AN")),
    );
    assert_eq!(ids(&store, &compiled).await, vec![2]);
}

#[tokio::test]
async fn test_bound_like_escapes_wildcards() {
    let store = create_test_store().await;
    let compiled = store
        .compiler(CompileOptions::new().like_binding(LikeBinding::Bound))
        .compile_spec(
            &ConditionGroup::new()
                .ops("name", Operators::new().starts_with("50%"))
                .into(),
        )
        .unwrap();
    assert_eq!(ids(&store, &compiled).await, vec![4]);

    let compiled = store
        .compiler(CompileOptions::new().like_binding(LikeBinding::Bound))
        .compile_spec(
            &ConditionGroup::new()
                .ops("name", Operators::new().ends_with("_"))
                .into(),
        )
        .unwrap();
    assert_eq!(store.count("items", &compiled).await.unwrap(), 0);
}

#[tokio::test]
async fn test_one_of_with_null() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        ConditionGroup::new()
            .ops("owner", Operators::new().one_of(vec![Some("bob"), None]))
            .asc("id"),
    );
    assert_eq!(ids(&store, &compiled).await, vec![2, 3]);
}

#[tokio::test]
async fn test_none_of_keeps_nulls() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        ConditionGroup::new()
            .ops("owner", Operators::new().none_of(vec!["ann"]))
            .asc("id"),
    );
    assert_eq!(ids(&store, &compiled).await, vec![2, 3]);
}

#[tokio::test]
async fn test_json_path_equality() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        ConditionGroup::new().eq("meta.color", "red").asc("id"),
    );
    assert_eq!(compiled.condition, "(\"meta\"->>'color' = ?)");
    assert_eq!(ids(&store, &compiled).await, vec![1, 3]);
}

#[tokio::test]
async fn test_json_path_sort_is_numeric() {
    let store = create_test_store().await;
    let compiled = compile(&store, ConditionGroup::new().desc("meta.rank"));
    assert_eq!(
        compiled.order_by,
        "ORDER BY COALESCE(CAST(\"meta\"->>'rank' AS REAL), 0) DESC"
    );
    assert_eq!(ids(&store, &compiled).await, vec![2, 1, 3, 4]);
}

#[tokio::test]
async fn test_array_index_refused_by_compiler() {
    let store = create_test_store().await;
    let err = store
        .compiler(CompileOptions::new())
        .compile_spec(&ConditionGroup::new().eq("meta:1", "x").into())
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnsupportedOperator {
            dialect: "sqlite",
            ..
        }
    ));
}

#[tokio::test]
async fn test_raw_filter() {
    let store = create_test_store().await;
    let compiled = store
        .compiler(CompileOptions::new())
        .compile(&Filter::raw(
            "owner = ? order by id desc",
            vec![SqlValue::Text("ann".into())],
        ))
        .unwrap();
    assert_eq!(ids(&store, &compiled).await, vec![4, 1]);
}

#[tokio::test]
async fn test_delete() {
    let store = create_test_store().await;
    let compiled = compile(
        &store,
        ConditionGroup::new().ops("score", Operators::new().lt(5)),
    );
    assert_eq!(store.delete("items", &compiled).await.unwrap(), 1);
    assert_eq!(
        store
            .count("items", &Compiled::default())
            .await
            .unwrap(),
        3
    );
}

#[derive(Debug, sqlx::FromRow)]
struct Item {
    id: i64,
    name: String,
}

#[tokio::test]
async fn test_fetch_as() {
    let store = create_test_store().await;
    let compiled = compile(&store, ConditionGroup::new().eq("id", 3));
    let items: Vec<Item> = store.fetch_as("items", &compiled).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 3);
    assert_eq!(items[0].name, "Cherry");
}

#[tokio::test]
async fn test_array_operator_refused_by_compiler() {
    let store = create_test_store().await;
    let err = store
        .compiler(CompileOptions::new())
        .compile_spec(
            &ConditionGroup::new()
                .ops("tags", Operators::new().any("x"))
                .into(),
        )
        .unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
}

#[tokio::test]
async fn test_array_parameter_refused() {
    let store = create_test_store().await;
    let compiled = Compiler::new()
        .compile_spec(&ConditionGroup::new().eq("name", SqlValue::array(vec![1, 2])).into())
        .unwrap();
    let err = store.fetch_all("items", &compiled).await.err().expect("expected error");
    assert!(matches!(
        err,
        StoreError::UnsupportedParameter {
            index: 0,
            kind: "array",
            dialect: "sqlite"
        }
    ));
}

#[tokio::test]
async fn test_parity_mismatch_refused() {
    let store = create_test_store().await;
    let compiled = Compiled {
        condition: "id = ? AND name = ?".into(),
        params: vec![SqlValue::Int(1)],
        order_by: String::new(),
    };
    let err = store.count("items", &compiled).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Compile(CompileError::PlaceholderParameterMismatch { .. })
    ));
}
