#![allow(dead_code)]

use oxide_predicate::{
    CompileError, CompileOptions, Compiled, Compiler, Dialect, FilterSpec, SqlValue,
};

pub fn compile(spec: impl Into<FilterSpec>) -> Compiled {
    let spec = spec.into();
    Compiler::new()
        .compile_spec(&spec)
        .unwrap_or_else(|e| panic!("Failed to compile: {spec:?}\nError: {e:?}"))
}

pub fn compile_strict(spec: impl Into<FilterSpec>) -> Compiled {
    let spec = spec.into();
    Compiler::new()
        .options(CompileOptions::new().strict())
        .compile_spec(&spec)
        .unwrap_or_else(|e| panic!("Failed to compile: {spec:?}\nError: {e:?}"))
}

pub fn compile_with<D: Dialect>(compiler: &Compiler<D>, spec: impl Into<FilterSpec>) -> Compiled {
    let spec = spec.into();
    compiler
        .compile_spec(&spec)
        .unwrap_or_else(|e| panic!("Failed to compile: {spec:?}\nError: {e:?}"))
}

pub fn strict_err(spec: impl Into<FilterSpec>) -> CompileError {
    let spec = spec.into();
    Compiler::new()
        .options(CompileOptions::new().strict())
        .compile_spec(&spec)
        .expect_err(&format!("Expected compile error for: {spec:?}"))
}

/// Asserts that placeholders and parameters line up.
pub fn assert_parity(compiled: &Compiled) {
    assert_eq!(
        compiled.placeholder_count(),
        compiled.params.len(),
        "Placeholder/parameter mismatch in: {}\n  params: {:?}",
        compiled.condition,
        compiled.params
    );
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().copied().map(SqlValue::Int).collect()
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(value.to_string())
}
