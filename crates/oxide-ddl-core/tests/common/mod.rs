#![allow(dead_code)]

use oxide_ddl_core::prelude::*;

/// Every built-in dialect, in invariant-name order.
pub fn dialects() -> Vec<&'static RegisteredDialect> {
    DialectRegistry::global().iter().collect()
}

/// Built-in dialects that can alter existing columns.
pub fn altering_dialects() -> Vec<&'static RegisteredDialect> {
    dialects()
        .into_iter()
        .filter(|d| d.provider.invariant_name() != "sqlite")
        .collect()
}

pub fn provider(name: &str) -> &'static dyn Provider {
    DialectRegistry::global()
        .get(name)
        .unwrap_or_else(|e| panic!("missing dialect {name}: {e}"))
        .provider
        .as_ref()
}

/// A kind that the capability entry accepts.
pub fn kind_within(capability: &Capability) -> ValueKind {
    let size = capability.max_size.map(|max| max.min(10));
    let scale = capability.max_scale.map(|max| max.min(2));
    ValueKind {
        tag: capability.tag,
        size,
        scale,
    }
}

pub fn names(columns: &[&str]) -> Vec<String> {
    columns.iter().map(ToString::to_string).collect()
}

/// Number of non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
