//! Text output of the `oxide-ddl` subcommands.

use std::fmt::Write as _;

use oxide_ddl_core::capability::Capability;
use oxide_ddl_core::registry::{DialectRegistry, RegisteredDialect};

/// One line per dialect: invariant name and identifier limit.
#[must_use]
pub fn list_dialects(registry: &DialectRegistry) -> String {
    let mut out = String::new();
    for dialect in registry.iter() {
        let _ = writeln!(
            out,
            "{:<12} max identifier length {}",
            dialect.provider.invariant_name(),
            dialect.provider.max_identifier_length()
        );
    }
    out
}

fn limit(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn describe(capability: &Capability) -> String {
    let mut roles = Vec::new();
    if capability.primary_key {
        roles.push("primary key");
    }
    if capability.identity {
        roles.push("identity");
    }
    let tag = format!("{:?}", capability.tag);
    let mut line = format!(
        "{tag:<22} size {:>10}  scale {:>3}  {}",
        limit(capability.max_size),
        limit(capability.max_scale),
        roles.join(", ")
    );
    if let Some(warning) = capability.warning {
        let _ = write!(line, "  ({warning})");
    }
    line.trim_end().to_string()
}

/// The dialect's capability table, one entry per line.
#[must_use]
pub fn capabilities(dialect: &RegisteredDialect) -> String {
    let mut out = format!("{}\n", dialect.provider.invariant_name());
    for capability in dialect.capabilities.entries() {
        let _ = writeln!(out, "  {}", describe(capability));
    }
    out
}
