//! Deterministic names for generated constraints and indexes.
//!
//! A name is composed as `{kind}_{table}_{column...}`. When that exceeds the
//! dialect's identifier limit, the longest prefix that fits is kept and a
//! 16 hex digit SHA-256 digest of the structured input is appended, so two
//! overflowing inputs only share a name if their digests collide.

use sha2::{Digest, Sha256};
use tracing::trace;

/// Number of hex digits of the digest appended to shortened names.
pub const DIGEST_LENGTH: usize = 16;

/// Kind of schema object a generated name is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Default value constraint.
    DefaultConstraint,
    /// Primary key constraint.
    PrimaryKey,
    /// Foreign key constraint.
    ForeignKey,
    /// Unique constraint.
    Unique,
    /// Index.
    Index,
}

impl ObjectKind {
    /// Short tag used as the name prefix.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::DefaultConstraint => "DF",
            Self::PrimaryKey => "PK",
            Self::ForeignKey => "FK",
            Self::Unique => "UQ",
            Self::Index => "IX",
        }
    }
}

/// Builds a name for an object of `kind` on `table` covering `columns`.
///
/// The result is at most `max_length` bytes long.
#[must_use]
pub fn object_name<S: AsRef<str>>(
    table: &str,
    kind: ObjectKind,
    columns: &[S],
    max_length: usize,
) -> String {
    let mut composed = format!("{}_{}", kind.tag(), table);
    for column in columns {
        composed.push('_');
        composed.push_str(column.as_ref());
    }
    if composed.len() <= max_length {
        return composed;
    }

    let digest = structural_digest(table, kind, columns);
    let shortened = if max_length <= DIGEST_LENGTH + 1 {
        digest[..max_length.min(DIGEST_LENGTH)].to_string()
    } else {
        let prefix = floor_char_boundary(&composed, max_length - DIGEST_LENGTH - 1);
        format!("{prefix}_{digest}")
    };
    trace!(
        composed_length = composed.len(),
        max_length,
        name = %shortened,
        "shortened object name"
    );
    shortened
}

/// Digest over the parts rather than the joined string, so that
/// `("a_b", ["c"])` and `("a", ["b_c"])` hash differently.
fn structural_digest<S: AsRef<str>>(table: &str, kind: ObjectKind, columns: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.tag().as_bytes());
    hasher.update([0u8]);
    hasher.update(table.as_bytes());
    for column in columns {
        hasher.update([0u8]);
        hasher.update(column.as_ref().as_bytes());
    }
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(DIGEST_LENGTH);
    digest
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
fn floor_char_boundary(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_composed() {
        assert_eq!(
            object_name("Customers", ObjectKind::DefaultConstraint, &["Status"], 128),
            "DF_Customers_Status"
        );
        assert_eq!(
            object_name("orders", ObjectKind::ForeignKey, &["customer_id", "region"], 63),
            "FK_orders_customer_id_region"
        );
        let none: [&str; 0] = [];
        assert_eq!(object_name("orders", ObjectKind::PrimaryKey, &none, 63), "PK_orders");
    }

    #[test]
    fn test_long_name_is_shortened_to_limit() {
        let table = "a_table_with_a_name_that_is_really_rather_long_for_an_identifier";
        let name = object_name(table, ObjectKind::Index, &["first_column", "second_column"], 63);
        assert_eq!(name.len(), 63);
        assert!(name.starts_with("IX_a_table_with"));
        assert_eq!(name.as_bytes()[63 - DIGEST_LENGTH - 1], b'_');
    }

    #[test]
    fn test_exact_limit_is_not_shortened() {
        let name = object_name("abc", ObjectKind::Unique, &["d"], 8);
        assert_eq!(name, "UQ_abc_d");
    }

    #[test]
    fn test_tiny_limit_returns_digest_prefix() {
        let name = object_name("customers", ObjectKind::Unique, &["email"], 10);
        assert_eq!(name.len(), 10);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_shortening_respects_char_boundaries() {
        let table = "ÄÖÜ".repeat(20);
        let name = object_name(&table, ObjectKind::DefaultConstraint, &["ß"], 40);
        assert!(name.len() <= 40);
        assert!(name.is_char_boundary(name.len()));
    }

    #[test]
    fn test_structurally_different_inputs_differ() {
        let a = object_name(&"x".repeat(80), ObjectKind::Index, &["a_b", "c"], 30);
        let b = object_name(&"x".repeat(80), ObjectKind::Index, &["a", "b_c"], 30);
        assert_ne!(a, b);
    }
}
