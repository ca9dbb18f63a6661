//! `SQLite` dialect.
//!
//! `SQLite`'s `ALTER TABLE` only adds, drops and renames; anything touching an
//! existing column definition or a constraint needs a table rebuild, which
//! is left to the caller.

use super::{decimal_type, sized_type, unsupported, ConstraintKind, Provider};
use crate::capability::{Capability, CapabilityTable};
use crate::error::{DdlError, Result};
use crate::literal::{common_literal, hex_upper, quote_text, unmapped};
use crate::schema::{
    Column, ColumnReference, CreatedColumn, KindTag, Sentinel, Value, ValueKind,
};

/// Invariant name of the `SQLite` dialect.
pub const INVARIANT_NAME: &str = "sqlite";

/// Identifier length used for generated names.
///
/// `SQLite` itself imposes no limit.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

const IDENTITY_WARNING: &str =
    "Identity columns become rowid aliases and must be the table's only primary key column.";

const ENTRIES: &[Capability] = &[
    Capability::of(KindTag::AnsiString).max_size(1_000_000_000).primary_key(),
    Capability::of(KindTag::AnsiString),
    Capability::of(KindTag::Binary),
    Capability::of(KindTag::Boolean).primary_key(),
    Capability::of(KindTag::Byte).primary_key(),
    Capability::of(KindTag::Date).primary_key(),
    Capability::of(KindTag::DateTime).primary_key(),
    Capability::of(KindTag::Decimal)
        .max_size(28)
        .max_scale(28)
        .primary_key(),
    Capability::of(KindTag::Decimal).max_size(28).primary_key(),
    Capability::of(KindTag::Double).primary_key(),
    Capability::of(KindTag::Guid).primary_key(),
    Capability::of(KindTag::Int16).primary_key(),
    Capability::of(KindTag::Int32).identity().warning(IDENTITY_WARNING),
    Capability::of(KindTag::Int64).identity().warning(IDENTITY_WARNING),
    Capability::of(KindTag::Single).primary_key(),
    Capability::of(KindTag::String).max_size(1_000_000_000).primary_key(),
    Capability::of(KindTag::String),
    Capability::of(KindTag::Time).primary_key(),
];

/// Capability declaration of the `SQLite` dialect.
pub const CAPABILITIES: CapabilityTable = CapabilityTable::new(INVARIANT_NAME, ENTRIES);

/// `SQLite` dialect for DDL synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new `SQLite` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Provider for SqliteDialect {
    fn invariant_name(&self) -> &'static str {
        INVARIANT_NAME
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    /// Declared types resolve to `SQLite`'s storage affinities. Sizes are kept
    /// in the declaration but not enforced.
    fn type_specifier(&self, kind: &ValueKind) -> Result<String> {
        let sql = match kind.tag {
            KindTag::Boolean
            | KindTag::Byte
            | KindTag::SByte
            | KindTag::Int16
            | KindTag::Int32
            | KindTag::Int64
            | KindTag::UInt16
            | KindTag::UInt32
            | KindTag::UInt64 => "INTEGER".to_string(),
            KindTag::Single | KindTag::Double => "REAL".to_string(),
            KindTag::Currency | KindTag::Decimal | KindTag::VarNumeric => {
                decimal_type("NUMERIC", kind)
            }
            KindTag::AnsiString | KindTag::String => kind
                .positive_size()
                .map_or_else(|| "TEXT".to_string(), |n| format!("VARCHAR({n})")),
            KindTag::AnsiStringFixedLength | KindTag::StringFixedLength => {
                sized_type("CHAR", kind)
            }
            KindTag::Date
            | KindTag::DateTime
            | KindTag::DateTime2
            | KindTag::DateTimeOffset
            | KindTag::Time
            | KindTag::Guid
            | KindTag::Xml => "TEXT".to_string(),
            KindTag::Binary => "BLOB".to_string(),
        };
        Ok(sql)
    }

    /// `INTEGER` makes the column an alias of the rowid, provided it is the
    /// sole primary key column.
    fn identity_type(&self, kind: &ValueKind) -> Result<String> {
        match kind.tag {
            KindTag::Int32 | KindTag::Int64 => Ok("INTEGER".to_string()),
            _ => unsupported("identity column", INVARIANT_NAME),
        }
    }

    /// An identity column only assigns values as the rowid alias, which it
    /// is only when it alone makes up the primary key.
    fn check_identity_columns(&self, table: &str, columns: &[CreatedColumn]) -> Result<()> {
        let key_columns = columns.iter().filter(|c| c.primary_key).count();
        match columns.iter().find(|c| c.identity) {
            Some(identity) if !identity.primary_key || key_columns != 1 => {
                Err(DdlError::Precondition(format!(
                    "identity column '{table}.{}' must be the table's only primary key column",
                    identity.name()
                )))
            }
            _ => Ok(()),
        }
    }

    fn literal(&self, value: &Value) -> Result<String> {
        let sql = match value {
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Date(d) => quote_text(&d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => quote_text(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::Time(t) => quote_text(&t.format("%H:%M:%S%.f").to_string()),
            Value::Binary(bytes) => format!("X'{}'", hex_upper(bytes)),
            Value::Null | Value::Int(_) | Value::Float(_) | Value::Text(_) => {
                return common_literal(value, INVARIANT_NAME)?
                    .ok_or_else(|| unmapped(value, INVARIANT_NAME));
            }
        };
        Ok(sql)
    }

    fn sentinel(&self, sentinel: Sentinel) -> Result<String> {
        match sentinel {
            Sentinel::CurrentDateTime => Ok("(datetime('now', 'localtime'))".to_string()),
            Sentinel::CurrentUtcDateTime => Ok("CURRENT_TIMESTAMP".to_string()),
            Sentinel::NewGuid => Err(DdlError::UnknownSentinel {
                sentinel,
                dialect: INVARIANT_NAME,
            }),
        }
    }

    fn drop_default_statement(&self, table: &str, column: &Column, guarded: bool) -> Result<String> {
        let _ = (table, column, guarded);
        unsupported("drop default", INVARIANT_NAME)
    }

    fn modify_column_statement(&self, table: &str, column: &Column) -> Result<String> {
        let _ = (table, column);
        unsupported("alter column", INVARIANT_NAME)
    }

    fn add_default_statement(&self, table: &str, column: &Column) -> Result<String> {
        let _ = (table, column);
        unsupported("add default", INVARIANT_NAME)
    }

    fn alter_column(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        let _ = (table, column);
        unsupported("alter column", INVARIANT_NAME)
    }

    fn add_constraint(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        constraint: ConstraintKind,
    ) -> Result<Vec<String>> {
        let _ = (table, name, columns);
        unsupported(constraint.operation(), INVARIANT_NAME)
    }

    fn add_foreign_key(
        &self,
        table: &str,
        referenced_table: &str,
        references: &[ColumnReference],
        name: &str,
    ) -> Result<Vec<String>> {
        let _ = (table, referenced_table, references, name);
        unsupported("add foreign key", INVARIANT_NAME)
    }

    fn drop_unique_constraint(&self, table: &str, name: &str) -> Result<Vec<String>> {
        let _ = (table, name);
        unsupported("drop unique constraint", INVARIANT_NAME)
    }

    fn drop_foreign_key(&self, table: &str, name: &str) -> Result<Vec<String>> {
        let _ = (table, name);
        unsupported("drop foreign key", INVARIANT_NAME)
    }

    fn drop_primary_key(&self, table: &str, name: &str) -> Result<Vec<String>> {
        let _ = (table, name);
        unsupported("drop primary key", INVARIANT_NAME)
    }

    fn rename_primary_key(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<Vec<String>> {
        let _ = (table, old_name, new_name);
        unsupported("rename primary key", INVARIANT_NAME)
    }

    fn exists_table(&self, database: &str, table: &str) -> String {
        let _ = database;
        format!(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = {}",
            quote_text(table)
        )
    }
}
