//! Informix dialect.
//!
//! Informix has no named default constraints: a column's default is part of
//! its definition and is replaced or removed by `MODIFY`-ing the column.
//! Constraint names follow the constraint body (`... CONSTRAINT name`).
//!
//! Dropping a default and changing a column's type are the same statement
//! here, so `alter_column` emits that `MODIFY` twice before re-adding the
//! default. The repeat is idempotent and keeps the statement list in the
//! same drop, modify, add shape as every other dialect.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use super::{
    decimal_type, require_columns, require_default, sized_type, split_references,
    unmapped_kind, unsupported, ConstraintKind, Provider,
};
use crate::capability::{Capability, CapabilityTable};
use crate::error::{DdlError, Result};
use crate::literal::{common_literal, quote_text, unmapped};
use crate::schema::{Column, ColumnReference, KindTag, Sentinel, Value, ValueKind};

/// Invariant name of the Informix dialect.
pub const INVARIANT_NAME: &str = "informix";

/// Longest identifier Informix accepts.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Sizes below this map to `NVARCHAR`.
const NVARCHAR_LIMIT: u32 = 255;

/// Sizes below this (and at least [`NVARCHAR_LIMIT`]) map to `LVARCHAR`.
const LVARCHAR_LIMIT: u32 = 10_000;

const ENTRIES: &[Capability] = &[
    Capability::of(KindTag::Binary),
    Capability::of(KindTag::Byte).primary_key(),
    Capability::of(KindTag::Boolean).primary_key(),
    Capability::of(KindTag::Date).primary_key(),
    Capability::of(KindTag::DateTime).primary_key(),
    Capability::of(KindTag::Decimal)
        .max_size(28)
        .max_scale(28)
        .primary_key(),
    Capability::of(KindTag::Decimal).max_size(28).primary_key(),
    Capability::of(KindTag::Double),
    Capability::of(KindTag::Guid).primary_key(),
    Capability::of(KindTag::Int16).primary_key(),
    Capability::of(KindTag::Int32).identity(),
    Capability::of(KindTag::Int64).identity(),
    Capability::of(KindTag::Single)
        .primary_key()
        .warning("Single maps to SMALLFLOAT; values may lose precision in arithmetic."),
    Capability::of(KindTag::String).max_size(65_535).primary_key(),
    Capability::of(KindTag::String),
    Capability::of(KindTag::Time),
    Capability::of(KindTag::UInt16),
    Capability::of(KindTag::UInt32),
    Capability::of(KindTag::UInt64),
    Capability::of(KindTag::StringFixedLength)
        .max_size(255)
        .primary_key(),
];

/// Capability declaration of the Informix dialect.
pub const CAPABILITIES: CapabilityTable = CapabilityTable::new(INVARIANT_NAME, ENTRIES);

/// Informix dialect for DDL synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixDialect;

impl InformixDialect {
    /// Creates a new Informix dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `NVARCHAR`, `LVARCHAR` or `TEXT` depending on the size.
    fn text_type(kind: &ValueKind) -> String {
        match kind.positive_size() {
            Some(n) if n < NVARCHAR_LIMIT => format!("NVARCHAR({n})"),
            Some(n) if n < LVARCHAR_LIMIT => format!("LVARCHAR({n})"),
            _ => "TEXT".to_string(),
        }
    }

    /// Seconds with five fractional digits, as `FRACTION(5)` expects.
    fn fraction(time: NaiveTime) -> String {
        format!(
            "{}.{:05}",
            time.format("%H:%M:%S"),
            time.nanosecond() % 1_000_000_000 / 10_000
        )
    }

    fn date_time(value: NaiveDateTime) -> String {
        format!(
            "DATETIME ({} {}) YEAR TO FRACTION(5)",
            value.date().format("%Y-%m-%d"),
            Self::fraction(value.time())
        )
    }

    /// `ALTER TABLE t MODIFY (definition)`.
    fn modify(self, table: &str, definition: &str) -> String {
        format!("{} MODIFY ({definition})", self.alter_table(table))
    }

    /// Column definition without its default.
    fn bare_definition(self, table: &str, column: &Column) -> Result<String> {
        self.column_definition(table, &column.clone().without_default(), false)
    }
}

impl Provider for InformixDialect {
    fn invariant_name(&self) -> &'static str {
        INVARIANT_NAME
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    fn type_specifier(&self, kind: &ValueKind) -> Result<String> {
        let sql = match kind.tag {
            KindTag::Binary => "BLOB".to_string(),
            KindTag::Boolean => "BOOLEAN".to_string(),
            KindTag::Byte | KindTag::SByte | KindTag::Int16 => "SMALLINT".to_string(),
            KindTag::Date => "DATE".to_string(),
            KindTag::DateTime => "DATETIME YEAR TO FRACTION(5)".to_string(),
            KindTag::Decimal => decimal_type("DECIMAL", kind),
            KindTag::Double => "FLOAT".to_string(),
            KindTag::Guid => "CHAR(36)".to_string(),
            KindTag::Int32 | KindTag::UInt16 => "INTEGER".to_string(),
            KindTag::Int64 | KindTag::UInt32 => "BIGINT".to_string(),
            KindTag::Single => "SMALLFLOAT".to_string(),
            KindTag::String => Self::text_type(kind),
            KindTag::StringFixedLength => sized_type("NCHAR", kind),
            KindTag::Time => "DATETIME HOUR TO FRACTION(5)".to_string(),
            KindTag::UInt64 => "DECIMAL(20, 0)".to_string(),
            KindTag::VarNumeric => decimal_type("NUMERIC", kind),
            KindTag::AnsiString
            | KindTag::AnsiStringFixedLength
            | KindTag::Currency
            | KindTag::DateTime2
            | KindTag::DateTimeOffset
            | KindTag::Xml => return Err(unmapped_kind(kind, INVARIANT_NAME)),
        };
        Ok(sql)
    }

    fn identity_type(&self, kind: &ValueKind) -> Result<String> {
        match kind.tag {
            KindTag::Int32 => Ok("SERIAL".to_string()),
            KindTag::Int64 => Ok("BIGSERIAL".to_string()),
            _ => unsupported("identity column", INVARIANT_NAME),
        }
    }

    fn literal(&self, value: &Value) -> Result<String> {
        let sql = match value {
            Value::Bool(b) => String::from(if *b { "'t'" } else { "'f'" }),
            Value::Date(d) => format!("DATETIME ({}) YEAR TO DAY", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => Self::date_time(*dt),
            Value::Time(t) => format!("DATETIME ({}) HOUR TO FRACTION(5)", Self::fraction(*t)),
            Value::Null | Value::Int(_) | Value::Float(_) | Value::Text(_) | Value::Binary(_) => {
                return common_literal(value, INVARIANT_NAME)?
                    .ok_or_else(|| unmapped(value, INVARIANT_NAME));
            }
        };
        Ok(sql)
    }

    fn sentinel(&self, sentinel: Sentinel) -> Result<String> {
        match sentinel {
            Sentinel::CurrentDateTime => Ok("CURRENT YEAR TO FRACTION(5)".to_string()),
            Sentinel::CurrentUtcDateTime | Sentinel::NewGuid => Err(DdlError::UnknownSentinel {
                sentinel,
                dialect: INVARIANT_NAME,
            }),
        }
    }

    fn primary_key_clause(&self, name: &str, columns: &[String]) -> String {
        let clause = format!("PRIMARY KEY ({})", self.quote_list(columns));
        if name.is_empty() {
            clause
        } else {
            format!("{clause} CONSTRAINT {}", self.quote_identifier(name))
        }
    }

    fn add_column(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} ADD ({})",
            self.alter_table(table),
            self.column_definition(table, column, false)?
        )])
    }

    fn drop_column(&self, table: &str, column: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} DROP {}",
            self.alter_table(table),
            self.quote_identifier(column)
        )])
    }

    /// Re-declares the column without a default. Modifying a column that has
    /// no default is harmless, so the guard needs no extra check.
    fn drop_default_statement(&self, table: &str, column: &Column, guarded: bool) -> Result<String> {
        let _ = guarded;
        Ok(self.modify(table, &self.bare_definition(table, column)?))
    }

    fn modify_column_statement(&self, table: &str, column: &Column) -> Result<String> {
        Ok(self.modify(table, &self.bare_definition(table, column)?))
    }

    fn add_default_statement(&self, table: &str, column: &Column) -> Result<String> {
        require_default(self, table, column)?;
        Ok(self.modify(table, &self.column_definition(table, column, false)?))
    }

    fn add_constraint(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        constraint: ConstraintKind,
    ) -> Result<Vec<String>> {
        require_columns(constraint.operation(), table, columns)?;
        Ok(vec![format!(
            "{} ADD CONSTRAINT {} ({}) CONSTRAINT {}",
            self.alter_table(table),
            constraint.keyword(),
            self.quote_list(columns),
            self.quote_identifier(name)
        )])
    }

    fn add_foreign_key(
        &self,
        table: &str,
        referenced_table: &str,
        references: &[ColumnReference],
        name: &str,
    ) -> Result<Vec<String>> {
        let (columns, targets) = split_references(references);
        require_columns("add foreign key", table, &columns)?;
        Ok(vec![format!(
            "{} ADD CONSTRAINT FOREIGN KEY ({}) REFERENCES {} ({}) CONSTRAINT {}",
            self.alter_table(table),
            self.quote_list(&columns),
            self.quote_identifier(referenced_table),
            self.quote_list(&targets),
            self.quote_identifier(name)
        )])
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "RENAME TABLE {} TO {}",
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )])
    }

    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "RENAME COLUMN {}.{} TO {}",
            self.quote_identifier(table),
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )])
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
            "SELECT COUNT(*) FROM systables WHERE tabname = {}",
            quote_text(table)
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::schema::CreatedColumn;

    const fn dialect() -> InformixDialect {
        InformixDialect::new()
    }

    #[test]
    fn test_informix_text_tiers() {
        let d = dialect();
        let text = |size| d.type_specifier(&ValueKind::sized(KindTag::String, size)).unwrap();
        assert_eq!(text(1), "NVARCHAR(1)");
        assert_eq!(text(254), "NVARCHAR(254)");
        assert_eq!(text(255), "LVARCHAR(255)");
        assert_eq!(text(9999), "LVARCHAR(9999)");
        assert_eq!(text(10_000), "TEXT");
        assert_eq!(d.type_specifier(&KindTag::String.into()).unwrap(), "TEXT");
    }

    #[test]
    fn test_informix_data_types() {
        let d = dialect();
        assert_eq!(d.type_specifier(&KindTag::Int32.into()).unwrap(), "INTEGER");
        assert_eq!(d.type_specifier(&KindTag::Guid.into()).unwrap(), "CHAR(36)");
        assert_eq!(
            d.type_specifier(&KindTag::DateTime.into()).unwrap(),
            "DATETIME YEAR TO FRACTION(5)"
        );
        assert_eq!(
            d.type_specifier(&ValueKind::decimal(10, 2)).unwrap(),
            "DECIMAL(10, 2)"
        );
        assert_eq!(
            d.type_specifier(&ValueKind::sized(KindTag::StringFixedLength, 3))
                .unwrap(),
            "NCHAR(3)"
        );
        assert!(matches!(
            d.type_specifier(&KindTag::Xml.into()),
            Err(DdlError::UnmappedKind { .. })
        ));
    }

    #[test]
    fn test_literals() {
        let d = dialect();
        assert_eq!(d.literal(&Value::Bool(false)).unwrap(), "'f'");
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 120_000)
            .unwrap();
        assert_eq!(
            d.literal(&Value::DateTime(dt)).unwrap(),
            "DATETIME (2024-01-02 03:04:05.12000) YEAR TO FRACTION(5)"
        );
        assert_eq!(
            d.literal(&Value::Date(dt.date())).unwrap(),
            "DATETIME (2024-01-02) YEAR TO DAY"
        );
        assert_eq!(
            d.literal(&Value::Binary(vec![1])).unwrap_err(),
            DdlError::UnmappedLiteral {
                literal: "binary",
                dialect: INVARIANT_NAME
            }
        );
    }

    #[test]
    fn test_sentinels() {
        let d = dialect();
        assert_eq!(
            d.sentinel(Sentinel::CurrentDateTime).unwrap(),
            "CURRENT YEAR TO FRACTION(5)"
        );
        assert_eq!(
            d.sentinel(Sentinel::NewGuid).unwrap_err(),
            DdlError::UnknownSentinel {
                sentinel: Sentinel::NewGuid,
                dialect: INVARIANT_NAME
            }
        );
    }

    #[test]
    fn test_create_table() {
        let columns = vec![
            CreatedColumn::new(Column::new("id", KindTag::Int32))
                .primary_key()
                .identity(),
            CreatedColumn::new(Column::new("code", ValueKind::sized(KindTag::String, 20)))
                .unique_in("code"),
            CreatedColumn::new(
                Column::new("active", KindTag::Boolean).default_value(Value::Bool(true)),
            ),
        ];
        assert_eq!(
            dialect().create_table("items", &columns, "PK_items").unwrap(),
            vec![
                "CREATE TABLE \"items\" (\n    \
                 \"id\" SERIAL NOT NULL,\n    \
                 \"code\" NVARCHAR(20),\n    \
                 \"active\" BOOLEAN DEFAULT 't',\n    \
                 PRIMARY KEY (\"id\") CONSTRAINT \"PK_items\",\n    \
                 UNIQUE (\"code\")\n)"
            ]
        );
    }

    #[test]
    fn test_add_and_drop_column() {
        let d = dialect();
        let col = Column::new("qty", KindTag::Int32)
            .not_null()
            .default_value(Value::Int(1));
        assert_eq!(
            d.add_column("items", &col).unwrap(),
            vec!["ALTER TABLE \"items\" ADD (\"qty\" INTEGER DEFAULT 1 NOT NULL)"]
        );
        assert_eq!(
            d.drop_column("items", "qty").unwrap(),
            vec!["ALTER TABLE \"items\" DROP \"qty\""]
        );
    }

    #[test]
    fn test_alter_column_phases() {
        let col = Column::new("qty", KindTag::Int64)
            .not_null()
            .default_value(Value::Int(0));
        assert_eq!(
            dialect().alter_column("items", &col).unwrap(),
            vec![
                "ALTER TABLE \"items\" MODIFY (\"qty\" BIGINT NOT NULL)",
                "ALTER TABLE \"items\" MODIFY (\"qty\" BIGINT NOT NULL)",
                "ALTER TABLE \"items\" MODIFY (\"qty\" BIGINT DEFAULT 0 NOT NULL)",
            ]
        );
    }

    #[test]
    fn test_drop_default() {
        let col = Column::new("qty", KindTag::Int64);
        assert_eq!(
            dialect().drop_default("items", &col).unwrap(),
            vec!["ALTER TABLE \"items\" MODIFY (\"qty\" BIGINT)"]
        );
    }

    #[test]
    fn test_constraint_name_follows_body() {
        let d = dialect();
        assert_eq!(
            d.add_primary_key("items", &["id".to_string()], "PK_items")
                .unwrap(),
            vec!["ALTER TABLE \"items\" ADD CONSTRAINT PRIMARY KEY (\"id\") CONSTRAINT \"PK_items\""]
        );
        assert_eq!(
            d.add_foreign_key(
                "lines",
                "items",
                &[ColumnReference::new("item_id", "id")],
                "FK_lines_item_id"
            )
            .unwrap(),
            vec![
                "ALTER TABLE \"lines\" ADD CONSTRAINT FOREIGN KEY (\"item_id\") \
                 REFERENCES \"items\" (\"id\") CONSTRAINT \"FK_lines_item_id\""
            ]
        );
    }

    #[test]
    fn test_renames() {
        let d = dialect();
        assert_eq!(
            d.rename_table("a", "b").unwrap(),
            vec!["RENAME TABLE \"a\" TO \"b\""]
        );
        assert_eq!(
            d.rename_column("t", "a", "b").unwrap(),
            vec!["RENAME COLUMN \"t\".\"a\" TO \"b\""]
        );
        assert_eq!(
            d.rename_primary_key("t", "PK_a", "PK_b").unwrap_err(),
            DdlError::Unsupported {
                operation: "rename primary key",
                dialect: INVARIANT_NAME
            }
        );
    }

    #[test]
    fn test_exists_table() {
        assert_eq!(
            dialect().exists_table("stores", "items"),
            "SELECT COUNT(*) FROM systables WHERE tabname = 'items'"
        );
    }
}
