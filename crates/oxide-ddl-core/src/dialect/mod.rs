//! Dialect-specific DDL synthesis.
//!
//! Every dialect implements [`Provider`], one method per kind of schema
//! change. Each method returns the complete, ordered list of statements the
//! change needs. The caller must run them in that order.
//!
//! Providers hold no state. The same inputs always produce the same
//! statements, and a provider can be shared freely between threads.

pub mod informix;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use informix::InformixDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::error::{DdlError, Result};
use crate::naming::{object_name, ObjectKind};
use crate::schema::{
    Column, ColumnReference, CreatedColumn, DefaultValue, Sentinel, Value, ValueKind,
};

/// Table-level constraints added through [`Provider::add_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// PRIMARY KEY.
    PrimaryKey,
    /// UNIQUE.
    Unique,
}

impl ConstraintKind {
    /// SQL keyword of the constraint.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
        }
    }

    /// Name of the operation that adds this constraint.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::PrimaryKey => "add primary key",
            Self::Unique => "add unique constraint",
        }
    }
}

/// Builds the error for an operation the dialect cannot express.
///
/// # Errors
///
/// Always returns [`DdlError::Unsupported`].
pub const fn unsupported<T>(operation: &'static str, dialect: &'static str) -> Result<T> {
    Err(DdlError::Unsupported { operation, dialect })
}

/// Fails with a precondition error when `columns` is empty.
fn require_columns(operation: &str, table: &str, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(DdlError::Precondition(format!(
            "{operation} on '{table}' needs at least one column"
        )));
    }
    Ok(())
}

/// Trait for dialect-specific DDL synthesis.
pub trait Provider: Send + Sync {
    /// Stable identifier of the dialect.
    fn invariant_name(&self) -> &'static str;

    /// Longest identifier the dialect accepts, in bytes.
    fn max_identifier_length(&self) -> usize;

    // ---------------------------------------------------------------------
    // Type mapper and value converter
    // ---------------------------------------------------------------------

    /// Maps a value kind to the dialect's type clause.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnmappedKind`] for kinds the dialect has no
    /// mapping for.
    fn type_specifier(&self, kind: &ValueKind) -> Result<String>;

    /// Type clause of an identity column of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Unsupported`] unless the dialect overrides it.
    fn identity_type(&self, kind: &ValueKind) -> Result<String> {
        let _ = kind;
        unsupported("identity column", self.invariant_name())
    }

    /// Renders a literal value.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnmappedLiteral`] for values the dialect cannot
    /// express as a literal.
    fn literal(&self, value: &Value) -> Result<String>;

    /// Renders a named default as the dialect's expression.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnknownSentinel`] for sentinels the dialect has no
    /// expression for.
    fn sentinel(&self, sentinel: Sentinel) -> Result<String>;

    /// Renders a default value; `None` when no default is modeled.
    ///
    /// Sentinels are resolved before, and never through, literal conversion.
    ///
    /// # Errors
    ///
    /// Propagates [`Provider::sentinel`] and [`Provider::literal`] failures.
    fn default_expression(&self, default: &DefaultValue) -> Result<Option<String>> {
        match default {
            DefaultValue::None => Ok(None),
            DefaultValue::Sentinel(sentinel) => self.sentinel(*sentinel).map(Some),
            DefaultValue::Literal(value) => self.literal(value).map(Some),
        }
    }

    // ---------------------------------------------------------------------
    // Names and fragments
    // ---------------------------------------------------------------------

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quotes and comma-separates a list of identifiers.
    fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote_identifier(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Derives a bounded name for a generated object.
    fn object_name(&self, table: &str, kind: ObjectKind, columns: &[String]) -> String {
        object_name(table, kind, columns, self.max_identifier_length())
    }

    /// Name of the default constraint of `table.column`.
    fn default_constraint_name(&self, table: &str, column: &str) -> String {
        object_name(
            table,
            ObjectKind::DefaultConstraint,
            &[column],
            self.max_identifier_length(),
        )
    }

    /// `ALTER TABLE <table>`.
    fn alter_table(&self, table: &str) -> String {
        format!("ALTER TABLE {}", self.quote_identifier(table))
    }

    /// Inline default clause of a column definition, with leading space, or
    /// an empty string when the column has no default.
    ///
    /// # Errors
    ///
    /// Propagates [`Provider::default_expression`] failures.
    fn default_clause(&self, table: &str, column: &Column) -> Result<String> {
        let _ = table;
        Ok(self
            .default_expression(&column.default)?
            .map(|expr| format!(" DEFAULT {expr}"))
            .unwrap_or_default())
    }

    /// Full column definition: name, type, default and nullability.
    ///
    /// # Errors
    ///
    /// Propagates type mapping and default rendering failures.
    fn column_definition(&self, table: &str, column: &Column, identity: bool) -> Result<String> {
        let type_clause = if identity {
            self.identity_type(&column.kind)?
        } else {
            self.type_specifier(&column.kind)?
        };
        let mut sql = format!("{} {}", self.quote_identifier(&column.name), type_clause);
        sql.push_str(&self.default_clause(table, column)?);
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        Ok(sql)
    }

    /// Table-level primary key clause used by CREATE TABLE.
    fn primary_key_clause(&self, name: &str, columns: &[String]) -> String {
        if name.is_empty() {
            format!("PRIMARY KEY ({})", self.quote_list(columns))
        } else {
            format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                self.quote_identifier(name),
                self.quote_list(columns)
            )
        }
    }

    /// Table-level unique clause used by CREATE TABLE.
    fn unique_clause(&self, columns: &[String]) -> String {
        format!("UNIQUE ({})", self.quote_list(columns))
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Checks that the table's identity columns can be expressed.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn check_identity_columns(&self, table: &str, columns: &[CreatedColumn]) -> Result<()> {
        let _ = (table, columns);
        Ok(())
    }

    /// Generates CREATE TABLE.
    ///
    /// Column definitions keep input order. Primary key columns are always
    /// NOT NULL. A PRIMARY KEY clause is added when at least one column is
    /// marked primary, and one UNIQUE clause per distinct non-empty unique
    /// group, in first-seen order.
    ///
    /// # Errors
    ///
    /// Propagates identity checks and column definition failures.
    fn create_table(
        &self,
        table: &str,
        columns: &[CreatedColumn],
        primary_key_name: &str,
    ) -> Result<Vec<String>> {
        self.check_identity_columns(table, columns)?;

        let mut lines = Vec::with_capacity(columns.len() + 1);
        let mut primary_key = Vec::new();
        let mut unique_groups: Vec<(&str, Vec<String>)> = Vec::new();

        for created in columns {
            let definition = if created.primary_key && created.column.nullable {
                let column = created.column.clone().not_null();
                self.column_definition(table, &column, created.identity)?
            } else {
                self.column_definition(table, &created.column, created.identity)?
            };
            lines.push(format!("    {definition}"));
            if created.primary_key {
                primary_key.push(created.column.name.clone());
            }
            let group = created.unique_group.as_str();
            if group.is_empty() {
                continue;
            }
            let index = unique_groups
                .iter()
                .position(|(g, _)| *g == group)
                .unwrap_or_else(|| {
                    unique_groups.push((group, Vec::new()));
                    unique_groups.len() - 1
                });
            unique_groups[index].1.push(created.column.name.clone());
        }

        if !primary_key.is_empty() {
            lines.push(format!(
                "    {}",
                self.primary_key_clause(primary_key_name, &primary_key)
            ));
        }
        for (_, members) in &unique_groups {
            lines.push(format!("    {}", self.unique_clause(members)));
        }

        Ok(vec![format!(
            "CREATE TABLE {} (\n{}\n)",
            self.quote_identifier(table),
            lines.join(",\n")
        )])
    }

    /// Generates DROP TABLE.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn drop_table(&self, table: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP TABLE {}", self.quote_identifier(table))])
    }

    /// Generates ADD COLUMN, with the default in the same clause.
    ///
    /// # Errors
    ///
    /// Propagates column definition failures.
    fn add_column(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} ADD COLUMN {}",
            self.alter_table(table),
            self.column_definition(table, column, false)?
        )])
    }

    /// Generates DROP COLUMN.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn drop_column(&self, table: &str, column: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} DROP COLUMN {}",
            self.alter_table(table),
            self.quote_identifier(column)
        )])
    }

    /// Statement dropping the column's default.
    ///
    /// When `guarded`, the statement must succeed even if no default exists.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Unsupported`] when the dialect cannot drop defaults.
    fn drop_default_statement(
        &self,
        table: &str,
        column: &Column,
        guarded: bool,
    ) -> Result<String>;

    /// Statement changing the column's type and nullability.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Unsupported`] when the dialect cannot alter columns.
    fn modify_column_statement(&self, table: &str, column: &Column) -> Result<String>;

    /// Statement adding the column's (present) default.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Unsupported`] when the dialect cannot add defaults.
    fn add_default_statement(&self, table: &str, column: &Column) -> Result<String>;

    /// Generates the statements altering a column, in this order:
    ///
    /// 1. drop any previous default, guarded against its absence;
    /// 2. modify type and nullability;
    /// 3. only when the new column has a default, add it.
    ///
    /// # Errors
    ///
    /// Propagates failures of the three steps.
    fn alter_column(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        let mut statements = vec![
            self.drop_default_statement(table, column, true)?,
            self.modify_column_statement(table, column)?,
        ];
        if column.default.is_some() {
            statements.push(self.add_default_statement(table, column)?);
        }
        Ok(statements)
    }

    /// Generates the statement dropping a column's default.
    ///
    /// The caller must already have cleared the default on `column`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Precondition`] when `column` still models a default.
    fn drop_default(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        if column.default.is_some() {
            return Err(DdlError::Precondition(format!(
                "cannot drop the default of '{table}.{}' while the column still models one",
                column.name
            )));
        }
        Ok(vec![self.drop_default_statement(table, column, false)?])
    }

    /// Shared implementation of PRIMARY KEY and UNIQUE constraint addition.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Precondition`] when `columns` is empty.
    fn add_constraint(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        constraint: ConstraintKind,
    ) -> Result<Vec<String>> {
        require_columns(constraint.operation(), table, columns)?;
        Ok(vec![format!(
            "{} ADD CONSTRAINT {} {} ({})",
            self.alter_table(table),
            self.quote_identifier(name),
            constraint.keyword(),
            self.quote_list(columns)
        )])
    }

    /// Generates a primary key constraint.
    ///
    /// # Errors
    ///
    /// See [`Provider::add_constraint`].
    fn add_primary_key(&self, table: &str, columns: &[String], name: &str) -> Result<Vec<String>> {
        self.add_constraint(table, name, columns, ConstraintKind::PrimaryKey)
    }

    /// Generates a unique constraint.
    ///
    /// # Errors
    ///
    /// See [`Provider::add_constraint`].
    fn add_unique_constraint(
        &self,
        table: &str,
        columns: &[String],
        name: &str,
    ) -> Result<Vec<String>> {
        self.add_constraint(table, name, columns, ConstraintKind::Unique)
    }

    /// Generates a foreign key constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Precondition`] when `references` is empty.
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
            "{} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.alter_table(table),
            self.quote_identifier(name),
            self.quote_list(&columns),
            self.quote_identifier(referenced_table),
            self.quote_list(&targets)
        )])
    }

    /// Generates CREATE INDEX.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Precondition`] when `columns` is empty.
    fn add_index(&self, table: &str, columns: &[String], name: &str) -> Result<Vec<String>> {
        require_columns("add index", table, columns)?;
        Ok(vec![format!(
            "CREATE INDEX {} ON {} ({})",
            self.quote_identifier(name),
            self.quote_identifier(table),
            self.quote_list(columns)
        )])
    }

    /// Generates DROP INDEX.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn drop_index(&self, table: &str, name: &str) -> Result<Vec<String>> {
        let _ = table;
        Ok(vec![format!("DROP INDEX {}", self.quote_identifier(name))])
    }

    /// Generates the statement dropping a named constraint.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn drop_constraint(&self, table: &str, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} DROP CONSTRAINT {}",
            self.alter_table(table),
            self.quote_identifier(name)
        )])
    }

    /// Drops a unique constraint.
    ///
    /// # Errors
    ///
    /// See [`Provider::drop_constraint`].
    fn drop_unique_constraint(&self, table: &str, name: &str) -> Result<Vec<String>> {
        self.drop_constraint(table, name)
    }

    /// Drops a foreign key constraint.
    ///
    /// # Errors
    ///
    /// See [`Provider::drop_constraint`].
    fn drop_foreign_key(&self, table: &str, name: &str) -> Result<Vec<String>> {
        self.drop_constraint(table, name)
    }

    /// Drops a primary key constraint.
    ///
    /// # Errors
    ///
    /// See [`Provider::drop_constraint`].
    fn drop_primary_key(&self, table: &str, name: &str) -> Result<Vec<String>> {
        self.drop_constraint(table, name)
    }

    /// Renames a table.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} RENAME TO {}",
            self.alter_table(old_name),
            self.quote_identifier(new_name)
        )])
    }

    /// Renames a column.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} RENAME COLUMN {} TO {}",
            self.alter_table(table),
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )])
    }

    /// Renames a primary key constraint.
    ///
    /// # Errors
    ///
    /// Only fails for dialects that override it.
    fn rename_primary_key(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} RENAME CONSTRAINT {} TO {}",
            self.alter_table(table),
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )])
    }

    /// Query returning the number of tables named `table` in `database`.
    ///
    /// This is not DDL; executing it and reading the count is up to the caller.
    fn exists_table(&self, database: &str, table: &str) -> String;
}

/// `KEYWORD(n)` when the kind carries a positive size, otherwise `KEYWORD`.
fn sized_type(keyword: &str, kind: &ValueKind) -> String {
    kind.positive_size()
        .map_or_else(|| keyword.to_string(), |n| format!("{keyword}({n})"))
}

/// `KEYWORD(p, s)`, `KEYWORD(p)` or `KEYWORD` depending on what is given.
fn decimal_type(keyword: &str, kind: &ValueKind) -> String {
    match (kind.positive_size(), kind.scale) {
        (Some(p), Some(s)) => format!("{keyword}({p}, {s})"),
        (Some(p), None) => format!("{keyword}({p})"),
        _ => keyword.to_string(),
    }
}

/// Error for a kind the dialect's type mapper has no case for.
const fn unmapped_kind(kind: &ValueKind, dialect: &'static str) -> DdlError {
    DdlError::UnmappedKind {
        kind: kind.tag,
        dialect,
    }
}

/// Fails with a precondition error when `column` has no default to add.
fn require_default(
    provider: &(impl Provider + ?Sized),
    table: &str,
    column: &Column,
) -> Result<String> {
    provider
        .default_expression(&column.default)?
        .ok_or_else(|| {
            DdlError::Precondition(format!(
                "cannot add a default to '{table}.{}': the column models none",
                column.name
            ))
        })
}

/// Splits reference pairs into parallel source and target lists.
fn split_references(references: &[ColumnReference]) -> (Vec<String>, Vec<String>) {
    references
        .iter()
        .map(|r| (r.column.clone(), r.referenced_column.clone()))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_kind_keywords() {
        assert_eq!(ConstraintKind::PrimaryKey.keyword(), "PRIMARY KEY");
        assert_eq!(ConstraintKind::Unique.keyword(), "UNIQUE");
        assert_eq!(ConstraintKind::Unique.operation(), "add unique constraint");
    }

    #[test]
    fn test_split_references_keeps_order() {
        let refs = vec![
            ColumnReference::new("customer_id", "id"),
            ColumnReference::new("region", "region_code"),
        ];
        let (source, target) = split_references(&refs);
        assert_eq!(source, vec!["customer_id", "region"]);
        assert_eq!(target, vec!["id", "region_code"]);
    }

    #[test]
    fn test_type_helpers() {
        use crate::schema::KindTag;

        assert_eq!(
            sized_type("NCHAR", &ValueKind::sized(KindTag::StringFixedLength, 10)),
            "NCHAR(10)"
        );
        assert_eq!(
            sized_type("NCHAR", &ValueKind::new(KindTag::StringFixedLength)),
            "NCHAR"
        );
        assert_eq!(decimal_type("DECIMAL", &ValueKind::decimal(12, 2)), "DECIMAL(12, 2)");
        assert_eq!(
            decimal_type("DECIMAL", &ValueKind::sized(KindTag::Decimal, 12)),
            "DECIMAL(12)"
        );
        assert_eq!(
            decimal_type("DECIMAL", &ValueKind::new(KindTag::Decimal)),
            "DECIMAL"
        );
    }

    #[test]
    fn test_require_columns() {
        assert!(require_columns("add index", "t", &["a".to_string()]).is_ok());
        assert!(matches!(
            require_columns("add index", "t", &[]),
            Err(DdlError::Precondition(_))
        ));
    }

    #[test]
    fn test_unsupported_names_operation_and_dialect() {
        let err = unsupported::<()>("rename column", "somedb").unwrap_err();
        assert_eq!(
            err.to_string(),
            "rename column is not supported by the somedb dialect"
        );
    }
}
