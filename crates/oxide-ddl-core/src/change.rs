//! Serializable schema changes and their dispatch onto a [`Provider`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::{CapabilityTable, Usage};
use crate::dialect::Provider;
use crate::error::{DdlError, Result};
use crate::naming::ObjectKind;
use crate::schema::{Column, ColumnReference, CreatedColumn};

/// A single schema change.
///
/// Constraint and index names are optional; when absent, a name is derived
/// with the provider's object namer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaChange {
    /// Create a table.
    CreateTable {
        /// Table name.
        table: String,
        /// Column definitions, in order.
        columns: Vec<CreatedColumn>,
        /// Primary key constraint name.
        #[serde(default)]
        primary_key_name: Option<String>,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        table: String,
    },

    /// Rename a table.
    RenameTable {
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },

    /// Add a column.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: Column,
    },

    /// Drop a column.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },

    /// Replace a column's type, nullability and default.
    AlterColumn {
        /// Table name.
        table: String,
        /// New column definition.
        column: Column,
    },

    /// Drop a column's default. The column must no longer model one.
    DropDefault {
        /// Table name.
        table: String,
        /// Column definition after the change.
        column: Column,
    },

    /// Add a primary key.
    AddPrimaryKey {
        /// Table name.
        table: String,
        /// Key columns.
        columns: Vec<String>,
        /// Constraint name.
        #[serde(default)]
        name: Option<String>,
    },

    /// Rename a primary key constraint.
    RenamePrimaryKey {
        /// Table name.
        table: String,
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },

    /// Drop a primary key.
    DropPrimaryKey {
        /// Table name.
        table: String,
        /// Constraint name.
        name: String,
    },

    /// Add a unique constraint.
    AddUniqueConstraint {
        /// Table name.
        table: String,
        /// Constrained columns.
        columns: Vec<String>,
        /// Constraint name.
        #[serde(default)]
        name: Option<String>,
    },

    /// Drop a unique constraint.
    DropUniqueConstraint {
        /// Table name.
        table: String,
        /// Constraint name.
        name: String,
    },

    /// Add a foreign key.
    AddForeignKey {
        /// Referencing table.
        table: String,
        /// Referenced table.
        referenced_table: String,
        /// Column pairs, in order.
        references: Vec<ColumnReference>,
        /// Constraint name.
        #[serde(default)]
        name: Option<String>,
    },

    /// Drop a foreign key.
    DropForeignKey {
        /// Table name.
        table: String,
        /// Constraint name.
        name: String,
    },

    /// Create an index.
    AddIndex {
        /// Table name.
        table: String,
        /// Indexed columns.
        columns: Vec<String>,
        /// Index name.
        #[serde(default)]
        name: Option<String>,
    },

    /// Drop an index.
    DropIndex {
        /// Table name.
        table: String,
        /// Index name.
        name: String,
    },
}

impl SchemaChange {
    /// Creates a `CreateTable` change with a derived primary key name.
    #[must_use]
    pub fn create_table(table: impl Into<String>, columns: Vec<CreatedColumn>) -> Self {
        Self::CreateTable {
            table: table.into(),
            columns,
            primary_key_name: None,
        }
    }

    /// Creates an `AddColumn` change.
    #[must_use]
    pub fn add_column(table: impl Into<String>, column: Column) -> Self {
        Self::AddColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates an `AlterColumn` change.
    #[must_use]
    pub fn alter_column(table: impl Into<String>, column: Column) -> Self {
        Self::AlterColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates an `AddIndex` change with a derived name.
    #[must_use]
    pub fn add_index(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self::AddIndex {
            table: table.into(),
            columns,
            name: None,
        }
    }

    /// Creates an `AddForeignKey` change with a derived name.
    #[must_use]
    pub fn add_foreign_key(
        table: impl Into<String>,
        referenced_table: impl Into<String>,
        references: Vec<ColumnReference>,
    ) -> Self {
        Self::AddForeignKey {
            table: table.into(),
            referenced_table: referenced_table.into(),
            references,
            name: None,
        }
    }

    /// Short name of the operation, for logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create table",
            Self::DropTable { .. } => "drop table",
            Self::RenameTable { .. } => "rename table",
            Self::AddColumn { .. } => "add column",
            Self::DropColumn { .. } => "drop column",
            Self::RenameColumn { .. } => "rename column",
            Self::AlterColumn { .. } => "alter column",
            Self::DropDefault { .. } => "drop default",
            Self::AddPrimaryKey { .. } => "add primary key",
            Self::RenamePrimaryKey { .. } => "rename primary key",
            Self::DropPrimaryKey { .. } => "drop primary key",
            Self::AddUniqueConstraint { .. } => "add unique constraint",
            Self::DropUniqueConstraint { .. } => "drop unique constraint",
            Self::AddForeignKey { .. } => "add foreign key",
            Self::DropForeignKey { .. } => "drop foreign key",
            Self::AddIndex { .. } => "add index",
            Self::DropIndex { .. } => "drop index",
        }
    }

    /// The table the change applies to (the old name for renames).
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::RenameTable { old_name, .. } => old_name,
            Self::CreateTable { table, .. }
            | Self::DropTable { table }
            | Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::RenameColumn { table, .. }
            | Self::AlterColumn { table, .. }
            | Self::DropDefault { table, .. }
            | Self::AddPrimaryKey { table, .. }
            | Self::RenamePrimaryKey { table, .. }
            | Self::DropPrimaryKey { table, .. }
            | Self::AddUniqueConstraint { table, .. }
            | Self::DropUniqueConstraint { table, .. }
            | Self::AddForeignKey { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::AddIndex { table, .. }
            | Self::DropIndex { table, .. } => table,
        }
    }

    /// Checks every column kind the change introduces against `capabilities`.
    ///
    /// Returns the advisory warnings of the matching capability entries.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::KindNotSupported`] for the first column whose kind,
    /// size, scale or role the dialect does not declare.
    pub fn validate(&self, capabilities: &CapabilityTable) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        let mut check = |column: &Column, usage: Usage| -> Result<()> {
            if let Some(warning) = capabilities.validate(&column.name, &column.kind, usage)? {
                warnings.push(format!("column '{}': {warning}", column.name));
            }
            Ok(())
        };
        match self {
            Self::CreateTable { columns, .. } => {
                for created in columns {
                    let usage = Usage {
                        primary_key: created.primary_key,
                        identity: created.identity,
                    };
                    check(&created.column, usage)?;
                }
            }
            Self::AddColumn { column, .. }
            | Self::AlterColumn { column, .. }
            | Self::DropDefault { column, .. } => check(column, Usage::default())?,
            _ => {}
        }
        Ok(warnings)
    }

    /// Renders the change as ordered statements for `provider`.
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure for this change.
    pub fn render(&self, provider: &dyn Provider) -> Result<Vec<String>> {
        let name_or = |name: &Option<String>, table: &str, kind: ObjectKind, columns: &[String]| {
            name.clone()
                .unwrap_or_else(|| provider.object_name(table, kind, columns))
        };

        let statements = match self {
            Self::CreateTable {
                table,
                columns,
                primary_key_name,
            } => {
                let name = name_or(primary_key_name, table, ObjectKind::PrimaryKey, &[]);
                provider.create_table(table, columns, &name)?
            }
            Self::DropTable { table } => provider.drop_table(table)?,
            Self::RenameTable { old_name, new_name } => provider.rename_table(old_name, new_name)?,
            Self::AddColumn { table, column } => provider.add_column(table, column)?,
            Self::DropColumn { table, column } => provider.drop_column(table, column)?,
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => provider.rename_column(table, old_name, new_name)?,
            Self::AlterColumn { table, column } => provider.alter_column(table, column)?,
            Self::DropDefault { table, column } => provider.drop_default(table, column)?,
            Self::AddPrimaryKey {
                table,
                columns,
                name,
            } => {
                let name = name_or(name, table, ObjectKind::PrimaryKey, &[]);
                provider.add_primary_key(table, columns, &name)?
            }
            Self::RenamePrimaryKey {
                table,
                old_name,
                new_name,
            } => provider.rename_primary_key(table, old_name, new_name)?,
            Self::DropPrimaryKey { table, name } => provider.drop_primary_key(table, name)?,
            Self::AddUniqueConstraint {
                table,
                columns,
                name,
            } => {
                let name = name_or(name, table, ObjectKind::Unique, columns);
                provider.add_unique_constraint(table, columns, &name)?
            }
            Self::DropUniqueConstraint { table, name } => {
                provider.drop_unique_constraint(table, name)?
            }
            Self::AddForeignKey {
                table,
                referenced_table,
                references,
                name,
            } => {
                let columns: Vec<String> = references.iter().map(|r| r.column.clone()).collect();
                let name = name_or(name, table, ObjectKind::ForeignKey, &columns);
                provider.add_foreign_key(table, referenced_table, references, &name)?
            }
            Self::DropForeignKey { table, name } => provider.drop_foreign_key(table, name)?,
            Self::AddIndex {
                table,
                columns,
                name,
            } => {
                let name = name_or(name, table, ObjectKind::Index, columns);
                provider.add_index(table, columns, &name)?
            }
            Self::DropIndex { table, name } => provider.drop_index(table, name)?,
        };

        debug!(
            dialect = provider.invariant_name(),
            operation = self.operation(),
            table = self.table(),
            statements = statements.len(),
            "rendered schema change"
        );
        Ok(statements)
    }
}

/// Outcome of rendering a batch of changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    /// Statements of every change rendered before any failure, in order.
    pub statements: Vec<String>,
    /// Index and error of the first change that failed, if any.
    pub failure: Option<(usize, DdlError)>,
}

impl Rendered {
    /// Returns whether every change rendered.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Renders `changes` in order, stopping at the first failure.
#[must_use]
pub fn render_changes(provider: &dyn Provider, changes: &[SchemaChange]) -> Rendered {
    let mut rendered = Rendered::default();
    for (index, change) in changes.iter().enumerate() {
        match change.render(provider) {
            Ok(statements) => rendered.statements.extend(statements),
            Err(err) => {
                debug!(index, operation = change.operation(), error = %err, "schema change failed");
                rendered.failure = Some((index, err));
                break;
            }
        }
    }
    rendered
}
