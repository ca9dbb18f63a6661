//! Dialect-aware DDL synthesis.
//!
//! `oxide-ddl-core` turns database-agnostic schema changes into the ordered
//! SQL statements a specific database needs:
//! - Value kinds are mapped to each dialect's native types
//! - Generated constraint and index names stay within identifier limits
//! - Defaults are rendered as literals or dialect expressions
//! - Multi-step changes (such as altering a column with a named default)
//!   come out as a complete, ordered statement list
//!
//! Nothing here connects to a database. Statements are returned as strings
//! for a migration runner to execute.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl_core::prelude::*;
//!
//! let registry = DialectRegistry::global();
//! let sqlserver = registry.get("sqlserver").unwrap();
//!
//! let column = Column::new("Quantity", KindTag::Int32)
//!     .not_null()
//!     .default_value(Value::Int(0));
//! let statements = sqlserver.provider.alter_column("OrderLines", &column).unwrap();
//!
//! assert_eq!(statements.len(), 3);
//! assert_eq!(
//!     statements[2],
//!     "ALTER TABLE [OrderLines] ADD CONSTRAINT [DF_OrderLines_Quantity] DEFAULT 0 FOR [Quantity]"
//! );
//! ```
//!
//! # Dialects
//!
//! | invariant name | provider |
//! |---|---|
//! | `informix` | [`InformixDialect`](dialect::InformixDialect) |
//! | `postgresql` | [`PostgresDialect`](dialect::PostgresDialect) |
//! | `sqlite` | [`SqliteDialect`](dialect::SqliteDialect) |
//! | `sqlserver` | [`SqlServerDialect`](dialect::SqlServerDialect) |

pub mod capability;
pub mod change;
pub mod dialect;
pub mod error;
pub mod literal;
pub mod migration;
pub mod naming;
pub mod registry;
pub mod schema;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::capability::{Capability, CapabilityTable, Usage};
    pub use crate::change::{render_changes, Rendered, SchemaChange};
    pub use crate::dialect::{
        ConstraintKind, InformixDialect, PostgresDialect, Provider, SqlServerDialect,
        SqliteDialect,
    };
    pub use crate::error::{DdlError, Result};
    pub use crate::migration::{MigrationExport, MAX_MODULE_LENGTH};
    pub use crate::naming::{object_name, ObjectKind};
    pub use crate::registry::{DialectRegistry, RegisteredDialect};
    pub use crate::schema::{
        Column, ColumnReference, CreatedColumn, DefaultValue, KindTag, Sentinel, Value,
        ValueKind,
    };
}
