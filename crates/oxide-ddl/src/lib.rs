//! Plan loading and rendering for the `oxide-ddl` command-line tool.
//!
//! A plan is a JSON file holding a [`MigrationExport`] and an ordered list of
//! [`SchemaChange`]s. The tool validates the plan against a dialect's
//! capability table and prints the statements the dialect needs.
//!
//! [`MigrationExport`]: oxide_ddl_core::migration::MigrationExport
//! [`SchemaChange`]: oxide_ddl_core::change::SchemaChange

pub mod commands;
pub mod error;
pub mod plan;

pub use error::{PlanError, Result};
pub use plan::{load_plan, Plan, Script};
