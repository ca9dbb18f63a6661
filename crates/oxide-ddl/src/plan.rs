//! Migration plans: a migration descriptor plus an ordered list of changes.
//!
//! Plans are stored as JSON:
//!
//! ```json
//! {
//!   "migration": { "timestamp": "2024-03-09T14:05:00", "module": "billing" },
//!   "changes": [
//!     { "DropTable": { "table": "legacy_invoices" } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use oxide_ddl_core::capability::CapabilityTable;
use oxide_ddl_core::change::{render_changes, SchemaChange};
use oxide_ddl_core::dialect::Provider;
use oxide_ddl_core::migration::MigrationExport;

use crate::error::{PlanError, Result};

/// A migration and the schema changes it makes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Version stamp and module of the migration.
    pub migration: MigrationExport,
    /// Changes, in application order.
    #[serde(default)]
    pub changes: Vec<SchemaChange>,
}

/// Statements rendered for a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Version of the migration the statements belong to.
    pub version: i64,
    /// Statements, in execution order.
    pub statements: Vec<String>,
    /// Capability warnings raised during validation.
    pub warnings: Vec<String>,
}

impl Script {
    /// Renders the statements as a `;`-terminated script.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statements
            .iter()
            .map(|statement| format!("{statement};\n"))
            .collect()
    }
}

/// Reads and parses a plan file.
///
/// # Errors
///
/// Returns [`PlanError::Io`] if the file cannot be read and
/// [`PlanError::Parse`] if it is not a valid plan.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let plan: Plan = serde_json::from_str(&text).map_err(|source| PlanError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        version = plan.migration.version(),
        changes = plan.changes.len(),
        "loaded plan"
    );
    Ok(plan)
}

impl Plan {
    /// Checks every change against the dialect's capability table.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Change`] for the first change introducing a kind
    /// the dialect does not support.
    pub fn validate(&self, capabilities: &CapabilityTable) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        for (index, change) in self.changes.iter().enumerate() {
            let found = change
                .validate(capabilities)
                .map_err(|source| PlanError::Change {
                    index,
                    operation: change.operation(),
                    source,
                })?;
            for warning in &found {
                warn!(index, operation = change.operation(), "{warning}");
            }
            warnings.extend(found);
        }
        Ok(warnings)
    }

    /// Validates and renders the plan.
    ///
    /// On failure the error is returned together with the statements of the
    /// changes preceding the failing one.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Change`] for the first change that fails to
    /// validate or render.
    pub fn render(
        &self,
        provider: &dyn Provider,
        capabilities: &CapabilityTable,
    ) -> std::result::Result<Script, (Script, PlanError)> {
        let version = self.migration.version();
        let warnings = match self.validate(capabilities) {
            Ok(warnings) => warnings,
            Err(err) => {
                let script = Script {
                    version,
                    statements: Vec::new(),
                    warnings: Vec::new(),
                };
                return Err((script, err));
            }
        };

        let rendered = render_changes(provider, &self.changes);
        let script = Script {
            version,
            statements: rendered.statements,
            warnings,
        };
        let Some((index, source)) = rendered.failure else {
            return Ok(script);
        };
        let operation = self
            .changes
            .get(index)
            .map_or("unknown", SchemaChange::operation);
        Err((
            script,
            PlanError::Change {
                index,
                operation,
                source,
            },
        ))
    }
}
