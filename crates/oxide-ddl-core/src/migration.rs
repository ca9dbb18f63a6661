//! Migration descriptor: version stamp and module label.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

/// Longest module label a migration may carry, in characters.
pub const MAX_MODULE_LENGTH: usize = 250;

/// Identifies one migration.
///
/// The version is derived from the timestamp; the module label groups
/// migrations that are applied together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMigrationExport")]
pub struct MigrationExport {
    timestamp: NaiveDateTime,
    module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

#[derive(Deserialize)]
struct RawMigrationExport {
    timestamp: NaiveDateTime,
    #[serde(default)]
    module: String,
    #[serde(default)]
    tag: Option<String>,
}

impl TryFrom<RawMigrationExport> for MigrationExport {
    type Error = DdlError;

    fn try_from(raw: RawMigrationExport) -> Result<Self> {
        Self::new(raw.timestamp, raw.module, raw.tag)
    }
}

impl MigrationExport {
    /// Creates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::LabelTooLong`] if `module` exceeds
    /// [`MAX_MODULE_LENGTH`] characters.
    pub fn new(
        timestamp: NaiveDateTime,
        module: impl Into<String>,
        tag: Option<String>,
    ) -> Result<Self> {
        let module = module.into();
        let length = module.chars().count();
        if length > MAX_MODULE_LENGTH {
            return Err(DdlError::LabelTooLong {
                length,
                max: MAX_MODULE_LENGTH,
            });
        }
        Ok(Self {
            timestamp,
            module,
            tag,
        })
    }

    /// When the migration was authored.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Module label; empty for the default module.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Free-form tag.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Version number as `yyyymmddhhmmss`.
    #[must_use]
    pub fn version(&self) -> i64 {
        let t = self.timestamp;
        let date = i64::from(t.year()) * 10_000 + i64::from(t.month()) * 100 + i64::from(t.day());
        let time =
            i64::from(t.hour()) * 10_000 + i64::from(t.minute()) * 100 + i64::from(t.second());
        date * 1_000_000 + time
    }
}
