//! Static registry of the built-in dialects, keyed by invariant name.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::capability::CapabilityTable;
use crate::dialect::{
    informix, postgres, sqlite, sqlserver, InformixDialect, PostgresDialect, Provider,
    SqlServerDialect, SqliteDialect,
};
use crate::error::{DdlError, Result};

/// A provider together with its capability declaration.
pub struct RegisteredDialect {
    /// The DDL provider.
    pub provider: Box<dyn Provider>,
    /// Kinds the dialect supports, for validation before synthesis.
    pub capabilities: CapabilityTable,
}

impl std::fmt::Debug for RegisteredDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredDialect")
            .field("provider", &self.provider.invariant_name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Lookup table from invariant name to dialect.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: BTreeMap<&'static str, RegisteredDialect>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in dialect.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(InformixDialect::new(), informix::CAPABILITIES);
        registry.register(PostgresDialect::new(), postgres::CAPABILITIES);
        registry.register(SqliteDialect::new(), sqlite::CAPABILITIES);
        registry.register(SqlServerDialect::new(), sqlserver::CAPABILITIES);
        registry
    }

    /// The process-wide registry of built-in dialects, built on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<DialectRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Adds a dialect under its invariant name, replacing any previous entry.
    pub fn register(&mut self, provider: impl Provider + 'static, capabilities: CapabilityTable) {
        let name = provider.invariant_name();
        self.dialects.insert(
            name,
            RegisteredDialect {
                provider: Box::new(provider),
                capabilities,
            },
        );
    }

    /// Looks up a dialect by invariant name.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnknownDialect`] if no dialect has that name.
    pub fn get(&self, name: &str) -> Result<&RegisteredDialect> {
        self.dialects
            .get(name)
            .ok_or_else(|| DdlError::UnknownDialect(name.to_string()))
    }

    /// Invariant names of all registered dialects, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dialects.keys().copied()
    }

    /// All registered dialects, sorted by invariant name.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDialect> {
        self.dialects.values()
    }
}
