//! Per-dialect capability declarations.
//!
//! A capability table lists which value kinds a dialect supports, up to which
//! size and scale, and whether a kind may be used in a primary key or as an
//! identity column. Tables are plain static data. Providers never consult
//! them; they exist for validation performed before synthesis.

use serde::Serialize;

use crate::error::{DdlError, Result};
use crate::schema::{KindTag, ValueKind};

/// One supported shape of a value kind.
///
/// A kind may appear several times, e.g. once sized and once unsized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capability {
    /// The supported kind.
    pub tag: KindTag,
    /// Maximum size; `None` means the kind is declared without a size.
    pub max_size: Option<u32>,
    /// Maximum scale; `None` means the kind is declared without a scale.
    pub max_scale: Option<u32>,
    /// Whether the kind may be part of a primary key.
    pub primary_key: bool,
    /// Whether the kind may be an identity column.
    pub identity: bool,
    /// Advisory message shown when the kind is used.
    pub warning: Option<&'static str>,
}

impl Capability {
    /// Declares an unsized kind with no special roles.
    #[must_use]
    pub const fn of(tag: KindTag) -> Self {
        Self {
            tag,
            max_size: None,
            max_scale: None,
            primary_key: false,
            identity: false,
            warning: None,
        }
    }

    /// Sets the maximum size.
    #[must_use]
    pub const fn max_size(mut self, max: u32) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Sets the maximum scale.
    #[must_use]
    pub const fn max_scale(mut self, max: u32) -> Self {
        self.max_scale = Some(max);
        self
    }

    /// Allows the kind in primary keys.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows the kind as an identity column. Implies primary key eligibility.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.primary_key = true;
        self.identity = true;
        self
    }

    /// Attaches an advisory message.
    #[must_use]
    pub const fn warning(mut self, message: &'static str) -> Self {
        self.warning = Some(message);
        self
    }

    /// Checks size and scale of `kind` against this entry.
    fn fits(&self, kind: &ValueKind) -> std::result::Result<(), String> {
        match (self.max_size, kind.positive_size()) {
            (None, Some(size)) => return Err(format!("a size ({size}) is not accepted")),
            (Some(_), None) => return Err("a size is required".to_string()),
            (Some(max), Some(size)) if size > max => {
                return Err(format!("size {size} exceeds the maximum of {max}"));
            }
            _ => {}
        }
        match (self.max_scale, kind.scale.filter(|s| *s > 0)) {
            (None, Some(scale)) => Err(format!("a scale ({scale}) is not accepted")),
            (Some(max), Some(scale)) if scale > max => {
                Err(format!("scale {scale} exceeds the maximum of {max}"))
            }
            _ => Ok(()),
        }
    }

    /// Checks `kind` and the requested roles against this entry.
    fn fit(&self, kind: &ValueKind, usage: Usage) -> std::result::Result<(), String> {
        self.fits(kind)?;
        if usage.primary_key && !self.primary_key {
            return Err("it cannot be used in a primary key".to_string());
        }
        if usage.identity && !self.identity {
            return Err("it cannot be used as an identity column".to_string());
        }
        Ok(())
    }
}

/// How a column is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    /// The column is part of the primary key.
    pub primary_key: bool,
    /// The column is an identity column.
    pub identity: bool,
}

/// A dialect's full capability declaration.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTable {
    dialect: &'static str,
    entries: &'static [Capability],
}

impl CapabilityTable {
    /// Wraps a static table for the named dialect.
    #[must_use]
    pub const fn new(dialect: &'static str, entries: &'static [Capability]) -> Self {
        Self { dialect, entries }
    }

    /// All declared entries.
    #[must_use]
    pub const fn entries(&self) -> &'static [Capability] {
        self.entries
    }

    /// Returns whether any entry declares `tag`.
    #[must_use]
    pub fn supports(&self, tag: KindTag) -> bool {
        self.entries.iter().any(|c| c.tag == tag)
    }

    /// Finds the first entry accepting `kind` in the given role.
    ///
    /// Returns the entry's warning, if any, on success.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::KindNotSupported`] with the reason the closest
    /// entry rejected the kind.
    pub fn validate(
        &self,
        column: &str,
        kind: &ValueKind,
        usage: Usage,
    ) -> Result<Option<&'static str>> {
        let mut reason = String::from("the kind is not declared");
        for entry in self.entries.iter().filter(|c| c.tag == kind.tag) {
            if let Err(why) = entry.fit(kind, usage) {
                reason = why;
                continue;
            }
            return Ok(entry.warning);
        }
        Err(DdlError::KindNotSupported {
            column: column.to_string(),
            kind: kind.tag,
            dialect: self.dialect,
            reason,
        })
    }
}
