//! Value descriptors consumed by the providers.
//!
//! These are immutable inputs built upstream from a declarative migration
//! description. Providers only read them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Portable classification of a column's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KindTag {
    /// Variable-length non-Unicode text.
    AnsiString,
    /// Fixed-length non-Unicode text.
    AnsiStringFixedLength,
    /// Variable-length binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Monetary amount.
    Currency,
    /// Date without time.
    Date,
    /// Date and time.
    DateTime,
    /// Date and time with extended range and precision.
    DateTime2,
    /// Date and time with a UTC offset.
    DateTimeOffset,
    /// Fixed-point number; size is the precision.
    Decimal,
    /// Double precision floating point.
    Double,
    /// Globally unique identifier.
    Guid,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Signed 8-bit integer.
    SByte,
    /// Single precision floating point.
    Single,
    /// Variable-length Unicode text.
    String,
    /// Fixed-length Unicode text.
    StringFixedLength,
    /// Time of day.
    Time,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Variable-length numeric.
    VarNumeric,
    /// XML document.
    Xml,
}

impl KindTag {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 26] = [
        Self::AnsiString,
        Self::AnsiStringFixedLength,
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::Currency,
        Self::Date,
        Self::DateTime,
        Self::DateTime2,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::String,
        Self::StringFixedLength,
        Self::Time,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::VarNumeric,
        Self::Xml,
    ];
}

/// A value kind together with its size and scale.
///
/// For text and binary kinds `size` is a length; for decimal kinds it is the
/// precision, with `scale` the number of fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueKind {
    /// The portable kind.
    pub tag: KindTag,
    /// Length or precision, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Scale, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl ValueKind {
    /// Creates an unsized kind.
    #[must_use]
    pub const fn new(tag: KindTag) -> Self {
        Self {
            tag,
            size: None,
            scale: None,
        }
    }

    /// Creates a kind with a length.
    #[must_use]
    pub const fn sized(tag: KindTag, size: u32) -> Self {
        Self {
            tag,
            size: Some(size),
            scale: None,
        }
    }

    /// Creates a decimal kind with precision and scale.
    #[must_use]
    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            tag: KindTag::Decimal,
            size: Some(precision),
            scale: Some(scale),
        }
    }

    /// Returns the size only when it is a positive number.
    #[must_use]
    pub fn positive_size(&self) -> Option<u32> {
        self.size.filter(|s| *s > 0)
    }
}

impl From<KindTag> for ValueKind {
    fn from(tag: KindTag) -> Self {
        Self::new(tag)
    }
}

/// A literal value carried by a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date-time",
            Self::Time(_) => "time",
            Self::Binary(_) => "binary",
        }
    }
}

/// Named defaults that each dialect renders as its own expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    /// The server's current local date and time.
    CurrentDateTime,
    /// The server's current UTC date and time.
    CurrentUtcDateTime,
    /// A freshly generated GUID.
    NewGuid,
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DefaultValue {
    /// No default.
    #[default]
    None,
    /// A literal value.
    Literal(Value),
    /// A dialect-specific expression.
    Sentinel(Sentinel),
}

impl DefaultValue {
    /// Returns whether a default is modeled.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<Sentinel> for DefaultValue {
    fn from(sentinel: Sentinel) -> Self {
        Self::Sentinel(sentinel)
    }
}

/// A column as seen by add/alter operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Value kind.
    pub kind: ValueKind,
    /// Whether NULL is allowed.
    #[serde(default = "nullable_default")]
    pub nullable: bool,
    /// Default value.
    #[serde(default)]
    pub default: DefaultValue,
}

const fn nullable_default() -> bool {
    true
}

impl Column {
    /// Creates a nullable column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<ValueKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            nullable: true,
            default: DefaultValue::None,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value, replacing any previous one.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Clears the default value.
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.default = DefaultValue::None;
        self
    }
}

/// A column as seen by table creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedColumn {
    /// The column definition.
    #[serde(flatten)]
    pub column: Column,
    /// Whether the column belongs to the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Label of the unique constraint this column belongs to; empty for none.
    #[serde(default)]
    pub unique_group: String,
    /// Whether the engine assigns values automatically.
    #[serde(default)]
    pub identity: bool,
}

impl CreatedColumn {
    /// Wraps a column with no table-level roles.
    #[must_use]
    pub fn new(column: Column) -> Self {
        Self {
            column,
            primary_key: false,
            unique_group: String::new(),
            identity: false,
        }
    }

    /// Marks the column as part of the primary key.
    ///
    /// Primary key columns are always rendered NOT NULL, whatever
    /// `column.nullable` says.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Places the column in the named unique group.
    #[must_use]
    pub fn unique_in(mut self, group: impl Into<String>) -> Self {
        self.unique_group = group.into();
        self
    }

    /// Marks the column as an identity column.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.column.name
    }
}

impl From<Column> for CreatedColumn {
    fn from(column: Column) -> Self {
        Self::new(column)
    }
}

/// One source/referenced column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReference {
    /// Column in the referencing table.
    pub column: String,
    /// Column in the referenced table.
    pub referenced_column: String,
}

impl ColumnReference {
    /// Creates a reference pair.
    #[must_use]
    pub fn new(column: impl Into<String>, referenced_column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_defaults() {
        let col = Column::new("id", KindTag::Int32);
        assert!(col.nullable);
        assert_eq!(col.default, DefaultValue::None);
        assert_eq!(col.kind, ValueKind::new(KindTag::Int32));
    }

    #[test]
    fn test_primary_key_builder_matches_json() {
        let built = CreatedColumn::new(Column::new("id", KindTag::Int64)).primary_key();
        let parsed: CreatedColumn =
            serde_json::from_str(r#"{"name": "id", "kind": {"tag": "Int64"}, "primary_key": true}"#)
                .unwrap();
        assert!(built.primary_key);
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_default_replaces_previous() {
        let col = Column::new("created", KindTag::DateTime)
            .default_value(Value::Int(1))
            .default_value(Sentinel::CurrentDateTime);
        assert_eq!(col.default, DefaultValue::Sentinel(Sentinel::CurrentDateTime));
        assert!(col.default.is_some());
        assert!(!col.without_default().default.is_some());
    }

    #[test]
    fn test_positive_size() {
        assert_eq!(ValueKind::sized(KindTag::String, 0).positive_size(), None);
        assert_eq!(ValueKind::sized(KindTag::String, 10).positive_size(), Some(10));
        assert_eq!(ValueKind::new(KindTag::String).positive_size(), None);
    }

    #[test]
    fn test_created_column_deserializes_flattened() {
        let json = r#"{
            "name": "email",
            "kind": { "tag": "String", "size": 120 },
            "nullable": false,
            "unique_group": "u_email"
        }"#;
        let col: CreatedColumn = serde_json::from_str(json).unwrap();
        assert_eq!(col.name(), "email");
        assert_eq!(col.column.kind, ValueKind::sized(KindTag::String, 120));
        assert!(!col.column.nullable);
        assert!(!col.primary_key);
        assert_eq!(col.unique_group, "u_email");
        assert_eq!(col.column.default, DefaultValue::None);
    }
}
