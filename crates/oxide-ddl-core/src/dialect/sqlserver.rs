//! SQL Server dialect.
//!
//! Defaults are named constraints (`DF_<table>_<column>`), so altering a
//! column drops the old constraint by name before the column is modified and
//! re-creates it afterwards.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{decimal_type, require_default, sized_type, unmapped_kind, unsupported, Provider};
use crate::capability::{Capability, CapabilityTable};
use crate::error::Result;
use crate::literal::{common_literal, hex_upper, quote_text, unmapped};
use crate::schema::{Column, KindTag, Sentinel, Value, ValueKind};

/// Invariant name of the SQL Server dialect.
pub const INVARIANT_NAME: &str = "sqlserver";

/// Longest identifier SQL Server accepts.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Longest `VARCHAR`/`VARBINARY` before `MAX` is used.
const MAX_ANSI_LENGTH: u32 = 8000;

/// Longest `NVARCHAR` before `MAX` is used.
const MAX_UNICODE_LENGTH: u32 = 4000;

const ENTRIES: &[Capability] = &[
    Capability::of(KindTag::AnsiString).max_size(MAX_ANSI_LENGTH).primary_key(),
    Capability::of(KindTag::AnsiString),
    Capability::of(KindTag::AnsiStringFixedLength)
        .max_size(MAX_ANSI_LENGTH)
        .primary_key(),
    Capability::of(KindTag::Binary).max_size(MAX_ANSI_LENGTH),
    Capability::of(KindTag::Binary),
    Capability::of(KindTag::Boolean).primary_key(),
    Capability::of(KindTag::Byte).identity(),
    Capability::of(KindTag::Currency).primary_key(),
    Capability::of(KindTag::Date).primary_key(),
    Capability::of(KindTag::DateTime).primary_key(),
    Capability::of(KindTag::DateTime2).primary_key(),
    Capability::of(KindTag::DateTimeOffset).primary_key(),
    Capability::of(KindTag::Decimal)
        .max_size(28)
        .max_scale(28)
        .primary_key(),
    Capability::of(KindTag::Decimal).max_size(28).identity(),
    Capability::of(KindTag::Double).primary_key(),
    Capability::of(KindTag::Guid).primary_key(),
    Capability::of(KindTag::Int16).identity(),
    Capability::of(KindTag::Int32).identity(),
    Capability::of(KindTag::Int64).identity(),
    Capability::of(KindTag::Single).primary_key(),
    Capability::of(KindTag::String)
        .max_size(MAX_UNICODE_LENGTH)
        .primary_key(),
    Capability::of(KindTag::String),
    Capability::of(KindTag::StringFixedLength)
        .max_size(MAX_UNICODE_LENGTH)
        .primary_key(),
    Capability::of(KindTag::Time).primary_key(),
    Capability::of(KindTag::Xml),
];

/// Capability declaration of the SQL Server dialect.
pub const CAPABILITIES: CapabilityTable = CapabilityTable::new(INVARIANT_NAME, ENTRIES);

/// SQL Server dialect for DDL synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Variable-length type, switching to `MAX` above `limit` or when unsized.
    fn variable(keyword: &str, kind: &ValueKind, limit: u32) -> String {
        match kind.positive_size() {
            Some(n) if n <= limit => format!("{keyword}({n})"),
            _ => format!("{keyword}(MAX)"),
        }
    }

    /// Unicode string literal.
    fn text(value: &str) -> String {
        format!("N{}", quote_text(value))
    }

    fn date(value: NaiveDate) -> String {
        format!("'{}'", value.format("%Y%m%d"))
    }

    fn date_time(value: NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }

    fn time(value: NaiveTime) -> String {
        format!("'{}'", value.format("%H:%M:%S%.3f"))
    }

    /// `DROP CONSTRAINT` of the column's default constraint.
    fn drop_default_constraint(self, table: &str, column: &str) -> String {
        format!(
            "{} DROP CONSTRAINT {}",
            self.alter_table(table),
            self.quote_identifier(&self.default_constraint_name(table, column))
        )
    }
}

impl Provider for SqlServerDialect {
    fn invariant_name(&self) -> &'static str {
        INVARIANT_NAME
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    fn type_specifier(&self, kind: &ValueKind) -> Result<String> {
        let sql = match kind.tag {
            KindTag::AnsiString => Self::variable("VARCHAR", kind, MAX_ANSI_LENGTH),
            KindTag::AnsiStringFixedLength => sized_type("CHAR", kind),
            KindTag::Binary => Self::variable("VARBINARY", kind, MAX_ANSI_LENGTH),
            KindTag::Boolean => "BIT".to_string(),
            KindTag::Byte => "TINYINT".to_string(),
            KindTag::Currency => "MONEY".to_string(),
            KindTag::Date => "DATE".to_string(),
            KindTag::DateTime => "DATETIME".to_string(),
            KindTag::DateTime2 => "DATETIME2".to_string(),
            KindTag::DateTimeOffset => "DATETIMEOFFSET".to_string(),
            KindTag::Decimal => decimal_type("DECIMAL", kind),
            KindTag::Double => "FLOAT".to_string(),
            KindTag::Guid => "UNIQUEIDENTIFIER".to_string(),
            KindTag::Int16 => "SMALLINT".to_string(),
            KindTag::Int32 => "INT".to_string(),
            KindTag::Int64 => "BIGINT".to_string(),
            KindTag::Single => "REAL".to_string(),
            KindTag::String => Self::variable("NVARCHAR", kind, MAX_UNICODE_LENGTH),
            KindTag::StringFixedLength => sized_type("NCHAR", kind),
            KindTag::Time => "TIME".to_string(),
            KindTag::Xml => "XML".to_string(),
            KindTag::SByte
            | KindTag::UInt16
            | KindTag::UInt32
            | KindTag::UInt64
            | KindTag::VarNumeric => return Err(unmapped_kind(kind, INVARIANT_NAME)),
        };
        Ok(sql)
    }

    fn identity_type(&self, kind: &ValueKind) -> Result<String> {
        match kind.tag {
            KindTag::Byte | KindTag::Int16 | KindTag::Int32 | KindTag::Int64 | KindTag::Decimal => {
                Ok(format!("{} IDENTITY(1,1)", self.type_specifier(kind)?))
            }
            _ => unsupported("identity column", INVARIANT_NAME),
        }
    }

    fn literal(&self, value: &Value) -> Result<String> {
        let sql = match value {
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Text(s) => Self::text(s),
            Value::Date(d) => Self::date(*d),
            Value::DateTime(dt) => Self::date_time(*dt),
            Value::Time(t) => Self::time(*t),
            Value::Binary(bytes) => format!("0x{}", hex_upper(bytes)),
            Value::Null | Value::Int(_) | Value::Float(_) => {
                return common_literal(value, INVARIANT_NAME)?
                    .ok_or_else(|| unmapped(value, INVARIANT_NAME));
            }
        };
        Ok(sql)
    }

    fn sentinel(&self, sentinel: Sentinel) -> Result<String> {
        Ok(match sentinel {
            Sentinel::CurrentDateTime => "GETDATE()",
            Sentinel::CurrentUtcDateTime => "GETUTCDATE()",
            Sentinel::NewGuid => "NEWID()",
        }
        .to_string())
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    fn default_clause(&self, table: &str, column: &Column) -> Result<String> {
        Ok(self
            .default_expression(&column.default)?
            .map(|expr| {
                format!(
                    " CONSTRAINT {} DEFAULT {expr}",
                    self.quote_identifier(&self.default_constraint_name(table, &column.name))
                )
            })
            .unwrap_or_default())
    }

    fn add_column(&self, table: &str, column: &Column) -> Result<Vec<String>> {
        Ok(vec![format!(
            "{} ADD {}",
            self.alter_table(table),
            self.column_definition(table, column, false)?
        )])
    }

    fn drop_default_statement(&self, table: &str, column: &Column, guarded: bool) -> Result<String> {
        let statement = self.drop_default_constraint(table, &column.name);
        if !guarded {
            return Ok(statement);
        }
        let name = self.default_constraint_name(table, &column.name);
        Ok(format!(
            "IF OBJECT_ID({}, N'D') IS NOT NULL {statement}",
            Self::text(&self.quote_identifier(&name))
        ))
    }

    fn modify_column_statement(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "{} ALTER COLUMN {} {} {}",
            self.alter_table(table),
            self.quote_identifier(&column.name),
            self.type_specifier(&column.kind)?,
            if column.nullable { "NULL" } else { "NOT NULL" }
        ))
    }

    fn add_default_statement(&self, table: &str, column: &Column) -> Result<String> {
        let expr = require_default(self, table, column)?;
        Ok(format!(
            "{} ADD CONSTRAINT {} DEFAULT {expr} FOR {}",
            self.alter_table(table),
            self.quote_identifier(&self.default_constraint_name(table, &column.name)),
            self.quote_identifier(&column.name)
        ))
    }

    fn drop_index(&self, table: &str, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "DROP INDEX {} ON {}",
            self.quote_identifier(name),
            self.quote_identifier(table)
        )])
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "EXEC sp_rename {}, {}",
            Self::text(&self.quote_identifier(old_name)),
            Self::text(new_name)
        )])
    }

    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Vec<String>> {
        let qualified = format!(
            "{}.{}",
            self.quote_identifier(table),
            self.quote_identifier(old_name)
        );
        Ok(vec![format!(
            "EXEC sp_rename {}, {}, N'COLUMN'",
            Self::text(&qualified),
            Self::text(new_name)
        )])
    }

    fn rename_primary_key(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<Vec<String>> {
        let _ = table;
        Ok(vec![format!(
            "EXEC sp_rename {}, {}, N'OBJECT'",
            Self::text(&self.quote_identifier(old_name)),
            Self::text(new_name)
        )])
    }

    fn exists_table(&self, database: &str, table: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM {}.INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = {}",
            self.quote_identifier(database),
            Self::text(table)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DdlError;
    use crate::schema::{ColumnReference, CreatedColumn, DefaultValue};

    const fn dialect() -> SqlServerDialect {
        SqlServerDialect::new()
    }

    #[test]
    fn test_sqlserver_data_types() {
        let d = dialect();
        assert_eq!(d.type_specifier(&KindTag::Int32.into()).unwrap(), "INT");
        assert_eq!(d.type_specifier(&KindTag::Boolean.into()).unwrap(), "BIT");
        assert_eq!(
            d.type_specifier(&ValueKind::sized(KindTag::String, 50)).unwrap(),
            "NVARCHAR(50)"
        );
        assert_eq!(
            d.type_specifier(&ValueKind::sized(KindTag::String, 4001)).unwrap(),
            "NVARCHAR(MAX)"
        );
        assert_eq!(
            d.type_specifier(&KindTag::String.into()).unwrap(),
            "NVARCHAR(MAX)"
        );
        assert_eq!(
            d.type_specifier(&ValueKind::decimal(19, 4)).unwrap(),
            "DECIMAL(19, 4)"
        );
        assert_eq!(
            d.type_specifier(&KindTag::Guid.into()).unwrap(),
            "UNIQUEIDENTIFIER"
        );
    }

    #[test]
    fn test_unmapped_kind_fails() {
        let err = dialect().type_specifier(&KindTag::UInt64.into()).unwrap_err();
        assert_eq!(
            err,
            DdlError::UnmappedKind {
                kind: KindTag::UInt64,
                dialect: INVARIANT_NAME
            }
        );
    }

    #[test]
    fn test_literals() {
        let d = dialect();
        assert_eq!(d.literal(&Value::Bool(true)).unwrap(), "1");
        assert_eq!(d.literal(&Value::Text("it's".into())).unwrap(), "N'it''s'");
        assert_eq!(
            d.literal(&Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
                .unwrap(),
            "'20240229'"
        );
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(13, 5, 9, 250)
            .unwrap();
        assert_eq!(
            d.literal(&Value::DateTime(dt)).unwrap(),
            "'2024-02-29T13:05:09.250'"
        );
        assert_eq!(d.literal(&Value::Binary(vec![0xca, 0xfe])).unwrap(), "0xCAFE");
        assert_eq!(d.literal(&Value::Int(7)).unwrap(), "7");
    }

    #[test]
    fn test_create_table() {
        let d = dialect();
        let columns = vec![
            CreatedColumn::new(Column::new("Id", KindTag::Int32))
                .primary_key()
                .identity(),
            CreatedColumn::new(
                Column::new("Created", KindTag::DateTime)
                    .not_null()
                    .default_value(Sentinel::CurrentDateTime),
            ),
        ];
        let statements = d.create_table("Orders", &columns, "PK_Orders").unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE [Orders] (\n    \
                 [Id] INT IDENTITY(1,1) NOT NULL,\n    \
                 [Created] DATETIME CONSTRAINT [DF_Orders_Created] DEFAULT GETDATE() NOT NULL,\n    \
                 CONSTRAINT [PK_Orders] PRIMARY KEY ([Id])\n)"
            ]
        );
    }

    #[test]
    fn test_add_column_embeds_default() {
        let col = Column::new("Status", ValueKind::sized(KindTag::String, 10))
            .not_null()
            .default_value(Value::Text("new".into()));
        assert_eq!(
            dialect().add_column("Orders", &col).unwrap(),
            vec![
                "ALTER TABLE [Orders] ADD [Status] NVARCHAR(10) \
                 CONSTRAINT [DF_Orders_Status] DEFAULT N'new' NOT NULL"
            ]
        );
    }

    #[test]
    fn test_alter_column_with_default() {
        let col = Column::new("Qty", KindTag::Int64)
            .not_null()
            .default_value(Value::Int(0));
        assert_eq!(
            dialect().alter_column("Lines", &col).unwrap(),
            vec![
                "IF OBJECT_ID(N'[DF_Lines_Qty]', N'D') IS NOT NULL \
                 ALTER TABLE [Lines] DROP CONSTRAINT [DF_Lines_Qty]",
                "ALTER TABLE [Lines] ALTER COLUMN [Qty] BIGINT NOT NULL",
                "ALTER TABLE [Lines] ADD CONSTRAINT [DF_Lines_Qty] DEFAULT 0 FOR [Qty]",
            ]
        );
    }

    #[test]
    fn test_alter_column_without_default() {
        let col = Column::new("Qty", KindTag::Int64);
        assert_eq!(
            dialect().alter_column("Lines", &col).unwrap(),
            vec![
                "IF OBJECT_ID(N'[DF_Lines_Qty]', N'D') IS NOT NULL \
                 ALTER TABLE [Lines] DROP CONSTRAINT [DF_Lines_Qty]",
                "ALTER TABLE [Lines] ALTER COLUMN [Qty] BIGINT NULL",
            ]
        );
    }

    #[test]
    fn test_drop_default_is_unguarded() {
        let col = Column::new("Qty", KindTag::Int64);
        assert_eq!(
            dialect().drop_default("Lines", &col).unwrap(),
            vec!["ALTER TABLE [Lines] DROP CONSTRAINT [DF_Lines_Qty]"]
        );
    }

    #[test]
    fn test_add_default_without_default_is_rejected() {
        let col = Column::new("Qty", KindTag::Int64);
        assert!(matches!(
            dialect().add_default_statement("Lines", &col),
            Err(DdlError::Precondition(_))
        ));
        assert_eq!(col.default, DefaultValue::None);
    }

    #[test]
    fn test_foreign_key_and_constraints() {
        let d = dialect();
        assert_eq!(
            d.add_foreign_key(
                "Lines",
                "Orders",
                &[ColumnReference::new("OrderId", "Id")],
                "FK_Lines_Orders"
            )
            .unwrap(),
            vec![
                "ALTER TABLE [Lines] ADD CONSTRAINT [FK_Lines_Orders] \
                 FOREIGN KEY ([OrderId]) REFERENCES [Orders] ([Id])"
            ]
        );
        assert_eq!(
            d.add_unique_constraint("Lines", &["Sku".to_string()], "UQ_Lines_Sku")
                .unwrap(),
            vec!["ALTER TABLE [Lines] ADD CONSTRAINT [UQ_Lines_Sku] UNIQUE ([Sku])"]
        );
    }

    #[test]
    fn test_renames() {
        let d = dialect();
        assert_eq!(
            d.rename_table("Old", "New").unwrap(),
            vec!["EXEC sp_rename N'[Old]', N'New'"]
        );
        assert_eq!(
            d.rename_column("Orders", "Qty", "Quantity").unwrap(),
            vec!["EXEC sp_rename N'[Orders].[Qty]', N'Quantity', N'COLUMN'"]
        );
        assert_eq!(
            d.rename_primary_key("Orders", "PK_Old", "PK_New").unwrap(),
            vec!["EXEC sp_rename N'[PK_Old]', N'PK_New', N'OBJECT'"]
        );
    }

    #[test]
    fn test_drop_index_and_exists_table() {
        let d = dialect();
        assert_eq!(
            d.drop_index("Orders", "IX_Orders_Date").unwrap(),
            vec!["DROP INDEX [IX_Orders_Date] ON [Orders]"]
        );
        assert_eq!(
            d.exists_table("Shop", "Orders"),
            "SELECT COUNT(*) FROM [Shop].INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = N'Orders'"
        );
    }

    #[test]
    fn test_quote_identifier_escapes() {
        assert_eq!(dialect().quote_identifier("a]b"), "[a]]b]");
    }
}
