//! Postgres dialect.

use super::{decimal_type, require_default, sized_type, unmapped_kind, unsupported, Provider};
use crate::capability::{Capability, CapabilityTable};
use crate::error::Result;
use crate::literal::{common_literal, hex_upper, quote_text, unmapped};
use crate::schema::{Column, KindTag, Sentinel, Value, ValueKind};

/// Invariant name of the Postgres dialect.
pub const INVARIANT_NAME: &str = "postgresql";

/// Longest identifier Postgres keeps (`NAMEDATALEN - 1`).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

const ENTRIES: &[Capability] = &[
    Capability::of(KindTag::AnsiString).max_size(10_485_760).primary_key(),
    Capability::of(KindTag::AnsiString),
    Capability::of(KindTag::AnsiStringFixedLength)
        .max_size(10_485_760)
        .primary_key(),
    Capability::of(KindTag::Binary),
    Capability::of(KindTag::Boolean).primary_key(),
    Capability::of(KindTag::Byte).primary_key(),
    Capability::of(KindTag::Currency).primary_key(),
    Capability::of(KindTag::Date).primary_key(),
    Capability::of(KindTag::DateTime).primary_key(),
    Capability::of(KindTag::DateTime2).primary_key(),
    Capability::of(KindTag::DateTimeOffset).primary_key(),
    Capability::of(KindTag::Decimal)
        .max_size(28)
        .max_scale(28)
        .primary_key(),
    Capability::of(KindTag::Decimal).max_size(28).primary_key(),
    Capability::of(KindTag::Double).primary_key(),
    Capability::of(KindTag::Guid).primary_key(),
    Capability::of(KindTag::Int16).identity(),
    Capability::of(KindTag::Int32).identity(),
    Capability::of(KindTag::Int64).identity(),
    Capability::of(KindTag::Single).primary_key(),
    Capability::of(KindTag::String).max_size(10_485_760).primary_key(),
    Capability::of(KindTag::String),
    Capability::of(KindTag::StringFixedLength)
        .max_size(10_485_760)
        .primary_key(),
    Capability::of(KindTag::Time).primary_key(),
    Capability::of(KindTag::Xml),
];

/// Capability declaration of the Postgres dialect.
pub const CAPABILITIES: CapabilityTable = CapabilityTable::new(INVARIANT_NAME, ENTRIES);

/// Postgres dialect for DDL synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new Postgres dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `ALTER TABLE t ALTER COLUMN c <action>`.
    fn alter_column_action(self, table: &str, column: &str, action: &str) -> String {
        format!(
            "{} ALTER COLUMN {} {action}",
            self.alter_table(table),
            self.quote_identifier(column)
        )
    }
}

impl Provider for PostgresDialect {
    fn invariant_name(&self) -> &'static str {
        INVARIANT_NAME
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    fn type_specifier(&self, kind: &ValueKind) -> Result<String> {
        let sql = match kind.tag {
            KindTag::AnsiString | KindTag::String => kind
                .positive_size()
                .map_or_else(|| "TEXT".to_string(), |n| format!("VARCHAR({n})")),
            KindTag::AnsiStringFixedLength | KindTag::StringFixedLength => {
                sized_type("CHAR", kind)
            }
            KindTag::Binary => "BYTEA".to_string(),
            KindTag::Boolean => "BOOLEAN".to_string(),
            KindTag::Byte | KindTag::Int16 => "SMALLINT".to_string(),
            KindTag::Currency => "MONEY".to_string(),
            KindTag::Date => "DATE".to_string(),
            KindTag::DateTime | KindTag::DateTime2 => "TIMESTAMP".to_string(),
            KindTag::DateTimeOffset => "TIMESTAMPTZ".to_string(),
            KindTag::Decimal | KindTag::VarNumeric => decimal_type("NUMERIC", kind),
            KindTag::Double => "DOUBLE PRECISION".to_string(),
            KindTag::Guid => "UUID".to_string(),
            KindTag::Int32 => "INTEGER".to_string(),
            KindTag::Int64 => "BIGINT".to_string(),
            KindTag::Single => "REAL".to_string(),
            KindTag::Time => "TIME".to_string(),
            KindTag::Xml => "XML".to_string(),
            KindTag::SByte | KindTag::UInt16 | KindTag::UInt32 | KindTag::UInt64 => {
                return Err(unmapped_kind(kind, INVARIANT_NAME));
            }
        };
        Ok(sql)
    }

    fn identity_type(&self, kind: &ValueKind) -> Result<String> {
        match kind.tag {
            KindTag::Int16 | KindTag::Int32 | KindTag::Int64 => Ok(format!(
                "{} GENERATED BY DEFAULT AS IDENTITY",
                self.type_specifier(kind)?
            )),
            _ => unsupported("identity column", INVARIANT_NAME),
        }
    }

    fn literal(&self, value: &Value) -> Result<String> {
        let sql = match value {
            Value::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            Value::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => format!("TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Time(t) => format!("TIME '{}'", t.format("%H:%M:%S%.f")),
            Value::Binary(bytes) => format!("'\\x{}'::bytea", hex_upper(bytes)),
            Value::Text(s) => quote_text(s),
            Value::Null | Value::Int(_) | Value::Float(_) => {
                return common_literal(value, INVARIANT_NAME)?
                    .ok_or_else(|| unmapped(value, INVARIANT_NAME));
            }
        };
        Ok(sql)
    }

    fn sentinel(&self, sentinel: Sentinel) -> Result<String> {
        Ok(match sentinel {
            Sentinel::CurrentDateTime => "CURRENT_TIMESTAMP",
            Sentinel::CurrentUtcDateTime => "(CURRENT_TIMESTAMP AT TIME ZONE 'UTC')",
            Sentinel::NewGuid => "gen_random_uuid()",
        }
        .to_string())
    }

    fn drop_default_statement(&self, table: &str, column: &Column, guarded: bool) -> Result<String> {
        // DROP DEFAULT is a no-op on a column without a default.
        let _ = guarded;
        Ok(self.alter_column_action(table, &column.name, "DROP DEFAULT"))
    }

    fn modify_column_statement(&self, table: &str, column: &Column) -> Result<String> {
        let type_clause = self.type_specifier(&column.kind)?;
        let nullability = if column.nullable {
            "DROP NOT NULL"
        } else {
            "SET NOT NULL"
        };
        Ok(format!(
            "{}, ALTER COLUMN {} {nullability}",
            self.alter_column_action(table, &column.name, &format!("TYPE {type_clause}")),
            self.quote_identifier(&column.name)
        ))
    }

    fn add_default_statement(&self, table: &str, column: &Column) -> Result<String> {
        let expr = require_default(self, table, column)?;
        Ok(self.alter_column_action(table, &column.name, &format!("SET DEFAULT {expr}")))
    }

    fn exists_table(&self, database: &str, table: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_catalog = {} AND table_name = {}",
            quote_text(database),
            quote_text(table)
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::DdlError;
    use crate::naming::ObjectKind;
    use crate::schema::CreatedColumn;

    const fn dialect() -> PostgresDialect {
        PostgresDialect::new()
    }

    #[test]
    fn test_postgres_data_types() {
        let d = dialect();
        assert_eq!(
            d.type_specifier(&ValueKind::sized(KindTag::String, 255)).unwrap(),
            "VARCHAR(255)"
        );
        assert_eq!(d.type_specifier(&KindTag::String.into()).unwrap(), "TEXT");
        assert_eq!(d.type_specifier(&KindTag::Guid.into()).unwrap(), "UUID");
        assert_eq!(
            d.type_specifier(&ValueKind::decimal(12, 3)).unwrap(),
            "NUMERIC(12, 3)"
        );
        assert_eq!(
            d.type_specifier(&KindTag::DateTimeOffset.into()).unwrap(),
            "TIMESTAMPTZ"
        );
        assert!(matches!(
            d.type_specifier(&KindTag::UInt32.into()),
            Err(DdlError::UnmappedKind { .. })
        ));
    }

    #[test]
    fn test_literals() {
        let d = dialect();
        assert_eq!(d.literal(&Value::Bool(true)).unwrap(), "TRUE");
        assert_eq!(d.literal(&Value::Text("O'Neil".into())).unwrap(), "'O''Neil'");
        assert_eq!(
            d.literal(&Value::Binary(vec![0xde, 0xad])).unwrap(),
            "'\\xDEAD'::bytea"
        );
        let dt = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        assert_eq!(
            d.literal(&Value::DateTime(dt)).unwrap(),
            "TIMESTAMP '2023-12-31 23:59:58'"
        );
        assert_eq!(
            d.literal(&Value::Date(dt.date())).unwrap(),
            "DATE '2023-12-31'"
        );
    }

    #[test]
    fn test_create_table_with_identity_and_unique_groups() {
        let columns = vec![
            CreatedColumn::new(Column::new("id", KindTag::Int64))
                .primary_key()
                .identity(),
            CreatedColumn::new(Column::new("tenant", KindTag::Int32).not_null())
                .unique_in("tenant_email"),
            CreatedColumn::new(Column::new("email", ValueKind::sized(KindTag::String, 320)))
                .unique_in("tenant_email"),
            CreatedColumn::new(
                Column::new("created_at", KindTag::DateTime)
                    .not_null()
                    .default_value(Sentinel::CurrentDateTime),
            ),
        ];
        assert_eq!(
            dialect().create_table("users", &columns, "PK_users").unwrap(),
            vec![
                "CREATE TABLE \"users\" (\n    \
                 \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL,\n    \
                 \"tenant\" INTEGER NOT NULL,\n    \
                 \"email\" VARCHAR(320),\n    \
                 \"created_at\" TIMESTAMP DEFAULT CURRENT_TIMESTAMP NOT NULL,\n    \
                 CONSTRAINT \"PK_users\" PRIMARY KEY (\"id\"),\n    \
                 UNIQUE (\"tenant\", \"email\")\n)"
            ]
        );
    }

    #[test]
    fn test_alter_column_phases() {
        let col = Column::new("score", ValueKind::decimal(5, 2))
            .not_null()
            .default_value(Value::Float(1.5));
        assert_eq!(
            dialect().alter_column("results", &col).unwrap(),
            vec![
                "ALTER TABLE \"results\" ALTER COLUMN \"score\" DROP DEFAULT",
                "ALTER TABLE \"results\" ALTER COLUMN \"score\" TYPE NUMERIC(5, 2), \
                 ALTER COLUMN \"score\" SET NOT NULL",
                "ALTER TABLE \"results\" ALTER COLUMN \"score\" SET DEFAULT 1.5",
            ]
        );
    }

    #[test]
    fn test_generic_operations() {
        let d = dialect();
        assert_eq!(
            d.add_column("users", &Column::new("nick", ValueKind::sized(KindTag::String, 30)))
                .unwrap(),
            vec!["ALTER TABLE \"users\" ADD COLUMN \"nick\" VARCHAR(30)"]
        );
        assert_eq!(
            d.add_index("users", &["email".to_string()], "IX_users_email")
                .unwrap(),
            vec!["CREATE INDEX \"IX_users_email\" ON \"users\" (\"email\")"]
        );
        assert_eq!(
            d.rename_primary_key("users", "PK_users", "PK_people").unwrap(),
            vec!["ALTER TABLE \"users\" RENAME CONSTRAINT \"PK_users\" TO \"PK_people\""]
        );
        assert_eq!(
            d.drop_foreign_key("users", "FK_users_tenant").unwrap(),
            vec!["ALTER TABLE \"users\" DROP CONSTRAINT \"FK_users_tenant\""]
        );
    }

    #[test]
    fn test_object_names_respect_limit() {
        let d = dialect();
        let long = "c".repeat(70);
        let name = d.object_name("users", ObjectKind::Index, &[long]);
        assert!(name.len() <= MAX_IDENTIFIER_LENGTH);
    }

    #[test]
    fn test_exists_table() {
        assert_eq!(
            dialect().exists_table("app", "users"),
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_catalog = 'app' AND table_name = 'users'"
        );
    }
}
