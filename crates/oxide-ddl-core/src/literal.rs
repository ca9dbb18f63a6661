//! Building blocks for rendering values as SQL literals.
//!
//! Each dialect's `Provider::literal` picks the forms it needs from here and
//! adds its own date/time and boolean syntax.

use crate::error::{DdlError, Result};
use crate::schema::Value;

/// Quotes text with single quotes, doubling embedded quotes.
#[must_use]
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Uppercase hex digits of `bytes`, without prefix.
#[must_use]
pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Renders a float, rejecting NaN and infinities.
///
/// # Errors
///
/// Returns [`DdlError::UnmappedLiteral`] for non-finite values.
pub fn finite_float(value: f64, dialect: &'static str) -> Result<String> {
    if value.is_finite() {
        Ok(format!("{value}"))
    } else {
        Err(DdlError::UnmappedLiteral {
            literal: "non-finite float",
            dialect,
        })
    }
}

/// Renders the variants whose syntax is the same in every supported dialect.
///
/// Returns `Ok(None)` for variants the dialect has to render itself.
///
/// # Errors
///
/// Propagates [`finite_float`] failures.
pub fn common_literal(value: &Value, dialect: &'static str) -> Result<Option<String>> {
    let sql = match value {
        Value::Null => String::from("NULL"),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => finite_float(*f, dialect)?,
        Value::Text(s) => quote_text(s),
        Value::Bool(_)
        | Value::Date(_)
        | Value::DateTime(_)
        | Value::Time(_)
        | Value::Binary(_) => return Ok(None),
    };
    Ok(Some(sql))
}

/// Error for a literal variant a dialect cannot express.
#[must_use]
pub const fn unmapped(value: &Value, dialect: &'static str) -> DdlError {
    DdlError::UnmappedLiteral {
        literal: value.variant_name(),
        dialect,
    }
}
