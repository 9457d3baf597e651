//! Type-directed encoding of cell values into output atoms.
//!
//! Every renderer shares this translation and supplies its own
//! string-escaping function; the encoder owns type validation and the
//! textual form of each value kind, the renderer owns everything around it.
//!
//! Encoded forms:
//!
//! | column type | output atom                        |
//! |-------------|------------------------------------|
//! | any, null   | `null`                             |
//! | `boolean`   | `true` / `false` (truthiness)      |
//! | `number`    | numeric literal                    |
//! | `string`    | escaped text                       |
//! | `date`      | `new Date(year,month,day)` (month zero-based) |
//! | `datetime`  | `new Date(y,m,d,h,mi,s)`           |
//! | `timeofday` | `[hour,minute,second]`             |

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::TableError;
use crate::schema::ColumnType;
use crate::value::{Cell, Datum};

/// The encoded form of one cell: the value atom plus the escaped formatted
/// text, when present.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedCell {
    /// The encoded value atom.
    pub value: String,
    /// The escaped formatted text, if the cell carried any.
    pub formatted: Option<String>,
}

/// Encodes a cell against its column's declared type.
pub fn encode_cell(
    cell: &Cell,
    column_type: ColumnType,
    escape: &dyn Fn(&str) -> String,
) -> Result<EncodedCell, TableError> {
    Ok(EncodedCell {
        value: encode_value(&cell.value, column_type, escape)?,
        formatted: cell.formatted.as_deref().map(escape),
    })
}

/// Encodes a single raw value against a declared type.
///
/// Null encodes to the literal `null` marker for every type. Values
/// incompatible with the type fail with [`TableError::TypeMismatch`].
pub fn encode_value(
    value: &Datum,
    column_type: ColumnType,
    escape: &dyn Fn(&str) -> String,
) -> Result<String, TableError> {
    if value.is_null() {
        return Ok("null".to_string());
    }
    match column_type {
        ColumnType::Boolean => Ok(if value.truthy() { "true" } else { "false" }.to_string()),
        ColumnType::Number => match value {
            Datum::Int(n) => Ok(n.to_string()),
            Datum::Float(n) => Ok(n.to_string()),
            other => Err(mismatch(column_type, other)),
        },
        ColumnType::String => match value {
            Datum::Seq(_) => Err(mismatch(column_type, value)),
            Datum::Text(text) => Ok(escape(text)),
            other => Ok(escape(&other.to_string())),
        },
        ColumnType::Date => match value {
            Datum::Date(date) => Ok(date_literal(*date)),
            Datum::DateTime(datetime) => Ok(date_literal(datetime.date())),
            other => Err(mismatch(column_type, other)),
        },
        ColumnType::DateTime => match value {
            Datum::DateTime(datetime) => Ok(datetime_literal(*datetime)),
            other => Err(mismatch(column_type, other)),
        },
        ColumnType::TimeOfDay => match value {
            Datum::TimeOfDay(time) => Ok(time_literal(time.hour(), time.minute(), time.second())),
            Datum::DateTime(datetime) => {
                let time = datetime.time();
                Ok(time_literal(time.hour(), time.minute(), time.second()))
            }
            other => Err(mismatch(column_type, other)),
        },
    }
}

fn mismatch(expected: ColumnType, found: &Datum) -> TableError {
    TableError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

// The JavaScript Date constructor takes a zero-based month.
fn date_literal(date: NaiveDate) -> String {
    format!(
        "new Date({},{},{})",
        date.year(),
        date.month0(),
        date.day()
    )
}

fn datetime_literal(datetime: NaiveDateTime) -> String {
    format!(
        "new Date({},{},{},{},{},{})",
        datetime.year(),
        datetime.month0(),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

fn time_literal(hour: u32, minute: u32, second: u32) -> String {
    format!("[{},{},{}]", hour, minute, second)
}

/// Escapes text as a double-quoted JSON string literal, quotes included.
///
/// Built on `serde_json`'s string encoding, so the result always decodes
/// back to the input exactly.
pub fn json_escape(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Escapes text as a single-quoted JavaScript string literal, quotes
/// included.
pub fn js_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Escapes text as a double-quoted delimited-text field, quotes included;
/// embedded quotes are doubled.
pub fn csv_escape(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Escapes `&`, `<`, `>`, and `"` as HTML entities.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
