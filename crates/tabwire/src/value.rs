//! The runtime value model shared by the binder, encoder, and renderers.
//!
//! Incoming data is converted into these closed types once, at the table
//! boundary, so downstream code never has to re-discover what kind of value
//! it is holding:
//!
//! - [`Datum`] - one typed value (scalar, sequence, or ordered mapping).
//! - [`Cell`] - a datum plus optional formatted text and custom properties.
//! - [`Fragment`] - one unit of append payload: a cell, a sequence of
//!   fragments, or an ordered mapping of fragments.
//! - [`Properties`] - an insertion-ordered string-to-string map attachable
//!   to the table, a column, a row, or a cell.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TableError;

/// A single typed value.
///
/// Mappings are kept as insertion-ordered pair lists so that column and row
/// ordering derived from them is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// The absent/null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer number.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A text value.
    Text(String),
    /// A calendar date without time-of-day.
    Date(NaiveDate),
    /// A calendar date with time-of-day.
    DateTime(NaiveDateTime),
    /// A time-of-day without a date.
    TimeOfDay(NaiveTime),
    /// An ordered sequence of values.
    Seq(Vec<Datum>),
    /// An insertion-ordered mapping of string keys to values.
    Map(Vec<(String, Datum)>),
}

impl Datum {
    /// A short name for the value's runtime shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "boolean",
            Datum::Int(_) | Datum::Float(_) => "number",
            Datum::Text(_) => "text",
            Datum::Date(_) => "date",
            Datum::DateTime(_) => "datetime",
            Datum::TimeOfDay(_) => "timeofday",
            Datum::Seq(_) => "sequence",
            Datum::Map(_) => "mapping",
        }
    }

    /// Returns true if this is [`Datum::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Truthiness, as used when encoding into a boolean column: empty
    /// text, empty containers, zero, and null are false; everything else
    /// is true.
    pub fn truthy(&self) -> bool {
        match self {
            Datum::Null => false,
            Datum::Bool(b) => *b,
            Datum::Int(n) => *n != 0,
            Datum::Float(n) => *n != 0.0,
            Datum::Text(s) => !s.is_empty(),
            Datum::Seq(items) => !items.is_empty(),
            Datum::Map(pairs) => !pairs.is_empty(),
            Datum::Date(_) | Datum::DateTime(_) | Datum::TimeOfDay(_) => true,
        }
    }

    /// Converts a JSON value into a datum.
    ///
    /// Objects keep their key order (`serde_json` is built with
    /// `preserve_order`). Numbers become [`Datum::Int`] when they fit in an
    /// `i64`, otherwise [`Datum::Float`].
    pub fn from_json(value: serde_json::Value) -> Datum {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Datum::Int(i),
                None => Datum::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Datum::Text(s),
            serde_json::Value::Array(items) => {
                Datum::Seq(items.into_iter().map(Datum::from_json).collect())
            }
            serde_json::Value::Object(map) => Datum::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Datum::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => Ok(()),
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::Int(n) => write!(f, "{}", n),
            Datum::Float(n) => write!(f, "{}", n),
            Datum::Text(s) => f.write_str(s),
            Datum::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Datum::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Datum::TimeOfDay(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Datum::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Datum::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Int(value as i64)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<NaiveDate> for Datum {
    fn from(value: NaiveDate) -> Self {
        Datum::Date(value)
    }
}

impl From<NaiveDateTime> for Datum {
    fn from(value: NaiveDateTime) -> Self {
        Datum::DateTime(value)
    }
}

impl From<NaiveTime> for Datum {
    fn from(value: NaiveTime) -> Self {
        Datum::TimeOfDay(value)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(value: Vec<Datum>) -> Self {
        Datum::Seq(value)
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Datum::Null,
        }
    }
}

/// An insertion-ordered string-to-string map of custom properties.
///
/// Properties are carried through to every renderer unmodified; iteration
/// order is the order keys were first inserted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(Vec<(String, String)>);

impl Properties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Properties(Vec::new())
    }

    /// Sets a property, replacing any existing value for the key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// One table cell: a value plus optional formatted text and custom
/// properties.
///
/// This is the tagged replacement for the bare / `[value, formatted]` /
/// `[value, formatted, properties]` cell forms of the wire grammar.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// The raw value, validated against the column type at encode time.
    pub value: Datum,
    /// Optional pre-formatted display text.
    pub formatted: Option<String>,
    /// Cell-level custom properties.
    pub properties: Properties,
}

impl Cell {
    /// Creates a bare cell holding a value.
    pub fn new(value: impl Into<Datum>) -> Self {
        Cell {
            value: value.into(),
            formatted: None,
            properties: Properties::new(),
        }
    }

    /// Sets the formatted display text.
    pub fn formatted(mut self, text: impl Into<String>) -> Self {
        self.formatted = Some(text.into());
        self
    }

    /// Replaces the cell's custom properties.
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Adds one custom property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// A bare null cell carries no information; renderers treat it the
    /// same as an absent cell.
    pub(crate) fn is_bare_null(&self) -> bool {
        self.value.is_null() && self.formatted.is_none() && self.properties.is_empty()
    }
}

impl From<Datum> for Cell {
    fn from(value: Datum) -> Self {
        Cell::new(value)
    }
}

/// One unit of append payload.
///
/// A fragment mirrors the container structure of the column list: cells at
/// the leaves, sequences for positional columns, ordered mappings for keyed
/// columns.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// A leaf cell.
    Cell(Cell),
    /// An ordered sequence of fragments.
    Seq(Vec<Fragment>),
    /// An insertion-ordered mapping of string keys to fragments.
    Map(Vec<(String, Fragment)>),
}

impl Fragment {
    /// Creates a leaf cell fragment from a plain value.
    pub fn cell(value: impl Into<Datum>) -> Self {
        Fragment::Cell(Cell::new(value))
    }

    /// Creates a sequence fragment.
    pub fn seq(items: impl IntoIterator<Item = Fragment>) -> Self {
        Fragment::Seq(items.into_iter().collect())
    }

    /// Creates a mapping fragment, keeping the given pair order.
    pub fn map<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Fragment)>) -> Self {
        Fragment::Map(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Converts a JSON value into a payload fragment: arrays become
    /// sequences, objects become mappings (in key order), and everything
    /// else becomes a bare cell.
    pub fn from_json(value: serde_json::Value) -> Fragment {
        match value {
            serde_json::Value::Array(items) => {
                Fragment::Seq(items.into_iter().map(Fragment::from_json).collect())
            }
            serde_json::Value::Object(map) => Fragment::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Fragment::from_json(value)))
                    .collect(),
            ),
            leaf => Fragment::Cell(Cell::new(Datum::from_json(leaf))),
        }
    }

    /// A short name for the fragment's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Fragment::Cell(_) => "value",
            Fragment::Seq(_) => "sequence",
            Fragment::Map(_) => "mapping",
        }
    }

    /// Collapses this fragment into a single cell for the named column.
    ///
    /// Structural sequences and mappings that land on a single column
    /// become plain `Datum::Seq`/`Datum::Map` cell values; type validation
    /// of such values happens later, at encode time.
    pub(crate) fn into_cell(self, column_id: &str) -> Result<Cell, TableError> {
        match self {
            Fragment::Cell(cell) => Ok(cell),
            Fragment::Seq(_) | Fragment::Map(_) => Ok(Cell::new(self.into_datum(column_id)?)),
        }
    }

    fn into_datum(self, column_id: &str) -> Result<Datum, TableError> {
        match self {
            Fragment::Cell(cell) => {
                if cell.formatted.is_none() && cell.properties.is_empty() {
                    Ok(cell.value)
                } else {
                    Err(TableError::StructuralMismatch {
                        column: column_id.to_string(),
                        message: "formatted cell nested inside a plain value".to_string(),
                    })
                }
            }
            Fragment::Seq(items) => Ok(Datum::Seq(
                items
                    .into_iter()
                    .map(|item| item.into_datum(column_id))
                    .collect::<Result<_, _>>()?,
            )),
            Fragment::Map(pairs) => Ok(Datum::Map(
                pairs
                    .into_iter()
                    .map(|(key, value)| Ok((key, value.into_datum(column_id)?)))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }
}

impl From<Cell> for Fragment {
    fn from(cell: Cell) -> Self {
        Fragment::Cell(cell)
    }
}

impl From<Datum> for Fragment {
    fn from(value: Datum) -> Self {
        Fragment::Cell(Cell::new(value))
    }
}
