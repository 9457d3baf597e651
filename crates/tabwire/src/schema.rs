//! Column descriptors and the table-description normalizer.
//!
//! A table description is a [`Datum`] in one of three shapes: a bare column
//! id string, an ordered sequence of column specifications, or a keyed
//! mapping of id to column specification or nested description. The
//! normalizer flattens any legal description into an ordered, depth-annotated
//! list of [`Column`]s.
//!
//! # The single-key mapping heuristic
//!
//! A mapping with one key is ambiguous: it may be the innermost level of the
//! description (one column per key) or an outer column wrapping a nested
//! description. The documented tie-break, applied in order:
//!
//! 1. More than one key, or a single key whose value is a sequence of fewer
//!    than 4 elements starting with a string: innermost level.
//! 2. Otherwise: the key is one outer column and its value is a nested
//!    description one depth level down.
//!
//! The tie-break is load-bearing for existing descriptions and is reproduced
//! here exactly; descriptions that want the outer-column reading for a
//! sequence value must avoid the short-sequence-with-string-head shape (for
//! example by padding the sequence to four elements).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::value::{Datum, Properties};

/// The declared type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Text values.
    String,
    /// Integer or floating-point values.
    Number,
    /// Boolean values (encoded through truthiness).
    Boolean,
    /// Calendar dates; time-of-day components are discarded.
    Date,
    /// Full date-and-time values.
    DateTime,
    /// Time-of-day values without a date.
    TimeOfDay,
}

impl ColumnType {
    /// Parses a type name, case-insensitively.
    pub fn parse(name: &str) -> Option<ColumnType> {
        match name.to_ascii_lowercase().as_str() {
            "string" => Some(ColumnType::String),
            "number" => Some(ColumnType::Number),
            "boolean" => Some(ColumnType::Boolean),
            "date" => Some(ColumnType::Date),
            "datetime" => Some(ColumnType::DateTime),
            "timeofday" => Some(ColumnType::TimeOfDay),
            _ => None,
        }
    }

    /// The canonical lowercase name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::TimeOfDay => "timeofday",
        }
    }

    /// True for the date-family types, whose encoded forms may contain a
    /// field delimiter and need quoting in delimited output.
    pub fn is_date_family(self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::DateTime | ColumnType::TimeOfDay
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a column's values are located in an append payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// The payload fragment is the value itself.
    Scalar,
    /// The value sits at the column's position in a sequence.
    Sequence,
    /// The value sits under a key in a mapping.
    Mapping,
}

/// Normalized metadata for one table column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Unique column id.
    pub id: String,
    /// Display label; defaults to the id.
    pub label: String,
    /// Declared value type.
    pub column_type: ColumnType,
    /// Column-level custom properties.
    pub properties: Properties,
    /// Nesting level of the column in the original description.
    pub depth: usize,
    /// How the column's values are found in an append payload.
    pub container: Container,
}

/// Parses one column specification: a bare id string, or a sequence of
/// 1-4 elements `[id, type?, label?, properties?]`.
///
/// The type defaults to `string` and the label defaults to the id. Depth
/// and container are stamped by the normalizer afterwards.
pub(crate) fn parse_column_spec(spec: &Datum) -> Result<Column, TableError> {
    let elements: Vec<&Datum> = match spec {
        Datum::Text(_) => vec![spec],
        Datum::Seq(items) => items.iter().collect(),
        other => {
            return Err(TableError::Schema(format!(
                "column specification must be a string or sequence, got {}",
                other.kind()
            )))
        }
    };
    if elements.is_empty() {
        return Err(TableError::Schema(
            "empty column specification".to_string(),
        ));
    }
    if elements.len() > 4 {
        return Err(TableError::Schema(format!(
            "column specification has {} elements, at most 4 allowed",
            elements.len()
        )));
    }

    let id = expect_text(elements[0], "column id")?.to_string();
    let column_type = match elements.get(1) {
        None => ColumnType::String,
        Some(spec) => {
            let name = expect_text(spec, "column type")?;
            ColumnType::parse(name)
                .ok_or_else(|| TableError::Schema(format!("unknown column type '{}'", name)))?
        }
    };
    let label = match elements.get(2) {
        None => id.clone(),
        Some(spec) => expect_text(spec, "column label")?.to_string(),
    };
    let properties = match elements.get(3) {
        None => Properties::new(),
        Some(Datum::Map(pairs)) => pairs
            .iter()
            .map(|(key, value)| match value {
                Datum::Text(text) => Ok((key.as_str(), text.as_str())),
                other => Err(TableError::Schema(format!(
                    "column property '{}' must be a string, got {}",
                    key,
                    other.kind()
                ))),
            })
            .collect::<Result<Properties, _>>()?,
        Some(other) => {
            return Err(TableError::Schema(format!(
                "column properties must be a mapping, got {}",
                other.kind()
            )))
        }
    };

    Ok(Column {
        id,
        label,
        column_type,
        properties,
        depth: 0,
        container: Container::Scalar,
    })
}

fn expect_text<'a>(value: &'a Datum, what: &str) -> Result<&'a str, TableError> {
    match value {
        Datum::Text(text) => Ok(text),
        other => Err(TableError::Schema(format!(
            "{} must be a string, got {}",
            what,
            other.kind()
        ))),
    }
}

/// A single column definition: a bare id, or a sequence whose second
/// element names a recognized type.
fn is_leaf(description: &Datum) -> bool {
    match description {
        Datum::Text(_) => true,
        Datum::Seq(items) => matches!(
            items.get(1),
            Some(Datum::Text(name)) if ColumnType::parse(name).is_some()
        ),
        _ => false,
    }
}

/// The normalized, immutable column list of a table.
///
/// Column order matches the traversal order of the original description;
/// depth is non-decreasing along the list.
#[derive(Clone, Debug)]
pub struct Schema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Normalizes a table description into a flat column list.
    ///
    /// Fails with [`TableError::Schema`] on empty sequences or mappings,
    /// unknown types, malformed column specifications, duplicate ids, or a
    /// description that is not a string, sequence, or mapping.
    pub fn parse(description: &Datum) -> Result<Schema, TableError> {
        let mut columns = Vec::new();
        normalize(description, 0, &mut columns)?;

        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.id.clone(), position).is_some() {
                return Err(TableError::Schema(format!(
                    "duplicate column id '{}'",
                    column.id
                )));
            }
        }
        log::debug!("normalized table description into {} columns", columns.len());
        Ok(Schema { columns, index })
    }

    /// The normalized column list, in description order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false: a parsed schema has at least one column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The position of a column id in the list.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.position(id).map(|position| &self.columns[position])
    }

    /// The depth of the last column, which is the maximum depth of the
    /// description.
    pub(crate) fn last_depth(&self) -> usize {
        self.columns.last().map_or(0, |column| column.depth)
    }
}

fn normalize(
    description: &Datum,
    depth: usize,
    out: &mut Vec<Column>,
) -> Result<(), TableError> {
    if is_leaf(description) {
        let mut column = parse_column_spec(description)?;
        column.depth = depth;
        column.container = Container::Scalar;
        out.push(column);
        return Ok(());
    }

    match description {
        Datum::Seq(items) => {
            if items.is_empty() {
                return Err(TableError::Schema(
                    "empty sequence in table description".to_string(),
                ));
            }
            for item in items {
                let mut column = parse_column_spec(item)?;
                column.depth = depth;
                column.container = Container::Sequence;
                out.push(column);
            }
            Ok(())
        }
        Datum::Map(pairs) => {
            if pairs.is_empty() {
                return Err(TableError::Schema(
                    "empty mapping in table description".to_string(),
                ));
            }
            let innermost = pairs.len() > 1
                || matches!(
                    &pairs[0].1,
                    Datum::Seq(items)
                        if items.len() < 4 && matches!(items.first(), Some(Datum::Text(_)))
                );
            if innermost {
                for (key, value) in pairs {
                    // The key becomes the column id, prepended to the
                    // value's own specification elements.
                    let spec = match value {
                        Datum::Seq(items) => {
                            let mut elements = Vec::with_capacity(items.len() + 1);
                            elements.push(Datum::Text(key.clone()));
                            elements.extend(items.iter().cloned());
                            Datum::Seq(elements)
                        }
                        other => Datum::Seq(vec![Datum::Text(key.clone()), other.clone()]),
                    };
                    let mut column = parse_column_spec(&spec)?;
                    column.depth = depth;
                    column.container = Container::Mapping;
                    out.push(column);
                }
                Ok(())
            } else {
                let (key, value) = &pairs[0];
                let mut column = parse_column_spec(&Datum::Text(key.clone()))?;
                column.depth = depth;
                column.container = Container::Mapping;
                out.push(column);
                normalize(value, depth + 1, out)
            }
        }
        other => Err(TableError::Schema(format!(
            "table description must be a string, sequence, or mapping, got {}",
            other.kind()
        ))),
    }
}
