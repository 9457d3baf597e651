//! Multi-key row ordering for renderers.
//!
//! An [`OrderBy`] is a list of `(column, direction)` keys, highest priority
//! first. Renderers apply it with a stable sort over raw (pre-encoding)
//! cell values, so rows that compare equal keep their insertion order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::schema::Schema;
use crate::table::Row;
use crate::value::Datum;

/// Sort direction for one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

/// One sort key: a column id and a direction.
#[derive(Clone, Debug, PartialEq)]
pub struct SortKey {
    /// The column to sort by.
    pub column: String,
    /// The direction.
    pub order: SortOrder,
}

impl SortKey {
    /// An ascending key.
    pub fn asc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }

    /// A descending key.
    pub fn desc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Descending,
        }
    }
}

/// An ordering specification: zero or more sort keys, first key highest
/// priority. The default is empty, meaning insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderBy(Vec<SortKey>);

impl OrderBy {
    /// No ordering: rows render in insertion order.
    pub fn unordered() -> Self {
        OrderBy(Vec::new())
    }

    /// A single ascending key.
    pub fn asc(column: impl Into<String>) -> Self {
        OrderBy(vec![SortKey::asc(column)])
    }

    /// A single descending key.
    pub fn desc(column: impl Into<String>) -> Self {
        OrderBy(vec![SortKey::desc(column)])
    }

    /// Appends a lower-priority ascending key.
    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.0.push(SortKey::asc(column));
        self
    }

    /// Appends a lower-priority descending key.
    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.0.push(SortKey::desc(column));
        self
    }

    /// The keys, highest priority first.
    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// True when no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses an ordering specification from its loose wire forms: null
    /// (no ordering), a bare column id (ascending), a `[column, direction]`
    /// pair, or a list of ids and pairs. Direction tokens are
    /// case-insensitive `asc`/`desc`; anything else is an error.
    pub fn from_datum(spec: &Datum) -> Result<OrderBy, TableError> {
        match spec {
            Datum::Null => Ok(OrderBy::unordered()),
            Datum::Text(column) => Ok(OrderBy::asc(column.clone())),
            Datum::Seq(items) => {
                // A two-element sequence with a valid direction token is a
                // single pair, not a list of two ascending ids.
                if let Some(key) = parse_pair(items) {
                    return Ok(OrderBy(vec![key]));
                }
                let keys = items
                    .iter()
                    .map(|item| match item {
                        Datum::Text(column) => Ok(SortKey::asc(column.clone())),
                        Datum::Seq(pair) => parse_pair(pair).ok_or_else(|| {
                            TableError::Schema(
                                "order-by pair must be [column, \"asc\"|\"desc\"]".to_string(),
                            )
                        }),
                        other => Err(TableError::Schema(format!(
                            "order-by entry must be a column id or pair, got {}",
                            other.kind()
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OrderBy(keys))
            }
            other => Err(TableError::Schema(format!(
                "order-by specification must be a column id or list of pairs, got {}",
                other.kind()
            ))),
        }
    }

    /// Resolves the keys against a schema, producing a reusable comparator.
    pub(crate) fn comparator(&self, schema: &Schema) -> Result<RowComparator, TableError> {
        let keys = self
            .0
            .iter()
            .map(|key| {
                schema
                    .position(&key.column)
                    .map(|position| (position, key.order))
                    .ok_or_else(|| TableError::UnknownColumn(key.column.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RowComparator { keys })
    }
}

impl FromIterator<SortKey> for OrderBy {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        OrderBy(iter.into_iter().collect())
    }
}

fn parse_pair(items: &[Datum]) -> Option<SortKey> {
    if items.len() != 2 {
        return None;
    }
    let (Datum::Text(column), Datum::Text(direction)) = (&items[0], &items[1]) else {
        return None;
    };
    match direction.to_ascii_lowercase().as_str() {
        "asc" => Some(SortKey::asc(column.clone())),
        "desc" => Some(SortKey::desc(column.clone())),
        _ => None,
    }
}

/// A multi-key comparator with column ids resolved to positions.
pub(crate) struct RowComparator {
    keys: Vec<(usize, SortOrder)>,
}

impl RowComparator {
    pub(crate) fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for (position, order) in &self.keys {
            let ordering = compare_raw(a.value_at(*position), b.value_at(*position));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Compares raw cell values. A missing cell behaves like null and sorts
/// before any present value; values of different kinds order by a fixed
/// kind rank.
pub(crate) fn compare_raw(a: Option<&Datum>, b: Option<&Datum>) -> Ordering {
    let a = a.unwrap_or(&Datum::Null);
    let b = b.unwrap_or(&Datum::Null);
    match (a, b) {
        (Datum::Null, Datum::Null) => Ordering::Equal,
        (Datum::Bool(x), Datum::Bool(y)) => x.cmp(y),
        (Datum::Int(x), Datum::Int(y)) => x.cmp(y),
        (Datum::Int(x), Datum::Float(y)) => number_cmp(*x as f64, *y),
        (Datum::Float(x), Datum::Int(y)) => number_cmp(*x, *y as f64),
        (Datum::Float(x), Datum::Float(y)) => number_cmp(*x, *y),
        (Datum::Text(x), Datum::Text(y)) => x.cmp(y),
        (Datum::Date(x), Datum::Date(y)) => x.cmp(y),
        (Datum::DateTime(x), Datum::DateTime(y)) => x.cmp(y),
        (Datum::TimeOfDay(x), Datum::TimeOfDay(y)) => x.cmp(y),
        (Datum::Seq(x), Datum::Seq(y)) => pairwise(x, y),
        (Datum::Map(x), Datum::Map(y)) => {
            for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
                let key_ordering = ka.cmp(kb);
                if key_ordering != Ordering::Equal {
                    return key_ordering;
                }
                let value_ordering = compare_raw(Some(va), Some(vb));
                if value_ordering != Ordering::Equal {
                    return value_ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (x, y) => rank(x).cmp(&rank(y)),
    }
}

fn pairwise(a: &[Datum], b: &[Datum]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ordering = compare_raw(Some(x), Some(y));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

fn number_cmp(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

fn rank(value: &Datum) -> u8 {
    match value {
        Datum::Null => 0,
        Datum::Bool(_) => 1,
        Datum::Int(_) | Datum::Float(_) => 2,
        Datum::Text(_) => 3,
        Datum::Date(_) => 4,
        Datum::DateTime(_) => 5,
        Datum::TimeOfDay(_) => 6,
        Datum::Seq(_) => 7,
        Datum::Map(_) => 8,
    }
}
