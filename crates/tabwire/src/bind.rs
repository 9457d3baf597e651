//! Recursive binding of append payloads onto the column list.
//!
//! Binding walks the payload and the normalized columns together, guided by
//! each column's container kind. Scalar columns consume the fragment as the
//! row's last value; sequence columns consume positional elements; mapping
//! columns either fill the remaining columns by key (at the innermost depth)
//! or fan out one row per key (at outer depths).
//!
//! Rows are committed one at a time, so a structural error in the middle of
//! a payload leaves the rows bound before it in the table.

use crate::error::TableError;
use crate::schema::{Container, Schema};
use crate::table::Row;
use crate::value::{Fragment, Properties};

/// Binds one append payload against the schema, pushing completed rows onto
/// `rows`. Returns the number of rows added.
pub(crate) fn append_rows(
    schema: &Schema,
    rows: &mut Vec<Row>,
    payload: Fragment,
    properties: Properties,
) -> Result<usize, TableError> {
    let before = rows.len();
    if schema.last_depth() == 0 {
        // A flat description takes a sequence of independent rows.
        let Fragment::Seq(items) = payload else {
            return Err(TableError::StructuralMismatch {
                column: schema.columns()[0].id.clone(),
                message: format!("expected a sequence of rows, got {}", payload.kind()),
            });
        };
        for item in items {
            let partial = Row::empty(schema.len(), properties.clone());
            bind_fragment(schema, rows, partial, item, 0)?;
        }
    } else {
        let partial = Row::empty(schema.len(), properties);
        bind_fragment(schema, rows, partial, payload, 0)?;
    }
    Ok(rows.len() - before)
}

fn bind_fragment(
    schema: &Schema,
    rows: &mut Vec<Row>,
    mut partial: Row,
    fragment: Fragment,
    index: usize,
) -> Result<(), TableError> {
    let columns = schema.columns();
    if index >= columns.len() {
        return Err(TableError::Schema(
            "row data nested deeper than the table description".to_string(),
        ));
    }
    let column = &columns[index];

    match column.container {
        Container::Scalar => {
            partial.set(index, fragment.into_cell(&column.id)?);
            rows.push(partial);
            Ok(())
        }
        Container::Sequence => {
            let Fragment::Seq(items) = fragment else {
                return Err(TableError::StructuralMismatch {
                    column: column.id.clone(),
                    message: format!("expected a sequence, got {}", fragment.kind()),
                });
            };
            let remaining = columns.len() - index;
            if items.len() > remaining {
                return Err(TableError::Cardinality {
                    given: items.len(),
                    remaining,
                });
            }
            // Trailing columns may be left unset; they render as absent.
            for (offset, item) in items.into_iter().enumerate() {
                let column = &columns[index + offset];
                partial.set(index + offset, item.into_cell(&column.id)?);
            }
            rows.push(partial);
            Ok(())
        }
        Container::Mapping => {
            let Fragment::Map(mut pairs) = fragment else {
                return Err(TableError::StructuralMismatch {
                    column: column.id.clone(),
                    message: format!("expected a mapping, got {}", fragment.kind()),
                });
            };
            if column.depth == schema.last_depth() {
                // Innermost level: fill the remaining columns by key.
                // Keys with no matching column are ignored.
                for position in index..columns.len() {
                    let column = &columns[position];
                    if let Some(found) =
                        pairs.iter().position(|(key, _)| *key == column.id)
                    {
                        let (_, value) = pairs.remove(found);
                        partial.set(position, value.into_cell(&column.id)?);
                    }
                }
                rows.push(partial);
                Ok(())
            } else if pairs.is_empty() {
                // An empty mapping at an outer level commits the row filled
                // only up to this point.
                rows.push(partial);
                Ok(())
            } else {
                // Outer level: one row (or subtree) per key, in insertion
                // order, with the key itself as this column's value.
                for (key, value) in pairs {
                    let mut branch = partial.clone();
                    branch.set(index, Fragment::cell(key).into_cell(&column.id)?);
                    bind_fragment(schema, rows, branch, value, index + 1)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Cell, Datum};

    fn text(s: &str) -> Datum {
        Datum::Text(s.to_string())
    }

    fn seq(items: Vec<Datum>) -> Datum {
        Datum::Seq(items)
    }

    fn map(pairs: Vec<(&str, Datum)>) -> Datum {
        Datum::Map(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn flat_schema() -> Schema {
        Schema::parse(&seq(vec![
            seq(vec![text("a"), text("number")]),
            text("b"),
            seq(vec![text("c"), text("boolean")]),
        ]))
        .unwrap()
    }

    fn bind(schema: &Schema, payload: Fragment) -> Result<Vec<Row>, TableError> {
        let mut rows = Vec::new();
        append_rows(schema, &mut rows, payload, Properties::new())?;
        Ok(rows)
    }

    fn value_of(row: &Row, index: usize) -> Option<&Datum> {
        row.value_at(index)
    }

    #[test]
    fn positional_rows_bind_in_order() {
        let schema = flat_schema();
        let rows = bind(
            &schema,
            Fragment::seq([
                Fragment::seq([Fragment::cell(1), Fragment::cell("x"), Fragment::cell(true)]),
                Fragment::seq([Fragment::cell(2)]),
            ]),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(value_of(&rows[0], 0), Some(&Datum::Int(1)));
        assert_eq!(value_of(&rows[0], 2), Some(&Datum::Bool(true)));
        assert_eq!(value_of(&rows[1], 0), Some(&Datum::Int(2)));
        // Unfilled trailing columns stay absent.
        assert_eq!(value_of(&rows[1], 1), None);
        assert_eq!(value_of(&rows[1], 2), None);
    }

    #[test]
    fn too_many_values_is_a_cardinality_error() {
        let schema = flat_schema();
        let err = bind(
            &schema,
            Fragment::seq([Fragment::seq([
                Fragment::cell(1),
                Fragment::cell(2),
                Fragment::cell(3),
                Fragment::cell(4),
            ])]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::Cardinality {
                given: 4,
                remaining: 3
            }
        );
    }

    #[test]
    fn rows_before_a_failure_are_committed() {
        let schema = flat_schema();
        let mut rows = Vec::new();
        let err = append_rows(
            &schema,
            &mut rows,
            Fragment::seq([
                Fragment::seq([Fragment::cell(1)]),
                Fragment::cell(2),
            ]),
            Properties::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TableError::StructuralMismatch { .. }));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn flat_mapping_fills_columns_by_key() {
        // Mapping columns at depth 0: the whole payload is a list of rows,
        // and each row may itself be a mapping.
        let keyed = Schema::parse(&map(vec![
            ("a", text("number")),
            ("b", text("string")),
        ]))
        .unwrap();
        let rows = bind(
            &keyed,
            Fragment::seq([Fragment::map([
                ("b", Fragment::cell("y")),
                ("a", Fragment::cell(7)),
                ("ignored", Fragment::cell(0)),
            ])]),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(value_of(&rows[0], 0), Some(&Datum::Int(7)));
        assert_eq!(value_of(&rows[0], 1), Some(&text("y")));
    }

    #[test]
    fn nested_mapping_fans_out_one_row_per_key() {
        let schema = Schema::parse(&map(vec![(
            "year",
            map(vec![("sales", text("number")), ("expenses", text("number"))]),
        )]))
        .unwrap();
        let rows = bind(
            &schema,
            Fragment::map([
                (
                    "2019",
                    Fragment::map([
                        ("sales", Fragment::cell(10)),
                        ("expenses", Fragment::cell(8)),
                    ]),
                ),
                (
                    "2020",
                    Fragment::map([("sales", Fragment::cell(12))]),
                ),
            ]),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(value_of(&rows[0], 0), Some(&text("2019")));
        assert_eq!(value_of(&rows[0], 1), Some(&Datum::Int(10)));
        assert_eq!(value_of(&rows[0], 2), Some(&Datum::Int(8)));
        assert_eq!(value_of(&rows[1], 0), Some(&text("2020")));
        assert_eq!(value_of(&rows[1], 2), None);
    }

    #[test]
    fn keys_fan_out_in_insertion_order() {
        let schema = Schema::parse(&map(vec![(
            "key",
            map(vec![("v", text("number"))]),
        )]))
        .unwrap();
        let rows = bind(
            &schema,
            Fragment::map([
                ("zebra", Fragment::map([("v", Fragment::cell(1))])),
                ("apple", Fragment::map([("v", Fragment::cell(2))])),
            ]),
        )
        .unwrap();
        let keys: Vec<&Datum> = rows.iter().filter_map(|r| value_of(r, 0)).collect();
        assert_eq!(keys, vec![&text("zebra"), &text("apple")]);
    }

    #[test]
    fn empty_outer_mapping_commits_a_partial_row() {
        let schema = Schema::parse(&map(vec![(
            "outer",
            map(vec![("inner", map(vec![("v", text("number"))]))]),
        )]))
        .unwrap();
        let rows = bind(
            &schema,
            Fragment::map([("k", Fragment::Map(Vec::new()))]),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(value_of(&rows[0], 0), Some(&text("k")));
        assert_eq!(value_of(&rows[0], 1), None);
        assert_eq!(value_of(&rows[0], 2), None);
    }

    #[test]
    fn scalar_schema_takes_one_value_per_row() {
        let schema = Schema::parse(&text("only")).unwrap();
        let rows = bind(
            &schema,
            Fragment::seq([Fragment::cell("first"), Fragment::cell("second")]),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(value_of(&rows[0], 0), Some(&text("first")));
        assert_eq!(value_of(&rows[1], 0), Some(&text("second")));
    }

    #[test]
    fn formatted_cells_survive_binding() {
        let schema = flat_schema();
        let rows = bind(
            &schema,
            Fragment::seq([Fragment::seq([Fragment::Cell(
                Cell::new(1).formatted("one"),
            )])]),
        )
        .unwrap();
        let cell = rows[0].cell(0).unwrap();
        assert_eq!(cell.formatted.as_deref(), Some("one"));
    }

    #[test]
    fn non_sequence_payload_for_flat_schema_is_rejected() {
        let schema = flat_schema();
        let err = bind(&schema, Fragment::cell(1)).unwrap_err();
        assert!(matches!(err, TableError::StructuralMismatch { .. }));
    }
}
