//! Structured-interchange renderer.
//!
//! Emits the table as a JavaScript object literal with `cols`, `rows`, and
//! optionally `p` members. Member keys are unquoted; string values are
//! double-quoted JSON literals. Absent cells are elided from the cell list
//! (two adjacent commas), except in the last output column, where an
//! explicit `{v:null}` keeps the row's width unambiguous.

use crate::encode::{encode_cell, json_escape};
use crate::error::TableError;
use crate::render::{is_absent, RenderPlan};
use crate::table::DataTable;
use crate::value::Properties;

pub(crate) fn render(table: &DataTable, plan: &RenderPlan) -> Result<String, TableError> {
    let mut out = String::new();
    out.push_str("{cols:[");
    for (i, (_, column)) in plan.columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("{id:");
        out.push_str(&json_escape(&column.id));
        out.push_str(",label:");
        out.push_str(&json_escape(&column.label));
        out.push_str(",type:");
        out.push_str(&json_escape(column.column_type.as_str()));
        if !column.properties.is_empty() {
            out.push_str(",p:");
            out.push_str(&properties_literal(&column.properties));
        }
        out.push('}');
    }
    out.push_str("],rows:[");

    for (i, row) in plan.rows.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("{c:[");
        for (j, (position, column)) in plan.columns.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            let cell = row.cell(*position);
            if is_absent(cell) {
                // Elide, unless this is the last column.
                if j + 1 == plan.columns.len() {
                    out.push_str("{v:null}");
                }
                continue;
            }
            let Some(cell) = cell else { continue };
            let encoded = encode_cell(cell, column.column_type, &json_escape)?;
            out.push_str("{v:");
            out.push_str(&encoded.value);
            if let Some(formatted) = &encoded.formatted {
                out.push_str(",f:");
                out.push_str(formatted);
            }
            if !cell.properties.is_empty() {
                out.push_str(",p:");
                out.push_str(&properties_literal(&cell.properties));
            }
            out.push('}');
        }
        out.push(']');
        if !row.properties().is_empty() {
            out.push_str(",p:");
            out.push_str(&properties_literal(row.properties()));
        }
        out.push('}');
    }
    out.push(']');

    if !table.properties().is_empty() {
        out.push_str(",p:");
        out.push_str(&properties_literal(table.properties()));
    }
    out.push('}');
    Ok(out)
}

/// Renders a property map as a JSON object literal with quoted keys.
pub(super) fn properties_literal(properties: &Properties) -> String {
    let entries: Vec<String> = properties
        .iter()
        .map(|(key, value)| format!("{}:{}", json_escape(key), json_escape(value)))
        .collect();
    format!("{{{}}}", entries.join(","))
}
