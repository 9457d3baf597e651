//! Construction-script renderer.
//!
//! Emits JavaScript statements that rebuild the table in a named client-side
//! variable. Statements come out in a fixed order: declaration, table
//! properties, columns (with their properties), row allocation, then cell
//! and row-property assignments. Absent and bare-null cells produce no
//! `setCell` call at all.

use std::fmt::Write;

use crate::encode::{encode_cell, js_escape};
use crate::error::TableError;
use crate::render::{is_absent, RenderPlan};
use crate::table::DataTable;
use crate::value::Properties;

pub(crate) fn render(
    table: &DataTable,
    name: &str,
    plan: &RenderPlan,
) -> Result<String, TableError> {
    let mut out = String::new();
    let _ = writeln!(out, "var {} = new google.visualization.DataTable();", name);

    if !table.properties().is_empty() {
        let _ = writeln!(
            out,
            "{}.setTableProperties({});",
            name,
            properties_literal(table.properties())
        );
    }

    for (i, (_, column)) in plan.columns.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}.addColumn({}, {}, {});",
            name,
            js_escape(column.column_type.as_str()),
            js_escape(&column.label),
            js_escape(&column.id)
        );
        if !column.properties.is_empty() {
            let _ = writeln!(
                out,
                "{}.setColumnProperties({}, {});",
                name,
                i,
                properties_literal(&column.properties)
            );
        }
    }

    let _ = writeln!(out, "{}.addRows({});", name, plan.rows.len());

    for (i, row) in plan.rows.iter().enumerate() {
        for (j, (position, column)) in plan.columns.iter().enumerate() {
            let cell = row.cell(*position);
            if is_absent(cell) {
                continue;
            }
            let Some(cell) = cell else { continue };
            let encoded = encode_cell(cell, column.column_type, &js_escape)?;
            let _ = write!(out, "{}.setCell({}, {}, {}", name, i, j, encoded.value);
            if !cell.properties.is_empty() {
                // The formatted-value slot has to be filled to reach the
                // properties argument.
                let _ = write!(
                    out,
                    ", {}, {}",
                    encoded.formatted.as_deref().unwrap_or("null"),
                    properties_literal(&cell.properties)
                );
            } else if let Some(formatted) = &encoded.formatted {
                let _ = write!(out, ", {}", formatted);
            }
            out.push_str(");\n");
        }
        if !row.properties().is_empty() {
            let _ = writeln!(
                out,
                "{}.setRowProperties({}, {});",
                name,
                i,
                properties_literal(row.properties())
            );
        }
    }
    Ok(out)
}

/// Renders a property map as a JavaScript object literal with single-quoted
/// keys and values.
fn properties_literal(properties: &Properties) -> String {
    let entries: Vec<String> = properties
        .iter()
        .map(|(key, value)| format!("{}: {}", js_escape(key), js_escape(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
