//! HTML markup renderer.
//!
//! Emits a complete page holding the table as a bordered `<table>`: one
//! header row of column labels, one body row per data row. Formatted text,
//! when present, wins over the raw value; everything is entity-escaped.

use crate::encode::{encode_cell, html_escape};
use crate::error::TableError;
use crate::render::{is_absent, RenderPlan};

pub(crate) fn render(plan: &RenderPlan) -> Result<String, TableError> {
    let mut out = String::from(
        "<html><body><table border=\"1\" cellpadding=\"2\" cellspacing=\"0\">",
    );

    out.push_str("<thead><tr>");
    for (_, column) in &plan.columns {
        out.push_str("<th>");
        out.push_str(&html_escape(&column.label));
        out.push_str("</th>");
    }
    out.push_str("</tr></thead>");

    out.push_str("<tbody>");
    for row in &plan.rows {
        out.push_str("<tr>");
        for (position, column) in &plan.columns {
            out.push_str("<td>");
            let cell = row.cell(*position);
            if !is_absent(cell) {
                if let Some(cell) = cell {
                    let encoded = encode_cell(cell, column.column_type, &html_escape)?;
                    match encoded.formatted {
                        Some(formatted) => out.push_str(&formatted),
                        None if cell.value.is_null() => {}
                        None => out.push_str(&encoded.value),
                    }
                }
            }
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");

    out.push_str("</table></body></html>");
    Ok(out)
}
