//! The five output renderers and the shared render plan.
//!
//! Every renderer works from a [`RenderPlan`]: the column subset (in output
//! order) and the row references (already sorted). The plan is computed once
//! per render call from the table and its [`RenderOptions`], so the
//! renderers themselves stay purely about formatting.

use crate::error::TableError;
use crate::schema::Column;
use crate::table::{DataTable, RenderOptions, Row};
use crate::value::Cell;

pub(crate) mod json;
pub(crate) mod markup;
pub(crate) mod response;
pub(crate) mod script;
pub(crate) mod text;

pub use response::{DEFAULT_RESPONSE_HANDLER, PROTOCOL_VERSION};

/// The resolved inputs of one render call.
#[derive(Debug)]
pub(crate) struct RenderPlan<'a> {
    /// Output columns as (schema position, column), in output order.
    pub(crate) columns: Vec<(usize, &'a Column)>,
    /// Output rows, sorted when an ordering was requested.
    pub(crate) rows: Vec<&'a Row>,
}

/// Resolves render options against a table: validates the column subset and
/// applies the row ordering with a stable sort.
pub(crate) fn plan<'a>(
    table: &'a DataTable,
    options: &RenderOptions,
) -> Result<RenderPlan<'a>, TableError> {
    let schema = table.schema();
    let columns = match &options.columns {
        None => schema.columns().iter().enumerate().collect(),
        Some(ids) => {
            let mut columns = Vec::with_capacity(ids.len());
            for id in ids {
                let position = schema
                    .position(id)
                    .ok_or_else(|| TableError::UnknownColumn(id.clone()))?;
                if columns.iter().any(|(existing, _)| *existing == position) {
                    return Err(TableError::Schema(format!(
                        "column '{}' requested more than once",
                        id
                    )));
                }
                columns.push((position, &schema.columns()[position]));
            }
            columns
        }
    };

    let mut rows: Vec<&Row> = table.rows().iter().collect();
    if !options.order_by.is_empty() {
        let comparator = options.order_by.comparator(schema)?;
        rows.sort_by(|a, b| comparator.compare(a, b));
    }

    Ok(RenderPlan { columns, rows })
}

/// A cell slot with nothing to say: never bound, or a bare null.
pub(crate) fn is_absent(cell: Option<&Cell>) -> bool {
    match cell {
        None => true,
        Some(cell) => cell.is_bare_null(),
    }
}
