//! The table itself: a normalized schema plus bound rows.
//!
//! A [`DataTable`] is constructed from a table description, filled through
//! [`DataTable::append`], and rendered through the `to_*` methods. The table
//! owns its data; rendering never mutates it, so one table can be rendered
//! into several formats with different options.

use crate::bind;
use crate::error::TableError;
use crate::render;
use crate::schema::{Column, Schema};
use crate::sort::OrderBy;
use crate::value::{Cell, Datum, Fragment, Properties};

/// One bound row: a cell slot per column, plus row-level properties.
///
/// A slot is `None` when the payload never supplied a value for the column;
/// renderers treat an absent slot the same as a bare null cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    cells: Vec<Option<Cell>>,
    properties: Properties,
}

impl Row {
    pub(crate) fn empty(width: usize, properties: Properties) -> Self {
        Row {
            cells: vec![None; width],
            properties,
        }
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = Some(cell);
    }

    /// The cell at a column position, if one was bound.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// The raw value at a column position, if a cell was bound there.
    pub fn value_at(&self, index: usize) -> Option<&Datum> {
        self.cell(index).map(|cell| &cell.value)
    }

    /// Row-level custom properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Options shared by every renderer: an optional column subset and an
/// ordering.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) order_by: OrderBy,
}

impl RenderOptions {
    /// Render all columns in schema order, rows in insertion order.
    pub fn new() -> Self {
        RenderOptions::default()
    }

    /// Restricts output to the named columns, in the given order. Each id
    /// must exist and may appear only once.
    pub fn columns<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sorts output rows by the given ordering. The sort is stable, so rows
    /// that compare equal keep their insertion order.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = order;
        self
    }
}

/// A two-dimensional table of typed values with per-column metadata.
#[derive(Clone, Debug)]
pub struct DataTable {
    schema: Schema,
    rows: Vec<Row>,
    properties: Properties,
}

impl DataTable {
    /// Creates an empty table from a table description.
    pub fn new(description: &Datum) -> Result<DataTable, TableError> {
        Ok(DataTable {
            schema: Schema::parse(description)?,
            rows: Vec::new(),
            properties: Properties::new(),
        })
    }

    /// Creates a table and appends an initial payload in one step.
    pub fn with_data(
        description: &Datum,
        payload: impl Into<Fragment>,
    ) -> Result<DataTable, TableError> {
        let mut table = DataTable::new(description)?;
        table.append(payload)?;
        Ok(table)
    }

    /// Appends a payload, returning the number of rows added.
    ///
    /// Binding is row-scoped: when the payload fails partway, rows bound
    /// before the failure stay in the table.
    pub fn append(&mut self, payload: impl Into<Fragment>) -> Result<usize, TableError> {
        self.append_with_properties(payload, Properties::new())
    }

    /// Appends a payload, attaching the given properties to every new row.
    pub fn append_with_properties(
        &mut self,
        payload: impl Into<Fragment>,
        properties: Properties,
    ) -> Result<usize, TableError> {
        let added = bind::append_rows(&self.schema, &mut self.rows, payload.into(), properties)?;
        log::debug!("appended {} rows ({} total)", added, self.rows.len());
        Ok(added)
    }

    /// Number of bound rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the schema.
    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    /// The bound rows, in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The normalized columns, in description order.
    pub fn columns(&self) -> &[Column] {
        self.schema.columns()
    }

    /// The normalized schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Replaces the table-level custom properties.
    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }

    /// Table-level custom properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Renders the table as a structured-interchange object literal with
    /// `cols`, `rows`, and optionally `p` members.
    pub fn to_json(&self, options: &RenderOptions) -> Result<String, TableError> {
        let plan = render::plan(self, options)?;
        render::json::render(self, &plan)
    }

    /// Renders a construction script that rebuilds the table in a client-side
    /// variable with the given name.
    pub fn to_js_code(
        &self,
        name: &str,
        options: &RenderOptions,
    ) -> Result<String, TableError> {
        let plan = render::plan(self, options)?;
        render::script::render(self, name, &plan)
    }

    /// Renders comma-separated text with a header row of column labels.
    pub fn to_csv(&self, options: &RenderOptions) -> Result<String, TableError> {
        self.to_delimited(options, ",")
    }

    /// Renders delimited text with an arbitrary field separator.
    pub fn to_delimited(
        &self,
        options: &RenderOptions,
        separator: &str,
    ) -> Result<String, TableError> {
        let plan = render::plan(self, options)?;
        render::text::render(&plan, separator)
    }

    /// Renders a complete HTML page holding the table as markup.
    pub fn to_html(&self, options: &RenderOptions) -> Result<String, TableError> {
        let plan = render::plan(self, options)?;
        render::markup::render(&plan)
    }

    /// Renders a protocol response envelope wrapping the structured table.
    ///
    /// `handler` defaults to [`crate::DEFAULT_RESPONSE_HANDLER`] when
    /// `None`.
    pub fn to_json_response(
        &self,
        options: &RenderOptions,
        request_id: &str,
        handler: Option<&str>,
    ) -> Result<String, TableError> {
        let plan = render::plan(self, options)?;
        render::response::render(self, &plan, request_id, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Datum {
        Datum::Text(s.to_string())
    }

    fn schema_abc() -> Datum {
        Datum::Seq(vec![
            Datum::Seq(vec![text("a"), text("number")]),
            text("b"),
        ])
    }

    #[test]
    fn append_returns_rows_added() {
        let mut table = DataTable::new(&schema_abc()).unwrap();
        let added = table
            .append(Fragment::seq([
                Fragment::seq([Fragment::cell(1), Fragment::cell("x")]),
                Fragment::seq([Fragment::cell(2)]),
            ]))
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn partial_append_keeps_committed_rows() {
        let mut table = DataTable::new(&schema_abc()).unwrap();
        let err = table
            .append(Fragment::seq([
                Fragment::seq([Fragment::cell(1)]),
                Fragment::cell(2),
            ]))
            .unwrap_err();
        assert!(matches!(err, TableError::StructuralMismatch { .. }));
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn with_data_builds_and_fills() {
        let table = DataTable::with_data(
            &schema_abc(),
            Fragment::seq([Fragment::seq([Fragment::cell(1), Fragment::cell("x")])]),
        )
        .unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.rows()[0].value_at(1), Some(&text("x")));
    }

    #[test]
    fn row_properties_attach_to_every_appended_row() {
        let mut table = DataTable::new(&schema_abc()).unwrap();
        let props: Properties = [("style", "bold")].into_iter().collect();
        table
            .append_with_properties(
                Fragment::seq([
                    Fragment::seq([Fragment::cell(1)]),
                    Fragment::seq([Fragment::cell(2)]),
                ]),
                props,
            )
            .unwrap();
        assert!(table
            .rows()
            .iter()
            .all(|row| row.properties().get("style") == Some("bold")));
    }

    #[test]
    fn table_properties_round_trip() {
        let mut table = DataTable::new(&schema_abc()).unwrap();
        table.set_properties([("source", "unit-test")].into_iter().collect());
        assert_eq!(table.properties().get("source"), Some("unit-test"));
    }
}
