//! Typed tabular data with multi-format rendering.
//!
//! `tabwire` builds two-dimensional tables of typed values from loosely
//! structured descriptions and payloads, then renders them as a structured
//! object literal, a client-side construction script, delimited text, HTML
//! markup, or a protocol-response envelope.
//!
//! # Quick start
//!
//! ```
//! use tabwire::{DataTable, Datum, Fragment, RenderOptions};
//!
//! let description = Datum::Seq(vec![
//!     Datum::Seq(vec!["name".into(), "string".into(), "Name".into()]),
//!     Datum::Seq(vec!["salary".into(), "number".into()]),
//! ]);
//! let mut table = DataTable::new(&description)?;
//! table.append(Fragment::seq([
//!     Fragment::seq([Fragment::cell("Mike"), Fragment::cell(10000)]),
//!     Fragment::seq([Fragment::cell("Jim"), Fragment::cell(800)]),
//! ]))?;
//!
//! let json = table.to_json(&RenderOptions::new())?;
//! assert!(json.starts_with("{cols:["));
//! # Ok::<(), tabwire::TableError>(())
//! ```
//!
//! # Pipeline
//!
//! 1. [`Schema::parse`] normalizes a table description into a flat,
//!    depth-annotated column list.
//! 2. [`DataTable::append`] binds payloads recursively against the columns.
//! 3. The `to_*` renderers encode cells against their column types and
//!    format the output, optionally restricted to a column subset and
//!    sorted by an [`OrderBy`].
//!
//! Type validation is lazy: an ill-typed value is accepted at append time
//! and only rejected when a renderer tries to encode it.

mod bind;
pub mod encode;
pub mod error;
mod render;
pub mod schema;
pub mod sort;
pub mod table;
pub mod value;

pub use error::TableError;
pub use render::{DEFAULT_RESPONSE_HANDLER, PROTOCOL_VERSION};
pub use schema::{Column, ColumnType, Container, Schema};
pub use sort::{OrderBy, SortKey, SortOrder};
pub use table::{DataTable, RenderOptions, Row};
pub use value::{Cell, Datum, Fragment, Properties};
