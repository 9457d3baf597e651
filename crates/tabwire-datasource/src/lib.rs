//! Request-options protocol wrapper around [`tabwire`] tables.
//!
//! A data-source endpoint receives a `tqx` options string alongside its
//! query, builds a [`DataTable`], and answers in whichever format the
//! request asked for. This crate parses the options string and dispatches
//! to the matching renderer:
//!
//! ```
//! use tabwire::{DataTable, Datum, Fragment, RenderOptions};
//! use tabwire_datasource::respond;
//!
//! let table = DataTable::with_data(
//!     &Datum::Text("name".to_string()),
//!     Fragment::seq([Fragment::cell("Mike")]),
//! )?;
//! let body = respond(&table, &RenderOptions::new(), "out:csv")?;
//! assert_eq!(body, "\"name\"\n\"Mike\"");
//! # Ok::<(), tabwire_datasource::DataSourceError>(())
//! ```

use thiserror::Error;

use tabwire::{DataTable, RenderOptions, TableError};

mod request;

pub use request::{OutputFormat, RequestOptions};

/// Errors answering a data-source request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataSourceError {
    /// The `out` option names a format this endpoint cannot produce.
    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),

    /// The request speaks a protocol version other than ours.
    #[error("unsupported protocol version '{0}'")]
    UnsupportedVersion(String),

    /// An options pair is not `key:value`.
    #[error("malformed request option '{0}'")]
    MalformedOptions(String),

    /// Building or rendering the table failed.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Answers a request: parses the `tqx` options string and renders the table
/// in the requested format.
///
/// The JSON format produces the full response envelope, echoing the
/// request's id and handler; the other formats produce a bare document.
pub fn respond(
    table: &DataTable,
    options: &RenderOptions,
    tqx: &str,
) -> Result<String, DataSourceError> {
    let request = RequestOptions::parse(tqx)?;
    log::debug!(
        "answering request {} as {}",
        request.request_id,
        request.format.as_str()
    );
    let body = match request.format {
        OutputFormat::Json => table.to_json_response(
            options,
            &request.request_id,
            request.response_handler.as_deref(),
        )?,
        OutputFormat::Html => table.to_html(options)?,
        OutputFormat::Csv => table.to_csv(options)?,
        OutputFormat::TsvExcel => table.to_delimited(options, "\t")?,
    };
    Ok(body)
}
