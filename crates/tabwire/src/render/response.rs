//! Protocol-response renderer.
//!
//! Wraps the structured table in a call to a client-side response handler:
//!
//! ```text
//! handler({version:"0.6",reqId:"0",status:"ok",table:{...}});
//! ```
//!
//! The request id echoes the caller's; the handler name defaults to
//! [`DEFAULT_RESPONSE_HANDLER`].

use crate::encode::json_escape;
use crate::error::TableError;
use crate::render::{json, RenderPlan};
use crate::table::DataTable;

/// The wire-protocol version this crate speaks.
pub const PROTOCOL_VERSION: &str = "0.6";

/// The handler invoked when a request names none.
pub const DEFAULT_RESPONSE_HANDLER: &str = "google.visualization.Query.setResponse";

pub(crate) fn render(
    table: &DataTable,
    plan: &RenderPlan,
    request_id: &str,
    handler: Option<&str>,
) -> Result<String, TableError> {
    let handler = handler.unwrap_or(DEFAULT_RESPONSE_HANDLER);
    let table_literal = json::render(table, plan)?;
    Ok(format!(
        "{}({{version:{},reqId:{},status:{},table:{}}});",
        handler,
        json_escape(PROTOCOL_VERSION),
        json_escape(request_id),
        json_escape("ok"),
        table_literal
    ))
}
