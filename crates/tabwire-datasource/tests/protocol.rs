//! Request dispatch end to end: tqx string in, rendered body out.

use tabwire::{DataTable, Datum, Fragment, RenderOptions};
use tabwire_datasource::{respond, DataSourceError};

fn sample_table() -> DataTable {
    let description = Datum::Seq(vec![
        Datum::Seq(vec![
            Datum::Text("a".to_string()),
            Datum::Text("number".to_string()),
        ]),
        Datum::Text("b".to_string()),
    ]);
    DataTable::with_data(
        &description,
        Fragment::seq([
            Fragment::seq([Fragment::cell(1), Fragment::cell("x")]),
            Fragment::seq([Fragment::cell(2), Fragment::cell("y")]),
        ]),
    )
    .unwrap()
}

#[test]
fn empty_options_default_to_the_json_envelope() {
    let table = sample_table();
    let body = respond(&table, &RenderOptions::new(), "").unwrap();
    assert!(body.starts_with(
        "google.visualization.Query.setResponse({version:\"0.6\",reqId:\"0\",status:\"ok\",table:{"
    ));
}

#[test]
fn request_id_and_handler_are_echoed() {
    let table = sample_table();
    let body = respond(
        &table,
        &RenderOptions::new(),
        "reqId:42;responseHandler:myApp.handle",
    )
    .unwrap();
    assert!(body.starts_with("myApp.handle({version:\"0.6\",reqId:\"42\""));
}

#[test]
fn csv_via_options_matches_the_direct_renderer() {
    let table = sample_table();
    let options = RenderOptions::new();
    // reqId is irrelevant to non-envelope formats and must be ignored.
    let via_request = respond(&table, &options, "out:csv;reqId:4").unwrap();
    assert_eq!(via_request, table.to_csv(&options).unwrap());
    assert_eq!(via_request, "\"a\",\"b\"\n1,\"x\"\n2,\"y\"");
}

#[test]
fn tsv_excel_uses_tab_separators() {
    let table = sample_table();
    let body = respond(&table, &RenderOptions::new(), "out:tsv-excel").unwrap();
    assert_eq!(body, "\"a\"\t\"b\"\n1\t\"x\"\n2\t\"y\"");
}

#[test]
fn html_is_a_complete_page() {
    let table = sample_table();
    let body = respond(&table, &RenderOptions::new(), "out:html").unwrap();
    assert!(body.starts_with("<html><body><table"));
    assert!(body.ends_with("</table></body></html>"));
}

#[test]
fn unsupported_format_is_rejected() {
    let table = sample_table();
    let err = respond(&table, &RenderOptions::new(), "out:pdf").unwrap_err();
    assert_eq!(err, DataSourceError::UnsupportedFormat("pdf".to_string()));
}

#[test]
fn wrong_protocol_version_is_rejected() {
    let table = sample_table();
    let err = respond(&table, &RenderOptions::new(), "version:0.5").unwrap_err();
    assert_eq!(err, DataSourceError::UnsupportedVersion("0.5".to_string()));
}

#[test]
fn table_errors_pass_through() {
    let table = sample_table();
    let options = RenderOptions::new().columns(["nope"]);
    let err = respond(&table, &options, "out:csv").unwrap_err();
    assert!(matches!(err, DataSourceError::Table(_)));
}
