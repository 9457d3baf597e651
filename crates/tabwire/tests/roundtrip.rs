//! Escaping properties checked against independent decoders.

use proptest::prelude::*;
use tabwire::encode::{csv_escape, json_escape};
use tabwire::{DataTable, Datum, Fragment, RenderOptions};

proptest! {
    #[test]
    fn json_escape_decodes_back_to_the_input(input in "\\PC*") {
        let escaped = json_escape(&input);
        let decoded: String = serde_json::from_str(&escaped).unwrap();
        prop_assert_eq!(decoded, input);
    }

    #[test]
    fn csv_escape_survives_a_csv_parser(input in "\\PC*") {
        let line = format!("{},{}", csv_escape(&input), csv_escape("anchor"));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        prop_assert_eq!(record.get(0).unwrap(), input.as_str());
        prop_assert_eq!(record.get(1).unwrap(), "anchor");
    }
}

#[test]
fn csv_output_parses_with_a_real_reader() {
    let description = Datum::Seq(vec![
        Datum::Text("name".to_string()),
        Datum::Seq(vec![
            Datum::Text("note".to_string()),
            Datum::Text("string".to_string()),
        ]),
    ]);
    let table = DataTable::with_data(
        &description,
        Fragment::seq([
            Fragment::seq([
                Fragment::cell("a,b"),
                Fragment::cell("say \"hi\""),
            ]),
            Fragment::seq([Fragment::cell("plain")]),
        ]),
    )
    .unwrap();
    let rendered = table.to_csv(&RenderOptions::new()).unwrap();

    let mut reader = csv::Reader::from_reader(rendered.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("name"));
    assert_eq!(headers.get(1), Some("note"));
    let rows: Vec<csv::StringRecord> =
        reader.records().map(|record| record.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(0), Some("a,b"));
    assert_eq!(rows[0].get(1), Some("say \"hi\""));
    assert_eq!(rows[1].get(1), Some(""));
}
