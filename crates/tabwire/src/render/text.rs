//! Delimited-text renderer.
//!
//! Emits one header line of column labels followed by one line per row,
//! fields joined by the caller's separator. Text fields are double-quoted
//! with embedded quotes doubled; numbers and booleans stay bare so
//! spreadsheet imports keep their type. Formatted text, when present, wins
//! over the raw value. There is no trailing newline.

use crate::encode::{csv_escape, encode_value};
use crate::error::TableError;
use crate::render::RenderPlan;

pub(crate) fn render(plan: &RenderPlan, separator: &str) -> Result<String, TableError> {
    let mut lines = Vec::with_capacity(plan.rows.len() + 1);

    let header: Vec<String> = plan
        .columns
        .iter()
        .map(|(_, column)| csv_escape(&column.label))
        .collect();
    lines.push(header.join(separator));

    for row in &plan.rows {
        let mut fields = Vec::with_capacity(plan.columns.len());
        for (position, column) in &plan.columns {
            let present = row.cell(*position).filter(|cell| !cell.is_bare_null());
            let Some(cell) = present else {
                fields.push("\"\"".to_string());
                continue;
            };
            if let Some(formatted) = &cell.formatted {
                fields.push(csv_escape(formatted));
                continue;
            }
            if cell.value.is_null() {
                fields.push("\"\"".to_string());
                continue;
            }
            let encoded = encode_value(&cell.value, column.column_type, &csv_escape)?;
            // Date-family atoms contain commas, so they get quoted whole;
            // strings were already escaped by the encoder.
            if column.column_type.is_date_family() {
                fields.push(csv_escape(&encoded));
            } else {
                fields.push(encoded);
            }
        }
        lines.push(fields.join(separator));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::plan;
    use crate::table::{DataTable, RenderOptions};
    use crate::value::{Cell, Datum, Fragment};

    fn text(s: &str) -> Datum {
        Datum::Text(s.to_string())
    }

    fn render_table(table: &DataTable, separator: &str) -> String {
        let plan = plan(table, &RenderOptions::new()).unwrap();
        render(&plan, separator).unwrap()
    }

    #[test]
    fn header_and_rows_with_absent_fields() {
        let table = DataTable::with_data(
            &Datum::Seq(vec![
                Datum::Seq(vec![text("a"), text("number"), text("A")]),
                text("b"),
            ]),
            Fragment::seq([
                Fragment::seq([Fragment::cell(1), Fragment::cell("x")]),
                Fragment::seq([Fragment::cell(2)]),
            ]),
        )
        .unwrap();
        assert_eq!(
            render_table(&table, ","),
            "\"A\",\"b\"\n1,\"x\"\n2,\"\""
        );
    }

    #[test]
    fn formatted_text_wins_over_the_raw_value() {
        let mut table =
            DataTable::new(&Datum::Seq(vec![Datum::Seq(vec![text("a"), text("number")])]))
                .unwrap();
        table
            .append(Fragment::seq([Fragment::seq([Fragment::Cell(
                Cell::new(1000).formatted("1,000"),
            )])]))
            .unwrap();
        assert_eq!(render_table(&table, ","), "\"a\"\n\"1,000\"");
    }

    #[test]
    fn date_family_fields_are_quoted() {
        let time = chrono::NaiveTime::from_hms_opt(1, 2, 3).unwrap();
        let table = DataTable::with_data(
            &Datum::Seq(vec![Datum::Seq(vec![text("t"), text("timeofday")])]),
            Fragment::seq([Fragment::seq([Fragment::cell(time)])]),
        )
        .unwrap();
        assert_eq!(render_table(&table, ","), "\"t\"\n\"[1,2,3]\"");
    }

    #[test]
    fn tab_separator_produces_tsv() {
        let table = DataTable::with_data(
            &Datum::Seq(vec![text("a"), text("b")]),
            Fragment::seq([Fragment::seq([
                Fragment::cell("x"),
                Fragment::cell("y"),
            ])]),
        )
        .unwrap();
        assert_eq!(render_table(&table, "\t"), "\"a\"\t\"b\"\n\"x\"\t\"y\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let table = DataTable::with_data(
            &text("a"),
            Fragment::seq([Fragment::cell("say \"hi\"")]),
        )
        .unwrap();
        assert_eq!(render_table(&table, ","), "\"a\"\n\"say \"\"hi\"\"\"");
    }
}
