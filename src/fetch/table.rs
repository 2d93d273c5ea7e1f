// src/fetch/table.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::error::{PipelineError, PipelineResult};
use crate::table::{SalaryRow, Table};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("CSS selector for tables should be valid"));

/// How the cells of one column are typed in the extracted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Integer,
    Float,
    Text,
}

/// Extract the first `<table>` of an HTML document.
///
/// The first `<thead>` row becomes the header. Without a `<thead>`, a leading
/// row made only of `<th>` cells is used; failing that the columns are
/// numbered `"0"`, `"1"`, ... Only rows and cells belonging to this table are
/// read, so nested tables don't leak in. Short rows are padded with `null`,
/// surplus cells are dropped.
pub fn parse_first_table(html: &str) -> PipelineResult<Table> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| PipelineError::Parse("no <table> element in document".to_string()))?;

    let mut header: Option<Vec<String>> = None;
    let mut body: Vec<Vec<String>> = Vec::new();

    let rows = own_rows(table);
    let has_head = rows.iter().any(|(_, in_head)| *in_head);

    for (tr, in_head) in rows {
        let cells = own_cells(tr);
        if cells.is_empty() {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(cell_text).collect();
        if in_head {
            // extra head rows are skipped
            if header.is_none() {
                trace!(?texts, "thead row");
                header = Some(texts);
            }
            continue;
        }
        let is_header = !has_head
            && header.is_none()
            && body.is_empty()
            && cells.iter().all(|c| c.value().name() == "th");
        if is_header {
            trace!(?texts, "header row");
            header = Some(texts);
        } else {
            body.push(texts);
        }
    }

    let columns = match header {
        Some(names) => unique_column_names(names),
        None => {
            let width = body.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };
    debug!(columns = columns.len(), rows = body.len(), "parsed html table");

    Ok(build_table(columns, body))
}

/// `<tr>` children of `table` and of its row groups, flagged when inside `<thead>`.
fn own_rows(table: ElementRef<'_>) -> Vec<(ElementRef<'_>, bool)> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push((child, false)),
            group @ ("thead" | "tbody" | "tfoot") => {
                let in_head = group == "thead";
                rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|e| e.value().name() == "tr")
                        .map(move |tr| (tr, in_head)),
                );
            }
            _ => {}
        }
    }
    rows
}

/// Direct `<th>`/`<td>` children of a row.
fn own_cells(tr: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "th" | "td"))
        .collect()
}

/// Visible text of a cell with runs of whitespace collapsed.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Blank names become `Unnamed: <i>`; repeats get a `.1`, `.2` suffix.
fn unique_column_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn build_table(columns: Vec<String>, body: Vec<Vec<String>>) -> Table {
    let kinds: Vec<CellKind> = (0..columns.len())
        .map(|i| infer_kind(body.iter().filter_map(|r| r.get(i)).map(String::as_str)))
        .collect();

    let rows = body
        .into_iter()
        .map(|cells| {
            let mut fields = Map::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let value = cells
                    .get(i)
                    .map(|raw| typed_value(raw, kinds[i]))
                    .unwrap_or(Value::Null);
                fields.insert(name.clone(), value);
            }
            SalaryRow::new(fields)
        })
        .collect();

    Table::new(columns, rows)
}

/// Narrowest kind every non-empty cell fits. `,` is read as a thousands separator.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let mut kind = CellKind::Integer;
    for raw in cells.filter(|s| !s.is_empty()) {
        let s = raw.replace(',', "");
        if kind == CellKind::Integer && s.parse::<i64>().is_ok() {
            continue;
        }
        if s.parse::<f64>().map_or(false, f64::is_finite) {
            kind = CellKind::Float;
            continue;
        }
        return CellKind::Text;
    }
    kind
}

fn typed_value(raw: &str, kind: CellKind) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let numeric = raw.replace(',', "");
    match kind {
        CellKind::Integer => numeric.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        CellKind::Float => numeric.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
        CellKind::Text => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"
        <html><body>
        <h1>Salaries</h1>
        <table id="salaries">
          <thead>
            <tr><th>Player</th><th>Salary</th><th>Year</th><th>Level</th></tr>
          </thead>
          <tbody>
            <tr><td>Doe,  John</td><td>$1,000,000</td><td>2016</td><td>MLB</td></tr>
            <tr><td>Roe, Jane</td><td>no salary data</td><td>2016</td><td>MLB</td></tr>
            <tr><td>Poe, Edgar</td><td>$550,000</td><td>2015</td></tr>
          </tbody>
        </table>
        <table><tr><th>Other</th></tr><tr><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_first_table_only() {
        let table = parse_first_table(PAGE).unwrap();
        assert_eq!(table.columns(), &["Player", "Salary", "Year", "Level"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_cells_are_typed_per_column() {
        let table = parse_first_table(PAGE).unwrap();
        let first = &table.rows()[0];
        assert_eq!(first.get("Player"), Some(&json!("Doe, John")));
        assert_eq!(first.get("Salary"), Some(&json!("$1,000,000")));
        assert_eq!(first.get("Year"), Some(&json!(2016)));
        // short row padded
        assert_eq!(table.rows()[2].get("Level"), Some(&Value::Null));
    }

    #[test]
    fn test_no_table_is_parse_error() {
        let err = parse_first_table("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_headerless_table_numbers_columns() {
        let html = "<table><tr><td>a</td><td>1</td></tr><tr><td>b</td><td>2.5</td></tr></table>";
        let table = parse_first_table(html).unwrap();
        assert_eq!(table.columns(), &["0", "1"]);
        assert_eq!(table.rows()[0].get("0"), Some(&json!("a")));
        assert_eq!(table.rows()[1].get("1"), Some(&json!(2.5)));
        assert_eq!(table.rows()[0].get("1"), Some(&json!(1.0)));
    }

    #[test]
    fn test_nested_table_stays_inside_its_cell() {
        let html = r#"<table>
            <tr><th>Player</th><th>Salary</th><th>Year</th></tr>
            <tr><td>Doe, John<table><tr><td>inner</td><td>x</td><td>y</td><td>z</td></tr></table></td>
                <td>$5</td><td>2016</td></tr>
            <tr><td>Roe, Jane</td><td>$6</td><td>2016</td></tr>
        </table>"#;
        let table = parse_first_table(html).unwrap();
        assert_eq!(table.columns(), &["Player", "Salary", "Year"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("Salary"), Some(&json!("$5")));
        assert_eq!(table.rows()[0].get("Year"), Some(&json!(2016)));
        assert_eq!(table.rows()[1].get("Player"), Some(&json!("Roe, Jane")));
    }

    #[test]
    fn test_thead_with_td_cells_is_header() {
        let html = r#"<table>
            <thead><tr><td>Player</td><td>Salary</td><td>Year</td></tr></thead>
            <tbody><tr><td>Doe, John</td><td>$5</td><td>2016</td></tr></tbody>
        </table>"#;
        let table = parse_first_table(html).unwrap();
        assert_eq!(table.columns(), &["Player", "Salary", "Year"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("Salary"), Some(&json!("$5")));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let names = vec!["Year".to_string(), String::new(), "Year".to_string()];
        assert_eq!(
            unique_column_names(names),
            vec!["Year", "Unnamed: 1", "Year.1"]
        );
    }

    #[test]
    fn test_thousands_separator_in_numeric_column() {
        let html = "<table><tr><th>Salary</th></tr><tr><td>1,500</td></tr><tr><td></td></tr></table>";
        let table = parse_first_table(html).unwrap();
        assert_eq!(table.rows()[0].get("Salary"), Some(&json!(1500)));
        assert_eq!(table.rows()[1].get("Salary"), Some(&Value::Null));
    }
}
