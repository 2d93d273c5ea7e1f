// src/table.rs

use serde::Serialize;
use serde_json::{Map, Value};

/// Column holding the player's salary for the season.
pub const SALARY: &str = "Salary";
/// Column holding the season the salary applies to.
pub const YEAR: &str = "Year";

/// One player's season record: column name → cell value, in source column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SalaryRow(Map<String, Value>);

impl SalaryRow {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Replace a cell. An existing column keeps its position.
    pub fn set(&mut self, column: &str, value: Value) {
        self.0.insert(column.to_string(), value);
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Numeric salary, present only once the row has been cleaned.
    pub fn salary(&self) -> Option<f64> {
        self.get(SALARY).and_then(Value::as_f64)
    }

    /// Season year, from an integer cell or a string holding one.
    pub fn year(&self) -> Option<i64> {
        match self.get(YEAR)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for SalaryRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Rows of the salary table in document order, plus the header they were read with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<SalaryRow>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<SalaryRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SalaryRow] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<SalaryRow>) {
        (self.columns, self.rows)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
