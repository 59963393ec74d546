//! Tabular dataset: ordered columns, ordered rows of scalar cells
//!
//! Rows are stored positionally against the header, so every row carries
//! exactly the header's column set.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::error::{OptgateError, Result};
use crate::hash;
use crate::report::Record;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Type a raw text field: empty is null, a finite float literal is
    /// numeric, anything else is text. `nan`, `inf` and overflowing literals
    /// stay text so summaries remain finite.
    pub fn infer(raw: &str) -> Cell {
        if raw.is_empty() {
            return Cell::Null;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Null,
            Value::Number(n) => match n.as_f64() {
                Some(f) => Cell::Number(f),
                None => Cell::Text(n.to_string()),
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(hash::canonical_json(other)),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short type name used in findings
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Number(_) => "number",
            Cell::Text(_) => "text",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "null"),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Empty dataset with the given header; duplicate names are rejected
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(OptgateError::SchemaError(format!(
                    "duplicate column name: {}",
                    column
                )));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut dataset = Self::new(columns)?;
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    /// Append a row; its width must equal the header's
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(OptgateError::SchemaError(format!(
                "row {} has {} cells, header has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build from output records. Column order follows the first record;
    /// every record must carry exactly the same keys.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let columns: Vec<String> = match records.first() {
            Some(first) => first.keys().cloned().collect(),
            None => Vec::new(),
        };
        Self::from_records_in_order(records, columns)
    }

    /// Build from output records using an explicit column order. Record key
    /// order is not significant; each record's key set must equal `columns`.
    pub fn from_records_in_order(records: &[Record], columns: Vec<String>) -> Result<Self> {
        let mut dataset = Self::new(columns)?;

        for (idx, record) in records.iter().enumerate() {
            if record.len() != dataset.columns.len()
                || dataset.columns.iter().any(|c| !record.contains_key(c))
            {
                return Err(OptgateError::SchemaError(format!(
                    "record {} does not have the header's column set",
                    idx
                )));
            }
            let row = dataset
                .columns
                .iter()
                .map(|c| record.get(c).map(Cell::from_json).unwrap_or(Cell::Null))
                .collect();
            dataset.rows.push(row);
        }

        Ok(dataset)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Per-column totals for columns whose non-null cells are all numeric
    pub fn numeric_summary(&self) -> NumericSummary {
        let mut columns = Vec::new();

        for (idx, name) in self.columns.iter().enumerate() {
            let cells = self.rows.iter().map(|r| &r[idx]);
            if cells.clone().any(|c| matches!(c, Cell::Text(_))) {
                continue;
            }
            let values: Vec<f64> = cells.filter_map(Cell::as_number).collect();
            if values.is_empty() {
                continue;
            }
            columns.push(ColumnTotals {
                column: name.clone(),
                sum: values.iter().sum(),
                non_null: values.len(),
            });
        }

        NumericSummary {
            row_count: self.rows.len(),
            numeric_columns: columns.len(),
            total_sum: columns.iter().map(|c| c.sum).sum(),
            columns,
        }
    }
}

/// Aggregate numeric figures for human review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub row_count: usize,
    pub numeric_columns: usize,
    pub total_sum: f64,
    pub columns: Vec<ColumnTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTotals {
    pub column: String,
    pub sum: f64,
    pub non_null: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_inference() {
        assert_eq!(Cell::infer(""), Cell::Null);
        assert_eq!(Cell::infer("100.01"), Cell::Number(100.01));
        assert_eq!(Cell::infer("42"), Cell::Number(42.0));
        assert_eq!(Cell::infer("P001"), Cell::Text("P001".to_string()));
        assert_eq!(Cell::infer("2024-01"), Cell::Text("2024-01".to_string()));
    }

    #[test]
    fn test_non_finite_literals_stay_text() {
        for raw in ["nan", "NaN", "inf", "-Infinity", "1e400"] {
            assert_eq!(Cell::infer(raw), Cell::Text(raw.to_string()));
        }

        let ds = Dataset::with_rows(
            cols(&["amount"]),
            vec![vec![Cell::infer("1.5")], vec![Cell::infer("nan")]],
        )
        .unwrap();
        let summary = ds.numeric_summary();
        assert_eq!(summary.numeric_columns, 0);
        assert!(summary.total_sum.is_finite());
    }

    #[test]
    fn test_push_row_width_checked() {
        let mut ds = Dataset::new(cols(&["a", "b"])).unwrap();
        assert!(ds.push_row(vec![Cell::Number(1.0), Cell::Null]).is_ok());
        assert!(ds.push_row(vec![Cell::Number(1.0)]).is_err());
        assert_eq!(ds.shape(), (1, 2));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        assert!(Dataset::new(cols(&["a", "a"])).is_err());
    }

    #[test]
    fn test_from_records_keeps_key_order() {
        let records: Vec<Record> = vec![
            json!({"portfolio_id": "P1", "amount": 1.5}),
            json!({"amount": 2.5, "portfolio_id": "P2"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();

        let ds = Dataset::from_records(&records).unwrap();
        assert_eq!(ds.columns(), &cols(&["portfolio_id", "amount"])[..]);
        assert_eq!(ds.cell(1, 1), Some(&Cell::Number(2.5)));
        assert_eq!(ds.cell(1, 0), Some(&Cell::Text("P2".to_string())));
    }

    #[test]
    fn test_from_records_in_order() {
        let records: Vec<Record> = vec![json!({"b": 2, "a": 1})]
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        let ds = Dataset::from_records_in_order(&records, cols(&["a", "b"])).unwrap();
        assert_eq!(ds.rows()[0], vec![Cell::Number(1.0), Cell::Number(2.0)]);
        assert!(Dataset::from_records_in_order(&records, cols(&["a", "c"])).is_err());
    }

    #[test]
    fn test_from_records_rejects_ragged() {
        let records: Vec<Record> = vec![json!({"a": 1}), json!({"a": 1, "b": 2})]
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        assert!(Dataset::from_records(&records).is_err());
    }

    #[test]
    fn test_numeric_summary() {
        let ds = Dataset::with_rows(
            cols(&["id", "amount", "note"]),
            vec![
                vec![Cell::Text("a".into()), Cell::Number(1.5), Cell::Null],
                vec![Cell::Text("b".into()), Cell::Null, Cell::Null],
                vec![Cell::Text("c".into()), Cell::Number(2.5), Cell::Null],
            ],
        )
        .unwrap();

        let summary = ds.numeric_summary();
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.numeric_columns, 1);
        assert_eq!(summary.columns[0].column, "amount");
        assert_eq!(summary.columns[0].non_null, 2);
        assert_eq!(summary.total_sum, 4.0);
    }
}
