//! Tabular value-level diff
//!
//! Shape check, then column check, then a row-major cell walk with numeric
//! tolerance. Every difference is counted; only the first few are kept
//! verbatim.

use optgate_core::{Cell, Dataset, NumericSummary};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::profile::GateProfile;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeCheck {
    pub matches: bool,
    /// (rows, columns)
    pub baseline_shape: (usize, usize),
    pub candidate_shape: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCheck {
    /// Same names in the same order
    pub matches: bool,
    pub baseline_columns: Vec<String>,
    pub candidate_columns: Vec<String>,
    pub missing_in_candidate: BTreeSet<String>,
    pub added_in_candidate: BTreeSet<String>,
}

/// Outcome of comparing one pair of cells
#[derive(Debug, Clone, PartialEq)]
pub enum CellComparison {
    Equal,
    /// Numeric cells outside tolerance; `delta` is candidate minus baseline
    AmountMismatch { delta: f64 },
    ValueMismatch,
    ComparisonFailed { reason: String },
}

/// One differing cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    AmountMismatch {
        row: usize,
        column: String,
        baseline: f64,
        candidate: f64,
        delta: f64,
    },
    ValueMismatch {
        row: usize,
        column: String,
        baseline: String,
        candidate: String,
    },
    ComparisonFailed {
        row: usize,
        column: String,
        baseline: String,
        candidate: String,
        reason: String,
    },
}

impl Difference {
    pub fn row(&self) -> usize {
        match self {
            Difference::AmountMismatch { row, .. }
            | Difference::ValueMismatch { row, .. }
            | Difference::ComparisonFailed { row, .. } => *row,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Difference::AmountMismatch { column, .. }
            | Difference::ValueMismatch { column, .. }
            | Difference::ComparisonFailed { column, .. } => column,
        }
    }

    /// One-line description for findings
    pub fn describe(&self) -> String {
        match self {
            Difference::AmountMismatch {
                row,
                column,
                baseline,
                candidate,
                delta,
            } => format!(
                "Row {}, column '{}': amount mismatch {} vs {} (delta {:+})",
                row, column, baseline, candidate, delta
            ),
            Difference::ValueMismatch {
                row,
                column,
                baseline,
                candidate,
            } => format!(
                "Row {}, column '{}': {:?} vs {:?}",
                row, column, baseline, candidate
            ),
            Difference::ComparisonFailed {
                row,
                column,
                reason,
                ..
            } => format!("Row {}, column '{}': comparison failed ({})", row, column, reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDiff {
    pub matches: bool,
    pub identical_rows: usize,
    pub different_rows: usize,
    pub total_differences: usize,
    pub first_differences: Vec<Difference>,
    /// Differences counted but not listed in `first_differences`
    pub omitted_differences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularDiff {
    pub status: Status,
    pub shape: ShapeCheck,
    pub columns: ColumnCheck,
    /// `None` when the cell walk was skipped
    pub values: Option<ValueDiff>,
    pub baseline_summary: NumericSummary,
    pub candidate_summary: NumericSummary,
    pub findings: Vec<String>,
}

impl TabularDiff {
    pub fn is_match(&self) -> bool {
        self.status == Status::Pass
    }
}

/// Compare two cells under an absolute numeric tolerance
pub fn compare_cells(baseline: &Cell, candidate: &Cell, tolerance: f64) -> CellComparison {
    match (baseline, candidate) {
        (Cell::Number(a), Cell::Number(b)) => compare_numbers(*a, *b, tolerance),
        (Cell::Text(a), Cell::Text(b)) => {
            if a == b {
                CellComparison::Equal
            } else {
                CellComparison::ValueMismatch
            }
        }
        (Cell::Null, Cell::Null) => CellComparison::Equal,
        (Cell::Null, _) | (_, Cell::Null) => CellComparison::ValueMismatch,
        (a, b) => CellComparison::ComparisonFailed {
            reason: format!("cannot compare {} with {}", a.kind(), b.kind()),
        },
    }
}

fn compare_numbers(a: f64, b: f64, tolerance: f64) -> CellComparison {
    if a == b || (a.is_nan() && b.is_nan()) {
        return CellComparison::Equal;
    }
    if a.is_nan() || b.is_nan() {
        return CellComparison::ComparisonFailed {
            reason: "NaN is not comparable with a number".to_string(),
        };
    }

    let delta = b - a;
    if !delta.is_finite() {
        return CellComparison::ComparisonFailed {
            reason: format!("non-finite difference between {} and {}", a, b),
        };
    }

    // Decimal inputs each round by at most half an ULP; the slack covers
    // that and is bounded by the tolerance itself.
    let slack = ulp(a.abs().max(b.abs())).min(tolerance);
    if delta.abs() <= tolerance + slack {
        CellComparison::Equal
    } else {
        CellComparison::AmountMismatch { delta }
    }
}

/// Gap between a finite non-negative `x` and the next representable value
fn ulp(x: f64) -> f64 {
    let next = f64::from_bits(x.to_bits() + 1);
    if next.is_finite() {
        next - x
    } else {
        x - f64::from_bits(x.to_bits() - 1)
    }
}

pub fn check_shape(baseline: &Dataset, candidate: &Dataset) -> ShapeCheck {
    ShapeCheck {
        matches: baseline.shape() == candidate.shape(),
        baseline_shape: baseline.shape(),
        candidate_shape: candidate.shape(),
    }
}

pub fn check_columns(baseline: &Dataset, candidate: &Dataset) -> ColumnCheck {
    let baseline_set: HashSet<&String> = baseline.columns().iter().collect();
    let candidate_set: HashSet<&String> = candidate.columns().iter().collect();

    ColumnCheck {
        matches: baseline.columns() == candidate.columns(),
        baseline_columns: baseline.columns().to_vec(),
        candidate_columns: candidate.columns().to_vec(),
        missing_in_candidate: baseline_set
            .difference(&candidate_set)
            .map(|c| c.to_string())
            .collect(),
        added_in_candidate: candidate_set
            .difference(&baseline_set)
            .map(|c| c.to_string())
            .collect(),
    }
}

/// Walk every cell in row-major, column-minor order. Candidate cells are
/// looked up by baseline column name; callers guarantee the shapes match
/// and every baseline column exists in the candidate.
pub fn diff_values(baseline: &Dataset, candidate: &Dataset, profile: &GateProfile) -> ValueDiff {
    let column_map: Vec<(usize, usize)> = baseline
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(bi, name)| candidate.column_index(name).map(|ci| (bi, ci)))
        .collect();

    let mut first_differences = Vec::new();
    let mut total_differences = 0usize;
    let mut different_rows = 0usize;

    for (row_idx, (base_row, cand_row)) in baseline.rows().iter().zip(candidate.rows()).enumerate() {
        let mut row_differs = false;

        for &(bi, ci) in &column_map {
            let (b, c) = (&base_row[bi], &cand_row[ci]);
            let column = || baseline.columns()[bi].clone();

            let difference = match compare_cells(b, c, profile.value_tolerance) {
                CellComparison::Equal => continue,
                CellComparison::AmountMismatch { delta } => Difference::AmountMismatch {
                    row: row_idx,
                    column: column(),
                    baseline: b.as_number().unwrap_or_default(),
                    candidate: c.as_number().unwrap_or_default(),
                    delta,
                },
                CellComparison::ValueMismatch => Difference::ValueMismatch {
                    row: row_idx,
                    column: column(),
                    baseline: b.to_string(),
                    candidate: c.to_string(),
                },
                CellComparison::ComparisonFailed { reason } => Difference::ComparisonFailed {
                    row: row_idx,
                    column: column(),
                    baseline: b.to_string(),
                    candidate: c.to_string(),
                    reason,
                },
            };

            row_differs = true;
            total_differences += 1;
            if first_differences.len() < profile.max_reported_differences {
                first_differences.push(difference);
            }
        }

        if row_differs {
            different_rows += 1;
        }
    }

    ValueDiff {
        matches: total_differences == 0,
        identical_rows: baseline.row_count() - different_rows,
        different_rows,
        total_differences,
        omitted_differences: total_differences - first_differences.len(),
        first_differences,
    }
}

/// Full tabular comparison
pub fn diff_datasets(baseline: &Dataset, candidate: &Dataset, profile: &GateProfile) -> TabularDiff {
    let mut findings = Vec::new();

    let shape = check_shape(baseline, candidate);
    if shape.matches {
        findings.push(format!("Shape: {:?} (identical)", shape.baseline_shape));
    } else {
        findings.push(format!(
            "Shape mismatch: baseline {:?} vs candidate {:?}",
            shape.baseline_shape, shape.candidate_shape
        ));
    }

    let columns = check_columns(baseline, candidate);
    if columns.matches {
        findings.push(format!(
            "Columns: {} columns (identical)",
            columns.baseline_columns.len()
        ));
    } else {
        findings.push("Column mismatch".to_string());
        if !columns.missing_in_candidate.is_empty() {
            findings.push(format!("  Missing in candidate: {:?}", columns.missing_in_candidate));
        }
        if !columns.added_in_candidate.is_empty() {
            findings.push(format!("  Added in candidate: {:?}", columns.added_in_candidate));
        }
        findings.push(format!("  Baseline:  {:?}", columns.baseline_columns));
        findings.push(format!("  Candidate: {:?}", columns.candidate_columns));
    }

    let values = if !shape.matches {
        findings.push("Value diff skipped: shapes differ".to_string());
        None
    } else if !columns.missing_in_candidate.is_empty() {
        findings.push("Value diff skipped: columns cannot be aligned".to_string());
        None
    } else {
        let values = diff_values(baseline, candidate, profile);
        if values.matches {
            findings.push(format!(
                "Values: all identical (within tolerance {:e})",
                profile.value_tolerance
            ));
        } else {
            findings.push(format!(
                "Values: {} differences in {} rows",
                values.total_differences, values.different_rows
            ));
            for difference in &values.first_differences {
                findings.push(format!("  {}", difference.describe()));
            }
            if values.omitted_differences > 0 {
                findings.push(format!("  ... and {} more", values.omitted_differences));
            }
        }
        Some(values)
    };

    let values_match = values.as_ref().map(|v| v.matches).unwrap_or(false);
    let status = if shape.matches && columns.matches && values_match {
        Status::Pass
    } else {
        Status::Fail
    };

    TabularDiff {
        status,
        shape,
        columns,
        values,
        baseline_summary: baseline.numeric_summary(),
        candidate_summary: candidate.numeric_summary(),
        findings,
    }
}
