//! Advisory checks: work metrics, cost, complexity
//!
//! These surface secondary signals. They can raise WARN but never FAIL.

use optgate_core::{reduction_pct, ReportMetadata};
use serde::{Deserialize, Serialize};

use crate::display::{opt_count, thousands};
use crate::profile::GateProfile;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkMetricsResult {
    pub status: Status,
    pub rows_match: bool,
    pub bytes_reduced: bool,
    pub baseline_rows: Option<u64>,
    pub candidate_rows: Option<u64>,
    pub baseline_bytes: Option<u64>,
    pub candidate_bytes: Option<u64>,
    pub bytes_reduction_pct: Option<f64>,
    pub findings: Vec<String>,
}

/// Where the compared credit figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditSource {
    /// Derived from bytes scanned at the profile's rate
    DerivedFromBytes,
    /// Taken from the reports' own estimates
    Recorded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub status: Status,
    pub source: CreditSource,
    pub baseline_credits: Option<f64>,
    pub candidate_credits: Option<f64>,
    pub credits_reduction_pct: Option<f64>,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityChange {
    Simpler,
    MoreComplex,
    Unchanged,
    Unknown,
}

/// Descriptive only; carries no status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexitySummary {
    pub baseline_score: Option<f64>,
    pub candidate_score: Option<f64>,
    pub baseline_joins: Option<u32>,
    pub candidate_joins: Option<u32>,
    pub baseline_ctes: Option<u32>,
    pub candidate_ctes: Option<u32>,
    pub baseline_window_functions: Option<u32>,
    pub candidate_window_functions: Option<u32>,
    pub change: ComplexityChange,
    /// Relative change of the score; positive means simpler
    pub reduction_pct: Option<f64>,
    pub findings: Vec<String>,
}

pub fn check_work_metrics(baseline: &ReportMetadata, candidate: &ReportMetadata) -> WorkMetricsResult {
    let mut findings = Vec::new();
    let mut status = Status::Pass;

    let baseline_rows = baseline.rows_returned();
    let candidate_rows = candidate.rows_returned();
    let rows_match = match (baseline_rows, candidate_rows) {
        (Some(b), Some(c)) if b == c => {
            findings.push(format!("Rows returned match: {}", thousands(b)));
            true
        }
        (Some(b), Some(c)) => {
            findings.push(format!(
                "Rows returned differ: {} vs {}",
                thousands(b),
                thousands(c)
            ));
            status = status.combine(Status::Warn);
            false
        }
        _ => {
            findings.push(format!(
                "Missing data: rows_returned (baseline {}, candidate {})",
                opt_count(baseline_rows),
                opt_count(candidate_rows)
            ));
            status = status.combine(Status::Warn);
            false
        }
    };

    let baseline_bytes = baseline.bytes_scanned();
    let candidate_bytes = candidate.bytes_scanned();
    let mut bytes_reduction_pct = None;
    let bytes_reduced = match (baseline_bytes, candidate_bytes) {
        (Some(b), Some(c)) => {
            bytes_reduction_pct = reduction_pct(b as f64, c as f64).present();
            if c <= b {
                findings.push(format!(
                    "Bytes scanned not increased: {} -> {}",
                    thousands(b),
                    thousands(c)
                ));
                if let Some(pct) = bytes_reduction_pct {
                    findings.push(format!("Reduction: {:.1}%", pct));
                }
                true
            } else {
                findings.push(format!(
                    "Bytes scanned increased: {} -> {}",
                    thousands(b),
                    thousands(c)
                ));
                status = status.combine(Status::Warn);
                false
            }
        }
        _ => {
            findings.push(format!(
                "Missing data: bytes_scanned (baseline {}, candidate {})",
                opt_count(baseline_bytes),
                opt_count(candidate_bytes)
            ));
            status = status.combine(Status::Warn);
            false
        }
    };

    WorkMetricsResult {
        status,
        rows_match,
        bytes_reduced,
        baseline_rows,
        candidate_rows,
        baseline_bytes,
        candidate_bytes,
        bytes_reduction_pct,
        findings,
    }
}

pub fn check_cost(
    baseline: &ReportMetadata,
    candidate: &ReportMetadata,
    profile: &GateProfile,
) -> CostResult {
    let mut findings = Vec::new();

    let (source, baseline_credits, candidate_credits) =
        match (baseline.bytes_scanned(), candidate.bytes_scanned()) {
            (Some(b), Some(c)) => (
                CreditSource::DerivedFromBytes,
                Some(profile.credits_for_bytes(b)),
                Some(profile.credits_for_bytes(c)),
            ),
            _ => match (baseline.credits_estimated(), candidate.credits_estimated()) {
                (Some(b), Some(c)) => (CreditSource::Recorded, Some(b), Some(c)),
                _ => (CreditSource::Unavailable, None, None),
            },
        };

    let (status, credits_reduction_pct) = match (baseline_credits, candidate_credits) {
        (Some(b), Some(c)) => {
            let pct = reduction_pct(b, c).present();
            let status = if c <= b {
                findings.push(format!("Estimated credits not increased: {:.8} -> {:.8}", b, c));
                Status::Pass
            } else {
                findings.push(format!("Estimated credits increased: {:.8} -> {:.8}", b, c));
                Status::Warn
            };
            if let Some(pct) = pct.filter(|p| *p > 0.0) {
                findings.push(format!("Savings: {:.1}%", pct));
            }
            (status, pct)
        }
        _ => {
            findings.push("Missing data: neither bytes_scanned nor credits_estimated on both reports".to_string());
            (Status::Warn, None)
        }
    };

    CostResult {
        status,
        source,
        baseline_credits,
        candidate_credits,
        credits_reduction_pct,
        findings,
    }
}

pub fn summarize_complexity(baseline: &ReportMetadata, candidate: &ReportMetadata) -> ComplexitySummary {
    let b = baseline.complexity.clone().unwrap_or_default();
    let c = candidate.complexity.clone().unwrap_or_default();
    let mut findings = Vec::new();

    let mut reduction = None;
    let change = match (b.complexity_score, c.complexity_score) {
        (Some(bs), Some(cs)) => {
            findings.push(format!(
                "Complexity: {}/10 ({} joins) -> {}/10 ({} joins)",
                bs,
                opt_u32(b.num_joins),
                cs,
                opt_u32(c.num_joins)
            ));
            reduction = reduction_pct(bs, cs).present();
            if cs < bs {
                if let Some(pct) = reduction {
                    findings.push(format!("{:.1}% simpler", pct));
                }
                ComplexityChange::Simpler
            } else if cs > bs {
                if let Some(pct) = reduction {
                    findings.push(format!("{:.1}% more complex", -pct));
                }
                ComplexityChange::MoreComplex
            } else {
                findings.push("No change in complexity".to_string());
                ComplexityChange::Unchanged
            }
        }
        _ => {
            findings.push("Complexity score not available".to_string());
            ComplexityChange::Unknown
        }
    };

    ComplexitySummary {
        baseline_score: b.complexity_score,
        candidate_score: c.complexity_score,
        baseline_joins: b.num_joins,
        candidate_joins: c.num_joins,
        baseline_ctes: b.num_ctes,
        candidate_ctes: c.num_ctes,
        baseline_window_functions: b.num_window_functions,
        candidate_window_functions: c.num_window_functions,
        change,
        reduction_pct: reduction,
        findings,
    }
}

fn opt_u32(n: Option<u32>) -> String {
    n.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}
