//! Performance regression check
//!
//! Gating rule: the candidate must be no slower than the baseline. The
//! improvement band is advisory and only ever raises a warning.

use optgate_core::{reduction_pct, Measured, ReportMetadata};
use serde::{Deserialize, Serialize};

use crate::profile::{BandPosition, GateProfile};
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    /// Gating status: FAIL when the candidate is slower or data is missing
    pub status: Status,
    pub baseline_runtime: Option<f64>,
    pub candidate_runtime: Option<f64>,
    /// Full precision; `None` when undefined (zero or missing baseline)
    pub improvement_pct: Option<f64>,
    pub is_improvement: bool,
    pub within_target: bool,
    pub band: BandPosition,
    /// Advisory status for the band: PASS inside, WARN otherwise
    pub band_status: Status,
    pub target_range: String,
    pub findings: Vec<String>,
}

/// Runtime improvement in percent; undefined for a zero baseline
pub fn improvement_pct(baseline_runtime: f64, candidate_runtime: f64) -> Measured<f64> {
    reduction_pct(baseline_runtime, candidate_runtime)
}

pub fn check_performance(
    baseline: &ReportMetadata,
    candidate: &ReportMetadata,
    profile: &GateProfile,
) -> PerformanceResult {
    let band = &profile.target_band;
    let baseline_runtime = baseline.runtime_seconds();
    let candidate_runtime = candidate.runtime_seconds();
    let mut findings = Vec::new();

    let (b, c) = match (baseline_runtime, candidate_runtime) {
        (Some(b), Some(c)) => (b, c),
        _ => {
            let side = match (baseline_runtime.is_none(), candidate_runtime.is_none()) {
                (true, true) => "both reports",
                (true, false) => "baseline report",
                _ => "candidate report",
            };
            findings.push(format!("Missing data: runtime_seconds absent from {}", side));
            return PerformanceResult {
                status: Status::Fail,
                baseline_runtime,
                candidate_runtime,
                improvement_pct: None,
                is_improvement: false,
                within_target: false,
                band: BandPosition::Undefined,
                band_status: Status::Warn,
                target_range: band.to_string(),
                findings,
            };
        }
    };

    let improvement = match improvement_pct(b, c) {
        Measured::Present(pct) => Some(pct),
        Measured::Absent => None,
        Measured::Failed(reason) => {
            findings.push(format!("Comparison failed: {}", reason));
            None
        }
    };

    let slower = c > b;
    let comparable = b.is_finite() && c.is_finite();
    let status = if slower || !comparable {
        Status::Fail
    } else {
        Status::Pass
    };
    let is_improvement = comparable && c < b;

    if slower {
        findings.push(format!("Slower than baseline: {:.2}s -> {:.2}s", b, c));
        if let Some(pct) = improvement {
            findings.push(format!("Regression: {:.1}%", -pct));
        }
    } else if is_improvement {
        findings.push(format!("Runtime improved: {:.2}s -> {:.2}s", b, c));
        if let Some(pct) = improvement {
            findings.push(format!("Improvement: {:.1}%", pct));
        }
    } else if comparable {
        findings.push(format!("Runtime unchanged: {:.2}s", b));
    }

    let position = band.classify(improvement);
    let band_status = match position {
        BandPosition::Within => {
            findings.push(format!("Within target range ({})", band));
            Status::Pass
        }
        BandPosition::Above => {
            findings.push(format!(
                "Exceeds target range (improvement > {}%)",
                band.max_pct
            ));
            Status::Warn
        }
        BandPosition::Below => {
            findings.push(format!(
                "Below target range (improvement < {}%)",
                band.min_pct
            ));
            Status::Warn
        }
        BandPosition::Undefined => {
            if b == 0.0 {
                findings.push("Improvement undefined: baseline runtime is 0".to_string());
            }
            Status::Warn
        }
    };

    PerformanceResult {
        status,
        baseline_runtime,
        candidate_runtime,
        improvement_pct: improvement,
        is_improvement,
        within_target: position == BandPosition::Within,
        band: position,
        band_status,
        target_range: band.to_string(),
        findings,
    }
}
