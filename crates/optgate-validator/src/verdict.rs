//! Verdict: per-criterion results and the overall decision
//!
//! Equivalence and performance gate the overall status. Work metrics and
//! cost are advisory and can only contribute warnings.

use serde::{Deserialize, Serialize};

use crate::advisory::{ComplexitySummary, CostResult, WorkMetricsResult};
use crate::equivalence::EquivalenceResult;
use crate::performance::PerformanceResult;
use crate::status::Status;
use crate::tabular::TabularDiff;

/// The booleans consumers most often key off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessCriteria {
    pub output_hash_matches_baseline: bool,
    pub row_count_matches_baseline: bool,
    pub runtime_improved: bool,
    pub improvement_in_target_range: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// PASS iff equivalence and performance both PASS
    pub overall_status: Status,

    /// One-line summary
    pub summary: String,

    /// Profile used for evaluation
    pub profile: String,

    pub equivalence: EquivalenceResult,
    pub performance: PerformanceResult,
    pub work_metrics: WorkMetricsResult,
    pub cost_metrics: CostResult,
    pub complexity: ComplexitySummary,

    /// Value-level diff over retained data, when both reports kept it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabular: Option<TabularDiff>,

    pub success_criteria: SuccessCriteria,
}

/// Borrowed view of one criterion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionEntry<'a> {
    pub name: &'static str,
    pub status: Status,
    pub gating: bool,
    pub findings: &'a [String],
}

impl Verdict {
    pub(crate) fn assemble(
        profile: String,
        equivalence: EquivalenceResult,
        performance: PerformanceResult,
        work_metrics: WorkMetricsResult,
        cost_metrics: CostResult,
        complexity: ComplexitySummary,
        tabular: Option<TabularDiff>,
    ) -> Self {
        let overall_status = if equivalence.status.is_pass() && performance.status.is_pass() {
            Status::Pass
        } else {
            Status::Fail
        };

        let success_criteria = SuccessCriteria {
            output_hash_matches_baseline: equivalence.hash_match,
            row_count_matches_baseline: equivalence.rows_match,
            runtime_improved: performance.is_improvement,
            improvement_in_target_range: performance.within_target,
        };

        let mut verdict = Verdict {
            overall_status,
            summary: String::new(),
            profile,
            equivalence,
            performance,
            work_metrics,
            cost_metrics,
            complexity,
            tabular,
            success_criteria,
        };
        verdict.summary = verdict.summarize();
        verdict
    }

    pub fn is_pass(&self) -> bool {
        self.overall_status.is_pass()
    }

    /// Process exit code for command-line wrappers
    pub fn exit_code(&self) -> i32 {
        if self.is_pass() {
            0
        } else {
            1
        }
    }

    /// Criteria in evaluation order
    pub fn criteria(&self) -> Vec<CriterionEntry<'_>> {
        vec![
            CriterionEntry {
                name: "output_equivalence",
                status: self.equivalence.status,
                gating: true,
                findings: &self.equivalence.findings,
            },
            CriterionEntry {
                name: "performance_improvement",
                status: self.performance.status,
                gating: true,
                findings: &self.performance.findings,
            },
            CriterionEntry {
                name: "work_metrics",
                status: self.work_metrics.status,
                gating: false,
                findings: &self.work_metrics.findings,
            },
            CriterionEntry {
                name: "cost_metrics",
                status: self.cost_metrics.status,
                gating: false,
                findings: &self.cost_metrics.findings,
            },
        ]
    }

    fn summarize(&self) -> String {
        let criteria = self.criteria();
        let names = |status: Status| -> Vec<&'static str> {
            criteria
                .iter()
                .filter(|c| c.status == status)
                .map(|c| c.name)
                .collect()
        };

        let fails = names(Status::Fail);
        let warns = names(Status::Warn);

        if !fails.is_empty() {
            format!("Failed: {}", fails.join(", "))
        } else if !warns.is_empty() {
            format!("Passed with warnings: {}", warns.join(", "))
        } else {
            "All checks passed".to_string()
        }
    }
}
