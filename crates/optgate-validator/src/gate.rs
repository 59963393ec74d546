//! The validator
//!
//! Pure comparison of a baseline and a candidate report under a profile.
//! Performs no I/O and keeps no state between calls.

use optgate_core::{Dataset, Report};
use tracing::{debug, info, warn};

use crate::advisory::{check_cost, check_work_metrics, summarize_complexity};
use crate::equivalence::{check_equivalence, EquivalenceResult};
use crate::performance::check_performance;
use crate::profile::GateProfile;
use crate::status::Status;
use crate::tabular::{diff_datasets, TabularDiff};
use crate::verdict::Verdict;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    profile: GateProfile,
}

impl Validator {
    pub fn new(profile: GateProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &GateProfile {
        &self.profile
    }

    /// Compare two reports and produce a verdict
    pub fn validate(&self, baseline: &Report, candidate: &Report) -> Verdict {
        let (b, c) = (&baseline.metadata, &candidate.metadata);

        let mut equivalence = check_equivalence(b, c, &self.profile);
        let tabular = self.diff_retained(baseline, candidate, &mut equivalence);
        debug!(
            status = %equivalence.status,
            hash_match = equivalence.hash_match,
            rows_match = equivalence.rows_match,
            "equivalence checked"
        );

        let performance = check_performance(b, c, &self.profile);
        debug!(
            status = %performance.status,
            improvement_pct = ?performance.improvement_pct,
            band = ?performance.band,
            "performance checked"
        );

        let work_metrics = check_work_metrics(b, c);
        let cost_metrics = check_cost(b, c, &self.profile);
        debug!(
            work = %work_metrics.status,
            cost = %cost_metrics.status,
            "advisory checks done"
        );

        let complexity = summarize_complexity(b, c);

        let verdict = Verdict::assemble(
            self.profile.name.clone(),
            equivalence,
            performance,
            work_metrics,
            cost_metrics,
            complexity,
            tabular,
        );

        if verdict.is_pass() {
            info!(profile = %verdict.profile, summary = %verdict.summary, "validation passed");
        } else {
            warn!(profile = %verdict.profile, summary = %verdict.summary, "validation failed");
        }

        verdict
    }

    /// Value-level comparison of two raw datasets
    pub fn compare_datasets(&self, baseline: &Dataset, candidate: &Dataset) -> TabularDiff {
        let diff = diff_datasets(baseline, candidate, &self.profile);
        debug!(
            status = %diff.status,
            shape_match = diff.shape.matches,
            columns_match = diff.columns.matches,
            "tabular diff done"
        );
        diff
    }

    /// Run the tabular diff over retained records and fold it into the
    /// equivalence criterion
    fn diff_retained(
        &self,
        baseline: &Report,
        candidate: &Report,
        equivalence: &mut EquivalenceResult,
    ) -> Option<TabularDiff> {
        let (b, c) = match (&baseline.data, &candidate.data) {
            (Some(b), Some(c)) => (b, c),
            _ => return None,
        };

        // Record key order carries no meaning; align the candidate to the
        // baseline's columns whenever the key sets agree.
        let datasets = Dataset::from_records(b).and_then(|bd| {
            let cd = Dataset::from_records_in_order(c, bd.columns().to_vec())
                .or_else(|_| Dataset::from_records(c))?;
            Ok((bd, cd))
        });
        let (bd, cd) = match datasets {
            Ok(pair) => pair,
            Err(e) => {
                equivalence
                    .findings
                    .push(format!("Comparison failed: retained data is not tabular ({})", e));
                equivalence.status = Status::Fail;
                return None;
            }
        };

        let diff = self.compare_datasets(&bd, &cd);
        if diff.is_match() {
            equivalence
                .findings
                .push("Retained data identical within tolerance".to_string());
        } else {
            equivalence
                .findings
                .push("Retained data differs (see tabular diff)".to_string());
            equivalence.status = Status::Fail;
        }
        Some(diff)
    }
}
