//! Optgate Validator: Equivalence & Regression Gate
//!
//! Decides whether an optimized pipeline run (the candidate) produced the
//! same output as the reference run (the baseline) without being slower.
//!
//! ```text
//! baseline, candidate
//!        │
//!        ├─ equivalence   (hash + row count [+ retained data])  gating
//!        ├─ performance   (no slower; improvement band advisory) gating
//!        ├─ work metrics  (rows returned, bytes scanned)        advisory
//!        ├─ cost          (credits from bytes scanned)          advisory
//!        └─ complexity    (descriptive)
//!                 ↓
//!              Verdict  ── exit code 0 / 1
//! ```
//!
//! # Example
//!
//! ```
//! use optgate_core::{Report, ReportMetadata};
//! use optgate_validator::{validate, Status};
//!
//! let hash = "ab".repeat(32);
//! let baseline = Report::new(ReportMetadata::new().with_runtime(30.0).with_output(53_000, hash.clone()));
//! let candidate = Report::new(ReportMetadata::new().with_runtime(27.5).with_output(53_000, hash));
//!
//! let verdict = validate(&baseline, &candidate);
//! assert_eq!(verdict.overall_status, Status::Pass);
//! assert_eq!(verdict.exit_code(), 0);
//! ```

pub mod advisory;
mod display;
pub mod equivalence;
pub mod gate;
pub mod performance;
pub mod profile;
pub mod status;
pub mod tabular;
pub mod verdict;

pub use advisory::{ComplexityChange, ComplexitySummary, CostResult, CreditSource, WorkMetricsResult};
pub use equivalence::EquivalenceResult;
pub use gate::Validator;
pub use performance::{improvement_pct, PerformanceResult};
pub use profile::{BandPosition, GateProfile, TargetBand};
pub use status::Status;
pub use tabular::{CellComparison, Difference, TabularDiff, ValueDiff};
pub use verdict::{CriterionEntry, SuccessCriteria, Verdict};

use optgate_core::{Dataset, Report};

/// Validate with the default strict profile
pub fn validate(baseline: &Report, candidate: &Report) -> Verdict {
    Validator::default().validate(baseline, candidate)
}

/// Tabular diff with the default strict profile
pub fn compare_datasets(baseline: &Dataset, candidate: &Dataset) -> TabularDiff {
    Validator::default().compare_datasets(baseline, candidate)
}

/// Check if a candidate would pass the gate
pub fn would_pass(baseline: &Report, candidate: &Report) -> bool {
    validate(baseline, candidate).is_pass()
}
