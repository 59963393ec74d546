//! Optgate Core: report model, tabular datasets, and output hashing
//!
//! Leaf types shared by the validator and the command-line wrapper.

pub mod dataset;
pub mod error;
pub mod hash;
pub mod measured;
pub mod report;

pub use dataset::{Cell, ColumnTotals, Dataset, NumericSummary};
pub use error::{OptgateError, Result};
pub use hash::{output_hash, HashAlgorithm};
pub use measured::{reduction_pct, Measured};
pub use report::{
    ComplexityKpi, CostKpi, ExecutionKpi, OutputKpi, Record, Report, ReportMetadata, WorkKpi,
};

/// Version of the optgate report/verdict format
pub const OPTGATE_VERSION: &str = "1.0.0";
