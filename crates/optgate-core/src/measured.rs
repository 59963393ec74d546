//! Typed outcome for derived figures
//!
//! Distinguishes a value that was computed, a value that is legitimately
//! absent (missing input, zero baseline), and a computation that failed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Measured<T> {
    /// Value was computed
    Present(T),
    /// No value exists (missing input or undefined ratio)
    Absent,
    /// Inputs were present but could not be combined
    Failed(String),
}

impl<T> Measured<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Measured::Present(_))
    }

    /// Collapse to an `Option`, treating failure like absence
    pub fn present(self) -> Option<T> {
        match self {
            Measured::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Measured<&T> {
        match self {
            Measured::Present(v) => Measured::Present(v),
            Measured::Absent => Measured::Absent,
            Measured::Failed(reason) => Measured::Failed(reason.clone()),
        }
    }
}

impl<T> From<Option<T>> for Measured<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Measured::Present(v),
            None => Measured::Absent,
        }
    }
}

/// Relative reduction from `baseline` to `candidate`, in percent.
///
/// Positive means the candidate is smaller. A baseline of exactly zero has
/// no defined ratio and yields `Absent`; non-finite inputs yield `Failed`.
pub fn reduction_pct(baseline: f64, candidate: f64) -> Measured<f64> {
    if !baseline.is_finite() || !candidate.is_finite() {
        return Measured::Failed(format!(
            "non-finite operands: baseline={}, candidate={}",
            baseline, candidate
        ));
    }
    if baseline == 0.0 {
        return Measured::Absent;
    }
    Measured::Present((baseline - candidate) / baseline * 100.0)
}
