//! Report: execution metadata plus optional output records
//!
//! Mirrors the JSON written by the report producer. KPI sections live under
//! `metadata` and every field is optional on the wire; keys this model does
//! not know are kept verbatim so a load/save cycle is lossless.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OptgateError, Result};
use crate::hash::{self, HashAlgorithm};
use crate::measured::Measured;

/// One output row, keyed by column name
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,

    /// Full output dataset, when the producer retained it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,

    #[serde(rename = "kpi_1_execution", default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionKpi>,

    #[serde(rename = "kpi_2_work_metrics", default, skip_serializing_if = "Option::is_none")]
    pub work: Option<WorkKpi>,

    #[serde(rename = "kpi_3_output_validation", default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputKpi>,

    #[serde(rename = "kpi_4_complexity", default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityKpi>,

    #[serde(rename = "kpi_5_cost_estimation", default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostKpi>,

    /// Metadata keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI 1: wall-clock execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionKpi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_seconds: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI 2: work performed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkKpi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_returned: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_scanned: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI 3: output fingerprint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputKpi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<HashAlgorithm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI 4: structural complexity (advisory)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityKpi {
    /// 0 to 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_joins: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_ctes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_window_functions: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI 5: cost estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostKpi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_estimated: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_scanned: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipeline(mut self, name: impl Into<String>) -> Self {
        self.pipeline = Some(name.into());
        self
    }

    pub fn with_runtime(mut self, runtime_seconds: f64) -> Self {
        self.execution.get_or_insert_with(Default::default).runtime_seconds = Some(runtime_seconds);
        self
    }

    pub fn with_output(mut self, row_count: u64, output_hash: impl Into<String>) -> Self {
        let output = self.output.get_or_insert_with(Default::default);
        output.row_count = Some(row_count);
        output.output_hash = Some(output_hash.into());
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.output.get_or_insert_with(Default::default).hash_algorithm = Some(algorithm);
        self
    }

    pub fn with_work(mut self, rows_returned: u64, bytes_scanned: Option<u64>) -> Self {
        let work = self.work.get_or_insert_with(Default::default);
        work.rows_returned = Some(rows_returned);
        work.bytes_scanned = bytes_scanned;
        self
    }

    pub fn with_credits(mut self, credits: f64) -> Self {
        self.cost.get_or_insert_with(Default::default).credits_estimated = Some(credits);
        self
    }

    pub fn with_complexity(mut self, score: f64, num_joins: u32) -> Self {
        let complexity = self.complexity.get_or_insert_with(Default::default);
        complexity.complexity_score = Some(score);
        complexity.num_joins = Some(num_joins);
        self
    }

    // === Flattened accessors ===

    pub fn runtime_seconds(&self) -> Option<f64> {
        self.execution.as_ref().and_then(|e| e.runtime_seconds)
    }

    pub fn row_count(&self) -> Option<u64> {
        self.output.as_ref().and_then(|o| o.row_count)
    }

    pub fn rows_returned(&self) -> Option<u64> {
        self.work.as_ref().and_then(|w| w.rows_returned)
    }

    /// Bytes scanned, preferring the work section over the cost section
    pub fn bytes_scanned(&self) -> Option<u64> {
        self.work
            .as_ref()
            .and_then(|w| w.bytes_scanned)
            .or_else(|| self.cost.as_ref().and_then(|c| c.bytes_scanned))
    }

    /// Recorded output hash; an empty string counts as absent
    pub fn output_hash(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|o| o.output_hash.as_deref())
            .filter(|h| !h.is_empty())
    }

    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        self.output.as_ref().and_then(|o| o.hash_algorithm)
    }

    pub fn complexity_score(&self) -> Option<f64> {
        self.complexity.as_ref().and_then(|c| c.complexity_score)
    }

    pub fn num_joins(&self) -> Option<u32> {
        self.complexity.as_ref().and_then(|c| c.num_joins)
    }

    pub fn credits_estimated(&self) -> Option<f64> {
        self.cost.as_ref().and_then(|c| c.credits_estimated)
    }

    /// Check value ranges the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(runtime) = self.runtime_seconds() {
            if !runtime.is_finite() || runtime < 0.0 {
                return Err(OptgateError::SchemaError(format!(
                    "runtime_seconds must be a finite value >= 0, got {}",
                    runtime
                )));
            }
        }

        if let Some(score) = self.complexity_score() {
            if !(0.0..=10.0).contains(&score) {
                return Err(OptgateError::SchemaError(format!(
                    "complexity_score must be within 0-10, got {}",
                    score
                )));
            }
        }

        if let Some(credits) = self.credits_estimated() {
            if !credits.is_finite() || credits < 0.0 {
                return Err(OptgateError::SchemaError(format!(
                    "credits_estimated must be a finite value >= 0, got {}",
                    credits
                )));
            }
        }

        if let Some(h) = self.output_hash() {
            if !hash::is_hex_digest(h) {
                return Err(OptgateError::HashError(format!(
                    "output_hash must be a {}-character hex digest, got {:?}",
                    hash::DIGEST_HEX_LEN,
                    h
                )));
            }
        }

        Ok(())
    }
}

impl Report {
    pub fn new(metadata: ReportMetadata) -> Self {
        Self { metadata, data: None }
    }

    /// Build a report the way the producer does: row counts and the output
    /// hash are derived from the records themselves.
    pub fn from_output(records: Vec<Record>, runtime_seconds: f64, algorithm: HashAlgorithm) -> Self {
        let rows = records.len() as u64;
        let metadata = ReportMetadata::new()
            .with_runtime(runtime_seconds)
            .with_work(rows, None)
            .with_output(rows, hash::output_hash(&records, algorithm))
            .with_hash_algorithm(algorithm);

        Self {
            metadata,
            data: Some(records),
        }
    }

    /// Parse and validate a report
    pub fn from_json_str(json: &str) -> Result<Self> {
        let report: Report = serde_json::from_str(json)?;
        report.validate()?;
        Ok(report)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.metadata.validate()?;

        if let (Some(data), Some(rows)) = (&self.data, self.metadata.row_count()) {
            if data.len() as u64 != rows {
                return Err(OptgateError::SchemaError(format!(
                    "row_count is {} but {} records are retained",
                    rows,
                    data.len()
                )));
            }
        }

        Ok(())
    }

    /// Hash of the retained records, using the recorded algorithm
    pub fn recompute_output_hash(&self) -> Measured<String> {
        match &self.data {
            Some(data) => {
                let algorithm = self.metadata.hash_algorithm().unwrap_or_default();
                Measured::Present(hash::output_hash(data, algorithm))
            }
            None => Measured::Absent,
        }
    }

    /// Whether the recorded hash matches the retained records
    pub fn verify_output_hash(&self) -> Measured<bool> {
        let recorded = match self.metadata.output_hash() {
            Some(h) => h,
            None => return Measured::Absent,
        };
        match self.recompute_output_hash() {
            Measured::Present(computed) => {
                Measured::Present(computed.eq_ignore_ascii_case(recorded))
            }
            Measured::Absent => Measured::Absent,
            Measured::Failed(reason) => Measured::Failed(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "metadata": {
            "timestamp": "2025-01-14T10:00:00",
            "pipeline": "dbt sample project",
            "target_table": "FACT_CASHFLOW_SUMMARY",
            "kpi_1_execution": { "runtime_seconds": 30.0, "description": "End-to-end query execution time" },
            "kpi_2_work_metrics": { "rows_returned": 53000, "bytes_scanned": 1048576 },
            "kpi_3_output_validation": {
                "row_count": 53000,
                "output_hash": "bdf3589bf1273b1ff3622c8ff4dcc7797cd25d17cec9bea7334c05d7dd157354",
                "hash_algorithm": "SHA256"
            },
            "kpi_4_complexity": { "complexity_score": 6.5, "num_joins": 4 },
            "kpi_5_cost_estimation": { "credits_estimated": 0.12, "warehouse_size": "M" },
            "status": "BASELINE"
        }
    }"#;

    #[test]
    fn test_parse_nested_sections() {
        let report = Report::from_json_str(SAMPLE).unwrap();
        let meta = &report.metadata;
        assert_eq!(meta.runtime_seconds(), Some(30.0));
        assert_eq!(meta.row_count(), Some(53000));
        assert_eq!(meta.rows_returned(), Some(53000));
        assert_eq!(meta.bytes_scanned(), Some(1048576));
        assert_eq!(meta.hash_algorithm(), Some(HashAlgorithm::Sha256));
        assert_eq!(meta.num_joins(), Some(4));
        assert_eq!(meta.credits_estimated(), Some(0.12));
        assert_eq!(meta.extra.get("status"), Some(&json!("BASELINE")));
        assert!(report.data.is_none());
    }

    #[test]
    fn test_round_trip_is_identical() {
        let report = Report::from_json_str(SAMPLE).unwrap();
        let saved = report.to_json_pretty().unwrap();
        let reloaded = Report::from_json_str(&saved).unwrap();
        assert_eq!(report, reloaded);
        assert_eq!(
            reloaded.metadata.cost.as_ref().unwrap().extra.get("warehouse_size"),
            Some(&json!("M"))
        );
    }

    #[test]
    fn test_round_trip_keeps_float_precision() {
        let meta = ReportMetadata::new().with_runtime(0.1 + 0.2);
        let report = Report::new(meta);
        let reloaded = Report::from_json_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded.metadata.runtime_seconds(), Some(0.1 + 0.2));
    }

    #[test]
    fn test_missing_sections_are_none() {
        let report = Report::from_json_str(r#"{"metadata": {}}"#).unwrap();
        assert_eq!(report.metadata.runtime_seconds(), None);
        assert_eq!(report.metadata.output_hash(), None);
        assert_eq!(report.metadata.bytes_scanned(), None);
    }

    #[test]
    fn test_empty_hash_is_absent() {
        let meta = ReportMetadata::new().with_output(10, "");
        assert_eq!(meta.output_hash(), None);
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let json = r#"{"metadata": {"kpi_3_output_validation": {"row_count": 1, "output_hash": "abc123"}}}"#;
        let err = Report::from_json_str(json).unwrap_err();
        assert!(matches!(err, OptgateError::HashError(_)));
        assert!(err.to_string().starts_with("HASH/"));
    }

    #[test]
    fn test_negative_runtime_rejected() {
        let json = r#"{"metadata": {"kpi_1_execution": {"runtime_seconds": -1.0}}}"#;
        assert!(matches!(
            Report::from_json_str(json),
            Err(OptgateError::SchemaError(_))
        ));
    }

    #[test]
    fn test_negative_row_count_rejected() {
        let json = r#"{"metadata": {"kpi_3_output_validation": {"row_count": -5}}}"#;
        assert!(matches!(
            Report::from_json_str(json),
            Err(OptgateError::ParseError(_))
        ));
    }

    #[test]
    fn test_complexity_out_of_range_rejected() {
        let meta = ReportMetadata::new().with_complexity(11.0, 2);
        assert!(meta.validate().is_err());
    }

    #[test]
    fn test_bytes_fall_back_to_cost_section() {
        let mut meta = ReportMetadata::new();
        meta.cost = Some(CostKpi {
            bytes_scanned: Some(42),
            ..Default::default()
        });
        assert_eq!(meta.bytes_scanned(), Some(42));
    }

    #[test]
    fn test_from_output_and_verify() {
        let records = vec![
            json!({"portfolio_id": "P1", "amount": 100.0}),
            json!({"portfolio_id": "P2", "amount": 250.5}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect::<Vec<_>>();

        let mut report = Report::from_output(records, 12.5, HashAlgorithm::Sha256);
        assert_eq!(report.metadata.row_count(), Some(2));
        assert!(report.validate().is_ok());
        assert_eq!(report.verify_output_hash(), Measured::Present(true));

        report.data.as_mut().unwrap()[0].insert("amount".into(), json!(100.01));
        assert_eq!(report.verify_output_hash(), Measured::Present(false));

        report.data = None;
        assert_eq!(report.verify_output_hash(), Measured::Absent);
    }

    #[test]
    fn test_retained_rows_must_match_row_count() {
        let records = vec![json!({"id": 1}).as_object().cloned().unwrap()];
        let mut report = Report::from_output(records, 1.0, HashAlgorithm::Blake3);
        report.metadata.output.as_mut().unwrap().row_count = Some(2);
        assert!(report.validate().is_err());
    }
}
