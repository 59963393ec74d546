//! File loading and persistence
//!
//! The validator never touches the filesystem; everything it consumes or
//! produces passes through here.

use chrono::{DateTime, Utc};
use optgate_core::{Cell, Dataset, OptgateError, Report, Result};
use optgate_validator::{GateProfile, TabularDiff, Verdict};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted result of a report comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub validated_at: DateTime<Utc>,
    pub optgate_version: String,
    pub baseline_path: String,
    pub candidate_path: String,
    pub profile: String,
    pub verdict: Verdict,
}

/// Persisted result of a CSV comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub compared_at: DateTime<Utc>,
    pub optgate_version: String,
    pub baseline_path: String,
    pub candidate_path: String,
    pub profile: String,
    pub diff: TabularDiff,
}

pub fn load_report(path: &Path) -> Result<Report> {
    let text = read(path)?;
    Report::from_json_str(&text).map_err(|e| with_path(path, e))
}

pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    write(path, &report.to_json_pretty()?)
}

pub fn load_profile(path: &Path) -> Result<GateProfile> {
    let text = read(path)?;
    GateProfile::from_yaml(&text).map_err(|e| with_path(path, e))
}

/// Read a CSV file with a header row; every field is typed with `Cell::infer`
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| OptgateError::IoError(format!("{}: {}", path.display(), e)))?;

    let columns = reader
        .headers()
        .map_err(|e| OptgateError::ParseError(format!("{}: {}", path.display(), e)))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut dataset = Dataset::new(columns).map_err(|e| with_path(path, e))?;

    for record in reader.records() {
        let record =
            record.map_err(|e| OptgateError::ParseError(format!("{}: {}", path.display(), e)))?;
        dataset
            .push_row(record.iter().map(Cell::infer).collect())
            .map_err(|e| with_path(path, e))?;
    }

    Ok(dataset)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    write(path, &serde_json::to_string_pretty(value)?)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|e| OptgateError::ParseError(format!("{}: {}", path.display(), e)))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| OptgateError::IoError(format!("{}: {}", path.display(), e)))
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| OptgateError::IoError(format!("{}: {}", parent.display(), e)))?;
    }
    fs::write(path, contents).map_err(|e| OptgateError::IoError(format!("{}: {}", path.display(), e)))
}

fn with_path(path: &Path, err: OptgateError) -> OptgateError {
    let located = |msg: String| format!("{}: {}", path.display(), msg);
    match err {
        OptgateError::ParseError(m) => OptgateError::ParseError(located(m)),
        OptgateError::SchemaError(m) => OptgateError::SchemaError(located(m)),
        OptgateError::ConfigError(m) => OptgateError::ConfigError(located(m)),
        OptgateError::IoError(m) => OptgateError::IoError(located(m)),
        OptgateError::HashError(m) => OptgateError::HashError(located(m)),
    }
}
