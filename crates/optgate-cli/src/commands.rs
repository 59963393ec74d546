//! Subcommand implementations
//!
//! Each returns the process exit code: 0 on PASS, 1 on FAIL. Errors are
//! left to the caller, which reports them with a distinct code.

use anyhow::{Context, Result};
use chrono::Utc;
use optgate_core::{Measured, OPTGATE_VERSION};
use optgate_validator::{GateProfile, Validator};
use std::path::Path;
use tracing::info;

use crate::io::{self, DiffRecord, ValidationRecord};
use crate::render;

pub fn load_profile(path: Option<&Path>) -> Result<GateProfile> {
    match path {
        Some(p) => io::load_profile(p).context("loading gate profile"),
        None => Ok(GateProfile::strict()),
    }
}

pub fn compare(
    baseline: &Path,
    candidate: &Path,
    profile: Option<&Path>,
    output: Option<&Path>,
) -> Result<i32> {
    let profile = load_profile(profile)?;
    let baseline_report = io::load_report(baseline).context("loading baseline report")?;
    let candidate_report = io::load_report(candidate).context("loading candidate report")?;

    let verdict = Validator::new(profile).validate(&baseline_report, &candidate_report);
    print!("{}", render::render_verdict(&verdict));

    let code = verdict.exit_code();
    if let Some(path) = output {
        let record = ValidationRecord {
            validated_at: Utc::now(),
            optgate_version: OPTGATE_VERSION.to_string(),
            baseline_path: baseline.display().to_string(),
            candidate_path: candidate.display().to_string(),
            profile: verdict.profile.clone(),
            verdict,
        };
        io::write_json(path, &record).context("writing validation record")?;
        info!(path = %path.display(), "validation record saved");
    }

    Ok(code)
}

pub fn diff(
    baseline: &Path,
    candidate: &Path,
    profile: Option<&Path>,
    output: Option<&Path>,
) -> Result<i32> {
    let profile = load_profile(profile)?;
    let baseline_data = io::load_csv(baseline).context("loading baseline CSV")?;
    let candidate_data = io::load_csv(candidate).context("loading candidate CSV")?;

    let validator = Validator::new(profile);
    let diff = validator.compare_datasets(&baseline_data, &candidate_data);
    print!("{}", render::render_tabular(&diff));

    let code = if diff.is_match() { 0 } else { 1 };
    if let Some(path) = output {
        let record = DiffRecord {
            compared_at: Utc::now(),
            optgate_version: OPTGATE_VERSION.to_string(),
            baseline_path: baseline.display().to_string(),
            candidate_path: candidate.display().to_string(),
            profile: validator.profile().name.clone(),
            diff,
        };
        io::write_json(path, &record).context("writing diff record")?;
        info!(path = %path.display(), "diff record saved");
    }

    Ok(code)
}

pub fn verify_hash(report: &Path) -> Result<i32> {
    let loaded = io::load_report(report).context("loading report")?;
    let recorded = loaded.metadata.output_hash().unwrap_or("<missing>").to_string();

    match (loaded.verify_output_hash(), loaded.recompute_output_hash()) {
        (Measured::Present(true), _) => {
            println!("PASS: output hash verified ({})", recorded);
            Ok(0)
        }
        (Measured::Present(false), Measured::Present(computed)) => {
            println!("FAIL: output hash mismatch");
            println!("  Recorded: {}", recorded);
            println!("  Computed: {}", computed);
            Ok(1)
        }
        (Measured::Failed(reason), _) => {
            println!("FAIL: could not verify output hash: {}", reason);
            Ok(1)
        }
        _ => {
            println!("FAIL: report has no retained data or no recorded hash to verify");
            Ok(1)
        }
    }
}
