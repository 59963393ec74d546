//! Hash and row-count equivalence
//!
//! Decides whether the candidate produced exactly the baseline's data by
//! comparing the producer's content fingerprint and cardinality.

use optgate_core::{HashAlgorithm, ReportMetadata};
use serde::{Deserialize, Serialize};

use crate::display::{abbreviate, opt_count, thousands};
use crate::profile::GateProfile;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceResult {
    pub status: Status,
    pub hash_match: bool,
    pub rows_match: bool,

    /// Full recorded hashes
    pub baseline_hash: Option<String>,
    pub candidate_hash: Option<String>,

    pub baseline_rows: Option<u64>,
    pub candidate_rows: Option<u64>,

    pub baseline_algorithm: Option<HashAlgorithm>,
    pub candidate_algorithm: Option<HashAlgorithm>,

    /// Required fields that were absent, as `<side>.<field>`
    #[serde(default)]
    pub missing: Vec<String>,

    pub findings: Vec<String>,
}

pub fn check_equivalence(
    baseline: &ReportMetadata,
    candidate: &ReportMetadata,
    profile: &GateProfile,
) -> EquivalenceResult {
    let mut findings = Vec::new();
    let mut missing = Vec::new();

    let baseline_hash = baseline.output_hash();
    let candidate_hash = candidate.output_hash();
    let baseline_rows = baseline.row_count();
    let candidate_rows = candidate.row_count();
    let baseline_algorithm = baseline.hash_algorithm();
    let candidate_algorithm = candidate.hash_algorithm();

    // === Hash ===
    if baseline_hash.is_none() {
        missing.push("baseline.output_hash".to_string());
    }
    if candidate_hash.is_none() {
        missing.push("candidate.output_hash".to_string());
    }

    let hash_match = match (baseline_hash, candidate_hash) {
        (Some(b), Some(c)) => {
            let algorithms_differ = matches!(
                (baseline_algorithm, candidate_algorithm),
                (Some(ba), Some(ca)) if ba != ca
            );
            let prefix = profile.hash_prefix_len;

            if algorithms_differ {
                findings.push(format!(
                    "Hash algorithms differ: baseline {} vs candidate {} (digests are not comparable)",
                    baseline_algorithm.unwrap_or_default(),
                    candidate_algorithm.unwrap_or_default()
                ));
                false
            } else if b.eq_ignore_ascii_case(c) {
                findings.push(format!("Output hash matches: {}", abbreviate(b, prefix)));
                true
            } else {
                findings.push("Output hash MISMATCH".to_string());
                findings.push(format!("  Baseline:  {}", abbreviate(b, prefix)));
                findings.push(format!("  Candidate: {}", abbreviate(c, prefix)));
                false
            }
        }
        _ => {
            findings.push(format!(
                "Missing data: output_hash absent from {}",
                sides_missing(baseline_hash.is_none(), candidate_hash.is_none())
            ));
            false
        }
    };

    // === Row count ===
    if baseline_rows.is_none() {
        missing.push("baseline.row_count".to_string());
    }
    if candidate_rows.is_none() {
        missing.push("candidate.row_count".to_string());
    }

    let rows_match = match (baseline_rows, candidate_rows) {
        (Some(b), Some(c)) if b == c => {
            findings.push(format!("Row count matches: {} rows", thousands(b)));
            true
        }
        (Some(b), Some(c)) => {
            findings.push("Row count MISMATCH".to_string());
            findings.push(format!("  Baseline:  {}", thousands(b)));
            findings.push(format!("  Candidate: {}", thousands(c)));
            false
        }
        _ => {
            findings.push(format!(
                "Missing data: row_count absent from {} (baseline {}, candidate {})",
                sides_missing(baseline_rows.is_none(), candidate_rows.is_none()),
                opt_count(baseline_rows),
                opt_count(candidate_rows)
            ));
            false
        }
    };

    let status = if hash_match && rows_match {
        Status::Pass
    } else {
        Status::Fail
    };

    EquivalenceResult {
        status,
        hash_match,
        rows_match,
        baseline_hash: baseline_hash.map(str::to_string),
        candidate_hash: candidate_hash.map(str::to_string),
        baseline_rows,
        candidate_rows,
        baseline_algorithm,
        candidate_algorithm,
        missing,
        findings,
    }
}

fn sides_missing(baseline: bool, candidate: bool) -> &'static str {
    match (baseline, candidate) {
        (true, true) => "both reports",
        (true, false) => "baseline report",
        _ => "candidate report",
    }
}
