//! Plain-text rendering of verdicts for the terminal

use optgate_validator::{TabularDiff, Verdict};
use std::fmt::Write;

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

pub fn render_verdict(verdict: &Verdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "VALIDATION: Output Equivalence & Performance ({})", verdict.profile);
    let _ = writeln!(out, "{}", RULE);

    for (idx, criterion) in verdict.criteria().iter().enumerate() {
        let _ = writeln!(
            out,
            "\n{}. {}{}",
            idx + 1,
            criterion.name,
            if criterion.gating { "" } else { " (advisory)" }
        );
        let _ = writeln!(out, "{}", THIN_RULE);
        for finding in criterion.findings {
            let _ = writeln!(out, "{}", finding);
        }
        let _ = writeln!(out, "Status: {}", criterion.status);
    }

    if let Some(tabular) = &verdict.tabular {
        let _ = writeln!(out, "\nRetained data diff");
        let _ = writeln!(out, "{}", THIN_RULE);
        for finding in &tabular.findings {
            let _ = writeln!(out, "{}", finding);
        }
    }

    let _ = writeln!(out, "\nComplexity (descriptive)");
    let _ = writeln!(out, "{}", THIN_RULE);
    for finding in &verdict.complexity.findings {
        let _ = writeln!(out, "{}", finding);
    }

    let criteria = &verdict.success_criteria;
    let _ = writeln!(out, "\n{}", RULE);
    let _ = writeln!(out, "Overall Status: {}", verdict.overall_status);
    let _ = writeln!(out, "{}", verdict.summary);
    let _ = writeln!(out, "  Output hash matches baseline:  {}", criteria.output_hash_matches_baseline);
    let _ = writeln!(out, "  Row count matches baseline:    {}", criteria.row_count_matches_baseline);
    let _ = writeln!(out, "  Runtime improved:              {}", criteria.runtime_improved);
    let _ = writeln!(out, "  Improvement in target range:   {}", criteria.improvement_in_target_range);
    let _ = writeln!(out, "{}", RULE);
    out
}

pub fn render_tabular(diff: &TabularDiff) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "REPORT COMPARISON");
    let _ = writeln!(out, "{}", RULE);
    for finding in &diff.findings {
        let _ = writeln!(out, "{}", finding);
    }
    let _ = writeln!(
        out,
        "\nNumeric totals: baseline {} vs candidate {}",
        diff.baseline_summary.total_sum, diff.candidate_summary.total_sum
    );
    let _ = writeln!(out, "{}", RULE);
    if diff.is_match() {
        let _ = writeln!(out, "PASS: reports are identical");
    } else {
        let _ = writeln!(out, "FAIL: reports differ");
    }
    out
}
