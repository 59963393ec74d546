//! Gate profiles
//!
//! Thresholds and display settings the validator runs with. Loaded from
//! YAML or built in code; there is no process-wide state.

use optgate_core::{HashAlgorithm, OptgateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute tolerance for numeric cell comparison
pub const DEFAULT_VALUE_TOLERANCE: f64 = 1e-10;

/// Bytes scanned that cost one credit (10 GB)
pub const DEFAULT_BYTES_PER_CREDIT: u64 = 10_000_000_000;

/// Characters of a hash shown in findings
pub const DEFAULT_HASH_PREFIX_LEN: usize = 16;

/// Differences reported verbatim before truncation
pub const DEFAULT_MAX_REPORTED_DIFFERENCES: usize = 10;

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateProfile {
    /// Profile name (e.g., "strict@1.0")
    pub name: String,

    // === Equivalence ===

    /// Absolute tolerance for numeric cells
    pub value_tolerance: f64,

    /// Characters of a hash shown in findings
    pub hash_prefix_len: usize,

    /// Differences listed verbatim in a tabular diff
    pub max_reported_differences: usize,

    /// Algorithm assumed when a report does not declare one
    pub hash_algorithm: HashAlgorithm,

    // === Performance ===

    /// Expected runtime improvement band (advisory)
    pub target_band: TargetBand,

    // === Cost ===

    /// Bytes scanned per credit
    pub bytes_per_credit: u64,
}

impl GateProfile {
    /// The default profile: strict "no slower" gating, 5-10% band
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            value_tolerance: DEFAULT_VALUE_TOLERANCE,
            hash_prefix_len: DEFAULT_HASH_PREFIX_LEN,
            max_reported_differences: DEFAULT_MAX_REPORTED_DIFFERENCES,
            hash_algorithm: HashAlgorithm::Sha256,
            target_band: TargetBand::default(),
            bytes_per_credit: DEFAULT_BYTES_PER_CREDIT,
        }
    }

    /// Load a profile from YAML; omitted keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, OptgateError> {
        let profile: GateProfile =
            serde_yaml::from_str(yaml).map_err(|e| OptgateError::ConfigError(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), OptgateError> {
        if !self.value_tolerance.is_finite() || self.value_tolerance < 0.0 {
            return Err(OptgateError::ConfigError(format!(
                "value_tolerance must be a finite value >= 0, got {}",
                self.value_tolerance
            )));
        }
        if !self.target_band.min_pct.is_finite()
            || !self.target_band.max_pct.is_finite()
            || self.target_band.min_pct > self.target_band.max_pct
        {
            return Err(OptgateError::ConfigError(format!(
                "target_band is invalid: {}",
                self.target_band
            )));
        }
        if self.bytes_per_credit == 0 {
            return Err(OptgateError::ConfigError(
                "bytes_per_credit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Credits charged for scanning `bytes`
    pub fn credits_for_bytes(&self, bytes: u64) -> f64 {
        bytes as f64 / self.bytes_per_credit as f64
    }
}

impl Default for GateProfile {
    fn default() -> Self {
        Self::strict()
    }
}

/// Inclusive improvement band, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBand {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl Default for TargetBand {
    fn default() -> Self {
        Self {
            min_pct: 5.0,
            max_pct: 10.0,
        }
    }
}

impl TargetBand {
    pub fn classify(&self, improvement_pct: Option<f64>) -> BandPosition {
        match improvement_pct {
            None => BandPosition::Undefined,
            Some(pct) if pct > self.max_pct => BandPosition::Above,
            Some(pct) if pct < self.min_pct => BandPosition::Below,
            Some(_) => BandPosition::Within,
        }
    }
}

impl fmt::Display for TargetBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}%", self.min_pct, self.max_pct)
    }
}

/// Where an improvement figure falls relative to the target band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    Within,
    Above,
    Below,
    /// No improvement figure (zero or missing baseline)
    Undefined,
}
