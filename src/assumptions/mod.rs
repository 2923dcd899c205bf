//! Simulation assumptions that are not part of the user's financial profile

mod end_policy;

pub use end_policy::EndPrecedence;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ProjectionError, Result};

/// Offsets (in years) added to the estimated retirement age for the comparison scenarios
pub const DEFAULT_SCENARIO_OFFSETS: [u32; 4] = [0, 5, 10, 15];

/// Annual withdrawal rate considered sustainable for the required net worth figure
pub const DEFAULT_SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionAssumptions {
    /// Years added to the estimated retirement age, one scenario per offset
    pub scenario_offsets: Vec<u32>,

    /// Resolution of end age vs ends-at-retirement on the same item
    pub end_precedence: EndPrecedence,

    /// Add each asset's yearly contribution to net worth until retirement
    pub include_asset_contributions: bool,

    /// Simulate a single no-retirement scenario when the profile cannot retire
    pub baseline_when_unretirable: bool,

    /// Safe withdrawal rate for the summary's required net worth
    pub safe_withdrawal_rate: f64,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            scenario_offsets: DEFAULT_SCENARIO_OFFSETS.to_vec(),
            end_precedence: EndPrecedence::Earliest,
            include_asset_contributions: false,
            baseline_when_unretirable: false,
            safe_withdrawal_rate: DEFAULT_SAFE_WITHDRAWAL_RATE,
        }
    }
}

impl ProjectionAssumptions {
    /// Load assumptions from a JSON file; fields missing from the file keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let assumptions: Self = serde_json::from_reader(BufReader::new(file))?;
        assumptions.validate()?;
        log::info!("Loaded projection assumptions from {}", path.display());
        Ok(assumptions)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scenario_offsets.is_empty() {
            return Err(ProjectionError::invalid(
                "scenarioOffsets",
                "at least one scenario offset is required",
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.scenario_offsets.iter().find(|o| !seen.insert(**o)) {
            // Each offset names one chart series; a repeat would overwrite it
            return Err(ProjectionError::invalid(
                "scenarioOffsets",
                format!("offset {} is listed more than once", dup),
            ));
        }
        if !(self.safe_withdrawal_rate.is_finite() && self.safe_withdrawal_rate > 0.0) {
            return Err(ProjectionError::invalid(
                "safeWithdrawalRate",
                "must be a positive finite rate",
            ));
        }
        Ok(())
    }
}
