//! Projection output structures: chart points, per-scenario outcomes and the verdict

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a scenario's simulation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioStatus {
    /// Net worth stayed positive through the max age
    Completed,
    /// Net worth dropped to zero or below; the series stops there
    Depleted,
    /// Candidate retirement age lies past the max age; no data
    BeyondHorizon,
    /// The simulation produced a non-finite value; no data
    NumericOverflow,
}

impl ScenarioStatus {
    /// Whether the scenario contributes points to the chart
    pub fn has_data(&self) -> bool {
        matches!(self, ScenarioStatus::Completed | ScenarioStatus::Depleted)
    }
}

/// One line of the comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    /// Series key used in every `TrajectoryPoint`
    pub label: String,

    /// Assumed retirement age; `None` for the keep-working baseline
    pub retirement_age: Option<u32>,

    pub status: ScenarioStatus,

    /// First age at which net worth was no longer positive
    pub depleted_at_age: Option<u32>,

    /// Last emitted net worth
    pub final_net_worth: Option<f64>,

    /// Emitted `(age, net worth)` pairs, all strictly positive
    #[serde(skip)]
    pub series: Vec<(u32, f64)>,
}

impl ScenarioOutcome {
    /// Outcome for a scenario that was never simulated
    pub fn without_data(label: String, retirement_age: Option<u32>, status: ScenarioStatus) -> Self {
        Self {
            label,
            retirement_age,
            status,
            depleted_at_age: None,
            final_net_worth: None,
            series: Vec::new(),
        }
    }
}

/// Net worth of every live scenario at one age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    pub age: u32,
    pub net_worth_by_scenario: BTreeMap<String, f64>,
}

/// Merge scenario series into one age-keyed sequence, ordered by age
pub fn merge_series(outcomes: &[ScenarioOutcome]) -> Vec<TrajectoryPoint> {
    let mut by_age: BTreeMap<u32, BTreeMap<String, f64>> = BTreeMap::new();
    for outcome in outcomes {
        for &(age, net_worth) in &outcome.series {
            by_age
                .entry(age)
                .or_default()
                .insert(outcome.label.clone(), net_worth);
        }
    }
    by_age
        .into_iter()
        .map(|(age, net_worth_by_scenario)| TrajectoryPoint { age, net_worth_by_scenario })
        .collect()
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProjection {
    pub can_retire: bool,
    pub retirement_age: Option<u32>,
    pub trajectories: Vec<TrajectoryPoint>,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl RetirementProjection {
    /// Verdict for a profile that cannot retire within the horizon, with no chart data
    pub fn cannot_retire() -> Self {
        Self {
            can_retire: false,
            retirement_age: None,
            trajectories: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    /// Labels of the scenarios that have chart data, in scenario order
    pub fn series_labels(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .filter(|s| s.status.has_data())
            .filter(|s| {
                self.trajectories
                    .iter()
                    .any(|p| p.net_worth_by_scenario.contains_key(&s.label))
            })
            .map(|s| s.label.as_str())
            .collect()
    }

    /// One scenario's series read back from the merged points
    pub fn series(&self, label: &str) -> Vec<(u32, f64)> {
        self.trajectories
            .iter()
            .filter_map(|p| p.net_worth_by_scenario.get(label).map(|v| (p.age, *v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(label: &str, series: Vec<(u32, f64)>) -> ScenarioOutcome {
        ScenarioOutcome {
            label: label.to_string(),
            retirement_age: Some(60),
            status: ScenarioStatus::Completed,
            depleted_at_age: None,
            final_net_worth: series.last().map(|p| p.1),
            series,
        }
    }

    #[test]
    fn test_merge_keys_by_age() {
        let a = outcome("A", vec![(30, 1.0), (31, 2.0), (32, 3.0)]);
        let b = outcome("B", vec![(31, 20.0), (33, 40.0)]);
        let points = merge_series(&[a, b]);

        let ages: Vec<u32> = points.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![30, 31, 32, 33]);
        assert_eq!(points[0].net_worth_by_scenario.len(), 1);
        assert_eq!(points[1].net_worth_by_scenario.get("A"), Some(&2.0));
        assert_eq!(points[1].net_worth_by_scenario.get("B"), Some(&20.0));
        assert!(!points[3].net_worth_by_scenario.contains_key("A"));
    }

    #[test]
    fn test_series_read_back() {
        let a = outcome("A", vec![(30, 1.0), (31, 2.0)]);
        let b = outcome("B", vec![(31, 5.0)]);
        let projection = RetirementProjection {
            can_retire: true,
            retirement_age: Some(60),
            trajectories: merge_series(&[a.clone(), b]),
            scenarios: vec![a],
        };
        assert_eq!(projection.series("A"), vec![(30, 1.0), (31, 2.0)]);
        assert_eq!(projection.series("B"), vec![(31, 5.0)]);
        assert_eq!(projection.series_labels(), vec!["A"]);
    }

    #[test]
    fn test_status_data_flags() {
        assert!(ScenarioStatus::Completed.has_data());
        assert!(ScenarioStatus::Depleted.has_data());
        assert!(!ScenarioStatus::BeyondHorizon.has_data());
        assert!(!ScenarioStatus::NumericOverflow.has_data());
    }
}
