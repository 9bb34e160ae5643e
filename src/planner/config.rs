use serde::{Deserialize, Serialize};

use crate::cost::{CostWeights, ModeConflictPolicy};

/// Options for configuring the [`Planner`](crate::planner::Planner)
///
/// Default options:
/// ```
/// # use vessel_routing::{cost::{CostWeights, ModeConflictPolicy}, planner::PlannerConfig};
/// assert_eq!(
/// 	PlannerConfig {
/// 		costs: CostWeights::default(),
/// 		mode_conflict: ModeConflictPolicy::PreferPassenger,
/// 	},
/// 	Default::default()
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
	/// The weights of the [`CostModel`](crate::cost::CostModel) for every transport mode.
	pub costs: CostWeights,
	/// `PreferPassenger` (default): a request with both the cargo and the passenger flag set is
	/// planned with passenger weights.
	///
	/// `Reject`: such a request fails with [`Error::InvalidMode`](crate::Error::InvalidMode).
	pub mode_conflict: ModeConflictPolicy,
}

impl PlannerConfig {
	/// an example PlannerConfig that refuses ambiguous mode flags
	///
	/// Values:
	/// ```
	/// # use vessel_routing::{cost::{CostWeights, ModeConflictPolicy}, planner::PlannerConfig};
	/// assert_eq!(PlannerConfig::STRICT.mode_conflict, ModeConflictPolicy::Reject);
	/// assert_eq!(PlannerConfig::STRICT.costs, CostWeights::default());
	/// ```
	pub const STRICT: PlannerConfig = PlannerConfig {
		costs: CostWeights::ORIGINAL,
		mode_conflict: ModeConflictPolicy::Reject,
	};

	/// Parses a PlannerConfig from JSON. Missing fields keep their default values.
	///
	/// ```
	/// # use vessel_routing::{cost::ModeConflictPolicy, planner::PlannerConfig};
	/// let config = PlannerConfig::from_json(r#"{ "mode_conflict": "reject" }"#).unwrap();
	/// assert_eq!(config.mode_conflict, ModeConflictPolicy::Reject);
	/// assert_eq!(config.costs.wind_bonus, 0.9);
	/// ```
	pub fn from_json(json: &str) -> crate::Result<PlannerConfig> {
		Ok(serde_json::from_str(json)?)
	}
}
