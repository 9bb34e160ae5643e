//! The priority score that orders the search frontier.

use serde::{Deserialize, Serialize};

use crate::geo::CoordinateMapper;
use crate::heuristic::{HeuristicField, DEFAULT_HEURISTIC};
use crate::neighbors::euclidean;
use crate::{Error, GridCell, Result};

/// The kind of voyage a Route is planned for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
	/// freight: distance matters as much as the path already travelled
	Cargo,
	/// people on board: the path already travelled matters the most
	Passenger,
	/// neither flag set
	Default,
}

/// What to do when both the cargo and the passenger flag are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeConflictPolicy {
	/// the passenger weighting wins (inherited behavior)
	#[default]
	PreferPassenger,
	/// the request is rejected with [`Error::InvalidMode`]
	Reject,
}

impl TransportMode {
	/// Turns the two independent caller flags into a single mode.
	///
	/// ## Examples
	/// ```
	/// use vessel_routing::cost::{ModeConflictPolicy::*, TransportMode};
	///
	/// assert_eq!(TransportMode::from_flags(false, false, Reject).unwrap(), TransportMode::Default);
	/// assert_eq!(TransportMode::from_flags(true, false, Reject).unwrap(), TransportMode::Cargo);
	/// assert_eq!(TransportMode::from_flags(true, true, PreferPassenger).unwrap(), TransportMode::Passenger);
	/// assert!(TransportMode::from_flags(true, true, Reject).is_err());
	/// ```
	pub fn from_flags(cargo: bool, passenger: bool, policy: ModeConflictPolicy) -> Result<TransportMode> {
		match (cargo, passenger) {
			(true, true) => match policy {
				ModeConflictPolicy::PreferPassenger => Ok(TransportMode::Passenger),
				ModeConflictPolicy::Reject => Err(Error::InvalidMode),
			},
			(false, true) => Ok(TransportMode::Passenger),
			(true, false) => Ok(TransportMode::Cargo),
			(false, false) => Ok(TransportMode::Default),
		}
	}
}

/// The weights of the linear blend for one [`TransportMode`].
///
/// The weights are engineered constants and do not need to sum up to `1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeWeights {
	/// weight of the path cost already travelled
	pub g_score: f64,
	/// weight of the straight-line distance to the goal
	pub distance: f64,
	/// weight of the Heuristic Field value
	pub heuristic: f64,
}

impl ModeWeights {
	/// Creates new ModeWeights
	pub const fn new(g_score: f64, distance: f64, heuristic: f64) -> ModeWeights {
		ModeWeights {
			g_score,
			distance,
			heuristic,
		}
	}

	/// The weighted sum of the three terms
	pub fn blend(&self, g_score: f64, distance: f64, heuristic: f64) -> f64 {
		self.g_score * g_score + self.distance * distance + self.heuristic * heuristic
	}
}

/// The weights for every [`TransportMode`] and the wind bonus.
///
/// Default weights:
/// ```
/// # use vessel_routing::cost::{CostWeights, ModeWeights};
/// assert_eq!(
/// 	CostWeights {
/// 		passenger: ModeWeights::new(0.2, 0.1, 0.1),
/// 		cargo: ModeWeights::new(0.5, 0.5, 0.1),
/// 		default: ModeWeights::new(0.5, 0.4, 0.1),
/// 		wind_bonus: 0.9,
/// 	},
/// 	Default::default()
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
	/// weights for [`TransportMode::Passenger`]
	pub passenger: ModeWeights,
	/// weights for [`TransportMode::Cargo`]
	pub cargo: ModeWeights,
	/// weights for [`TransportMode::Default`]
	pub default: ModeWeights,
	/// factor applied to the score of a wind-aligned move
	pub wind_bonus: f64,
}

impl CostWeights {
	/// The weights the original deployment was tuned with
	pub const ORIGINAL: CostWeights = CostWeights {
		passenger: ModeWeights::new(0.2, 0.1, 0.1),
		cargo: ModeWeights::new(0.5, 0.5, 0.1),
		default: ModeWeights::new(0.5, 0.4, 0.1),
		wind_bonus: 0.9,
	};

	/// The weights for `mode`
	pub fn for_mode(&self, mode: TransportMode) -> ModeWeights {
		match mode {
			TransportMode::Passenger => self.passenger,
			TransportMode::Cargo => self.cargo,
			TransportMode::Default => self.default,
		}
	}
}

impl Default for CostWeights {
	fn default() -> CostWeights {
		CostWeights::ORIGINAL
	}
}

/// Scores Cells for the frontier of the search. Lower scores are explored first.
///
/// The score only depends on its arguments and the read-only tables it was created with.
#[derive(Clone, Copy, Debug)]
pub struct CostModel<'a> {
	weights: CostWeights,
	mapper: &'a CoordinateMapper,
	heuristic: &'a HeuristicField,
}

impl<'a> CostModel<'a> {
	/// Creates a new CostModel
	pub fn new(
		weights: CostWeights,
		mapper: &'a CoordinateMapper,
		heuristic: &'a HeuristicField,
	) -> CostModel<'a> {
		CostModel {
			weights,
			mapper,
			heuristic,
		}
	}

	/// The weights this model blends with
	pub fn weights(&self) -> &CostWeights {
		&self.weights
	}

	/// The priority of reaching `candidate` with a path cost of `g_score` on the way to `goal`.
	pub fn score(
		&self,
		g_score: f64,
		candidate: GridCell,
		goal: GridCell,
		mode: TransportMode,
		wind_aligned: bool,
	) -> f64 {
		self.score_counting(g_score, candidate, goal, mode, wind_aligned, &mut 0)
	}

	/// Like [`score`](CostModel::score), but adds `1` to `defaulted` if the Heuristic Field does
	/// not know the region of `candidate`.
	pub fn score_counting(
		&self,
		g_score: f64,
		candidate: GridCell,
		goal: GridCell,
		mode: TransportMode,
		wind_aligned: bool,
		defaulted: &mut usize,
	) -> f64 {
		let distance = euclidean(candidate, goal);
		let heuristic = match self.heuristic.lookup(self.mapper.grid_to_geo(candidate)) {
			Some(value) => value,
			None => {
				*defaulted += 1;
				DEFAULT_HEURISTIC
			}
		};
		let score = self.weights.for_mode(mode).blend(g_score, distance, heuristic);

		if wind_aligned {
			score * self.weights.wind_bonus
		} else {
			score
		}
	}
}
