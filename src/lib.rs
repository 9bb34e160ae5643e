#![warn(
	missing_docs,
	missing_debug_implementations,
	trivial_casts,
	trivial_numeric_casts,
	unsafe_code,
	unstable_features,
	unused_import_braces,
	unused_qualifications
)]

//! A crate to plan vessel routes across a geographic Grid.
//!
//! ## Introduction
//! The shortest Route between two ports is rarely the one a vessel should take. This crate
//! searches a discretized map of the sea for a Route that is biased towards low-risk,
//! wind-favorable and mission-appropriate waters instead of plain distance.
//!
//! Every Cell of the Grid is scored by a [`CostModel`](cost::CostModel) that blends:
//! - the distance already travelled (the g-score),
//! - the straight-line distance to the goal,
//! - a precomputed desirability value from the [`HeuristicField`](heuristic::HeuristicField),
//! - a bonus for moving along the dominant wind from the [`WindField`](wind::WindField).
//!
//! The weights of that blend depend on the [`TransportMode`](cost::TransportMode) of the vessel.
//! Since the blend is not a lower bound on the remaining distance, **the resulting Routes are
//! not guaranteed to be the shortest ones**. The [`Planner`](planner::Planner) is a weighted
//! best-first search, not an optimal A*.
//!
//! ## Examples
//! Planning on an open Grid:
//! ```
//! use vessel_routing::prelude::*;
//!
//! // a 10x10 Grid covering one degree of latitude/longitude per Cell
//! let calibration = MapCalibration::square(10, BorderAnchors::new(9.0, 0.0, 0.0, 9.0));
//! let mapper = CoordinateMapper::new(calibration).unwrap();
//!
//! let obstacles = ObstacleMap::open(mapper.width(), mapper.height());
//! let heuristic = HeuristicField::empty(calibration.lookup_resolution);
//! let wind = WindField::empty(calibration.lookup_resolution);
//!
//! let planner = Planner::new(&mapper, &obstacles, &heuristic, &wind, PlannerConfig::default());
//!
//! let result = planner.plan((0, 0), (9, 9), TransportMode::Default).unwrap();
//! let path = result.route.unwrap();
//!
//! assert_eq!(path.len(), 9);
//! assert_eq!(path.last(), Some(&(9, 9)));
//! ```
//!
//! If the goal cannot be reached, the [`PlanResult`](planner::PlanResult) still carries every
//! Cell that was explored:
//! ```
//! # use vessel_routing::prelude::*;
//! # let calibration = MapCalibration::square(10, BorderAnchors::new(9.0, 0.0, 0.0, 9.0));
//! # let mapper = CoordinateMapper::new(calibration).unwrap();
//! # let heuristic = HeuristicField::empty(calibration.lookup_resolution);
//! # let wind = WindField::empty(calibration.lookup_resolution);
//! // a wall across the whole Grid
//! let obstacles = ObstacleMap::from_blocked_cells(10, 10, (0..10).map(|y| (5, y)));
//! let planner = Planner::new(&mapper, &obstacles, &heuristic, &wind, PlannerConfig::default());
//!
//! let result = planner.plan((0, 0), (9, 9), TransportMode::Cargo).unwrap();
//!
//! assert_eq!(result.route, Err(NoRoute::Exhausted));
//! assert!(!result.explored.is_empty());
//! ```
//!
//! ### Resources
//! The Heuristic Field, the Wind Field and the Obstacle Map are loaded once per session and
//! never modified by the Planner. A [`NavigationSession`](session::NavigationSession) loads
//! all of them from the files named in a [`SessionConfig`](session::SessionConfig). Missing
//! table files are not an error: every lookup then falls back to the documented default.

/// A Cell on the Grid, addressed by `(x, y)`.
///
/// `x` grows towards the east and `y` grows towards the south.
pub type GridCell = (usize, usize);

/// A [`HashMap`](hashbrown::HashMap) keyed by [`GridCell`]s
pub type CellMap<V> = hashbrown::HashMap<GridCell, V>;
/// A [`HashSet`](hashbrown::HashSet) of [`GridCell`]s
pub type CellSet = hashbrown::HashSet<GridCell>;

mod error;
pub use self::error::{Error, Result};

pub mod cost;
pub mod geo;
pub mod heuristic;
pub mod neighbors;
pub mod obstacles;
pub mod path;
pub mod planner;
pub mod session;
pub mod table;
pub mod wind;

/// The prelude for this crate.
pub mod prelude {
	pub use crate::{
		cost::{CostModel, CostWeights, ModeConflictPolicy, ModeWeights, TransportMode},
		geo::{BorderAnchors, CoordinateMapper, GeoCoordinate, MapCalibration},
		heuristic::HeuristicField,
		neighbors::CompassNeighborhood,
		obstacles::{NavigabilityRaster, ObstacleMap},
		path::Path,
		planner::{
			CancelToken, NoRoute, PlanResult, Planner, PlannerConfig, RouteRequest,
			SearchObserver,
		},
		session::{NavigationSession, SessionConfig},
		wind::WindField,
		Error, GridCell, Result,
	};
}
