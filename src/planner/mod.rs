//! The weighted best-first search over the Grid.

mod config;
pub use self::config::PlannerConfig;

mod frontier;
use self::frontier::FrontierEntry;

mod observer;
pub use self::observer::{CancelToken, SearchObserver};

use std::collections::BinaryHeap;

use log::{debug, warn};
use thiserror::Error;

use crate::cost::{CostModel, TransportMode};
use crate::geo::{CoordinateMapper, GeoCoordinate};
use crate::heuristic::HeuristicField;
use crate::neighbors::{euclidean, CompassNeighborhood};
use crate::obstacles::ObstacleMap;
use crate::path::{Cost, Path};
use crate::wind::WindField;
use crate::{CellMap, CellSet, Error, GridCell, Result};

/// Why a search ended without a Route.
///
/// This is an expected outcome of planning, not a failure of the Planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NoRoute {
	/// every reachable Cell was explored without reaching the goal
	#[error("the goal is not reachable from the start")]
	Exhausted,
	/// the [`CancelToken`] was triggered before the goal was reached
	#[error("the search was cancelled")]
	Cancelled,
}

/// The outcome of one planning call.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanResult {
	/// the Route from the start (exclusive) to the goal (inclusive)
	pub route: std::result::Result<Path<GridCell>, NoRoute>,
	/// every Cell taken from the frontier and expanded, in the order it was expanded
	pub explored: Vec<GridCell>,
}

impl PlanResult {
	/// Returns `true` if a Route was found
	pub fn is_found(&self) -> bool {
		self.route.is_ok()
	}
}

/// A single planning request for [`Planner::plan_batch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteRequest {
	/// where the vessel departs
	pub start: GridCell,
	/// where the vessel should arrive
	pub goal: GridCell,
	/// the kind of voyage
	pub mode: TransportMode,
}

/// Plans Routes across one Grid.
///
/// The Planner only borrows the map resources. They are never modified, so one set of
/// resources can back any number of Planners and searches, also on several threads at once.
#[derive(Clone, Copy, Debug)]
pub struct Planner<'a> {
	mapper: &'a CoordinateMapper,
	obstacles: &'a ObstacleMap,
	wind: &'a WindField,
	neighborhood: CompassNeighborhood,
	cost_model: CostModel<'a>,
	config: PlannerConfig,
}

impl<'a> Planner<'a> {
	/// Creates a new Planner
	///
	/// ## Arguments
	/// - `mapper` - the calibration of the Grid. It also defines the size of the Grid.
	/// - `obstacles` - which Cells may not be entered
	/// - `heuristic` - the precomputed desirability of each region
	/// - `wind` - the dominant wind bearing of each region
	/// - `config` - the weights of the cost model and how ambiguous modes are handled
	pub fn new(
		mapper: &'a CoordinateMapper,
		obstacles: &'a ObstacleMap,
		heuristic: &'a HeuristicField,
		wind: &'a WindField,
		config: PlannerConfig,
	) -> Planner<'a> {
		if obstacles.dimensions() != (mapper.width(), mapper.height()) {
			warn!(
				"obstacle map is {:?} but the grid is {:?}, missing cells count as blocked",
				obstacles.dimensions(),
				(mapper.width(), mapper.height())
			);
		}
		Planner {
			mapper,
			obstacles,
			wind,
			neighborhood: CompassNeighborhood::new(mapper.width(), mapper.height()),
			cost_model: CostModel::new(config.costs, mapper, heuristic),
			config,
		}
	}

	/// The config this Planner was created with
	pub fn config(&self) -> &PlannerConfig {
		&self.config
	}

	/// The cost model that orders the frontier
	pub fn cost_model(&self) -> &CostModel<'a> {
		&self.cost_model
	}

	/// Turns the caller's `cargo` and `passenger` flags into a [`TransportMode`], following
	/// [`PlannerConfig::mode_conflict`].
	pub fn resolve_mode(&self, cargo: bool, passenger: bool) -> Result<TransportMode> {
		TransportMode::from_flags(cargo, passenger, self.config.mode_conflict)
	}

	/// Plans a Route from `start` to `goal`.
	///
	/// Fails with [`Error::CellOutOfBounds`] if either Cell is not on the Grid. Not finding a
	/// Route is reported through [`PlanResult::route`].
	pub fn plan(&self, start: GridCell, goal: GridCell, mode: TransportMode) -> Result<PlanResult> {
		self.plan_with(start, goal, mode, &mut (), None)
	}

	/// Like [`plan`](Planner::plan), but takes the two mode flags of the caller.
	pub fn plan_flags(
		&self,
		start: GridCell,
		goal: GridCell,
		cargo: bool,
		passenger: bool,
	) -> Result<PlanResult> {
		let mode = self.resolve_mode(cargo, passenger)?;
		self.plan(start, goal, mode)
	}

	/// Plans a Route between two geographic positions.
	///
	/// Fails with [`Error::OutOfRegion`] before searching if either position lies outside the
	/// mapped region.
	pub fn plan_geo(
		&self,
		start: GeoCoordinate,
		goal: GeoCoordinate,
		cargo: bool,
		passenger: bool,
	) -> Result<PlanResult> {
		let start = self.mapper.geo_to_grid(start)?;
		let goal = self.mapper.geo_to_grid(goal)?;
		self.plan_flags(start, goal, cargo, passenger)
	}

	/// Plans a Route while reporting progress to `observer`.
	///
	/// If `cancel` is given, it is checked before every expansion and a triggered token ends the
	/// search with [`NoRoute::Cancelled`].
	pub fn plan_with(
		&self,
		start: GridCell,
		goal: GridCell,
		mode: TransportMode,
		observer: &mut impl SearchObserver,
		cancel: Option<&CancelToken>,
	) -> Result<PlanResult> {
		for cell in [start, goal] {
			if !self.mapper.contains(cell) {
				return Err(Error::CellOutOfBounds {
					cell,
					width: self.mapper.width(),
					height: self.mapper.height(),
				});
			}
		}

		debug!("planning {:?} -> {:?} as {:?}", start, goal, mode);

		let mut defaulted = 0;
		let result = self.search(start, goal, mode, observer, cancel, &mut defaulted);

		debug!(
			"search {:?} -> {:?} finished: {} after {} expansions, {} heuristic lookups defaulted",
			start,
			goal,
			match &result.route {
				Ok(path) => format!("found a route of {} cells", path.len()),
				Err(reason) => reason.to_string(),
			},
			result.explored.len(),
			defaulted
		);
		Ok(result)
	}

	/// Plans every request independently. With the `parallel` feature the requests are spread
	/// over the rayon thread pool.
	///
	/// The results are in the same order as the `requests`.
	pub fn plan_batch(&self, requests: &[RouteRequest]) -> Vec<Result<PlanResult>> {
		#[cfg(feature = "parallel")]
		{
			use rayon::prelude::*;
			requests
				.par_iter()
				.map(|request| self.plan(request.start, request.goal, request.mode))
				.collect()
		}

		#[cfg(not(feature = "parallel"))]
		{
			requests
				.iter()
				.map(|request| self.plan(request.start, request.goal, request.mode))
				.collect()
		}
	}

	fn search(
		&self,
		start: GridCell,
		goal: GridCell,
		mode: TransportMode,
		observer: &mut impl SearchObserver,
		cancel: Option<&CancelToken>,
		defaulted: &mut usize,
	) -> PlanResult {
		let mut explored = vec![];
		if start == goal {
			return PlanResult {
				route: Ok(Path::empty()),
				explored,
			};
		}

		let mut g_scores: CellMap<Cost> = CellMap::new();
		let mut predecessors: CellMap<GridCell> = CellMap::new();
		let mut finalized = CellSet::new();
		let mut frontier = BinaryHeap::new();

		g_scores.insert(start, 0.0);
		frontier.push(FrontierEntry {
			priority: self
				.cost_model
				.score_counting(0.0, start, goal, mode, false, defaulted),
			cell: start,
			g_score: 0.0,
		});

		while let Some(entry) = frontier.pop() {
			if cancel.is_some_and(CancelToken::is_cancelled) {
				return PlanResult {
					route: Err(NoRoute::Cancelled),
					explored,
				};
			}

			let current = entry.cell;
			let current_g = entry.g_score;
			// superseded by a cheaper entry, or already expanded
			if current_g > g_scores[&current] || !finalized.insert(current) {
				continue;
			}

			explored.push(current);
			observer.cell_popped(current);

			if current == goal {
				return PlanResult {
					route: Ok(reconstruct_path(start, goal, &predecessors, &g_scores)),
					explored,
				};
			}

			for (neighbor, step) in self.neighborhood.neighbors(current) {
				// the g-score of an expanded cell is final
				if finalized.contains(&neighbor) || self.obstacles.is_blocked(neighbor) {
					continue;
				}

				let tentative_g = current_g + euclidean(current, neighbor);
				if let Some(&known) = g_scores.get(&neighbor) {
					if tentative_g >= known {
						continue;
					}
				}

				let wind_aligned = self.wind.is_aligned(self.mapper.grid_to_geo(neighbor), step);
				let priority = self.cost_model.score_counting(
					tentative_g,
					neighbor,
					goal,
					mode,
					wind_aligned,
					defaulted,
				);

				predecessors.insert(neighbor, current);
				g_scores.insert(neighbor, tentative_g);
				observer.cell_relaxed(current, neighbor, priority);
				frontier.push(FrontierEntry {
					priority,
					cell: neighbor,
					g_score: tentative_g,
				});
			}
		}

		PlanResult {
			route: Err(NoRoute::Exhausted),
			explored,
		}
	}
}

fn reconstruct_path(
	start: GridCell,
	goal: GridCell,
	predecessors: &CellMap<GridCell>,
	g_scores: &CellMap<Cost>,
) -> Path<GridCell> {
	let mut steps = vec![];
	let mut current = goal;

	while current != start {
		steps.push(current);
		current = predecessors[&current];
	}
	steps.reverse();

	let costs = steps.iter().map(|cell| g_scores[cell]).collect();
	Path::new(steps, costs)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::{BorderAnchors, MapCalibration};

	struct Resources {
		mapper: CoordinateMapper,
		obstacles: ObstacleMap,
		heuristic: HeuristicField,
		wind: WindField,
	}

	impl Resources {
		fn open(size: usize) -> Resources {
			let last = (size - 1) as f64;
			let mapper = CoordinateMapper::new(MapCalibration::square(
				size,
				BorderAnchors::new(last, 0.0, 0.0, last),
			))
			.unwrap();
			Resources {
				obstacles: ObstacleMap::open(size, size),
				heuristic: HeuristicField::empty(0.25),
				wind: WindField::empty(0.25),
				mapper,
			}
		}

		fn planner(&self, config: PlannerConfig) -> Planner<'_> {
			Planner::new(
				&self.mapper,
				&self.obstacles,
				&self.heuristic,
				&self.wind,
				config,
			)
		}
	}

	#[derive(Default)]
	struct Recorder {
		popped: Vec<GridCell>,
		relaxed: usize,
	}

	impl SearchObserver for Recorder {
		fn cell_popped(&mut self, cell: GridCell) {
			self.popped.push(cell);
		}
		fn cell_relaxed(&mut self, _from: GridCell, _cell: GridCell, _priority: f64) {
			self.relaxed += 1;
		}
	}

	#[test]
	fn start_is_goal() {
		let resources = Resources::open(5);
		let planner = resources.planner(PlannerConfig::default());

		let result = planner.plan((2, 2), (2, 2), TransportMode::Default).unwrap();
		assert_eq!(result.route, Ok(Path::empty()));
		assert!(result.explored.is_empty());
	}

	#[test]
	fn straight_line() {
		let resources = Resources::open(5);
		let planner = resources.planner(PlannerConfig::default());

		let result = planner.plan((0, 2), (4, 2), TransportMode::Cargo).unwrap();
		let path = result.route.unwrap();
		assert_eq!(path.path, vec![(1, 2), (2, 2), (3, 2), (4, 2)]);
		assert_eq!(path.costs, vec![1.0, 2.0, 3.0, 4.0]);
		assert_eq!(result.explored.first(), Some(&(0, 2)));
		assert_eq!(result.explored.last(), Some(&(4, 2)));
	}

	#[test]
	fn expanded_cells_are_final() {
		struct NoReopen {
			expanded: Vec<GridCell>,
		}
		impl SearchObserver for NoReopen {
			fn cell_popped(&mut self, cell: GridCell) {
				assert!(!self.expanded.contains(&cell), "{:?} expanded twice", cell);
				self.expanded.push(cell);
			}
			fn cell_relaxed(&mut self, _from: GridCell, cell: GridCell, _priority: f64) {
				assert!(!self.expanded.contains(&cell), "{:?} relaxed after expansion", cell);
			}
		}

		let mut resources = Resources::open(12);
		resources.obstacles = ObstacleMap::from_blocked_cells(12, 12, (0..10).map(|y| (6, y)));
		let planner = resources.planner(PlannerConfig::default());
		let mut observer = NoReopen { expanded: vec![] };

		for mode in [TransportMode::Passenger, TransportMode::Cargo, TransportMode::Default] {
			observer.expanded.clear();
			let result = planner
				.plan_with((0, 0), (11, 0), mode, &mut observer, None)
				.unwrap();
			assert!(result.is_found());
			assert_eq!(observer.expanded, result.explored);
		}
	}

	#[test]
	fn out_of_bounds_is_rejected() {
		let resources = Resources::open(5);
		let planner = resources.planner(PlannerConfig::default());

		assert!(matches!(
			planner.plan((0, 0), (5, 0), TransportMode::Default),
			Err(Error::CellOutOfBounds { cell: (5, 0), .. })
		));
		assert!(matches!(
			planner.plan((0, 9), (0, 0), TransportMode::Default),
			Err(Error::CellOutOfBounds { .. })
		));
	}

	#[test]
	fn observer_sees_every_expansion() {
		let resources = Resources::open(6);
		let planner = resources.planner(PlannerConfig::default());
		let mut recorder = Recorder::default();

		let result = planner
			.plan_with((0, 0), (5, 3), TransportMode::Passenger, &mut recorder, None)
			.unwrap();
		assert!(result.is_found());
		assert_eq!(recorder.popped, result.explored);
		assert!(recorder.relaxed > 0);
	}

	#[test]
	fn cancelled_search() {
		let resources = Resources::open(6);
		let planner = resources.planner(PlannerConfig::default());
		let token = CancelToken::new();
		token.cancel();

		let result = planner
			.plan_with((0, 0), (5, 5), TransportMode::Default, &mut (), Some(&token))
			.unwrap();
		assert_eq!(result.route, Err(NoRoute::Cancelled));
		assert!(result.explored.is_empty());
	}

	#[test]
	fn cancel_from_observer() {
		struct StopAfter {
			token: CancelToken,
			remaining: usize,
		}
		impl SearchObserver for StopAfter {
			fn cell_popped(&mut self, _cell: GridCell) {
				self.remaining -= 1;
				if self.remaining == 0 {
					self.token.cancel();
				}
			}
		}

		let resources = Resources::open(20);
		let planner = resources.planner(PlannerConfig::default());
		let token = CancelToken::new();
		let mut observer = StopAfter {
			token: token.clone(),
			remaining: 3,
		};

		let result = planner
			.plan_with((0, 0), (19, 19), TransportMode::Default, &mut observer, Some(&token))
			.unwrap();
		assert_eq!(result.route, Err(NoRoute::Cancelled));
		assert_eq!(result.explored.len(), 3);
	}

	#[test]
	fn mode_flags() {
		let resources = Resources::open(5);

		let lenient = resources.planner(PlannerConfig::default());
		assert_eq!(
			lenient.resolve_mode(true, true).unwrap(),
			TransportMode::Passenger
		);
		assert!(lenient.plan_flags((0, 0), (4, 4), true, true).unwrap().is_found());

		let strict = resources.planner(PlannerConfig::STRICT);
		assert!(matches!(
			strict.plan_flags((0, 0), (4, 4), true, true),
			Err(Error::InvalidMode)
		));
		assert!(strict.plan_flags((0, 0), (4, 4), true, false).unwrap().is_found());
	}

	#[test]
	fn geographic_endpoints() {
		let resources = Resources::open(5);
		let planner = resources.planner(PlannerConfig::default());

		// latitude 4 is row 0, longitude 4 is column 4
		let result = planner
			.plan_geo(
				GeoCoordinate::new(4.0, 0.0),
				GeoCoordinate::new(4.0, 4.0),
				false,
				false,
			)
			.unwrap();
		assert_eq!(result.route.unwrap().last(), Some(&(4, 0)));

		assert!(matches!(
			planner.plan_geo(
				GeoCoordinate::new(4.0, 0.0),
				GeoCoordinate::new(40.0, 4.0),
				false,
				false
			),
			Err(Error::OutOfRegion { .. })
		));
	}

	#[test]
	fn batch_keeps_request_order() {
		let resources = Resources::open(8);
		let planner = resources.planner(PlannerConfig::default());
		let requests = [
			RouteRequest {
				start: (0, 0),
				goal: (7, 7),
				mode: TransportMode::Cargo,
			},
			RouteRequest {
				start: (7, 0),
				goal: (7, 0),
				mode: TransportMode::Default,
			},
			RouteRequest {
				start: (0, 0),
				goal: (9, 9),
				mode: TransportMode::Default,
			},
		];

		let results = planner.plan_batch(&requests);
		assert_eq!(results.len(), 3);

		let first = results[0].as_ref().unwrap();
		let single = planner.plan((0, 0), (7, 7), TransportMode::Cargo).unwrap();
		assert_eq!(first, &single);
		assert_eq!(results[1].as_ref().unwrap().route, Ok(Path::empty()));
		assert!(results[2].is_err());
	}
}
