//! Loading every map resource of a deployment at once.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::geo::{CoordinateMapper, MapCalibration};
use crate::heuristic::HeuristicField;
use crate::obstacles::{NavigabilityRaster, ObstacleMap};
use crate::planner::{Planner, PlannerConfig};
use crate::wind::{WindField, ALIGNMENT_TOLERANCE};
use crate::Result;

/// Where the map resources of a session come from and how they are used.
///
/// Every table is optional. A missing table leaves the matching resource empty.
///
/// ```
/// # use vessel_routing::session::SessionConfig;
/// let config = SessionConfig::from_json(r#"{
/// 	"heuristic_table": "data/heuristic.csv",
/// 	"wind_tolerance": 30.0
/// }"#).unwrap();
///
/// assert_eq!(config.wind_tolerance, 30.0);
/// assert!(config.wind_table.is_none());
/// assert_eq!(config.calibration, Default::default());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// calibration of the Grid
	pub calibration: MapCalibration,
	/// options passed to every [`Planner`] of the session
	pub planner: PlannerConfig,
	/// half width of the window around the wind bearing that counts as aligned, in degrees
	pub wind_tolerance: f64,
	/// CSV table with the columns `longitude,latitude,heuristic`
	pub heuristic_table: Option<PathBuf>,
	/// CSV table with the columns `longitude,latitude,wind_direction_10m_dominant`
	pub wind_table: Option<PathBuf>,
	/// CSV list of blocked Cells with the columns `x,y`
	pub blocked_cells: Option<PathBuf>,
	/// land/water bitmap covering the whole Grid
	pub navigability_raster: Option<PathBuf>,
}

impl Default for SessionConfig {
	fn default() -> SessionConfig {
		SessionConfig {
			calibration: MapCalibration::default(),
			planner: PlannerConfig::default(),
			wind_tolerance: ALIGNMENT_TOLERANCE,
			heuristic_table: None,
			wind_table: None,
			blocked_cells: None,
			navigability_raster: None,
		}
	}
}

impl SessionConfig {
	/// Parses a SessionConfig from JSON. Missing fields keep their default values.
	pub fn from_json(json: &str) -> Result<SessionConfig> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a SessionConfig from a JSON file.
	///
	/// Relative resource paths are resolved against the directory of the file.
	pub fn from_path(path: &Path) -> Result<SessionConfig> {
		let text = std::fs::read_to_string(path)?;
		let mut config = SessionConfig::from_json(&text)?;

		if let Some(dir) = path.parent() {
			for resource in [
				&mut config.heuristic_table,
				&mut config.wind_table,
				&mut config.blocked_cells,
				&mut config.navigability_raster,
			] {
				if let Some(file) = resource.as_mut().filter(|file| file.is_relative()) {
					*file = dir.join(&*file);
				}
			}
		}
		Ok(config)
	}
}

/// The read-only map resources of one deployment.
///
/// Load it once, then create as many [`Planner`]s from it as needed.
#[derive(Debug)]
pub struct NavigationSession {
	mapper: CoordinateMapper,
	obstacles: ObstacleMap,
	heuristic: HeuristicField,
	wind: WindField,
	config: PlannerConfig,
}

impl NavigationSession {
	/// Loads every resource named in `config`.
	///
	/// Missing table files are logged and leave the resource empty. Malformed files and an
	/// invalid calibration are errors.
	pub fn load(config: &SessionConfig) -> Result<NavigationSession> {
		let mapper = CoordinateMapper::new(config.calibration)?;
		let resolution = config.calibration.lookup_resolution;

		let heuristic = match &config.heuristic_table {
			Some(path) => HeuristicField::from_path(resolution, path)?,
			None => HeuristicField::empty(resolution),
		};

		let wind = match &config.wind_table {
			Some(path) => WindField::from_path(resolution, path)?,
			None => WindField::empty(resolution),
		}
		.with_tolerance(config.wind_tolerance);

		let blocked = match &config.blocked_cells {
			Some(path) => ObstacleMap::load_blocked_cells(path)?,
			None => vec![],
		};
		let mut obstacles = ObstacleMap::from_blocked_cells(mapper.width(), mapper.height(), blocked);
		obstacles.warn_outside();

		if let Some(path) = &config.navigability_raster {
			let raster = NavigabilityRaster::from_path(path, mapper.width(), mapper.height())?;
			obstacles = obstacles.with_raster(raster)?;
		}

		info!(
			"session ready: {}x{} grid, {} heuristic entries, {} wind entries, {} blocked cells",
			mapper.width(),
			mapper.height(),
			heuristic.len(),
			wind.len(),
			obstacles.blocked_count()
		);

		Ok(NavigationSession {
			mapper,
			obstacles,
			heuristic,
			wind,
			config: config.planner,
		})
	}

	/// Assembles a session from resources that are already in memory.
	pub fn from_parts(
		mapper: CoordinateMapper,
		obstacles: ObstacleMap,
		heuristic: HeuristicField,
		wind: WindField,
		config: PlannerConfig,
	) -> NavigationSession {
		NavigationSession {
			mapper,
			obstacles,
			heuristic,
			wind,
			config,
		}
	}

	/// The calibrated mapper of the Grid
	pub fn mapper(&self) -> &CoordinateMapper {
		&self.mapper
	}

	/// The Obstacle Map
	pub fn obstacles(&self) -> &ObstacleMap {
		&self.obstacles
	}

	/// The Heuristic Field
	pub fn heuristic(&self) -> &HeuristicField {
		&self.heuristic
	}

	/// The Wind Field
	pub fn wind(&self) -> &WindField {
		&self.wind
	}

	/// A Planner borrowing the resources of this session
	pub fn planner(&self) -> Planner<'_> {
		Planner::new(
			&self.mapper,
			&self.obstacles,
			&self.heuristic,
			&self.wind,
			self.config,
		)
	}
}
