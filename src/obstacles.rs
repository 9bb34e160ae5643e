//! Which Cells of the Grid a vessel may enter.

use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::table::{open_optional, read_rows};
use crate::{CellSet, Error, GridCell, Result};

/// A precomputed land/water bitmap with one entry per Cell.
///
/// The text form has one line per row of the Grid and one glyph per Cell:
/// ```no_code
/// #, X, 1     land
/// ., 0, ~, ' ' water
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigabilityRaster {
	width: usize,
	height: usize,
	land: Vec<bool>,
}

impl NavigabilityRaster {
	/// Creates a raster of `width`x`height` Cells that are all water.
	pub fn new(width: usize, height: usize) -> NavigabilityRaster {
		NavigabilityRaster {
			width,
			height,
			land: vec![false; width * height],
		}
	}

	/// Parses the text form of a raster that must cover exactly `width`x`height` Cells.
	///
	/// ## Examples
	/// ```
	/// # use vessel_routing::obstacles::NavigabilityRaster;
	/// let raster = NavigabilityRaster::parse("..#\n.##\n", 3, 2).unwrap();
	///
	/// assert!(raster.is_land((2, 0)));
	/// assert!(!raster.is_land((0, 1)));
	/// ```
	pub fn parse(text: &str, width: usize, height: usize) -> Result<NavigabilityRaster> {
		Self::parse_named(text, width, height, "<text>")
	}

	/// Reads a raster of `width`x`height` Cells from `path`.
	pub fn from_path(path: &Path, width: usize, height: usize) -> Result<NavigabilityRaster> {
		let mut text = String::new();
		std::fs::File::open(path)?.read_to_string(&mut text)?;
		let raster = Self::parse_named(&text, width, height, &path.display().to_string())?;
		info!(
			"loaded navigability raster from {} ({} land cells)",
			path.display(),
			raster.land.iter().filter(|&&land| land).count()
		);
		Ok(raster)
	}

	fn parse_named(
		text: &str,
		width: usize,
		height: usize,
		origin: &str,
	) -> Result<NavigabilityRaster> {
		let invalid = |message: String| Error::InvalidRaster {
			origin: origin.to_string(),
			message,
		};

		let mut lines: Vec<&str> = text
			.split('\n')
			.map(|line| line.strip_suffix('\r').unwrap_or(line))
			.collect();
		while lines.last().is_some_and(|line| line.is_empty()) {
			lines.pop();
		}
		if lines.len() != height {
			return Err(invalid(format!(
				"expected {} rows, found {}",
				height,
				lines.len()
			)));
		}

		let mut raster = NavigabilityRaster::new(width, height);
		for (y, line) in lines.iter().enumerate() {
			let glyphs: Vec<char> = line.chars().collect();
			if glyphs.len() != width {
				return Err(invalid(format!(
					"row {} has {} cells, expected {}",
					y,
					glyphs.len(),
					width
				)));
			}
			for (x, glyph) in glyphs.into_iter().enumerate() {
				let land = match glyph {
					'#' | 'X' | '1' => true,
					'.' | '0' | '~' | ' ' => false,
					other => {
						return Err(invalid(format!("unknown glyph {:?} at ({}, {})", other, x, y)))
					}
				};
				raster.land[x + y * width] = land;
			}
		}
		Ok(raster)
	}

	/// Marks `cell` as land or water. Cells outside the raster are ignored.
	pub fn set_land(&mut self, cell: GridCell, land: bool) {
		if cell.0 < self.width && cell.1 < self.height {
			self.land[cell.0 + cell.1 * self.width] = land;
		}
	}

	/// Returns `true` if `cell` is land. Cells outside the raster count as land.
	pub fn is_land(&self, cell: GridCell) -> bool {
		if cell.0 >= self.width || cell.1 >= self.height {
			return true;
		}
		self.land[cell.0 + cell.1 * self.width]
	}

	/// The size of the raster as `(width, height)`
	pub fn dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
}

#[derive(Deserialize)]
struct BlockedCellRow {
	x: usize,
	y: usize,
}

/// Answers whether a Cell may be traversed.
///
/// A Cell is blocked if it is listed in the static blocked-cell set, if the optional
/// [`NavigabilityRaster`] marks it as land, or if it lies outside the Grid.
#[derive(Clone, Debug)]
pub struct ObstacleMap {
	width: usize,
	height: usize,
	blocked: CellSet,
	raster: Option<NavigabilityRaster>,
}

impl ObstacleMap {
	/// Creates an ObstacleMap of `width`x`height` Cells without any obstacles.
	pub fn open(width: usize, height: usize) -> ObstacleMap {
		ObstacleMap {
			width,
			height,
			blocked: CellSet::new(),
			raster: None,
		}
	}

	/// Creates an ObstacleMap that blocks exactly the given `cells`.
	pub fn from_blocked_cells(
		width: usize,
		height: usize,
		cells: impl IntoIterator<Item = GridCell>,
	) -> ObstacleMap {
		ObstacleMap {
			blocked: cells.into_iter().collect(),
			..ObstacleMap::open(width, height)
		}
	}

	/// Adds a land/water `raster` on top of the blocked-cell set.
	///
	/// Fails if the raster does not cover the same Grid.
	pub fn with_raster(mut self, raster: NavigabilityRaster) -> Result<ObstacleMap> {
		if raster.dimensions() != (self.width, self.height) {
			let (width, height) = raster.dimensions();
			return Err(Error::InvalidRaster {
				origin: "<memory>".to_string(),
				message: format!(
					"raster is {}x{} but the grid is {}x{}",
					width, height, self.width, self.height
				),
			});
		}
		self.raster = Some(raster);
		Ok(self)
	}

	/// Reads a blocked-cell list with the columns `x,y` from `path`.
	///
	/// A missing file yields an empty list.
	pub fn load_blocked_cells(path: &Path) -> Result<Vec<GridCell>> {
		let Some(file) = open_optional(path, "blocked-cell list")? else {
			return Ok(vec![]);
		};
		let cells: Vec<GridCell> = read_rows::<BlockedCellRow>(file)?
			.into_iter()
			.map(|row| (row.x, row.y))
			.collect();
		info!("loaded {} blocked cells from {}", cells.len(), path.display());
		Ok(cells)
	}

	/// Returns `true` if `cell` must not be entered.
	pub fn is_blocked(&self, cell: GridCell) -> bool {
		if cell.0 >= self.width || cell.1 >= self.height {
			return true;
		}
		if self.blocked.contains(&cell) {
			return true;
		}
		self.raster.as_ref().is_some_and(|raster| raster.is_land(cell))
	}

	/// The number of Cells in the static blocked-cell set
	pub fn blocked_count(&self) -> usize {
		self.blocked.len()
	}

	/// The size of the Grid as `(width, height)`
	pub fn dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}

	pub(crate) fn warn_outside(&self) {
		let outside = self
			.blocked
			.iter()
			.filter(|cell| cell.0 >= self.width || cell.1 >= self.height)
			.count();
		if outside > 0 {
			warn!("{} blocked cells lie outside the grid and are ignored", outside);
		}
	}
}
