use thiserror::Error;

use crate::GridCell;

/// Convenient result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading resources or validating planner input.
///
/// Not finding a Route is not an error, see [`NoRoute`](crate::planner::NoRoute).
#[derive(Debug, Error)]
pub enum Error {
	/// A geographic coordinate lies outside the calibrated bounding box.
	#[error("coordinate ({latitude}, {longitude}) lies outside the mapped region")]
	OutOfRegion {
		/// latitude of the rejected coordinate
		latitude: f64,
		/// longitude of the rejected coordinate
		longitude: f64,
	},

	/// A grid cell lies outside the grid.
	#[error("cell {cell:?} lies outside the {width}x{height} grid")]
	CellOutOfBounds {
		/// the rejected cell
		cell: GridCell,
		/// width of the grid
		width: usize,
		/// height of the grid
		height: usize,
	},

	/// Both the cargo and the passenger flag were set while conflicting flags are rejected.
	#[error("cargo and passenger mode were requested at the same time")]
	InvalidMode,

	/// The map calibration cannot describe a grid.
	#[error("invalid map calibration: {message}")]
	InvalidCalibration {
		/// what is wrong with the calibration
		message: String,
	},

	/// A navigability raster does not match the grid.
	#[error("invalid navigability raster {origin}: {message}")]
	InvalidRaster {
		/// where the raster was read from
		origin: String,
		/// what is wrong with the raster
		message: String,
	},

	/// Wrapper for IO errors.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Wrapper for CSV parsing errors.
	#[error(transparent)]
	Csv(#[from] csv::Error),

	/// Wrapper for JSON parsing errors.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
