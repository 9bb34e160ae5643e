//! Conversion between geographic coordinates and Grid Cells.
//!
//! The Grid is laid over a rectangular region whose borders are given by four anchors. Cell
//! `(0, 0)` sits on the north-west corner and cell `(width - 1, height - 1)` on the south-east
//! corner, every other Cell is placed by linear interpolation between them.

use serde::{Deserialize, Serialize};

use crate::{Error, GridCell, Result};

/// The step that lookup tables are keyed by, in degrees.
pub const DEFAULT_LOOKUP_RESOLUTION: f64 = 0.25;

/// A geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
	/// north is positive
	pub latitude: f64,
	/// east is positive
	pub longitude: f64,
}

impl GeoCoordinate {
	/// Creates a new GeoCoordinate
	pub const fn new(latitude: f64, longitude: f64) -> GeoCoordinate {
		GeoCoordinate {
			latitude,
			longitude,
		}
	}
}

/// The latitudes and longitudes of the four borders of the mapped region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderAnchors {
	/// latitude of the northern border (row `0`)
	pub north_latitude: f64,
	/// latitude of the southern border (last row)
	pub south_latitude: f64,
	/// longitude of the western border (column `0`)
	pub west_longitude: f64,
	/// longitude of the eastern border (last column)
	pub east_longitude: f64,
}

impl BorderAnchors {
	/// Creates new BorderAnchors from the `north`, `south`, `west` and `east` borders.
	pub const fn new(north: f64, south: f64, west: f64, east: f64) -> BorderAnchors {
		BorderAnchors {
			north_latitude: north,
			south_latitude: south,
			west_longitude: west,
			east_longitude: east,
		}
	}
}

/// Calibration of the Grid against the geographic region it covers.
///
/// The Grid has `pixel_width / cell_size` columns and `pixel_height / cell_size` rows.
///
/// Default calibration:
/// ```
/// # use vessel_routing::geo::{BorderAnchors, MapCalibration};
/// let calibration = MapCalibration::default();
/// assert_eq!(calibration, MapCalibration::INDIAN_OCEAN);
/// assert_eq!((calibration.grid_width(), calibration.grid_height()), (137, 150));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapCalibration {
	/// the borders of the mapped region
	pub anchors: BorderAnchors,
	/// width of the map in pixel-equivalent units
	pub pixel_width: usize,
	/// height of the map in pixel-equivalent units
	pub pixel_height: usize,
	/// size of one Cell in pixel-equivalent units
	pub cell_size: usize,
	/// the step that latitudes and longitudes are rounded to before querying lookup tables
	pub lookup_resolution: f64,
}

impl MapCalibration {
	/// A 550x600 map of the seas around the Indian subcontinent, split into 4x4 Cells.
	pub const INDIAN_OCEAN: MapCalibration = MapCalibration {
		anchors: BorderAnchors::new(37.0, 6.0, 68.0, 97.5),
		pixel_width: 550,
		pixel_height: 600,
		cell_size: 4,
		lookup_resolution: DEFAULT_LOOKUP_RESOLUTION,
	};

	/// A square Grid of `cells`x`cells` Cells covering the region within `anchors`.
	pub fn square(cells: usize, anchors: BorderAnchors) -> MapCalibration {
		MapCalibration {
			anchors,
			pixel_width: cells,
			pixel_height: cells,
			cell_size: 1,
			lookup_resolution: DEFAULT_LOOKUP_RESOLUTION,
		}
	}

	/// The number of columns of the Grid
	pub fn grid_width(&self) -> usize {
		self.pixel_width.checked_div(self.cell_size).unwrap_or(0)
	}

	/// The number of rows of the Grid
	pub fn grid_height(&self) -> usize {
		self.pixel_height.checked_div(self.cell_size).unwrap_or(0)
	}

	/// Checks that the calibration describes a usable Grid.
	pub fn validate(&self) -> Result<()> {
		let invalid = |message: &str| {
			Err(Error::InvalidCalibration {
				message: message.to_string(),
			})
		};
		let a = &self.anchors;
		let all_finite = [
			a.north_latitude,
			a.south_latitude,
			a.west_longitude,
			a.east_longitude,
			self.lookup_resolution,
		]
		.iter()
		.all(|v| v.is_finite());

		if !all_finite {
			return invalid("anchors and resolution must be finite");
		}
		if a.north_latitude <= a.south_latitude {
			return invalid("north anchor must lie north of the south anchor");
		}
		if a.east_longitude <= a.west_longitude {
			return invalid("east anchor must lie east of the west anchor");
		}
		if self.cell_size == 0 {
			return invalid("cell size must be positive");
		}
		if self.grid_width() < 2 || self.grid_height() < 2 {
			return invalid("grid needs at least two rows and two columns");
		}
		if self.lookup_resolution <= 0.0 {
			return invalid("lookup resolution must be positive");
		}
		Ok(())
	}
}

impl Default for MapCalibration {
	fn default() -> MapCalibration {
		MapCalibration::INDIAN_OCEAN
	}
}

/// The number of `resolution` steps from `0` to the multiple of `resolution` nearest to `value`.
///
/// This is the one rounding rule shared by the mapper and both lookup tables.
pub fn snap_steps(value: f64, resolution: f64) -> i64 {
	(value / resolution).round() as i64
}

/// Rounds `value` to the nearest multiple of `resolution`.
pub fn snap(value: f64, resolution: f64) -> f64 {
	snap_steps(value, resolution) as f64 * resolution
}

/// Converts between [`GeoCoordinate`]s and [`GridCell`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
	calibration: MapCalibration,
	width: usize,
	height: usize,
	longitude_step: f64,
	latitude_step: f64,
}

impl CoordinateMapper {
	/// Creates a new CoordinateMapper after validating the `calibration`.
	pub fn new(calibration: MapCalibration) -> Result<CoordinateMapper> {
		calibration.validate()?;
		let width = calibration.grid_width();
		let height = calibration.grid_height();
		let a = &calibration.anchors;

		Ok(CoordinateMapper {
			calibration,
			width,
			height,
			longitude_step: (a.east_longitude - a.west_longitude) / (width - 1) as f64,
			latitude_step: (a.north_latitude - a.south_latitude) / (height - 1) as f64,
		})
	}

	/// The calibration this mapper was created from
	pub fn calibration(&self) -> &MapCalibration {
		&self.calibration
	}

	/// The number of columns of the Grid
	pub fn width(&self) -> usize {
		self.width
	}

	/// The number of rows of the Grid
	pub fn height(&self) -> usize {
		self.height
	}

	/// The size of one Cell as `(longitude, latitude)` degrees
	pub fn cell_span(&self) -> (f64, f64) {
		(self.longitude_step, self.latitude_step)
	}

	/// Returns `true` if `cell` lies on the Grid
	pub fn contains(&self, cell: GridCell) -> bool {
		cell.0 < self.width && cell.1 < self.height
	}

	/// The geographic position of the center of `cell`.
	pub fn grid_to_geo(&self, cell: GridCell) -> GeoCoordinate {
		let a = &self.calibration.anchors;
		GeoCoordinate {
			latitude: a.north_latitude - cell.1 as f64 * self.latitude_step,
			longitude: a.west_longitude + cell.0 as f64 * self.longitude_step,
		}
	}

	/// The Cell closest to `coord`.
	///
	/// Fails with [`Error::OutOfRegion`] if `coord` lies outside the calibrated borders.
	pub fn geo_to_grid(&self, coord: GeoCoordinate) -> Result<GridCell> {
		let a = &self.calibration.anchors;
		let inside = coord.latitude >= a.south_latitude
			&& coord.latitude <= a.north_latitude
			&& coord.longitude >= a.west_longitude
			&& coord.longitude <= a.east_longitude;

		if !inside {
			return Err(Error::OutOfRegion {
				latitude: coord.latitude,
				longitude: coord.longitude,
			});
		}

		let x = ((coord.longitude - a.west_longitude) / self.longitude_step).round() as usize;
		let y = ((a.north_latitude - coord.latitude) / self.latitude_step).round() as usize;

		Ok((x.min(self.width - 1), y.min(self.height - 1)))
	}

	/// Rounds `coord` to the resolution the lookup tables are keyed by.
	pub fn snap_for_lookup(&self, coord: GeoCoordinate) -> GeoCoordinate {
		let resolution = self.calibration.lookup_resolution;
		GeoCoordinate {
			latitude: snap(coord.latitude, resolution),
			longitude: snap(coord.longitude, resolution),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mapper() -> CoordinateMapper {
		CoordinateMapper::new(MapCalibration::default()).unwrap()
	}

	#[test]
	fn corners_match_anchors() {
		let mapper = mapper();
		let a = MapCalibration::INDIAN_OCEAN.anchors;

		assert_eq!(
			mapper.grid_to_geo((0, 0)),
			GeoCoordinate::new(a.north_latitude, a.west_longitude)
		);
		let south_east = mapper.grid_to_geo((136, 149));
		assert!((south_east.latitude - a.south_latitude).abs() < 1e-9);
		assert!((south_east.longitude - a.east_longitude).abs() < 1e-9);
	}

	#[test]
	fn grid_round_trip() {
		let mapper = mapper();
		for x in 0..mapper.width() {
			for y in 0..mapper.height() {
				let geo = mapper.grid_to_geo((x, y));
				assert_eq!(mapper.geo_to_grid(geo).unwrap(), (x, y));
			}
		}
	}

	#[test]
	fn geo_round_trip_within_one_cell() {
		let mapper = mapper();
		let (lon_span, lat_span) = mapper.cell_span();
		let mut lat = 6.0;
		while lat <= 37.0 {
			let mut lon = 68.0;
			while lon <= 97.5 {
				let coord = GeoCoordinate::new(lat, lon);
				let back = mapper.grid_to_geo(mapper.geo_to_grid(coord).unwrap());
				assert!((back.latitude - lat).abs() <= lat_span);
				assert!((back.longitude - lon).abs() <= lon_span);
				lon += 0.37;
			}
			lat += 0.41;
		}
	}

	#[test]
	fn out_of_region() {
		let mapper = mapper();
		for coord in [
			GeoCoordinate::new(40.0, 80.0),
			GeoCoordinate::new(5.0, 80.0),
			GeoCoordinate::new(20.0, 60.0),
			GeoCoordinate::new(20.0, 100.0),
			GeoCoordinate::new(f64::NAN, 80.0),
		] {
			assert!(matches!(
				mapper.geo_to_grid(coord),
				Err(Error::OutOfRegion { .. })
			));
		}
	}

	#[test]
	fn snapping() {
		let mapper = mapper();
		assert_eq!(
			mapper.snap_for_lookup(GeoCoordinate::new(12.13, 70.88)),
			GeoCoordinate::new(12.25, 71.0)
		);
		assert_eq!(snap(5.2, 0.25), 5.25);
		assert_eq!(snap(-0.1, 0.25), 0.0);
		assert_eq!(snap_steps(-0.4, 0.25), -2);
	}

	#[test]
	fn invalid_calibrations() {
		let mut calibration = MapCalibration::default();
		calibration.cell_size = 0;
		assert!(CoordinateMapper::new(calibration).is_err());

		let flipped = MapCalibration::square(10, BorderAnchors::new(0.0, 9.0, 0.0, 9.0));
		assert!(matches!(
			CoordinateMapper::new(flipped),
			Err(Error::InvalidCalibration { .. })
		));

		let tiny = MapCalibration::square(1, BorderAnchors::new(1.0, 0.0, 0.0, 1.0));
		assert!(CoordinateMapper::new(tiny).is_err());
	}
}
