//! The dominant wind direction across the map.

use std::io::Read;
use std::path::Path;

use log::{info, trace, warn};
use serde::Deserialize;

use crate::geo::GeoCoordinate;
use crate::table::{open_optional, read_rows, LookupTable};
use crate::Result;

/// The bearing returned for positions the table does not know.
pub const DEFAULT_BEARING: f64 = 0.0;

/// Half the width of the window around the wind bearing that counts as aligned, in degrees.
pub const ALIGNMENT_TOLERANCE: f64 = 25.0;

#[derive(Deserialize)]
struct WindRow {
	longitude: f64,
	latitude: f64,
	#[serde(rename = "wind_direction_10m_dominant", alias = "bearing")]
	bearing: f64,
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
	let normalized = degrees.rem_euclid(360.0);
	// rem_euclid may round up to exactly 360 for tiny negative inputs
	if normalized >= 360.0 {
		0.0
	} else {
		normalized
	}
}

/// The direction of a movement by `(dx, dy)` in whole degrees `[0, 360)`, measured as
/// `atan2(dy, dx)`.
pub fn movement_angle((dx, dy): (isize, isize)) -> f64 {
	normalize_degrees((dy as f64).atan2(dx as f64).to_degrees().round())
}

/// Returns `true` if `angle` lies within `bearing ± tolerance`, wrapping around `0°`/`360°`.
///
/// ## Examples
/// ```
/// # use vessel_routing::wind::bearing_in_window;
/// // the window [330°, 20°] crosses north
/// assert!(bearing_in_window(355.0, 340.0, 25.0));
/// assert!(bearing_in_window(355.0, 10.0, 25.0));
/// assert!(!bearing_in_window(355.0, 200.0, 25.0));
/// ```
pub fn bearing_in_window(bearing: f64, angle: f64, tolerance: f64) -> bool {
	let angle = normalize_degrees(angle);
	let lower = normalize_degrees(bearing - tolerance);
	let upper = normalize_degrees(bearing + tolerance);

	if lower <= upper {
		lower <= angle && angle <= upper
	} else {
		angle >= lower || angle <= upper
	}
}

/// A read-only mapping from geographic regions to the dominant wind bearing.
///
/// Every position the table does not know resolves to [`DEFAULT_BEARING`].
#[derive(Clone, Debug)]
pub struct WindField {
	table: LookupTable<f64>,
	tolerance: f64,
}

impl WindField {
	/// Creates a field without any entries
	pub fn empty(resolution: f64) -> WindField {
		WindField {
			table: LookupTable::new(resolution),
			tolerance: ALIGNMENT_TOLERANCE,
		}
	}

	/// Creates a field from `(position, bearing)` pairs. Bearings are normalized into `[0, 360)`.
	pub fn from_entries(
		resolution: f64,
		entries: impl IntoIterator<Item = (GeoCoordinate, f64)>,
	) -> WindField {
		let mut dropped = 0;
		let table = LookupTable::from_entries(
			resolution,
			entries.into_iter().filter_map(|(coord, bearing)| {
				if bearing.is_finite() {
					Some((coord, normalize_degrees(bearing)))
				} else {
					dropped += 1;
					None
				}
			}),
		);
		if dropped > 0 {
			warn!("dropped {} wind bearings that were not finite", dropped);
		}
		WindField {
			table,
			tolerance: ALIGNMENT_TOLERANCE,
		}
	}

	/// Replaces the alignment tolerance (defaults to [`ALIGNMENT_TOLERANCE`])
	pub fn with_tolerance(mut self, tolerance: f64) -> WindField {
		self.tolerance = tolerance;
		self
	}

	/// Reads a CSV table with the columns `longitude,latitude,wind_direction_10m_dominant`.
	pub fn from_reader(resolution: f64, reader: impl Read) -> Result<WindField> {
		let rows: Vec<WindRow> = read_rows(reader)?;
		Ok(WindField::from_entries(
			resolution,
			rows.into_iter()
				.map(|row| (GeoCoordinate::new(row.latitude, row.longitude), row.bearing)),
		))
	}

	/// Reads a CSV table from `path`. A missing file yields an empty field.
	pub fn from_path(resolution: f64, path: &Path) -> Result<WindField> {
		let Some(file) = open_optional(path, "wind table")? else {
			return Ok(WindField::empty(resolution));
		};
		let field = WindField::from_reader(resolution, file)?;
		info!("loaded {} wind bearings from {}", field.len(), path.display());
		Ok(field)
	}

	/// The dominant wind bearing around `coord` in degrees `[0, 360)`.
	pub fn dominant_bearing_at(&self, coord: GeoCoordinate) -> f64 {
		match self.table.get(coord) {
			Some(&bearing) => bearing,
			None => {
				trace!(
					"no wind bearing for ({}, {}), using {}",
					coord.latitude,
					coord.longitude,
					DEFAULT_BEARING
				);
				DEFAULT_BEARING
			}
		}
	}

	/// Returns `true` if moving by `movement` at `coord` goes along the local wind.
	pub fn is_aligned(&self, coord: GeoCoordinate, movement: (isize, isize)) -> bool {
		bearing_in_window(
			self.dominant_bearing_at(coord),
			movement_angle(movement),
			self.tolerance,
		)
	}

	/// The half width of the alignment window in degrees
	pub fn tolerance(&self) -> f64 {
		self.tolerance
	}

	/// The number of known regions
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// Returns `true` if no region is known
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn movement_angles() {
		assert_eq!(movement_angle((1, 0)), 0.0);
		assert_eq!(movement_angle((1, 1)), 45.0);
		assert_eq!(movement_angle((0, 1)), 90.0);
		assert_eq!(movement_angle((-1, 0)), 180.0);
		assert_eq!(movement_angle((0, -1)), 270.0);
		assert_eq!(movement_angle((1, -1)), 315.0);
	}

	#[test]
	fn window_wraps_around_north() {
		for angle in [335.0, 340.0, 350.0, 359.9, 0.0, 5.0, 15.0, 20.0] {
			assert!(bearing_in_window(355.0, angle, 25.0), "{}", angle);
		}
		for angle in [200.0, 329.0, 21.0, 90.0, 180.0] {
			assert!(!bearing_in_window(355.0, angle, 25.0), "{}", angle);
		}
		// the window [350°, 15°]
		assert!(bearing_in_window(2.5, 355.0, 12.5));
		assert!(bearing_in_window(2.5, 5.0, 12.5));
		assert!(!bearing_in_window(2.5, 20.0, 12.5));
	}

	#[test]
	fn window_without_wrap() {
		assert!(bearing_in_window(90.0, 65.0, 25.0));
		assert!(bearing_in_window(90.0, 115.0, 25.0));
		assert!(!bearing_in_window(90.0, 116.0, 25.0));
		assert!(!bearing_in_window(90.0, 270.0, 25.0));
	}

	#[test]
	fn aligned_with_local_wind() {
		let field = WindField::from_entries(
			1.0,
			[
				(GeoCoordinate::new(0.0, 0.0), 90.0),
				(GeoCoordinate::new(0.0, 1.0), -45.0),
			],
		);
		assert_eq!(field.dominant_bearing_at(GeoCoordinate::new(0.0, 1.0)), 315.0);
		assert!(field.is_aligned(GeoCoordinate::new(0.0, 0.0), (0, 1)));
		assert!(!field.is_aligned(GeoCoordinate::new(0.0, 0.0), (1, 0)));
		assert!(field.is_aligned(GeoCoordinate::new(0.0, 1.0), (1, -1)));
		assert!(!field.is_aligned(GeoCoordinate::new(0.0, 1.0), (1, 0)));

		// unknown positions fall back to a bearing of 0°
		assert!(field.is_aligned(GeoCoordinate::new(9.0, 9.0), (1, 0)));
		assert!(!field.is_aligned(GeoCoordinate::new(9.0, 9.0), (0, 1)));
	}

	#[test]
	fn tolerance_is_configurable() {
		let field = WindField::empty(1.0).with_tolerance(50.0);
		assert_eq!(field.tolerance(), 50.0);
		assert!(field.is_aligned(GeoCoordinate::new(0.0, 0.0), (1, 1)));
		assert!(!WindField::empty(1.0).is_aligned(GeoCoordinate::new(0.0, 0.0), (1, 1)));
	}

	#[test]
	fn csv_table() {
		let csv = "longitude,latitude,wind_direction_10m_dominant\n69.875,5.25,270\n";
		let field = WindField::from_reader(0.125, csv.as_bytes()).unwrap();
		assert_eq!(field.len(), 1);
		assert_eq!(
			field.dominant_bearing_at(GeoCoordinate::new(5.25, 69.875)),
			270.0
		);
		assert_eq!(field.dominant_bearing_at(GeoCoordinate::new(5.25, 70.5)), 0.0);
	}
}
