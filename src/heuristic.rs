//! The precomputed desirability of every region of the map.

use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, trace, warn};
use serde::Deserialize;

use crate::geo::GeoCoordinate;
use crate::table::{open_optional, read_rows, LookupTable};
use crate::Result;

/// The value returned for positions the table does not know.
pub const DEFAULT_HEURISTIC: f64 = 0.5;

#[derive(Deserialize)]
struct HeuristicRow {
	longitude: f64,
	latitude: f64,
	#[serde(alias = "value")]
	heuristic: f64,
}

/// A read-only mapping from geographic regions to a traversal-desirability score in `[0, 1]`.
///
/// Lower scores are more favorable. The table is produced offline and may be empty or cover
/// only part of the map: every position it does not know resolves to [`DEFAULT_HEURISTIC`].
///
/// ## Examples
/// ```
/// # use vessel_routing::{geo::GeoCoordinate, heuristic::HeuristicField};
/// let field = HeuristicField::from_entries(0.25, [(GeoCoordinate::new(5.25, 69.75), 0.1)]);
///
/// assert_eq!(field.value_at(GeoCoordinate::new(5.3, 69.8)), 0.1);
/// assert_eq!(field.value_at(GeoCoordinate::new(20.0, 80.0)), 0.5);
/// assert_eq!(field.misses(), 1);
/// ```
#[derive(Debug)]
pub struct HeuristicField {
	table: LookupTable<f64>,
	misses: AtomicUsize,
}

impl HeuristicField {
	/// Creates a field without any entries
	pub fn empty(resolution: f64) -> HeuristicField {
		HeuristicField::from_table(LookupTable::new(resolution))
	}

	/// Creates a field from `(position, score)` pairs. Scores are clamped into `[0, 1]`.
	pub fn from_entries(
		resolution: f64,
		entries: impl IntoIterator<Item = (GeoCoordinate, f64)>,
	) -> HeuristicField {
		let mut clamped = 0;
		let table = LookupTable::from_entries(
			resolution,
			entries.into_iter().map(|(coord, value)| {
				let valid = if value.is_nan() { DEFAULT_HEURISTIC } else { value };
				let fixed = valid.clamp(0.0, 1.0);
				if fixed != value {
					clamped += 1;
				}
				(coord, fixed)
			}),
		);
		if clamped > 0 {
			warn!("clamped {} heuristic values into [0, 1]", clamped);
		}
		HeuristicField::from_table(table)
	}

	fn from_table(table: LookupTable<f64>) -> HeuristicField {
		HeuristicField {
			table,
			misses: AtomicUsize::new(0),
		}
	}

	/// Reads a CSV table with the columns `longitude,latitude,heuristic`.
	pub fn from_reader(resolution: f64, reader: impl Read) -> Result<HeuristicField> {
		let rows: Vec<HeuristicRow> = read_rows(reader)?;
		Ok(HeuristicField::from_entries(
			resolution,
			rows.into_iter()
				.map(|row| (GeoCoordinate::new(row.latitude, row.longitude), row.heuristic)),
		))
	}

	/// Reads a CSV table from `path`. A missing file yields an empty field.
	pub fn from_path(resolution: f64, path: &Path) -> Result<HeuristicField> {
		let Some(file) = open_optional(path, "heuristic table")? else {
			return Ok(HeuristicField::empty(resolution));
		};
		let field = HeuristicField::from_reader(resolution, file)?;
		info!(
			"loaded {} heuristic values from {}",
			field.len(),
			path.display()
		);
		Ok(field)
	}

	/// The score of the region around `coord`, or [`DEFAULT_HEURISTIC`] if it is unknown.
	pub fn value_at(&self, coord: GeoCoordinate) -> f64 {
		self.lookup(coord).unwrap_or_else(|| {
			self.misses.fetch_add(1, Ordering::Relaxed);
			DEFAULT_HEURISTIC
		})
	}

	/// The score of the region around `coord`, if the table knows it.
	///
	/// Unlike [`value_at`](HeuristicField::value_at), a miss is not added to
	/// [`misses`](HeuristicField::misses).
	pub fn lookup(&self, coord: GeoCoordinate) -> Option<f64> {
		let value = self.table.get(coord).copied();
		if value.is_none() {
			trace!(
				"no heuristic value for ({}, {}), using {}",
				coord.latitude,
				coord.longitude,
				DEFAULT_HEURISTIC
			);
		}
		value
	}

	/// How many [`value_at`](HeuristicField::value_at) lookups fell back to the default so far
	pub fn misses(&self) -> usize {
		self.misses.load(Ordering::Relaxed)
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
