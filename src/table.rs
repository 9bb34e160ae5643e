//! Read-only lookup tables keyed by snapped geographic coordinates.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::de::DeserializeOwned;

use crate::geo::{snap_steps, GeoCoordinate};
use crate::Result;

/// The key of a [`LookupTable`] entry.
///
/// Stores `(longitude, latitude)` as whole multiples of the table resolution, so that two
/// coordinates snapping to the same position always produce the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
	longitude_steps: i64,
	latitude_steps: i64,
}

impl LookupKey {
	/// Snaps `coord` to `resolution` and returns the resulting key.
	pub fn new(coord: GeoCoordinate, resolution: f64) -> LookupKey {
		LookupKey {
			longitude_steps: snap_steps(coord.longitude, resolution),
			latitude_steps: snap_steps(coord.latitude, resolution),
		}
	}

	/// The snapped coordinate this key stands for
	pub fn coordinate(&self, resolution: f64) -> GeoCoordinate {
		GeoCoordinate::new(
			self.latitude_steps as f64 * resolution,
			self.longitude_steps as f64 * resolution,
		)
	}
}

/// An immutable mapping from snapped geographic coordinates to values.
#[derive(Clone, Debug)]
pub struct LookupTable<V> {
	entries: hashbrown::HashMap<LookupKey, V>,
	resolution: f64,
}

impl<V> LookupTable<V> {
	/// Creates an empty LookupTable with the given `resolution` in degrees.
	pub fn new(resolution: f64) -> LookupTable<V> {
		LookupTable {
			entries: hashbrown::HashMap::new(),
			resolution,
		}
	}

	/// Creates a LookupTable from `(position, value)` pairs.
	///
	/// Later entries replace earlier ones that snap to the same key.
	pub fn from_entries(
		resolution: f64,
		entries: impl IntoIterator<Item = (GeoCoordinate, V)>,
	) -> LookupTable<V> {
		let mut table = LookupTable::new(resolution);
		for (coord, value) in entries {
			table.insert(coord, value);
		}
		table
	}

	fn insert(&mut self, coord: GeoCoordinate, value: V) {
		let key = LookupKey::new(coord, self.resolution);
		self.entries.insert(key, value);
	}

	/// The value stored for the snapped position of `coord`
	pub fn get(&self, coord: GeoCoordinate) -> Option<&V> {
		self.entries.get(&LookupKey::new(coord, self.resolution))
	}

	/// The resolution of the keys in degrees
	pub fn resolution(&self) -> f64 {
		self.resolution
	}

	/// The number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the table has no entries
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Deserializes every row of a CSV document with a header line.
pub(crate) fn read_rows<T: DeserializeOwned>(reader: impl Read) -> Result<Vec<T>> {
	let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
	let mut rows = vec![];
	for row in csv_reader.deserialize() {
		rows.push(row?);
	}
	Ok(rows)
}

/// Opens `path`, treating a missing file as an absent resource.
pub(crate) fn open_optional(path: &Path, resource: &str) -> Result<Option<File>> {
	match File::open(path) {
		Ok(file) => Ok(Some(file)),
		Err(err) if err.kind() == io::ErrorKind::NotFound => {
			warn!(
				"no {} found at {}, continuing without it",
				resource,
				path.display()
			);
			Ok(None)
		}
		Err(err) => Err(err.into()),
	}
}
