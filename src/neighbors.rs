//! How a vessel can move between Cells of the Grid.

use crate::GridCell;

/// The eight compass directions as `(dx, dy)`, in the order they are expanded.
pub const COMPASS_DIRECTIONS: [(isize, isize); 8] = [
	(0, 1),
	(1, 0),
	(0, -1),
	(-1, 0),
	(1, 1),
	(-1, -1),
	(1, -1),
	(-1, 1),
];

/// The straight-line distance between two Cells, in Cells.
pub fn euclidean(a: GridCell, b: GridCell) -> f64 {
	let dx = a.0 as f64 - b.0 as f64;
	let dy = a.1 as f64 - b.1 as f64;
	dx.hypot(dy)
}

/// A Neighborhood for vessels moving along the 4 cardinal directions and the 4 diagonals.
///
/// Also known as [Moore Neighborhood](https://en.wikipedia.org/wiki/Moore_neighborhood).
/// Diagonal steps cost `√2`, straight steps cost `1`.
///
/// ```no_code
/// V: Vessel, o: reachable in one step
/// o o o
///  \|/
/// o-V-o
///  /|\
/// o o o
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompassNeighborhood {
	width: usize,
	height: usize,
}

impl CompassNeighborhood {
	/// Creates a new CompassNeighborhood.
	///
	/// `width` and `height` are the size of the Grid to move on.
	pub fn new(width: usize, height: usize) -> CompassNeighborhood {
		CompassNeighborhood { width, height }
	}

	/// All Neighbors of `cell` that lie on the Grid, with the step `(dx, dy)` that reaches them.
	///
	/// Note that this does not check whether a Neighbor is blocked.
	pub fn neighbors(
		&self,
		cell: GridCell,
	) -> impl Iterator<Item = (GridCell, (isize, isize))> {
		let (width, height) = (self.width, self.height);

		COMPASS_DIRECTIONS
			.into_iter()
			.map(move |(dx, dy)| ((cell.0 as isize + dx, cell.1 as isize + dy), (dx, dy)))
			.filter(move |((x, y), _)| {
				*x >= 0 && *y >= 0 && (*x as usize) < width && (*y as usize) < height
			})
			.map(|((x, y), step)| ((x as usize, y as usize), step))
	}
}
