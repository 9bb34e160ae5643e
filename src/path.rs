//! The Route returned by the [`Planner`](crate::planner::Planner).

/// a Type to represent the Cost of travelling along a Path, in Cells
pub type Cost = f64;

/// A Path across the Grid
///
/// Stores the sequence of Nodes after the start in `path` and the g-score recorded for each of
/// them in `costs`. The start itself is not part of the Path, so the Path of a search whose start
/// is its goal is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<P> {
	/// the Path, from the first step up to and including the goal
	pub path: Vec<P>,
	/// the accumulated Cost on arrival at the Node with the same index
	pub costs: Vec<Cost>,
}

impl<P> Path<P> {
	/// creates a new Path with the given sequence of Nodes and their accumulated Costs
	/// ## Examples
	/// Basic usage:
	/// ```
	/// # use vessel_routing::path::Path;
	/// let path = Path::new(vec!['a', 'b', 'c'], vec![1.0, 2.0, 3.5]);
	///
	/// assert_eq!(path.path, vec!['a', 'b', 'c']);
	/// assert_eq!(path.cost(), 3.5);
	/// ```
	pub fn new(path: Vec<P>, costs: Vec<Cost>) -> Path<P> {
		debug_assert_eq!(path.len(), costs.len(), "every Node needs a Cost");
		Path { path, costs }
	}

	/// creates a Path without any steps
	pub fn empty() -> Path<P> {
		Path::new(vec![], vec![])
	}

	/// the total Cost of the Path
	pub fn cost(&self) -> Cost {
		self.costs.last().copied().unwrap_or(0.0)
	}

	/// Iterates over the Nodes together with their accumulated Cost
	pub fn steps(&self) -> impl Iterator<Item = (&P, Cost)> + '_ {
		self.path.iter().zip(self.costs.iter().copied())
	}
}

use std::ops::{Deref, Index};

impl<P> Index<usize> for Path<P> {
	type Output = P;
	fn index(&self, index: usize) -> &P {
		&self.path[index]
	}
}

impl<P> Deref for Path<P> {
	type Target = [P];
	fn deref(&self) -> &[P] {
		&self.path
	}
}

use std::fmt;
impl<P: fmt::Debug> fmt::Display for Path<P> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "Path[Cost = {:.3}]: ", self.cost())?;
		if self.path.is_empty() {
			write!(fmt, "<empty>")
		} else {
			write!(fmt, "{:?}", self.path[0])?;
			for p in self.path.iter().skip(1) {
				write!(fmt, " -> {:?}", p)?;
			}
			Ok(())
		}
	}
}
