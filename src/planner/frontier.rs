use crate::{path::Cost, GridCell};

use std::cmp::Ordering;

/// An entry of the search frontier.
///
/// Entries are ordered by ascending `priority`, then by ascending `cell.0`, then by ascending
/// `cell.1`, so that two equally scored Cells are always expanded in the same order. Inside a
/// [`BinaryHeap`](std::collections::BinaryHeap) the entry that comes first in this order is
/// popped first.
#[derive(Clone, Copy, Debug)]
pub struct FrontierEntry {
	pub priority: f64,
	pub cell: GridCell,
	pub g_score: Cost,
}

impl FrontierEntry {
	fn frontier_order(&self, rhs: &Self) -> Ordering {
		self.priority
			.total_cmp(&rhs.priority)
			.then_with(|| self.cell.0.cmp(&rhs.cell.0))
			.then_with(|| self.cell.1.cmp(&rhs.cell.1))
			.then_with(|| self.g_score.total_cmp(&rhs.g_score))
	}
}

impl PartialEq for FrontierEntry {
	fn eq(&self, rhs: &Self) -> bool {
		self.cmp(rhs) == Ordering::Equal
	}
}
impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
	fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
		Some(self.cmp(rhs))
	}
}
impl Ord for FrontierEntry {
	fn cmp(&self, rhs: &Self) -> Ordering {
		// BinaryHeap pops the greatest element
		rhs.frontier_order(self)
	}
}
