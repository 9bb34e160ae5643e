use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::GridCell;

/// Receives the progress of a search, e.g. to visualize it.
///
/// Both callbacks are invoked synchronously from within the search loop, so they should return
/// quickly. The default implementations do nothing.
pub trait SearchObserver {
	/// `cell` was taken from the frontier and is about to be expanded
	fn cell_popped(&mut self, cell: GridCell) {
		let _ = cell;
	}
	/// `cell` was reached with a better g-score through `from` and queued with `priority`
	fn cell_relaxed(&mut self, from: GridCell, cell: GridCell, priority: f64) {
		let _ = (from, cell, priority);
	}
}

impl SearchObserver for () {}

/// A flag that stops a running search at its next expansion.
///
/// Clones share the same flag, so one clone can be handed to the search while another one is
/// kept to cancel it from a different thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	/// Creates a new CancelToken that is not cancelled
	pub fn new() -> CancelToken {
		CancelToken::default()
	}

	/// Requests every search watching this token to stop
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	/// Returns `true` once [`cancel`](CancelToken::cancel) was called on any clone
	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}
