use std::rc::Rc;

use crate::entry::NavEntry;

/// Whether a rendered transition is running, and which removed entries wait
/// for it to finish before they are destroyed.
#[derive(Debug, Default)]
pub(crate) enum TransitionState {
	#[default]
	Stable,
	Pending {
		deferred: Vec<Rc<NavEntry>>,
	},
}

impl TransitionState {
	pub(crate) fn is_pending(&self) -> bool {
		matches!(self, Self::Pending { .. })
	}

	pub(crate) fn begin(&mut self) {
		if let Self::Stable = self {
			*self = Self::Pending { deferred: Vec::new() };
		}
	}

	/// Starts a transition if none runs and queues `entry` for cleanup.
	pub(crate) fn defer(&mut self, entry: Rc<NavEntry>) {
		self.begin();
		if let Self::Pending { deferred } = self
			&& !deferred.contains(&entry)
		{
			deferred.push(entry);
		}
	}

	pub(crate) fn deferred(&self) -> &[Rc<NavEntry>] {
		match self {
			Self::Stable => &[],
			Self::Pending { deferred } => deferred,
		}
	}

	/// Returns to [`Self::Stable`], handing back the deferred entries.
	///
	/// `None` if no transition was pending.
	pub(crate) fn settle(&mut self) -> Option<Vec<Rc<NavEntry>>> {
		match std::mem::take(self) {
			Self::Stable => None,
			Self::Pending { deferred } => Some(deferred),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::controller::NavController;

	#[test]
	fn defers_accumulate_until_settled_once() {
		let nav = NavController::root();
		let a = NavEntry::new(0, "a", None, &nav);
		let b = NavEntry::new(1, "b", None, &nav);

		let mut state = TransitionState::default();
		assert!(!state.is_pending());
		state.defer(Rc::clone(&a));
		state.defer(Rc::clone(&b));
		state.defer(Rc::clone(&a));
		assert_eq!(state.deferred().len(), 2);

		let flushed = state.settle().unwrap();
		assert_eq!(flushed, vec![a, b]);
		assert!(state.settle().is_none());
		assert!(state.deferred().is_empty());
	}

	#[test]
	fn begin_keeps_existing_deferrals() {
		let nav = NavController::root();
		let mut state = TransitionState::default();
		state.defer(NavEntry::new(0, "a", None, &nav));
		state.begin();
		assert_eq!(state.deferred().len(), 1);
	}
}
