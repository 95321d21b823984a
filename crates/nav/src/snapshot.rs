//! Published back-stack snapshots.

use std::fmt;
use std::rc::Rc;

use crate::entry::NavEntry;
use crate::graph::{GraphError, StackGraph};

/// Immutable view of a host's back stack, root first.
///
/// Entries are shared with the host, so [`NavEntry::phase`] reflects the
/// latest recomputation even on an older snapshot.
#[derive(Clone, Default)]
pub struct NavBackStack {
	entries: Vec<Rc<NavEntry>>,
	can_go_back: bool,
}

impl NavBackStack {
	pub(crate) fn new(entries: Vec<Rc<NavEntry>>, can_go_back: bool) -> Self {
		Self { entries, can_go_back }
	}

	pub fn entries(&self) -> &[Rc<NavEntry>] {
		&self.entries
	}

	/// Whether the publishing host can handle a back request itself.
	pub fn can_go_back(&self) -> bool {
		self.can_go_back
	}

	pub fn top(&self) -> Option<&Rc<NavEntry>> {
		self.entries.last()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, entry: &NavEntry) -> bool {
		self.entries.iter().any(|e| **e == *entry)
	}

	/// Page types, root first.
	pub fn page_types(&self) -> Vec<&str> {
		self.entries.iter().map(|e| e.page_type()).collect()
	}

	/// Entries the renderer has to draw, bottom first.
	///
	/// That is the top entry, plus the one beneath it when the top is
	/// transparent.
	///
	/// # Errors
	///
	/// - [`GraphError::TransparentRoot`] if the only entry is transparent.
	/// - [`GraphError::UnknownDestination`] if the top entry is not in `graph`.
	pub fn visible_entries(&self, graph: &StackGraph) -> Result<&[Rc<NavEntry>], GraphError> {
		let Some(top) = self.top() else {
			return Ok(&[]);
		};
		let len = self.entries.len();
		if !graph.destination_for(top.page_type())?.is_transparent {
			return Ok(&self.entries[len - 1..]);
		}
		if len < 2 {
			return Err(GraphError::TransparentRoot);
		}
		Ok(&self.entries[len - 2..])
	}
}

impl PartialEq for NavBackStack {
	fn eq(&self, other: &Self) -> bool {
		self.can_go_back == other.can_go_back
			&& self.entries.len() == other.entries.len()
			&& self.entries.iter().zip(&other.entries).all(|(a, b)| a.id() == b.id())
	}
}

impl fmt::Debug for NavBackStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavBackStack")
			.field("entries", &self.page_types())
			.field("can_go_back", &self.can_go_back)
			.finish()
	}
}
