//! Back-stack entries.
//!
//! A [`NavEntry`] is one occurrence of a page on a back stack. Its identity
//! ([`EntryId`], ordinal, page type, args) is fixed at creation; its
//! [`LifecyclePhase`] and [`ResourceRegistry`] are mutated by the owning host
//! only.
//!
//! Entries are shared as `Rc<NavEntry>` between the host's stack and the
//! published snapshots, so phase reads always observe the latest value.

mod resources;
#[cfg(test)]
mod tests;

use std::any::Any;
use std::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub use resources::{ResourceError, ResourceRegistry};
use uuid::Uuid;

use crate::controller::NavController;
use crate::lifecycle::LifecyclePhase;

/// Unique entry identifier; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
	pub(crate) fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl fmt::Display for EntryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

/// Opaque navigation payload handed to an entry.
#[derive(Clone)]
pub struct PageArgs(Rc<dyn Any>);

impl PageArgs {
	pub fn new<T: Any>(value: T) -> Self {
		Self(Rc::new(value))
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref()
	}

	pub fn is<T: Any>(&self) -> bool {
		self.0.is::<T>()
	}
}

impl fmt::Debug for PageArgs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PageArgs(..)")
	}
}

/// Data half of a destination: what to open and with which args.
#[derive(Debug, Clone)]
pub struct Page {
	pub page_type: String,
	pub args: Option<PageArgs>,
}

impl Page {
	pub fn new(page_type: impl Into<String>) -> Self {
		Self {
			page_type: page_type.into(),
			args: None,
		}
	}

	pub fn with_args(mut self, args: PageArgs) -> Self {
		self.args = Some(args);
		self
	}
}

impl From<&str> for Page {
	fn from(page_type: &str) -> Self {
		Page::new(page_type)
	}
}

impl From<String> for Page {
	fn from(page_type: String) -> Self {
		Page::new(page_type)
	}
}

/// One occurrence of a page on a back stack.
///
/// Equality and hashing use [`EntryId`] only.
pub struct NavEntry {
	id: EntryId,
	ordinal: u64,
	page_type: String,
	args: Option<PageArgs>,
	phase: Cell<LifecyclePhase>,
	resources: RefCell<ResourceRegistry>,
	/// Set when the entry was destroyed while its resources were borrowed.
	release_pending: Cell<bool>,
	/// Controller of the host owning this entry.
	parent: NavController,
	/// Controller for hosts nested inside this entry, created on first use.
	controller: OnceCell<NavController>,
}

impl NavEntry {
	pub(crate) fn new(ordinal: u64, page_type: &str, args: Option<PageArgs>, parent: &NavController) -> Rc<Self> {
		let entry = Rc::new(Self {
			id: EntryId::generate(),
			ordinal,
			page_type: page_type.to_string(),
			args,
			phase: Cell::new(LifecyclePhase::Initialized),
			resources: RefCell::new(ResourceRegistry::new()),
			release_pending: Cell::new(false),
			parent: parent.clone(),
			controller: OnceCell::new(),
		});
		tracing::trace!(%entry, ordinal, "entry created");
		entry
	}

	pub fn id(&self) -> EntryId {
		self.id
	}

	/// Creation order within the owning host. Used for z-ordering only.
	pub fn ordinal(&self) -> u64 {
		self.ordinal
	}

	pub fn page_type(&self) -> &str {
		&self.page_type
	}

	pub fn args(&self) -> Option<&PageArgs> {
		self.args.as_ref()
	}

	pub fn phase(&self) -> LifecyclePhase {
		self.phase.get()
	}

	pub fn is_destroyed(&self) -> bool {
		self.phase.get() == LifecyclePhase::Destroyed
	}

	pub fn is_resumed(&self) -> bool {
		self.phase.get() == LifecyclePhase::Resumed
	}

	/// Controller for navigation hosts rendered inside this entry.
	///
	/// Its parent is the controller of the host owning this entry, so requests
	/// the nested host cannot serve bubble up.
	pub fn controller(&self) -> NavController {
		self.controller
			.get_or_init(|| NavController::child(&self.parent))
			.clone()
	}

	/// Controller of the host owning this entry.
	pub fn parent_controller(&self) -> &NavController {
		&self.parent
	}

	/// Borrows the entry's resources.
	///
	/// The entry may be destroyed while the borrow is held; its resources are
	/// then released on the next access after the borrow ends.
	///
	/// # Panics
	///
	/// Panics if the registry is mutably borrowed.
	pub fn resources(&self) -> Ref<'_, ResourceRegistry> {
		self.flush_pending_release();
		self.resources.borrow()
	}

	/// Mutably borrows the entry's resources.
	///
	/// # Panics
	///
	/// Panics if the registry is already borrowed.
	pub fn resources_mut(&self) -> RefMut<'_, ResourceRegistry> {
		self.flush_pending_release();
		self.resources.borrow_mut()
	}

	fn flush_pending_release(&self) {
		if !self.release_pending.get() {
			return;
		}
		let Ok(mut registry) = self.resources.try_borrow_mut() else {
			return;
		};
		let released = registry.take_all();
		drop(registry);
		self.release_pending.set(false);
		tracing::debug!(entry = %self, resources = released.len(), "released resources after borrow ended");
		drop(released);
	}

	/// Applies `phase` unless the entry is already destroyed.
	pub(crate) fn set_phase(&self, phase: LifecyclePhase) {
		let current = self.phase.get();
		if current == phase {
			return;
		}
		if current == LifecyclePhase::Destroyed {
			tracing::trace!(entry = %self, ?phase, "ignoring phase change on destroyed entry");
			return;
		}
		tracing::trace!(entry = %self, from = %current, to = %phase, "entry phase changed");
		self.phase.set(phase);
	}

	/// Releases resources and marks the entry destroyed.
	///
	/// Returns `false` if the entry was already destroyed. Values are dropped
	/// after the registry borrow ends. If a caller still borrows the registry,
	/// release is postponed to the next access.
	pub(crate) fn destroy(&self) -> bool {
		if self.is_destroyed() {
			return false;
		}
		let released = match self.resources.try_borrow_mut() {
			Ok(mut registry) => registry.take_all(),
			Err(_) => {
				tracing::debug!(entry = %self, "resources borrowed during destroy, release postponed");
				self.release_pending.set(true);
				Vec::new()
			}
		};
		let count = released.len();
		drop(released);
		self.phase.set(LifecyclePhase::Destroyed);
		tracing::debug!(entry = %self, resources = count, "entry destroyed");
		true
	}
}

impl PartialEq for NavEntry {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for NavEntry {}

impl Hash for NavEntry {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for NavEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "NavEntry:{}/{}", self.page_type, self.id)
	}
}

impl fmt::Debug for NavEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavEntry")
			.field("id", &self.id)
			.field("ordinal", &self.ordinal)
			.field("page_type", &self.page_type)
			.field("phase", &self.phase.get())
			.finish_non_exhaustive()
	}
}
