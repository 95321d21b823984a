//! Linear page-history host.


use std::cell::RefCell;
use std::rc::Rc;

use super::transition::TransitionState;
use super::{HostOptions, ListenerSlot, NavHostController, StateListener};
use crate::back_stack::BackStack;
use crate::controller::NavController;
use crate::entry::{NavEntry, Page, PageArgs};
use crate::error::{NavError, Result};
use crate::graph::StackGraph;
use crate::lifecycle::{LifecyclePhase, target_phase};
use crate::snapshot::NavBackStack;

/// Host keeping a linear history of pages.
///
/// Removed entries stay alive, capped at [`LifecyclePhase::Started`], until
/// the renderer reports the exit transition finished. Dropping the host tears
/// it down.
pub struct StackNavHost {
	nav: NavController,
	graph: StackGraph,
	state: RefCell<StackState>,
	listener: ListenerSlot,
}

struct StackState {
	stack: BackStack<Rc<NavEntry>>,
	next_ordinal: u64,
	transition: TransitionState,
	host_phase: LifecyclePhase,
	torn_down: bool,
}

impl StackState {
	fn new_entry(&mut self, nav: &NavController, page_type: &str, args: Option<PageArgs>) -> Rc<NavEntry> {
		let ordinal = self.next_ordinal;
		self.next_ordinal += 1;
		NavEntry::new(ordinal, page_type, args, nav)
	}

	/// Parks a removed entry until the running transition settles.
	fn defer(&mut self, entry: Rc<NavEntry>) {
		entry.set_phase(LifecyclePhase::Started.capped_to(self.host_phase));
		self.transition.defer(entry);
	}

	fn recompute(&self) {
		let pending = self.transition.is_pending();
		let top = self.stack.last_index();
		for (index, entry) in self.stack.iter().enumerate() {
			entry.set_phase(target_phase(Some(index) == top, pending).capped_to(self.host_phase));
		}
		for entry in self.transition.deferred() {
			entry.set_phase(LifecyclePhase::Started.capped_to(self.host_phase));
		}
	}

	fn snapshot(&self) -> NavBackStack {
		NavBackStack::new(self.stack.snapshot(), self.stack.can_pop())
	}

	fn contains_type(&self, page_type: &str) -> bool {
		self.stack.iter().any(|e| e.page_type() == page_type)
	}
}

impl StackNavHost {
	/// Creates a host seeded with `initial`, root first.
	///
	/// # Errors
	///
	/// - [`NavError::EmptyInitialStack`] if `initial` yields nothing.
	/// - [`NavError::NotRegistered`] if an initial page is not in `graph`.
	pub fn new(nav: NavController, graph: StackGraph, initial: impl IntoIterator<Item = Page>) -> Result<Rc<Self>> {
		Self::with_options(nav, graph, initial, HostOptions::default())
	}

	/// [`Self::new`] with explicit [`HostOptions`].
	///
	/// # Errors
	///
	/// Same as [`Self::new`].
	pub fn with_options(
		nav: NavController,
		graph: StackGraph,
		initial: impl IntoIterator<Item = Page>,
		options: HostOptions,
	) -> Result<Rc<Self>> {
		let mut state = StackState {
			stack: BackStack::new(),
			next_ordinal: 0,
			transition: TransitionState::Stable,
			host_phase: options.initial_host_phase,
			torn_down: false,
		};
		for page in initial {
			if !graph.has_page_type(&page.page_type) {
				return Err(NavError::NotRegistered {
					page_type: page.page_type,
				});
			}
			let entry = state.new_entry(&nav, &page.page_type, page.args);
			state.stack.push(entry);
		}
		if state.stack.is_empty() {
			return Err(NavError::EmptyInitialStack);
		}
		state.recompute();
		tracing::debug!(depth = nav.depth(), entries = state.stack.len(), "stack host created");
		Ok(Rc::new(Self {
			nav,
			graph,
			state: RefCell::new(state),
			listener: ListenerSlot::default(),
		}))
	}

	pub fn graph(&self) -> &StackGraph {
		&self.graph
	}

	/// Removed entries still waiting for the transition to finish.
	pub fn deferred_entries(&self) -> Vec<Rc<NavEntry>> {
		self.state.borrow().transition.deferred().to_vec()
	}

	pub fn is_transition_pending(&self) -> bool {
		self.state.borrow().transition.is_pending()
	}

	/// Visible entries of the current stack, for rendering.
	///
	/// # Errors
	///
	/// See [`NavBackStack::visible_entries`].
	pub fn visible_entries(&self) -> Result<Vec<Rc<NavEntry>>> {
		let snapshot = self.state.borrow().snapshot();
		Ok(snapshot.visible_entries(&self.graph)?.to_vec())
	}

	fn ensure_live(&self) -> Result<()> {
		if self.state.borrow().torn_down {
			return Err(NavError::TornDown);
		}
		Ok(())
	}

	/// Runs `mutate`, recomputes phases, then destroys whatever `mutate`
	/// returned and publishes, both after the state borrow is released.
	fn commit(&self, mutate: impl FnOnce(&mut StackState) -> Vec<Rc<NavEntry>>) {
		let (destroyed, snapshot) = {
			let mut state = self.state.borrow_mut();
			let destroyed = mutate(&mut state);
			state.recompute();
			(destroyed, state.snapshot())
		};
		for entry in &destroyed {
			entry.destroy();
		}
		self.listener.publish(&snapshot);
	}

	fn push_or_replace(&self, page_type: &str, args: Option<PageArgs>, replace: bool) -> Result<()> {
		let single_instance = self.graph.destination_for(page_type)?.is_single_instance;
		let nav = &self.nav;
		self.commit(|state| {
			let entry = state.new_entry(nav, page_type, args);
			let replaced = if replace {
				state.stack.replace(entry).ok()
			} else {
				state.stack.push(entry);
				None
			};
			if let Some(replaced) = replaced {
				state.defer(replaced);
			}
			if single_instance {
				let top = state.stack.last_index();
				while let Some(earlier) = state
					.stack
					.remove_first(|index, e| Some(index) != top && e.page_type() == page_type)
				{
					tracing::trace!(entry = %earlier, "removing earlier single-instance entry");
					state.defer(earlier);
				}
			}
			state.transition.begin();
			Vec::new()
		});
		Ok(())
	}
}

impl NavHostController for StackNavHost {
	fn set_state_changed_listener(&self, listener: StateListener) {
		self.listener.set(listener);
		let snapshot = self.state.borrow().snapshot();
		self.listener.publish(&snapshot);
	}

	fn clear_state_changed_listener(&self) {
		self.listener.clear();
	}

	fn can_navigate_to(&self, page_type: &str) -> bool {
		!self.is_torn_down() && self.graph.has_page_type(page_type)
	}

	fn navigate_to(&self, page_type: &str, args: Option<PageArgs>, replace: bool) -> Result<()> {
		self.ensure_live()?;
		if !self.graph.has_page_type(page_type) {
			return Err(NavError::NotRegistered {
				page_type: page_type.to_string(),
			});
		}
		tracing::debug!(%page_type, replace, "stack navigate");
		self.push_or_replace(page_type, args, replace)
	}

	fn can_go_back(&self) -> bool {
		self.state.borrow().stack.can_pop()
	}

	fn go_back(&self) -> bool {
		if self.is_torn_down() || !self.can_go_back() {
			return false;
		}
		tracing::debug!("stack go back");
		self.commit(|state| {
			if let Ok(popped) = state.stack.pop() {
				state.defer(popped);
			}
			Vec::new()
		});
		true
	}

	fn pop_up_to(&self, page_type: &str) -> Result<bool> {
		self.ensure_live()?;
		if !self.graph.has_page_type(page_type) {
			return Ok(false);
		}
		if self.state.borrow().contains_type(page_type) {
			tracing::debug!(%page_type, "stack pop up to");
			self.commit(|state| {
				for popped in state.stack.pop_until(|top| top.page_type() == page_type) {
					state.defer(popped);
				}
				state.transition.begin();
				Vec::new()
			});
			return Ok(true);
		}

		tracing::debug!(%page_type, "stack reset before navigating");
		let cleared = self.state.borrow_mut().stack.clear();
		for entry in cleared.iter().rev() {
			entry.destroy();
		}
		self.push_or_replace(page_type, None, false)?;
		Ok(true)
	}

	fn back_stack(&self) -> NavBackStack {
		self.state.borrow().snapshot()
	}

	fn on_transition_finished(&self) {
		if !self.is_transition_pending() {
			return;
		}
		self.commit(|state| {
			let flushed = state.transition.settle().unwrap_or_default();
			tracing::trace!(count = flushed.len(), "transition finished");
			flushed
		});
	}

	fn on_render_detached(&self) {
		tracing::trace!("render detached");
		self.on_transition_finished();
	}

	fn on_host_phase_changed(&self, phase: LifecyclePhase) {
		if self.is_torn_down() {
			return;
		}
		tracing::debug!(%phase, "stack host phase changed");
		self.commit(|state| {
			state.host_phase = phase;
			Vec::new()
		});
	}

	fn teardown(&self) {
		let destroyed = {
			let mut state = self.state.borrow_mut();
			if state.torn_down {
				return;
			}
			state.torn_down = true;
			let mut destroyed = state.stack.clear();
			destroyed.reverse();
			destroyed.extend(state.transition.settle().unwrap_or_default());
			destroyed
		};
		tracing::debug!(count = destroyed.len(), "stack host torn down");
		for entry in &destroyed {
			entry.destroy();
		}
		self.listener.publish(&NavBackStack::default());
		self.listener.clear();
	}

	fn host_phase(&self) -> LifecyclePhase {
		self.state.borrow().host_phase
	}

	fn is_torn_down(&self) -> bool {
		self.state.borrow().torn_down
	}

	fn nav_controller(&self) -> &NavController {
		&self.nav
	}
}

impl Drop for StackNavHost {
	fn drop(&mut self) {
		self.teardown();
	}
}
