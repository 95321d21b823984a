//! Tab host: one cached entry per tab, visited in recency order.

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::transition::TransitionState;
use super::{HostOptions, ListenerSlot, NavHostController, StateListener};
use crate::back_stack::BackStack;
use crate::controller::NavController;
use crate::entry::{NavEntry, PageArgs};
use crate::error::{NavError, Result};
use crate::graph::TabGraph;
use crate::lifecycle::{LifecyclePhase, target_phase};
use crate::snapshot::NavBackStack;

/// Host switching between a fixed set of tabs.
///
/// Tab entries are created on first visit and live until teardown; switching
/// tabs only moves them between resumed and started. The default tab is the
/// root: published snapshots always start with it.
pub struct TabNavHost {
	nav: NavController,
	graph: TabGraph,
	state: RefCell<TabState>,
	listener: ListenerSlot,
}

struct TabState {
	cache: IndexMap<String, Rc<NavEntry>>,
	stack: BackStack<Rc<NavEntry>>,
	default_entry: Rc<NavEntry>,
	next_ordinal: u64,
	transition: TransitionState,
	host_phase: LifecyclePhase,
	torn_down: bool,
}

impl TabState {
	fn entry_for(&mut self, nav: &NavController, tab_type: &str, args: Option<PageArgs>) -> Rc<NavEntry> {
		if let Some(entry) = self.cache.get(tab_type) {
			return Rc::clone(entry);
		}
		let entry = NavEntry::new(self.next_ordinal, tab_type, args, nav);
		self.next_ordinal += 1;
		self.cache.insert(tab_type.to_string(), Rc::clone(&entry));
		entry
	}

	fn is_default_on_top(&self) -> bool {
		self.stack.peek() == Some(&self.default_entry)
	}

	/// Pops back to the default tab; a root other than the default is swapped
	/// for it.
	fn unwind_to_default(&mut self) {
		let default = Rc::clone(&self.default_entry);
		self.stack.pop_until(|top| *top == default);
		if !self.is_default_on_top() {
			let _ = self.stack.replace(default);
		}
	}

	fn open(&mut self, entry: Rc<NavEntry>, replace: bool) {
		if self.stack.peek() == Some(&entry) {
			return;
		}
		if replace {
			self.stack.remove_first(|_, e| *e == entry);
			if self.stack.replace(Rc::clone(&entry)).is_err() {
				self.stack.push(entry);
			}
		} else if self.stack.bring_to_front(&entry).is_err() {
			self.stack.push(entry);
		}
	}

	fn can_go_back(&self) -> bool {
		!self.torn_down && (self.stack.can_pop() || !self.is_default_on_top())
	}

	fn recompute(&self) {
		let pending = self.transition.is_pending();
		let top = self.stack.peek();
		for entry in self.cache.values() {
			entry.set_phase(target_phase(Some(entry) == top, pending).capped_to(self.host_phase));
		}
	}

	fn snapshot(&self) -> NavBackStack {
		if self.torn_down {
			return NavBackStack::default();
		}
		let mut entries = Vec::with_capacity(self.stack.len() + 1);
		if self.stack.bottom() != Some(&self.default_entry) {
			entries.push(Rc::clone(&self.default_entry));
		}
		entries.extend(self.stack.iter().cloned());
		NavBackStack::new(entries, self.can_go_back())
	}
}

impl TabNavHost {
	/// Creates a host showing the graph's default tab.
	pub fn new(nav: NavController, graph: TabGraph) -> Rc<Self> {
		Self::with_options(nav, graph, HostOptions::default())
	}

	pub fn with_options(nav: NavController, graph: TabGraph, options: HostOptions) -> Rc<Self> {
		let default_entry = NavEntry::new(0, graph.default_tab(), graph.default_tab_args().cloned(), &nav);
		let mut cache = IndexMap::new();
		cache.insert(graph.default_tab().to_string(), Rc::clone(&default_entry));
		let state = TabState {
			cache,
			stack: std::iter::once(Rc::clone(&default_entry)).collect(),
			default_entry,
			next_ordinal: 1,
			transition: TransitionState::Stable,
			host_phase: options.initial_host_phase,
			torn_down: false,
		};
		state.recompute();
		tracing::debug!(depth = nav.depth(), default_tab = graph.default_tab(), "tab host created");
		Rc::new(Self {
			nav,
			graph,
			state: RefCell::new(state),
			listener: ListenerSlot::default(),
		})
	}

	pub fn graph(&self) -> &TabGraph {
		&self.graph
	}

	/// Cached entry for `tab_type`, if the tab was ever visited.
	pub fn entry(&self, tab_type: &str) -> Option<Rc<NavEntry>> {
		self.state.borrow().cache.get(tab_type).cloned()
	}

	/// Every tab entry created so far, in creation order.
	pub fn cached_entries(&self) -> Vec<Rc<NavEntry>> {
		self.state.borrow().cache.values().cloned().collect()
	}

	/// Internal recency stack, without the default-tab prefix added to
	/// snapshots.
	pub fn recency_stack(&self) -> Vec<Rc<NavEntry>> {
		self.state.borrow().stack.snapshot()
	}

	pub fn is_transition_pending(&self) -> bool {
		self.state.borrow().transition.is_pending()
	}

	fn ensure_live(&self) -> Result<()> {
		if self.state.borrow().torn_down {
			return Err(NavError::TornDown);
		}
		Ok(())
	}

	fn commit(&self, mutate: impl FnOnce(&mut TabState)) {
		let snapshot = {
			let mut state = self.state.borrow_mut();
			mutate(&mut state);
			state.recompute();
			state.snapshot()
		};
		self.listener.publish(&snapshot);
	}
}

impl NavHostController for TabNavHost {
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
		tracing::debug!(tab = %page_type, replace, "tab navigate");
		let is_default = page_type == self.graph.default_tab();
		let nav = &self.nav;
		self.commit(|state| {
			if is_default {
				state.unwind_to_default();
			} else {
				let entry = state.entry_for(nav, page_type, args);
				state.open(entry, replace);
			}
			state.transition.begin();
		});
		Ok(())
	}

	fn can_go_back(&self) -> bool {
		self.state.borrow().can_go_back()
	}

	fn go_back(&self) -> bool {
		if self.is_torn_down() || !self.can_go_back() {
			return false;
		}
		tracing::debug!("tab go back");
		self.commit(|state| {
			if state.stack.pop().is_err() {
				let default = Rc::clone(&state.default_entry);
				let _ = state.stack.replace(default);
			}
			state.transition.begin();
		});
		true
	}

	fn pop_up_to(&self, page_type: &str) -> Result<bool> {
		self.ensure_live()?;
		if !self.graph.has_page_type(page_type) {
			return Ok(false);
		}
		let present = self.state.borrow().stack.iter().any(|e| e.page_type() == page_type);
		if !present {
			tracing::debug!(tab = %page_type, "tab absent, unwinding to default first");
			let nav = &self.nav;
			self.commit(|state| {
				state.unwind_to_default();
				if page_type != state.default_entry.page_type() {
					let entry = state.entry_for(nav, page_type, None);
					state.open(entry, false);
				}
				state.transition.begin();
			});
			return Ok(true);
		}
		tracing::debug!(tab = %page_type, "tab pop up to");
		self.commit(|state| {
			state.stack.pop_until(|top| top.page_type() == page_type);
			state.transition.begin();
		});
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
			state.transition.settle();
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
		tracing::debug!(%phase, "tab host phase changed");
		self.commit(|state| state.host_phase = phase);
	}

	fn teardown(&self) {
		let destroyed: Vec<_> = {
			let mut state = self.state.borrow_mut();
			if state.torn_down {
				return;
			}
			state.torn_down = true;
			state.stack.clear();
			state.transition.settle();
			state.cache.drain(..).map(|(_, entry)| entry).rev().collect()
		};
		tracing::debug!(count = destroyed.len(), "tab host torn down");
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

impl Drop for TabNavHost {
	fn drop(&mut self) {
		self.teardown();
	}
}
