//! Invariant catalog for hosts and the controller tree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::graph::{StackDestination, StackGraph, TabDestination, TabGraph};
use crate::{HostLifecycleEvent, LifecyclePhase, NavBackStack, NavController, NavHostController, Page, StackNavHost, TabNavHost};

fn stack() -> Rc<StackNavHost> {
	let graph = StackGraph::builder()
		.page("home", StackDestination::new())
		.page("detail", StackDestination::new())
		.build();
	StackNavHost::new(NavController::root(), graph, [Page::new("home")]).unwrap()
}

/// Must release the state borrow before publishing or destroying entries.
///
/// - Enforced in: `StackNavHost::commit`, `TabNavHost::commit`, `ListenerSlot::publish`
/// - Failure symptom: `BorrowMutError` panic when a listener or resource destructor
///   navigates from inside the callback.
#[cfg_attr(test, test)]
pub(crate) fn test_listener_may_navigate_reentrantly() {
	let host = stack();
	let weak = Rc::downgrade(&host);
	let depth = Rc::new(Cell::new(0));
	let guard = Rc::clone(&depth);
	host.set_state_changed_listener(Rc::new(move |snapshot: &NavBackStack| {
		if snapshot.len() == 2 && guard.get() == 0 {
			guard.set(1);
			if let Some(host) = weak.upgrade() {
				assert!(host.go_back());
			}
		}
	}));
	host.navigate_to("detail", None, false).unwrap();
	assert_eq!(host.back_stack().page_types(), vec!["home"]);
	assert_eq!(depth.get(), 1);
}

/// Must never let an entry be more alive than its host.
///
/// - Enforced in: `LifecyclePhase::capped_to`, stack and tab `recompute`
/// - Failure symptom: a backgrounded screen keeps a resumed page running.
#[cfg_attr(test, test)]
pub(crate) fn test_started_host_never_resumes_entries() {
	let host = stack();
	host.on_host_lifecycle_event(HostLifecycleEvent::Paused);
	host.navigate_to("detail", None, false).unwrap();
	host.on_transition_finished();
	assert!(host.back_stack().entries().iter().all(|e| e.phase() <= LifecyclePhase::Started));
}

/// Must destroy a removed stack entry only after the transition settles, and
/// only once.
///
/// - Enforced in: `TransitionState::settle`, `StackNavHost::on_transition_finished`
/// - Failure symptom: exit animation renders a released page, or resources drop twice.
#[cfg_attr(test, test)]
pub(crate) fn test_popped_entry_outlives_its_exit_transition() {
	let host = stack();
	host.navigate_to("detail", None, false).unwrap();
	let detail = Rc::clone(&host.back_stack().entries()[1]);
	let drops = Rc::new(RefCell::new(0));
	struct Count(Rc<RefCell<u32>>);
	impl Drop for Count {
		fn drop(&mut self) {
			*self.0.borrow_mut() += 1;
		}
	}
	detail.resources_mut().insert(Count(Rc::clone(&drops))).unwrap();

	assert!(host.go_back());
	assert!(!detail.is_destroyed());
	host.on_transition_finished();
	host.on_transition_finished();
	assert!(detail.is_destroyed());
	assert_eq!(*drops.borrow(), 1);
}

/// Must publish the default tab first in every tab snapshot.
///
/// - Enforced in: `TabState::snapshot`
/// - Failure symptom: repeated back presses exit the tab host from a non-default tab.
#[cfg_attr(test, test)]
pub(crate) fn test_tab_snapshot_starts_with_default() {
	let graph = TabGraph::builder()
		.tab("main", TabDestination::new())
		.tab("explore", TabDestination::new())
		.build()
		.unwrap();
	let host = TabNavHost::new(NavController::root(), graph);
	host.navigate_to("explore", None, true).unwrap();
	assert_eq!(host.back_stack().page_types(), vec!["main", "explore"]);
}

/// Must hold the attached host weakly.
///
/// - Enforced in: `NavController::attach`
/// - Failure symptom: hosts and their entries leak through a controller cycle.
#[cfg_attr(test, test)]
pub(crate) fn test_controller_does_not_keep_host_alive() {
	let nav = NavController::root();
	let host = stack();
	nav.attach(&host);
	let weak = Rc::downgrade(&host);
	drop(host);
	assert!(weak.upgrade().is_none());
	assert!(!nav.has_host());
}
