use std::cell::Cell;

use pretty_assertions::assert_eq;

use super::*;
use crate::graph::TabDestination;
use crate::lifecycle::HostLifecycleEvent;

fn host() -> Rc<TabNavHost> {
	let _ = tracing_subscriber::fmt::try_init();
	let graph = TabGraph::builder()
		.default_tab("main", TabDestination::new(), Some(PageArgs::new("feed")))
		.tab("explore", TabDestination::new())
		.tab("profile", TabDestination::new())
		.build()
		.unwrap();
	TabNavHost::new(NavController::root(), graph)
}

fn types(host: &TabNavHost) -> Vec<String> {
	host.back_stack().page_types().into_iter().map(str::to_string).collect()
}

fn recency(host: &TabNavHost) -> Vec<String> {
	host.recency_stack().iter().map(|e| e.page_type().to_string()).collect()
}

#[test]
fn default_tab_is_created_eagerly_with_its_args() {
	let host = host();
	let main = host.entry("main").unwrap();
	assert_eq!(main.args().and_then(|a| a.downcast_ref::<&str>()), Some(&"feed"));
	assert!(main.is_resumed());
	assert_eq!(types(&host), vec!["main"]);
	assert!(!host.can_go_back());
	assert!(host.entry("explore").is_none());
}

#[test]
fn entries_are_cached_per_tab() {
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	let explore = host.entry("explore").unwrap();
	host.navigate_to("profile", None, false).unwrap();
	host.navigate_to("explore", None, false).unwrap();

	assert_eq!(recency(&host), vec!["main", "profile", "explore"]);
	assert!(Rc::ptr_eq(&explore, &host.entry("explore").unwrap()));
	assert_eq!(host.cached_entries().len(), 3);
}

#[test]
fn only_the_current_tab_resumes_after_the_transition() {
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	let main = host.entry("main").unwrap();
	let explore = host.entry("explore").unwrap();
	assert_eq!(explore.phase(), LifecyclePhase::Started);

	host.on_transition_finished();
	assert!(explore.is_resumed());
	assert_eq!(main.phase(), LifecyclePhase::Started);

	host.navigate_to("main", None, false).unwrap();
	host.on_transition_finished();
	assert!(main.is_resumed());
	assert_eq!(explore.phase(), LifecyclePhase::Started, "off-stack tabs keep being recomputed");
	assert_eq!(recency(&host), vec!["main"]);
}

#[test]
fn back_from_lone_non_default_returns_to_default() {
	let host = host();
	host.navigate_to("explore", None, true).unwrap();
	assert_eq!(recency(&host), vec!["explore"]);
	assert_eq!(types(&host), vec!["main", "explore"]);
	assert!(host.can_go_back());

	assert!(host.go_back());
	assert_eq!(recency(&host), vec!["main"]);
	assert!(!host.go_back());
}

#[test]
fn replace_removes_other_occurrences() {
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	host.navigate_to("profile", None, false).unwrap();
	host.navigate_to("explore", None, true).unwrap();
	assert_eq!(recency(&host), vec!["main", "explore"]);
}

#[test]
fn navigate_to_default_swaps_a_foreign_root() {
	let host = host();
	host.navigate_to("explore", None, true).unwrap();
	host.navigate_to("profile", None, false).unwrap();
	host.navigate_to("main", None, false).unwrap();
	assert_eq!(recency(&host), vec!["main"]);
	assert_eq!(types(&host), vec!["main"]);
}

#[test]
fn pop_up_to_present_and_absent() {
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	host.navigate_to("profile", None, false).unwrap();
	assert_eq!(host.pop_up_to("explore"), Ok(true));
	assert_eq!(recency(&host), vec!["main", "explore"]);

	assert_eq!(host.pop_up_to("profile"), Ok(true));
	assert_eq!(recency(&host), vec!["main", "profile"]);

	assert_eq!(host.pop_up_to("settings"), Ok(false));
}

#[test]
fn pop_up_to_default_matches_navigate_to_default() {
	let scripted = |finish: &dyn Fn(&TabNavHost)| {
		let host = host();
		host.navigate_to("explore", None, true).unwrap();
		host.navigate_to("profile", None, false).unwrap();
		finish(host.as_ref());
		(recency(&host), types(&host), host.can_go_back())
	};
	let via_pop = scripted(&|h| assert_eq!(h.pop_up_to("main"), Ok(true)));
	let via_navigate = scripted(&|h| h.navigate_to("main", None, false).unwrap());
	assert_eq!(via_pop, via_navigate);
}

#[test]
fn host_phase_caps_every_cached_tab() {
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	host.on_transition_finished();
	host.on_host_lifecycle_event(HostLifecycleEvent::Paused);
	assert!(host.cached_entries().iter().all(|e| e.phase() == LifecyclePhase::Started));
	host.on_host_lifecycle_event(HostLifecycleEvent::Resumed);
	assert!(host.entry("explore").unwrap().is_resumed());
}

#[test]
fn teardown_releases_every_cached_tab_once() {
	struct Marker(Rc<Cell<u32>>);
	impl Drop for Marker {
		fn drop(&mut self) {
			self.0.set(self.0.get() + 1);
		}
	}

	let released = Rc::new(Cell::new(0));
	let host = host();
	host.navigate_to("explore", None, false).unwrap();
	host.navigate_to("main", None, false).unwrap();
	let cached = host.cached_entries();
	for entry in &cached {
		entry.resources_mut().insert(Marker(Rc::clone(&released))).unwrap();
	}

	host.teardown();
	host.teardown();
	assert_eq!(released.get(), 2);
	assert!(cached.iter().all(|e| e.is_destroyed()));
	assert!(host.back_stack().is_empty());
	assert_eq!(host.pop_up_to("main"), Err(NavError::TornDown));
}
