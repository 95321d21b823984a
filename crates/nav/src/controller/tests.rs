use std::cell::RefCell;

use pretty_assertions::assert_eq;

use super::*;
use crate::graph::{StackDestination, StackGraph, TabDestination, TabGraph};
use crate::host::{StackNavHost, TabNavHost};

fn stack_graph(types: &[&str]) -> StackGraph {
	types
		.iter()
		.fold(StackGraph::builder(), |b, t| b.page(*t, StackDestination::new()))
		.build()
}

fn stack_host(nav: &NavController, types: &[&str]) -> Rc<StackNavHost> {
	let host = StackNavHost::new(nav.clone(), stack_graph(types), [Page::new(types[0])]).unwrap();
	nav.attach(&host);
	host
}

#[test]
fn attach_publishes_the_current_state() {
	let nav = NavController::root();
	let _host = stack_host(&nav, &["home", "detail"]);
	assert!(nav.has_host());
	assert_eq!(nav.state().page_types(), vec!["home"]);
	assert!(!nav.can_go_back());

	nav.navigate("detail").unwrap();
	assert_eq!(nav.state().page_types(), vec!["home", "detail"]);
	assert!(nav.can_go_back());
}

#[test]
fn state_can_be_held_across_navigation() {
	let nav = NavController::root();
	let _host = stack_host(&nav, &["home", "detail"]);

	let state = nav.state();
	if !state.can_go_back() {
		nav.navigate("detail").unwrap();
	}
	assert_eq!(state.page_types(), vec!["home"], "held snapshot is unchanged");
	assert_eq!(nav.state().page_types(), vec!["home", "detail"]);
}

#[test]
fn attaching_replaces_and_silences_the_previous_host() {
	let nav = NavController::root();
	let first = stack_host(&nav, &["home", "detail"]);
	let second = stack_host(&nav, &["feed"]);
	assert_eq!(nav.state().page_types(), vec!["feed"]);

	first.navigate_to("detail", None, false).unwrap();
	assert_eq!(nav.state().page_types(), vec!["feed"], "detached host must not publish here");
	assert!(!nav.detach(&first));
	assert!(nav.detach(&second));
	assert!(!nav.has_host());
	assert!(nav.state().is_empty());
}

#[test]
fn dropped_host_counts_as_detached() {
	let nav = NavController::root();
	let host = stack_host(&nav, &["home"]);
	drop(host);
	assert!(!nav.has_host());
	assert!(nav.state().is_empty());
	assert_eq!(
		nav.navigate("home"),
		Err(NavError::Unreachable {
			page_type: "home".into()
		})
	);
	assert!(!nav.go_back());
}

#[test]
fn requests_bubble_to_the_parent() {
	let root = NavController::root();
	let root_host = stack_host(&root, &["home", "settings"]);
	let home = Rc::clone(&root_host.back_stack().entries()[0]);

	let child = home.controller();
	let tabs = TabNavHost::new(
		child.clone(),
		TabGraph::builder()
			.tab("main", TabDestination::new())
			.tab("explore", TabDestination::new())
			.build()
			.unwrap(),
	);
	child.attach(&tabs);

	child.navigate("explore").unwrap();
	assert_eq!(child.state().page_types(), vec!["main", "explore"]);

	child.navigate("settings").unwrap();
	assert_eq!(root.state().page_types(), vec!["home", "settings"]);

	assert!(child.go_back(), "tab host handles its own back first");
	assert_eq!(child.state().page_types(), vec!["main"]);
	assert!(child.go_back(), "then the parent stack pops");
	assert_eq!(root.state().page_types(), vec!["home"]);
	assert!(!child.go_back());

	assert_eq!(
		child.navigate("nowhere"),
		Err(NavError::Unreachable {
			page_type: "nowhere".into()
		})
	);
	assert_eq!(
		child.pop_up_to("nowhere"),
		Err(NavError::UnknownPageType {
			page_type: "nowhere".into()
		})
	);
}

#[test]
fn observers_follow_state_until_removed() {
	let nav = NavController::root();
	let _host = stack_host(&nav, &["home", "detail"]);
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	let id = nav.observe(move |snapshot| sink.borrow_mut().push(snapshot.len()));

	nav.navigate("detail").unwrap();
	assert!(nav.go_back());
	assert!(nav.unobserve(id));
	assert!(!nav.unobserve(id));
	nav.navigate("detail").unwrap();
	assert_eq!(*seen.borrow(), vec![2, 1]);
}

#[test]
fn depth_and_identity() {
	let root = NavController::root();
	let child = NavController::child(&root);
	let grandchild = NavController::child(&child);
	assert_eq!(grandchild.depth(), 2);
	assert!(grandchild.parent().is_some_and(|p| p.same_as(&child)));
	assert!(root.parent().is_none());
	assert!(!child.same_as(&root));
	assert!(child.clone().same_as(&child));
}

#[test]
fn pop_up_to_skips_torn_down_hosts() {
	let root = NavController::root();
	let root_host = stack_host(&root, &["home", "settings"]);
	let home = Rc::clone(&root_host.back_stack().entries()[0]);
	let child = home.controller();
	let nested = stack_host(&child, &["feed", "settings"]);

	nested.teardown();
	root.navigate("settings").unwrap();
	child.pop_up_to("settings").unwrap();
	assert_eq!(root.state().page_types(), vec!["home", "settings"], "the live parent served it");

	root_host.teardown();
	assert_eq!(
		child.pop_up_to("home"),
		Err(NavError::UnknownPageType {
			page_type: "home".into()
		})
	);
}
