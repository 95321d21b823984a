use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use super::*;

struct DropProbe {
	name: &'static str,
	log: Rc<RefCell<Vec<&'static str>>>,
}

impl Drop for DropProbe {
	fn drop(&mut self) {
		self.log.borrow_mut().push(self.name);
	}
}

struct First(#[allow(dead_code, reason = "held for its drop")] DropProbe);
struct Second(#[allow(dead_code, reason = "held for its drop")] DropProbe);

fn entry(page_type: &str) -> Rc<NavEntry> {
	NavEntry::new(0, page_type, None, &NavController::root())
}

#[test]
fn equality_ignores_ordinal_and_phase() {
	let nav = NavController::root();
	let a = NavEntry::new(1, "home", None, &nav);
	let b = NavEntry::new(1, "home", None, &nav);
	assert_ne!(*a, *b, "distinct ids are distinct entries");

	a.set_phase(LifecyclePhase::Resumed);
	let same = Rc::clone(&a);
	assert_eq!(*a, *same);

	let set: HashSet<_> = [Rc::clone(&a), Rc::clone(&b), same].into_iter().collect();
	assert_eq!(set.len(), 2);
}

#[test]
fn destroy_releases_resources_newest_first_exactly_once() {
	let log = Rc::new(RefCell::new(Vec::new()));
	let e = entry("detail");
	e.resources_mut()
		.insert(First(DropProbe {
			name: "first",
			log: Rc::clone(&log),
		}))
		.unwrap();
	e.resources_mut()
		.insert(Second(DropProbe {
			name: "second",
			log: Rc::clone(&log),
		}))
		.unwrap();

	assert!(e.destroy());
	assert!(!e.destroy());
	assert_eq!(*log.borrow(), vec!["second", "first"]);
	assert!(e.is_destroyed());
	assert!(e.resources().is_released());
	assert!(e.resources().get::<First>().is_none());
}

#[test]
fn destroyed_is_terminal() {
	let e = entry("detail");
	e.set_phase(LifecyclePhase::Resumed);
	e.destroy();
	e.set_phase(LifecyclePhase::Resumed);
	assert_eq!(e.phase(), LifecyclePhase::Destroyed);
}

#[test]
fn writes_after_release_are_rejected() {
	let e = entry("detail");
	e.destroy();
	assert_eq!(e.resources_mut().insert(5u32), Err(ResourceError::Released));
	assert!(e.resources_mut().get_or_insert_with(|| 5u32).is_err());
}

#[test]
fn resource_destructor_may_reach_back_into_entry() {
	struct Peek {
		entry: std::rc::Weak<NavEntry>,
		saw_released: Rc<Cell<bool>>,
	}
	impl Drop for Peek {
		fn drop(&mut self) {
			if let Some(entry) = self.entry.upgrade() {
				self.saw_released.set(entry.resources().is_released());
			}
		}
	}

	let e = entry("detail");
	let saw_released = Rc::new(Cell::new(false));
	e.resources_mut()
		.insert(Peek {
			entry: Rc::downgrade(&e),
			saw_released: Rc::clone(&saw_released),
		})
		.unwrap();
	e.destroy();
	assert!(saw_released.get());
}

#[test]
fn get_or_insert_with_is_stable() {
	let e = entry("home");
	*e.resources_mut().get_or_insert_with(|| 1u32).unwrap() += 1;
	assert_eq!(*e.resources_mut().get_or_insert_with(|| 100u32).unwrap(), 2);
	assert_eq!(e.resources_mut().remove::<u32>(), Some(2));
	assert!(e.resources().is_empty());
}

#[test]
fn nested_controller_is_lazy_and_parented() {
	let nav = NavController::root();
	let e = NavEntry::new(0, "home", None, &nav);
	let child = e.controller();
	assert!(child.parent().is_some_and(|p| p.same_as(&nav)));
	assert!(e.controller().same_as(&child));
	assert_eq!(child.depth(), 1);
}

#[test]
fn args_downcast() {
	let nav = NavController::root();
	let e = NavEntry::new(0, "detail", Some(PageArgs::new(42u64)), &nav);
	assert_eq!(e.args().and_then(|a| a.downcast_ref::<u64>()), Some(&42));
	assert!(e.args().is_some_and(|a| !a.is::<String>()));
}

#[test]
fn destroy_while_resources_borrowed_releases_after_the_borrow() {
	let log = Rc::new(RefCell::new(Vec::new()));
	let e = entry("detail");
	e.resources_mut()
		.insert(First(DropProbe {
			name: "first",
			log: Rc::clone(&log),
		}))
		.unwrap();

	let held = e.resources();
	assert!(e.destroy());
	assert!(e.is_destroyed());
	assert!(held.contains::<First>(), "values survive while borrowed");
	assert!(log.borrow().is_empty());
	drop(held);

	assert!(e.resources().is_released());
	assert_eq!(*log.borrow(), vec!["first"]);
	assert!(!e.destroy());
	assert_eq!(log.borrow().len(), 1);
}

#[test]
fn registry_release_drops_newest_first_and_seals() {
	let log = Rc::new(RefCell::new(Vec::new()));
	let mut registry = ResourceRegistry::new();
	registry
		.insert(First(DropProbe {
			name: "first",
			log: Rc::clone(&log),
		}))
		.unwrap();
	registry
		.insert(Second(DropProbe {
			name: "second",
			log: Rc::clone(&log),
		}))
		.unwrap();

	assert!(registry.release());
	assert_eq!(*log.borrow(), vec!["second", "first"]);
	assert!(registry.is_released());
	assert!(registry.is_empty());
	assert!(!registry.release(), "second release is a no-op");
	assert_eq!(registry.insert(1u8), Err(ResourceError::Released));
}
