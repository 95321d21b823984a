//! Navigation controllers.
//!
//! A [`NavController`] is the handle screens navigate with. Controllers form a
//! tree mirroring host nesting: the controller of a nested host is the child
//! of the controller owning the entry it is rendered in. A request the
//! attached host cannot serve walks up the parent chain.
//!
//! The attached host is held weakly; a dropped host counts as detached.

#[cfg(test)]
mod tests;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::entry::{Page, PageArgs};
use crate::error::{NavError, Result};
use crate::host::{NavHostController, StateListener};
use crate::snapshot::NavBackStack;

/// Observer registration handle returned by [`NavController::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Shared handle to one node of the controller tree.
#[derive(Clone)]
pub struct NavController {
	inner: Rc<ControllerInner>,
}

struct ControllerInner {
	parent: Option<NavController>,
	depth: usize,
	host: RefCell<Option<Weak<dyn NavHostController>>>,
	state: RefCell<NavBackStack>,
	observers: RefCell<IndexMap<ObserverId, StateListener>>,
	next_observer: Cell<u64>,
}

impl NavController {
	/// Controller at the top of a tree.
	pub fn root() -> Self {
		Self::with_parent(None)
	}

	/// Controller whose unhandled requests go to `parent`.
	pub fn child(parent: &NavController) -> Self {
		Self::with_parent(Some(parent.clone()))
	}

	fn with_parent(parent: Option<NavController>) -> Self {
		let depth = parent.as_ref().map_or(0, |p| p.depth() + 1);
		Self {
			inner: Rc::new(ControllerInner {
				parent,
				depth,
				host: RefCell::new(None),
				state: RefCell::new(NavBackStack::default()),
				observers: RefCell::new(IndexMap::new()),
				next_observer: Cell::new(0),
			}),
		}
	}

	pub fn parent(&self) -> Option<&NavController> {
		self.inner.parent.as_ref()
	}

	/// Distance from the root; the root is at depth 0.
	pub fn depth(&self) -> usize {
		self.inner.depth
	}

	/// Returns `true` if both handles point at the same controller.
	pub fn same_as(&self, other: &NavController) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Attaches `host`, detaching whichever host was attached before.
	///
	/// The host publishes its current snapshot into this controller right away.
	pub fn attach<H: NavHostController + 'static>(&self, host: &Rc<H>) {
		if let Some(previous) = self.attached_host() {
			self.release_host(&previous);
		}
		let host: Rc<dyn NavHostController> = host.clone();
		*self.inner.host.borrow_mut() = Some(Rc::downgrade(&host));
		tracing::debug!(depth = self.depth(), "host attached");

		let weak = Rc::downgrade(&self.inner);
		host.set_state_changed_listener(Rc::new(move |snapshot: &NavBackStack| {
			if let Some(inner) = weak.upgrade() {
				NavController { inner }.on_state_changed(snapshot);
			}
		}));
	}

	/// Detaches `host` if it is the attached one. Returns whether it was.
	pub fn detach<H: NavHostController + 'static>(&self, host: &Rc<H>) -> bool {
		let host: Rc<dyn NavHostController> = host.clone();
		match self.attached_host() {
			Some(current) if same_host(&current, &host) => {
				self.release_host(&current);
				true
			}
			_ => false,
		}
	}

	fn release_host(&self, host: &Rc<dyn NavHostController>) {
		host.clear_state_changed_listener();
		self.inner.host.borrow_mut().take();
		self.on_state_changed(&NavBackStack::default());
		tracing::debug!(depth = self.depth(), "host detached");
	}

	/// Currently attached host, if it is still alive.
	pub fn attached_host(&self) -> Option<Rc<dyn NavHostController>> {
		self.inner.host.borrow().as_ref().and_then(Weak::upgrade)
	}

	pub fn has_host(&self) -> bool {
		self.attached_host().is_some()
	}

	/// Latest snapshot published by the attached host.
	///
	/// The snapshot is a copy; holding it across navigation is fine.
	pub fn state(&self) -> NavBackStack {
		self.inner.state.borrow().clone()
	}

	/// Whether the attached host can handle a back request itself.
	pub fn can_go_back(&self) -> bool {
		self.inner.state.borrow().can_go_back()
	}

	/// Subscribes to every snapshot this controller receives.
	pub fn observe(&self, observer: impl Fn(&NavBackStack) + 'static) -> ObserverId {
		let id = ObserverId(self.inner.next_observer.get());
		self.inner.next_observer.set(id.0 + 1);
		self.inner.observers.borrow_mut().insert(id, Rc::new(observer));
		id
	}

	pub fn unobserve(&self, id: ObserverId) -> bool {
		self.inner.observers.borrow_mut().shift_remove(&id).is_some()
	}

	fn on_state_changed(&self, snapshot: &NavBackStack) {
		*self.inner.state.borrow_mut() = snapshot.clone();
		let observers: Vec<StateListener> = self.inner.observers.borrow().values().cloned().collect();
		for observer in observers {
			observer(snapshot);
		}
	}

	/// Nearest controller, starting with this one, whose attached host
	/// satisfies `accepts`.
	fn find_host(&self, mut accepts: impl FnMut(&dyn NavHostController) -> bool) -> Option<Rc<dyn NavHostController>> {
		let mut node = Some(self);
		while let Some(nav) = node {
			if let Some(host) = nav.attached_host()
				&& accepts(host.as_ref())
			{
				return Some(host);
			}
			if nav.parent().is_some() {
				tracing::trace!(depth = nav.depth(), "delegating to parent controller");
			}
			node = nav.parent();
		}
		None
	}

	/// Opens `page_type` on the nearest host that registers it.
	///
	/// # Errors
	///
	/// Returns [`NavError::Unreachable`] if no host up the chain registers
	/// `page_type`, or the error of the host that does.
	pub fn navigate_to(&self, page_type: &str, args: Option<PageArgs>, replace: bool) -> Result<()> {
		let Some(host) = self.find_host(|host| host.can_navigate_to(page_type)) else {
			return Err(NavError::Unreachable {
				page_type: page_type.to_string(),
			});
		};
		host.navigate_to(page_type, args, replace)
	}

	/// [`Self::navigate_to`] with a [`Page`], without replacing.
	///
	/// # Errors
	///
	/// See [`Self::navigate_to`].
	pub fn navigate(&self, page: impl Into<Page>) -> Result<()> {
		let page = page.into();
		self.navigate_to(&page.page_type, page.args, false)
	}

	/// Goes back on the nearest host that can. Returns `false` if none could.
	pub fn go_back(&self) -> bool {
		let handled = self.find_host(|host| host.go_back()).is_some();
		if !handled {
			tracing::debug!(depth = self.depth(), "go back unhandled at root");
		}
		handled
	}

	/// Pops up to `page_type` on the nearest host that registers it.
	///
	/// # Errors
	///
	/// Returns [`NavError::UnknownPageType`] if no live host up the chain
	/// registers `page_type`; torn-down hosts are skipped.
	pub fn pop_up_to(&self, page_type: &str) -> Result<()> {
		let mut failure = None;
		let handled = self.find_host(|host| match host.pop_up_to(page_type) {
			Err(NavError::TornDown) => false,
			Ok(handled) => handled,
			Err(err) => {
				failure.get_or_insert(err);
				false
			}
		});
		match (handled, failure) {
			(Some(_), _) => Ok(()),
			(None, Some(err)) => Err(err),
			(None, None) => Err(NavError::UnknownPageType {
				page_type: page_type.to_string(),
			}),
		}
	}
}

fn same_host(a: &Rc<dyn NavHostController>, b: &Rc<dyn NavHostController>) -> bool {
	std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl fmt::Debug for NavController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavController")
			.field("depth", &self.depth())
			.field("has_host", &self.has_host())
			.field("state", &self.state())
			.finish()
	}
}
