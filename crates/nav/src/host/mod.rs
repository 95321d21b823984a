//! Navigation hosts.
//!
//! A host owns one back stack and implements the navigation verbs for it.
//! [`StackNavHost`] keeps a linear page history; [`TabNavHost`] keeps one
//! cached entry per tab and a recency stack of visited tabs.
//!
//! Hosts are shared as `Rc<Host>` and mutate through `&self`. Every operation
//! finishes its state change and releases its borrow before destroying entries
//! or publishing a snapshot, so listeners and resource destructors may call
//! back into any host or controller.

mod stack;
mod tab;
mod transition;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
pub use stack::StackNavHost;
pub use tab::TabNavHost;

use crate::controller::NavController;
use crate::entry::PageArgs;
use crate::error::Result;
use crate::lifecycle::{HostLifecycleEvent, LifecyclePhase};
use crate::snapshot::NavBackStack;

/// Callback receiving every published snapshot.
pub type StateListener = Rc<dyn Fn(&NavBackStack)>;

/// Navigation verbs shared by every host.
///
/// Soft failures ("this host can't handle it") are reported as `false` so a
/// [`NavController`] can delegate to its parent.
pub trait NavHostController {
	/// Installs the single listener slot and publishes the current snapshot to
	/// it right away.
	fn set_state_changed_listener(&self, listener: StateListener);

	fn clear_state_changed_listener(&self);

	fn can_navigate_to(&self, page_type: &str) -> bool;

	/// Opens `page_type`, replacing the current top when `replace` is set.
	///
	/// # Errors
	///
	/// - [`NavError::NotRegistered`](crate::NavError::NotRegistered) if the
	///   host does not register `page_type`.
	/// - [`NavError::TornDown`](crate::NavError::TornDown) after teardown.
	fn navigate_to(&self, page_type: &str, args: Option<PageArgs>, replace: bool) -> Result<()>;

	fn can_go_back(&self) -> bool;

	/// Returns `false` if this host has nothing to go back to.
	fn go_back(&self) -> bool;

	/// Unwinds until `page_type` is on top, or resets towards it if absent.
	///
	/// Returns `Ok(false)` if the host does not register `page_type`.
	///
	/// # Errors
	///
	/// Returns [`NavError::TornDown`](crate::NavError::TornDown) after teardown.
	fn pop_up_to(&self, page_type: &str) -> Result<bool>;

	/// Snapshot of the current back stack.
	fn back_stack(&self) -> NavBackStack;

	/// Renderer signal that the running transition has settled.
	fn on_transition_finished(&self);

	/// Renderer signal that its rendering scope went away mid-transition.
	fn on_render_detached(&self);

	/// Applies the phase of the screen hosting this host and recaps entries.
	fn on_host_phase_changed(&self, phase: LifecyclePhase);

	/// Last phase applied through [`Self::on_host_phase_changed`].
	fn host_phase(&self) -> LifecyclePhase;

	fn on_host_lifecycle_event(&self, event: HostLifecycleEvent) {
		self.on_host_phase_changed(event.phase());
	}

	/// Destroys every entry. Idempotent.
	fn teardown(&self);

	fn is_torn_down(&self) -> bool;

	/// Controller this host's entries are parented to.
	fn nav_controller(&self) -> &NavController;
}

/// Construction-time host settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOptions {
	/// Phase of the hosting screen when the host is created.
	pub initial_host_phase: LifecyclePhase,
}

impl Default for HostOptions {
	fn default() -> Self {
		Self {
			initial_host_phase: LifecyclePhase::Resumed,
		}
	}
}

/// Single listener slot. The listener is cloned out before it runs, so it may
/// replace itself.
#[derive(Default)]
struct ListenerSlot(RefCell<Option<StateListener>>);

impl ListenerSlot {
	fn set(&self, listener: StateListener) {
		*self.0.borrow_mut() = Some(listener);
	}

	fn clear(&self) {
		self.0.borrow_mut().take();
	}

	fn publish(&self, snapshot: &NavBackStack) {
		let listener = self.0.borrow().clone();
		if let Some(listener) = listener {
			tracing::trace!(entries = ?snapshot.page_types(), can_go_back = snapshot.can_go_back(), "publishing back stack");
			listener(snapshot);
		}
	}
}
