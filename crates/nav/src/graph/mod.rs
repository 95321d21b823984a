//! Destination registries.
//!
//! A graph maps page types to static metadata and is immutable once built.
//! [`StackGraph`] feeds a [`StackNavHost`](crate::host::StackNavHost) and
//! [`TabGraph`] feeds a [`TabNavHost`](crate::host::TabNavHost). Both are
//! produced by builders, or from a declarative [`GraphSpec`].
//!
//! # Modules
//!
//! - `stack` - page destinations and [`StackGraph`]
//! - `tab` - tab destinations and [`TabGraph`]
//! - `spec` - serde-backed declarative graph descriptions

mod spec;
mod stack;
mod tab;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
pub use spec::{GraphSpec, PageSpec, StackGraphSpec, TabGraphSpec, TabSpec};
pub use stack::{StackDestination, StackGraph, StackGraphBuilder};
pub use tab::{TabDestination, TabGraph, TabGraphBuilder};
use thiserror::Error;

use crate::entry::NavEntry;

/// Graph construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	#[error("tab host with no tabs can't be created")]
	NoTabs,
	#[error("tab of type `{0}` already exists")]
	DuplicateTab(String),
	#[error("no destination for `{0}`")]
	UnknownDestination(String),
	/// The root entry of a stack was declared transparent, so nothing can be
	/// drawn behind it.
	#[error("first page can't be transparent")]
	TransparentRoot,
	#[error("invalid graph spec: {0}")]
	Spec(String),
}

/// Content provider invoked by the renderer for an entry of its page type.
pub type Content = Rc<dyn Fn(&NavEntry)>;

/// Screen edge a transition slides from or towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Edge {
	Start,
	End,
	Top,
	Bottom,
}

/// Data-only description of an enter or exit animation.
///
/// The core never animates; it carries these for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Transition {
	None,
	Slide { edge: Edge },
	Fade { initial_alpha: f32 },
	SlideFade { edge: Edge, initial_alpha: f32 },
}

impl Transition {
	/// Default page enter: slide in from the end edge.
	pub const PAGE_ENTER: Transition = Transition::Slide { edge: Edge::End };
	/// Default page exit: slide out towards the end edge.
	pub const PAGE_EXIT: Transition = Transition::Slide { edge: Edge::End };
	/// Default tab enter when moving forward.
	pub const TAB_START: Transition = Transition::SlideFade {
		edge: Edge::Start,
		initial_alpha: 0.8,
	};
	/// Default tab enter when moving back.
	pub const TAB_END: Transition = Transition::SlideFade {
		edge: Edge::End,
		initial_alpha: 0.8,
	};

	pub(crate) fn page_enter() -> Self {
		Self::PAGE_ENTER
	}

	pub(crate) fn page_exit() -> Self {
		Self::PAGE_EXIT
	}

	pub(crate) fn tab_start() -> Self {
		Self::TAB_START
	}

	pub(crate) fn tab_end() -> Self {
		Self::TAB_END
	}
}

/// Animations for a page that stays on the stack while another page covers or
/// uncovers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityTransitions {
	/// Page comes back to the front of the stack.
	pub pull_front: Transition,
	/// Page goes back in the stack as another page comes on top.
	pub push_back: Transition,
}

/// Orientation requested by a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageOrientation {
	/// Follows the orientation sensor for all four orientations.
	FullSensor,
	Portrait,
	Landscape,
	/// Not managed; the page controls orientation itself.
	#[default]
	Custom,
}

/// Current device orientation as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
	Portrait,
	Landscape,
}

impl PageOrientation {
	/// Returns `true` if the host should request this orientation from the
	/// platform when the page is shown.
	pub fn is_managed(self) -> bool {
		self != Self::Custom
	}

	/// Orientation to request from the platform, if any.
	pub fn requested(self) -> Option<PageOrientation> {
		self.is_managed().then_some(self)
	}

	/// Whether content can be drawn in `device` orientation.
	///
	/// Locked pages skip rendering until the device has rotated to match.
	pub fn should_render(self, device: DeviceOrientation) -> bool {
		match self {
			Self::Portrait => device == DeviceOrientation::Portrait,
			Self::Landscape => device == DeviceOrientation::Landscape,
			Self::FullSensor | Self::Custom => true,
		}
	}
}
