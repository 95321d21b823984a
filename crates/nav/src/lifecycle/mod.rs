//! Lifecycle phases and host-phase capping.
//!
//! Entries move through [`LifecyclePhase`]s driven by their host. The phase an
//! entry is *allowed* to reach depends on two inputs:
//!
//! - its position: only the top entry may be resumed, and only once no
//!   transition is pending ([`target_phase`]).
//! - the host's own phase: an entry is never more alive than the screen that
//!   hosts it ([`LifecyclePhase::capped_to`]).

use std::fmt;

use serde::{Deserialize, Serialize};


/// Lifecycle phase of an entry or a host.
///
/// Ordered from least to most alive. [`LifecyclePhase::Destroyed`] sorts lowest
/// and is terminal for entries.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LifecyclePhase {
	Destroyed,
	#[default]
	Initialized,
	/// Host is alive but not visible, e.g. the app went to background.
	Created,
	Started,
	Resumed,
}

impl LifecyclePhase {
	/// Clamps `self` so it never exceeds `host`.
	///
	/// A destroyed host skips capping: teardown sequencing destroys entries
	/// explicitly and must not race the host's own transition.
	pub fn capped_to(self, host: LifecyclePhase) -> LifecyclePhase {
		if host == LifecyclePhase::Destroyed {
			return self;
		}
		self.min(host)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Destroyed => "DESTROYED",
			Self::Initialized => "INITIALIZED",
			Self::Created => "CREATED",
			Self::Started => "STARTED",
			Self::Resumed => "RESUMED",
		}
	}
}

impl fmt::Display for LifecyclePhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Phase targeted by a stacked entry before capping.
pub fn target_phase(is_top: bool, transition_pending: bool) -> LifecyclePhase {
	if is_top && !transition_pending {
		LifecyclePhase::Resumed
	} else {
		LifecyclePhase::Started
	}
}

/// Discrete lifecycle events delivered by the screen hosting a navigation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostLifecycleEvent {
	Created,
	Started,
	Resumed,
	Paused,
	Stopped,
	Destroyed,
}

impl HostLifecycleEvent {
	/// Host phase after the event has been applied.
	pub fn phase(self) -> LifecyclePhase {
		match self {
			Self::Created | Self::Stopped => LifecyclePhase::Created,
			Self::Started | Self::Paused => LifecyclePhase::Started,
			Self::Resumed => LifecyclePhase::Resumed,
			Self::Destroyed => LifecyclePhase::Destroyed,
		}
	}
}
