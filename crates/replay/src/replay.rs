//! Scenario runtime.
//!
//! Plays the renderer's part for a tree of real hosts: renders visible
//! entries through the graph content providers (which mount nested hosts into
//! entry resources), forwards each entry's phase to the host mounted inside
//! it, and settles transitions.

use std::fmt::Write as _;
use std::rc::Rc;

use anyhow::{Context, bail};
use waypoint_nav::graph::Content;
use waypoint_nav::{
	GraphSpec, HostOptions, NavBackStack, NavController, NavEntry, NavError, NavHostController, StackNavHost,
	TabNavHost,
};

use crate::scenario::{Scenario, Step};

/// A host mounted either at the root or inside an entry's resources.
#[derive(Clone)]
pub enum Mounted {
	Stack(Rc<StackNavHost>),
	Tab(Rc<TabNavHost>),
}

impl Mounted {
	/// Builds and attaches a host for `spec` under `nav`.
	pub fn mount(spec: &GraphSpec, nav: NavController, options: HostOptions) -> Result<Self, NavError> {
		let mounted = match spec {
			GraphSpec::Stack(stack) => {
				let graph = stack.build_with(|page| page.nested.as_deref().map(|nested| nested_content(nested, options)));
				let host = StackNavHost::with_options(nav.clone(), graph, stack.initial_pages(), options)?;
				nav.attach(&host);
				Self::Stack(host)
			}
			GraphSpec::Tab(tab) => {
				let graph = tab.build_with(|t| t.nested.as_deref().map(|nested| nested_content(nested, options)))?;
				let host = TabNavHost::with_options(nav.clone(), graph, options);
				nav.attach(&host);
				Self::Tab(host)
			}
		};
		tracing::debug!(depth = nav.depth(), "host mounted");
		Ok(mounted)
	}

	pub fn host(&self) -> &dyn NavHostController {
		match self {
			Self::Stack(host) => host.as_ref(),
			Self::Tab(host) => host.as_ref(),
		}
	}

	fn kind(&self) -> &'static str {
		match self {
			Self::Stack(_) => "stack",
			Self::Tab(_) => "tab",
		}
	}

	/// Entries the renderer draws: the visible stack slice, or the current tab.
	fn visible(&self) -> anyhow::Result<Vec<Rc<NavEntry>>> {
		match self {
			Self::Stack(host) => Ok(host.visible_entries()?),
			Self::Tab(host) => Ok(host.back_stack().top().cloned().into_iter().collect()),
		}
	}

	fn render(&self, entry: &NavEntry) -> anyhow::Result<()> {
		match self {
			Self::Stack(host) => host.graph().render(entry)?,
			Self::Tab(host) => host.graph().render(entry)?,
		}
		Ok(())
	}

	/// Every entry this host still owns, nested hosts included via
	/// [`nested_in`].
	fn owned_entries(&self) -> Vec<Rc<NavEntry>> {
		match self {
			Self::Stack(host) => {
				let mut entries = host.back_stack().entries().to_vec();
				entries.extend(host.deferred_entries());
				entries
			}
			Self::Tab(host) => host.cached_entries(),
		}
	}
}

fn nested_content(spec: &GraphSpec, options: HostOptions) -> Content {
	let spec = spec.clone();
	Rc::new(move |entry: &NavEntry| {
		if entry.resources().contains::<Mounted>() {
			return;
		}
		match Mounted::mount(&spec, entry.controller(), options) {
			Ok(mounted) => {
				if let Err(err) = entry.resources_mut().insert(mounted) {
					tracing::warn!(%entry, %err, "cannot keep nested host");
				}
			}
			Err(err) => tracing::warn!(%entry, %err, "cannot mount nested host"),
		}
	})
}

fn nested_in(entry: &NavEntry) -> Option<Mounted> {
	entry.resources().get::<Mounted>().cloned()
}

/// A running scenario.
pub struct Replay {
	root: Mounted,
	auto_finish: bool,
}

impl Replay {
	pub fn new(scenario: &Scenario) -> anyhow::Result<Self> {
		let root = Mounted::mount(&scenario.graph, NavController::root(), scenario.host).context("mounting root host")?;
		let replay = Self {
			root,
			auto_finish: scenario.auto_finish,
		};
		replay.settle()?;
		Ok(replay)
	}

	/// Innermost host along the visible path.
	pub fn focused(&self) -> Mounted {
		let mut current = self.root.clone();
		loop {
			let top = current.host().back_stack().top().cloned();
			match top.and_then(|entry| nested_in(&entry)) {
				Some(nested) => current = nested,
				None => return current,
			}
		}
	}

	pub fn apply(&self, step: &Step) -> anyhow::Result<()> {
		tracing::debug!(%step, "applying step");
		let focused = self.focused();
		let nav = focused.host().nav_controller().clone();
		match step {
			Step::Navigate { page, replace } => nav.navigate_to(page, None, *replace)?,
			Step::Back => {
				if !nav.go_back() {
					tracing::info!("back reached the root unhandled");
				}
			}
			Step::PopUpTo { page } => nav.pop_up_to(page)?,
			Step::Finish => finish_all(&self.root),
			Step::Lifecycle { event } => self.root.host().on_host_lifecycle_event(*event),
			Step::Expect { pages } => {
				let actual = focused.host().back_stack();
				if actual.page_types() != *pages {
					bail!("expected [{}], found [{}]", pages.join(", "), actual.page_types().join(", "));
				}
			}
		}
		self.settle()
	}

	/// Renders the visible tree and forwards entry phases to nested hosts.
	fn settle(&self) -> anyhow::Result<()> {
		if self.auto_finish {
			finish_all(&self.root);
		}
		render(&self.root)?;
		sync_phases(&self.root);
		Ok(())
	}

	/// Indented dump of every live host, outermost first.
	pub fn tree(&self) -> String {
		let mut out = String::new();
		describe(&self.root, 0, &mut out);
		out
	}
}

fn finish_all(mounted: &Mounted) {
	mounted.host().on_transition_finished();
	for entry in mounted.owned_entries() {
		if let Some(nested) = nested_in(&entry) {
			finish_all(&nested);
		}
	}
}

fn render(mounted: &Mounted) -> anyhow::Result<()> {
	for entry in mounted.visible()? {
		mounted.render(&entry)?;
		if let Some(nested) = nested_in(&entry) {
			render(&nested)?;
		}
	}
	Ok(())
}

fn sync_phases(mounted: &Mounted) {
	for entry in mounted.owned_entries() {
		if let Some(nested) = nested_in(&entry) {
			if nested.host().host_phase() != entry.phase() {
				nested.host().on_host_phase_changed(entry.phase());
			}
			sync_phases(&nested);
		}
	}
}

fn describe(mounted: &Mounted, depth: usize, out: &mut String) {
	let snapshot: NavBackStack = mounted.host().back_stack();
	let entries: Vec<String> = snapshot
		.entries()
		.iter()
		.map(|e| format!("{}:{}", e.page_type(), e.phase()))
		.collect();
	let _ = writeln!(out, "{:indent$}{} [{}]", "", mounted.kind(), entries.join(" > "), indent = depth * 2);
	for entry in snapshot.entries() {
		if let Some(nested) = nested_in(entry) {
			let _ = writeln!(out, "{:indent$}in {}:", "", entry.page_type(), indent = depth * 2 + 2);
			describe(&nested, depth + 2, out);
		}
	}
}
