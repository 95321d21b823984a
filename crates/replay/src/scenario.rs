//! Scenario files: a graph tree plus a script of navigation commands.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use waypoint_nav::{GraphSpec, HostLifecycleEvent, HostOptions};

/// A replayable navigation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
	pub graph: GraphSpec,
	#[serde(default)]
	pub host: HostOptions,
	/// Settles every transition after each step, as a renderer without
	/// animations would.
	#[serde(default = "default_auto_finish")]
	pub auto_finish: bool,
	#[serde(default)]
	pub steps: Vec<Step>,
}

fn default_auto_finish() -> bool {
	true
}

/// One scripted command. Commands go to the controller of the innermost
/// focused host and bubble up from there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
	Navigate {
		page: String,
		#[serde(default)]
		replace: bool,
	},
	Back,
	PopUpTo {
		page: String,
	},
	/// Reports the running transitions as finished.
	Finish,
	/// Delivers a lifecycle event to the outermost host.
	Lifecycle {
		event: HostLifecycleEvent,
	},
	/// Asserts the page types of the focused host's back stack.
	Expect {
		pages: Vec<String>,
	},
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Navigate { page, replace: false } => write!(f, "navigate {page}"),
			Self::Navigate { page, replace: true } => write!(f, "navigate {page} (replace)"),
			Self::Back => f.write_str("back"),
			Self::PopUpTo { page } => write!(f, "pop-up-to {page}"),
			Self::Finish => f.write_str("finish"),
			Self::Lifecycle { event } => write!(f, "lifecycle {event:?}"),
			Self::Expect { pages } => write!(f, "expect [{}]", pages.join(", ")),
		}
	}
}

impl Scenario {
	/// Parses a scenario and validates its graph tree.
	pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
		let scenario: Scenario = toml::from_str(source).context("malformed scenario")?;
		scenario.graph.validate().context("invalid graph")?;
		Ok(scenario)
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
		Self::from_toml_str(&source).with_context(|| format!("loading {}", path.display()))
	}
}

/// Loads a bare graph file, or the graph of a scenario file.
pub fn load_graph(path: &Path) -> anyhow::Result<GraphSpec> {
	let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	if let Ok(scenario) = toml::from_str::<Scenario>(&source) {
		scenario.graph.validate().context("invalid graph")?;
		return Ok(scenario.graph);
	}
	GraphSpec::from_toml_str(&source).with_context(|| format!("checking {}", path.display()))
}
