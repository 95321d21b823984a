//! Declarative graph descriptions.
//!
//! A [`GraphSpec`] is the serde form of a graph tree: each page or tab may
//! carry a nested graph rendered inside it. Content providers are code, so a
//! spec only yields the metadata half; callers supply content through
//! [`StackGraphSpec::build_with`] / [`TabGraphSpec::build_with`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{
	Content, GraphError, PageOrientation, StackDestination, StackGraph, TabDestination, TabGraph,
	Transition, VisibilityTransitions,
};
use crate::entry::Page;

/// Root of a declarative graph tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GraphSpec {
	Stack(StackGraphSpec),
	Tab(TabGraphSpec),
}

impl GraphSpec {
	/// Parses and validates a TOML graph description.
	///
	/// # Errors
	///
	/// Returns [`GraphError::Spec`] for malformed TOML, or any structural error
	/// reported by [`Self::validate`].
	pub fn from_toml_str(source: &str) -> Result<Self, GraphError> {
		let spec: GraphSpec = toml::from_str(source).map_err(|e| GraphError::Spec(e.to_string()))?;
		spec.validate()?;
		Ok(spec)
	}

	/// Checks the whole tree, nested graphs included.
	///
	/// # Errors
	///
	/// Returns the first structural problem found, depth first.
	pub fn validate(&self) -> Result<(), GraphError> {
		match self {
			Self::Stack(stack) => stack.validate(),
			Self::Tab(tab) => tab.validate(),
		}
	}

	/// Number of graphs in the tree, this one included.
	pub fn graph_count(&self) -> usize {
		let nested: usize = match self {
			Self::Stack(stack) => stack.pages.iter().filter_map(|p| p.nested.as_deref()).map(Self::graph_count).sum(),
			Self::Tab(tab) => tab.tabs.iter().filter_map(|t| t.nested.as_deref()).map(Self::graph_count).sum(),
		};
		1 + nested
	}
}

/// Stack graph plus the pages a host is seeded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackGraphSpec {
	pub initial: Vec<String>,
	#[serde(default)]
	pub pages: Vec<PageSpec>,
}

/// One page of a [`StackGraphSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
	#[serde(rename = "type")]
	pub page_type: String,
	#[serde(default)]
	pub transparent: bool,
	#[serde(default)]
	pub single_instance: bool,
	#[serde(default)]
	pub orientation: PageOrientation,
	#[serde(default = "Transition::page_enter")]
	pub enter: Transition,
	#[serde(default = "Transition::page_exit")]
	pub exit: Transition,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub visibility: Option<VisibilityTransitions>,
	/// Graph of a navigation host rendered inside this page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nested: Option<Box<GraphSpec>>,
}

impl PageSpec {
	pub fn new(page_type: impl Into<String>) -> Self {
		Self {
			page_type: page_type.into(),
			transparent: false,
			single_instance: false,
			orientation: PageOrientation::default(),
			enter: Transition::PAGE_ENTER,
			exit: Transition::PAGE_EXIT,
			visibility: None,
			nested: None,
		}
	}

	fn destination(&self) -> StackDestination {
		let mut destination = StackDestination::new()
			.orientation(self.orientation)
			.transitions(self.enter, self.exit);
		destination.is_transparent = self.transparent;
		destination.is_single_instance = self.single_instance;
		destination.visibility = self.visibility;
		destination
	}
}

impl StackGraphSpec {
	fn validate(&self) -> Result<(), GraphError> {
		let Some(root) = self.initial.first() else {
			return Err(GraphError::Spec("stack graph has no initial page".into()));
		};
		let mut seen = FxHashSet::default();
		for page in &self.pages {
			if !seen.insert(page.page_type.as_str()) {
				return Err(GraphError::Spec(format!("page `{}` declared twice", page.page_type)));
			}
		}
		for page_type in &self.initial {
			if !seen.contains(page_type.as_str()) {
				return Err(GraphError::UnknownDestination(page_type.clone()));
			}
		}
		if self.pages.iter().any(|p| &p.page_type == root && p.transparent) {
			return Err(GraphError::TransparentRoot);
		}
		self.pages
			.iter()
			.filter_map(|p| p.nested.as_deref())
			.try_for_each(GraphSpec::validate)
	}

	/// Graph without content providers.
	pub fn build(&self) -> StackGraph {
		self.build_with(|_| None)
	}

	/// Graph whose content for each page is produced by `content`.
	pub fn build_with(&self, mut content: impl FnMut(&PageSpec) -> Option<Content>) -> StackGraph {
		self.pages
			.iter()
			.fold(StackGraph::builder(), |builder, page| {
				builder.page(page.page_type.clone(), page.destination().with_content(content(page)))
			})
			.build()
	}

	/// Pages a host built from this spec starts with, root first.
	pub fn initial_pages(&self) -> Vec<Page> {
		self.initial.iter().map(|t| Page::new(t.as_str())).collect()
	}

	pub fn page(&self, page_type: &str) -> Option<&PageSpec> {
		self.pages.iter().find(|p| p.page_type == page_type)
	}

	pub fn nested_for(&self, page_type: &str) -> Option<&GraphSpec> {
		self.page(page_type).and_then(|p| p.nested.as_deref())
	}
}

/// Tab graph description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGraphSpec {
	pub tabs: Vec<TabSpec>,
	#[serde(default = "Transition::tab_start")]
	pub start_transition: Transition,
	#[serde(default = "Transition::tab_end")]
	pub end_transition: Transition,
}

/// One tab of a [`TabGraphSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSpec {
	#[serde(rename = "type")]
	pub tab_type: String,
	/// Marks the default tab. Without any marker the first tab is the default.
	#[serde(default)]
	pub default: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nested: Option<Box<GraphSpec>>,
}

impl TabSpec {
	pub fn new(tab_type: impl Into<String>) -> Self {
		Self {
			tab_type: tab_type.into(),
			default: false,
			nested: None,
		}
	}
}

impl TabGraphSpec {
	fn validate(&self) -> Result<(), GraphError> {
		if self.tabs.iter().filter(|t| t.default).count() > 1 {
			return Err(GraphError::Spec("more than one default tab".into()));
		}
		self.build()?;
		self.tabs
			.iter()
			.filter_map(|t| t.nested.as_deref())
			.try_for_each(GraphSpec::validate)
	}

	/// Graph without content providers.
	///
	/// # Errors
	///
	/// Same as [`super::TabGraphBuilder::build`].
	pub fn build(&self) -> Result<TabGraph, GraphError> {
		self.build_with(|_| None)
	}

	/// Graph whose content for each tab is produced by `content`.
	///
	/// # Errors
	///
	/// Same as [`super::TabGraphBuilder::build`].
	pub fn build_with(&self, mut content: impl FnMut(&TabSpec) -> Option<Content>) -> Result<TabGraph, GraphError> {
		self.tabs
			.iter()
			.fold(TabGraph::builder(), |builder, tab| {
				let destination = TabDestination::new().with_content(content(tab));
				if tab.default {
					builder.default_tab(tab.tab_type.clone(), destination, None)
				} else {
					builder.tab(tab.tab_type.clone(), destination)
				}
			})
			.transitions(self.start_transition, self.end_transition)
			.build()
	}

	pub fn tab(&self, tab_type: &str) -> Option<&TabSpec> {
		self.tabs.iter().find(|t| t.tab_type == tab_type)
	}

	pub fn nested_for(&self, tab_type: &str) -> Option<&GraphSpec> {
		self.tab(tab_type).and_then(|t| t.nested.as_deref())
	}
}
