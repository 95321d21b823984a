use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Content, GraphError, Transition};
use crate::entry::{NavEntry, PageArgs};

/// Rendering hook for one tab type.
#[derive(Clone, Default)]
pub struct TabDestination {
	content: Option<Content>,
}

impl TabDestination {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn content(mut self, content: impl Fn(&NavEntry) + 'static) -> Self {
		self.content = Some(Rc::new(content));
		self
	}

	pub(crate) fn with_content(mut self, content: Option<Content>) -> Self {
		self.content = content;
		self
	}

	pub fn has_content(&self) -> bool {
		self.content.is_some()
	}
}

impl fmt::Debug for TabDestination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TabDestination")
			.field("has_content", &self.content.is_some())
			.finish()
	}
}

/// Immutable tab registry for a tab host.
///
/// The default tab acts as the root of the tab host's recency stack.
#[derive(Debug, Clone)]
pub struct TabGraph {
	default_tab: String,
	default_tab_args: Option<PageArgs>,
	start_transition: Transition,
	end_transition: Transition,
	tabs: IndexMap<String, TabDestination>,
}

impl TabGraph {
	pub fn builder() -> TabGraphBuilder {
		TabGraphBuilder::default()
	}

	pub fn default_tab(&self) -> &str {
		&self.default_tab
	}

	pub fn default_tab_args(&self) -> Option<&PageArgs> {
		self.default_tab_args.as_ref()
	}

	pub fn start_transition(&self) -> Transition {
		self.start_transition
	}

	pub fn end_transition(&self) -> Transition {
		self.end_transition
	}

	pub fn has_page_type(&self, tab_type: &str) -> bool {
		self.tabs.contains_key(tab_type)
	}

	/// Tab types in registration order.
	pub fn tabs(&self) -> impl Iterator<Item = &str> {
		self.tabs.keys().map(String::as_str)
	}

	/// # Errors
	///
	/// Returns [`GraphError::UnknownDestination`] if the type is not registered.
	pub fn destination_for(&self, tab_type: &str) -> Result<&TabDestination, GraphError> {
		self.tabs
			.get(tab_type)
			.ok_or_else(|| GraphError::UnknownDestination(tab_type.to_string()))
	}

	/// Invokes the content provider registered for the entry's tab type.
	///
	/// # Errors
	///
	/// Returns [`GraphError::UnknownDestination`] if the entry's type is not a
	/// tab of this graph.
	pub fn render(&self, entry: &NavEntry) -> Result<(), GraphError> {
		if let Some(content) = &self.destination_for(entry.page_type())?.content {
			content(entry);
		}
		Ok(())
	}
}

/// Declarative registration pass for a [`TabGraph`].
///
/// The first registered tab is the default unless another one is registered
/// through [`Self::default_tab`]; the last such call wins.
#[derive(Debug)]
pub struct TabGraphBuilder {
	tabs: IndexMap<String, TabDestination>,
	default: Option<(String, Option<PageArgs>)>,
	start_transition: Transition,
	end_transition: Transition,
	error: Option<GraphError>,
}

impl Default for TabGraphBuilder {
	fn default() -> Self {
		Self {
			tabs: IndexMap::new(),
			default: None,
			start_transition: Transition::TAB_START,
			end_transition: Transition::TAB_END,
			error: None,
		}
	}
}

impl TabGraphBuilder {
	pub fn tab(self, tab_type: impl Into<String>, destination: TabDestination) -> Self {
		self.register(tab_type.into(), destination, false, None)
	}

	/// Registers `tab_type` as the default tab, created eagerly with `args`.
	pub fn default_tab(self, tab_type: impl Into<String>, destination: TabDestination, args: Option<PageArgs>) -> Self {
		self.register(tab_type.into(), destination, true, args)
	}

	pub fn transitions(mut self, start: Transition, end: Transition) -> Self {
		self.start_transition = start;
		self.end_transition = end;
		self
	}

	/// # Errors
	///
	/// - [`GraphError::DuplicateTab`] if a tab type was registered twice.
	/// - [`GraphError::NoTabs`] if no tab was registered.
	pub fn build(self) -> Result<TabGraph, GraphError> {
		if let Some(error) = self.error {
			return Err(error);
		}
		let (default_tab, default_tab_args) = self.default.ok_or(GraphError::NoTabs)?;
		Ok(TabGraph {
			default_tab,
			default_tab_args,
			start_transition: self.start_transition,
			end_transition: self.end_transition,
			tabs: self.tabs,
		})
	}

	fn register(mut self, tab_type: String, destination: TabDestination, is_default: bool, args: Option<PageArgs>) -> Self {
		if self.error.is_some() {
			return self;
		}
		if self.tabs.contains_key(&tab_type) {
			self.error = Some(GraphError::DuplicateTab(tab_type));
			return self;
		}
		if is_default || self.default.is_none() {
			self.default = Some((tab_type.clone(), args));
		}
		self.tabs.insert(tab_type, destination);
		self
	}
}
