use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Content, GraphError, PageOrientation, Transition, VisibilityTransitions};
use crate::entry::NavEntry;

/// Static metadata for one page type of a [`StackGraph`].
#[derive(Clone)]
pub struct StackDestination {
	/// Renders the entry beneath as well when this page is on top.
	pub is_transparent: bool,
	/// At most one entry of this page type is kept on the stack.
	pub is_single_instance: bool,
	pub orientation: PageOrientation,
	pub enter: Transition,
	pub exit: Transition,
	pub visibility: Option<VisibilityTransitions>,
	content: Option<Content>,
}

impl Default for StackDestination {
	fn default() -> Self {
		Self {
			is_transparent: false,
			is_single_instance: false,
			orientation: PageOrientation::Custom,
			enter: Transition::PAGE_ENTER,
			exit: Transition::PAGE_EXIT,
			visibility: None,
			content: None,
		}
	}
}

impl StackDestination {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn transparent(mut self) -> Self {
		self.is_transparent = true;
		self
	}

	pub fn single_instance(mut self) -> Self {
		self.is_single_instance = true;
		self
	}

	pub fn orientation(mut self, orientation: PageOrientation) -> Self {
		self.orientation = orientation;
		self
	}

	pub fn transitions(mut self, enter: Transition, exit: Transition) -> Self {
		self.enter = enter;
		self.exit = exit;
		self
	}

	pub fn visibility(mut self, visibility: VisibilityTransitions) -> Self {
		self.visibility = Some(visibility);
		self
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

impl fmt::Debug for StackDestination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StackDestination")
			.field("is_transparent", &self.is_transparent)
			.field("is_single_instance", &self.is_single_instance)
			.field("orientation", &self.orientation)
			.field("enter", &self.enter)
			.field("exit", &self.exit)
			.field("visibility", &self.visibility)
			.field("has_content", &self.content.is_some())
			.finish()
	}
}

/// Immutable page registry for a stack host.
#[derive(Debug, Clone, Default)]
pub struct StackGraph {
	destinations: IndexMap<String, StackDestination>,
}

impl StackGraph {
	pub fn builder() -> StackGraphBuilder {
		StackGraphBuilder::default()
	}

	pub fn has_page_type(&self, page_type: &str) -> bool {
		self.destinations.contains_key(page_type)
	}

	/// Metadata for `page_type`.
	///
	/// # Errors
	///
	/// Returns [`GraphError::UnknownDestination`] if the type is not registered.
	pub fn destination_for(&self, page_type: &str) -> Result<&StackDestination, GraphError> {
		self.destinations
			.get(page_type)
			.ok_or_else(|| GraphError::UnknownDestination(page_type.to_string()))
	}

	/// Registered page types in registration order.
	pub fn page_types(&self) -> impl Iterator<Item = &str> {
		self.destinations.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.destinations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.destinations.is_empty()
	}

	/// Invokes the content provider registered for the entry's page type.
	///
	/// Pages registered without content render nothing.
	///
	/// # Errors
	///
	/// Returns [`GraphError::UnknownDestination`] if the entry's type is not
	/// registered in this graph.
	pub fn render(&self, entry: &NavEntry) -> Result<(), GraphError> {
		if let Some(content) = &self.destination_for(entry.page_type())?.content {
			content(entry);
		}
		Ok(())
	}
}

/// Declarative registration pass for a [`StackGraph`].
#[derive(Debug, Default)]
pub struct StackGraphBuilder {
	destinations: IndexMap<String, StackDestination>,
}

impl StackGraphBuilder {
	/// Registers `page_type`. A repeated registration replaces the earlier one.
	pub fn page(mut self, page_type: impl Into<String>, destination: StackDestination) -> Self {
		let page_type = page_type.into();
		if self.destinations.contains_key(&page_type) {
			tracing::warn!(%page_type, "page registered twice; keeping the later registration");
		}
		self.destinations.insert(page_type, destination);
		self
	}

	pub fn build(self) -> StackGraph {
		StackGraph {
			destinations: self.destinations,
		}
	}
}
