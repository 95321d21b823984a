//! Ordered back-stack storage.
//!
//! [`BackStack`] is a thin wrapper around a `Vec` that exposes the operations
//! navigation hosts need, named from the stack's point of view. Index 0 is the
//! bottom (root) entry and the last element is the top.
//!
//! The collection knows nothing about navigation. Its only rule is that the
//! root is never implicitly poppable: [`BackStack::pop`] refuses to empty the
//! stack, so only [`BackStack::clear`] can do that.

use thiserror::Error;


/// Misuse of the low-level stack API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackStackError {
	/// `pop` on a stack holding the root only (or nothing).
	#[error("{len} items in the stack, can't pop")]
	EmptyOrSingleton {
		/// Stack length at the time of the call.
		len: usize,
	},
	/// `replace` on an empty stack.
	#[error("no items in the stack, can't replace")]
	Empty,
	/// `bring_to_front` with an element that is not on the stack.
	#[error("element is not a member of the stack")]
	NotMember,
}

/// Ordered sequence of entries, last element on top.
#[derive(Debug, Clone)]
pub struct BackStack<T> {
	entries: Vec<T>,
}

impl<T> Default for BackStack<T> {
	fn default() -> Self {
		Self { entries: Vec::new() }
	}
}

impl<T> BackStack<T> {
	/// Creates an empty stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Pushes `entry` on top.
	pub fn push(&mut self, entry: T) {
		self.entries.push(entry);
	}

	/// Removes and returns the top entry.
	///
	/// # Errors
	///
	/// Returns [`BackStackError::EmptyOrSingleton`] if fewer than two entries
	/// are present; the root entry is never popped.
	pub fn pop(&mut self) -> Result<T, BackStackError> {
		let len = self.entries.len();
		if !self.can_pop() {
			return Err(BackStackError::EmptyOrSingleton { len });
		}
		self.entries.pop().ok_or(BackStackError::EmptyOrSingleton { len })
	}

	/// Swaps the top entry for `entry`, returning the removed one.
	///
	/// # Errors
	///
	/// Returns [`BackStackError::Empty`] if the stack has no top.
	pub fn replace(&mut self, entry: T) -> Result<T, BackStackError> {
		let top = self.entries.last_mut().ok_or(BackStackError::Empty)?;
		Ok(std::mem::replace(top, entry))
	}

	/// Returns `true` if [`Self::pop`] would succeed.
	pub fn can_pop(&self) -> bool {
		self.entries.len() > 1
	}

	/// Pops from the top until `reached` holds for the top entry or only the
	/// root remains.
	///
	/// Returns the popped entries, most recently pushed first.
	pub fn pop_until(&mut self, mut reached: impl FnMut(&T) -> bool) -> Vec<T> {
		let mut popped = Vec::new();
		while self.can_pop() {
			match self.entries.last() {
				Some(top) if reached(top) => break,
				_ => {}
			}
			if let Some(entry) = self.entries.pop() {
				popped.push(entry);
			}
		}
		popped
	}

	/// Removes the first entry, scanning from the bottom, for which
	/// `predicate(index, entry)` holds.
	///
	/// Callers that must keep the top pass a predicate that rejects
	/// [`Self::last_index`].
	pub fn remove_first(&mut self, mut predicate: impl FnMut(usize, &T) -> bool) -> Option<T> {
		let index = self
			.entries
			.iter()
			.enumerate()
			.position(|(i, entry)| predicate(i, entry))?;
		Some(self.entries.remove(index))
	}

	/// Removes every entry, returning them bottom first.
	pub fn clear(&mut self) -> Vec<T> {
		std::mem::take(&mut self.entries)
	}

	/// Returns the top entry.
	pub fn peek(&self) -> Option<&T> {
		self.entries.last()
	}

	/// Returns the root entry.
	pub fn bottom(&self) -> Option<&T> {
		self.entries.first()
	}

	/// Index of the top entry, `None` when empty.
	pub fn last_index(&self) -> Option<usize> {
		self.entries.len().checked_sub(1)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates bottom to top.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.entries.iter()
	}

	/// Borrowed bottom-to-top view.
	pub fn as_slice(&self) -> &[T] {
		&self.entries
	}
}

impl<T: Clone> BackStack<T> {
	/// Copies the stack into an ordered list, bottom first.
	pub fn snapshot(&self) -> Vec<T> {
		self.entries.clone()
	}
}

impl<T: PartialEq> BackStack<T> {
	pub fn contains(&self, entry: &T) -> bool {
		self.entries.contains(entry)
	}

	/// Moves `entry` to the top, keeping the relative order of the rest.
	///
	/// # Errors
	///
	/// Returns [`BackStackError::NotMember`] if `entry` is not on the stack.
	pub fn bring_to_front(&mut self, entry: &T) -> Result<(), BackStackError> {
		let index = self
			.entries
			.iter()
			.position(|e| e == entry)
			.ok_or(BackStackError::NotMember)?;
		let moved = self.entries.remove(index);
		self.entries.push(moved);
		Ok(())
	}
}

impl<T> FromIterator<T> for BackStack<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

impl<'a, T> IntoIterator for &'a BackStack<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}
