//! Entry-scoped resource storage.

use std::any::{Any, TypeId};
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Errors from [`ResourceRegistry`] access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResourceError {
	/// The owning entry was destroyed and its resources released.
	#[error("resource registry was already released")]
	Released,
	/// A stored value does not match the type it is keyed under.
	#[error("stored resource does not match its type key `{0}`")]
	TypeMismatch(&'static str),
}

/// Type-keyed storage for values whose lifetime is bound to one entry.
///
/// At most one value per type is stored. [`Self::release`] drops every value
/// in reverse insertion order and seals the registry: later inserts fail with
/// [`ResourceError::Released`] and lookups return nothing.
#[derive(Default)]
pub struct ResourceRegistry {
	inner: IndexMap<TypeId, Box<dyn Any>>,
	released: bool,
}

impl ResourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get<T: Any>(&self) -> Option<&T> {
		self.inner.get(&TypeId::of::<T>())?.downcast_ref()
	}

	pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
		self.inner.get_mut(&TypeId::of::<T>())?.downcast_mut()
	}

	pub fn contains<T: Any>(&self) -> bool {
		self.inner.contains_key(&TypeId::of::<T>())
	}

	/// Stores `value`, returning the previous value of the same type.
	///
	/// # Errors
	///
	/// Returns [`ResourceError::Released`] once the registry was released.
	pub fn insert<T: Any>(&mut self, value: T) -> Result<Option<T>, ResourceError> {
		self.ensure_live::<T>()?;
		let previous = self.inner.insert(TypeId::of::<T>(), Box::new(value));
		Ok(previous.and_then(|p| p.downcast::<T>().ok()).map(|p| *p))
	}

	/// Returns the stored `T`, inserting `init()` first if absent.
	///
	/// # Errors
	///
	/// Returns [`ResourceError::Released`] once the registry was released.
	pub fn get_or_insert_with<T: Any>(&mut self, init: impl FnOnce() -> T) -> Result<&mut T, ResourceError> {
		self.ensure_live::<T>()?;
		self.inner
			.entry(TypeId::of::<T>())
			.or_insert_with(|| Box::new(init()))
			.downcast_mut()
			.ok_or(ResourceError::TypeMismatch(std::any::type_name::<T>()))
	}

	/// Removes and returns the stored `T`.
	pub fn remove<T: Any>(&mut self) -> Option<T> {
		let value = self.inner.shift_remove(&TypeId::of::<T>())?;
		value.downcast::<T>().ok().map(|v| *v)
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn is_released(&self) -> bool {
		self.released
	}

	/// Drops every stored value, newest first, and seals the registry.
	///
	/// Returns `false` if the registry had already been released.
	pub fn release(&mut self) -> bool {
		if self.released {
			return false;
		}
		drop(self.take_all());
		true
	}

	/// Seals the registry and hands back its values, newest first.
	///
	/// Lets the owner drop the values after giving up its borrow, so value
	/// destructors may reach back into the owning entry.
	pub(crate) fn take_all(&mut self) -> Vec<Box<dyn Any>> {
		self.released = true;
		let mut values: Vec<_> = self.inner.drain(..).map(|(_, v)| v).collect();
		values.reverse();
		values
	}

	fn ensure_live<T: Any>(&self) -> Result<(), ResourceError> {
		if self.released {
			tracing::warn!(resource = std::any::type_name::<T>(), "write to released resource registry");
			return Err(ResourceError::Released);
		}
		Ok(())
	}
}

impl fmt::Debug for ResourceRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResourceRegistry")
			.field("len", &self.inner.len())
			.field("released", &self.released)
			.finish()
	}
}
