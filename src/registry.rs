//! Strategy registration and resolution.
//!
//! A strategy is a function producing a value for one shape; the
//! [`TypeRegistry`] maps shape descriptors to strategies, type-erased so
//! that one table can hold strategies for arbitrary types. The registry is
//! owned by a [`GenerationContext`] rather than being process-global, so
//! tests never couple through ambient state.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::GenerationContext;
use crate::descriptor::TypeDescriptor;
use crate::error::{GenResult, GenerationError};

/// Type-erased generation strategy.
pub trait ErasedStrategy: Send + Sync {
	/// The shape this strategy produces.
	fn descriptor(&self) -> &TypeDescriptor;

	/// Produces a boxed value, for dynamic (descriptor-keyed) requests.
	fn generate_boxed(&self, ctx: &mut GenerationContext) -> GenResult<Box<dyn Any>>;

	/// Returns the strategy as an `Any` reference for downcasting.
	fn as_any(&self) -> &dyn Any;
}

/// Wrapper storing a typed strategy function with its descriptor.
pub(crate) struct StrategyFn<T> {
	descriptor: TypeDescriptor,
	func: Box<dyn Fn(&mut GenerationContext) -> GenResult<T> + Send + Sync>,
}

impl<T: 'static> StrategyFn<T> {
	pub(crate) fn invoke(&self, ctx: &mut GenerationContext) -> GenResult<T> {
		(self.func)(ctx)
	}
}

impl<T: 'static> ErasedStrategy for StrategyFn<T> {
	fn descriptor(&self) -> &TypeDescriptor {
		&self.descriptor
	}

	fn generate_boxed(&self, ctx: &mut GenerationContext) -> GenResult<Box<dyn Any>> {
		Ok(Box::new((self.func)(ctx)?))
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Registration table mapping shape descriptors to strategies.
///
/// Registration is idempotent: a later registration for the exact same
/// shape replaces the earlier one. Registrations for container shapes
/// (`Vec<T>`) are independent of registrations for the element shape `T`.
#[derive(Default)]
pub struct TypeRegistry {
	entries: HashMap<TypeId, Arc<dyn ErasedStrategy>>,
}

impl TypeRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a strategy for `T`, replacing any earlier registration
	/// for the same shape.
	///
	/// The strategy may call back into the context to request nested
	/// values; the recursion guard applies to those nested requests.
	pub fn register<T, F>(&mut self, strategy: F)
	where
		T: 'static,
		F: Fn(&mut GenerationContext) -> GenResult<T> + Send + Sync + 'static,
	{
		let descriptor = TypeDescriptor::of::<T>();
		tracing::trace!(shape = descriptor.type_name(), "registering strategy");
		self.entries.insert(
			descriptor.type_id(),
			Arc::new(StrategyFn {
				descriptor,
				func: Box::new(strategy),
			}),
		);
	}

	/// Removes the registration for `T`, returning true if one existed.
	pub fn unregister<T: 'static>(&mut self) -> bool {
		self.entries.remove(&TypeId::of::<T>()).is_some()
	}

	/// Returns true if a strategy is registered for `T`.
	pub fn contains<T: 'static>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<T>())
	}

	/// Resolves the strategy registered for the given shape.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::UnsupportedType`] if no strategy is
	/// registered for the shape.
	pub fn resolve(&self, descriptor: &TypeDescriptor) -> GenResult<Arc<dyn ErasedStrategy>> {
		self.entries
			.get(&descriptor.type_id())
			.cloned()
			.ok_or_else(|| GenerationError::UnsupportedType {
				type_name: descriptor.type_name().to_string(),
			})
	}

	/// Looks up a strategy by type identity without treating absence as an
	/// error; absence means the caller falls back to structural
	/// construction.
	pub(crate) fn lookup(&self, id: TypeId) -> Option<Arc<dyn ErasedStrategy>> {
		self.entries.get(&id).cloned()
	}

	/// Names of all registered shapes.
	pub fn type_names(&self) -> Vec<&'static str> {
		self.entries
			.values()
			.map(|entry| entry.descriptor().type_name())
			.collect()
	}

	/// Number of registered strategies.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no strategies are registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Removes all registrations.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

impl std::fmt::Debug for TypeRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeRegistry")
			.field("registered", &self.len())
			.finish()
	}
}
