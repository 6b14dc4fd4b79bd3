//! Shape descriptors for generation requests.
//!
//! A [`TypeDescriptor`] identifies the shape a generation request targets:
//! a concrete type plus, for containers, the shape of its elements. Two
//! descriptors are equal iff they denote the same shape, which in Rust is
//! already guaranteed by the type identity: `Vec<T>` and `T` have distinct
//! [`TypeId`]s, so container registrations never collide with element
//! registrations.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies the shape a generation request targets.
///
/// # Examples
///
/// ```
/// use specimen::TypeDescriptor;
///
/// let scalar = TypeDescriptor::of::<u32>();
/// let list = TypeDescriptor::container::<Vec<u32>, u32>();
///
/// assert_ne!(scalar, list);
/// assert_eq!(list.element(), Some(&scalar));
/// ```
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
	id: TypeId,
	name: &'static str,
	element: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
	/// Creates the descriptor for a non-container shape.
	pub fn of<T: 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
			element: None,
		}
	}

	/// Creates the descriptor for a container shape with element shape `E`.
	pub fn container<C: 'static, E: 'static>() -> Self {
		Self {
			id: TypeId::of::<C>(),
			name: type_name::<C>(),
			element: Some(Box::new(Self::of::<E>())),
		}
	}

	/// The type identity this descriptor denotes.
	pub fn type_id(&self) -> TypeId {
		self.id
	}

	/// Human-readable name of the shape.
	pub fn type_name(&self) -> &'static str {
		self.name
	}

	/// The element shape, for container descriptors.
	pub fn element(&self) -> Option<&TypeDescriptor> {
		self.element.as_deref()
	}

	/// Returns true if this descriptor denotes a container shape.
	pub fn is_container(&self) -> bool {
		self.element.is_some()
	}
}

impl PartialEq for TypeDescriptor {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
