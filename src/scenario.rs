//! Named scenario composition.
//!
//! A [`ScenarioBuilder`] composes several generated entities into one
//! coherent, named fixture graph for a test case: store entities under
//! handles, link them through caller-supplied relate closures, and read
//! them back by name or by type. The builder is a flat handle table on top
//! of a borrowed [`GenerationContext`]; it owns no resources beyond the
//! entities it stores and is discarded after the test's assertions.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::context::GenerationContext;
use crate::error::{GenResult, GenerationError};
use crate::generate::Generatable;

enum HandleValue {
	Entity(Box<dyn Any>),
	/// Member handle names of a named collection, in index order.
	Collection(Vec<String>),
}

struct HandleEntry {
	type_id: TypeId,
	type_name: &'static str,
	value: HandleValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DuplicatePolicy {
	#[default]
	Overwrite,
	Reject,
}

/// Fluent builder for a named graph of interrelated test entities.
///
/// # Examples
///
/// ```
/// use specimen::{EntityId, GenResult, Generatable, GenerationContext};
///
/// struct Company {
/// 	id: EntityId,
/// 	name: String,
/// }
///
/// struct User {
/// 	id: EntityId,
/// 	employer: Option<EntityId>,
/// }
///
/// impl Generatable for Company {
/// 	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
/// 		Ok(Self { id: ctx.create()?, name: ctx.create()? })
/// 	}
/// }
///
/// impl Generatable for User {
/// 	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
/// 		Ok(Self { id: ctx.create()?, employer: None })
/// 	}
/// }
///
/// let mut ctx = GenerationContext::with_seed(42);
/// let scenario = ctx
/// 	.scenario()
/// 	.with::<Company>("acme").unwrap()
/// 	.with::<User>("alice").unwrap()
/// 	.link::<User, Company>("alice", "acme", |user, company| {
/// 		user.employer = Some(company.id);
/// 	})
/// 	.unwrap();
///
/// let acme = scenario.get::<Company>("acme").unwrap();
/// let alice = scenario.get::<User>("alice").unwrap();
/// assert_eq!(alice.employer, Some(acme.id));
/// ```
pub struct ScenarioBuilder<'ctx> {
	context: &'ctx mut GenerationContext,
	handles: HashMap<String, HandleEntry>,
	order: Vec<String>,
	duplicates: DuplicatePolicy,
}

impl<'ctx> ScenarioBuilder<'ctx> {
	pub(crate) fn new(context: &'ctx mut GenerationContext) -> Self {
		Self {
			context,
			handles: HashMap::new(),
			order: Vec::new(),
			duplicates: DuplicatePolicy::default(),
		}
	}

	/// Switches duplicate-handle handling from the default
	/// overwrite-with-warning to rejection with
	/// [`GenerationError::DuplicateHandle`].
	pub fn strict(mut self) -> Self {
		self.duplicates = DuplicatePolicy::Reject;
		self
	}

	/// Generates an entity of `T` and stores it under `name`.
	///
	/// Reusing a name overwrites the handle (with a warning), not any
	/// entity other handles reference; in [`strict`](Self::strict) mode it
	/// fails instead.
	pub fn with<T: Generatable>(self, name: &str) -> GenResult<Self> {
		self.with_configured::<T>(name, |_| {})
	}

	/// Generates an entity of `T`, applies a caller mutation and stores it
	/// under `name`.
	pub fn with_configured<T: Generatable>(
		mut self,
		name: &str,
		configure: impl FnOnce(&mut T),
	) -> GenResult<Self> {
		let value = self.context.create_with(configure)?;
		self.store(name, entity_entry::<T>(value))?;
		Ok(self)
	}

	/// Stores a caller-built entity under `name`.
	pub fn with_value<T: 'static>(mut self, name: &str, value: T) -> GenResult<Self> {
		self.store(name, entity_entry::<T>(value))?;
		Ok(self)
	}

	/// Generates `count` entities of `T`, storing each under `name-i` and
	/// the collection itself under `name`.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::InvalidConfiguration`] for a zero count.
	pub fn with_many<T: Generatable>(mut self, name: &str, count: usize) -> GenResult<Self> {
		if count == 0 {
			return Err(GenerationError::InvalidConfiguration(
				"requested count must be positive".to_string(),
			));
		}
		if self.duplicates == DuplicatePolicy::Reject && self.handles.contains_key(name) {
			return Err(GenerationError::DuplicateHandle(name.to_string()));
		}
		let mut members = Vec::with_capacity(count);
		for index in 0..count {
			let member = format!("{name}-{index}");
			let value: T = self.context.create()?;
			self.store(&member, entity_entry::<T>(value))?;
			members.push(member);
		}
		self.store(
			name,
			HandleEntry {
				type_id: TypeId::of::<T>(),
				type_name: type_name::<T>(),
				value: HandleValue::Collection(members),
			},
		)?;
		Ok(self)
	}

	/// Looks up both handles and invokes `relate` with mutable access to
	/// both entities, so the closure can wire the relationship directly
	/// (assign an id back-reference, push onto a collection field, or
	/// both).
	///
	/// # Errors
	///
	/// Returns [`GenerationError::HandleNotFound`] if either handle is
	/// missing, [`GenerationError::TypeMismatch`] if a handle holds a
	/// different type than the call site expects, and
	/// [`GenerationError::InvalidConfiguration`] for self-links or
	/// collection handles.
	pub fn link<A, B>(
		mut self,
		name_a: &str,
		name_b: &str,
		relate: impl FnOnce(&mut A, &mut B),
	) -> GenResult<Self>
	where
		A: 'static,
		B: 'static,
	{
		if name_a == name_b {
			return Err(GenerationError::InvalidConfiguration(format!(
				"cannot link handle `{name_a}` to itself"
			)));
		}
		self.check_entity::<A>(name_a)?;
		self.check_entity::<B>(name_b)?;

		// Both checked above; take them out to hold two mutable borrows.
		let Some(mut entry_a) = self.handles.remove(name_a) else {
			return Err(GenerationError::HandleNotFound(name_a.to_string()));
		};
		let Some(mut entry_b) = self.handles.remove(name_b) else {
			self.handles.insert(name_a.to_string(), entry_a);
			return Err(GenerationError::HandleNotFound(name_b.to_string()));
		};
		if let (HandleValue::Entity(boxed_a), HandleValue::Entity(boxed_b)) =
			(&mut entry_a.value, &mut entry_b.value)
		{
			if let (Some(a), Some(b)) = (boxed_a.downcast_mut::<A>(), boxed_b.downcast_mut::<B>())
			{
				relate(a, b);
			}
		}
		self.handles.insert(name_a.to_string(), entry_a);
		self.handles.insert(name_b.to_string(), entry_b);
		Ok(self)
	}

	/// Retrieves the entity stored under `name`.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::HandleNotFound`] for an unknown handle
	/// and [`GenerationError::TypeMismatch`] when the stored type differs
	/// from `T`.
	pub fn get<T: 'static>(&self, name: &str) -> GenResult<&T> {
		self.check_entity::<T>(name)?;
		if let Some(entry) = self.handles.get(name) {
			if let HandleValue::Entity(boxed) = &entry.value {
				if let Some(value) = boxed.downcast_ref::<T>() {
					return Ok(value);
				}
			}
		}
		Err(GenerationError::HandleNotFound(name.to_string()))
	}

	/// Retrieves the members of the collection stored under `name`, in
	/// index order.
	pub fn get_many<T: 'static>(&self, name: &str) -> GenResult<Vec<&T>> {
		let entry = self
			.handles
			.get(name)
			.ok_or_else(|| GenerationError::HandleNotFound(name.to_string()))?;
		if entry.type_id != TypeId::of::<T>() {
			return Err(GenerationError::TypeMismatch {
				handle: name.to_string(),
				expected: type_name::<T>(),
				actual: entry.type_name,
			});
		}
		match &entry.value {
			HandleValue::Collection(members) => {
				members.iter().map(|member| self.get::<T>(member)).collect()
			}
			HandleValue::Entity(_) => Err(GenerationError::InvalidConfiguration(format!(
				"handle `{name}` names a single entity, not a collection"
			))),
		}
	}

	/// All stored entities of type `T`, in handle insertion order.
	pub fn get_all<T: 'static>(&self) -> Vec<&T> {
		self.order
			.iter()
			.filter_map(|name| {
				let entry = self.handles.get(name)?;
				match &entry.value {
					HandleValue::Entity(boxed) => boxed.downcast_ref::<T>(),
					HandleValue::Collection(_) => None,
				}
			})
			.collect()
	}

	/// Handle names in insertion order.
	pub fn names(&self) -> Vec<&str> {
		self.order.iter().map(String::as_str).collect()
	}

	/// Returns true if a handle with this name exists.
	pub fn contains(&self, name: &str) -> bool {
		self.handles.contains_key(name)
	}

	/// Number of stored handles, collection handles included.
	pub fn len(&self) -> usize {
		self.handles.len()
	}

	/// Returns true if no handles are stored.
	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}

	/// The owning generation context, for registrations or direct creates
	/// mid-scenario.
	pub fn context(&mut self) -> &mut GenerationContext {
		self.context
	}

	fn store(&mut self, name: &str, entry: HandleEntry) -> GenResult<()> {
		if self.handles.contains_key(name) {
			match self.duplicates {
				DuplicatePolicy::Reject => {
					return Err(GenerationError::DuplicateHandle(name.to_string()));
				}
				DuplicatePolicy::Overwrite => {
					tracing::warn!(handle = name, "overwriting existing scenario handle");
				}
			}
			self.handles.insert(name.to_string(), entry);
		} else {
			self.handles.insert(name.to_string(), entry);
			self.order.push(name.to_string());
		}
		Ok(())
	}

	fn check_entity<T: 'static>(&self, name: &str) -> GenResult<()> {
		let entry = self
			.handles
			.get(name)
			.ok_or_else(|| GenerationError::HandleNotFound(name.to_string()))?;
		match &entry.value {
			HandleValue::Collection(_) => Err(GenerationError::InvalidConfiguration(format!(
				"handle `{name}` names a collection, not a single entity"
			))),
			HandleValue::Entity(_) => {
				if entry.type_id != TypeId::of::<T>() {
					return Err(GenerationError::TypeMismatch {
						handle: name.to_string(),
						expected: type_name::<T>(),
						actual: entry.type_name,
					});
				}
				Ok(())
			}
		}
	}
}

fn entity_entry<T: 'static>(value: T) -> HandleEntry {
	HandleEntry {
		type_id: TypeId::of::<T>(),
		type_name: type_name::<T>(),
		value: HandleValue::Entity(Box::new(value)),
	}
}
