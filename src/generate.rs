//! The `Generatable` capability and built-in value generators.
//!
//! Rust has no runtime field reflection, so composite types opt into
//! generation by implementing [`Generatable`] ("construct with context"),
//! either by hand or with `#[derive(Generatable)]`. Scalars and the common
//! container shapes have built-in implementations here: bounded integers,
//! printable strings, booleans and timestamps in a sane range for scalar
//! kinds; element-count loops for containers. Registered strategies always
//! take precedence over these (see [`GenerationContext::create`]).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::{Rng, RngCore};

use crate::context::GenerationContext;
use crate::descriptor::TypeDescriptor;
use crate::error::GenResult;

/// Capability to construct a synthetic value with a generation context.
///
/// Implementations request nested values through
/// [`GenerationContext::create`], never by calling `generate` on the field
/// type directly, so registered strategy overrides and the recursion guard
/// apply at every level of the object graph.
///
/// # Examples
///
/// ```
/// use specimen::{GenResult, Generatable, GenerationContext};
///
/// struct Person {
/// 	name: String,
/// 	age: u8,
/// }
///
/// impl Generatable for Person {
/// 	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
/// 		Ok(Self {
/// 			name: ctx.create()?,
/// 			age: ctx.create()?,
/// 		})
/// 	}
/// }
///
/// let mut ctx = GenerationContext::with_seed(42);
/// let person = ctx.create::<Person>().unwrap();
/// assert!(!person.name.is_empty());
/// ```
pub trait Generatable: Sized + 'static {
	/// The shape this type answers generation requests for.
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::of::<Self>()
	}

	/// The shape consulted for recursion-limit probing. Transparent
	/// wrappers (`Box`) forward to their inner shape so that omission
	/// decisions see through them.
	fn probe_descriptor() -> TypeDescriptor {
		Self::descriptor()
	}

	/// Constructs a value using the context.
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self>;

	/// The value substituted when recursive construction of this shape is
	/// omitted; `None` when the shape has no sentinel.
	fn recursion_sentinel() -> Option<Self> {
		None
	}
}

macro_rules! generatable_int {
	($($ty:ty => $hi:literal),* $(,)?) => {$(
		impl Generatable for $ty {
			fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
				Ok(ctx.rng().gen_range(0..$hi))
			}
		}
	)*};
}

// Bounds keep generated values display-friendly in assertion output.
generatable_int! {
	i8 => 100,
	i16 => 10_000,
	i32 => 10_000,
	i64 => 10_000,
	isize => 10_000,
	u8 => 100,
	u16 => 10_000,
	u32 => 10_000,
	u64 => 10_000,
	usize => 10_000,
}

impl Generatable for f32 {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(ctx.rng().gen_range(0.0..10_000.0))
	}
}

impl Generatable for f64 {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(ctx.rng().gen_range(0.0..10_000.0))
	}
}

impl Generatable for bool {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(ctx.rng().gen_bool(0.5))
	}
}

impl Generatable for char {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(ctx.rng().gen_range('a'..='z'))
	}
}

impl Generatable for String {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(Word().fake_with_rng(ctx.rng()))
	}
}

impl Generatable for DateTime<Utc> {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		// 2000-01-01 .. 2030-01-01
		let secs = ctx.rng().gen_range(946_684_800i64..1_893_456_000i64);
		Ok(DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH))
	}
}

/// Opaque identifier for generated entities.
///
/// Scenario graphs reference each other by id rather than by owned
/// back-pointers, which keeps cyclic relationships representable without
/// ownership cycles: assign `a.id` into `b.employer` instead of storing
/// `a` inside `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
	/// Creates an id from a raw value.
	pub fn from_raw(value: u64) -> Self {
		Self(value)
	}

	/// The raw id value.
	pub fn value(self) -> u64 {
		self.0
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

impl Generatable for EntityId {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(Self(ctx.rng().next_u64()))
	}
}

impl<T: Generatable> Generatable for Option<T> {
	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		if ctx.should_omit::<T>() {
			return Ok(None);
		}
		Ok(Some(ctx.create()?))
	}

	fn recursion_sentinel() -> Option<Self> {
		Some(None)
	}
}

impl<T: Generatable> Generatable for Box<T> {
	fn probe_descriptor() -> TypeDescriptor {
		T::probe_descriptor()
	}

	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		Ok(Box::new(ctx.create()?))
	}
}

impl<T: Generatable> Generatable for Vec<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::container::<Vec<T>, T>()
	}

	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		if ctx.should_omit::<T>() {
			return Ok(Vec::new());
		}
		let count = ctx.collection_size();
		let mut items = Vec::with_capacity(count);
		for _ in 0..count {
			items.push(ctx.create()?);
		}
		Ok(items)
	}

	fn recursion_sentinel() -> Option<Self> {
		Some(Vec::new())
	}
}

impl<K, V> Generatable for HashMap<K, V>
where
	K: Generatable + Eq + Hash,
	V: Generatable,
{
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::container::<HashMap<K, V>, (K, V)>()
	}

	fn generate(ctx: &mut GenerationContext) -> GenResult<Self> {
		if ctx.should_omit::<K>() || ctx.should_omit::<V>() {
			return Ok(HashMap::new());
		}
		let count = ctx.collection_size();
		let mut map = HashMap::with_capacity(count);
		// Key collisions collapse, so the map holds at most `count` entries.
		for _ in 0..count {
			let key = ctx.create()?;
			let value = ctx.create()?;
			map.insert(key, value);
		}
		Ok(map)
	}

	fn recursion_sentinel() -> Option<Self> {
		Some(HashMap::new())
	}
}
