//! Generation sessions.
//!
//! A [`GenerationContext`] orchestrates one generation session: it owns the
//! strategy registry, the recursion guard and the single seeded random
//! source every generator draws from. Two contexts constructed with the
//! same seed and the same registrations produce identical value sequences
//! for identical call sequences, which is what makes failing tests
//! reproducible.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::descriptor::TypeDescriptor;
use crate::error::{GenResult, GenerationError};
use crate::generate::Generatable;
use crate::recursion::{Descent, RecursionGuard, RecursionPolicy};
use crate::registry::{StrategyFn, TypeRegistry};
use crate::scenario::ScenarioBuilder;

/// Default number of elements produced for container shapes.
pub const DEFAULT_COLLECTION_SIZE: usize = 3;

/// One generation session: registry, recursion guard and seeded randomness.
///
/// # Examples
///
/// ```
/// use specimen::GenerationContext;
///
/// let mut ctx = GenerationContext::with_seed(42);
/// let word: String = ctx.create().unwrap();
/// let numbers: Vec<u32> = ctx.create_many(5).unwrap();
///
/// assert!(!word.is_empty());
/// assert_eq!(numbers.len(), 5);
/// ```
pub struct GenerationContext {
	registry: TypeRegistry,
	guard: RecursionGuard,
	rng: StdRng,
	seed: u64,
	collection_size: usize,
	sequences: HashMap<String, u64>,
}

impl GenerationContext {
	/// Creates a context seeded from OS entropy.
	///
	/// The chosen seed is logged at debug level so a failing run can be
	/// reproduced with [`GenerationContext::with_seed`].
	pub fn new() -> Self {
		let seed = rand::random();
		tracing::debug!(seed, "generation context seeded from entropy");
		Self::with_seed(seed)
	}

	/// Creates a context with an explicit seed and default configuration.
	pub fn with_seed(seed: u64) -> Self {
		Self {
			registry: TypeRegistry::new(),
			guard: RecursionGuard::new(RecursionPolicy::default()),
			rng: StdRng::seed_from_u64(seed),
			seed,
			collection_size: DEFAULT_COLLECTION_SIZE,
			sequences: HashMap::new(),
		}
	}

	/// Starts building a context with non-default configuration.
	///
	/// # Examples
	///
	/// ```
	/// use specimen::{GenerationContext, RecursionPolicy};
	///
	/// let ctx = GenerationContext::builder()
	/// 	.seed(7)
	/// 	.recursion_policy(RecursionPolicy::Fail { max_depth: 4 })
	/// 	.collection_size(10)
	/// 	.build()
	/// 	.unwrap();
	/// assert_eq!(ctx.seed(), 7);
	/// ```
	pub fn builder() -> GenerationContextBuilder {
		GenerationContextBuilder::new()
	}

	/// The seed this context was constructed with.
	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// The active recursion policy.
	pub fn recursion_policy(&self) -> RecursionPolicy {
		self.guard.policy()
	}

	/// Number of elements container generators produce by default.
	pub fn collection_size(&self) -> usize {
		self.collection_size
	}

	/// The context's random source. All generation draws from this single
	/// seeded source; strategies should use it rather than ambient
	/// randomness so the determinism contract holds.
	pub fn rng(&mut self) -> &mut StdRng {
		&mut self.rng
	}

	/// The strategy registry.
	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	/// Registers a strategy for `T`, replacing any earlier registration
	/// for the same shape.
	///
	/// # Examples
	///
	/// ```
	/// use specimen::GenerationContext;
	///
	/// let mut ctx = GenerationContext::with_seed(0);
	/// ctx.register::<String, _>(|ctx| {
	/// 	Ok(format!("word-{}", ctx.next_sequence("word")))
	/// });
	///
	/// assert_eq!(ctx.create::<String>().unwrap(), "word-0");
	/// assert_eq!(ctx.create::<String>().unwrap(), "word-1");
	/// ```
	pub fn register<T, F>(&mut self, strategy: F)
	where
		T: 'static,
		F: Fn(&mut GenerationContext) -> GenResult<T> + Send + Sync + 'static,
	{
		self.registry.register::<T, F>(strategy);
	}

	/// Removes the registration for `T`, returning true if one existed.
	pub fn unregister<T: 'static>(&mut self) -> bool {
		self.registry.unregister::<T>()
	}

	/// Generates one value of `T`.
	///
	/// Resolution order: an exact registered strategy for `T` first, then
	/// the type's own [`Generatable::generate`] (built-in scalar and
	/// container generators, or field-by-field construction for
	/// composites). The recursion guard bounds re-entrant construction of
	/// the same shape.
	///
	/// # Errors
	///
	/// Propagates [`GenerationError::CyclicGraph`] when the recursion
	/// bound is hit and the shape has no sentinel (or the fail-fast policy
	/// is active), and any error a strategy returns.
	pub fn create<T: Generatable>(&mut self) -> GenResult<T> {
		let descriptor = T::descriptor();
		match self.guard.enter(&descriptor)? {
			Descent::ShortCircuit => {
				tracing::trace!(
					shape = descriptor.type_name(),
					"recursion bound reached, substituting sentinel"
				);
				T::recursion_sentinel().ok_or_else(|| GenerationError::CyclicGraph {
					type_name: descriptor.type_name().to_string(),
					max_depth: self.guard.policy().max_depth(),
				})
			}
			Descent::Descend => {
				let result = self.dispatch::<T>();
				self.guard.exit(&descriptor);
				result
			}
		}
	}

	fn dispatch<T: Generatable>(&mut self) -> GenResult<T> {
		if let Some(strategy) = self.registry.lookup(TypeId::of::<T>()) {
			if let Some(typed) = strategy.as_any().downcast_ref::<StrategyFn<T>>() {
				return typed.invoke(self);
			}
		}
		T::generate(self)
	}

	/// Generates one value of `T`, then applies a caller-supplied mutation.
	///
	/// Used to pin specific fields while leaving the rest synthetic.
	///
	/// # Examples
	///
	/// ```
	/// use specimen::GenerationContext;
	///
	/// let mut ctx = GenerationContext::with_seed(1);
	/// let exact: u32 = ctx.create_with(|n| *n = 1000).unwrap();
	/// assert_eq!(exact, 1000);
	/// ```
	pub fn create_with<T: Generatable>(
		&mut self,
		configure: impl FnOnce(&mut T),
	) -> GenResult<T> {
		let mut value = self.create::<T>()?;
		configure(&mut value);
		Ok(value)
	}

	/// Generates exactly `count` values of `T`.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::InvalidConfiguration`] for a zero count.
	pub fn create_many<T: Generatable>(&mut self, count: usize) -> GenResult<Vec<T>> {
		ensure_positive(count)?;
		(0..count).map(|_| self.create::<T>()).collect()
	}

	/// Generates the configured default number of values of `T`.
	pub fn create_many_default<T: Generatable>(&mut self) -> GenResult<Vec<T>> {
		let count = self.collection_size;
		self.create_many(count)
	}

	/// Lazy variant of [`create_many`](Self::create_many): a finite,
	/// non-restartable iterator that generates values on demand, for
	/// callers that only consume a prefix.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::InvalidConfiguration`] for a zero count.
	///
	/// # Examples
	///
	/// ```
	/// use specimen::GenerationContext;
	///
	/// let mut ctx = GenerationContext::with_seed(3);
	/// let first_two: Vec<u32> = ctx
	/// 	.create_iter(100)
	/// 	.unwrap()
	/// 	.take(2)
	/// 	.collect::<Result<_, _>>()
	/// 	.unwrap();
	/// assert_eq!(first_two.len(), 2);
	/// ```
	pub fn create_iter<T: Generatable>(&mut self, count: usize) -> GenResult<CreateIter<'_, T>> {
		ensure_positive(count)?;
		Ok(CreateIter {
			ctx: self,
			remaining: count,
			_marker: PhantomData,
		})
	}

	/// Dynamic entry point: generates a boxed value for a descriptor,
	/// consulting registered strategies only.
	///
	/// This is the path for requests keyed by runtime shape rather than by
	/// a type parameter; unlike [`create`](Self::create) there is no
	/// structural fallback.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::UnsupportedType`] when no strategy is
	/// registered for the shape, and [`GenerationError::CyclicGraph`] at
	/// the recursion bound (a boxed value has no sentinel).
	pub fn create_erased(&mut self, descriptor: &TypeDescriptor) -> GenResult<Box<dyn Any>> {
		match self.guard.enter(descriptor)? {
			Descent::ShortCircuit => Err(GenerationError::CyclicGraph {
				type_name: descriptor.type_name().to_string(),
				max_depth: self.guard.policy().max_depth(),
			}),
			Descent::Descend => {
				let result = match self.registry.resolve(descriptor) {
					Ok(strategy) => strategy.generate_boxed(self),
					Err(err) => Err(err),
				};
				self.guard.exit(descriptor);
				result
			}
		}
	}

	/// Returns true if descending into `T` would hit the recursion bound
	/// under the omit policy.
	///
	/// Nullable and collection shapes consult this before generating their
	/// inner value, so a cycle terminates at the nearest point that has a
	/// sentinel: `Option<Box<Employee>>` becomes `None`, `Vec<Employee>`
	/// becomes empty.
	pub fn should_omit<T: Generatable>(&self) -> bool {
		self.guard.should_omit(&T::probe_descriptor())
	}

	/// Next value of the named per-context counter, starting at zero.
	pub fn next_sequence(&mut self, key: &str) -> u64 {
		let counter = self.sequences.entry(key.to_string()).or_insert(0);
		let value = *counter;
		*counter += 1;
		value
	}

	/// Formats the next value of the named counter into a pattern with a
	/// `{n}` placeholder.
	///
	/// # Examples
	///
	/// ```
	/// use specimen::GenerationContext;
	///
	/// let mut ctx = GenerationContext::with_seed(0);
	/// assert_eq!(ctx.sequence_value("code", "user-{n}"), "user-0");
	/// assert_eq!(ctx.sequence_value("code", "user-{n}"), "user-1");
	/// ```
	pub fn sequence_value(&mut self, key: &str, pattern: &str) -> String {
		let n = self.next_sequence(key);
		pattern.replace("{n}", &n.to_string())
	}

	/// Starts composing a named scenario on top of this context.
	pub fn scenario(&mut self) -> ScenarioBuilder<'_> {
		ScenarioBuilder::new(self)
	}
}

impl Default for GenerationContext {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for GenerationContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GenerationContext")
			.field("seed", &self.seed)
			.field("collection_size", &self.collection_size)
			.field("registered", &self.registry.len())
			.finish_non_exhaustive()
	}
}

/// Lazy, finite, non-restartable sequence of generated values.
///
/// Yields at most the requested number of values; dropping the iterator
/// early leaves the remaining values ungenerated.
pub struct CreateIter<'ctx, T: Generatable> {
	ctx: &'ctx mut GenerationContext,
	remaining: usize,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Generatable> Iterator for CreateIter<'_, T> {
	type Item = GenResult<T>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		self.remaining -= 1;
		Some(self.ctx.create())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<T: Generatable> ExactSizeIterator for CreateIter<'_, T> {}

/// Builder for a [`GenerationContext`] with non-default configuration.
#[derive(Debug, Clone)]
pub struct GenerationContextBuilder {
	seed: Option<u64>,
	policy: RecursionPolicy,
	collection_size: usize,
}

impl GenerationContextBuilder {
	/// Creates a builder with default configuration.
	pub fn new() -> Self {
		Self {
			seed: None,
			policy: RecursionPolicy::default(),
			collection_size: DEFAULT_COLLECTION_SIZE,
		}
	}

	/// Seed for the context's random source. Without an explicit seed the
	/// context is seeded from OS entropy.
	pub fn seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Policy applied when construction re-enters a shape at its bound.
	pub fn recursion_policy(mut self, policy: RecursionPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Number of elements container generators produce.
	pub fn collection_size(mut self, size: usize) -> Self {
		self.collection_size = size;
		self
	}

	/// Builds the context.
	///
	/// # Errors
	///
	/// Returns [`GenerationError::InvalidConfiguration`] for a zero
	/// collection size or a zero recursion depth bound.
	pub fn build(self) -> GenResult<GenerationContext> {
		if self.collection_size == 0 {
			return Err(GenerationError::InvalidConfiguration(
				"collection size must be positive".to_string(),
			));
		}
		if self.policy.max_depth() == 0 {
			return Err(GenerationError::InvalidConfiguration(
				"recursion depth bound must be positive".to_string(),
			));
		}
		let seed = match self.seed {
			Some(seed) => seed,
			None => {
				let seed = rand::random();
				tracing::debug!(seed, "generation context seeded from entropy");
				seed
			}
		};
		let mut ctx = GenerationContext::with_seed(seed);
		ctx.guard = RecursionGuard::new(self.policy);
		ctx.collection_size = self.collection_size;
		Ok(ctx)
	}
}

impl Default for GenerationContextBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn ensure_positive(count: usize) -> GenResult<()> {
	if count == 0 {
		return Err(GenerationError::InvalidConfiguration(
			"requested count must be positive".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_same_seed_same_values() {
		let mut first = GenerationContext::with_seed(42);
		let mut second = GenerationContext::with_seed(42);

		let a: Vec<u32> = first.create_many(10).unwrap();
		let b: Vec<u32> = second.create_many(10).unwrap();
		assert_eq!(a, b);
	}

	#[rstest]
	fn test_registered_strategy_takes_precedence() {
		let mut ctx = GenerationContext::with_seed(0);
		ctx.register::<u32, _>(|_| Ok(99));
		assert_eq!(ctx.create::<u32>().unwrap(), 99);

		ctx.unregister::<u32>();
		// Back to the built-in bounded generator.
		let value = ctx.create::<u32>().unwrap();
		assert!(value < 10_000);
	}

	#[rstest]
	fn test_create_many_exact_count() {
		let mut ctx = GenerationContext::with_seed(5);
		let values: Vec<bool> = ctx.create_many(5).unwrap();
		assert_eq!(values.len(), 5);
	}

	#[rstest]
	fn test_create_many_zero_is_invalid() {
		let mut ctx = GenerationContext::with_seed(5);
		let result = ctx.create_many::<u32>(0);
		assert!(matches!(
			result,
			Err(GenerationError::InvalidConfiguration(_))
		));
	}

	#[rstest]
	fn test_create_iter_is_lazy_and_finite() {
		let mut ctx = GenerationContext::with_seed(5);
		{
			let mut iter = ctx.create_iter::<u32>(3).unwrap();
			assert_eq!(iter.len(), 3);
			assert!(iter.next().unwrap().is_ok());
		}
		// Context remains usable after dropping the iterator early.
		assert!(ctx.create::<u32>().is_ok());
	}

	#[rstest]
	fn test_create_with_pins_fields() {
		let mut ctx = GenerationContext::with_seed(9);
		let value: String = ctx.create_with(|s: &mut String| s.push('!')).unwrap();
		assert!(value.ends_with('!'));
	}

	#[rstest]
	fn test_create_erased_requires_registration() {
		let mut ctx = GenerationContext::with_seed(2);
		let descriptor = TypeDescriptor::of::<u32>();
		assert!(matches!(
			ctx.create_erased(&descriptor),
			Err(GenerationError::UnsupportedType { .. })
		));

		ctx.register::<u32, _>(|_| Ok(11));
		let boxed = ctx.create_erased(&descriptor).unwrap();
		assert_eq!(*boxed.downcast::<u32>().unwrap(), 11);
	}

	#[rstest]
	fn test_sequences_are_per_key() {
		let mut ctx = GenerationContext::with_seed(0);
		assert_eq!(ctx.next_sequence("a"), 0);
		assert_eq!(ctx.next_sequence("a"), 1);
		assert_eq!(ctx.next_sequence("b"), 0);
	}

	#[rstest]
	fn test_builder_rejects_zero_collection_size() {
		let result = GenerationContext::builder().collection_size(0).build();
		assert!(matches!(
			result,
			Err(GenerationError::InvalidConfiguration(_))
		));
	}

	#[rstest]
	fn test_builder_rejects_zero_depth_bound() {
		let result = GenerationContext::builder()
			.recursion_policy(RecursionPolicy::Omit { max_depth: 0 })
			.build();
		assert!(matches!(
			result,
			Err(GenerationError::InvalidConfiguration(_))
		));
	}
}
