//! Memoized fixture reuse.
//!
//! A [`FixtureCache`] wraps a [`GenerationContext`] and hands out shared
//! references to generated entities, keyed by shape and an optional name.
//! Within one cache instance, repeated requests for the same key return
//! the same allocation until the key is cleared, so several tests (or
//! several collaborators in one test) observe the same entity.
//!
//! The cache is safe to share across test threads: every operation is
//! serialized through one coarse per-instance lock, which also makes
//! same-key generation single-flight. At most one generation happens per
//! key, and every caller observes the same resulting reference.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::GenerationContext;
use crate::error::GenResult;
use crate::generate::Generatable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
	type_id: TypeId,
	name: Option<String>,
}

struct CacheInner {
	context: GenerationContext,
	entries: HashMap<CacheKey, Arc<dyn Any + Send + Sync>>,
}

/// Memoizing fixture factory, shareable across test threads.
///
/// # Examples
///
/// ```
/// use specimen::FixtureCache;
///
/// let cache = FixtureCache::with_seed(42);
///
/// let first = cache.get_or_create_named::<String>("greeting").unwrap();
/// let second = cache.get_or_create_named::<String>("greeting").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
///
/// cache.clear_named::<String>("greeting");
/// let third = cache.get_or_create_named::<String>("greeting").unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&first, &third));
/// ```
pub struct FixtureCache {
	inner: Mutex<CacheInner>,
}

impl FixtureCache {
	/// Creates a cache around an existing context.
	pub fn new(context: GenerationContext) -> Self {
		Self {
			inner: Mutex::new(CacheInner {
				context,
				entries: HashMap::new(),
			}),
		}
	}

	/// Creates a cache around a context with the given seed.
	pub fn with_seed(seed: u64) -> Self {
		Self::new(GenerationContext::with_seed(seed))
	}

	/// Returns the cached unnamed entity of `T`, generating it on first
	/// request.
	pub fn get_or_create<T>(&self) -> GenResult<Arc<T>>
	where
		T: Generatable + Send + Sync,
	{
		self.fetch(None)
	}

	/// Returns the cached entity of `T` stored under `name`, generating it
	/// on first request. Entities under different names are distinct.
	pub fn get_or_create_named<T>(&self, name: &str) -> GenResult<Arc<T>>
	where
		T: Generatable + Send + Sync,
	{
		self.fetch(Some(name))
	}

	fn fetch<T>(&self, name: Option<&str>) -> GenResult<Arc<T>>
	where
		T: Generatable + Send + Sync,
	{
		let key = CacheKey {
			type_id: TypeId::of::<T>(),
			name: name.map(str::to_string),
		};
		let mut inner = self.inner.lock();
		if let Some(entry) = inner.entries.get(&key) {
			if let Ok(existing) = Arc::clone(entry).downcast::<T>() {
				tracing::debug!(
					shape = type_name::<T>(),
					name = name.unwrap_or_default(),
					"fixture cache hit"
				);
				return Ok(existing);
			}
		}
		tracing::debug!(
			shape = type_name::<T>(),
			name = name.unwrap_or_default(),
			"fixture cache miss"
		);
		let value = Arc::new(inner.context.create::<T>()?);
		inner
			.entries
			.insert(key, Arc::clone(&value) as Arc<dyn Any + Send + Sync>);
		Ok(value)
	}

	/// Returns true if an unnamed entity of `T` is cached.
	pub fn contains<T: 'static>(&self) -> bool {
		self.contains_key::<T>(None)
	}

	/// Returns true if an entity of `T` is cached under `name`.
	pub fn contains_named<T: 'static>(&self, name: &str) -> bool {
		self.contains_key::<T>(Some(name))
	}

	fn contains_key<T: 'static>(&self, name: Option<&str>) -> bool {
		let key = CacheKey {
			type_id: TypeId::of::<T>(),
			name: name.map(str::to_string),
		};
		self.inner.lock().entries.contains_key(&key)
	}

	/// Evicts every entry; subsequent requests regenerate.
	pub fn clear(&self) {
		self.inner.lock().entries.clear();
	}

	/// Evicts every entry of shape `T`, named or not.
	pub fn clear_type<T: 'static>(&self) {
		self.inner
			.lock()
			.entries
			.retain(|key, _| key.type_id != TypeId::of::<T>());
	}

	/// Evicts the entry of shape `T` stored under `name`.
	pub fn clear_named<T: 'static>(&self, name: &str) {
		let key = CacheKey {
			type_id: TypeId::of::<T>(),
			name: Some(name.to_string()),
		};
		self.inner.lock().entries.remove(&key);
	}

	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.inner.lock().entries.len()
	}

	/// Returns true if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.inner.lock().entries.is_empty()
	}

	/// Runs a closure against the owned context under the cache lock.
	///
	/// Use this to register strategies or generate uncached values through
	/// a shared cache; the closure runs serialized with all cache traffic.
	pub fn with_context<R>(&self, f: impl FnOnce(&mut GenerationContext) -> R) -> R {
		f(&mut self.inner.lock().context)
	}
}

impl fmt::Debug for FixtureCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixtureCache")
			.field("entries", &self.len())
			.finish_non_exhaustive()
	}
}
