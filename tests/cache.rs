//! Identity and eviction semantics of the fixture cache.

#[path = "helpers/entities.rs"]
mod entities;

use std::sync::Arc;
use std::thread;

use entities::{Company, User};
use rstest::rstest;
use specimen::FixtureCache;

#[rstest]
fn repeated_requests_return_the_same_reference() {
	let cache = FixtureCache::with_seed(42);

	let first = cache.get_or_create_named::<User>("x").unwrap();
	let second = cache.get_or_create_named::<User>("x").unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(first.id, second.id);
}

#[rstest]
fn distinct_names_yield_distinct_references() {
	let cache = FixtureCache::with_seed(42);

	let x = cache.get_or_create_named::<User>("x").unwrap();
	let y = cache.get_or_create_named::<User>("y").unwrap();

	assert!(!Arc::ptr_eq(&x, &y));
	assert_ne!(x.id, y.id);
}

#[rstest]
fn clearing_a_key_regenerates() {
	let cache = FixtureCache::with_seed(42);

	let before = cache.get_or_create_named::<User>("x").unwrap();
	cache.clear_named::<User>("x");
	let after = cache.get_or_create_named::<User>("x").unwrap();

	assert!(!Arc::ptr_eq(&before, &after));
}

#[rstest]
fn clearing_a_type_leaves_other_types_cached() {
	let cache = FixtureCache::with_seed(42);

	let user = cache.get_or_create_named::<User>("x").unwrap();
	let company = cache.get_or_create_named::<Company>("x").unwrap();

	cache.clear_type::<User>();
	assert!(!cache.contains_named::<User>("x"));
	assert!(cache.contains_named::<Company>("x"));

	let company_again = cache.get_or_create_named::<Company>("x").unwrap();
	assert!(Arc::ptr_eq(&company, &company_again));

	let user_again = cache.get_or_create_named::<User>("x").unwrap();
	assert!(!Arc::ptr_eq(&user, &user_again));
}

#[rstest]
fn clear_all_empties_the_cache() {
	let cache = FixtureCache::with_seed(42);
	cache.get_or_create::<User>().unwrap();
	cache.get_or_create_named::<User>("x").unwrap();
	assert_eq!(cache.len(), 2);

	cache.clear();
	assert!(cache.is_empty());
}

#[rstest]
fn concurrent_requests_for_one_key_observe_one_entity() {
	let cache = Arc::new(FixtureCache::with_seed(42));

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let cache = Arc::clone(&cache);
			thread::spawn(move || cache.get_or_create_named::<User>("shared").unwrap())
		})
		.collect();

	let references: Vec<Arc<User>> = handles
		.into_iter()
		.map(|handle| handle.join().unwrap())
		.collect();

	// Exactly one generation happened; every caller holds the same allocation.
	assert_eq!(cache.len(), 1);
	for reference in &references[1..] {
		assert!(Arc::ptr_eq(&references[0], reference));
	}
}

#[rstest]
fn strategies_registered_through_the_cache_apply() {
	let cache = FixtureCache::with_seed(42);
	cache.with_context(|ctx| {
		ctx.register::<String, _>(|ctx| Ok(format!("cached-{}", ctx.next_sequence("cache"))));
	});

	let value = cache.get_or_create_named::<String>("greeting").unwrap();
	assert_eq!(*value, "cached-0");

	// The cached entry is reused, not regenerated.
	let again = cache.get_or_create_named::<String>("greeting").unwrap();
	assert_eq!(*again, "cached-0");
}
