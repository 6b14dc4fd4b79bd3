//! Synthetic test-entity generation, scenario composition and fixture
//! caching.
//!
//! This crate produces realistic fixture objects for tests: given a
//! requested shape (a type, possibly nested or collection-typed), it
//! generates a fully populated value, optionally links several such values
//! into a coherent named scenario, and guarantees identity/reuse semantics
//! and reproducibility across requests.
//!
//! # Features
//!
//! - `macros` - `#[derive(Generatable)]` support (enabled by default)
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```
//! use specimen::prelude::*;
//!
//! #[derive(Debug, Generatable)]
//! struct User {
//! 	id: EntityId,
//! 	#[generatable(faker = "username")]
//! 	username: String,
//! 	#[generatable(faker = "email")]
//! 	email: String,
//! 	logins: u32,
//! }
//!
//! let mut ctx = GenerationContext::with_seed(42);
//!
//! let user: User = ctx.create().unwrap();
//! assert!(user.email.contains('@'));
//!
//! let batch: Vec<User> = ctx.create_many(5).unwrap();
//! assert_eq!(batch.len(), 5);
//! ```
//!
//! Two contexts constructed with the same seed and the same registrations
//! produce identical value sequences for identical call sequences, so a
//! failing test reproduces exactly.
//!
//! # Architecture
//!
//! - [`GenerationContext`] - one generation session: entry points
//!   (`create`, `create_many`), the strategy registry, the recursion guard
//!   and the single seeded random source
//! - [`Generatable`] - the construct-with-context capability composite
//!   types implement (by hand or via the derive); scalars and containers
//!   are built in
//! - [`TypeRegistry`] - maps requested shapes to caller-registered
//!   strategies, which always win over built-in construction
//! - [`RecursionPolicy`] - bounds self-referential construction, either
//!   substituting sentinels (`None`, empty) or failing fast
//! - [`FixtureCache`] - keyed, thread-safe reuse of generated entities
//!   with same-reference semantics until cleared
//! - [`ScenarioBuilder`] - composes named, interrelated entities into one
//!   fixture graph per test case
//!
//! # Scenarios
//!
//! ```
//! use specimen::prelude::*;
//!
//! #[derive(Debug, Generatable)]
//! struct Company {
//! 	id: EntityId,
//! 	#[generatable(faker = "company")]
//! 	name: String,
//! }
//!
//! #[derive(Debug, Generatable)]
//! struct User {
//! 	id: EntityId,
//! 	#[generatable(skip)]
//! 	employer: Option<EntityId>,
//! }
//!
//! let mut ctx = GenerationContext::with_seed(42);
//! let scenario = ctx
//! 	.scenario()
//! 	.with::<Company>("acme").unwrap()
//! 	.with::<User>("alice").unwrap()
//! 	.link::<User, Company>("alice", "acme", |user, company| {
//! 		user.employer = Some(company.id);
//! 	})
//! 	.unwrap();
//!
//! let acme = scenario.get::<Company>("acme").unwrap();
//! let alice = scenario.get::<User>("alice").unwrap();
//! assert_eq!(alice.employer, Some(acme.id));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod faker;
pub mod generate;
pub mod prelude;
pub mod recursion;
pub mod registry;
pub mod scenario;

// Re-export commonly used types at crate root
pub use cache::FixtureCache;
pub use context::{CreateIter, DEFAULT_COLLECTION_SIZE, GenerationContext, GenerationContextBuilder};
pub use descriptor::TypeDescriptor;
pub use error::{GenResult, GenerationError};
pub use generate::{EntityId, Generatable};
pub use recursion::{RecursionGuard, RecursionPolicy};
pub use registry::{ErasedStrategy, TypeRegistry};
pub use scenario::ScenarioBuilder;

// Re-export derive macro when available
#[cfg(feature = "macros")]
pub use specimen_macros::Generatable;
