//! Convenience re-exports for common usage.
//!
//! This module provides a single import for the most commonly used items
//! from the specimen crate.
//!
//! # Example
//!
//! ```
//! use specimen::prelude::*;
//!
//! let mut ctx = GenerationContext::with_seed(42);
//! let word: String = ctx.create().unwrap();
//! assert!(!word.is_empty());
//! ```

// Error types
pub use crate::error::{GenResult, GenerationError};

// Generation session
pub use crate::context::{CreateIter, GenerationContext, GenerationContextBuilder};

// Shapes & strategies
pub use crate::descriptor::TypeDescriptor;
pub use crate::generate::{EntityId, Generatable};
pub use crate::recursion::RecursionPolicy;
pub use crate::registry::TypeRegistry;

// Fake data kinds
pub use crate::faker::FakerKind;

// Caching & scenarios
pub use crate::cache::FixtureCache;
pub use crate::scenario::ScenarioBuilder;

// Re-export the Generatable derive macro when available
#[cfg(feature = "macros")]
pub use specimen_macros::Generatable;
