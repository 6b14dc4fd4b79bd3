//! Error types for the specimen crate.
//!
//! This module defines the error types used throughout the specimen crate.

use thiserror::Error;

/// Errors that can occur while generating entities or composing scenarios.
#[derive(Debug, Error)]
pub enum GenerationError {
	/// No strategy could be resolved for the requested shape.
	#[error("Unsupported type: {type_name}")]
	UnsupportedType {
		/// Name of the shape that could not be resolved.
		type_name: String,
	},

	/// The recursion bound was hit under the fail-fast policy, or a cycle
	/// passed through a shape that has no sentinel value.
	#[error("Cyclic graph: {type_name} exceeded recursion depth {max_depth}")]
	CyclicGraph {
		/// Name of the shape whose construction recursed.
		type_name: String,
		/// The configured depth bound.
		max_depth: usize,
	},

	/// A scenario lookup referenced a handle that was never stored.
	#[error("Handle not found: {0}")]
	HandleNotFound(String),

	/// A scenario lookup found the handle, but it holds a different type.
	#[error("Type mismatch for handle `{handle}`: expected {expected}, found {actual}")]
	TypeMismatch {
		/// The handle that was looked up.
		handle: String,
		/// Type expected at the call site.
		expected: &'static str,
		/// Type actually stored under the handle.
		actual: &'static str,
	},

	/// A handle name was reused while the builder rejects duplicates.
	#[error("Duplicate handle: {0}")]
	DuplicateHandle(String),

	/// A request or configuration value was out of range.
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),
}

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenerationError>;
