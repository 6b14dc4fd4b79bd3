//! Shared domain entities for integration tests.

#![allow(dead_code)]

use specimen::prelude::*;

/// A company entity linked to by users through its id.
#[derive(Debug, Clone, Generatable)]
pub struct Company {
	pub id: EntityId,
	#[generatable(faker = "company")]
	pub name: String,
	pub founded: u16,
}

/// A user entity; `employer` is wired by scenario links, not generated.
#[derive(Debug, Clone, Generatable)]
pub struct User {
	pub id: EntityId,
	#[generatable(faker = "username")]
	pub username: String,
	#[generatable(faker = "email")]
	pub email: String,
	#[generatable(skip)]
	pub employer: Option<EntityId>,
}

/// A self-referential entity: reports chain through `manager` and fan out
/// through `direct_reports`.
#[derive(Debug, Clone, Generatable)]
pub struct Employee {
	pub id: EntityId,
	#[generatable(faker = "full_name")]
	pub name: String,
	pub manager: Option<Box<Employee>>,
	pub direct_reports: Vec<Employee>,
}

/// An entity whose name comes from whatever `String` strategy is active.
#[derive(Debug, Clone, Generatable)]
pub struct Person {
	pub name: String,
}

impl Employee {
	/// Depth of the manager chain above this employee.
	pub fn manager_chain_len(&self) -> usize {
		let mut depth = 0;
		let mut current = self.manager.as_deref();
		while let Some(manager) = current {
			depth += 1;
			current = manager.manager.as_deref();
		}
		depth
	}
}
