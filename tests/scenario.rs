//! Scenario composition: handles, links and retrieval.

#[path = "helpers/entities.rs"]
mod entities;

use entities::{Company, User};
use rstest::rstest;
use specimen::{GenerationContext, GenerationError};

#[rstest]
fn linked_entities_reference_each_other() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with::<Company>("acme")
		.unwrap()
		.with::<User>("alice")
		.unwrap()
		.link::<User, Company>("alice", "acme", |user, company| {
			user.employer = Some(company.id);
		})
		.unwrap();

	let acme = scenario.get::<Company>("acme").unwrap();
	let alice = scenario.get::<User>("alice").unwrap();
	assert_eq!(alice.employer, Some(acme.id));
}

#[rstest]
fn linking_missing_handles_fails() {
	let mut ctx = GenerationContext::with_seed(42);
	let result = ctx
		.scenario()
		.with::<User>("alice")
		.unwrap()
		.link::<User, Company>("alice", "acme", |user, company| {
			user.employer = Some(company.id);
		});

	assert!(matches!(result, Err(GenerationError::HandleNotFound(name)) if name == "acme"));
}

#[rstest]
fn linking_with_wrong_types_fails() {
	let mut ctx = GenerationContext::with_seed(42);
	let result = ctx
		.scenario()
		.with::<Company>("acme")
		.unwrap()
		.with::<User>("alice")
		.unwrap()
		.link::<User, User>("alice", "acme", |_, _| {});

	assert!(matches!(
		result,
		Err(GenerationError::TypeMismatch { handle, .. }) if handle == "acme"
	));
}

#[rstest]
fn configured_entities_keep_pinned_fields() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with_configured::<User>("alice", |user| {
			user.username = "alice".to_string();
		})
		.unwrap();

	let alice = scenario.get::<User>("alice").unwrap();
	assert_eq!(alice.username, "alice");
	assert!(alice.email.contains('@'));
}

#[rstest]
fn relinking_overwrites_the_handle_not_the_entity() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with::<Company>("acme")
		.unwrap()
		.with::<User>("alice")
		.unwrap()
		.link::<User, Company>("alice", "acme", |user, company| {
			user.employer = Some(company.id);
		})
		.unwrap()
		// Rebind the handle to a fresh entity.
		.with::<User>("alice")
		.unwrap();

	let alice = scenario.get::<User>("alice").unwrap();
	// The handle now names an unlinked entity.
	assert_eq!(alice.employer, None);
}

#[rstest]
fn with_many_links_individual_members() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with::<Company>("acme")
		.unwrap()
		.with_many::<User>("team", 3)
		.unwrap()
		.link::<User, Company>("team-1", "acme", |user, company| {
			user.employer = Some(company.id);
		})
		.unwrap();

	let team = scenario.get_many::<User>("team").unwrap();
	assert_eq!(team.len(), 3);

	let acme_id = scenario.get::<Company>("acme").unwrap().id;
	assert_eq!(team[1].employer, Some(acme_id));
	assert_eq!(team[0].employer, None);
	assert_eq!(team[2].employer, None);
}

#[rstest]
fn get_all_returns_entities_in_insertion_order() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with::<User>("alice")
		.unwrap()
		.with::<Company>("acme")
		.unwrap()
		.with::<User>("bob")
		.unwrap();

	let users = scenario.get_all::<User>();
	assert_eq!(users.len(), 2);
	assert_eq!(users[0].id, scenario.get::<User>("alice").unwrap().id);
	assert_eq!(users[1].id, scenario.get::<User>("bob").unwrap().id);

	let names = scenario.names();
	assert_eq!(names, vec!["alice", "acme", "bob"]);
}

#[rstest]
fn get_all_includes_collection_members() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx
		.scenario()
		.with_many::<User>("team", 2)
		.unwrap()
		.with::<User>("alice")
		.unwrap();

	// Members are individual handles; the collection handle itself is not
	// an entity and contributes nothing further.
	assert_eq!(scenario.get_all::<User>().len(), 3);
}

#[rstest]
fn strict_mode_rejects_reused_names() {
	let mut ctx = GenerationContext::with_seed(42);
	let result = ctx
		.scenario()
		.strict()
		.with::<User>("alice")
		.unwrap()
		.with::<User>("alice");

	assert!(matches!(result, Err(GenerationError::DuplicateHandle(name)) if name == "alice"));
}

#[rstest]
fn get_many_on_an_entity_handle_fails() {
	let mut ctx = GenerationContext::with_seed(42);
	let scenario = ctx.scenario().with::<User>("alice").unwrap();

	assert!(matches!(
		scenario.get_many::<User>("alice"),
		Err(GenerationError::InvalidConfiguration(_))
	));
}
