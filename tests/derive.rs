//! Behavior of the `#[derive(Generatable)]` attribute set.

#![cfg(feature = "macros")]

use rstest::rstest;
use specimen::prelude::*;

#[derive(Debug, Generatable)]
struct Account {
	pub id: EntityId,
	#[generatable(faker = "username")]
	pub username: String,
	#[generatable(faker = "email")]
	pub email: String,
	#[generatable(sequence = "account-{n}")]
	pub code: String,
	#[generatable(default = true)]
	pub is_active: bool,
	#[generatable(skip)]
	pub notes: Option<String>,
	pub logins: u32,
}

#[derive(Debug, Generatable)]
struct Marker;

#[rstest]
fn derived_fields_use_their_sources() {
	let mut ctx = GenerationContext::with_seed(42);
	let account: Account = ctx.create().unwrap();

	assert!(!account.username.is_empty());
	assert!(account.email.contains('@'));
	assert_eq!(account.code, "account-0");
	assert!(account.is_active);
	assert_eq!(account.notes, None);
	assert!(account.logins < 10_000);
}

#[rstest]
fn sequences_count_per_context() {
	let mut ctx = GenerationContext::with_seed(42);
	let first: Account = ctx.create().unwrap();
	let second: Account = ctx.create().unwrap();
	assert_eq!(first.code, "account-0");
	assert_eq!(second.code, "account-1");

	// A fresh context restarts the sequence.
	let mut fresh = GenerationContext::with_seed(42);
	let again: Account = fresh.create().unwrap();
	assert_eq!(again.code, "account-0");
}

#[rstest]
fn derived_generation_is_reproducible() {
	let mut first = GenerationContext::with_seed(9);
	let mut second = GenerationContext::with_seed(9);

	let a: Account = first.create().unwrap();
	let b: Account = second.create().unwrap();

	assert_eq!(a.id, b.id);
	assert_eq!(a.username, b.username);
	assert_eq!(a.email, b.email);
	assert_eq!(a.logins, b.logins);
}

#[rstest]
fn unit_structs_derive_too() {
	let mut ctx = GenerationContext::with_seed(0);
	let _marker: Marker = ctx.create().unwrap();
}

#[rstest]
fn registered_strategy_still_wins_over_the_derive() {
	let mut ctx = GenerationContext::with_seed(0);
	ctx.register::<Account, _>(|ctx| {
		Ok(Account {
			id: ctx.create()?,
			username: "override".to_string(),
			email: ctx.create()?,
			code: ctx.sequence_value("Account.code", "account-{n}"),
			is_active: false,
			notes: None,
			logins: ctx.create()?,
		})
	});

	let account: Account = ctx.create().unwrap();
	assert_eq!(account.username, "override");
	assert!(!account.is_active);
}
