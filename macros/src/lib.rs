//! Procedural macros for the specimen crate.
//!
//! This crate provides the `#[derive(Generatable)]` macro for generating
//! construct-with-context implementations for composite types.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod generatable_derive;

/// Derives a `Generatable` implementation for a struct.
///
/// Every field without an attribute is filled by requesting a value of the
/// field's type from the generation context, which honors registered
/// strategies, built-in generators and the recursion guard.
///
/// # Attributes
///
/// Field-level attributes, all under `#[generatable(...)]`:
///
/// - `#[generatable(faker = "kind")]` - Generate fake data of the named kind
///   (`username`, `email`, `first_name`, `last_name`, `full_name`, `word`,
///   `sentence`, `company`); the field must be a `String`
/// - `#[generatable(sequence = "format")]` - Generate sequential values with
///   a `{n}` placeholder, counted per field and per context
/// - `#[generatable(default = value)]` - Use a fixed value
/// - `#[generatable(skip)]` - Use `Default::default()` for this field
///
/// # Example
///
/// ```ignore
/// use specimen::Generatable;
///
/// #[derive(Generatable)]
/// pub struct User {
/// 	#[generatable(faker = "username")]
/// 	pub username: String,
///
/// 	#[generatable(faker = "email")]
/// 	pub email: String,
///
/// 	#[generatable(sequence = "user-{n}")]
/// 	pub code: String,
///
/// 	#[generatable(default = true)]
/// 	pub is_active: bool,
///
/// 	pub login_count: u32,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl specimen::Generatable for User {
/// 	fn generate(ctx: &mut specimen::GenerationContext) -> specimen::GenResult<Self> {
/// 		Ok(Self {
/// 			username: specimen::faker::FakerKind::Username.generate(ctx.rng()),
/// 			email: specimen::faker::FakerKind::Email.generate(ctx.rng()),
/// 			code: ctx.sequence_value("User.code", "user-{n}"),
/// 			is_active: true.into(),
/// 			login_count: ctx.create()?,
/// 		})
/// 	}
/// }
/// ```
#[proc_macro_derive(Generatable, attributes(generatable))]
pub fn derive_generatable(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	generatable_derive::derive_generatable_impl(input)
		.unwrap_or_else(|err| err.to_compile_error())
		.into()
}
