//! Implementation of the `#[derive(Generatable)]` macro.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Expr, Field, Fields, LitStr};

/// How a single field obtains its value.
enum FieldSource {
	/// Request a value of the field's type from the context.
	Create,
	/// A named fake-data kind (the field must be a `String`).
	Faker(String),
	/// A per-context sequence with a `{n}` placeholder.
	Sequence(String),
	/// A fixed expression, converted with `Into`.
	Fixed(Expr),
	/// `Default::default()`.
	Skip,
}

pub(crate) fn derive_generatable_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let name = &input.ident;
	let data = match &input.data {
		Data::Struct(data) => data,
		_ => {
			return Err(syn::Error::new_spanned(
				&input.ident,
				"Generatable can only be derived for structs",
			));
		}
	};

	let body = match &data.fields {
		Fields::Named(fields) => {
			let inits = fields
				.named
				.iter()
				.map(|field| field_init(name, field))
				.collect::<syn::Result<Vec<_>>>()?;
			quote! { Self { #(#inits),* } }
		}
		Fields::Unit => quote! { Self },
		Fields::Unnamed(_) => {
			return Err(syn::Error::new_spanned(
				&input.ident,
				"Generatable cannot be derived for tuple structs",
			));
		}
	};

	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::specimen::Generatable for #name #ty_generics #where_clause {
			fn generate(
				ctx: &mut ::specimen::GenerationContext,
			) -> ::specimen::GenResult<Self> {
				::core::result::Result::Ok(#body)
			}
		}
	})
}

fn field_init(struct_name: &syn::Ident, field: &Field) -> syn::Result<TokenStream> {
	let ident = field
		.ident
		.as_ref()
		.ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
	let source = field_source(field)?;

	Ok(match source {
		FieldSource::Create => quote! { #ident: ctx.create()? },
		FieldSource::Faker(kind) => {
			let variant = faker_variant(&kind)
				.ok_or_else(|| syn::Error::new_spanned(field, unknown_faker_message(&kind)))?;
			let variant = format_ident!("{}", variant);
			quote! { #ident: ::specimen::faker::FakerKind::#variant.generate(ctx.rng()) }
		}
		FieldSource::Sequence(pattern) => {
			let key = format!("{}.{}", struct_name, ident);
			quote! { #ident: ctx.sequence_value(#key, #pattern) }
		}
		FieldSource::Fixed(expr) => quote! { #ident: ::core::convert::Into::into(#expr) },
		FieldSource::Skip => quote! { #ident: ::core::default::Default::default() },
	})
}

fn field_source(field: &Field) -> syn::Result<FieldSource> {
	let mut source = FieldSource::Create;
	for attr in &field.attrs {
		if !attr.path().is_ident("generatable") {
			continue;
		}
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("faker") {
				let lit: LitStr = meta.value()?.parse()?;
				source = FieldSource::Faker(lit.value());
			} else if meta.path.is_ident("sequence") {
				let lit: LitStr = meta.value()?.parse()?;
				source = FieldSource::Sequence(lit.value());
			} else if meta.path.is_ident("default") {
				let expr: Expr = meta.value()?.parse()?;
				source = FieldSource::Fixed(expr);
			} else if meta.path.is_ident("skip") {
				source = FieldSource::Skip;
			} else {
				return Err(meta.error("unknown generatable attribute"));
			}
			Ok(())
		})?;
	}
	Ok(source)
}

fn faker_variant(kind: &str) -> Option<&'static str> {
	Some(match kind {
		"username" => "Username",
		"email" => "Email",
		"first_name" => "FirstName",
		"last_name" => "LastName",
		"full_name" => "FullName",
		"word" => "Word",
		"sentence" => "Sentence",
		"company" => "CompanyName",
		_ => return None,
	})
}

fn unknown_faker_message(kind: &str) -> String {
	format!(
		"unknown faker kind `{kind}`; expected one of: username, email, first_name, \
		 last_name, full_name, word, sentence, company"
	)
}
