//! Named fake-data kinds.
//!
//! Thin wrappers over the `fake` crate's generators, always driven through
//! an explicit random source so values stay reproducible under the
//! context's seed. Used by the `#[derive(Generatable)]` `faker` attribute
//! and available to hand-written strategies.

use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use rand::Rng;

/// A named kind of realistic fake string data.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use specimen::faker::FakerKind;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let email = FakerKind::Email.generate(&mut rng);
/// assert!(email.contains('@'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakerKind {
	/// A login-style username.
	Username,
	/// A syntactically valid e-mail address on a reserved domain.
	Email,
	/// A given name.
	FirstName,
	/// A family name.
	LastName,
	/// A full person name.
	FullName,
	/// A single lowercase word.
	Word,
	/// A short sentence of three to seven words.
	Sentence,
	/// A company name.
	CompanyName,
}

impl FakerKind {
	/// Generates one value of this kind from the given random source.
	pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> String {
		match self {
			Self::Username => Username().fake_with_rng(rng),
			Self::Email => SafeEmail().fake_with_rng(rng),
			Self::FirstName => FirstName().fake_with_rng(rng),
			Self::LastName => LastName().fake_with_rng(rng),
			Self::FullName => Name().fake_with_rng(rng),
			Self::Word => Word().fake_with_rng(rng),
			Self::Sentence => Sentence(3..8).fake_with_rng(rng),
			Self::CompanyName => CompanyName().fake_with_rng(rng),
		}
	}
}
