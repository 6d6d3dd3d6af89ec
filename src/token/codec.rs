//! Builds, splits, hashes, and verifies public reset tokens.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
// self
use crate::{
	_prelude::*,
	config::ResetConfig,
	request::{HashedVerifier, Selector},
	source::RandomSource,
	token::secret::TokenSecret,
};

/// Byte-to-text encoding applied to both token parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenEncoding {
	/// Lowercase hexadecimal; two characters per byte.
	#[default]
	#[serde(rename = "hex")]
	Hex,
	/// URL-safe base64 without padding; `ceil(4n / 3)` characters per `n` bytes.
	#[serde(rename = "base64_url")]
	Base64Url,
}
impl TokenEncoding {
	/// Number of characters produced for `bytes` input bytes.
	pub const fn encoded_len(self, bytes: usize) -> usize {
		match self {
			TokenEncoding::Hex => bytes * 2,
			TokenEncoding::Base64Url => (bytes * 4).div_ceil(3),
		}
	}

	fn encode(self, bytes: &[u8]) -> String {
		match self {
			TokenEncoding::Hex => hex::encode(bytes),
			TokenEncoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
		}
	}
}

/// Freshly generated token parts. Only [`TokenParts::selector`] may be persisted as-is.
#[derive(Clone, Debug)]
pub struct TokenParts {
	/// Encoded lookup key (public token suffix).
	pub selector: Selector,
	/// Encoded secret proof (public token prefix).
	pub verifier: TokenSecret,
	/// `verifier ++ selector`, the string handed to the user.
	pub public_token: TokenSecret,
}

/// Stateless codec parameterized by part lengths and encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenCodec {
	selector_bytes: usize,
	verifier_bytes: usize,
	encoding: TokenEncoding,
}
impl TokenCodec {
	/// Creates a codec drawing the given byte counts for each part.
	pub const fn new(selector_bytes: usize, verifier_bytes: usize, encoding: TokenEncoding) -> Self {
		Self { selector_bytes, verifier_bytes, encoding }
	}

	/// Creates a codec from the lengths and encoding in `config`.
	pub fn from_config(config: &ResetConfig) -> Self {
		Self::new(config.selector_bytes, config.verifier_bytes, config.encoding)
	}

	/// Encoded selector length in characters.
	pub const fn selector_len(&self) -> usize {
		self.encoding.encoded_len(self.selector_bytes)
	}

	/// Encoded verifier length in characters.
	pub const fn verifier_len(&self) -> usize {
		self.encoding.encoded_len(self.verifier_bytes)
	}

	/// Fixed length of every public token this codec produces.
	pub const fn token_len(&self) -> usize {
		self.selector_len() + self.verifier_len()
	}

	/// Draws fresh selector and verifier bytes and assembles the public token.
	pub fn generate(&self, random: &dyn RandomSource) -> TokenParts {
		let selector = self.draw(random, self.selector_bytes);
		let verifier = self.draw(random, self.verifier_bytes);
		let public_token = TokenSecret::new(format!("{verifier}{selector}"));

		TokenParts {
			selector: Selector::new(selector),
			verifier: TokenSecret::new(verifier),
			public_token,
		}
	}

	/// Splits a public token into its selector (tail) and verifier (head).
	///
	/// Only the minimum length is checked here; callers that need the exact length compare
	/// against [`Self::token_len`] first.
	pub fn split<'a>(&self, public_token: &'a str) -> Result<(Selector, &'a str)> {
		if !public_token.is_ascii() || public_token.len() < self.selector_len() {
			return Err(Error::InvalidToken);
		}

		let (verifier, selector) = public_token.split_at(public_token.len() - self.selector_len());

		Ok((Selector::new(selector), verifier))
	}

	/// Selector used to locate the request for `public_token` on removal.
	///
	/// Tokens shorter than a selector are used whole; the lookup simply finds nothing.
	pub fn selector_of(&self, public_token: &str) -> Selector {
		match self.split(public_token) {
			Ok((selector, _)) => selector,
			Err(_) => Selector::new(public_token),
		}
	}

	/// One-way SHA-256 digest of a verifier, lowercase hex.
	pub fn hash(verifier: &str) -> HashedVerifier {
		HashedVerifier::new(hex::encode(Sha256::digest(verifier.as_bytes())))
	}

	/// Hashes `candidate` and compares it with `stored` in constant time.
	pub fn verify(candidate: &str, stored: &HashedVerifier) -> bool {
		let computed = Self::hash(candidate);

		computed.expose().as_bytes().ct_eq(stored.expose().as_bytes()).into()
	}

	fn draw(&self, random: &dyn RandomSource, len: usize) -> String {
		let mut bytes = vec![0_u8; len];

		random.fill_bytes(&mut bytes);

		self.encoding.encode(&bytes)
	}
}
impl Default for TokenCodec {
	fn default() -> Self {
		Self::from_config(&ResetConfig::default())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::source::{SequenceRandom, ThreadRandom};

	#[test]
	fn generated_tokens_have_fixed_shape() {
		let codec = TokenCodec::default();

		assert_eq!(codec.token_len(), 40);

		for _ in 0..32 {
			let parts = codec.generate(&ThreadRandom);
			let token = parts.public_token.expose();

			assert_eq!(token.len(), codec.token_len());
			assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
			assert!(token.starts_with(parts.verifier.expose()));
			assert!(token.ends_with(parts.selector.as_str()));
		}
	}

	#[test]
	fn split_recovers_generated_parts() {
		for encoding in [TokenEncoding::Hex, TokenEncoding::Base64Url] {
			let codec = TokenCodec::new(12, 24, encoding);

			for _ in 0..32 {
				let parts = codec.generate(&ThreadRandom);
				let (selector, verifier) = codec
					.split(parts.public_token.expose())
					.expect("Generated tokens should always split.");

				assert_eq!(parts.public_token.len(), codec.token_len());
				assert_eq!(selector, parts.selector);
				assert_eq!(verifier, parts.verifier.expose());
			}
		}
	}

	#[test]
	fn base64_lengths_round_up() {
		assert_eq!(TokenEncoding::Base64Url.encoded_len(10), 14);
		assert_eq!(TokenEncoding::Base64Url.encoded_len(12), 16);
		assert_eq!(TokenEncoding::Hex.encoded_len(10), 20);

		let codec = TokenCodec::new(10, 10, TokenEncoding::Base64Url);
		let parts = codec.generate(&SequenceRandom::default());

		assert_eq!(parts.public_token.len(), 28);
	}

	#[test]
	fn split_rejects_short_or_non_ascii_input() {
		let codec = TokenCodec::default();

		assert!(matches!(codec.split("abc"), Err(Error::InvalidToken)));
		assert!(matches!(codec.split(&"é".repeat(20)), Err(Error::InvalidToken)));

		let whole = "a".repeat(20);
		let (selector, verifier) =
			codec.split(&whole).expect("A selector-length token should split.");

		assert_eq!(selector.as_str(), whole);
		assert_eq!(verifier, "");
	}

	#[test]
	fn selector_of_uses_tail_or_whole_token() {
		let codec = TokenCodec::default();
		let token = format!("{}{}", "v".repeat(20), "s".repeat(20));

		assert_eq!(codec.selector_of(&token).as_str(), "s".repeat(20));
		assert_eq!(codec.selector_of("1234").as_str(), "1234");
	}

	#[test]
	fn hash_and_verify_pair() {
		let stored = TokenCodec::hash("verifier-one");

		assert_eq!(stored.expose().len(), 64);
		assert_ne!(stored.expose(), "verifier-one");
		assert!(TokenCodec::verify("verifier-one", &stored));
		assert!(!TokenCodec::verify("verifier-two", &stored));
		assert!(!TokenCodec::verify("", &stored));
		assert!(!TokenCodec::verify("verifier-one", &HashedVerifier::new("1234")));
	}

	#[test]
	fn hash_matches_known_digest() {
		assert_eq!(
			TokenCodec::hash("abc").expose(),
			"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
		);
	}
}
