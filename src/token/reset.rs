//! Token value returned to callers after issuance.

// self
use crate::{_prelude::*, token::secret::TokenSecret};

/// Plaintext reset token plus the timing metadata needed to phrase the reset message.
///
/// This is the only place the full token exists; nothing here is persisted.
#[derive(Clone, Debug)]
pub struct ResetToken {
	token: TokenSecret,
	generated_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl ResetToken {
	/// Wraps an issued token.
	pub fn new(token: TokenSecret, generated_at: OffsetDateTime, expires_at: OffsetDateTime) -> Self {
		Self { token, generated_at, expires_at }
	}

	/// Returns the public token to embed in the reset link. Avoid logging it.
	pub fn expose(&self) -> &str {
		self.token.expose()
	}

	/// Consumes the value and returns the redacting wrapper.
	pub fn into_secret(self) -> TokenSecret {
		self.token
	}

	/// Instant the token was issued.
	pub fn generated_at(&self) -> OffsetDateTime {
		self.generated_at
	}

	/// Instant the token stops validating.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Total validity window.
	pub fn lifetime(&self) -> Duration {
		self.expires_at - self.generated_at
	}

	/// Remaining validity at `now`, clamped at zero.
	pub fn expires_in(&self, now: OffsetDateTime) -> Duration {
		(self.expires_at - now).max(Duration::ZERO)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn timing_helpers() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = ResetToken::new(TokenSecret::new("abc"), issued, issued + Duration::hours(1));

		assert_eq!(token.lifetime(), Duration::hours(1));
		assert_eq!(token.expires_in(issued + Duration::minutes(45)), Duration::minutes(15));
		assert_eq!(token.expires_in(issued + Duration::hours(2)), Duration::ZERO);
		assert_eq!(token.expose(), "abc");
		assert!(!format!("{token:?}").contains("abc"));
	}
}
