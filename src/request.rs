//! Persisted reset-request records and their lookup keys.

// std
use std::borrow::Borrow;
// self
use crate::{_prelude::*, user::ResetUser};

/// Non-secret lookup key taken from the public token tail.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);
impl Selector {
	/// Wraps an encoded selector.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the encoded selector.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Selector {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Selector {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for Selector {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Selector({})", self.0)
	}
}
impl Display for Selector {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// SHA-256 digest of a verifier; the only secret-derived value that is persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedVerifier(String);
impl HashedVerifier {
	/// Wraps a hex digest.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the hex digest.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for HashedVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("HashedVerifier").field(&"<redacted>").finish()
	}
}

/// Lifecycle status of a request at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
	/// Request may still be redeemed.
	Valid,
	/// Request reached its expiry instant.
	Expired,
}

/// Values the helper hands to a store when a token is issued.
#[derive(Clone, Debug)]
pub struct NewResetRequest<U> {
	/// Owning user.
	pub user: U,
	/// Lookup key.
	pub selector: Selector,
	/// Digest of the verifier.
	pub hashed_verifier: HashedVerifier,
	/// Issuance instant.
	pub requested_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}
impl<U> NewResetRequest<U>
where
	U: ResetUser,
{
	/// Materializes the record a store persists.
	pub fn into_request(self) -> ResetRequest<U> {
		ResetRequest {
			selector: self.selector,
			hashed_verifier: self.hashed_verifier,
			user_key: self.user.reset_key(),
			user: self.user,
			requested_at: self.requested_at,
			expires_at: self.expires_at,
		}
	}
}

/// Stored reset request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetRequest<U> {
	/// Unique lookup key.
	pub selector: Selector,
	/// Digest of the verifier half of the token.
	pub hashed_verifier: HashedVerifier,
	/// Identifier of [`Self::user`], indexed for throttle lookups.
	pub user_key: crate::user::UserKey,
	/// Owning user.
	pub user: U,
	/// Issuance instant, used for throttling.
	pub requested_at: OffsetDateTime,
	/// Instant from which the request no longer validates.
	pub expires_at: OffsetDateTime,
}
impl<U> ResetRequest<U> {
	/// Computes the lifecycle status at `instant`.
	pub fn status_at(&self, instant: OffsetDateTime) -> RequestStatus {
		if instant >= self.expires_at { RequestStatus::Expired } else { RequestStatus::Valid }
	}

	/// Returns `true` once `instant` reaches the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), RequestStatus::Expired)
	}
}
