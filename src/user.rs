//! User identity capability consumed by the reset helper.
//!
//! The helper treats users as opaque values; the only thing it ever asks of them is a stable
//! [`UserKey`] used to look up recent requests for throttling.

// std
use std::{borrow::Borrow, ops::Deref, str::FromStr};
// self
use crate::_prelude::*;

const USER_KEY_MAX_LEN: usize = 255;

/// Capability implemented by the host's user type.
pub trait ResetUser
where
	Self: 'static + Clone + Send + Sync,
{
	/// Returns the stable identifier for this user.
	fn reset_key(&self) -> UserKey;
}

/// Stable, validated identifier for a principal requesting a reset.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserKey(String);
impl UserKey {
	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, UserKeyError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for UserKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for UserKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for UserKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<UserKey> for String {
	fn from(value: UserKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for UserKey {
	type Error = UserKeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for UserKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "UserKey({})", self.0)
	}
}
impl Display for UserKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for UserKey {
	type Err = UserKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Error returned when user key validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum UserKeyError {
	/// The key was empty.
	#[error("User key cannot be empty.")]
	Empty,
	/// The key contains whitespace characters.
	#[error("User key contains whitespace.")]
	ContainsWhitespace,
	/// The key exceeded the allowed length.
	#[error("User key exceeds {max} bytes.")]
	TooLong {
		/// Maximum permitted byte count.
		max: usize,
	},
}

fn validate_view(view: &str) -> Result<(), UserKeyError> {
	if view.is_empty() {
		return Err(UserKeyError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(UserKeyError::ContainsWhitespace);
	}
	if view.len() > USER_KEY_MAX_LEN {
		return Err(UserKeyError::TooLong { max: USER_KEY_MAX_LEN });
	}

	Ok(())
}
