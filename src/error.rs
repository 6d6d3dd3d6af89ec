//! Crate-level error types shared by the codec, stores, and the reset helper.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// The three token variants are the classification callers map to user-facing messages; see
/// [`Error::reason`]. Malformed tokens, unknown selectors, and verifier mismatches all collapse
/// into [`Error::InvalidToken`] so a caller cannot tell "wrong token" from "never issued".
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Token is malformed, unknown, or does not match the stored verifier hash.
	#[error("Reset token is invalid.")]
	InvalidToken,
	/// Token matched a stored request that is past its expiry instant.
	#[error("Reset token expired at {expired_at}.")]
	ExpiredToken {
		/// Instant the request stopped being valid.
		expired_at: OffsetDateTime,
	},
	/// A new token was requested before the throttle interval elapsed.
	#[error("Too many reset requests; retry after {retry_after}.")]
	TooManyRequests {
		/// Instant from which a new request will be accepted.
		available_at: OffsetDateTime,
		/// Remaining wait relative to the instant the request was rejected.
		retry_after: Duration,
	},
}
impl Error {
	/// Returns the user-facing explanation for token errors.
	///
	/// Storage and configuration failures have no end-user message and return `None`.
	pub fn reason(&self) -> Option<&'static str> {
		match self {
			Error::InvalidToken =>
				Some("The reset password link is invalid. Please try to reset your password again."),
			Error::ExpiredToken { .. } =>
				Some("The link in your email is expired. Please try to reset your password again."),
			Error::TooManyRequests { .. } => Some(
				"You have already requested a reset password email. Please check your email or try again soon.",
			),
			Error::Storage(_) | Error::Config(_) => None,
		}
	}

	/// Returns `true` for the token classification variants (invalid, expired, throttled).
	pub fn is_token_error(&self) -> bool {
		self.reason().is_some()
	}
}

/// Configuration and validation failures raised while building a helper.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Token lifetime must be strictly positive.
	#[error("Token lifetime must be positive.")]
	NonPositiveLifetime,
	/// Throttle interval cannot be negative.
	#[error("Throttle interval cannot be negative.")]
	NegativeThrottle,
	/// Garbage-collection retention cannot be negative.
	#[error("Garbage-collection retention cannot be negative.")]
	NegativeRetention,
	/// A duration is too large to add to or subtract from the current instant.
	#[error("The {field} duration must not exceed {max}.")]
	DurationOutOfRange {
		/// Which duration was misconfigured.
		field: &'static str,
		/// Largest accepted duration.
		max: Duration,
	},
	/// Selector or verifier byte length is outside the supported range.
	#[error("The {part} length must be between {min} and {max} bytes, got {actual}.")]
	PartLength {
		/// Which token part was misconfigured.
		part: &'static str,
		/// Smallest accepted byte count.
		min: usize,
		/// Largest accepted byte count.
		max: usize,
		/// Configured byte count.
		actual: usize,
	},
}
