//! Runtime configuration for the reset helper.

// self
use crate::{_prelude::*, error::ConfigError, token::TokenEncoding};

/// Tunables recognized by [`ResetHelper`](crate::helper::ResetHelper).
///
/// Durations serialize as whole seconds so the struct can be embedded in a host application's
/// config file:
///
/// ```json
/// { "token_lifetime": 3600, "throttle_limit": 900, "gc_retention": 604800 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
	/// Time after issuance at which a token stops validating.
	#[serde(with = "seconds")]
	pub token_lifetime: Duration,
	/// Minimum gap between two token requests for the same user.
	#[serde(with = "seconds")]
	pub throttle_limit: Duration,
	/// Random bytes drawn for the selector (lookup key).
	pub selector_bytes: usize,
	/// Random bytes drawn for the verifier (secret proof).
	pub verifier_bytes: usize,
	/// Byte-to-text encoding applied to both token parts.
	pub encoding: TokenEncoding,
	/// Whether the store-backed collector sweeps expired requests.
	pub gc_enabled: bool,
	/// How long an expired request is kept before the collector purges it.
	///
	/// While kept, presenting its token reports expiry instead of an invalid token.
	#[serde(with = "seconds")]
	pub gc_retention: Duration,
}
impl ResetConfig {
	const DEFAULT_LIFETIME: Duration = Duration::hours(1);
	const DEFAULT_THROTTLE: Duration = Duration::hours(1);
	const DEFAULT_PART_BYTES: usize = 10;
	const DEFAULT_RETENTION: Duration = Duration::weeks(1);
	/// Largest accepted lifetime, throttle interval, or retention window.
	pub const MAX_DURATION: Duration = Duration::weeks(520);
	/// Smallest accepted selector/verifier length in bytes.
	pub const MIN_PART_BYTES: usize = 8;
	/// Largest accepted selector/verifier length in bytes.
	pub const MAX_PART_BYTES: usize = 64;

	/// Overrides the token lifetime.
	pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
		self.token_lifetime = lifetime;

		self
	}

	/// Overrides the per-user throttle interval.
	pub fn with_throttle_limit(mut self, limit: Duration) -> Self {
		self.throttle_limit = limit;

		self
	}

	/// Overrides the selector and verifier byte lengths.
	pub fn with_part_bytes(mut self, selector_bytes: usize, verifier_bytes: usize) -> Self {
		self.selector_bytes = selector_bytes;
		self.verifier_bytes = verifier_bytes;

		self
	}

	/// Overrides the token encoding.
	pub fn with_encoding(mut self, encoding: TokenEncoding) -> Self {
		self.encoding = encoding;

		self
	}

	/// Enables or disables store-backed garbage collection.
	pub fn with_gc_enabled(mut self, enabled: bool) -> Self {
		self.gc_enabled = enabled;

		self
	}

	/// Overrides how long expired requests survive garbage collection.
	pub fn with_gc_retention(mut self, retention: Duration) -> Self {
		self.gc_retention = retention;

		self
	}

	/// Checks the configuration for values the helper cannot operate with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.token_lifetime.is_positive() {
			return Err(ConfigError::NonPositiveLifetime);
		}
		if self.throttle_limit.is_negative() {
			return Err(ConfigError::NegativeThrottle);
		}
		if self.gc_retention.is_negative() {
			return Err(ConfigError::NegativeRetention);
		}

		Self::validate_duration("token_lifetime", self.token_lifetime)?;
		Self::validate_duration("throttle_limit", self.throttle_limit)?;
		Self::validate_duration("gc_retention", self.gc_retention)?;

		Self::validate_part("selector", self.selector_bytes)?;
		Self::validate_part("verifier", self.verifier_bytes)?;

		Ok(())
	}

	fn validate_duration(field: &'static str, value: Duration) -> Result<(), ConfigError> {
		if value > Self::MAX_DURATION {
			return Err(ConfigError::DurationOutOfRange { field, max: Self::MAX_DURATION });
		}

		Ok(())
	}

	fn validate_part(part: &'static str, actual: usize) -> Result<(), ConfigError> {
		if (Self::MIN_PART_BYTES..=Self::MAX_PART_BYTES).contains(&actual) {
			Ok(())
		} else {
			Err(ConfigError::PartLength {
				part,
				min: Self::MIN_PART_BYTES,
				max: Self::MAX_PART_BYTES,
				actual,
			})
		}
	}
}
impl Default for ResetConfig {
	fn default() -> Self {
		Self {
			token_lifetime: Self::DEFAULT_LIFETIME,
			throttle_limit: Self::DEFAULT_THROTTLE,
			selector_bytes: Self::DEFAULT_PART_BYTES,
			verifier_bytes: Self::DEFAULT_PART_BYTES,
			encoding: TokenEncoding::default(),
			gc_enabled: true,
			gc_retention: Self::DEFAULT_RETENTION,
		}
	}
}

mod seconds {
	// crates.io
	use serde::{Deserialize, Deserializer, Serializer};
	use time::Duration;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}
