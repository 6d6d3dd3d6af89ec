//! Reset helper: the orchestrator tying codec, store, collector, clock, and RNG together.
//!
//! A token moves through `Issued -> Valid -> {Expired, Consumed}`. Expiry is evaluated lazily on
//! validation and eventually swept by the collector; consumption is the caller invoking
//! [`ResetHelper::remove_reset_request`] after a successful
//! [`ResetHelper::validate_token_and_fetch_user`]. The helper keeps no mutable state of its own,
//! so two concurrent validations of the same live token can both succeed before removal.

mod generate;
mod validate;

// self
use crate::{
	_prelude::*,
	config::ResetConfig,
	error::ConfigError,
	gc::{GarbageCollector, StoreCollector},
	obs::{self, OpOutcome, ResetOp},
	request::ResetRequest,
	source::{Clock, RandomSource, SystemClock, ThreadRandom},
	store::RequestStore,
	token::{ResetToken, TokenCodec},
	user::ResetUser,
};

/// Result of a successful issuance: the plaintext token for the user and the stored record.
#[derive(Clone, Debug)]
pub struct IssuedReset<U> {
	/// Token to deliver to the user; never persisted.
	pub token: ResetToken,
	/// Record the store now holds for this token.
	pub request: ResetRequest<U>,
}

/// Issues, validates, and consumes password-reset tokens.
pub struct ResetHelper<U> {
	store: Arc<dyn RequestStore<U>>,
	collector: Arc<dyn GarbageCollector>,
	clock: Arc<dyn Clock>,
	random: Arc<dyn RandomSource>,
	codec: TokenCodec,
	config: ResetConfig,
}
impl<U> ResetHelper<U>
where
	U: ResetUser,
{
	/// Creates a helper with the system clock, thread RNG, and a store-backed collector.
	pub fn new(store: Arc<dyn RequestStore<U>>, config: ResetConfig) -> Result<Self, ConfigError> {
		Self::builder(store, config).build()
	}

	/// Starts a builder for overriding the collector, clock, or random source.
	pub fn builder(store: Arc<dyn RequestStore<U>>, config: ResetConfig) -> ResetHelperBuilder<U> {
		ResetHelperBuilder { store, config, collector: None, clock: None, random: None }
	}

	/// Configured token lifetime, for phrasing "link expires in" messages.
	pub fn token_lifetime(&self) -> Duration {
		self.config.token_lifetime
	}

	/// Active configuration.
	pub fn config(&self) -> &ResetConfig {
		&self.config
	}

	/// Codec derived from the configuration.
	pub fn codec(&self) -> &TokenCodec {
		&self.codec
	}

	async fn collect_garbage(&self, now: OffsetDateTime) {
		match self.collector.collect(now).await {
			Ok(removed) => {
				obs::log_collected(removed);
				obs::record_op_outcome(ResetOp::Collect, OpOutcome::Success);
			},
			Err(e) => {
				obs::log_collect_failure(&e);
				obs::record_op_outcome(ResetOp::Collect, OpOutcome::Failure);
			},
		}
	}
}
impl<U> Debug for ResetHelper<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResetHelper")
			.field("codec", &self.codec)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

/// Builder for [`ResetHelper`].
pub struct ResetHelperBuilder<U> {
	store: Arc<dyn RequestStore<U>>,
	config: ResetConfig,
	collector: Option<Arc<dyn GarbageCollector>>,
	clock: Option<Arc<dyn Clock>>,
	random: Option<Arc<dyn RandomSource>>,
}
impl<U> ResetHelperBuilder<U>
where
	U: ResetUser,
{
	/// Replaces the default store-backed collector.
	pub fn collector(mut self, collector: Arc<dyn GarbageCollector>) -> Self {
		self.collector = Some(collector);

		self
	}

	/// Replaces the system clock.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);

		self
	}

	/// Replaces the thread RNG.
	pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
		self.random = Some(random);

		self
	}

	/// Validates the configuration and produces the helper.
	pub fn build(self) -> Result<ResetHelper<U>, ConfigError> {
		self.config.validate()?;

		let collector: Arc<dyn GarbageCollector> = match self.collector {
			Some(collector) => collector,
			None => Arc::new(
				StoreCollector::new(self.store.clone(), self.config.gc_enabled)
					.with_retention(self.config.gc_retention),
			),
		};
		let clock: Arc<dyn Clock> = match self.clock {
			Some(clock) => clock,
			None => Arc::new(SystemClock),
		};
		let random: Arc<dyn RandomSource> = match self.random {
			Some(random) => random,
			None => Arc::new(ThreadRandom),
		};

		Ok(ResetHelper {
			codec: TokenCodec::from_config(&self.config),
			store: self.store,
			collector,
			clock,
			random,
			config: self.config,
		})
	}
}
impl<U> Debug for ResetHelperBuilder<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResetHelperBuilder")
			.field("config", &self.config)
			.field("collector_set", &self.collector.is_some())
			.field("clock_set", &self.clock.is_some())
			.field("random_set", &self.random.is_some())
			.finish()
	}
}
