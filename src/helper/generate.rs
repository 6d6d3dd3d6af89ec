//! Issuance path: throttle check, token construction, persistence, and sweep.

// self
use crate::{
	_prelude::*,
	config::ResetConfig,
	error::ConfigError,
	helper::{IssuedReset, ResetHelper},
	obs::{self, OpOutcome, OpSpan, ResetOp},
	request::NewResetRequest,
	token::{ResetToken, TokenCodec},
	user::{ResetUser, UserKey},
};

impl<U> ResetHelper<U>
where
	U: ResetUser,
{
	/// Issues a new token for `user`.
	///
	/// Fails with [`Error::TooManyRequests`] when the user's newest unexpired request is younger
	/// than the throttle interval. Earlier outstanding tokens stay valid. The plaintext token only
	/// exists in the returned [`IssuedReset::token`].
	pub async fn generate_reset_token(&self, user: &U) -> Result<IssuedReset<U>> {
		const OP: ResetOp = ResetOp::Generate;

		let span = OpSpan::new(OP, "generate_reset_token");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let now = self.clock.now();
				let user_key = user.reset_key();

				self.ensure_not_throttled(&user_key, now).await?;

				let expires_at = self.expires_at(now)?;
				let parts = self.codec.generate(self.random.as_ref());
				let request = self
					.store
					.create_reset_request(NewResetRequest {
						user: user.clone(),
						hashed_verifier: TokenCodec::hash(parts.verifier.expose()),
						selector: parts.selector,
						requested_at: now,
						expires_at,
					})
					.await?;

				self.collect_garbage(now).await;

				Ok(IssuedReset { token: ResetToken::new(parts.public_token, now, expires_at), request })
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}

	/// Produces a token-shaped value with a realistic expiry without touching storage.
	///
	/// Lets callers answer requests for unknown users the same way as for real ones.
	pub fn generate_fake_reset_token(&self) -> Result<ResetToken> {
		let now = self.clock.now();
		let expires_at = self.expires_at(now)?;
		let parts = self.codec.generate(self.random.as_ref());

		Ok(ResetToken::new(parts.public_token, now, expires_at))
	}

	fn expires_at(&self, now: OffsetDateTime) -> Result<OffsetDateTime> {
		now.checked_add(self.config.token_lifetime).ok_or_else(|| {
			ConfigError::DurationOutOfRange {
				field: "token_lifetime",
				max: ResetConfig::MAX_DURATION,
			}
			.into()
		})
	}

	async fn ensure_not_throttled(&self, user_key: &UserKey, now: OffsetDateTime) -> Result<()> {
		let Some(last_requested_at) =
			self.store.most_recent_non_expired_request_at(user_key, now).await?
		else {
			return Ok(());
		};
		let available_at =
			last_requested_at.checked_add(self.config.throttle_limit).ok_or_else(|| {
				ConfigError::DurationOutOfRange {
					field: "throttle_limit",
					max: ResetConfig::MAX_DURATION,
				}
			})?;

		if now < available_at {
			let retry_after = available_at - now;

			obs::log_throttled(retry_after);

			return Err(Error::TooManyRequests { available_at, retry_after });
		}

		Ok(())
	}
}
