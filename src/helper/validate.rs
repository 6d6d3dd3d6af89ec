//! Validation and consumption paths.

// self
use crate::{
	_prelude::*,
	helper::ResetHelper,
	obs::{self, OpOutcome, OpSpan, ResetOp},
	token::TokenCodec,
	user::ResetUser,
};

impl<U> ResetHelper<U>
where
	U: ResetUser,
{
	/// Validates `public_token` and returns the user it was issued to.
	///
	/// Wrong length, unknown selector, and verifier mismatch all yield [`Error::InvalidToken`];
	/// only expiry is reported separately, as [`Error::ExpiredToken`], and it is checked before
	/// the verifier. Tokens of the wrong length are rejected before any store lookup.
	pub async fn validate_token_and_fetch_user(&self, public_token: &str) -> Result<U> {
		const OP: ResetOp = ResetOp::Validate;

		let span = OpSpan::new(OP, "validate_token_and_fetch_user");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let now = self.clock.now();

				self.collect_garbage(now).await;

				if public_token.len() != self.codec.token_len() {
					return Err(Error::InvalidToken);
				}

				let (selector, verifier) = self.codec.split(public_token)?;
				let request =
					self.store.find_by_selector(&selector).await?.ok_or(Error::InvalidToken)?;

				if request.is_expired_at(now) {
					obs::log_expired(request.expires_at);

					return Err(Error::ExpiredToken { expired_at: request.expires_at });
				}
				if !TokenCodec::verify(verifier, &request.hashed_verifier) {
					return Err(Error::InvalidToken);
				}

				Ok(request.user)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}

	/// Deletes the request behind `public_token` so it cannot be replayed.
	///
	/// Call this only after a successful validation. An empty token is rejected; a token whose
	/// request is already gone is a no-op.
	pub async fn remove_reset_request(&self, public_token: &str) -> Result<()> {
		const OP: ResetOp = ResetOp::Remove;

		let span = OpSpan::new(OP, "remove_reset_request");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				if public_token.is_empty() {
					return Err(Error::InvalidToken);
				}

				let selector = self.codec.selector_of(public_token);

				if let Some(request) = self.store.find_by_selector(&selector).await? {
					self.store.remove(&request).await?;
				}

				Ok(())
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}
}
