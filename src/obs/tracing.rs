// self
use crate::{_prelude::*, obs::ResetOp, store::StoreError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Span wrapper used by helper operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: ResetOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("reset_password.op", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a swallowed garbage-collection failure.
pub fn log_collect_failure(error: &StoreError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%error, "Reset request garbage collection failed; continuing.");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Logs a throttled issuance attempt.
pub fn log_throttled(retry_after: Duration) {
	#[cfg(feature = "tracing")]
	tracing::info!(retry_after_secs = retry_after.whole_seconds(), "Reset token request throttled.");
	#[cfg(not(feature = "tracing"))]
	let _ = retry_after;
}

/// Logs a validation attempt against an expired request.
pub fn log_expired(expired_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::info!(%expired_at, "Reset token presented after expiry.");
	#[cfg(not(feature = "tracing"))]
	let _ = expired_at;
}

/// Logs a purge count when a sweep removed anything.
pub fn log_collected(removed: usize) {
	#[cfg(feature = "tracing")]
	{
		if removed > 0 {
			tracing::debug!(removed, "Purged expired reset requests.");
		}
	}
	#[cfg(not(feature = "tracing"))]
	let _ = removed;
}
