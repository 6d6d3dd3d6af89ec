//! Optional observability helpers for reset operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to run every helper operation inside a `reset_password.op` span
//!   carrying `op` and `stage` fields, and to emit warn-level events for throttled, expired, and
//!   garbage-collection outcomes. Token material never appears in spans or events.
//! - Enable `metrics` to increment the `reset_password_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations performed by the reset helper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetOp {
	/// Token issuance.
	Generate,
	/// Token validation.
	Validate,
	/// Request removal after a successful reset.
	Remove,
	/// Opportunistic garbage collection.
	Collect,
}
impl ResetOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResetOp::Generate => "generate",
			ResetOp::Validate => "validate",
			ResetOp::Remove => "remove",
			ResetOp::Collect => "collect",
		}
	}
}
impl Display for ResetOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a helper operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
