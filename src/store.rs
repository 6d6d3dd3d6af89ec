//! Storage contracts and built-in store implementations for reset requests.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	request::{NewResetRequest, ResetRequest, Selector},
	user::UserKey,
};

/// Boxed future returned by [`RequestStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for reset requests.
///
/// `find_by_selector` and `remove` are composed by the helper without a surrounding
/// transaction; any stronger single-use guarantee is up to the implementation.
pub trait RequestStore<U>
where
	Self: Send + Sync,
{
	/// Persists a new request and returns the stored record.
	///
	/// Implementations must reject a selector that is already present.
	fn create_reset_request(&self, request: NewResetRequest<U>)
	-> StoreFuture<'_, ResetRequest<U>>;

	/// Fetches the request stored under `selector`, if any.
	fn find_by_selector<'a>(
		&'a self,
		selector: &'a Selector,
	) -> StoreFuture<'a, Option<ResetRequest<U>>>;

	/// Deletes `request`. Removing an absent request is not an error.
	fn remove<'a>(&'a self, request: &'a ResetRequest<U>) -> StoreFuture<'a, ()>;

	/// Returns the newest `requested_at` among the user's requests still unexpired at `now`.
	fn most_recent_non_expired_request_at<'a>(
		&'a self,
		user: &'a UserKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<OffsetDateTime>>;

	/// Deletes every request already expired at `cutoff` and returns how many were removed.
	fn remove_expired(&self, cutoff: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Error type produced by [`RequestStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A request with the same selector already exists.
	#[error("A reset request with selector {selector} already exists.")]
	Conflict {
		/// Conflicting selector.
		selector: String,
	},
}

fn newest_unexpired<'a, U>(
	requests: impl Iterator<Item = &'a ResetRequest<U>>,
	user: &UserKey,
	now: OffsetDateTime,
) -> Option<OffsetDateTime>
where
	U: 'a,
{
	requests
		.filter(|request| &request.user_key == user && !request.is_expired_at(now))
		.map(|request| request.requested_at)
		.max()
}
