//! Thread-safe in-memory [`RequestStore`] implementation for local development and tests.

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	request::{NewResetRequest, ResetRequest, Selector},
	store::{RequestStore, StoreError, StoreFuture},
	user::{ResetUser, UserKey},
};

type StoreMap<U> = Arc<RwLock<HashMap<Selector, ResetRequest<U>>>>;

/// Thread-safe storage backend that keeps requests in-process for tests and demos.
pub struct MemoryStore<U>(StoreMap<U>);
impl<U> MemoryStore<U>
where
	U: ResetUser,
{
	/// Number of stored requests, expired or not.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no requests are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn create_now(map: StoreMap<U>, request: NewResetRequest<U>) -> Result<ResetRequest<U>, StoreError> {
		let request = request.into_request();
		let mut guard = map.write();

		match guard.entry(request.selector.clone()) {
			Entry::Occupied(entry) =>
				Err(StoreError::Conflict { selector: entry.key().to_string() }),
			Entry::Vacant(entry) => Ok(entry.insert(request).clone()),
		}
	}

	fn remove_expired_now(map: StoreMap<U>, now: OffsetDateTime) -> usize {
		let mut guard = map.write();
		let before = guard.len();

		guard.retain(|_, request| !request.is_expired_at(now));

		before - guard.len()
	}
}
impl<U> Clone for MemoryStore<U> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<U> Default for MemoryStore<U> {
	fn default() -> Self {
		Self(Default::default())
	}
}
impl<U> Debug for MemoryStore<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryStore").field("len", &self.0.read().len()).finish()
	}
}
impl<U> RequestStore<U> for MemoryStore<U>
where
	U: ResetUser,
{
	fn create_reset_request(
		&self,
		request: NewResetRequest<U>,
	) -> StoreFuture<'_, ResetRequest<U>> {
		let map = self.0.clone();

		Box::pin(async move { Self::create_now(map, request) })
	}

	fn find_by_selector<'a>(
		&'a self,
		selector: &'a Selector,
	) -> StoreFuture<'a, Option<ResetRequest<U>>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(selector).cloned()) })
	}

	fn remove<'a>(&'a self, request: &'a ResetRequest<U>) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(&request.selector);

			Ok(())
		})
	}

	fn most_recent_non_expired_request_at<'a>(
		&'a self,
		user: &'a UserKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<OffsetDateTime>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(super::newest_unexpired(map.read().values(), user, now)) })
	}

	fn remove_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::remove_expired_now(map, now)) })
	}
}
