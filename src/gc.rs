//! Best-effort purge of expired reset requests.
//!
//! The helper runs a collector on every generate/validate call and only logs its failures;
//! correctness never depends on a sweep having happened because expiry is re-checked lazily.

// self
use crate::{
	_prelude::*,
	store::{RequestStore, StoreError, StoreFuture},
};

/// Purges stale requests. Must be idempotent.
pub trait GarbageCollector
where
	Self: Send + Sync,
{
	/// Removes requests expired at `now` and reports how many were purged.
	fn collect(&self, now: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Collector that never touches storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCollector;
impl GarbageCollector for NoopCollector {
	fn collect(&self, _: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async { Ok(0) })
	}
}

/// Collector that delegates to [`RequestStore::remove_expired`] when enabled.
///
/// Requests are only purged once they have been expired for longer than the retention window,
/// so recently expired tokens still report expiry on validation.
pub struct StoreCollector<U> {
	store: Arc<dyn RequestStore<U>>,
	enabled: bool,
	retention: Duration,
}
impl<U> StoreCollector<U> {
	/// Creates a collector sweeping `store` with no retention window; a disabled collector
	/// reports zero without I/O.
	pub fn new(store: Arc<dyn RequestStore<U>>, enabled: bool) -> Self {
		Self { store, enabled, retention: Duration::ZERO }
	}

	/// Keeps expired requests for `retention` before purging them.
	pub fn with_retention(mut self, retention: Duration) -> Self {
		self.retention = retention.max(Duration::ZERO);

		self
	}

	/// Whether sweeps reach the store.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Sweeps regardless of the enable flag.
	pub async fn force_collect(&self, now: OffsetDateTime) -> Result<usize, StoreError> {
		match self.cutoff(now) {
			Some(cutoff) => self.store.remove_expired(cutoff).await,
			None => Ok(0),
		}
	}

	/// Latest expiry instant that may be purged at `now`; `None` when it predates the calendar.
	fn cutoff(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
		now.checked_sub(self.retention)
	}
}
impl<U> Debug for StoreCollector<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoreCollector")
			.field("enabled", &self.enabled)
			.field("retention", &self.retention)
			.finish()
	}
}
impl<U> GarbageCollector for StoreCollector<U>
where
	U: 'static,
{
	fn collect(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		match self.cutoff(now) {
			Some(cutoff) if self.enabled => self.store.remove_expired(cutoff),
			_ => Box::pin(async { Ok(0) }),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		_preludet::TestUser,
		request::{HashedVerifier, NewResetRequest, Selector},
		store::MemoryStore,
	};

	async fn seeded_store(issued: OffsetDateTime) -> Arc<MemoryStore<TestUser>> {
		let store = Arc::new(MemoryStore::default());

		for (selector, offset) in [("stale", Duration::ZERO), ("fresh", Duration::hours(2))] {
			store
				.create_reset_request(NewResetRequest {
					user: TestUser::new("user-gc"),
					selector: Selector::new(selector),
					hashed_verifier: HashedVerifier::new("digest"),
					requested_at: issued + offset,
					expires_at: issued + offset + Duration::hours(1),
				})
				.await
				.expect("Seeding the memory store should succeed.");
		}

		store
	}

	#[tokio::test]
	async fn enabled_collector_purges_expired_only() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let store = seeded_store(issued).await;
		let collector = StoreCollector::new(store.clone() as Arc<dyn RequestStore<TestUser>>, true);
		let now = issued + Duration::hours(2);

		assert_eq!(collector.collect(now).await.expect("Sweep should succeed."), 1);
		assert_eq!(collector.collect(now).await.expect("Second sweep should succeed."), 0);
		assert_eq!(store.len(), 1);
	}

	#[tokio::test]
	async fn retention_keeps_recently_expired_requests() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let store = seeded_store(issued).await;
		let collector = StoreCollector::new(store.clone() as Arc<dyn RequestStore<TestUser>>, true)
			.with_retention(Duration::days(7));

		assert_eq!(collector.collect(issued + Duration::days(1)).await.expect("Sweep."), 0);
		assert_eq!(collector.collect(issued + Duration::days(8)).await.expect("Sweep."), 2);
		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn oversized_retention_purges_nothing() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let store = seeded_store(issued).await;
		let collector = StoreCollector::new(store.clone() as Arc<dyn RequestStore<TestUser>>, true)
			.with_retention(Duration::MAX);
		let now = issued + Duration::days(30);

		assert_eq!(collector.collect(now).await.expect("Sweep should not fail."), 0);
		assert_eq!(collector.force_collect(now).await.expect("Forced sweep should not fail."), 0);
		assert_eq!(store.len(), 2);
	}

	#[tokio::test]
	async fn disabled_collector_skips_store() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let store = seeded_store(issued).await;
		let collector =
			StoreCollector::new(store.clone() as Arc<dyn RequestStore<TestUser>>, false);
		let now = issued + Duration::hours(5);

		assert!(!collector.is_enabled());
		assert_eq!(collector.collect(now).await.expect("Disabled sweep should succeed."), 0);
		assert_eq!(store.len(), 2);
		assert_eq!(collector.force_collect(now).await.expect("Forced sweep should succeed."), 2);
		assert!(store.is_empty());
		assert_eq!(NoopCollector.collect(now).await.expect("Noop sweep should succeed."), 0);
	}
}
