#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros};
// self
use reset_password::{
	config::ResetConfig,
	gc::GarbageCollector,
	helper::ResetHelper,
	request::{NewResetRequest, ResetRequest, Selector},
	source::ManualClock,
	store::{MemoryStore, RequestStore, StoreError, StoreFuture},
	user::{ResetUser, UserKey},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub id: u64,
	pub email: String,
}
impl Account {
	pub fn new(id: u64) -> Self {
		Self { id, email: format!("user{id}@example.com") }
	}
}
impl ResetUser for Account {
	fn reset_key(&self) -> UserKey {
		UserKey::new(self.id.to_string()).expect("Numeric account ids are valid user keys.")
	}
}

/// Wraps a [`MemoryStore`] and counts calls per operation.
#[derive(Debug, Default)]
pub struct CountingStore {
	pub inner: MemoryStore<Account>,
	pub creates: AtomicUsize,
	pub finds: AtomicUsize,
	pub removes: AtomicUsize,
	pub throttle_lookups: AtomicUsize,
	pub sweeps: AtomicUsize,
}
impl CountingStore {
	pub fn finds(&self) -> usize {
		self.finds.load(Ordering::SeqCst)
	}

	pub fn sweeps(&self) -> usize {
		self.sweeps.load(Ordering::SeqCst)
	}
}
impl RequestStore<Account> for CountingStore {
	fn create_reset_request(
		&self,
		request: NewResetRequest<Account>,
	) -> StoreFuture<'_, ResetRequest<Account>> {
		self.creates.fetch_add(1, Ordering::SeqCst);
		self.inner.create_reset_request(request)
	}

	fn find_by_selector<'a>(
		&'a self,
		selector: &'a Selector,
	) -> StoreFuture<'a, Option<ResetRequest<Account>>> {
		self.finds.fetch_add(1, Ordering::SeqCst);
		self.inner.find_by_selector(selector)
	}

	fn remove<'a>(&'a self, request: &'a ResetRequest<Account>) -> StoreFuture<'a, ()> {
		self.removes.fetch_add(1, Ordering::SeqCst);
		self.inner.remove(request)
	}

	fn most_recent_non_expired_request_at<'a>(
		&'a self,
		user: &'a UserKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<OffsetDateTime>> {
		self.throttle_lookups.fetch_add(1, Ordering::SeqCst);
		self.inner.most_recent_non_expired_request_at(user, now)
	}

	fn remove_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		self.sweeps.fetch_add(1, Ordering::SeqCst);
		self.inner.remove_expired(now)
	}
}

/// Collector that always fails, counting invocations.
#[derive(Debug, Default)]
pub struct FailingCollector(pub AtomicUsize);
impl GarbageCollector for FailingCollector {
	fn collect(&self, _: OffsetDateTime) -> StoreFuture<'_, usize> {
		self.0.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(StoreError::Backend { message: "sweeper offline".into() }) })
	}
}

pub struct Harness {
	pub helper: ResetHelper<Account>,
	pub store: Arc<CountingStore>,
	pub clock: Arc<ManualClock>,
}

pub fn epoch() -> OffsetDateTime {
	macros::datetime!(2025-06-01 12:00 UTC)
}

/// Helper over a counting memory store, the default store-backed collector, real randomness,
/// and a manual clock pinned at [`epoch`].
pub fn harness(config: ResetConfig) -> Harness {
	let store = Arc::new(CountingStore::default());
	let clock = Arc::new(ManualClock::new(epoch()));
	let dyn_store: Arc<dyn RequestStore<Account>> = store.clone();
	let helper = ResetHelper::builder(dyn_store, config)
		.clock(clock.clone())
		.build()
		.expect("Harness configuration should be valid.");

	Harness { helper, store, clock }
}
