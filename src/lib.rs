//! Selector/verifier password-reset tokens: hashed at rest, validated in constant time, throttled
//! per user, and backed by pluggable request stores.
//!
//! The entry point is [`helper::ResetHelper`], which composes a [`token::TokenCodec`], a
//! [`store::RequestStore`], a [`gc::GarbageCollector`], and the injected [`source::Clock`] and
//! [`source::RandomSource`] capabilities.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod gc;
pub mod helper;
pub mod obs;
pub mod request;
pub mod source;
pub mod store;
pub mod token;
pub mod user;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ResetConfig,
		gc::{GarbageCollector, StoreCollector},
		helper::ResetHelper,
		source::{ManualClock, SequenceRandom},
		store::{MemoryStore, RequestStore},
		user::{ResetUser, UserKey},
	};

	/// Minimal user fixture identified by a plain string.
	#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
	pub struct TestUser {
		/// Stable identifier used for throttle lookups.
		pub id: String,
	}
	impl TestUser {
		/// Creates a user fixture with the provided identifier.
		pub fn new(id: impl Into<String>) -> Self {
			Self { id: id.into() }
		}
	}
	impl ResetUser for TestUser {
		fn reset_key(&self) -> UserKey {
			UserKey::new(&self.id).expect("Test user identifiers must be valid user keys.")
		}
	}

	/// Shared handles returned by [`build_test_helper`].
	pub struct TestHarness {
		/// Helper under test.
		pub helper: ResetHelper<TestUser>,
		/// In-memory store backing the helper.
		pub store: Arc<MemoryStore<TestUser>>,
		/// Clock the test advances manually.
		pub clock: Arc<ManualClock>,
	}

	/// Builds a helper backed by an in-memory store, a store-driven collector configured from
	/// `config`, a manual clock pinned at `start`, and a deterministic random source.
	pub fn build_test_helper(config: ResetConfig, start: OffsetDateTime) -> TestHarness {
		let store = Arc::new(MemoryStore::<TestUser>::default());
		let dyn_store: Arc<dyn RequestStore<TestUser>> = store.clone();
		let collector: Arc<dyn GarbageCollector> = Arc::new(
			StoreCollector::new(dyn_store.clone(), config.gc_enabled)
				.with_retention(config.gc_retention),
		);
		let clock = Arc::new(ManualClock::new(start));
		let helper = ResetHelper::builder(dyn_store, config)
			.collector(collector)
			.clock(clock.clone())
			.random(Arc::new(SequenceRandom::default()))
			.build()
			.expect("Test helper configuration should be valid.");

		TestHarness { helper, store, clock }
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use color_eyre as _;
