//! Injected time and randomness capabilities.
//!
//! The helper never reads the wall clock or an RNG directly; it goes through [`Clock`] and
//! [`RandomSource`] so hosts can pin time in tests and swap entropy sources if required.

// crates.io
use rand::RngCore;
// self
use crate::_prelude::*;

/// Source of the current instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Source of cryptographically secure random bytes.
pub trait RandomSource
where
	Self: Send + Sync,
{
	/// Fills `dest` with random bytes.
	fn fill_bytes(&self, dest: &mut [u8]);
}

/// Wall clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Clock that only moves when told to; intended for tests and simulations.
#[derive(Debug)]
pub struct ManualClock(RwLock<OffsetDateTime>);
impl ManualClock {
	/// Creates a clock pinned at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(RwLock::new(start))
	}

	/// Moves the clock forward (or backward, for negative values) by `delta`.
	pub fn advance(&self, delta: Duration) {
		*self.0.write() += delta;
	}

	/// Pins the clock at `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.write() = instant;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.read()
	}
}

/// Thread-local CSPRNG from `rand`, reseeded from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;
impl RandomSource for ThreadRandom {
	fn fill_bytes(&self, dest: &mut [u8]) {
		rand::rng().fill_bytes(dest);
	}
}

/// Deterministic byte source: every call yields a distinct, reproducible pattern.
///
/// Not random at all; only for tests that need stable token values.
#[cfg(any(test, feature = "test"))]
#[derive(Debug, Default)]
pub struct SequenceRandom(Mutex<u64>);
#[cfg(any(test, feature = "test"))]
impl RandomSource for SequenceRandom {
	fn fill_bytes(&self, dest: &mut [u8]) {
		let mut counter = self.0.lock();

		*counter += 1;

		let seed = counter.to_be_bytes();

		for (i, byte) in dest.iter_mut().enumerate() {
			*byte = seed[i % seed.len()].wrapping_add(i as u8);
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn manual_clock_moves_only_on_request() {
		let start = time::macros::datetime!(2025-01-01 00:00 UTC);
		let clock = ManualClock::new(start);

		assert_eq!(clock.now(), start);

		clock.advance(Duration::seconds(90));

		assert_eq!(clock.now(), start + Duration::seconds(90));

		clock.set(start);

		assert_eq!(clock.now(), start);
	}

	#[test]
	fn sequence_random_never_repeats_consecutive_fills() {
		let random = SequenceRandom::default();
		let mut first = [0_u8; 10];
		let mut second = [0_u8; 10];

		random.fill_bytes(&mut first);
		random.fill_bytes(&mut second);

		assert_ne!(first, second);
	}

	#[test]
	fn thread_random_fills_buffer() {
		let mut bytes = [0_u8; 32];

		ThreadRandom.fill_bytes(&mut bytes);

		assert!(bytes.iter().any(|b| *b != 0), "32 random bytes should not all be zero.");
	}
}
