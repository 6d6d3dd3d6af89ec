mod common;

// crates.io
use time::{Duration, OffsetDateTime};
// self
use common::{Account, epoch};
use reset_password::{
	request::{NewResetRequest, Selector},
	store::{MemoryStore, RequestStore, StoreError},
	token::TokenCodec,
	user::{ResetUser, UserKey},
};

fn new_request(account: u64, selector: &str, requested_at: OffsetDateTime) -> NewResetRequest<Account> {
	NewResetRequest {
		user: Account::new(account),
		selector: Selector::new(selector),
		hashed_verifier: TokenCodec::hash("verifier"),
		requested_at,
		expires_at: requested_at + Duration::hours(1),
	}
}

#[tokio::test]
async fn create_and_find_round_trip() {
	let store = MemoryStore::<Account>::default();
	let created = store
		.create_reset_request(new_request(1, "selector-1", epoch()))
		.await
		.expect("Creating a request should succeed.");

	assert_eq!(created.user_key, Account::new(1).reset_key());

	let fetched = store
		.find_by_selector(&Selector::new("selector-1"))
		.await
		.expect("Lookup should succeed.")
		.expect("Created request should be present.");

	assert_eq!(fetched.user, Account::new(1));
	assert_eq!(fetched.hashed_verifier, TokenCodec::hash("verifier"));
	assert!(TokenCodec::verify("verifier", &fetched.hashed_verifier));
	assert!(
		store
			.find_by_selector(&Selector::new("missing"))
			.await
			.expect("Lookup of a missing selector should succeed.")
			.is_none()
	);
}

#[tokio::test]
async fn duplicate_selectors_conflict() {
	let store = MemoryStore::<Account>::default();

	store
		.create_reset_request(new_request(1, "dup", epoch()))
		.await
		.expect("First insert should succeed.");

	let err = store
		.create_reset_request(new_request(2, "dup", epoch()))
		.await
		.expect_err("Second insert with the same selector must fail.");

	assert_eq!(err, StoreError::Conflict { selector: "dup".into() });
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn concurrent_creates_allow_single_winner() {
	let store = MemoryStore::<Account>::default();
	let store_a = store.clone();
	let store_b = store.clone();
	let task_a = tokio::spawn(async move {
		store_a.create_reset_request(new_request(1, "race", epoch())).await.is_ok()
	});
	let task_b = tokio::spawn(async move {
		store_b.create_reset_request(new_request(2, "race", epoch())).await.is_ok()
	});
	let (outcome_a, outcome_b) = tokio::join!(task_a, task_b);
	let successes = [
		outcome_a.expect("Create task A should not panic."),
		outcome_b.expect("Create task B should not panic."),
	]
	.iter()
	.filter(|ok| **ok)
	.count();

	assert_eq!(successes, 1, "only one create should succeed");
}

#[tokio::test]
async fn throttle_lookup_returns_newest_unexpired() {
	let store = MemoryStore::<Account>::default();

	store.create_reset_request(new_request(1, "old", epoch())).await.expect("Insert old.");
	store
		.create_reset_request(new_request(1, "new", epoch() + Duration::minutes(20)))
		.await
		.expect("Insert new.");
	store
		.create_reset_request(new_request(2, "other", epoch() + Duration::minutes(40)))
		.await
		.expect("Insert other.");

	let user = UserKey::new("1").expect("Fixture key should be valid.");

	assert_eq!(
		store
			.most_recent_non_expired_request_at(&user, epoch() + Duration::minutes(30))
			.await
			.expect("Throttle lookup should succeed."),
		Some(epoch() + Duration::minutes(20))
	);
	assert_eq!(
		store
			.most_recent_non_expired_request_at(&user, epoch() + Duration::minutes(80))
			.await
			.expect("Throttle lookup should succeed."),
		None
	);
}

#[tokio::test]
async fn remove_and_sweep() {
	let store = MemoryStore::<Account>::default();
	let kept = store
		.create_reset_request(new_request(1, "kept", epoch() + Duration::hours(2)))
		.await
		.expect("Insert kept.");
	let removed = store
		.create_reset_request(new_request(1, "removed", epoch()))
		.await
		.expect("Insert removed.");

	store.remove(&removed).await.expect("Removal should succeed.");
	store.remove(&removed).await.expect("Removing twice is not an error.");

	assert_eq!(store.len(), 1);

	store.create_reset_request(new_request(3, "stale", epoch())).await.expect("Insert stale.");

	assert_eq!(
		store.remove_expired(epoch() + Duration::hours(1)).await.expect("Sweep should succeed."),
		1
	);
	assert_eq!(
		store
			.find_by_selector(&kept.selector)
			.await
			.expect("Lookup should succeed.")
			.map(|request| request.hashed_verifier),
		Some(TokenCodec::hash("verifier"))
	);
}
