//! Walks a password-reset round trip against the in-memory store: issue a token, validate it,
//! show that a second request inside the throttle window is refused, then consume the token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use reset_password::{
	config::ResetConfig,
	error::Error,
	helper::ResetHelper,
	store::{MemoryStore, RequestStore},
	user::{ResetUser, UserKey},
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Member {
	email: String,
}
impl ResetUser for Member {
	fn reset_key(&self) -> UserKey {
		UserKey::new(&self.email).expect("Demo emails are valid user keys.")
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store: Arc<dyn RequestStore<Member>> = Arc::new(MemoryStore::default());
	let config = ResetConfig::default()
		.with_token_lifetime(Duration::minutes(30))
		.with_throttle_limit(Duration::minutes(5));
	let helper = ResetHelper::new(store, config)?;
	let member = Member { email: "ada@example.com".into() };
	let issued = helper.generate_reset_token(&member).await?;

	println!(
		"Reset link: https://example.com/reset/{} (expires in {} minutes).",
		issued.token.expose(),
		helper.token_lifetime().whole_minutes()
	);

	let user = helper.validate_token_and_fetch_user(issued.token.expose()).await?;

	println!("Token belongs to {}.", user.email);

	match helper.generate_reset_token(&member).await {
		Err(Error::TooManyRequests { retry_after, .. }) => {
			println!("Throttled; retry in {} seconds.", retry_after.whole_seconds());
		},
		Err(e) => return Err(e.into()),
		Ok(_) => println!("Unexpectedly issued a second token."),
	}

	helper.remove_reset_request(issued.token.expose()).await?;

	match helper.validate_token_and_fetch_user(issued.token.expose()).await {
		Err(e) if e.is_token_error() => println!("Consumed token rejected: {}", e.reason().unwrap_or("invalid")),
		Err(e) => return Err(e.into()),
		Ok(_) => println!("Unexpectedly accepted a consumed token."),
	}

	Ok(())
}
