//! Public token format: selector/verifier split, hashing, and the values handed to callers.
//!
//! A public token is `encode(verifier) ++ encode(selector)`. The selector is a non-secret lookup
//! key read from the fixed-length tail; the verifier is the secret proof, only ever persisted as
//! a SHA-256 digest.

pub mod codec;
pub mod reset;
pub mod secret;

pub use codec::*;
pub use reset::*;
pub use secret::*;
