//! Cryptographic primitives for the Custodia consent core.
//!
//! - **Blake2b** for one-way digests (submitted answer sets, selection scoring)
//! - **OS randomness** for session and email-confirmation tokens
//!
//! Nothing here does key management; the consent core only needs hashing and
//! unguessable tokens.

pub mod hash;
pub mod token;

pub use hash::{blake2b_256, blake2b_256_multi, hash_answers};
pub use token::{email_token, random_hex, random_seed, session_token};
