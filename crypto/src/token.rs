//! Random token generation from OS entropy.

use custodia_types::SessionToken;
use rand::rngs::OsRng;
use rand::RngCore;

/// Hex-encode `n_bytes` of OS randomness.
pub fn random_hex(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Mint a session token: 32 bytes of OS entropy, hex-encoded.
///
/// Tokens are the only handle to a quiz session, so they must be
/// non-sequential and unguessable.
pub fn session_token() -> SessionToken {
    SessionToken::new(random_hex(32))
}

/// Mint an email-confirmation token with the same entropy as session tokens.
pub fn email_token() -> String {
    random_hex(32)
}

/// A fresh 32-byte seed for question selection.
pub fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn session_tokens_are_64_hex_chars() {
        let token = session_token();
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..100)
            .map(|_| session_token().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn seeds_vary() {
        assert_ne!(random_seed(), random_seed());
    }
}
