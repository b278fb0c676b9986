//! Blake2b hashing for answer digests and selection scoring.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use custodia_types::{AnswerDigest, SessionToken};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// One-way digest of a submitted answer set, bound to its session token.
///
/// The token is mixed in so identical answer vectors from different sessions
/// produce different digests. Each answer index is encoded fixed-width to
/// avoid ambiguity between e.g. `[1, 23]` and `[12, 3]`.
pub fn hash_answers(token: &SessionToken, answers: &[u32]) -> AnswerDigest {
    let mut hasher = Blake2b256::new();
    hasher.update(token.as_str().as_bytes());
    for answer in answers {
        hasher.update(answer.to_be_bytes());
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    AnswerDigest::new(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello custodia");
        let h2 = blake2b_256(b"hello custodia");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        let h1 = blake2b_256(b"hello");
        let h2 = blake2b_256(b"world");
        assert_ne!(h1, h2);
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn answer_digest_bound_to_session() {
        let t1 = SessionToken::new("a".repeat(64));
        let t2 = SessionToken::new("b".repeat(64));
        let answers = [0u32, 2, 1, 3, 0];
        assert_ne!(hash_answers(&t1, &answers), hash_answers(&t2, &answers));
    }

    #[test]
    fn answer_digest_sensitive_to_order() {
        let token = SessionToken::new("c".repeat(64));
        assert_ne!(
            hash_answers(&token, &[0, 1, 2]),
            hash_answers(&token, &[2, 1, 0])
        );
    }

    #[test]
    fn answer_digest_distinguishes_adjacent_encodings() {
        let token = SessionToken::new("d".repeat(64));
        assert_ne!(hash_answers(&token, &[1, 23]), hash_answers(&token, &[12, 3]));
    }
}
