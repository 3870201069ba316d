//! Salted SHA-256 password hashing.
//!
//! Stored form: `sha256$<salt hex>$<digest hex>`, where the digest covers
//! the salt bytes followed by the UTF-8 password.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// `PasswordHasher` using a random 16-byte salt per password.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordHasher;

fn digest(salt: &[u8], password: &str) -> Zeroizing<Vec<u8>> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    Zeroizing::new(hasher.finalize().to_vec())
}

fn split_encoded(encoded: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    let (Some(SCHEME), Some(salt), Some(digest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    Some((hex::decode(salt).ok()?, hex::decode(digest).ok()?))
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let mut salt = [0_u8; SALT_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        let digest = digest(&salt, password);
        Ok(PasswordHash::new(format!(
            "{SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest.as_slice())
        )))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let Some((salt, expected)) = split_encoded(hash.as_str()) else {
            return false;
        };
        let candidate = digest(&salt, password);
        candidate.as_slice().ct_eq(expected.as_slice()).into()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_use_documented_format() {
        let hash = Sha256PasswordHasher.hash("correct horse").expect("hash");
        let parts: Vec<&str> = hash.as_str().split('$').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "sha256");
        assert_eq!(parts[1].len(), SALT_LEN * 2);
        assert_eq!(parts[2].len(), 64);
    }

    #[rstest]
    fn verifies_only_the_original_password() {
        let hash = Sha256PasswordHasher.hash("correct horse").expect("hash");

        assert!(Sha256PasswordHasher.verify("correct horse", &hash));
        assert!(!Sha256PasswordHasher.verify("correct horse ", &hash));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let first = Sha256PasswordHasher.hash("same").expect("hash");
        let second = Sha256PasswordHasher.hash("same").expect("hash");

        assert_ne!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("sha256$zz$00")]
    #[case("md5$00$00")]
    #[case("sha256$00$00$extra")]
    fn malformed_hashes_never_verify(#[case] encoded: &str) {
        assert!(!Sha256PasswordHasher.verify("anything", &PasswordHash::new(encoded)));
    }

    #[rstest]
    fn known_vector_verifies() {
        // sha256(0x00 0x01 || "pw")
        let digest = hex::encode(Sha256::digest([0_u8, 1, b'p', b'w']));
        let hash = PasswordHash::new(format!("sha256$0001${digest}"));

        assert!(Sha256PasswordHasher.verify("pw", &hash));
    }

    #[rstest]
    #[case::truncated(31)]
    #[case::extended(33)]
    fn digest_length_mismatch_never_verifies(#[case] len: usize) {
        let mut digest = Sha256::digest([0_u8, 1, b'p', b'w']).to_vec();
        digest.resize(len, 0);
        let hash = PasswordHash::new(format!("sha256$0001${}", hex::encode(digest)));

        assert!(!Sha256PasswordHasher.verify("pw", &hash));
    }
}
