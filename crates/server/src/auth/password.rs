use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("s3cret").expect("hashing should succeed");

        assert!(verify_password("s3cret", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("s3cret").expect("hashing should succeed");

        assert!(!verify_password("guess", &hash));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("s3cret").expect("hashing should succeed");
        let second = hash_password("s3cret").expect("hashing should succeed");

        assert_ne!(first, second);
    }
}
