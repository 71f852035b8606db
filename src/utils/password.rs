use bcrypt::{hash, verify, BcryptError};

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_is_not_the_plaintext() {
        let hashed = hash_password("pw123", TEST_COST).unwrap();

        assert_ne!(hashed, "pw123");
        assert!(verify_password("pw123", &hashed));
        assert!(!verify_password("pw124", &hashed));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("pw123", "not-a-bcrypt-hash"));
    }
}
