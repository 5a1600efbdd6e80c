use bcrypt::{hash, verify, BcryptError};

const BCRYPT_COST: u32 = 8;

/// Hash a password with bcrypt.
///
/// # Example
/// ```
/// use usedmart_utils::hash::{bcrypt_check, bcrypt_hash};
///
/// let hashed = bcrypt_hash("my_password").unwrap();
/// assert!(bcrypt_check("my_password", &hashed));
/// ```
#[inline]
pub fn bcrypt_hash(password: &str) -> Result<String, BcryptError> {
    hash(password.as_bytes(), BCRYPT_COST)
}

/// Compare a plaintext password against a bcrypt hash. Malformed hashes never match.
#[inline]
pub fn bcrypt_check(password: &str, hash: &str) -> bool {
    verify(password.as_bytes(), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_hash_and_check() {
        let hash = bcrypt_hash("s3cret").unwrap();
        assert!(bcrypt_check("s3cret", &hash));
        assert!(!bcrypt_check("wrong", &hash));
    }

    #[test]
    fn test_bcrypt_check_rejects_garbage_hash() {
        assert!(!bcrypt_check("s3cret", "not-a-bcrypt-hash"));
    }
}
