use crate::config;

/// Hash a plaintext password with bcrypt using the configured work factor.
/// The raw value is never stored or logged.
pub fn hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, config::config().security.bcrypt_cost)
}

/// Verify a plaintext password against a stored bcrypt digest.
pub fn verify(password: &str, digest: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let digest = hash("pw1").expect("hash");
        assert_ne!(digest, "pw1");
        assert!(verify("pw1", &digest).expect("verify"));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let digest = hash("pw1").expect("hash");
        assert!(!verify("pw2", &digest).expect("verify"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("pw1").expect("hash");
        let b = hash("pw1").expect("hash");
        assert_ne!(a, b);
    }
}
