use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use folio_core::errors::FolioError;
use folio_core_types::Sensitive;
use folio_store::Result;

/// Hash a password into an Argon2id PHC string with a fresh random salt
///
/// # Errors
///
/// `Internal` if the hasher rejects its parameters.
pub fn hash_password(password: &Sensitive<String>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FolioError::Internal {
            message: format!("password hashing failed: {}", e),
        })
}

/// Check a password against a stored PHC string
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &Sensitive<String>, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_and_is_salted() {
        let password = Sensitive::from("correct horse");
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();

        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second, "each hash gets its own salt");
        assert!(verify_password(&password, &first));
        assert!(verify_password(&password, &second));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password(&Sensitive::from("right")).unwrap();
        assert!(!verify_password(&Sensitive::from("wrong"), &hash));
    }

    #[test]
    fn test_plaintext_stored_value_never_matches() {
        // a legacy plaintext password column must not authenticate
        assert!(!verify_password(&Sensitive::from("hunter2"), "hunter2"));
    }
}
