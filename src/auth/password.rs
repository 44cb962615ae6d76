use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Hash with Argon2id and a random salt, returning the PHC string
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Strength rules checked in order; the first failing rule's message is returned
pub fn validate_strength(plain: &str) -> Result<(), &'static str> {
    if plain.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !plain.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !plain.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !plain.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    if !plain.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err("Password must contain at least one special character");
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and no extra `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Admin123!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Admin123!", &hash).unwrap());
        assert!(!verify_password("admin123!", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("Admin123!", "plaintext"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn strength_rules_in_order() {
        assert_eq!(validate_strength("Ab1!"), Err("Password must be at least 8 characters long"));
        assert_eq!(
            validate_strength("abcdefg1!"),
            Err("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            validate_strength("ABCDEFG1!"),
            Err("Password must contain at least one lowercase letter")
        );
        assert_eq!(validate_strength("Abcdefgh!"), Err("Password must contain at least one number"));
        assert_eq!(
            validate_strength("Abcdefgh1"),
            Err("Password must contain at least one special character")
        );
        assert_eq!(validate_strength("Manager123!"), Ok(()));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("admin@iot-energy.com"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("admin iot@energy.com"));
        assert!(!is_valid_email("@energy.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("admin@.com"));
    }
}
