//! # Utilities
//!
//! Password generation and SQL identifier validation.

use crate::constants;
use base64::Engine;
use rand::RngCore;

/// Generate a fresh random password: 32 random bytes, URL-safe base64.
///
/// Used both for `CREATE ROLE ... PASSWORD` and for the materialized
/// credential secret, so the secret always matches the live role.
pub fn generate_password() -> String {
    let mut bytes = [0u8; constants::PASSWORD_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate a SQL identifier against `^[A-Za-z][A-Za-z0-9_]*$`.
///
/// The CRD schema already enforces this pattern for database and role names;
/// this re-check keeps the boundary intact for values interpolated into DDL,
/// since identifiers cannot be bound as statement parameters.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_unique_and_sql_safe() {
        let a = generate_password();
        let b = generate_password();
        assert_ne!(a, b);
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(a.len(), 43);
        // URL-safe alphabet never contains quotes or backslashes
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn accepts_valid_identifiers() {
        assert!(is_valid_identifier("app"));
        assert!(is_valid_identifier("app_db_2"));
        assert!(is_valid_identifier("Reader"));
    }

    #[test]
    fn rejects_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1app"));
        assert!(!is_valid_identifier("_app"));
        assert!(!is_valid_identifier("app-db"));
        assert!(!is_valid_identifier("app;DROP TABLE users"));
        assert!(!is_valid_identifier("app db"));
    }
}
