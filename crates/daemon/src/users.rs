use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use common::owner::OwnerId;
use serde::{Deserialize, Serialize};

/// A user as written in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    pub email: String,
    /// Salted argon2id hash of the password, as a PHC string
    pub password_hash: String,
}

impl UserConfig {
    /// Build an entry from a plaintext password.
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self, UserError> {
        Ok(Self {
            email: email.into(),
            password_hash: hash_password(password)?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("invalid password hash for {email}: {source}")]
    InvalidHash {
        email: String,
        source: argon2::password_hash::Error,
    },
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(UserError::Hash)?;
    Ok(hash.to_string())
}

/// Credentials accepted by the API, keyed by normalized email.
#[derive(Debug, Clone, Default)]
pub struct Users {
    by_email: HashMap<String, String>,
    // checked against when the email is unknown, so a miss costs a full hash
    decoy: Option<String>,
}

impl Users {
    /// Index the configured users. Every stored hash must parse as a PHC string.
    pub fn new(users: &[UserConfig]) -> Result<Self, UserError> {
        let mut by_email = HashMap::with_capacity(users.len());
        for user in users {
            PasswordHash::new(&user.password_hash).map_err(|source| UserError::InvalidHash {
                email: user.email.clone(),
                source,
            })?;
            by_email.insert(normalize(&user.email), user.password_hash.clone());
        }
        let decoy = if by_email.is_empty() {
            None
        } else {
            Some(hash_password("")?)
        };
        Ok(Self { by_email, decoy })
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }

    /// Check a username/password pair, yielding the caller's owner id.
    pub fn verify(&self, email: &str, password: &str) -> Option<OwnerId> {
        match self.by_email.get(&normalize(email)) {
            Some(stored) => check(stored, password).then(|| OwnerId::from_email(email)),
            None => {
                if let Some(decoy) = &self.decoy {
                    check(decoy, password);
                }
                None
            }
        }
    }
}

// argon2 compares the derived output in constant time
fn check(stored: &str, password: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Users {
        Users::new(&[UserConfig::new("user1@email.com", "password1").unwrap()]).unwrap()
    }

    #[test]
    fn test_verify() {
        let users = users();
        assert_eq!(
            users.verify("user1@email.com", "password1"),
            Some(OwnerId::from_email("user1@email.com"))
        );
        assert_eq!(
            users.verify("USER1@email.com", "password1"),
            Some(OwnerId::from_email("user1@email.com"))
        );
        assert_eq!(users.verify("user1@email.com", "wrong"), None);
        assert_eq!(users.verify("user1@email.com", ""), None);
        assert_eq!(users.verify("nobody@email.com", "password1"), None);
        assert_eq!(users.verify("nobody@email.com", ""), None);
    }

    #[test]
    fn test_hash_password_is_salted() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(check(&first, "password1"));
        assert!(check(&second, "password1"));
    }

    #[test]
    fn test_rejects_unparseable_hash() {
        let legacy = UserConfig {
            email: "user1@email.com".to_string(),
            password_hash: "0b14d501a594442a01c6859541bcb3e8164d183d32937b851835442f69d5c94e"
                .to_string(),
        };
        assert!(matches!(
            Users::new(&[legacy]),
            Err(UserError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_empty_users() {
        let users = Users::new(&[]).unwrap();
        assert!(users.is_empty());
        assert_eq!(users.verify("user1@email.com", "password1"), None);
    }
}
