//! User accounts.
//!
//! Passwords are hashed with Argon2id at registration; the PHC-format hash
//! never leaves this module except through [`User::verify_password`].

use crate::store::core::DataSource;
use crate::store::error::{StoreError, StoreResult};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A registered account as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub(crate) password_hash: String,
}

/// A self-registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

impl User {
    /// Check a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// The representation safe to put on the wire: credential material is
    /// write-only.
    pub fn public_view(&self) -> Map<String, Value> {
        let mut view = Map::new();
        view.insert(
            "username".to_string(),
            Value::String(self.username.clone()),
        );
        view
    }
}

impl DataSource {
    /// Register a new account. The username is unique and immutable.
    pub fn register_user(&self, registration: Registration) -> StoreResult<String> {
        let Registration { username, password } = registration;
        if username.is_empty() || username.contains('/') {
            return Err(StoreError::InvalidData(
                "Username must be a non-empty string without \"/\".".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(StoreError::InvalidData(
                "Password must not be empty.".to_string(),
            ));
        }
        if self.users_tree.contains_key(username.as_bytes())? {
            return Err(StoreError::UserExists(username));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StoreError::InvalidData(format!("Failed to hash password: {e}")))?
            .to_string();

        let user = User {
            username: username.clone(),
            password_hash,
        };
        DataSource::put_json(&self.users_tree, &username, &user)?;
        Ok(username)
    }

    /// Look up an account by username.
    pub fn get_user(&self, username: &str) -> StoreResult<User> {
        DataSource::get_json(&self.users_tree, username)?
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    /// List all accounts, sorted by username.
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users = Vec::new();
        for entry in self.users_tree.iter() {
            let (_, bytes) = entry?;
            users.push(serde_json::from_slice(&bytes)?);
        }
        Ok(users)
    }
}
