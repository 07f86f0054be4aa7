//! Authentication session lifecycle
//!
//! Signup, login, logout, and session restore over the `users` and
//! `session` collections. Passwords are stored as salted Argon2id hashes;
//! login verifies the hash and never compares plaintext.
//!
//! Email uniqueness is case-insensitive: `Ann@x.com` and `ann@x.com`
//! refer to the same account.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Session, UserRecord};
use crate::storage::CollectionStore;

/// Session lifecycle service
///
/// All operations are async to match the persistence boundary; failures
/// are typed and recoverable.
pub struct AuthService {
    store: CollectionStore,
}

impl AuthService {
    /// Create an auth service over the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            store: CollectionStore::new(config),
        }
    }

    /// Register a new account and start a session for it
    ///
    /// Fails with [`Error::DuplicateEmail`] when the email is already
    /// registered, and [`Error::Validation`] when a field is blank.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::Validation("name is required".into()));
        }
        if email.is_empty() {
            return Err(Error::Validation("email is required".into()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password is required".into()));
        }

        let mut users = self.store.load_users()?;

        if users.iter().any(|u| emails_match(&u.email, email)) {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        let session = record.session();

        users.push(record);
        self.store.save_users(&users)?;
        self.store.save_session(&session)?;

        info!("Created account for {}", email);
        Ok(session)
    }

    /// Authenticate and start a session
    ///
    /// Fails with [`Error::InvalidCredentials`] on an unknown email or a
    /// wrong password; the error does not say which.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        let users = self.store.load_users()?;

        let record = users
            .iter()
            .find(|u| emails_match(&u.email, email))
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash) {
            return Err(Error::InvalidCredentials);
        }

        let session = record.session();
        self.store.save_session(&session)?;

        info!("Logged in as {}", record.email);
        Ok(session)
    }

    /// Clear the persisted session; a no-op when already logged out
    pub async fn logout(&self) -> Result<()> {
        self.store.clear_session()?;
        debug!("Session cleared");
        Ok(())
    }

    /// Read any previously persisted session
    ///
    /// Does not re-validate that the credential still exists.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        Ok(self.store.load_session()?)
    }
}

/// Case-insensitive email equality
fn emails_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Hash a password with Argon2id and a fresh random salt
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Verify a password against a stored hash
///
/// An unparseable stored hash counts as a mismatch rather than an error,
/// so a corrupted record cannot be logged into.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
