//! Core error taxonomy
//!
//! Every core operation returns a typed, recoverable failure. The caller
//! (the CLI, or any other front end) translates these into user-visible
//! messages; nothing here terminates the process.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Errors surfaced by the auth, repository, and sharing operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed a field invariant (missing title, link without URL, ...)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Signup with an email that is already registered
    #[error("an account with the email '{0}' already exists")]
    DuplicateEmail(String),

    /// Login with an unknown email or wrong password
    ///
    /// Deliberately a single message for both cases.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Unknown item id
    #[error("item not found: {0}")]
    NotFound(Uuid),

    /// The acting user does not own the item
    ///
    /// Reveals the id the caller already supplied, never the item itself.
    #[error("permission denied: item {0} belongs to another user")]
    PermissionDenied(Uuid),

    /// Password hashing or verification infrastructure failed
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Underlying store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_does_not_leak_which_field() {
        let msg = Error::InvalidCredentials.to_string();
        assert_eq!(msg, "invalid email or password");
    }

    #[test]
    fn test_permission_denied_names_only_the_id() {
        let id = Uuid::new_v4();
        let msg = Error::PermissionDenied(id).to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("another user"));
    }

    #[test]
    fn test_duplicate_email_display() {
        let msg = Error::DuplicateEmail("ann@x.com".to_string()).to_string();
        assert!(msg.contains("ann@x.com"));
        assert!(msg.contains("already exists"));
    }
}
