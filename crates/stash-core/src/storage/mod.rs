//! Durable key-value storage
//!
//! Three named collections persisted as JSON files under the data
//! directory, standing in for a remote database:
//!
//! - `users.json`   - credential records
//! - `session.json` - the current session, absent when logged out
//! - `items.json`   - all item records, insertion order
//!
//! Writes are atomic (temp file + fsync + rename). Each operation reads
//! the whole collection and writes the whole collection back; callers
//! must serialize concurrent mutations of the same collection.

mod error;
mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::CollectionStore;
