//! Stash Core Library
//!
//! This crate provides the core functionality for Stash, a personal
//! knowledge base of notes and bookmarked links with per-user ownership,
//! tagging, search, and public sharing.
//!
//! # Architecture
//!
//! Three JSON collections (`users`, `session`, `items`) in a local data
//! directory stand in for a remote database. Services own a
//! [`CollectionStore`] and perform whole-collection read-modify-write
//! cycles; there is one logical caller per process, so no locking.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let auth = AuthService::new(config.clone());
//! let repo = ItemRepository::new(config);
//!
//! let session = auth.signup("Ann", "ann@x.com", "secret").await?;
//! let item = repo.create(&session, new_item).await?;
//! let mine = repo.list(&session).await?;
//! ```
//!
//! # Modules
//!
//! - `auth`: session lifecycle (signup, login, logout, restore)
//! - `repository`: item CRUD with ownership enforcement
//! - `search`: pure text + tag filtering over loaded items
//! - `sharing`: public share tokens and resolution
//! - `models`: data structures for users, sessions, and items
//! - `storage`: the JSON collection store
//! - `config`: application configuration

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod search;
pub mod sharing;
pub mod storage;

pub use auth::AuthService;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Item, ItemKind, ItemPatch, NewItem, Session, User, UserRecord};
pub use repository::ItemRepository;
pub use search::SearchQuery;
pub use storage::{CollectionStore, StorageError};
