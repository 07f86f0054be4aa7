//! Item repository
//!
//! CRUD and query operations over the `items` collection. Ownership is
//! enforced here: every authenticated operation takes the acting
//! [`Session`] and fails with [`Error::PermissionDenied`] when the caller
//! does not own the target item. The only unauthenticated read path is
//! [`ItemRepository::get_public`].
//!
//! Each operation reads the whole collection, mutates it in memory
//! through an id-indexed table, and writes the whole collection back.
//! There is no isolation between overlapping mutations; callers must
//! serialize writes to the same collection.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{validate_fields, Item, ItemPatch, NewItem, Session};
use crate::sharing::generate_share_id;
use crate::storage::CollectionStore;

/// Insertion-ordered item table with an id index
///
/// Keeps the on-disk sequence contract (items serialize in insertion
/// order) while giving O(1) lookup by id in memory.
#[derive(Debug, Default)]
struct ItemTable {
    items: Vec<Item>,
    index: HashMap<Uuid, usize>,
}

impl ItemTable {
    fn load(items: Vec<Item>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id, pos))
            .collect();
        Self { items, index }
    }

    fn get(&self, id: Uuid) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Item> {
        self.index.get(&id).map(|&pos| &mut self.items[pos])
    }

    fn push(&mut self, item: Item) {
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
    }

    /// Remove an item, shifting later entries down to keep order
    fn remove(&mut self, id: Uuid) -> Option<Item> {
        let pos = self.index.remove(&id)?;
        let item = self.items.remove(pos);
        for (shifted, entry) in self.items.iter().enumerate().skip(pos) {
            self.index.insert(entry.id, shifted);
        }
        Some(item)
    }

    fn items(&self) -> &[Item] {
        &self.items
    }
}

/// CRUD and query operations over stored items
pub struct ItemRepository {
    store: CollectionStore,
}

impl ItemRepository {
    /// Create a repository over the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            store: CollectionStore::new(config),
        }
    }

    /// Create a new item owned by the acting user
    ///
    /// Validates the field invariants, assigns an id and timestamps, and
    /// assigns a share id when the item is created public.
    pub async fn create(&self, session: &Session, input: NewItem) -> Result<Item> {
        input.validate()?;

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            user_id: session.user_id(),
            kind: input.kind,
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
            url: input.url.map(|u| u.trim().to_string()),
            tags: input.tags,
            is_public: input.is_public,
            share_id: input.is_public.then(generate_share_id),
            created_at: now,
            updated_at: now,
        };

        let mut table = self.load_table()?;
        table.push(item.clone());
        self.store.save_items(table.items())?;

        debug!("Created item {} for user {}", item.id, item.user_id);
        Ok(item)
    }

    /// All items owned by the acting user, in insertion order
    pub async fn list(&self, session: &Session) -> Result<Vec<Item>> {
        let items = self.store.load_items()?;
        Ok(items
            .into_iter()
            .filter(|item| item.user_id == session.user_id())
            .collect())
    }

    /// Fetch one item by id
    ///
    /// `Ok(None)` when no such item exists; `PermissionDenied` when it
    /// exists but belongs to another user.
    pub async fn get(&self, session: &Session, id: Uuid) -> Result<Option<Item>> {
        let table = self.load_table()?;
        match table.get(id) {
            Some(item) if item.user_id == session.user_id() => Ok(Some(item.clone())),
            Some(_) => Err(Error::PermissionDenied(id)),
            None => Ok(None),
        }
    }

    /// Merge a partial patch over an existing item
    ///
    /// Bumps `updated_at` and keeps the `is_public`/`share_id` coupling:
    /// a patch turning sharing off clears the share id, a patch turning it
    /// on assigns a fresh one unless the patch supplies its own.
    pub async fn update(&self, session: &Session, id: Uuid, patch: ItemPatch) -> Result<Item> {
        let mut table = self.load_table()?;

        let item = table.get_mut(id).ok_or(Error::NotFound(id))?;
        if item.user_id != session.user_id() {
            return Err(Error::PermissionDenied(id));
        }

        if let Some(title) = patch.title {
            item.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            item.content = content.trim().to_string();
        }
        if let Some(url) = patch.url {
            item.url = Some(url.trim().to_string());
        }
        if let Some(tags) = patch.tags {
            item.tags = tags;
        }

        match patch.is_public {
            Some(true) => {
                item.is_public = true;
                if let Some(share_id) = patch.share_id {
                    item.share_id = Some(share_id);
                } else if item.share_id.is_none() {
                    item.share_id = Some(generate_share_id());
                }
            }
            Some(false) => {
                item.is_public = false;
                item.share_id = None;
            }
            None => {
                if let Some(share_id) = patch.share_id {
                    if !item.is_public {
                        return Err(Error::Validation(
                            "share_id can only be set on a public item".into(),
                        ));
                    }
                    item.share_id = Some(share_id);
                }
            }
        }

        validate_fields(item.kind, &item.title, &item.content, item.url.as_deref())?;
        item.updated_at = Utc::now();

        let updated = item.clone();
        self.store.save_items(table.items())?;

        debug!("Updated item {}", id);
        Ok(updated)
    }

    /// Hard-delete an item; a no-op when it does not exist
    pub async fn delete(&self, session: &Session, id: Uuid) -> Result<()> {
        let mut table = self.load_table()?;

        match table.get(id) {
            None => return Ok(()),
            Some(item) if item.user_id != session.user_id() => {
                return Err(Error::PermissionDenied(id));
            }
            Some(_) => {}
        }

        table.remove(id);
        self.store.save_items(table.items())?;

        debug!("Deleted item {}", id);
        Ok(())
    }

    /// Resolve a public share id to its item
    ///
    /// Returns the item only when it is public and the share id matches.
    /// This is the unauthenticated read path behind public share pages.
    pub async fn get_public(&self, share_id: &str) -> Result<Option<Item>> {
        let items = self.store.load_items()?;
        Ok(items
            .into_iter()
            .find(|item| item.is_public && item.share_id.as_deref() == Some(share_id)))
    }

    /// Note and link counts for the acting user
    pub async fn counts(&self, session: &Session) -> Result<(usize, usize)> {
        let items = self.list(session).await?;
        Ok(crate::search::counts(&items))
    }

    fn load_table(&self) -> Result<ItemTable> {
        Ok(ItemTable::load(self.store.load_items()?))
    }
}
