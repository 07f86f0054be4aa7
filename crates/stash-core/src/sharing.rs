//! Public sharing policy
//!
//! A share id is an opaque token granting unauthenticated read access to
//! one item while it is public. Enabling sharing on an already-public
//! item is a no-op and keeps the existing token; disabling always clears
//! the token, so old share URLs stop resolving.

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Item, ItemPatch, Session};
use crate::repository::ItemRepository;

/// Generate a fresh, globally unique share id
pub fn generate_share_id() -> String {
    format!("share-{}", Uuid::new_v4().simple())
}

/// Build the public URL for a share id
pub fn share_url(base_origin: &str, share_id: &str) -> String {
    format!("{}/share/{}", base_origin, share_id)
}

/// Make an item publicly readable
///
/// Idempotent: an already-public item is returned unchanged.
pub async fn enable(repo: &ItemRepository, session: &Session, id: Uuid) -> Result<Item> {
    let item = repo.get(session, id).await?.ok_or(Error::NotFound(id))?;
    if item.is_public {
        return Ok(item);
    }

    let patch = ItemPatch {
        is_public: Some(true),
        ..Default::default()
    };
    let item = repo.update(session, id, patch).await?;
    debug!("Enabled sharing for item {}", id);
    Ok(item)
}

/// Make an item private again, clearing its share id unconditionally
pub async fn disable(repo: &ItemRepository, session: &Session, id: Uuid) -> Result<Item> {
    // NotFound if the item vanished; unlike enable there is no early out,
    // disabling a private item is already a no-op in the patch.
    if repo.get(session, id).await?.is_none() {
        return Err(Error::NotFound(id));
    }

    let patch = ItemPatch {
        is_public: Some(false),
        ..Default::default()
    };
    let item = repo.update(session, id, patch).await?;
    debug!("Disabled sharing for item {}", id);
    Ok(item)
}

/// Resolve a share id to its item, if it is still publicly shared
pub async fn resolve_public(repo: &ItemRepository, share_id: &str) -> Result<Option<Item>> {
    repo.get_public(share_id).await
}
