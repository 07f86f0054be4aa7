//! Item command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use stash_core::{search, ItemKind, ItemPatch, ItemRepository, NewItem, SearchQuery, Session};

use crate::output::Output;
use crate::prompt::confirm;

/// Create a new item
#[allow(clippy::too_many_arguments)]
pub async fn create(
    repo: &ItemRepository,
    session: &Session,
    kind: ItemKind,
    title: String,
    content: String,
    url: Option<String>,
    tags: Vec<String>,
    public: bool,
    output: &Output,
) -> Result<()> {
    let input = NewItem {
        kind,
        title,
        content,
        url,
        tags,
        is_public: public,
    };

    let item = repo
        .create(session, input)
        .await
        .context("Failed to create item")?;

    output.success(&format!("Created {}: {}", item.kind, item.id));
    output.print_item(&item);
    Ok(())
}

/// List items, filtered by search text and required tags
pub async fn list(
    repo: &ItemRepository,
    session: &Session,
    text: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let items = repo.list(session).await?;

    let query = SearchQuery {
        text: text.unwrap_or_default(),
        tags,
    };
    let filtered = search::filter(&items, &query);

    output.print_items(&filtered);
    Ok(())
}

/// Show a single item
pub async fn show(
    repo: &ItemRepository,
    session: &Session,
    id: String,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    let item = repo
        .get(session, uuid)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    output.print_item(&item);
    Ok(())
}

/// Edit an item's fields
pub async fn edit(
    repo: &ItemRepository,
    session: &Session,
    id: String,
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
    tags: Option<String>,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    let patch = ItemPatch {
        title,
        content,
        url,
        tags: tags.map(|list| {
            list.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        ..Default::default()
    };

    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --content, --url, --tags.");
    }

    let item = repo
        .update(session, uuid, patch)
        .await
        .context("Failed to update item")?;

    output.success("Item updated");
    output.print_item(&item);
    Ok(())
}

/// Delete an item
pub async fn delete(
    repo: &ItemRepository,
    session: &Session,
    id: String,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    let item = repo
        .get(session, uuid)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() {
        println!(
            "Delete {}: {} - {}",
            item.kind,
            &item.id.to_string()[..8],
            item.title
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    repo.delete(session, uuid)
        .await
        .context("Failed to delete item")?;

    output.success(&format!("Deleted item: {}", uuid));
    Ok(())
}

/// Parse an item ID (supports full UUID or prefix over the user's items)
pub(crate) async fn resolve_item_id(repo: &ItemRepository, session: &Session, id: &str) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let items = repo.list(session).await?;
    let matches: Vec<_> = items
        .iter()
        .filter(|item| item.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No item found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple items match '{}':", id);
            for item in &matches {
                eprintln!("  {} - {}", item.id, item.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
