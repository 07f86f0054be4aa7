//! Sharing command handlers

use anyhow::{bail, Context, Result};

use stash_core::{sharing, Config, ItemRepository, Session};

use crate::commands::item::resolve_item_id;
use crate::output::{Output, OutputFormat};

/// Make an item publicly readable and print its share URL
pub async fn enable(
    repo: &ItemRepository,
    session: &Session,
    config: &Config,
    id: String,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    let item = sharing::enable(repo, session, uuid)
        .await
        .context("Failed to enable sharing")?;

    // enable guarantees a share id on success
    let share_id = item.share_id.as_deref().unwrap_or_default();
    let url = sharing::share_url(&config.share_origin, share_id);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": item.id,
                    "share_id": share_id,
                    "url": url
                })
            );
        }
        OutputFormat::Quiet => println!("{}", share_id),
        OutputFormat::Human => {
            output.success("Item is now public");
            println!("Share URL: {}", url);
        }
    }
    Ok(())
}

/// Make an item private again
pub async fn disable(
    repo: &ItemRepository,
    session: &Session,
    id: String,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    sharing::disable(repo, session, uuid)
        .await
        .context("Failed to disable sharing")?;

    output.success("Item is now private");
    Ok(())
}

/// Print the public URL for an already-shared item
pub async fn url(
    repo: &ItemRepository,
    session: &Session,
    config: &Config,
    id: String,
    origin: Option<String>,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_item_id(repo, session, &id).await?;

    let item = repo
        .get(session, uuid)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    let Some(share_id) = item.share_id.as_deref() else {
        bail!("Item is not shared. Run `stash share enable {}` first.", id);
    };

    let origin = origin.unwrap_or_else(|| config.share_origin.clone());
    let link = sharing::share_url(&origin, share_id);

    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "url": link })),
        _ => println!("{}", link),
    }
    Ok(())
}

/// Resolve a share id the way the unauthenticated public page does
pub async fn show(repo: &ItemRepository, share_id: String, output: &Output) -> Result<()> {
    match sharing::resolve_public(repo, &share_id).await? {
        Some(item) => output.print_item(&item),
        None => bail!("Nothing is shared under '{}'.", share_id),
    }
    Ok(())
}
