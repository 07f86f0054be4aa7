//! Tag command handlers

use anyhow::Result;

use stash_core::{search, AuthService, ItemRepository};

use crate::commands::auth::require_session;
use crate::output::Output;

/// List all tags with usage counts, in order of first appearance
pub async fn list(auth: &AuthService, repo: &ItemRepository, output: &Output) -> Result<()> {
    let session = require_session(auth).await?;
    let items = repo.list(&session).await?;

    let tags = search::tag_counts(&items);
    output.print_tags(&tags);
    Ok(())
}
