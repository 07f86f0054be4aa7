//! Status command handler

use anyhow::Result;

use stash_core::{AuthService, Config, ItemRepository};

use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show(
    auth: &AuthService,
    repo: &ItemRepository,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let session = auth.restore_session().await?;

    let (notes, links) = match &session {
        Some(session) => repo.counts(session).await?,
        None => (0, 0),
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "share_origin": config.share_origin,
                    "session": session,
                    "counts": {
                        "notes": notes,
                        "links": links
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            if let Some(session) = &session {
                println!("{}", session.user.email);
            }
        }
        OutputFormat::Human => {
            println!("Stash Status");
            println!("============");
            println!();
            println!("Session:");
            match &session {
                Some(session) => {
                    println!("  User:  {} <{}>", session.user.name, session.user.email);
                }
                None => println!("  (not logged in)"),
            }
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            if session.is_some() {
                println!("Contents:");
                println!("  Notes: {}", notes);
                println!("  Links: {}", links);
                println!("  Total: {}", notes + links);
            }
        }
    }

    Ok(())
}
