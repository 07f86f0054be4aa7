//! Stash CLI
//!
//! Command-line interface for Stash - a personal knowledge base of notes
//! and bookmarked links.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stash_core::{AuthService, Config, ItemKind, ItemRepository};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "stash")]
#[command(about = "Stash - personal knowledge base of notes and links")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and start a session
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted; the prompt echoes input)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in with an existing account
    Login {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted; the prompt echoes input)
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Manage items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Manage public sharing
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// List all tags
    Tags,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (session, storage, item counts)
    Status,
}

/// Item kind argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Note,
    Link,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Note => ItemKind::Note,
            KindArg::Link => ItemKind::Link,
        }
    }
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Create a new item
    #[command(alias = "add")]
    Create {
        /// note or link
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Display title
        #[arg(long)]
        title: String,
        /// Body content (rich-text markup is stored verbatim)
        #[arg(long)]
        content: String,
        /// Target URL (links only)
        #[arg(long)]
        url: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Share publicly right away
        #[arg(long)]
        public: bool,
    },
    /// List your items
    #[command(alias = "ls")]
    List {
        /// Require a tag (repeatable; all must match)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Filter by search text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show item details
    Show {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Edit an item
    Edit {
        /// Item ID (full UUID or prefix)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// New URL (links only)
        #[arg(long)]
        url: Option<String>,
        /// Replace all tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Search your items
    Search {
        /// Search text
        query: String,
        /// Require a tag (repeatable; all must match)
        #[arg(short, long)]
        tag: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Make an item publicly readable
    Enable {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Make an item private again
    Disable {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Print the public URL for a shared item
    Url {
        /// Item ID (full UUID or prefix)
        id: String,
        /// Base origin (defaults to the configured share_origin)
        #[arg(long)]
        origin: Option<String>,
    },
    /// Resolve a share id the way the public page does
    Show {
        /// Share ID
        share_id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, share_origin)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    init_logging();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    tracing::debug!("Using data dir {:?}", config.data_dir);

    let auth = AuthService::new(config.clone());
    let repo = ItemRepository::new(config.clone());

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(&auth, name, email, password, &output).await,
        Commands::Login { email, password } => {
            commands::auth::login(&auth, email, password, &output).await
        }
        Commands::Logout => commands::auth::logout(&auth, &output).await,
        Commands::Whoami => commands::auth::whoami(&auth, &output).await,
        Commands::Item { command } => handle_item_command(command, &auth, &repo, &output).await,
        Commands::Share { command } => {
            handle_share_command(command, &auth, &repo, &config, &output).await
        }
        Commands::Tags => commands::tag::list(&auth, &repo, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&auth, &repo, &config, &output).await,
    }
}

async fn handle_item_command(
    command: ItemCommands,
    auth: &AuthService,
    repo: &ItemRepository,
    output: &Output,
) -> Result<()> {
    let session = commands::auth::require_session(auth).await?;

    match command {
        ItemCommands::Create {
            kind,
            title,
            content,
            url,
            tag,
            public,
        } => {
            commands::item::create(
                repo,
                &session,
                kind.into(),
                title,
                content,
                url,
                tag,
                public,
                output,
            )
            .await
        }
        ItemCommands::List { tag, search } => {
            commands::item::list(repo, &session, search, tag, output).await
        }
        ItemCommands::Show { id } => commands::item::show(repo, &session, id, output).await,
        ItemCommands::Edit {
            id,
            title,
            content,
            url,
            tags,
        } => commands::item::edit(repo, &session, id, title, content, url, tags, output).await,
        ItemCommands::Delete { id } => commands::item::delete(repo, &session, id, output).await,
        ItemCommands::Search { query, tag } => {
            commands::item::list(repo, &session, Some(query), tag, output).await
        }
    }
}

async fn handle_share_command(
    command: ShareCommands,
    auth: &AuthService,
    repo: &ItemRepository,
    config: &Config,
    output: &Output,
) -> Result<()> {
    // The public resolution path is the one command that works logged out
    if let ShareCommands::Show { share_id } = command {
        return commands::share::show(repo, share_id, output).await;
    }

    let session = commands::auth::require_session(auth).await?;

    match command {
        ShareCommands::Enable { id } => {
            commands::share::enable(repo, &session, config, id, output).await
        }
        ShareCommands::Disable { id } => {
            commands::share::disable(repo, &session, id, output).await
        }
        ShareCommands::Url { id, origin } => {
            commands::share::url(repo, &session, config, id, origin, output).await
        }
        ShareCommands::Show { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Initialize stderr logging, filtered by STASH_LOG (default: warnings only)
fn init_logging() {
    let env_filter = EnvFilter::try_from_env("STASH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("stash_core=warn,stash_cli=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
