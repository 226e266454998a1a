//! # Docshelf CLI (`shelf`)
//!
//! The `shelf` binary is the primary interface for Docshelf. It provides
//! commands for database initialization, group and document management,
//! file upload with remote indexing, and semantic queries.
//!
//! ## Usage
//!
//! ```bash
//! shelf --config ./config/shelf.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shelf init` | Create the SQLite database and run schema migrations |
//! | `shelf group list\|add\|rename\|rm` | Manage groups |
//! | `shelf doc list\|get\|add\|mv\|rm` | Manage documents |
//! | `shelf upload <file> --group <id>` | Upload a file, wait for indexing, persist metadata |
//! | `shelf source status\|rm <id>` | Inspect or delete an uploaded source |
//! | `shelf query "<text>" --group <id>` | Run a semantic query against indexed content |
//! | `shelf db reset` | Empty both tables |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! shelf init --config ./config/shelf.toml
//!
//! # Create a group and upload into it
//! shelf group add "Contracts"
//! shelf upload ./nda.pdf --group 1 --title "NDA 2026"
//!
//! # Query the indexed content
//! shelf query "termination clause" --group 1 --limit 10
//! ```

mod config;
mod db;
mod docs;
mod error;
mod events;
mod groups;
mod migrate;
mod models;
mod pipeline;
mod progress;
mod query;
mod store;
mod transport;
mod upload_cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::progress::ProgressMode;

/// Docshelf CLI — a local-first document organizer with grouped storage
/// and remote semantic indexing.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/shelf.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Docshelf — a local-first document organizer with grouped storage and remote semantic indexing",
    version,
    long_about = "Docshelf keeps groups and documents in an embedded SQLite store with enforced \
    referential integrity, uploads files to a remote indexing service while reporting progress, \
    and runs semantic queries against the indexed content."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/shelf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the groups and documents
    /// tables. This command is idempotent — running it multiple times is
    /// safe.
    Init,

    /// Manage groups.
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Manage documents.
    Doc {
        #[command(subcommand)]
        action: DocAction,
    },

    /// Upload a file, wait for server-side indexing, and persist the
    /// document metadata.
    Upload {
        /// Path to the file to upload.
        file: PathBuf,

        /// Group the resulting document belongs to.
        #[arg(long)]
        group: i64,

        /// Document title. Defaults to the file stem.
        #[arg(long)]
        title: Option<String>,

        /// Progress output: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a TTY.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Inspect or delete uploaded sources on the indexing service.
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },

    /// Run a semantic query against a group's indexed content.
    Query {
        /// The query text. Matched by meaning, not by keywords.
        text: String,

        /// Group to search in.
        #[arg(long)]
        group: i64,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Database maintenance.
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Group management subcommands.
#[derive(Subcommand)]
enum GroupAction {
    /// List all groups.
    List,
    /// Create a group.
    Add {
        /// Group name.
        name: String,
    },
    /// Rename a group.
    Rename {
        /// Group id.
        id: i64,
        /// New name.
        name: String,
    },
    /// Delete a group and every document in it.
    Rm {
        /// Group id.
        id: i64,
    },
}

/// Document management subcommands.
#[derive(Subcommand)]
enum DocAction {
    /// List the documents of a group.
    List {
        /// Group id.
        #[arg(long)]
        group: i64,
    },
    /// Show a document.
    Get {
        /// Document id.
        id: String,
    },
    /// Create a document record without uploading content.
    Add {
        /// Document id. A fresh UUID is generated when omitted.
        #[arg(long)]
        id: Option<String>,
        /// Group the document belongs to.
        #[arg(long)]
        group: i64,
        /// Document title.
        title: String,
    },
    /// Move a document to another group, optionally retitling it.
    Mv {
        /// Document id.
        id: String,
        /// Target group id.
        #[arg(long)]
        group: i64,
        /// New title.
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete a document.
    Rm {
        /// Document id.
        id: String,
    },
}

/// Source management subcommands.
#[derive(Subcommand)]
enum SourceAction {
    /// Show the indexing status of an uploaded source.
    Status {
        /// Server-assigned source id.
        id: String,
    },
    /// Delete an uploaded source on the server.
    Rm {
        /// Server-assigned source id.
        id: String,
    },
}

/// Database maintenance subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Empty the groups and documents tables.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Group { action } => match action {
            GroupAction::List => {
                groups::run_list_groups(&cfg).await?;
            }
            GroupAction::Add { name } => {
                groups::run_add_group(&cfg, &name).await?;
            }
            GroupAction::Rename { id, name } => {
                groups::run_rename_group(&cfg, id, &name).await?;
            }
            GroupAction::Rm { id } => {
                groups::run_delete_group(&cfg, id).await?;
            }
        },
        Commands::Doc { action } => match action {
            DocAction::List { group } => {
                docs::run_list_documents(&cfg, group).await?;
            }
            DocAction::Get { id } => {
                docs::run_get_document(&cfg, &id).await?;
            }
            DocAction::Add { id, group, title } => {
                docs::run_add_document(&cfg, id, group, &title).await?;
            }
            DocAction::Mv { id, group, title } => {
                docs::run_move_document(&cfg, &id, group, title).await?;
            }
            DocAction::Rm { id } => {
                docs::run_delete_document(&cfg, &id).await?;
            }
        },
        Commands::Upload {
            file,
            group,
            title,
            progress,
        } => {
            let mode = match progress.as_deref() {
                Some(value) => ProgressMode::parse(value).ok_or_else(|| {
                    anyhow::anyhow!("invalid progress mode '{}': use off, human, or json", value)
                })?,
                None => ProgressMode::default_for_tty(),
            };
            upload_cmd::run_upload(&cfg, &file, group, title, mode).await?;
        }
        Commands::Source { action } => match action {
            SourceAction::Status { id } => {
                upload_cmd::run_source_status(&cfg, &id).await?;
            }
            SourceAction::Rm { id } => {
                upload_cmd::run_source_delete(&cfg, &id).await?;
            }
        },
        Commands::Query { text, group, limit } => {
            query::run_query(&cfg, group, &text, limit).await?;
        }
        Commands::Db { action } => match action {
            DbAction::Reset => {
                db::run_reset(&cfg).await?;
            }
        },
    }

    Ok(())
}
