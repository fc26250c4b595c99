//! # Quarry CLI (`quarry`)
//!
//! The `quarry` binary is the primary interface for Quarry. It provides
//! commands for database initialization, document ingestion, retrieval
//! queries, corpus management, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! quarry --config ./config/quarry.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quarry init` | Create the SQLite database and run schema migrations |
//! | `quarry ingest <file>` | Chunk, embed, and store a document |
//! | `quarry search "<query>"` | Answer a question against the corpus |
//! | `quarry list` | List stored documents, newest first |
//! | `quarry delete <id>` | Delete a document and its chunks |
//! | `quarry serve` | Start the JSON HTTP server |

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use quarry::{config, db, embedding, migrate, server, service, sqlite_store};

use quarry_core::embedding::Embedder;
use quarry_core::store::CorpusStore;

/// Quarry — a local-first document retrieval engine.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/quarry.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "quarry",
    about = "Quarry — a local-first document retrieval engine",
    version,
    long_about = "Quarry ingests text, Markdown, and PDF documents, splits them into \
    overlapping word-window chunks, embeds each chunk, and answers natural-language \
    queries by cosine ranking over the stored vectors. Exposes a CLI and a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/quarry.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents/chunks tables.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Chunk, embed, and store a document.
    ///
    /// Reads the file, extracts text by extension (.pdf, .txt, .md),
    /// splits it into overlapping chunks, embeds each chunk with the
    /// configured provider, and persists everything.
    Ingest {
        /// Path to the file to ingest.
        file: PathBuf,
    },

    /// Answer a question against the corpus.
    ///
    /// Embeds the query, ranks every stored chunk by cosine similarity,
    /// and prints an answer assembled from the top sources.
    Search {
        /// The query string.
        query: String,

        /// Number of sources to return (overrides `[retrieval].top_k`).
        #[arg(long)]
        top_k: Option<i64>,
    },

    /// List stored documents, newest first.
    List,

    /// Delete a document and all of its chunks.
    ///
    /// Idempotent — deleting an id that does not exist is a no-op.
    Delete {
        /// Document id.
        id: i64,
    },

    /// Start the JSON HTTP server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            println!("Database initialized at {}", cfg.db.path.display());
        }
        Commands::Ingest { file } => {
            let (store, embedder) = open(&cfg).await?;

            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("invalid file name")?
                .to_string();
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let text = quarry::extract::extract_text(&bytes, &name)?;

            let result = service::ingest(
                store.as_ref(),
                embedder.as_ref(),
                &name,
                &text,
                &cfg.chunking,
                &cfg.embedding,
            )
            .await?;

            println!(
                "Ingested '{}' as document {} ({} chunks)",
                name, result.doc_id, result.chunk_count
            );
        }
        Commands::Search { query, top_k } => {
            let (store, embedder) = open(&cfg).await?;
            let top_k = top_k.unwrap_or(cfg.retrieval.top_k);

            let result = service::answer(store.as_ref(), embedder.as_ref(), &query, top_k).await?;

            println!("{}\n", result.answer);
            for (i, source) in result.sources.iter().enumerate() {
                println!(
                    "  {}. [{:.4}] {} — {}",
                    i + 1,
                    source.score,
                    source.doc_name,
                    source.excerpt
                );
            }
        }
        Commands::List => {
            let (store, _) = open(&cfg).await?;
            let docs = store.get_all_documents().await?;

            if docs.is_empty() {
                println!("No documents stored.");
            } else {
                for d in docs {
                    println!(
                        "{}  {}  ({} chunks, {} bytes, uploaded {})",
                        d.id, d.name, d.chunk_count, d.size, d.uploaded_at
                    );
                }
            }
        }
        Commands::Delete { id } => {
            let (store, _) = open(&cfg).await?;
            store.delete_document(id).await?;
            println!("Deleted document {}", id);
        }
        Commands::Serve => {
            let (store, embedder) = open(&cfg).await?;
            server::run_server(&cfg, store, embedder).await?;
        }
    }

    Ok(())
}

/// Connect to the database (running migrations, which are idempotent) and
/// construct the configured embedding provider.
async fn open(cfg: &config::Config) -> Result<(Arc<dyn CorpusStore>, Arc<dyn Embedder>)> {
    let pool = db::connect(cfg).await?;
    migrate::run_migrations(&pool).await?;

    let store: Arc<dyn CorpusStore> = Arc::new(sqlite_store::SqliteStore::new(pool));
    let embedder: Arc<dyn Embedder> = Arc::from(embedding::create_embedder(&cfg.embedding)?);

    Ok((store, embedder))
}
