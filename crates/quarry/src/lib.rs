//! # Quarry
//!
//! A local-first document retrieval engine. Quarry ingests plain-text,
//! Markdown, and PDF documents, splits them into overlapping word-window
//! chunks, embeds each chunk, and answers natural-language queries by
//! brute-force cosine ranking over the stored vectors.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────┐
//! │  Upload  │──▶│   Pipeline   │──▶│  SQLite  │
//! │ txt/md/  │   │ Chunk+Embed  │   │ docs +   │
//! │   pdf    │   └──────────────┘   │ vectors  │
//! └──────────┘                      └────┬─────┘
//!                                        │
//!                     ┌──────────────────┤
//!                     ▼                  ▼
//!                ┌──────────┐      ┌──────────┐
//!                │   CLI    │      │   HTTP   │
//!                │ (quarry) │      │  (JSON)  │
//!                └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! quarry init                   # create database
//! quarry ingest notes.md        # chunk, embed, and store a file
//! quarry search "deployment"    # ask a question
//! quarry serve                  # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite corpus backend |
//! | [`extract`] | Text extraction by file type |
//! | [`embedding`] | Embedding providers (OpenAI, Ollama) |
//! | [`service`] | Ingestion and answer pipelines |
//! | [`server`] | JSON HTTP server |
//!
//! Pure algorithms (chunking, the vector codec, cosine ranking, the store
//! trait) live in the `quarry-core` crate.

pub mod config;
pub mod db;
pub mod embedding;
pub mod extract;
pub mod migrate;
pub mod server;
pub mod service;
pub mod sqlite_store;
