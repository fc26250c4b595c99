//! # Quarry Core
//!
//! Shared logic for Quarry: data models, the overlapping-window chunker,
//! the embedding vector codec, the cosine-similarity ranker, and the
//! corpus store abstraction.
//!
//! This crate contains no tokio runtime, sqlx, filesystem I/O, or other
//! heavyweight dependencies. The application crate (`quarry`) supplies the
//! SQLite store, embedding providers, HTTP server, and CLI on top of it.

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod models;
pub mod rank;
pub mod store;

pub use error::CoreError;
