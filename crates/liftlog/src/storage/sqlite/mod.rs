//! SQLite storage backend for the single-key records.
//!
//! `rusqlite` does the work on a dedicated thread owned by `tokio-rusqlite`,
//! so every call on the shared connection is serialized.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
