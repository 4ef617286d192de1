//! Storage backend implementations.
//!
//! Concrete implementations of `liftlog_core::storage::ResourceStore`. Both
//! backends can be compiled in together; `STORAGE_BACKEND` picks one at
//! startup.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): single-key records in SQLite via `rusqlite` and `tokio-rusqlite`
//! - `dynamodb` (default): compound-key records in a partitioned table, backed by
//!   `aws-sdk-dynamodb` or by an in-process table

#[cfg(not(any(feature = "sqlite", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'dynamodb' feature. \
    Example: cargo build -p liftlog --features sqlite"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "dynamodb")]
pub mod table;
