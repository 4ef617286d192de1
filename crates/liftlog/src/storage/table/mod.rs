//! Partitioned key-value table store for the compound-key records.
//!
//! [`TableStore`] implements the uniform CRUD contract on top of any
//! [`TableClient`]: DynamoDB in production, [`InMemoryTable`] for development
//! and tests. Several record types share one table, told apart by a key
//! prefix and an `entityType` attribute.

mod client;
mod conversions;
pub mod keys;
mod memory;
mod store;

pub use client::{Item, ScanPage, TableClient, TableKey, WriteCondition, WriteOutcome};
pub use memory::InMemoryTable;
pub use store::TableStore;
