use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::Result;

/// A persisted record type and the key that addresses it.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Store-assigned `i64` for relational records, `CompoundKey` for table records.
    type Key: Clone + fmt::Display + Send + Sync + DeserializeOwned + 'static;

    /// Name used in errors and log fields.
    const ENTITY_TYPE: &'static str;
}

/// Uniform CRUD contract over one record type.
///
/// Implementations must run `get` before `update` and `delete` and return
/// its `NotFound` without touching the stored state.
#[async_trait]
pub trait ResourceStore<R: Record>: Send + Sync {
    /// Gets a record by key.
    async fn get(&self, key: &R::Key) -> Result<R>;

    /// Creates a record and returns it as stored.
    async fn add(&self, record: R) -> Result<R>;

    /// Replaces every field of an existing record.
    async fn update(&self, key: &R::Key, record: R) -> Result<R>;

    /// Deletes an existing record.
    async fn delete(&self, key: &R::Key) -> Result<()>;

    /// Lists every stored record. Order is backend-defined.
    async fn get_all(&self) -> Result<Vec<R>>;
}
