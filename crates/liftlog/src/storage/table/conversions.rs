//! Table item conversion functions.
//!
//! Pure functions for converting between table items and the compound-key
//! records. Testable in isolation without a table.

use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use liftlog_core::storage::{CompoundKey, Record, RepositoryError};
use liftlog_core::workout::{CommentEntity, WorkoutEntity};

use super::client::Item;
use super::keys::{self, COMMENT_PREFIX, ENTITY_TYPE, PK, SK, WORKOUT_PREFIX};

/// A compound-key record that knows its table item representation.
pub trait TableRecord: Record<Key = CompoundKey> {
    /// Prefix of the stored partition key.
    const KEY_PREFIX: &'static str;

    /// The caller-supplied key carried by the record.
    fn key(&self) -> CompoundKey;

    /// Replaces the record's key.
    fn with_key(self, key: CompoundKey) -> Self;

    /// Full item including `PK`, `SK` and `entityType`.
    fn to_item(&self) -> Item;

    /// Decodes an item. Fails with `Serialization` on a missing or mistyped
    /// attribute.
    fn from_item(item: &Item) -> Result<Self, RepositoryError>;
}

/// Key attributes shared by every item.
fn base_item<R: TableRecord>(record: &R) -> Item {
    let key = keys::table_key(R::KEY_PREFIX, &record.key());

    Item::from([
        (PK.to_string(), AttributeValue::S(key.pk)),
        (SK.to_string(), AttributeValue::S(key.sk)),
        (
            ENTITY_TYPE.to_string(),
            AttributeValue::S(R::ENTITY_TYPE.to_string()),
        ),
    ])
}

/// Reads the compound key back out of an item's `PK` and `SK`.
fn item_key<R: TableRecord>(item: &Item) -> Result<CompoundKey, RepositoryError> {
    let pk = get_string(item, PK)?;
    let partition = keys::strip_partition_prefix(R::KEY_PREFIX, &pk).ok_or_else(|| {
        RepositoryError::Serialization(format!(
            "{} item has foreign partition key: {pk}",
            R::ENTITY_TYPE
        ))
    })?;

    Ok(CompoundKey::new(partition, get_string(item, SK)?))
}

// ============================================================================
// WorkoutEntity
// ============================================================================

impl TableRecord for WorkoutEntity {
    const KEY_PREFIX: &'static str = WORKOUT_PREFIX;

    fn key(&self) -> CompoundKey {
        CompoundKey::new(&self.partition_key, &self.row_key)
    }

    fn with_key(mut self, key: CompoundKey) -> Self {
        self.partition_key = key.partition;
        self.row_key = key.row;
        self
    }

    fn to_item(&self) -> Item {
        let mut item = base_item(self);
        item.insert("date".to_string(), AttributeValue::S(self.date.clone()));
        item.insert(
            "exercise".to_string(),
            AttributeValue::S(self.exercise.clone()),
        );
        item.insert("weight".to_string(), AttributeValue::N(self.weight.to_string()));
        item.insert("sets".to_string(), AttributeValue::N(self.sets.to_string()));
        item.insert("reps".to_string(), AttributeValue::N(self.reps.to_string()));
        item.insert("warmup".to_string(), AttributeValue::Bool(self.warmup));
        item
    }

    fn from_item(item: &Item) -> Result<Self, RepositoryError> {
        let key = item_key::<Self>(item)?;

        Ok(Self {
            partition_key: key.partition,
            row_key: key.row,
            date: get_string(item, "date")?,
            exercise: get_string(item, "exercise")?,
            weight: get_number(item, "weight")?,
            sets: get_number(item, "sets")?,
            reps: get_number(item, "reps")?,
            warmup: get_bool(item, "warmup")?,
        })
    }
}

// ============================================================================
// CommentEntity
// ============================================================================

impl TableRecord for CommentEntity {
    const KEY_PREFIX: &'static str = COMMENT_PREFIX;

    fn key(&self) -> CompoundKey {
        CompoundKey::new(&self.partition_key, &self.row_key)
    }

    fn with_key(mut self, key: CompoundKey) -> Self {
        self.partition_key = key.partition;
        self.row_key = key.row;
        self
    }

    fn to_item(&self) -> Item {
        let mut item = base_item(self);
        item.insert("slug".to_string(), AttributeValue::S(self.slug.clone()));
        item.insert("body".to_string(), AttributeValue::S(self.body.clone()));
        item.insert("author".to_string(), AttributeValue::S(self.author.clone()));
        item
    }

    fn from_item(item: &Item) -> Result<Self, RepositoryError> {
        let key = item_key::<Self>(item)?;

        Ok(Self {
            partition_key: key.partition,
            row_key: key.row,
            slug: get_string(item, "slug")?,
            body: get_string(item, "body")?,
            author: get_string(item, "author")?,
        })
    }
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| missing(key))
}

fn get_number<T: FromStr>(item: &Item, key: &str) -> Result<T, RepositoryError>
where
    T::Err: std::fmt::Display,
{
    let raw = item.get(key).and_then(|v| v.as_n().ok()).ok_or_else(|| missing(key))?;
    raw.parse()
        .map_err(|e| RepositoryError::Serialization(format!("Invalid number {key}: {e}")))
}

fn get_bool(item: &Item, key: &str) -> Result<bool, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| missing(key))
}

fn missing(key: &str) -> RepositoryError {
    RepositoryError::Serialization(format!("Missing or invalid field: {key}"))
}
