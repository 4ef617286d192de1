use serde::{Deserialize, Serialize};

use crate::storage::{CompoundKey, Record};

/// A flat workout record addressed by a caller-supplied compound key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkoutEntity {
    pub partition_key: String,
    pub row_key: String,
    pub date: String,
    pub exercise: String,
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
    pub warmup: bool,
}

impl WorkoutEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Self::default()
        }
    }

    pub fn with_exercise(mut self, exercise: impl Into<String>, weight: f64) -> Self {
        self.exercise = exercise.into();
        self.weight = weight;
        self
    }

    pub fn with_volume(mut self, sets: u32, reps: u32) -> Self {
        self.sets = sets;
        self.reps = reps;
        self
    }
}

impl Record for WorkoutEntity {
    type Key = CompoundKey;
    const ENTITY_TYPE: &'static str = "WorkoutEntity";
}

/// A flat comment record addressed by a caller-supplied compound key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentEntity {
    pub partition_key: String,
    pub row_key: String,
    pub slug: String,
    pub body: String,
    pub author: String,
}

impl CommentEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Self::default()
        }
    }
}

impl Record for CommentEntity {
    type Key = CompoundKey;
    const ENTITY_TYPE: &'static str = "CommentEntity";
}
