use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A workout session with its exercises, stored in the relational backend.
///
/// `id` and the timestamps are assigned by the store; values sent by a
/// client are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
    /// Owned exclusively by the workout, kept in insertion order.
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Creates a workout for the given date with no exercises.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Sets the workout type (e.g. "push", "legs").
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the workout duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Appends an exercise.
    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }
}

impl Record for Workout {
    type Key = i64;
    const ENTITY_TYPE: &'static str = "Workout";
}

/// A single exercise within a workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
    pub warmup: bool,
}

impl Exercise {
    pub fn new(name: impl Into<String>, weight: f64, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            sets,
            reps,
            ..Self::default()
        }
    }

    /// Marks the exercise as a warmup set.
    pub fn warmup(mut self) -> Self {
        self.warmup = true;
        self
    }
}

/// A comment attached to a page path (`slug`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub slug: String,
    pub body: String,
    pub author: String,
}

impl Comment {
    pub fn new(
        slug: impl Into<String>,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            author: author.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}

impl Record for Comment {
    type Key = i64;
    const ENTITY_TYPE: &'static str = "Comment";
}
