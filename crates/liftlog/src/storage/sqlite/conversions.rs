//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use liftlog_core::workout::{Comment, Exercise, Workout};
use rusqlite::{types::Type, Row};

/// Convert a SQLite row to a Workout without its exercises.
///
/// Expected columns: id, created_at, updated_at, date, kind, duration
pub fn row_to_workout(row: &Row) -> rusqlite::Result<Workout> {
    let created_at: String = row.get(1)?;
    let updated_at: String = row.get(2)?;

    Ok(Workout {
        id: row.get(0)?,
        created_at: Some(parse_datetime(&created_at, 1)?),
        updated_at: Some(parse_datetime(&updated_at, 2)?),
        date: row.get(3)?,
        kind: row.get(4)?,
        duration: row.get(5)?,
        exercises: Vec::new(),
    })
}

/// Convert a SQLite row to an Exercise paired with its owning workout id.
///
/// Expected columns: id, workout_id, name, weight, sets, reps, warmup
pub fn row_to_exercise(row: &Row) -> rusqlite::Result<(i64, Exercise)> {
    let workout_id: i64 = row.get(1)?;

    Ok((
        workout_id,
        Exercise {
            id: row.get(0)?,
            name: row.get(2)?,
            weight: row.get(3)?,
            sets: row.get(4)?,
            reps: row.get(5)?,
            warmup: row.get(6)?,
        },
    ))
}

/// Convert a SQLite row to a Comment.
///
/// Expected columns: id, created_at, updated_at, slug, body, author
pub fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    let created_at: String = row.get(1)?;
    let updated_at: String = row.get(2)?;

    Ok(Comment {
        id: row.get(0)?,
        created_at: Some(parse_datetime(&created_at, 1)?),
        updated_at: Some(parse_datetime(&updated_at, 2)?),
        slug: row.get(3)?,
        body: row.get(4)?,
        author: row.get(5)?,
    })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_datetime(s: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
