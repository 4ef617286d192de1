//! SQLite schema definitions and SQL query constants.

/// Creates every table on first open. Safe to run against an existing file.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS workouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    date TEXT NOT NULL,
    kind TEXT NOT NULL,
    duration TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    workout_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    weight REAL NOT NULL,
    sets INTEGER NOT NULL,
    reps INTEGER NOT NULL,
    warmup INTEGER NOT NULL,
    FOREIGN KEY (workout_id) REFERENCES workouts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    slug TEXT NOT NULL,
    body TEXT NOT NULL,
    author TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exercises_workout_position ON exercises(workout_id, position);
CREATE INDEX IF NOT EXISTS idx_comments_slug ON comments(slug);
"#;

// Workouts

pub const INSERT_WORKOUT: &str = r#"
INSERT INTO workouts (created_at, updated_at, date, kind, duration)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_WORKOUT_BY_ID: &str = r#"
SELECT id, created_at, updated_at, date, kind, duration
FROM workouts
WHERE id = ?1
"#;

pub const SELECT_ALL_WORKOUTS: &str = r#"
SELECT id, created_at, updated_at, date, kind, duration
FROM workouts
ORDER BY id
"#;

pub const UPDATE_WORKOUT: &str = r#"
UPDATE workouts
SET updated_at = ?2, date = ?3, kind = ?4, duration = ?5
WHERE id = ?1
"#;

pub const DELETE_WORKOUT: &str = "DELETE FROM workouts WHERE id = ?1";

// Exercises

pub const INSERT_EXERCISE: &str = r#"
INSERT INTO exercises (workout_id, position, name, weight, sets, reps, warmup)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_EXERCISES_BY_WORKOUT: &str = r#"
SELECT id, workout_id, name, weight, sets, reps, warmup
FROM exercises
WHERE workout_id = ?1
ORDER BY position
"#;

pub const SELECT_ALL_EXERCISES: &str = r#"
SELECT id, workout_id, name, weight, sets, reps, warmup
FROM exercises
ORDER BY workout_id, position
"#;

pub const DELETE_EXERCISES_BY_WORKOUT: &str = "DELETE FROM exercises WHERE workout_id = ?1";

// Comments

pub const INSERT_COMMENT: &str = r#"
INSERT INTO comments (created_at, updated_at, slug, body, author)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_COMMENT_BY_ID: &str = r#"
SELECT id, created_at, updated_at, slug, body, author
FROM comments
WHERE id = ?1
"#;

pub const SELECT_ALL_COMMENTS: &str = r#"
SELECT id, created_at, updated_at, slug, body, author
FROM comments
ORDER BY id
"#;

pub const UPDATE_COMMENT: &str = r#"
UPDATE comments
SET updated_at = ?2, slug = ?3, body = ?4, author = ?5
WHERE id = ?1
"#;

pub const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?1";
