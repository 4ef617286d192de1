//! SQLite repository implementation.
//!
//! Implements `ResourceStore` for the single-key records. The existence check
//! and the write of every mutation run inside one connection call, and
//! multi-statement writes run inside a transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use liftlog_core::storage::{Record, RepositoryError, ResourceStore, Result};
use liftlog_core::workout::{Comment, Exercise, Workout};

use super::conversions::{format_datetime, row_to_comment, row_to_exercise, row_to_workout};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository for workouts and comments.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and bootstraps the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::info!(path, "Opened SQLite database");

        Ok(Self { conn })
    }

    /// Creates a repository over an in-memory database.
    ///
    /// Data is lost when the repository is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// Synchronous helpers, called from inside `Connection::call`.

fn load_workout(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<Workout>> {
    let workout = conn
        .prepare(schema::SELECT_WORKOUT_BY_ID)?
        .query_row([id], row_to_workout)
        .optional()?;

    match workout {
        Some(mut workout) => {
            workout.exercises = load_exercises(conn, id)?;
            Ok(Some(workout))
        }
        None => Ok(None),
    }
}

fn load_exercises(conn: &rusqlite::Connection, workout_id: i64) -> rusqlite::Result<Vec<Exercise>> {
    let mut stmt = conn.prepare(schema::SELECT_EXERCISES_BY_WORKOUT)?;
    let rows = stmt.query_map([workout_id], row_to_exercise)?;

    rows.map(|row| row.map(|(_, exercise)| exercise)).collect()
}

fn insert_exercises(
    conn: &rusqlite::Connection,
    workout_id: i64,
    exercises: &[Exercise],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(schema::INSERT_EXERCISE)?;
    for (position, exercise) in exercises.iter().enumerate() {
        stmt.execute(params![
            workout_id,
            position as i64,
            exercise.name,
            exercise.weight,
            exercise.sets,
            exercise.reps,
            exercise.warmup,
        ])?;
    }
    Ok(())
}

fn load_comment(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<Comment>> {
    conn.prepare(schema::SELECT_COMMENT_BY_ID)?
        .query_row([id], row_to_comment)
        .optional()
}

/// Reports a missing row read back right after it was written.
fn vanished(entity_type: &'static str, id: i64) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(format!("{entity_type} {id} vanished after write").into())
}

// ============================================================================
// Workouts
// ============================================================================

#[async_trait]
impl ResourceStore<Workout> for SqliteRepository {
    async fn get(&self, id: &i64) -> Result<Workout> {
        let id = *id;

        self.conn
            .call(move |conn| load_workout(conn, id).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Workout::ENTITY_TYPE))?
            .ok_or_else(|| RepositoryError::not_found(Workout::ENTITY_TYPE, id))
    }

    async fn add(&self, workout: Workout) -> Result<Workout> {
        let now = format_datetime(&Utc::now());

        let stored = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_WORKOUT,
                    params![now, now, workout.date, workout.kind, workout.duration],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                insert_exercises(&tx, id, &workout.exercises).map_err(wrap_err)?;

                let stored = load_workout(&tx, id)
                    .map_err(wrap_err)?
                    .ok_or_else(|| vanished(Workout::ENTITY_TYPE, id))?;
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Workout::ENTITY_TYPE))?;

        tracing::debug!(id = stored.id, exercises = stored.exercises.len(), "Inserted workout");
        Ok(stored)
    }

    async fn update(&self, id: &i64, workout: Workout) -> Result<Workout> {
        let id = *id;
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                if load_workout(&tx, id).map_err(wrap_err)?.is_none() {
                    return Ok(None);
                }

                tx.execute(
                    schema::UPDATE_WORKOUT,
                    params![id, now, workout.date, workout.kind, workout.duration],
                )
                .map_err(wrap_err)?;
                tx.execute(schema::DELETE_EXERCISES_BY_WORKOUT, [id])
                    .map_err(wrap_err)?;
                insert_exercises(&tx, id, &workout.exercises).map_err(wrap_err)?;

                let stored = load_workout(&tx, id).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Workout::ENTITY_TYPE))?
            .ok_or_else(|| RepositoryError::not_found(Workout::ENTITY_TYPE, id))
    }

    async fn delete(&self, id: &i64) -> Result<()> {
        let id = *id;

        let deleted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                if load_workout(&tx, id).map_err(wrap_err)?.is_none() {
                    return Ok(false);
                }

                tx.execute(schema::DELETE_EXERCISES_BY_WORKOUT, [id])
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_WORKOUT, [id]).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(true)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Workout::ENTITY_TYPE))?;

        if deleted {
            Ok(())
        } else {
            Err(RepositoryError::not_found(Workout::ENTITY_TYPE, id))
        }
    }

    async fn get_all(&self) -> Result<Vec<Workout>> {
        self.conn
            .call(|conn| {
                let mut workouts = {
                    let mut stmt = conn.prepare(schema::SELECT_ALL_WORKOUTS).map_err(wrap_err)?;
                    let rows = stmt.query_map([], row_to_workout).map_err(wrap_err)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)?
                };

                // One query for every exercise, grouped by owner
                let mut exercises: HashMap<i64, Vec<Exercise>> = HashMap::new();
                let mut stmt = conn.prepare(schema::SELECT_ALL_EXERCISES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_exercise).map_err(wrap_err)?;
                for row in rows {
                    let (workout_id, exercise) = row.map_err(wrap_err)?;
                    exercises.entry(workout_id).or_default().push(exercise);
                }

                for workout in &mut workouts {
                    workout.exercises = exercises.remove(&workout.id).unwrap_or_default();
                }
                Ok(workouts)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Workout::ENTITY_TYPE))
    }
}

// ============================================================================
// Comments
// ============================================================================

#[async_trait]
impl ResourceStore<Comment> for SqliteRepository {
    async fn get(&self, id: &i64) -> Result<Comment> {
        let id = *id;

        self.conn
            .call(move |conn| load_comment(conn, id).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::ENTITY_TYPE))?
            .ok_or_else(|| RepositoryError::not_found(Comment::ENTITY_TYPE, id))
    }

    async fn add(&self, comment: Comment) -> Result<Comment> {
        let now = format_datetime(&Utc::now());

        let stored = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMMENT,
                    params![now, now, comment.slug, comment.body, comment.author],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();

                load_comment(conn, id)
                    .map_err(wrap_err)?
                    .ok_or_else(|| vanished(Comment::ENTITY_TYPE, id))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::ENTITY_TYPE))?;

        tracing::debug!(id = stored.id, slug = %stored.slug, "Inserted comment");
        Ok(stored)
    }

    async fn update(&self, id: &i64, comment: Comment) -> Result<Comment> {
        let id = *id;
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                if load_comment(conn, id).map_err(wrap_err)?.is_none() {
                    return Ok(None);
                }

                conn.execute(
                    schema::UPDATE_COMMENT,
                    params![id, now, comment.slug, comment.body, comment.author],
                )
                .map_err(wrap_err)?;
                load_comment(conn, id).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::ENTITY_TYPE))?
            .ok_or_else(|| RepositoryError::not_found(Comment::ENTITY_TYPE, id))
    }

    async fn delete(&self, id: &i64) -> Result<()> {
        let id = *id;

        let deleted = self
            .conn
            .call(move |conn| {
                if load_comment(conn, id).map_err(wrap_err)?.is_none() {
                    return Ok(false);
                }

                conn.execute(schema::DELETE_COMMENT, [id]).map_err(wrap_err)?;
                Ok(true)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::ENTITY_TYPE))?;

        if deleted {
            Ok(())
        } else {
            Err(RepositoryError::not_found(Comment::ENTITY_TYPE, id))
        }
    }

    async fn get_all(&self) -> Result<Vec<Comment>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_COMMENTS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_comment).map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::ENTITY_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn leg_day() -> Workout {
        Workout::new("2024-03-01")
            .with_kind("legs")
            .with_duration("1h")
            .with_exercise(Exercise::new("squat", 135.0, 2, 10).warmup())
            .with_exercise(Exercise::new("squat", 225.0, 5, 5))
            .with_exercise(Exercise::new("lunge", 50.0, 3, 12))
    }

    /// Compares client-supplied fields, ignoring ids and timestamps.
    fn same_content(a: &Workout, b: &Workout) -> bool {
        let strip = |workout: &Workout| {
            let mut workout = workout.clone();
            workout.id = 0;
            workout.created_at = None;
            workout.updated_at = None;
            workout.exercises.iter_mut().for_each(|e| e.id = 0);
            workout
        };

        strip(a) == strip(b)
    }

    #[tokio::test]
    async fn test_add_assigns_identity_and_timestamps() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;

        let first = workouts.add(leg_day()).await.unwrap();
        let second = workouts.add(leg_day()).await.unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert!(first.created_at.is_some());
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.exercises.iter().all(|e| e.id > 0));
    }

    #[tokio::test]
    async fn test_add_then_get_preserves_exercise_order() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;

        let stored = workouts.add(leg_day()).await.unwrap();
        let fetched = workouts.get(&stored.id).await.unwrap();

        assert_eq!(fetched, stored);
        assert!(same_content(&fetched, &leg_day()));
        let names: Vec<&str> = fetched.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["squat", "squat", "lunge"]);
        assert!(fetched.exercises[0].warmup);

        // Repeated reads are stable
        assert_eq!(workouts.get(&stored.id).await.unwrap(), fetched);
    }

    #[tokio::test]
    async fn test_update_replaces_scalars_and_exercises() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;
        let stored = workouts.add(leg_day()).await.unwrap();

        let replacement = Workout::new("2024-03-02")
            .with_kind("push")
            .with_duration("45m")
            .with_exercise(Exercise::new("bench", 185.0, 5, 5));
        let updated = workouts.update(&stored.id, replacement.clone()).await.unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert!(same_content(&updated, &replacement));
        assert_eq!(workouts.get(&stored.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_missing_workout_is_not_found_everywhere() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;
        let stored = workouts.add(leg_day()).await.unwrap();

        let missing = stored.id + 100;
        assert!(matches!(
            workouts.get(&missing).await,
            Err(RepositoryError::NotFound { entity_type: "Workout", .. })
        ));
        assert!(matches!(
            workouts.update(&missing, Workout::new("x")).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            workouts.delete(&missing).await,
            Err(RepositoryError::NotFound { .. })
        ));

        // Nothing else changed
        assert_eq!(workouts.get_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_delete_removes_workout_and_exercises() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;
        let stored = workouts.add(leg_day()).await.unwrap();

        workouts.delete(&stored.id).await.unwrap();

        assert!(matches!(
            workouts.get(&stored.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        let orphans: i64 = repo
            .conn
            .call(|conn| {
                conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_get_all_eager_loads_each_workout() {
        let repo = setup().await;
        let workouts: &dyn ResourceStore<Workout> = &repo;
        let legs = workouts.add(leg_day()).await.unwrap();
        let rest = workouts.add(Workout::new("2024-03-03").with_kind("rest")).await.unwrap();

        let all = workouts.get_all().await.unwrap();

        assert_eq!(all, vec![legs, rest]);
        assert_eq!(all[0].exercises.len(), 3);
        assert!(all[1].exercises.is_empty());
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let repo = setup().await;
        let comments: &dyn ResourceStore<Comment> = &repo;

        let stored = comments
            .add(Comment::new("/blog/first", "ethan", "nice post"))
            .await
            .unwrap();
        assert_eq!(comments.get(&stored.id).await.unwrap(), stored);

        let updated = comments
            .update(&stored.id, Comment::new("/blog/first", "ethan", "edited"))
            .await
            .unwrap();
        assert_eq!(updated.body, "edited");
        assert_eq!(updated.created_at, stored.created_at);

        comments.delete(&stored.id).await.unwrap();
        assert!(comments.get_all().await.unwrap().is_empty());
        assert!(matches!(
            comments.delete(&stored.id).await,
            Err(RepositoryError::NotFound { entity_type: "Comment", .. })
        ));
    }

    #[tokio::test]
    async fn test_file_database_persists_across_opens() {
        let path = std::env::temp_dir().join(format!("liftlog-test-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let stored = {
            let repo = SqliteRepository::new(&path_str).await.unwrap();
            let comments: &dyn ResourceStore<Comment> = &repo;
            comments.add(Comment::new("/a", "b", "c")).await.unwrap()
        };

        let repo = SqliteRepository::new(&path_str).await.unwrap();
        let comments: &dyn ResourceStore<Comment> = &repo;
        assert_eq!(comments.get(&stored.id).await.unwrap(), stored);

        drop(repo);
        let _ = std::fs::remove_file(&path);
    }
}
