//! Generic CRUD handlers shared by every record type and key shape.

use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use liftlog_core::envelope::ApiMessage;
use liftlog_core::storage::Record;
use liftlog_core::workout::{Comment, CommentEntity, Workout, WorkoutEntity};

use crate::{handlers::AppError, state::Store};

/// A record served over HTTP.
pub trait ApiResource: Record {
    /// Human name used in response messages.
    const LABEL: &'static str;
}

impl ApiResource for Workout {
    const LABEL: &'static str = "Workout";
}

impl ApiResource for Comment {
    const LABEL: &'static str = "Comment";
}

impl ApiResource for WorkoutEntity {
    const LABEL: &'static str = "Workout";
}

impl ApiResource for CommentEntity {
    const LABEL: &'static str = "Comment";
}

fn label<R: ApiResource>() -> String {
    R::LABEL.to_lowercase()
}

/// GET /api/{resource} - List every record.
pub async fn list_records<R: ApiResource>(
    State(store): State<Store<R>>,
) -> Result<Json<Vec<R>>, AppError> {
    let records = store
        .get_all()
        .await
        .with_context(|| format!("Error retrieving {}s", label::<R>()))?;

    tracing::debug!(entity = R::ENTITY_TYPE, count = records.len(), "Listed records");
    Ok(Json(records))
}

/// GET /api/{resource}/{key} - Get one record.
pub async fn get_record<R: ApiResource>(
    State(store): State<Store<R>>,
    key: Result<Path<R::Key>, PathRejection>,
) -> Result<Json<R>, AppError> {
    let Path(key) = key.context("Invalid key in path")?;

    let record = store
        .get(&key)
        .await
        .with_context(|| format!("Error retrieving {} by key", label::<R>()))?;

    Ok(Json(record))
}

/// POST /api/{resource} - Create a record.
pub async fn create_record<R: ApiResource>(
    State(store): State<Store<R>>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(record) = payload.context("Invalid request body")?;

    let created = store
        .add(record)
        .await
        .with_context(|| format!("Error creating {}", label::<R>()))?;

    tracing::info!(entity = R::ENTITY_TYPE, "Created record");
    Ok(Json(created))
}

/// PUT /api/{resource}/{key} - Replace a record.
pub async fn update_record<R: ApiResource>(
    State(store): State<Store<R>>,
    key: Result<Path<R::Key>, PathRejection>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Path(key) = key.context("Invalid key in path")?;
    let Json(record) = payload.context("Invalid request body")?;

    let updated = store
        .update(&key, record)
        .await
        .with_context(|| format!("Error updating {}", label::<R>()))?;

    tracing::info!(entity = R::ENTITY_TYPE, key = %key, "Updated record");
    Ok(Json(updated))
}

/// DELETE /api/{resource}/{key} - Delete a record.
pub async fn delete_record<R: ApiResource>(
    State(store): State<Store<R>>,
    key: Result<Path<R::Key>, PathRejection>,
) -> Result<Json<ApiMessage>, AppError> {
    let Path(key) = key.context("Invalid key in path")?;

    store
        .delete(&key)
        .await
        .with_context(|| format!("Error deleting {}", label::<R>()))?;

    tracing::info!(entity = R::ENTITY_TYPE, key = %key, "Deleted record");
    Ok(Json(ApiMessage::ok(format!("Poof! {} deleted.", R::LABEL))))
}
