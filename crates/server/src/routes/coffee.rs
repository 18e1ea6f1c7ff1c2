//! CoffeeResource handlers under `/coffeeJourney/`.
//!
//! Each handler validates its input completely before touching the store, then
//! performs its writes in a fixed order: record, image, `imageUrl`.

use crate::error::{ServerError, ServerResult};
use crate::routes::form::{CoffeeForm, Trim, Upload};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coffee_journey::{parse_id, CoffeeRecord, ObjectId};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

const OCTET_STREAM: &str = "application/octet-stream";

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Create a coffee from form fields and an optional image.
///
/// `name`, `company` and `tags` are trimmed; `price` is optional. When an
/// image is attached it is stored under the new id and `imageUrl` is set.
/// If storing the image fails the new record is removed again.
///
/// # Response
///
/// ```json
/// { "result": "ok", "id": "64b7f0c2a1b2c3d4e5f6a7b8" }
/// ```
pub async fn create_coffee(
    State(state): State<Arc<ServerState>>,
    form: CoffeeForm,
) -> ServerResult<Json<Value>> {
    let fields = form.coffee_fields(Trim::Trimmed)?;

    let start = Instant::now();
    let id = state.store.insert(&fields).await?;
    tracing::info!(coffee_id = %id, insert_ms = elapsed_ms(start), "coffee inserted");

    if let Some(image) = form.image {
        if let Err(err) = attach_image(&state, &id, image).await {
            discard_coffee(&state, &id).await;
            return Err(err);
        }
    }

    Ok(Json(json!({ "result": "ok", "id": id.to_hex() })))
}

/// List every coffee as a bare JSON array.
pub async fn list_coffees(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<CoffeeRecord>>> {
    let start = Instant::now();
    let coffees = state.store.find_all().await?;
    tracing::debug!(count = coffees.len(), find_ms = elapsed_ms(start), "coffees listed");
    Ok(Json(coffees))
}

/// Fetch one coffee.
///
/// # Response
///
/// ```json
/// { "result": "ok", "coffee": { "id": "...", "name": "...", "price": "12.34" } }
/// ```
pub async fn get_coffee(
    State(state): State<Arc<ServerState>>,
    Path(coffee_id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&coffee_id)?;
    let coffee = state.store.find(&id).await?.ok_or(ServerError::NotFound)?;
    Ok(Json(json!({ "result": "ok", "coffee": coffee })))
}

/// Overwrite `name`, `company`, `tags` and, when supplied, `price`.
///
/// Text fields are stored exactly as sent. Leaving `price` out (or empty)
/// keeps the stored price. An attached image replaces the stored one and
/// refreshes `imageUrl`.
pub async fn update_coffee(
    State(state): State<Arc<ServerState>>,
    Path(coffee_id): Path<String>,
    form: CoffeeForm,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&coffee_id)?;
    let fields = form.coffee_fields(Trim::Untouched)?;

    let start = Instant::now();
    if !state.store.update(&id, &fields).await? {
        return Err(ServerError::NotFound);
    }
    tracing::info!(coffee_id = %id, update_ms = elapsed_ms(start), "coffee updated");

    if let Some(image) = form.image {
        attach_image(&state, &id, image).await?;
    }

    Ok(Json(json!({ "result": "ok" })))
}

/// Delete a coffee and, best-effort, its image.
pub async fn delete_coffee(
    State(state): State<Arc<ServerState>>,
    Path(coffee_id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&coffee_id)?;
    if !state.store.delete(&id).await? {
        return Err(ServerError::NotFound);
    }

    if let Err(err) = state.blobs.delete(&id.to_hex()).await {
        tracing::warn!(coffee_id = %id, error = %err, "image left behind after delete");
    }

    tracing::info!(coffee_id = %id, "coffee deleted");
    Ok(Json(json!({ "result": "deleted" })))
}

/// Serve the stored image for a coffee.
///
/// The content type is sniffed from the stored bytes since uploads are kept
/// under the bare id with no extension.
pub async fn get_image(
    State(state): State<Arc<ServerState>>,
    Path(coffee_id): Path<String>,
) -> ServerResult<Response> {
    let id = parse_id(&coffee_id)?;
    let data = state
        .blobs
        .get(&id.to_hex())
        .await?
        .ok_or(ServerError::ImageNotFound)?;

    let content_type = image::guess_format(&data)
        .map(|format| format.to_mime_type())
        .unwrap_or(OCTET_STREAM);

    Ok(([(CONTENT_TYPE, content_type)], data).into_response())
}

/// Store `image` under `id` and point the record's `imageUrl` at it.
async fn attach_image(state: &ServerState, id: &ObjectId, image: Upload) -> ServerResult<()> {
    let size = image.data.len();

    let start = Instant::now();
    state.blobs.put(&id.to_hex(), image.data).await?;
    tracing::info!(
        coffee_id = %id,
        file_name = %image.file_name,
        content_type = image.content_type.as_deref().unwrap_or(OCTET_STREAM),
        size,
        image_save_ms = elapsed_ms(start),
        "image saved"
    );

    let start = Instant::now();
    let url = state.image_url(id);
    if !state.store.set_image_url(id, &url).await? {
        return Err(ServerError::NotFound);
    }
    tracing::debug!(coffee_id = %id, update_ms = elapsed_ms(start), "image url recorded");

    Ok(())
}

/// Undo a create whose image could not be attached.
async fn discard_coffee(state: &ServerState, id: &ObjectId) {
    if let Err(err) = state.blobs.delete(&id.to_hex()).await {
        tracing::warn!(coffee_id = %id, error = %err, "failed to remove partial image");
    }
    match state.store.delete(id).await {
        Ok(_) => tracing::warn!(coffee_id = %id, "coffee removed after failed image upload"),
        Err(err) => tracing::error!(coffee_id = %id, error = %err, "orphaned coffee left behind"),
    }
}
