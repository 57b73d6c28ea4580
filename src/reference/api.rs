//! JSON route handlers for reference data.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Database, Error,
    database_id::DatabaseId,
    endpoints::format_endpoint,
    reference::{ReferenceEntity, service},
};

/// List every `R`.
pub async fn list_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
) -> Result<Json<Vec<R>>, Error> {
    database
        .run(service::list::<R>)
        .inspect_err(|error| tracing::error!("Could not list {}: {error}", R::TITLE))
        .map(Json)
}

/// Get a single `R`.
pub async fn get_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
) -> Result<Json<R>, Error> {
    database
        .run(|connection| service::get::<R>(id, connection))
        .map(Json)
}

/// Create an `R`, responding with 201 Created and the new entity.
pub async fn create_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Json(input): Json<R>,
) -> Result<Response, Error> {
    let created: R =
        database.run_in_transaction(|connection| service::create(input.label(), connection))?;
    let location = created
        .id()
        .map(|id| format_endpoint(R::API_ITEM_ENDPOINT, id))
        .unwrap_or_else(|| R::API_ENDPOINT.to_owned());

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)).into_response())
}

/// Replace the text of an `R`, responding with 204 No Content.
///
/// The ID in the body must match the ID in the path.
pub async fn update_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
    Json(input): Json<R>,
) -> Result<StatusCode, Error> {
    if input.id() != Some(id) {
        return Err(Error::IdMismatch);
    }

    database.run_in_transaction(|connection| {
        service::update::<R>(id, input.label(), connection).map(|_| ())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an `R`, responding with 204 No Content.
pub async fn delete_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
) -> Result<StatusCode, Error> {
    database.run_in_transaction(|connection| service::delete::<R>(id, connection))?;

    Ok(StatusCode::NO_CONTENT)
}
