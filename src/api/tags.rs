//! Tag endpoints (mounted under `/book-tags`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::tag::{CreateTag, Tag, UpdateTag},
};

use super::ValidatedJson;

/// Create a tag
#[utoipa::path(
    post,
    path = "/book-tags",
    tag = "tags",
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.services.tags.create(&data).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// List all tags
#[utoipa::path(
    get,
    path = "/book-tags",
    tag = "tags",
    responses(
        (status = 200, description = "Tag list", body = Vec<Tag>)
    )
)]
pub async fn list_tags(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = state.services.tags.find_all().await?;
    Ok(Json(tags))
}

/// Get tag by ID
#[utoipa::path(
    get,
    path = "/book-tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag details", body = Tag),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn get_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Tag>> {
    let tag = state
        .services
        .tags
        .find_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))?;
    Ok(Json(tag))
}

/// Rename a tag
#[utoipa::path(
    patch,
    path = "/book-tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = UpdateTag,
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn update_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateTag>,
) -> AppResult<Json<Tag>> {
    let tag = state.services.tags.update(id, &data).await?;
    Ok(Json(tag))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/book-tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Deleted tag", body = Tag),
        (status = 404, description = "Tag not found"),
        (status = 409, description = "Tag still attached to books")
    )
)]
pub async fn delete_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Tag>> {
    let tag = state.services.tags.remove(id).await?;
    Ok(Json(tag))
}
