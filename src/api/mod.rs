//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod tags;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{error::AppError, AppState};

/// JSON body extractor that runs `validator` rules before the handler is called
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor with the same validation behaviour
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", post(books::create_book))
        .route("/books", get(books::list_books))
        .route("/books/filter", get(books::filter_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", patch(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        // Authors
        .route("/authors", post(authors::create_author))
        .route("/authors", get(authors::list_authors))
        .route("/authors/:id", get(authors::get_author))
        .route("/authors/:id", patch(authors::update_author))
        .route("/authors/:id", delete(authors::delete_author))
        // Tags
        .route("/book-tags", post(tags::create_tag))
        .route("/book-tags", get(tags::list_tags))
        .route("/book-tags/:id", get(tags::get_tag))
        .route("/book-tags/:id", patch(tags::update_tag))
        .route("/book-tags/:id", delete(tags::delete_tag))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
