//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, tags};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Library catalog REST API: authors, books and tags",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::create_book,
        books::list_books,
        books::filter_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Tags
        tags::create_tag,
        tags::list_tags,
        tags::get_tag,
        tags::update_tag,
        tags::delete_tag,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookTagLink,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookDeleted,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorSummary,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Tags
            crate::models::tag::Tag,
            crate::models::tag::TagSummary,
            crate::models::tag::CreateTag,
            crate::models::tag::UpdateTag,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Books and their tag associations"),
        (name = "authors", description = "Author management"),
        (name = "tags", description = "Tag management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
