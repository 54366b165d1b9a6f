//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDeleted, BookDetails, BookFilter, CreateBook, UpdateBook},
};

use super::{ValidatedJson, ValidatedQuery};

/// Create a book, optionally tagged
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Unknown author or tag")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List all books with author and tags
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.find_all().await?;
    Ok(Json(books))
}

/// Filter books by author, title, or published year
#[utoipa::path(
    get,
    path = "/books/filter",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "Books matching the filter criteria", body = Vec<BookDetails>),
        (status = 400, description = "Invalid published year")
    )
)]
pub async fn filter_books(
    State(state): State<crate::AppState>,
    ValidatedQuery(filter): ValidatedQuery<BookFilter>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.filter(filter).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state
        .services
        .books
        .find_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
    Ok(Json(book))
}

/// Update a book; the tag list replaces all existing associations
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Unknown author or tag")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book and its tag associations
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = BookDeleted),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDeleted>> {
    let deleted = state.services.books.remove(id).await?;
    Ok(Json(deleted))
}
