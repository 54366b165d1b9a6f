//! HTTP client for the catalog API.
//!
//! Every book coming back from a read endpoint is passed through
//! [`transform_book_tags`] so callers get a flat `tags` list. Book writes are
//! followed by a fetch of the same book, because write endpoints answer with
//! the bare row.

pub mod book;
pub mod error;

use std::env;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub use book::{transform_book_tags, ClientBook, WireBook};
pub use error::{ClientError, ClientResult};

use crate::{
    error::ErrorResponse,
    models::{Author, BookFilter, CreateAuthor, CreateBook, CreateTag, Tag, UpdateAuthor, UpdateBook, UpdateTag},
};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "CATALOG_API_URL";
/// Base URL used when [`API_URL_ENV`] is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Query parameters for a filter call; empty criteria are not sent
pub fn filter_params(filter: &BookFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(author_name) = filter.author_name.as_deref().filter(|v| !v.is_empty()) {
        params.push(("authorName", author_name.to_string()));
    }
    if let Some(title) = filter.title.as_deref().filter(|v| !v.is_empty()) {
        params.push(("title", title.to_string()));
    }
    if let Some(year) = filter.published_year {
        params.push(("publishedYear", year.to_string()));
    }
    params
}

/// Catalog API client; cheap to clone, one per process is enough
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build a client from `CATALOG_API_URL`, falling back to the local default
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn request<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn request_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn get_books(&self) -> ClientResult<Vec<ClientBook>> {
        let books: Vec<WireBook> = self.request(self.http.get(self.url("/books"))).await?;
        Ok(books.into_iter().map(transform_book_tags).collect())
    }

    pub async fn get_book(&self, id: i32) -> ClientResult<ClientBook> {
        let book: WireBook = self
            .request(self.http.get(self.url(&format!("/books/{}", id))))
            .await?;
        Ok(transform_book_tags(book))
    }

    /// Create a book, then fetch it back with author and tags expanded
    pub async fn create_book(&self, book: &CreateBook) -> ClientResult<ClientBook> {
        let created: WireBook = self
            .request(self.http.post(self.url("/books")).json(book))
            .await?;
        tracing::debug!("Created book id={}, fetching expanded shape", created.id);
        self.get_book(created.id).await
    }

    /// Update a book, then fetch it back with author and tags expanded
    pub async fn update_book(&self, id: i32, book: &UpdateBook) -> ClientResult<ClientBook> {
        let _: WireBook = self
            .request(self.http.patch(self.url(&format!("/books/{}", id))).json(book))
            .await?;
        self.get_book(id).await
    }

    pub async fn delete_book(&self, id: i32) -> ClientResult<()> {
        self.request_empty(self.http.delete(self.url(&format!("/books/{}", id))))
            .await
    }

    pub async fn filter_books(&self, filter: &BookFilter) -> ClientResult<Vec<ClientBook>> {
        let books: Vec<WireBook> = self
            .request(
                self.http
                    .get(self.url("/books/filter"))
                    .query(&filter_params(filter)),
            )
            .await?;
        Ok(books.into_iter().map(transform_book_tags).collect())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn get_authors(&self) -> ClientResult<Vec<Author>> {
        self.request(self.http.get(self.url("/authors"))).await
    }

    pub async fn get_author(&self, id: i32) -> ClientResult<Author> {
        self.request(self.http.get(self.url(&format!("/authors/{}", id))))
            .await
    }

    pub async fn create_author(&self, author: &CreateAuthor) -> ClientResult<Author> {
        self.request(self.http.post(self.url("/authors")).json(author))
            .await
    }

    pub async fn update_author(&self, id: i32, author: &UpdateAuthor) -> ClientResult<Author> {
        self.request(
            self.http
                .patch(self.url(&format!("/authors/{}", id)))
                .json(author),
        )
        .await
    }

    pub async fn delete_author(&self, id: i32) -> ClientResult<()> {
        self.request_empty(self.http.delete(self.url(&format!("/authors/{}", id))))
            .await
    }

    // =========================================================================
    // TAGS
    // =========================================================================

    pub async fn get_tags(&self) -> ClientResult<Vec<Tag>> {
        self.request(self.http.get(self.url("/book-tags"))).await
    }

    pub async fn get_tag(&self, id: i32) -> ClientResult<Tag> {
        self.request(self.http.get(self.url(&format!("/book-tags/{}", id))))
            .await
    }

    pub async fn create_tag(&self, tag: &CreateTag) -> ClientResult<Tag> {
        self.request(self.http.post(self.url("/book-tags")).json(tag))
            .await
    }

    pub async fn update_tag(&self, id: i32, tag: &UpdateTag) -> ClientResult<Tag> {
        self.request(
            self.http
                .patch(self.url(&format!("/book-tags/{}", id)))
                .json(tag),
        )
        .await
    }

    pub async fn delete_tag(&self, id: i32) -> ClientResult<()> {
        self.request_empty(self.http.delete(self.url(&format!("/book-tags/{}", id))))
            .await
    }
}

/// Turn a non-success response into `ClientError::Api`, using the server's message when present
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("Unexpected response")
        .to_string();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => fallback,
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params_skip_empty_criteria() {
        assert!(filter_params(&BookFilter::default()).is_empty());

        let filter = BookFilter {
            author_name: Some(String::new()),
            title: Some("great".into()),
            published_year: Some(2020),
        };
        assert_eq!(
            filter_params(&filter),
            vec![("title", "great".to_string()), ("publishedYear", "2020".to_string())]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("http://catalog.local:9000/");
        assert_eq!(client.base_url(), "http://catalog.local:9000");
        assert_eq!(client.url("/books"), "http://catalog.local:9000/books");
    }
}
