//! Book service: tag associations and filtering

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDeleted, BookDetails, BookFilter, CreateBook, UpdateBook},
    repository::Repository,
};

/// Deduplicate a tag-id list so each association is inserted once
fn distinct_tag_ids(tags: Option<&[i32]>) -> Vec<i32> {
    let mut ids = tags.unwrap_or_default().to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book and its tag associations.
    ///
    /// The returned book is not expanded with author or tags.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let tag_ids = distinct_tag_ids(data.tags.as_deref());

        let mut tx = self.repository.begin().await?;
        let book = self.repository.books.insert(&mut *tx, data).await?;
        self.repository
            .books
            .insert_tags(&mut *tx, book.id, &tag_ids)
            .await?;
        tx.commit().await?;

        tracing::info!("Created book id={} with {} tag(s)", book.id, tag_ids.len());
        Ok(book)
    }

    pub async fn find_all(&self) -> AppResult<Vec<BookDetails>> {
        self.repository.books.list(&BookFilter::default()).await
    }

    /// `None` when no book has this id
    pub async fn find_one(&self, id: i32) -> AppResult<Option<BookDetails>> {
        self.repository.books.get_by_id(id).await
    }

    /// Filter by author name, title (both case-insensitive substrings) and exact year
    pub async fn filter(&self, filter: BookFilter) -> AppResult<Vec<BookDetails>> {
        let filter = filter.normalized();
        tracing::debug!(?filter, "Filtering books");
        self.repository.books.list(&filter).await
    }

    /// Replace the book's tag associations and update its scalar fields in one transaction.
    ///
    /// An omitted tag list clears every association.
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let tag_ids = distinct_tag_ids(data.tags.as_deref());

        let mut tx = self.repository.begin().await?;

        if !self.repository.books.lock(&mut *tx, id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        let removed = self.repository.books.clear_tags(&mut *tx, id).await?;
        self.repository
            .books
            .insert_tags(&mut *tx, id, &tag_ids)
            .await?;

        let book = self
            .repository
            .books
            .update_fields(&mut *tx, id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        tx.commit().await?;

        tracing::info!(
            "Updated book id={} (tags: {} removed, {} inserted)",
            id,
            removed,
            tag_ids.len()
        );
        Ok(book)
    }

    /// Delete a book together with its tag associations
    pub async fn remove(&self, id: i32) -> AppResult<BookDeleted> {
        let mut tx = self.repository.begin().await?;

        self.repository.books.clear_tags(&mut *tx, id).await?;
        if !self.repository.books.delete(&mut *tx, id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;

        tracing::info!("Deleted book id={}", id);
        Ok(BookDeleted::default())
    }
}
