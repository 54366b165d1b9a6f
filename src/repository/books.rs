//! Books repository.
//!
//! Reads go through the pool. Writes take a connection so the service can run
//! the book row and its `book_tags` rows inside one transaction.

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, Pool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::{
        author::AuthorSummary,
        book::{Book, BookDetails, BookFilter, BookTagLink, CreateBook, UpdateBook},
        tag::TagSummary,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.isbn, b.published_year, b.summary, b.author_id,
           b.created_at, b.updated_at, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
    WHERE 1=1"#;

/// Newest first, then alphabetical; books without a year sort ahead of dated ones
const DETAILS_ORDER: &str = " ORDER BY b.published_year DESC NULLS FIRST, b.title ASC, b.id ASC";

#[derive(FromRow)]
struct BookRow {
    #[sqlx(flatten)]
    book: Book,
    author_name: String,
}

#[derive(FromRow)]
struct TagLinkRow {
    book_id: i32,
    tag_id: i32,
    tag_name: String,
}

/// Escape LIKE wildcards so user text is matched literally
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like(s))
}

/// Build the listing query; criteria left as `None` add no condition
fn filter_query(filter: &BookFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(DETAILS_SELECT);

    if let Some(ref author_name) = filter.author_name {
        qb.push(" AND a.name ILIKE ")
            .push_bind(contains_pattern(author_name))
            .push(r" ESCAPE '\'");
    }

    if let Some(ref title) = filter.title {
        qb.push(" AND b.title ILIKE ")
            .push_bind(contains_pattern(title))
            .push(r" ESCAPE '\'");
    }

    if let Some(year) = filter.published_year {
        qb.push(" AND b.published_year = ").push_bind(year);
    }

    qb.push(DETAILS_ORDER);
    qb
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books matching `filter`, expanded with author and tags.
    ///
    /// Criteria left as `None` are not applied; an empty filter lists every book.
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookDetails>> {
        let mut qb = filter_query(filter);
        let rows = qb.build_query_as::<BookRow>().fetch_all(&self.pool).await?;
        self.expand(rows).await
    }

    /// Get one book expanded with author and tags
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<BookDetails>> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        qb.push(" AND b.id = ").push_bind(id);

        let row = qb.build_query_as::<BookRow>().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(self.expand(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Attach author summaries and tag links to book rows
    async fn expand(&self, rows: Vec<BookRow>) -> AppResult<Vec<BookDetails>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.book.id).collect();
        let mut links = self.get_tag_links(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let author = AuthorSummary {
                    id: row.book.author_id,
                    name: row.author_name,
                };
                let book_tags = links.remove(&row.book.id).unwrap_or_default();
                BookDetails::new(row.book, author, book_tags)
            })
            .collect())
    }

    /// Load the join rows (with tag names) for a set of books
    async fn get_tag_links(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<BookTagLink>>> {
        let rows = sqlx::query_as::<_, TagLinkRow>(
            r#"
            SELECT bt.book_id, bt.tag_id, t.name AS tag_name
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ANY($1)
            ORDER BY bt.book_id, t.name, t.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut links: HashMap<i32, Vec<BookTagLink>> = HashMap::new();
        for row in rows {
            links.entry(row.book_id).or_default().push(BookTagLink {
                book_id: row.book_id,
                tag_id: row.tag_id,
                tag: TagSummary {
                    id: row.tag_id,
                    name: row.tag_name,
                },
            });
        }
        Ok(links)
    }

    // =========================================================================
    // WRITE (transactional)
    // =========================================================================

    /// Insert the book row
    pub async fn insert(&self, conn: &mut PgConnection, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, isbn, published_year, summary, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.published_year)
        .bind(&data.summary)
        .bind(data.author_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(book)
    }

    /// Lock the book row until the transaction ends; false when it does not exist.
    ///
    /// Concurrent updates of the same book wait here instead of racing on `book_tags`.
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let row: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.is_some())
    }

    /// Delete every join row of a book
    pub async fn clear_tags(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM book_tags WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert one join row per tag id
    pub async fn insert_tags(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
        tag_ids: &[i32],
    ) -> AppResult<u64> {
        if tag_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO book_tags (book_id, tag_id)
            SELECT $1, UNNEST($2::int4[])
            "#,
        )
        .bind(book_id)
        .bind(tag_ids)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Update the supplied scalar fields; `None` when the book does not exist.
    ///
    /// A nullable field sent as `null` is cleared, an omitted one is kept.
    pub async fn update_fields(
        &self,
        conn: &mut PgConnection,
        id: i32,
        data: &UpdateBook,
    ) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($1, title),
                isbn = COALESCE($2, isbn),
                published_year = CASE WHEN $3 THEN $4 ELSE published_year END,
                summary = CASE WHEN $5 THEN $6 ELSE summary END,
                author_id = COALESCE($7, author_id),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref())
        .bind(data.isbn.as_deref())
        .bind(data.published_year.is_some())
        .bind(data.published_year.flatten())
        .bind(data.summary.is_some())
        .bind(data.summary.as_ref().and_then(|s| s.as_deref()))
        .bind(data.author_id)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(book)
    }

    /// Delete the book row; false when nothing matched
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
