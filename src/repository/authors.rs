//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all authors
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Create author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, bio)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the supplied fields; `None` when the author does not exist
    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                name = COALESCE($1, name),
                bio = CASE WHEN $2 THEN $3 ELSE bio END,
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.name.as_deref())
        .bind(data.bio.is_some())
        .bind(data.bio.as_ref().and_then(|bio| bio.as_deref()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete author, returning the deleted row
    pub async fn delete(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("DELETE FROM authors WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
