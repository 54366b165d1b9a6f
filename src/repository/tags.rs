//! Tags repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::tag::{CreateTag, Tag, UpdateTag},
};

#[derive(Clone)]
pub struct TagsRepository {
    pool: Pool<Postgres>,
}

impl TagsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Tag>> {
        let row = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, data: &CreateTag) -> AppResult<Tag> {
        let row = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING *")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateTag) -> AppResult<Option<Tag>> {
        let row = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET
                name = COALESCE($1, name),
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(data.name.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i32) -> AppResult<Option<Tag>> {
        let row = sqlx::query_as::<_, Tag>("DELETE FROM tags WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
