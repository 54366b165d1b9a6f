//! Tag service

use crate::{
    error::{AppError, AppResult},
    models::tag::{CreateTag, Tag, UpdateTag},
    repository::Repository,
};

#[derive(Clone)]
pub struct TagsService {
    repository: Repository,
}

impl TagsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, data: &CreateTag) -> AppResult<Tag> {
        self.repository.tags.create(data).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Tag>> {
        self.repository.tags.list().await
    }

    pub async fn find_one(&self, id: i32) -> AppResult<Option<Tag>> {
        self.repository.tags.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateTag) -> AppResult<Tag> {
        self.repository
            .tags
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))
    }

    /// Delete a tag; rejected by the store while books are still tagged with it
    pub async fn remove(&self, id: i32) -> AppResult<Tag> {
        self.repository
            .tags
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))
    }
}
