//! Author service

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(data).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn find_one(&self, id: i32) -> AppResult<Option<Author>> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        self.repository
            .authors
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Delete an author; rejected by the store while books still reference it
    pub async fn remove(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }
}
