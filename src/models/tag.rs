//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Tag record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag id and name, as embedded in book responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagSummary {
    pub id: i32,
    pub name: String,
}

/// Create tag request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTag {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Fiction")]
    pub name: String,
}

/// Update tag request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTag {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
