//! Wire and display shapes of a book on the client side

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AuthorSummary, BookTagLink, TagSummary};

/// A book as any books endpoint returns it.
///
/// Write endpoints leave `author` and `BookTag` unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBook {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    pub author_id: i32,
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    #[serde(rename = "BookTag", default)]
    pub book_tags: Option<Vec<BookTagLink>>,
    #[serde(default)]
    pub tags: Option<Vec<TagSummary>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book ready for display: tags flattened, join wrappers kept
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBook {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub summary: Option<String>,
    pub author_id: i32,
    pub author: Option<AuthorSummary>,
    #[serde(rename = "BookTag")]
    pub book_tags: Option<Vec<BookTagLink>>,
    pub tags: Vec<TagSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flatten the join wrappers into a plain tag list.
///
/// Falls back to an existing `tags` list, then to no tags.
pub fn transform_book_tags(book: WireBook) -> ClientBook {
    let tags = match (&book.book_tags, book.tags) {
        (Some(links), _) => links.iter().map(|link| link.tag.clone()).collect(),
        (None, Some(tags)) => tags,
        (None, None) => Vec::new(),
    };

    ClientBook {
        id: book.id,
        title: book.title,
        isbn: book.isbn,
        published_year: book.published_year,
        summary: book.summary,
        author_id: book.author_id,
        author: book.author,
        book_tags: book.book_tags,
        tags,
        created_at: book.created_at,
        updated_at: book.updated_at,
    }
}
