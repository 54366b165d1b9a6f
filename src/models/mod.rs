//! Data models for the catalog

pub mod author;
pub mod book;
pub mod tag;

// Re-export commonly used types
pub use author::{Author, AuthorSummary, CreateAuthor, UpdateAuthor};
pub use book::{Book, BookDeleted, BookDetails, BookFilter, BookTagLink, CreateBook, UpdateBook};
pub use tag::{CreateTag, Tag, TagSummary, UpdateTag};
