//! Book model, its tag associations and request types

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{author::AuthorSummary, tag::TagSummary};

/// Book row, as returned by write endpoints
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub summary: Option<String>,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the book/tag join table with its tag expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookTagLink {
    pub book_id: i32,
    pub tag_id: i32,
    pub tag: TagSummary,
}

/// Book expanded with its author and tag associations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub summary: Option<String>,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    /// Join rows, each wrapping the associated tag
    #[serde(rename = "BookTag")]
    pub book_tags: Vec<BookTagLink>,
}

impl BookDetails {
    pub fn new(book: Book, author: AuthorSummary, book_tags: Vec<BookTagLink>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            published_year: book.published_year,
            summary: book.summary,
            author_id: book.author_id,
            created_at: book.created_at,
            updated_at: book.updated_at,
            author,
            book_tags,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    #[schema(example = "The Great Gatsby")]
    pub title: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    #[schema(example = "978-0-00-000000-0")]
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1925)]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[schema(example = 1)]
    pub author_id: i32,
    /// Tag ids to associate with the new book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = json!([1]))]
    pub tags: Option<Vec<i32>>,
}

/// Update book request; the tag list replaces every existing association.
///
/// `publishedYear` and `summary` distinguish an omitted field (`None`, kept)
/// from an explicit `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<i32>)]
    pub published_year: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub summary: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i32>>,
}

const INVALID_YEAR: &str = "Published year must be a valid year";

/// Read a `publishedYear` query value.
///
/// Empty or non-numeric text is absent; a number that is not a whole `i32` is rejected.
fn parse_year(raw: &str) -> Result<Option<i32>, &'static str> {
    let value = match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => return Ok(None),
    };

    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(INVALID_YEAR);
    }
    Ok(Some(value as i32))
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    parse_year(raw.as_deref().unwrap_or_default()).map_err(de::Error::custom)
}

/// Book filter query parameters
///
/// Empty or non-numeric `publishedYear` values deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    /// Case-insensitive substring of the author's name
    #[serde(default)]
    pub author_name: Option<String>,
    /// Case-insensitive substring of the title
    #[serde(default)]
    pub title: Option<String>,
    /// Exact published year
    #[serde(default, deserialize_with = "deserialize_year")]
    #[validate(range(min = 1000, message = "Published year must be a valid year"))]
    pub published_year: Option<i32>,
}

impl BookFilter {
    /// Trim text criteria and drop the blank ones
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            author_name: clean(self.author_name),
            title: clean(self.title),
            published_year: self.published_year,
        }
    }
}

/// Confirmation returned when a book is deleted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDeleted {
    pub message: String,
}

impl Default for BookDeleted {
    fn default() -> Self {
        Self {
            message: "Book deleted successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;

    fn try_parse_filter(query: &str) -> Result<BookFilter, String> {
        let uri: axum::http::Uri = format!("http://localhost/books/filter?{}", query)
            .parse()
            .unwrap();
        Query::<BookFilter>::try_from_uri(&uri)
            .map(|q| q.0)
            .map_err(|rejection| rejection.body_text())
    }

    fn parse_filter(query: &str) -> BookFilter {
        try_parse_filter(query).unwrap()
    }

    #[test]
    fn test_filter_query_parsing() {
        let filter = parse_filter("authorName=%20Alice%20&title=great&publishedYear=2020");
        assert_eq!(filter.author_name.as_deref(), Some(" Alice "));
        assert_eq!(filter.title.as_deref(), Some("great"));
        assert_eq!(filter.published_year, Some(2020));
    }

    #[test]
    fn test_filter_year_empty_or_garbage_is_absent() {
        assert_eq!(parse_filter("publishedYear=").published_year, None);
        assert_eq!(parse_filter("publishedYear=abc").published_year, None);
        assert_eq!(parse_filter("").published_year, None);
    }

    #[test]
    fn test_filter_year_numeric_forms() {
        assert_eq!(parse_filter("publishedYear=%202020%20").published_year, Some(2020));
        assert_eq!(parse_filter("publishedYear=2e3").published_year, Some(2000));
        assert_eq!(parse_filter("publishedYear=2020.0").published_year, Some(2020));
    }

    #[test]
    fn test_filter_year_out_of_range_is_an_error() {
        for query in [
            "publishedYear=99999999999",
            "publishedYear=2020.5",
            "publishedYear=-1e12",
        ] {
            let error = try_parse_filter(query).unwrap_err();
            assert!(error.contains(INVALID_YEAR), "{}: {}", query, error);
        }
    }

    #[test]
    fn test_filter_year_below_1000_is_rejected() {
        assert!(parse_filter("publishedYear=999").validate().is_err());
        assert!(parse_filter("publishedYear=1999").validate().is_ok());
    }

    #[test]
    fn test_normalized_drops_blank_criteria() {
        let filter = BookFilter {
            author_name: Some("   ".into()),
            title: Some("  Great ".into()),
            published_year: None,
        }
        .normalized();

        assert_eq!(filter.author_name, None);
        assert_eq!(filter.title.as_deref(), Some("Great"));
        assert_eq!(BookFilter::default().normalized(), BookFilter::default());
    }

    #[test]
    fn test_details_serialize_with_join_wrappers() {
        let now = Utc::now();
        let book = Book {
            id: 3,
            title: "Book 3".into(),
            isbn: "1234567892".into(),
            published_year: Some(2022),
            summary: None,
            author_id: 1,
            created_at: now,
            updated_at: now,
        };
        let details = BookDetails::new(
            book,
            AuthorSummary { id: 1, name: "Charlie".into() },
            vec![BookTagLink {
                book_id: 3,
                tag_id: 9,
                tag: TagSummary { id: 9, name: "Tag 3".into() },
            }],
        );

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["publishedYear"], 2022);
        assert_eq!(json["authorId"], 1);
        assert_eq!(json["author"]["name"], "Charlie");
        assert_eq!(json["BookTag"][0]["tagId"], 9);
        assert_eq!(json["BookTag"][0]["tag"]["name"], "Tag 3");
    }

    #[test]
    fn test_update_book_null_differs_from_omitted() {
        let update: UpdateBook =
            serde_json::from_str(r#"{"summary": null, "publishedYear": null}"#).unwrap();
        assert_eq!(update.summary, Some(None));
        assert_eq!(update.published_year, Some(None));

        let update: UpdateBook = serde_json::from_str(r#"{"publishedYear": 1999}"#).unwrap();
        assert_eq!(update.published_year, Some(Some(1999)));
        assert_eq!(update.summary, None);

        let json = serde_json::to_value(UpdateBook {
            summary: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"summary": null}));
    }

    #[test]
    fn test_create_book_tags_are_optional() {
        let create: CreateBook = serde_json::from_str(
            r#"{"title": "Small Wonders", "isbn": "978-1", "authorId": 2}"#,
        )
        .unwrap();
        assert!(create.tags.is_none());
        assert!(create.validate().is_ok());

        let create: CreateBook =
            serde_json::from_str(r#"{"title": "", "isbn": "978-1", "authorId": 2}"#).unwrap();
        assert!(create.validate().is_err());
    }
}
