//! API integration tests against a running server and database.
//!
//! Run with: cargo test --test api_tests -- --ignored --test-threads=1
//! The server address comes from CATALOG_TEST_URL (default http://localhost:8000).

use catalog_server::{
    client::{CatalogClient, ClientError},
    models::{Author, BookFilter, CreateAuthor, CreateBook, CreateTag, Tag, UpdateAuthor, UpdateBook},
};

fn client() -> CatalogClient {
    let url = std::env::var("CATALOG_TEST_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    CatalogClient::new(url)
}

/// Suffix keeping names unique across runs
fn unique(label: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{} {}", label, nanos)
}

async fn create_author(client: &CatalogClient, name: &str) -> Author {
    client
        .create_author(&CreateAuthor {
            name: name.to_string(),
            bio: None,
        })
        .await
        .expect("Failed to create author")
}

async fn create_tag(client: &CatalogClient, name: &str) -> Tag {
    client
        .create_tag(&CreateTag { name: unique(name) })
        .await
        .expect("Failed to create tag")
}

async fn create_book(
    client: &CatalogClient,
    author_id: i32,
    title: &str,
    year: Option<i32>,
    tags: Option<Vec<i32>>,
) -> i32 {
    client
        .create_book(&CreateBook {
            title: title.to_string(),
            isbn: "978-0-00-000000-0".to_string(),
            published_year: year,
            summary: None,
            author_id,
            tags,
        })
        .await
        .expect("Failed to create book")
        .id
}

async fn books_by_author(client: &CatalogClient, author_name: &str) -> Vec<(Option<i32>, String)> {
    client
        .filter_books(&BookFilter {
            author_name: Some(author_name.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to filter books")
        .into_iter()
        .map(|b| (b.published_year, b.title))
        .collect()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_and_readiness() {
    let response = reqwest::get(format!("{}/ready", client().base_url()))
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_update_replaces_tag_set() {
    let client = client();
    let author = create_author(&client, &unique("Tagger")).await;
    let t1 = create_tag(&client, "one").await;
    let t2 = create_tag(&client, "two").await;
    let t3 = create_tag(&client, "three").await;

    let id = create_book(&client, author.id, "Tagged", None, Some(vec![t1.id, t2.id])).await;
    let book = client.get_book(id).await.unwrap();
    let mut ids: Vec<i32> = book.tags.iter().map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![t1.id, t2.id]);

    let book = client
        .update_book(
            id,
            &UpdateBook {
                tags: Some(vec![t3.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let ids: Vec<i32> = book.tags.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![t3.id]);
    assert_eq!(book.title, "Tagged");

    client.delete_book(id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_failed_update_leaves_tags_untouched() {
    let client = client();
    let author = create_author(&client, &unique("Rollback")).await;
    let tag = create_tag(&client, "kept").await;
    let id = create_book(&client, author.id, "Rollback", None, Some(vec![tag.id])).await;

    // Unknown tag id makes the join insert fail inside the transaction
    let error = client
        .update_book(
            id,
            &UpdateBook {
                title: Some("Renamed".into()),
                tags: Some(vec![i32::MAX]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Api { status: 409, .. }));

    let book = client.get_book(id).await.unwrap();
    assert_eq!(book.title, "Rollback");
    assert_eq!(book.tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![tag.id]);

    client.delete_book(id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_empty_filter_equals_full_list() {
    let client = client();
    let all: Vec<i32> = client.get_books().await.unwrap().iter().map(|b| b.id).collect();
    let filtered: Vec<i32> = client
        .filter_books(&BookFilter::default())
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(all, filtered);
}

#[tokio::test]
#[ignore]
async fn test_title_filter_is_case_insensitive_substring() {
    let client = client();
    let marker = unique("m");
    let author = create_author(&client, &unique("Fitzgerald")).await;
    let gatsby = create_book(&client, author.id, &format!("The Great Gatsby {}", marker), Some(1925), None).await;
    let small = create_book(&client, author.id, &format!("Small Wonders {}", marker), Some(1925), None).await;

    let found: Vec<i32> = client
        .filter_books(&BookFilter {
            title: Some(format!("  great gatsby {} ", marker)),
            ..Default::default()
        })
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();

    assert!(found.contains(&gatsby));
    assert!(!found.contains(&small));

    client.delete_book(gatsby).await.unwrap();
    client.delete_book(small).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_year_filter_is_exact() {
    let client = client();
    let name = unique("Years");
    let author = create_author(&client, &name).await;
    let mut ids = Vec::new();
    for year in [2019, 2020, 2021] {
        ids.push(create_book(&client, author.id, "Same", Some(year), None).await);
    }

    let books = client
        .filter_books(&BookFilter {
            author_name: Some(name.to_lowercase()),
            title: None,
            published_year: Some(2020),
        })
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].published_year, Some(2020));

    for id in ids {
        client.delete_book(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn test_filter_ordering() {
    let client = client();
    let name = unique("Ordering");
    let author = create_author(&client, &name).await;
    let mut ids = Vec::new();
    for year in [2020, 2022, 2021] {
        ids.push(create_book(&client, author.id, "Same", Some(year), None).await);
    }
    for title in ["Banana", "Apple"] {
        ids.push(create_book(&client, author.id, title, Some(2010), None).await);
    }

    let books = books_by_author(&client, &name).await;
    assert_eq!(
        books,
        vec![
            (Some(2022), "Same".to_string()),
            (Some(2021), "Same".to_string()),
            (Some(2020), "Same".to_string()),
            (Some(2010), "Apple".to_string()),
            (Some(2010), "Banana".to_string()),
        ]
    );

    for id in ids {
        client.delete_book(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn test_undated_books_sort_first() {
    let client = client();
    let name = unique("Undated");
    let author = create_author(&client, &name).await;
    let dated = create_book(&client, author.id, "Dated", Some(2020), None).await;
    let undated = create_book(&client, author.id, "Undated", None, None).await;

    let books = books_by_author(&client, &name).await;
    assert_eq!(
        books,
        vec![(None, "Undated".to_string()), (Some(2020), "Dated".to_string())]
    );

    client.delete_book(dated).await.unwrap();
    client.delete_book(undated).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_update_with_null_clears_nullable_fields() {
    let client = client();
    let author = client
        .create_author(&CreateAuthor {
            name: unique("Nullable"),
            bio: Some("Short bio".into()),
        })
        .await
        .unwrap();
    let id = client
        .create_book(&CreateBook {
            title: "Clearable".into(),
            isbn: "0".into(),
            published_year: Some(2001),
            summary: Some("old".into()),
            author_id: author.id,
            tags: None,
        })
        .await
        .unwrap()
        .id;

    // Omitted fields are kept
    let book = client
        .update_book(id, &UpdateBook { title: Some("Still".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(book.summary.as_deref(), Some("old"));
    assert_eq!(book.published_year, Some(2001));

    let book = client
        .update_book(
            id,
            &UpdateBook {
                summary: Some(None),
                published_year: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(book.summary, None);
    assert_eq!(book.published_year, None);
    assert_eq!(book.title, "Still");

    let updated = client
        .update_author(author.id, &UpdateAuthor { name: None, bio: Some(None) })
        .await
        .unwrap();
    assert_eq!(updated.bio, None);
    assert_eq!(updated.name, author.name);

    client.delete_book(id).await.unwrap();
    client.delete_author(author.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_concurrent_updates_of_one_book_both_succeed() {
    let client = client();
    let author = create_author(&client, &unique("Racer")).await;
    let t1 = create_tag(&client, "race-a").await;
    let t2 = create_tag(&client, "race-b").await;
    let id = create_book(&client, author.id, "Contended", None, None).await;

    let first = UpdateBook { tags: Some(vec![t1.id, t2.id]), ..Default::default() };
    let second = UpdateBook { tags: Some(vec![t1.id, t2.id]), ..Default::default() };
    let (a, b) = tokio::join!(client.update_book(id, &first), client.update_book(id, &second));
    a.unwrap();
    b.unwrap();

    let mut ids: Vec<i32> = client.get_book(id).await.unwrap().tags.iter().map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![t1.id, t2.id]);

    client.delete_book(id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_delete_removes_book_and_join_rows() {
    let client = client();
    let author = create_author(&client, &unique("Deleter")).await;
    let tag = create_tag(&client, "doomed").await;
    let id = create_book(&client, author.id, "Short lived", None, Some(vec![tag.id])).await;

    client.delete_book(id).await.unwrap();
    assert!(client.get_book(id).await.unwrap_err().is_not_found());

    // An orphaned join row would make the store reject these deletes
    client.delete_tag(tag.id).await.unwrap();
    client.delete_author(author.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_create_without_tags() {
    let client = client();
    let author = create_author(&client, &unique("Untagged")).await;

    let id = create_book(&client, author.id, "No tags", None, None).await;
    assert!(client.get_book(id).await.unwrap().tags.is_empty());

    let id2 = create_book(&client, author.id, "Empty tags", None, Some(vec![])).await;
    assert!(client.get_book(id2).await.unwrap().tags.is_empty());

    client.delete_book(id).await.unwrap();
    client.delete_book(id2).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_cannot_be_deleted() {
    let client = client();
    let author = create_author(&client, &unique("Prolific")).await;
    let id = create_book(&client, author.id, "Keeps author alive", None, None).await;

    let error = client.delete_author(author.id).await.unwrap_err();
    assert!(matches!(error, ClientError::Api { status: 409, .. }));

    client.delete_book(id).await.unwrap();
    client.delete_author(author.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_unknown_author_is_rejected() {
    let client = client();
    let error = client
        .create_book(&CreateBook {
            title: "Orphan".into(),
            isbn: "0".into(),
            published_year: None,
            summary: None,
            author_id: i32::MAX,
            tags: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Api { status: 409, .. }));
}
