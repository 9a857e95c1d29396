use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Image reference used when a page has no thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "/api/placeholder/400/300";

/// Maximum number of titles requested from opensearch.
pub const RESULT_LIMIT: u32 = 10;

/// Target thumbnail width in pixels for the pageimages lookup.
pub const THUMBNAIL_SIZE: u32 = 400;

/// Main (article) namespace.
pub const MAIN_NAMESPACE: u32 = 0;

/// A trimmed, non-empty search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Query> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Query(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Position in the opensearch response. Display key only.
    pub index: usize,
    pub title: String,
    pub description: String,
    pub link: String,
    pub thumbnail_url: String,
}

impl SearchResultItem {
    pub fn new(
        index: usize,
        title: String,
        description: String,
        link: String,
        thumbnail_url: Option<String>,
    ) -> SearchResultItem {
        SearchResultItem {
            index,
            title,
            description,
            link,
            thumbnail_url: thumbnail_url.unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
        }
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_url != PLACEHOLDER_THUMBNAIL
    }
}

/// `[query, titles, descriptions, links]` as returned by `action=opensearch`.
#[derive(Deserialize, Debug, Clone)]
pub struct OpenSearchResponse(
    pub String,
    pub Vec<String>,
    pub Vec<String>,
    pub Vec<String>,
);

/// Index-aligned opensearch matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleMatches {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub links: Vec<String>,
}

impl TitleMatches {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PageImagesResponse {
    #[serde(default)]
    pub query: Option<PageImagesQuery>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PageImagesQuery {
    /// Keyed by page id (negative ids for missing pages), in response order.
    #[serde(default)]
    pub pages: IndexMap<String, PageRecord>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub source: String,
}

impl PageImagesResponse {
    /// Page records in JSON object iteration order: integer keys ascending,
    /// then the remaining keys as they appeared in the response.
    pub fn into_pages(self) -> Vec<PageRecord> {
        let Some(query) = self.query else {
            return Vec::new();
        };

        let (mut indexed, named): (Vec<_>, Vec<_>) = query
            .pages
            .into_iter()
            .map(|(key, page)| (array_index(&key), page))
            .partition(|(index, _)| index.is_some());
        indexed.sort_by_key(|(index, _)| *index);

        indexed
            .into_iter()
            .chain(named)
            .map(|(_, page)| page)
            .collect()
    }
}

/// `Some(n)` when `key` is the canonical decimal form of an array index.
fn array_index(key: &str) -> Option<u32> {
    let n: u32 = key.parse().ok()?;
    (n != u32::MAX && n.to_string() == key).then_some(n)
}

#[test]
fn test_query_parse_trims_and_rejects_blank() {
    assert_eq!(Query::parse(""), None);
    assert_eq!(Query::parse("   \t\n "), None);

    let query = Query::parse("  Rust language ").unwrap();
    assert_eq!(query.as_str(), "Rust language");
}

#[test]
fn test_page_images_response_without_query_has_no_pages() {
    let response: PageImagesResponse = serde_json::from_str(r#"{"batchcomplete":""}"#).unwrap();
    assert!(response.into_pages().is_empty());
}

#[test]
fn test_page_images_response_parses_missing_thumbnail() {
    let body = r#"{
        "query": {
            "pages": {
                "6678": {"pageid": 6678, "ns": 0, "title": "Cat",
                         "thumbnail": {"source": "https://upload.wikimedia.org/cat.jpg", "width": 400, "height": 300}},
                "-1": {"ns": 0, "title": "Nope", "missing": ""}
            }
        }
    }"#;
    let response: PageImagesResponse = serde_json::from_str(body).unwrap();
    let pages = response.into_pages();
    assert_eq!(pages.len(), 2);

    let cat = pages.iter().find(|p| p.title == "Cat").unwrap();
    assert_eq!(
        cat.thumbnail.as_ref().map(|t| t.source.as_str()),
        Some("https://upload.wikimedia.org/cat.jpg")
    );
    let nope = pages.iter().find(|p| p.title == "Nope").unwrap();
    assert!(nope.thumbnail.is_none());
}

#[test]
fn test_page_images_response_orders_integer_keys_numerically() {
    let body = r#"{
        "query": {
            "pages": {
                "-1": {"ns": 0, "title": "Missing", "missing": ""},
                "10": {"ns": 0, "title": "Cat", "thumbnail": {"source": "ten.jpg"}},
                "007": {"ns": 0, "title": "Padded"},
                "9": {"ns": 0, "title": "Cat", "thumbnail": {"source": "nine.jpg"}}
            }
        }
    }"#;
    let response: PageImagesResponse = serde_json::from_str(body).unwrap();
    let titles_and_sources: Vec<(String, Option<String>)> = response
        .into_pages()
        .into_iter()
        .map(|p| (p.title, p.thumbnail.map(|t| t.source)))
        .collect();

    assert_eq!(
        titles_and_sources,
        vec![
            ("Cat".to_string(), Some("nine.jpg".to_string())),
            ("Cat".to_string(), Some("ten.jpg".to_string())),
            ("Missing".to_string(), None),
            ("Padded".to_string(), None),
        ]
    );
}

#[test]
fn test_array_index_accepts_only_canonical_integers() {
    assert_eq!(array_index("0"), Some(0));
    assert_eq!(array_index("6678"), Some(6678));
    assert_eq!(array_index("-1"), None);
    assert_eq!(array_index("007"), None);
    assert_eq!(array_index("+5"), None);
    assert_eq!(array_index("4294967295"), None);
}
