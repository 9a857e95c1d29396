use crate::data_models::{PageRecord, Query, SearchResultItem, TitleMatches};
use crate::error::LookupFailed;
use crate::wiki_client::WikipediaClient;

/// Joins opensearch matches with pageimages records by exact title.
///
/// Output order and length follow `matches`. A title with no record, or whose
/// first matching record has no (or an empty) thumbnail, gets the placeholder.
pub fn merge_results(matches: TitleMatches, pages: &[PageRecord]) -> Vec<SearchResultItem> {
    let TitleMatches {
        titles,
        descriptions,
        links,
    } = matches;

    titles
        .into_iter()
        .zip(descriptions)
        .zip(links)
        .enumerate()
        .map(|(index, ((title, description), link))| {
            let thumbnail_url = pages
                .iter()
                .find(|page| page.title == title)
                .and_then(|page| page.thumbnail.as_ref())
                .map(|thumb| thumb.source.clone())
                .filter(|source| !source.is_empty());
            SearchResultItem::new(index, title, description, link, thumbnail_url)
        })
        .collect()
}

pub struct SearchOrchestrator {
    client: WikipediaClient,
}

impl SearchOrchestrator {
    pub fn new(client: WikipediaClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &WikipediaClient {
        &self.client
    }

    /// Runs both lookups and merges them. Any failure yields an empty list.
    pub async fn search(&self, query: &Query) -> Vec<SearchResultItem> {
        match self.try_search(query).await {
            Ok(items) => {
                log::info!("search {query:?}: {} results", items.len());
                items
            }
            Err(e) => {
                log::error!("error searching wikipedia for {query:?}, error: {:#}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_search(&self, query: &Query) -> Result<Vec<SearchResultItem>, LookupFailed> {
        let matches = self.client.search_titles(query).await?;
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let pages = self.client.page_thumbnails(&matches.titles).await?;
        Ok(merge_results(matches, &pages))
    }
}

#[cfg(test)]
fn page(title: &str, thumbnail: Option<&str>) -> PageRecord {
    PageRecord {
        title: title.to_string(),
        thumbnail: thumbnail.map(|source| crate::data_models::Thumbnail {
            source: source.to_string(),
        }),
    }
}

#[cfg(test)]
fn matches(titles: &[&str]) -> TitleMatches {
    TitleMatches {
        titles: titles.iter().map(|t| t.to_string()).collect(),
        descriptions: titles.iter().map(|t| format!("About {t}")).collect(),
        links: titles
            .iter()
            .map(|t| format!("https://en.wikipedia.org/wiki/{t}"))
            .collect(),
    }
}

#[test]
fn test_merge_keeps_opensearch_order_and_fills_placeholder() {
    use crate::data_models::PLACEHOLDER_THUMBNAIL;

    // pageimages order is unrelated to opensearch order
    let pages = vec![
        page("Caterpillar", None),
        page("Cat", Some("https://upload.wikimedia.org/cat.jpg")),
    ];
    let got = merge_results(matches(&["Cat", "Caterpillar"]), &pages);

    assert_eq!(got.len(), 2);
    assert_eq!(got[0].index, 0);
    assert_eq!(got[0].title, "Cat");
    assert_eq!(got[0].description, "About Cat");
    assert_eq!(got[0].link, "https://en.wikipedia.org/wiki/Cat");
    assert_eq!(got[0].thumbnail_url, "https://upload.wikimedia.org/cat.jpg");
    assert!(got[0].has_thumbnail());

    assert_eq!(got[1].index, 1);
    assert_eq!(got[1].title, "Caterpillar");
    assert_eq!(got[1].thumbnail_url, PLACEHOLDER_THUMBNAIL);
    assert!(!got[1].has_thumbnail());
}

#[test]
fn test_merge_title_match_is_case_sensitive() {
    let pages = vec![page("cat", Some("https://upload.wikimedia.org/cat.jpg"))];
    let got = merge_results(matches(&["Cat"]), &pages);

    assert_eq!(got.len(), 1);
    assert!(!got[0].has_thumbnail());
}

#[test]
fn test_merge_unmatched_titles_and_empty_pages() {
    let got = merge_results(matches(&["A", "B", "C"]), &[]);
    assert_eq!(got.len(), 3);
    assert!(got.iter().all(|item| !item.has_thumbnail()));
    assert_eq!(
        got.iter().map(|i| i.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let got = merge_results(TitleMatches::default(), &[page("A", Some("x"))]);
    assert!(got.is_empty());
}

#[test]
fn test_merge_empty_thumbnail_source_uses_placeholder() {
    use crate::data_models::PLACEHOLDER_THUMBNAIL;

    let got = merge_results(matches(&["Cat"]), &[page("Cat", Some(""))]);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].thumbnail_url, PLACEHOLDER_THUMBNAIL);
    assert!(!got[0].has_thumbnail());
}

#[test]
fn test_merge_duplicate_records_first_match_wins() {
    let pages = vec![page("Cat", Some("first.jpg")), page("Cat", Some("second.jpg"))];
    let got = merge_results(matches(&["Cat"]), &pages);
    assert_eq!(got[0].thumbnail_url, "first.jpg");

    // first record without thumbnail still wins over a later one with it
    let pages = vec![page("Cat", None), page("Cat", Some("second.jpg"))];
    let got = merge_results(matches(&["Cat"]), &pages);
    assert!(!got[0].has_thumbnail());
}

#[test]
fn test_merge_counts_k_thumbnails_out_of_n() {
    let titles = ["One", "Two", "Three", "Four", "Five"];
    let pages = vec![
        page("Four", Some("4.jpg")),
        page("Two", Some("2.jpg")),
        page("Five", None),
    ];
    let got = merge_results(matches(&titles), &pages);

    assert_eq!(got.len(), titles.len());
    assert_eq!(got.iter().filter(|i| i.has_thumbnail()).count(), 2);
    assert_eq!(
        got.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
        titles.to_vec()
    );
}
