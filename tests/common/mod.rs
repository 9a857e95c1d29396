#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikisearch::search::SearchOrchestrator;
use wikisearch::wiki_client::WikipediaClient;

pub const API_PATH: &str = "/w/api.php";

pub fn client_for(server: &MockServer) -> WikipediaClient {
    WikipediaClient::new(&format!("{}{}", server.uri(), API_PATH), "wikisearch-tests")
        .expect("mock server url should parse")
}

pub fn orchestrator_for(server: &MockServer) -> Arc<SearchOrchestrator> {
    Arc::new(SearchOrchestrator::new(client_for(server)))
}

pub fn opensearch_body(query: &str, titles: &[&str]) -> Value {
    let descriptions: Vec<String> = titles.iter().map(|t| format!("About {t}")).collect();
    let links: Vec<String> = titles
        .iter()
        .map(|t| format!("https://en.wikipedia.org/wiki/{}", t.replace(' ', "_")))
        .collect();
    json!([query, titles, descriptions, links])
}

/// `pages` entries are `(title, thumbnail source)`.
pub fn pageimages_body(pages: &[(&str, Option<&str>)]) -> Value {
    let mut map = serde_json::Map::new();
    for (i, (title, thumb)) in pages.iter().enumerate() {
        let mut page = json!({ "pageid": 1000 + i, "ns": 0, "title": title });
        if let Some(source) = thumb {
            page["thumbnail"] = json!({ "source": source, "width": 400, "height": 300 });
        }
        map.insert((1000 + i).to_string(), page);
    }
    json!({ "batchcomplete": "", "query": { "pages": map } })
}

pub async fn mount_opensearch(server: &MockServer, query: &str, titles: &[&str]) {
    mount_opensearch_delayed(server, query, titles, Duration::ZERO).await;
}

pub async fn mount_opensearch_delayed(
    server: &MockServer,
    query: &str,
    titles: &[&str],
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "opensearch"))
        .and(query_param("search", query))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(opensearch_body(query, titles))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn mount_pageimages(server: &MockServer, pages: &[(&str, Option<&str>)]) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pageimages_body(pages)))
        .mount(server)
        .await;
}

/// The "Cat" scenario: two titles, a thumbnail only for the first.
pub async fn mount_cat_scenario(server: &MockServer) {
    mount_opensearch(server, "Cat", &["Cat", "Caterpillar"]).await;
    mount_pageimages(
        server,
        &[
            ("Caterpillar", None),
            ("Cat", Some("https://upload.wikimedia.org/cat.jpg")),
        ],
    )
    .await;
}
