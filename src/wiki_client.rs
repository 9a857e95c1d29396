use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::CONFIG;
use crate::data_models::{
    MAIN_NAMESPACE, OpenSearchResponse, PageImagesResponse, PageRecord, Query, RESULT_LIMIT,
    THUMBNAIL_SIZE, TitleMatches,
};
use crate::error::{LookupFailed, Phase};

/// Thin client over the MediaWiki action API.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    api_url: Url,
}

impl WikipediaClient {
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .with_context(|| format!("Invalid Wikipedia API url: {api_url}"))?;
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, api_url })
    }

    pub fn from_config() -> Result<Self> {
        Self::new(&CONFIG.wiki_api_url, &CONFIG.user_agent)
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Phase 1: up to `RESULT_LIMIT` main-namespace titles for `query`.
    pub async fn search_titles(&self, query: &Query) -> Result<TitleMatches, LookupFailed> {
        let limit = RESULT_LIMIT.to_string();
        let namespace = MAIN_NAMESPACE.to_string();
        let params = [
            ("action", "opensearch"),
            ("search", query.as_str()),
            ("limit", limit.as_str()),
            ("namespace", namespace.as_str()),
            ("format", "json"),
        ];

        let OpenSearchResponse(_, titles, descriptions, links) =
            self.get_json(Phase::TitleSearch, &params).await?;

        if titles.len() != descriptions.len() || titles.len() != links.len() {
            return Err(LookupFailed::Shape {
                phase: Phase::TitleSearch,
                detail: format!(
                    "{} titles, {} descriptions, {} links",
                    titles.len(),
                    descriptions.len(),
                    links.len()
                ),
            });
        }

        log::debug!("opensearch for {query:?} matched {} titles", titles.len());
        Ok(TitleMatches {
            titles,
            descriptions,
            links,
        })
    }

    /// Phase 2: page records (with thumbnails where available) for `titles`.
    pub async fn page_thumbnails(&self, titles: &[String]) -> Result<Vec<PageRecord>, LookupFailed> {
        let joined = titles.join("|");
        let size = THUMBNAIL_SIZE.to_string();
        let params = [
            ("action", "query"),
            ("titles", joined.as_str()),
            ("prop", "pageimages"),
            ("pithumbsize", size.as_str()),
            ("format", "json"),
        ];

        let response: PageImagesResponse = self.get_json(Phase::ThumbnailLookup, &params).await?;
        let pages = response.into_pages();
        log::debug!("pageimages returned {} page records", pages.len());
        Ok(pages)
    }

    async fn get_json<T>(&self, phase: Phase, params: &[(&str, &str)]) -> Result<T, LookupFailed>
    where
        T: DeserializeOwned,
    {
        let res = self
            .http
            .get(self.api_url.clone())
            .query(params)
            .send()
            .await
            .map_err(|source| LookupFailed::Transport { phase, source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupFailed::Status { phase, status });
        }

        let body = res
            .bytes()
            .await
            .map_err(|source| LookupFailed::Transport { phase, source })?;

        serde_json::from_slice(&body).map_err(|source| LookupFailed::Decode { phase, source })
    }
}
