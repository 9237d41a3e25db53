/// TMDB v3 provider
///
/// Every request carries `api_key` and `language` as query parameters. List-shaped
/// endpoints share one envelope (`results`), and entries that fail to deserialize
/// are skipped rather than failing the whole page.
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbCredits, TmdbPage, TmdbResult, TmdbSeriesDetails, TmdbVideos},
        CastMember, CatalogItem, MediaKind, SeriesStructure,
    },
    services::providers::CatalogProvider,
};

/// Network id of the originals collection on TMDB
const ORIGINALS_NETWORK_ID: &str = "213";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    profile_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        profile_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_url,
            profile_url,
            language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.tmdb_profile_url.clone(),
            config.tmdb_language.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    fn params<'a>(&'a self, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        params.extend_from_slice(extra);
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&self.params(extra))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(path = %path, response = %body, "Unparseable TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Fetches a list endpoint and normalizes each entry
    async fn fetch_list(&self, path: &str, extra: &[(&str, &str)]) -> AppResult<Vec<TmdbResult>> {
        let page: TmdbPage = self.get_json(path, extra).await?;

        let results: Vec<TmdbResult> = page
            .results
            .into_iter()
            .filter_map(|value| serde_json::from_value::<TmdbResult>(value).ok())
            .collect();

        tracing::debug!(path = %path, results = results.len(), provider = "tmdb", "List fetched");

        Ok(results)
    }

    fn normalize(&self, results: Vec<TmdbResult>, trending: bool) -> Vec<CatalogItem> {
        results
            .into_iter()
            .map(|r| {
                let mut item = r.into_catalog_item(&self.image_url);
                item.trending = trending;
                item
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn trending(&self) -> AppResult<Vec<CatalogItem>> {
        let results = self.fetch_list("trending/all/week", &[]).await?;
        Ok(self.normalize(results, true))
    }

    async fn top_rated(&self) -> AppResult<Vec<CatalogItem>> {
        let results = self.fetch_list("movie/top_rated", &[]).await?;
        Ok(self.normalize(results, false))
    }

    async fn by_genre(&self, genre_id: u32, kind: MediaKind) -> AppResult<Vec<CatalogItem>> {
        let genre = genre_id.to_string();
        let path = format!("discover/{}", kind.as_path());
        let results = self
            .fetch_list(
                &path,
                &[("with_genres", genre.as_str()), ("sort_by", "popularity.desc")],
            )
            .await?;

        let mut items = self.normalize(results, false);
        // Discover results carry no media_type; the endpoint decides it
        for item in &mut items {
            item.media_type = kind;
        }
        Ok(items)
    }

    async fn featured_collection(&self) -> AppResult<Vec<CatalogItem>> {
        let results = self
            .fetch_list("discover/tv", &[("with_networks", ORIGINALS_NETWORK_ID)])
            .await?;
        Ok(self.normalize(results, false))
    }

    async fn trending_series(&self) -> AppResult<Vec<CatalogItem>> {
        let results = self.fetch_list("trending/tv/week", &[]).await?;
        Ok(self.normalize(results, true))
    }

    async fn top_rated_series(&self) -> AppResult<Vec<CatalogItem>> {
        let results = self.fetch_list("tv/top_rated", &[]).await?;
        Ok(self.normalize(results, false))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let results = self
            .fetch_list(
                "search/multi",
                &[("query", query), ("page", "1"), ("include_adult", "false")],
            )
            .await?;

        let titles: Vec<TmdbResult> = results.into_iter().filter(|r| r.is_title()).collect();

        tracing::info!(
            query = %query,
            results = titles.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(self.normalize(titles, false))
    }

    async fn cast(&self, id: &str, kind: MediaKind) -> AppResult<Vec<CastMember>> {
        let path = format!("{}/{}/credits", kind.as_path(), id);
        let credits: TmdbCredits = self.get_json(&path, &[]).await?;
        Ok(credits.into_cast(&self.profile_url))
    }

    async fn trailer_key(&self, id: &str, kind: MediaKind) -> AppResult<Option<String>> {
        let path = format!("{}/{}/videos", kind.as_path(), id);
        let videos: TmdbVideos = self.get_json(&path, &[]).await?;
        Ok(videos.trailer_key())
    }

    async fn series_structure(&self, id: &str) -> AppResult<SeriesStructure> {
        let path = format!("tv/{}", id);
        let details: TmdbSeriesDetails = self.get_json(&path, &[]).await?;
        Ok(details.into())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
