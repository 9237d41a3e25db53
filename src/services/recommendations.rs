//! Mood-based title suggestions from a generative model.
//!
//! The model invents listings rather than looking real ones up, so every
//! suggestion gets a synthetic id and placeholder artwork.

use std::sync::Arc;

use rand::seq::SliceRandom;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogItem, MediaKind},
};

/// Suggestions returned when the model is not configured
const FALLBACK_SAMPLE: usize = 3;
/// Concepts requested per prompt
const CONCEPTS_PER_PROMPT: usize = 4;
const MAX_GENRES: usize = 3;

/// One listing as the model describes it
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedTitle {
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub year: i32,
    pub rating: String,
    pub duration: String,
    pub match_score: i64,
}

impl GeneratedTitle {
    pub fn into_catalog_item(self, minted_at: i64, index: usize) -> CatalogItem {
        let seed: String = self
            .title
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        let mut genre = self.genre;
        genre.truncate(MAX_GENRES);

        CatalogItem {
            id: format!("ai-gen-{}-{}", minted_at, index),
            thumbnail_url: format!("https://picsum.photos/seed/{}/400/600", seed),
            cover_url: format!("https://picsum.photos/seed/{}-wide/1920/1080", seed),
            short_description: crate::models::summarize(&self.description),
            title: self.title,
            description: self.description,
            genre,
            year: self.year,
            match_score: self.match_score.clamp(0, 100) as u8,
            rating: self.rating,
            duration: self.duration,
            trending: false,
            media_type: MediaKind::Movie,
        }
    }
}

/// Text-to-listings model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<Vec<GeneratedTitle>>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Parses the model's JSON payload; blank or malformed text yields no titles
fn parse_titles(text: &str) -> Vec<GeneratedTitle> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    serde_json::from_str(text).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Model returned malformed listings");
        Vec::new()
    })
}

/// Gemini `generateContent` over REST
#[derive(Clone)]
pub struct GeminiModel {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        )
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "genre": { "type": "ARRAY", "items": { "type": "STRING" } },
                            "year": { "type": "INTEGER" },
                            "rating": { "type": "STRING" },
                            "duration": { "type": "STRING" },
                            "matchScore": { "type": "INTEGER" }
                        }
                    }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> AppResult<Vec<GeneratedTitle>> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::MissingCredentials("GEMINI_API_KEY"));
        }

        let response = self
            .http_client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.first_text().map(parse_titles).unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn build_prompt(query: &str) -> String {
    format!(
        "The user is asking for movie recommendations with this query: \"{query}\".\n\
         Generate {CONCEPTS_PER_PROMPT} unique, exciting movie concepts that perfectly fit this mood. \
         They should read like real movie listings but can be creative interpretations of the request.\n\
         Return a JSON array of objects with: title, description (max 2 sentences), \
         genre (array of strings), year, rating (e.g. PG-13), duration (e.g. 1h 55m), matchScore (0-100)."
    )
}

/// Never fails: missing credentials fall back to a sample of the caller's
/// titles, anything else to an empty list
#[derive(Clone)]
pub struct RecommendationService {
    model: Arc<dyn GenerativeModel>,
}

impl RecommendationService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn get_recommendations(
        &self,
        query: &str,
        context: &[CatalogItem],
    ) -> Vec<CatalogItem> {
        match self.model.generate(&build_prompt(query)).await {
            Ok(titles) => {
                let minted_at = chrono::Utc::now().timestamp_millis();
                let items: Vec<CatalogItem> = titles
                    .into_iter()
                    .enumerate()
                    .map(|(index, title)| title.into_catalog_item(minted_at, index))
                    .collect();

                tracing::info!(
                    query = %query,
                    results = items.len(),
                    model = self.model.name(),
                    "Recommendations generated"
                );
                items
            }
            Err(AppError::MissingCredentials(key)) => {
                tracing::warn!(key, "No model credentials, sampling fallback titles");
                context
                    .choose_multiple(&mut rand::thread_rng(), FALLBACK_SAMPLE)
                    .cloned()
                    .collect()
            }
            Err(e) => {
                tracing::error!(error = %e, model = self.model.name(), "Recommendation request failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fallback::fallback_titles;

    fn service_with(model: MockGenerativeModel) -> RecommendationService {
        RecommendationService::new(Arc::new(model))
    }

    #[test]
    fn test_first_text_walks_candidate_envelope() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[{\"title\":\"Night Shift\"}]"}]}}]}"#,
        )
        .unwrap();
        let titles = parse_titles(body.first_text().unwrap());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].title, "Night Shift");

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn test_blank_or_malformed_text_yields_nothing() {
        assert!(parse_titles("").is_empty());
        assert!(parse_titles("   ").is_empty());
        assert!(parse_titles("not json").is_empty());
    }

    #[test]
    fn test_generated_title_becomes_catalog_item() {
        let title = GeneratedTitle {
            title: "Neon Drift 2: Tokyo!".to_string(),
            description: "Racers chase a ghost. Nobody wins.".to_string(),
            genre: vec!["Action", "Sci-Fi", "Thriller", "Drama"]
                .into_iter()
                .map(String::from)
                .collect(),
            year: 2025,
            match_score: 140,
            ..Default::default()
        };

        let item = title.into_catalog_item(1700000000000, 2);
        assert_eq!(item.id, "ai-gen-1700000000000-2");
        assert_eq!(item.thumbnail_url, "https://picsum.photos/seed/NeonDriftTokyo/400/600");
        assert_eq!(
            item.cover_url,
            "https://picsum.photos/seed/NeonDriftTokyo-wide/1920/1080"
        );
        assert_eq!(item.genre.len(), 3);
        assert_eq!(item.match_score, 100);
        assert_eq!(item.short_description, "Racers chase a ghost.");
        assert!(!item.trending);
        assert_eq!(item.media_type, MediaKind::Movie);
    }

    #[test]
    fn test_request_body_asks_for_json_array() {
        let body = GeminiModel::request_body("cozy");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "cozy");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[tokio::test]
    async fn test_gemini_without_key_reports_missing_credentials() {
        let model = GeminiModel::new(
            String::new(),
            "http://gemini.local/v1beta".to_string(),
            "gemini-2.5-flash".to_string(),
        );
        assert_eq!(
            model.url(),
            "http://gemini.local/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let result = model.generate("anything").await;
        assert!(matches!(result, Err(AppError::MissingCredentials("GEMINI_API_KEY"))));
    }

    #[tokio::test]
    async fn test_missing_credentials_sample_context() {
        let mut model = MockGenerativeModel::new();
        model.expect_name().return_const("mock");
        model
            .expect_generate()
            .returning(|_| Err(AppError::MissingCredentials("GEMINI_API_KEY")));

        let context = fallback_titles();
        let items = service_with(model)
            .get_recommendations("space opera", &context)
            .await;

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| context.contains(item)));
    }

    #[tokio::test]
    async fn test_other_failures_yield_nothing() {
        let mut model = MockGenerativeModel::new();
        model.expect_name().return_const("mock");
        model
            .expect_generate()
            .returning(|_| Err(AppError::ExternalApi("quota".to_string())));

        let items = service_with(model)
            .get_recommendations("heist", &fallback_titles())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_success_mints_sequential_ids() {
        let mut model = MockGenerativeModel::new();
        model.expect_name().return_const("mock");
        model
            .expect_generate()
            .withf(|prompt| prompt.contains("\"rainy sunday\""))
            .returning(|_| {
                Ok(vec![
                    GeneratedTitle {
                        title: "Drizzle".to_string(),
                        ..Default::default()
                    },
                    GeneratedTitle {
                        title: "Grey Hours".to_string(),
                        ..Default::default()
                    },
                ])
            });

        let items = service_with(model)
            .get_recommendations("rainy sunday", &[])
            .await;

        assert_eq!(items.len(), 2);
        assert!(items[0].id.starts_with("ai-gen-") && items[0].id.ends_with("-0"));
        assert!(items[1].id.ends_with("-1"));
    }
}
