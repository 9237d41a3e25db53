use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CastMember, CatalogItem, MediaKind, SeriesStructure},
    services::providers::CatalogProvider,
};

/// Infallible front for a [`CatalogProvider`]
///
/// Any transport or parse failure is logged and replaced by an empty or neutral
/// value, so callers only ever see "no data".
#[derive(Clone)]
pub struct Catalog {
    provider: Arc<dyn CatalogProvider>,
}

impl Catalog {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    fn recover<T: Default>(&self, operation: &'static str, result: AppResult<T>) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation,
                provider = self.provider.name(),
                "Catalog request failed, using empty result"
            );
            T::default()
        })
    }

    pub async fn trending(&self) -> Vec<CatalogItem> {
        self.recover("trending", self.provider.trending().await)
    }

    pub async fn top_rated(&self) -> Vec<CatalogItem> {
        self.recover("top_rated", self.provider.top_rated().await)
    }

    pub async fn by_genre(&self, genre_id: u32, kind: MediaKind) -> Vec<CatalogItem> {
        self.recover("by_genre", self.provider.by_genre(genre_id, kind).await)
    }

    pub async fn featured_collection(&self) -> Vec<CatalogItem> {
        self.recover("featured_collection", self.provider.featured_collection().await)
    }

    pub async fn trending_series(&self) -> Vec<CatalogItem> {
        self.recover("trending_series", self.provider.trending_series().await)
    }

    pub async fn top_rated_series(&self) -> Vec<CatalogItem> {
        self.recover("top_rated_series", self.provider.top_rated_series().await)
    }

    pub async fn search(&self, query: &str) -> Vec<CatalogItem> {
        self.recover("search", self.provider.search(query).await)
    }

    pub async fn cast(&self, id: &str, kind: MediaKind) -> Vec<CastMember> {
        self.recover("cast", self.provider.cast(id, kind).await)
    }

    pub async fn trailer_key(&self, id: &str, kind: MediaKind) -> Option<String> {
        self.recover("trailer_key", self.provider.trailer_key(id, kind).await)
    }

    pub async fn series_structure(&self, id: &str) -> SeriesStructure {
        self.recover("series_structure", self.provider.series_structure(id).await)
    }
}
