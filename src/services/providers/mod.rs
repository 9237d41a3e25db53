/// Catalog metadata provider abstraction
///
/// Providers speak to a remote metadata service and normalize whatever it returns
/// into [`CatalogItem`] and the auxiliary shapes before handing it back. They report
/// transport and parse failures as errors; [`crate::services::catalog::Catalog`]
/// decides how those degrade.
use crate::{
    error::AppResult,
    models::{CastMember, CatalogItem, MediaKind, SeriesStructure},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Titles of both kinds trending this week, stamped `trending`
    async fn trending(&self) -> AppResult<Vec<CatalogItem>>;

    async fn top_rated(&self) -> AppResult<Vec<CatalogItem>>;

    /// Popular titles of one kind within a genre
    async fn by_genre(&self, genre_id: u32, kind: MediaKind) -> AppResult<Vec<CatalogItem>>;

    /// The house originals collection
    async fn featured_collection(&self) -> AppResult<Vec<CatalogItem>>;

    /// Series trending this week, stamped `trending`
    async fn trending_series(&self) -> AppResult<Vec<CatalogItem>>;

    async fn top_rated_series(&self) -> AppResult<Vec<CatalogItem>>;

    /// Free-text search over movies and series
    async fn search(&self, query: &str) -> AppResult<Vec<CatalogItem>>;

    async fn cast(&self, id: &str, kind: MediaKind) -> AppResult<Vec<CastMember>>;

    async fn trailer_key(&self, id: &str, kind: MediaKind) -> AppResult<Option<String>>;

    async fn series_structure(&self, id: &str) -> AppResult<SeriesStructure>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
