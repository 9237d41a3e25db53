use std::sync::Arc;

use crate::{
    config::Config,
    db::{create_redis_client, BookmarkStore, KeyValueStore, MemoryStore, RedisStore},
    services::{
        assistant::Assistant,
        catalog::Catalog,
        notifications::NotificationCenter,
        orchestrator::Orchestrator,
        player::EmbedTable,
        providers::TmdbProvider,
        recommendations::{GeminiModel, RecommendationService},
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub assistant: Arc<Assistant>,
    pub notifications: Arc<NotificationCenter>,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator,
        assistant: Arc<Assistant>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            orchestrator,
            assistant,
            notifications,
        }
    }

    /// Wires the live TMDB, Gemini and storage backends
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.redis_url {
            Some(url) => Arc::new(RedisStore::new(create_redis_client(url)?)),
            None => {
                tracing::warn!("REDIS_URL not set, bookmarks will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };
        let bookmarks = BookmarkStore::load(store, config.bookmarks_key.clone()).await;

        let embeds = match &config.embed_servers_file {
            Some(path) => EmbedTable::from_file(path)?,
            None => EmbedTable::builtin(),
        };
        tracing::info!(servers = embeds.servers.len(), "Embed table loaded");

        let catalog = Catalog::new(Arc::new(TmdbProvider::from_config(config)));
        let orchestrator = Orchestrator::new(
            catalog,
            Arc::new(bookmarks),
            Arc::new(embeds),
            config.connecting_delay(),
        );

        let recommendations =
            RecommendationService::new(Arc::new(GeminiModel::from_config(config)));

        Ok(Self::new(
            orchestrator,
            Arc::new(Assistant::new(recommendations)),
            Arc::new(NotificationCenter::default()),
        ))
    }
}
