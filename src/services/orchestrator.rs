//! Single authority over what the catalog UI shows and which fetches are in flight.
//!
//! State lives behind a std mutex that is never held across an `.await`. Each
//! operation applies its synchronous effects before returning; the ones that also
//! talk to the network hand back a future for that part. Every future checks a
//! generation token before committing, so a response that has been superseded
//! never lands.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;

use crate::{
    db::BookmarkStore,
    error::{AppError, AppResult},
    models::{CastMember, CatalogItem, ContentRow, MediaKind, Tab, ViewState},
    services::{
        catalog::Catalog,
        player::{EmbedTable, HeadlessScreen, PlayerSession, PlayerSnapshot, ScreenControl},
        rows::{choose_featured, featured_row, row_plan, RowQuery},
    },
};

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<CatalogItem>,
    pending: bool,
    generation: u64,
}

struct DetailState {
    generation: u64,
    item: CatalogItem,
    cast: Vec<CastMember>,
    trailer_key: Option<String>,
    loaded: bool,
}

#[derive(Default)]
struct ViewModel {
    tab: Tab,
    view: ViewState,
    view_before_play: Option<ViewState>,
    loading: bool,
    batch_generation: u64,
    rows: Vec<ContentRow>,
    featured: Option<CatalogItem>,
    search: SearchState,
    detail_generation: u64,
    detail: Option<DetailState>,
    next_session_id: u64,
    player: Option<PlayerSession>,
}

impl ViewModel {
    fn begin_batch(&mut self) -> u64 {
        self.batch_generation += 1;
        self.loading = true;
        self.batch_generation
    }

    fn clear_search(&mut self) {
        self.search.generation += 1;
        self.search.query.clear();
        self.search.results.clear();
        self.search.pending = false;
    }
}

fn lock(model: &Mutex<ViewModel>) -> MutexGuard<'_, ViewModel> {
    model.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn no_player() -> AppError {
    AppError::NotFound("No title is playing".to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub pending: bool,
    pub results: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailSnapshot {
    pub item: CatalogItem,
    pub cast: Vec<CastMember>,
    pub trailer_key: Option<String>,
    pub loaded: bool,
    pub bookmarked: bool,
}

/// Everything a presentation layer needs to render the current screen
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub view: ViewState,
    pub tab: Tab,
    pub loading: bool,
    pub featured: Option<CatalogItem>,
    /// Non-empty rows only, in declared order
    pub rows: Vec<ContentRow>,
    pub search: Option<SearchSnapshot>,
    pub detail: Option<DetailSnapshot>,
    pub player: Option<PlayerSnapshot>,
    pub bookmark_count: usize,
}

/// Cheaply clonable handle; clones share state
#[derive(Clone)]
pub struct Orchestrator {
    catalog: Catalog,
    bookmarks: Arc<BookmarkStore>,
    embeds: Arc<EmbedTable>,
    screen: Arc<dyn ScreenControl>,
    connecting_delay: Duration,
    model: Arc<Mutex<ViewModel>>,
}

impl Orchestrator {
    pub fn new(
        catalog: Catalog,
        bookmarks: Arc<BookmarkStore>,
        embeds: Arc<EmbedTable>,
        connecting_delay: Duration,
    ) -> Self {
        Self {
            catalog,
            bookmarks,
            embeds,
            screen: Arc::new(HeadlessScreen),
            connecting_delay,
            model: Arc::new(Mutex::new(ViewModel::default())),
        }
    }

    pub fn with_screen(mut self, screen: Arc<dyn ScreenControl>) -> Self {
        self.screen = screen;
        self
    }

    fn model(&self) -> MutexGuard<'_, ViewModel> {
        lock(&self.model)
    }

    pub fn embeds(&self) -> &EmbedTable {
        &self.embeds
    }

    /// Switches to a browse tab, dropping any search, and refetches its rows.
    ///
    /// Re-selecting the active tab refetches as well. Ignored while a title is playing.
    pub fn set_tab(&self, tab: Tab) -> impl Future<Output = ()> + Send + 'static {
        let generation = {
            let mut model = self.model();
            if model.player.is_some() {
                tracing::debug!(?tab, "Ignoring tab change while playing");
                None
            } else {
                model.tab = tab;
                model.view = ViewState::Browse(tab);
                model.clear_search();
                Some(model.begin_batch())
            }
        };

        let this = self.clone();
        async move {
            if let Some(generation) = generation {
                this.run_batch(tab, generation).await;
            }
        }
    }

    /// Refetches all rows for `tab` without touching the view or search.
    pub fn batch_fetch(&self, tab: Tab) -> impl Future<Output = ()> + Send + 'static {
        let generation = {
            let mut model = self.model();
            if model.player.is_some() {
                tracing::debug!(?tab, "Ignoring batch fetch while playing");
                None
            } else {
                Some(model.begin_batch())
            }
        };

        let this = self.clone();
        async move {
            if let Some(generation) = generation {
                this.run_batch(tab, generation).await;
            }
        }
    }

    async fn fetch_row(&self, query: RowQuery) -> Vec<CatalogItem> {
        match query {
            RowQuery::Trending => self.catalog.trending().await,
            RowQuery::TrendingFilms => {
                let mut items = self.catalog.trending().await;
                items.retain(|item| item.media_type != MediaKind::Series);
                items
            }
            RowQuery::TopRated => self.catalog.top_rated().await,
            RowQuery::TrendingSeries => self.catalog.trending_series().await,
            RowQuery::TopRatedSeries => self.catalog.top_rated_series().await,
            RowQuery::Originals => self.catalog.featured_collection().await,
            RowQuery::Genre(id, kind) => self.catalog.by_genre(id, kind).await,
        }
    }

    async fn run_batch(&self, tab: Tab, generation: u64) {
        let plan = row_plan(tab);

        let results = join_all(plan.iter().map(|spec| self.fetch_row(spec.query))).await;

        let rows: Vec<ContentRow> = plan
            .iter()
            .zip(results)
            .map(|(spec, items)| ContentRow {
                label: spec.label,
                items,
            })
            .collect();

        let featured = choose_featured(&rows, featured_row(tab));

        let mut model = self.model();
        if model.batch_generation != generation {
            tracing::debug!(?tab, generation, "Discarding superseded batch");
            return;
        }

        tracing::info!(
            ?tab,
            filled_rows = rows.iter().filter(|r| !r.items.is_empty()).count(),
            featured = featured.as_ref().map(|f| f.title.as_str()).unwrap_or("none"),
            "Browse batch loaded"
        );

        model.rows = rows;
        model.featured = featured;
        model.loading = false;
    }

    /// Runs a free-text search, or leaves search mode when the text is blank.
    ///
    /// Clearing is synchronous. A non-blank query enters search mode immediately;
    /// its results are committed only if no newer search or clear happened meanwhile.
    pub fn search(&self, query: &str) -> impl Future<Output = ()> + Send + 'static {
        let trimmed = query.trim().to_string();

        let generation = {
            let mut model = self.model();
            if model.player.is_some() {
                tracing::debug!("Ignoring search while playing");
                None
            } else if trimmed.is_empty() {
                model.clear_search();
                model.view = ViewState::Browse(model.tab);
                None
            } else {
                model.search.generation += 1;
                model.search.query = query.to_string();
                model.search.pending = true;
                model.view = ViewState::Search;
                Some(model.search.generation)
            }
        };

        let this = self.clone();
        async move {
            let Some(generation) = generation else {
                return;
            };

            let results = this.catalog.search(&trimmed).await;

            let mut model = this.model();
            if model.search.generation != generation {
                tracing::debug!(query = %trimmed, "Discarding superseded search results");
                return;
            }
            model.search.results = results;
            model.search.pending = false;
        }
    }

    /// Opens the details overlay for `item` and loads its cast and trailer.
    ///
    /// Does not affect a playing title.
    pub fn select_item(&self, item: CatalogItem) -> impl Future<Output = ()> + Send + 'static {
        let generation = {
            let mut model = self.model();
            model.detail_generation += 1;
            let generation = model.detail_generation;
            model.detail = Some(DetailState {
                generation,
                item: item.clone(),
                cast: Vec::new(),
                trailer_key: None,
                loaded: false,
            });
            generation
        };

        let this = self.clone();
        async move {
            let (cast, trailer_key) = tokio::join!(
                this.catalog.cast(&item.id, item.media_type),
                this.catalog.trailer_key(&item.id, item.media_type)
            );

            let mut model = this.model();
            match model.detail.as_mut() {
                Some(detail) if detail.generation == generation => {
                    detail.cast = cast;
                    detail.trailer_key = trailer_key;
                    detail.loaded = true;
                }
                _ => tracing::debug!(id = %item.id, "Details closed or replaced before loading"),
            }
        }
    }

    pub fn close_detail(&self) {
        let mut model = self.model();
        model.detail = None;
    }

    /// Takes over the screen with the watch view for `item`.
    ///
    /// Always closes the details overlay, even when it shows a different title.
    pub fn play(&self, item: CatalogItem) {
        let Some(server) = self.embeds.default_server().cloned() else {
            tracing::warn!("Embed table has no servers, cannot play");
            return;
        };

        let item_id = item.id.clone();
        let fetch_structure = item.is_series();

        let session_id = {
            let mut model = self.model();
            if model.player.is_none() {
                model.view_before_play = Some(model.view);
            }
            model.view = ViewState::PlayerActive;
            model.detail = None;
            model.next_session_id += 1;
            let session_id = model.next_session_id;

            tracing::info!(id = %item.id, title = %item.title, server = %server.id, "Playback started");

            model.player = Some(PlayerSession::new(session_id, item, server));
            self.arm_connect_timer(&mut model);
            session_id
        };

        if fetch_structure {
            let this = self.clone();
            tokio::spawn(async move {
                let structure = this.catalog.series_structure(&item_id).await;
                if structure.seasons.is_empty() {
                    return;
                }

                let mut model = this.model();
                if let Some(session) = model.player.as_mut().filter(|s| s.id == session_id) {
                    session.structure = Some(structure);
                }
            });
        }
    }

    /// Leaves the watch view and restores whatever view preceded `play`.
    ///
    /// Fullscreen is exited before any state is cleared.
    pub fn back(&self) {
        let fullscreen = match self.model().player.as_ref() {
            Some(session) => session.fullscreen,
            None => return,
        };

        if fullscreen {
            self.screen.exit_fullscreen();
        }

        let mut model = self.model();
        if let Some(mut session) = model.player.take() {
            session.cancel_timer();
        }
        let restored = model
            .view_before_play
            .take()
            .unwrap_or(ViewState::Browse(model.tab));
        model.view = restored;

        tracing::info!(view = ?restored, "Playback closed");
    }

    fn arm_connect_timer(&self, model: &mut ViewModel) {
        let Some(session) = model.player.as_mut() else {
            return;
        };

        let key = session.connect_key();
        let shared = self.model.clone();
        let delay = self.connecting_delay;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut model = lock(&shared);
            if let Some(session) = model.player.as_mut() {
                if session.mark_ready(&key) {
                    tracing::debug!(session = session.id, "Player ready");
                }
            }
        });

        session.arm_timer(timer);
    }

    fn player_snapshot(&self, model: &ViewModel) -> AppResult<PlayerSnapshot> {
        model
            .player
            .as_ref()
            .map(|session| session.snapshot(&self.embeds))
            .ok_or_else(no_player)
    }

    pub fn player(&self) -> AppResult<PlayerSnapshot> {
        let model = self.model();
        self.player_snapshot(&model)
    }

    pub fn select_server(&self, server_id: &str) -> AppResult<PlayerSnapshot> {
        let server = self
            .embeds
            .server(server_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Unknown server: {}", server_id)))?;

        let mut model = self.model();
        let session = model.player.as_mut().ok_or_else(no_player)?;
        if session.select_server(server) {
            self.arm_connect_timer(&mut model);
        }
        self.player_snapshot(&model)
    }

    pub fn select_season(&self, season: u32) -> AppResult<PlayerSnapshot> {
        let mut model = self.model();
        let session = model.player.as_mut().ok_or_else(no_player)?;

        if !session.has_season(season) {
            return Err(AppError::InvalidInput(format!(
                "Season {} is not available",
                season
            )));
        }

        if session.select_season(season) {
            self.arm_connect_timer(&mut model);
        }
        self.player_snapshot(&model)
    }

    pub fn select_episode(&self, episode: u32) -> AppResult<PlayerSnapshot> {
        let mut model = self.model();
        let session = model.player.as_mut().ok_or_else(no_player)?;

        if episode == 0 || episode > session.episode_count() {
            return Err(AppError::InvalidInput(format!(
                "Episode must be between 1 and {}",
                session.episode_count()
            )));
        }

        if session.select_episode(episode) {
            self.arm_connect_timer(&mut model);
        }
        self.player_snapshot(&model)
    }

    pub fn set_fullscreen(&self, enabled: bool) -> AppResult<PlayerSnapshot> {
        let mut model = self.model();
        let session = model.player.as_mut().ok_or_else(no_player)?;
        session.fullscreen = enabled;
        self.player_snapshot(&model)
    }

    /// Returns whether `item` is bookmarked after the toggle.
    pub async fn toggle_bookmark(&self, item: CatalogItem) -> bool {
        self.bookmarks.toggle(item).await
    }

    pub async fn bookmarks(&self) -> Vec<CatalogItem> {
        self.bookmarks.list().await
    }

    pub fn view(&self) -> ViewState {
        self.model().view
    }

    pub fn is_loading(&self) -> bool {
        self.model().loading
    }

    pub fn is_playing(&self) -> bool {
        self.model().player.is_some()
    }

    pub fn featured(&self) -> Option<CatalogItem> {
        self.model().featured.clone()
    }

    /// All row slots of the last committed batch, empty ones included
    pub fn rows(&self) -> Vec<ContentRow> {
        self.model().rows.clone()
    }

    pub fn search_results(&self) -> Vec<CatalogItem> {
        self.model().search.results.clone()
    }

    pub fn selected(&self) -> Option<CatalogItem> {
        self.model().detail.as_ref().map(|d| d.item.clone())
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let mut snapshot = {
            let model = self.model();

            let search = if model.search.query.trim().is_empty() {
                None
            } else {
                Some(SearchSnapshot {
                    query: model.search.query.clone(),
                    pending: model.search.pending,
                    results: model.search.results.clone(),
                })
            };

            ViewSnapshot {
                view: model.view,
                tab: model.tab,
                loading: model.loading,
                featured: model.featured.clone(),
                rows: model
                    .rows
                    .iter()
                    .filter(|r| !r.items.is_empty())
                    .cloned()
                    .collect(),
                search,
                detail: model.detail.as_ref().map(|d| DetailSnapshot {
                    item: d.item.clone(),
                    cast: d.cast.clone(),
                    trailer_key: d.trailer_key.clone(),
                    loaded: d.loaded,
                    bookmarked: false,
                }),
                player: model.player.as_ref().map(|s| s.snapshot(&self.embeds)),
                bookmark_count: 0,
            }
        };

        if let Some(detail) = snapshot.detail.as_mut() {
            detail.bookmarked = self.bookmarks.contains(&detail.item.id).await;
        }
        snapshot.bookmark_count = self.bookmarks.len().await;

        snapshot
    }
}
