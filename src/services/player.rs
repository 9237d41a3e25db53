//! Watch-view state: which embed server, season and episode are showing, and
//! whether the artificial connecting delay has elapsed.
//!
//! A "server" is only a named URL template for a third-party iframe. Nothing
//! here touches media.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::models::{CatalogItem, MediaKind, SeasonInfo, SeriesStructure};

/// Seasons offered when the series structure is unknown
pub const DEFAULT_SEASON_COUNT: u32 = 10;
/// Episodes offered for a season missing from the series structure
pub const DEFAULT_EPISODE_COUNT: u32 = 24;

const FALLBACK_ALIAS: &str = "vidsrc";
const FALLBACK_MOVIE_TEMPLATE: &str = "https://vidsrc.vip/embed/movie/{id}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedServer {
    pub id: String,
    pub name: String,
    /// Display badge such as "4k" or "backup"
    pub tier: String,
    /// Template key in [`EmbedTable::templates`]
    pub alias: String,
}

/// URL templates for one alias. Placeholders: `{id}`, `{season}`, `{episode}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedTemplate {
    pub movie: String,
    pub series: String,
}

/// Static server list plus the templates their aliases point at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedTable {
    pub servers: Vec<EmbedServer>,
    pub templates: HashMap<String, EmbedTemplate>,
}

fn server(id: &str, name: &str, tier: &str, alias: &str) -> EmbedServer {
    EmbedServer {
        id: id.to_string(),
        name: name.to_string(),
        tier: tier.to_string(),
        alias: alias.to_string(),
    }
}

impl Default for EmbedTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmbedTable {
    pub fn builtin() -> Self {
        let servers = vec![
            server("vidsrc-cc", "VidSrc CC", "vip", "vidsrc-cc"),
            server("vidsrc-vip", "VidSrc VIP", "premium", "vidsrc"),
            server("autoembed", "AutoEmbed", "auto", "autoembed"),
            server("vidsrc-pro", "VidSrc Pro", "4k", "vidsrc"),
            server("superembed", "SuperEmbed", "multi", "autoembed"),
            server("2embed", "2Embed", "hd", "autoembed"),
            server("vidlink", "VidLink", "fast", "autoembed"),
            server("darkness", "Darkness", "fast", "vidsrc"),
            server("mary", "Mary", "1080p", "autoembed"),
            server("xprime", "XPrime", "hd", "vidsrc"),
            server("hdtv", "HDTV", "1080p", "autoembed"),
            server("hydrax", "HydraX", "sd", "autoembed"),
            server("mp4upload", "Mp4Upload", "backup", "vidsrc"),
            server("anime-world", "AnimeWorld", "sub", "autoembed"),
            server("french-stream", "FrenchStream", "fr", "autoembed"),
            server("latino-pro", "LatinoPro", "es", "vidsrc"),
        ];

        let mut templates = HashMap::new();
        templates.insert(
            "vidsrc-cc".to_string(),
            EmbedTemplate {
                movie: "https://vidsrc.cc/v2/embed/movie/{id}".to_string(),
                series: "https://vidsrc.cc/v2/embed/tv/{id}/{season}/{episode}".to_string(),
            },
        );
        templates.insert(
            "vidsrc".to_string(),
            EmbedTemplate {
                movie: "https://vidsrc.vip/embed/movie/{id}".to_string(),
                series: "https://vidsrc.vip/embed/tv/{id}/{season}/{episode}".to_string(),
            },
        );
        templates.insert(
            "autoembed".to_string(),
            EmbedTemplate {
                movie: "https://autoembed.co/movie/tmdb/{id}".to_string(),
                series: "https://autoembed.co/tv/tmdb/{id}-{season}-{episode}".to_string(),
            },
        );

        Self { servers, templates }
    }

    /// Loads a replacement table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let table: EmbedTable = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid embed table {}: {}", path.display(), e))?;

        if table.servers.is_empty() {
            anyhow::bail!("Embed table {} lists no servers", path.display());
        }

        Ok(table)
    }

    pub fn server(&self, id: &str) -> Option<&EmbedServer> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// The server a new session starts on
    pub fn default_server(&self) -> Option<&EmbedServer> {
        self.servers.first()
    }

    /// Iframe target for `item_id` on the given alias
    pub fn embed_url(
        &self,
        alias: &str,
        item_id: &str,
        kind: MediaKind,
        season: u32,
        episode: u32,
    ) -> String {
        let template = match (self.templates.get(alias), kind) {
            (Some(t), MediaKind::Movie) => t.movie.as_str(),
            (Some(t), MediaKind::Series) => t.series.as_str(),
            (None, _) => self
                .templates
                .get(FALLBACK_ALIAS)
                .map(|t| t.movie.as_str())
                .unwrap_or(FALLBACK_MOVIE_TEMPLATE),
        };

        template
            .replace("{id}", item_id)
            .replace("{season}", &season.to_string())
            .replace("{episode}", &episode.to_string())
    }
}

/// Hook for leaving fullscreen presentation before the watch view closes
pub trait ScreenControl: Send + Sync {
    fn exit_fullscreen(&self);
}

/// Screen control for hosts without a presentation layer
pub struct HeadlessScreen;

impl ScreenControl for HeadlessScreen {
    fn exit_fullscreen(&self) {
        tracing::debug!("Fullscreen exit requested on headless screen");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerPhase {
    Connecting,
    Ready,
}

/// Identifies one connecting phase; a timer only completes the phase it was armed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectKey {
    session: u64,
    server: String,
    season: u32,
    episode: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub item: CatalogItem,
    pub server: EmbedServer,
    pub season: u32,
    pub episode: u32,
    pub phase: PlayerPhase,
    pub fullscreen: bool,
    pub embed_url: String,
    pub season_count: u32,
    pub episode_count: u32,
    /// Selectable seasons in display order
    pub seasons: Vec<SeasonInfo>,
}

/// State of one watch view, discarded whole when the viewer goes back
pub struct PlayerSession {
    pub id: u64,
    pub item: CatalogItem,
    pub server: EmbedServer,
    pub season: u32,
    pub episode: u32,
    pub phase: PlayerPhase,
    pub structure: Option<SeriesStructure>,
    pub fullscreen: bool,
    connect_timer: Option<JoinHandle<()>>,
}

impl PlayerSession {
    pub fn new(id: u64, item: CatalogItem, server: EmbedServer) -> Self {
        Self {
            id,
            item,
            server,
            season: 1,
            episode: 1,
            phase: PlayerPhase::Connecting,
            structure: None,
            fullscreen: false,
            connect_timer: None,
        }
    }

    pub fn connect_key(&self) -> ConnectKey {
        ConnectKey {
            session: self.id,
            server: self.server.id.clone(),
            season: self.season,
            episode: self.episode,
        }
    }

    /// Returns true when the selection changed and a new connecting phase is due
    pub fn select_server(&mut self, server: EmbedServer) -> bool {
        if self.server.id == server.id {
            return false;
        }
        self.server = server;
        true
    }

    /// Switching season always restarts at episode 1
    pub fn select_season(&mut self, season: u32) -> bool {
        if self.season == season {
            return false;
        }
        self.season = season;
        self.episode = 1;
        true
    }

    pub fn select_episode(&mut self, episode: u32) -> bool {
        if self.episode == episode {
            return false;
        }
        self.episode = episode;
        true
    }

    fn known_seasons(&self) -> Option<&[SeasonInfo]> {
        self.structure
            .as_ref()
            .map(|s| s.seasons.as_slice())
            .filter(|seasons| !seasons.is_empty())
    }

    pub fn season_count(&self) -> u32 {
        self.known_seasons()
            .map(|seasons| seasons.len() as u32)
            .unwrap_or(DEFAULT_SEASON_COUNT)
    }

    /// The fetched seasons, or a numbered default range when the structure is unknown
    pub fn seasons(&self) -> Vec<SeasonInfo> {
        match self.known_seasons() {
            Some(seasons) => seasons.to_vec(),
            None => (1..=DEFAULT_SEASON_COUNT)
                .map(|season_number| SeasonInfo {
                    season_number,
                    episode_count: DEFAULT_EPISODE_COUNT,
                })
                .collect(),
        }
    }

    /// Seasons are matched by number, so gaps in the structure stay gaps
    pub fn has_season(&self, season: u32) -> bool {
        match self.known_seasons() {
            Some(seasons) => seasons.iter().any(|s| s.season_number == season),
            None => (1..=DEFAULT_SEASON_COUNT).contains(&season),
        }
    }

    pub fn episode_count(&self) -> u32 {
        self.structure
            .as_ref()
            .and_then(|s| s.seasons.iter().find(|x| x.season_number == self.season))
            .map(|s| s.episode_count)
            .unwrap_or(DEFAULT_EPISODE_COUNT)
    }

    /// Enters the connecting phase and installs the timer that will end it,
    /// aborting whichever timer was armed before.
    pub fn arm_timer(&mut self, timer: JoinHandle<()>) {
        self.cancel_timer();
        self.phase = PlayerPhase::Connecting;
        self.connect_timer = Some(timer);
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.connect_timer.take() {
            timer.abort();
        }
    }

    /// Completes the connecting phase if `key` still describes the current selection
    pub fn mark_ready(&mut self, key: &ConnectKey) -> bool {
        if *key != self.connect_key() {
            return false;
        }
        self.phase = PlayerPhase::Ready;
        self.connect_timer = None;
        true
    }

    pub fn embed_url(&self, table: &EmbedTable) -> String {
        table.embed_url(
            &self.server.alias,
            &self.item.id,
            self.item.media_type,
            self.season,
            self.episode,
        )
    }

    pub fn snapshot(&self, table: &EmbedTable) -> PlayerSnapshot {
        PlayerSnapshot {
            item: self.item.clone(),
            server: self.server.clone(),
            season: self.season,
            episode: self.episode,
            phase: self.phase,
            fullscreen: self.fullscreen,
            embed_url: self.embed_url(table),
            season_count: self.season_count(),
            episode_count: self.episode_count(),
            seasons: self.seasons(),
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeasonInfo;

    fn series(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            media_type: MediaKind::Series,
            ..Default::default()
        }
    }

    fn session_for(item: CatalogItem) -> PlayerSession {
        let table = EmbedTable::builtin();
        let server = table.default_server().cloned().unwrap();
        PlayerSession::new(1, item, server)
    }

    #[test]
    fn test_builtin_table_aliases_resolve() {
        let table = EmbedTable::builtin();
        for server in &table.servers {
            assert!(
                table.templates.contains_key(&server.alias),
                "alias {} has no template",
                server.alias
            );
        }
        assert_eq!(table.default_server().unwrap().id, "vidsrc-cc");
    }

    #[test]
    fn test_embed_urls_per_kind() {
        let table = EmbedTable::builtin();

        assert_eq!(
            table.embed_url("vidsrc-cc", "550", MediaKind::Movie, 1, 1),
            "https://vidsrc.cc/v2/embed/movie/550"
        );
        assert_eq!(
            table.embed_url("vidsrc", "1399", MediaKind::Series, 2, 5),
            "https://vidsrc.vip/embed/tv/1399/2/5"
        );
        assert_eq!(
            table.embed_url("autoembed", "1399", MediaKind::Series, 3, 7),
            "https://autoembed.co/tv/tmdb/1399-3-7"
        );
    }

    #[test]
    fn test_unknown_alias_falls_back_to_movie_template() {
        let table = EmbedTable::builtin();
        assert_eq!(
            table.embed_url("nowhere", "1399", MediaKind::Series, 2, 5),
            "https://vidsrc.vip/embed/movie/1399"
        );
    }

    #[test]
    fn test_table_from_file() {
        let path = std::env::temp_dir().join(format!("embed-table-{}.json", std::process::id()));
        let json = r#"{
            "servers": [{"id": "local", "name": "Local", "tier": "dev", "alias": "local"}],
            "templates": {"local": {"movie": "http://localhost/m/{id}", "series": "http://localhost/s/{id}/{season}/{episode}"}}
        }"#;
        std::fs::write(&path, json).unwrap();

        let table = EmbedTable::from_file(&path).unwrap();
        assert_eq!(table.servers.len(), 1);
        assert_eq!(
            table.embed_url("local", "9", MediaKind::Series, 1, 2),
            "http://localhost/s/9/1/2"
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_table_without_servers_is_rejected() {
        let path = std::env::temp_dir().join(format!("embed-empty-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"servers": [], "templates": {}}"#).unwrap();

        assert!(EmbedTable::from_file(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_season_change_resets_episode() {
        let mut session = session_for(series("1399"));
        assert!(session.select_episode(6));
        assert!(session.select_season(3));
        assert_eq!(session.season, 3);
        assert_eq!(session.episode, 1);
    }

    #[test]
    fn test_reselecting_same_values_is_not_a_change() {
        let mut session = session_for(series("1399"));
        let current = session.server.clone();

        assert!(!session.select_server(current));
        assert!(!session.select_season(1));
        assert!(!session.select_episode(1));
    }

    #[test]
    fn test_counts_fall_back_without_structure() {
        let mut session = session_for(series("1399"));
        assert_eq!(session.season_count(), DEFAULT_SEASON_COUNT);
        assert_eq!(session.episode_count(), DEFAULT_EPISODE_COUNT);

        session.structure = Some(SeriesStructure {
            seasons: vec![
                SeasonInfo { season_number: 1, episode_count: 10 },
                SeasonInfo { season_number: 2, episode_count: 8 },
            ],
        });
        session.select_season(2);
        assert_eq!(session.season_count(), 2);
        assert_eq!(session.episode_count(), 8);
    }

    #[test]
    fn test_seasons_follow_structure_numbers() {
        let mut session = session_for(series("9"));
        assert!(session.has_season(DEFAULT_SEASON_COUNT));
        assert!(!session.has_season(0));
        assert_eq!(session.seasons().len(), DEFAULT_SEASON_COUNT as usize);

        session.structure = Some(SeriesStructure {
            seasons: vec![
                SeasonInfo { season_number: 1, episode_count: 8 },
                SeasonInfo { season_number: 3, episode_count: 6 },
            ],
        });
        assert!(session.has_season(3));
        assert!(!session.has_season(2));

        let numbers: Vec<u32> = session.seasons().iter().map(|s| s.season_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_stale_key_does_not_complete_phase() {
        let mut session = session_for(series("1399"));
        let stale = session.connect_key();

        session.select_episode(2);
        assert!(!session.mark_ready(&stale));
        assert_eq!(session.phase, PlayerPhase::Connecting);

        let current = session.connect_key();
        assert!(session.mark_ready(&current));
        assert_eq!(session.phase, PlayerPhase::Ready);
    }

    #[tokio::test]
    async fn test_rearming_aborts_previous_timer() {
        let mut session = session_for(series("1399"));

        let first = tokio::spawn(std::future::pending::<()>());
        let first_abort = first.abort_handle();
        session.arm_timer(first);
        session.arm_timer(tokio::spawn(std::future::pending::<()>()));

        for _ in 0..10 {
            if first_abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(first_abort.is_finished());
    }
}
