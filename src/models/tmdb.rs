//! Raw TMDB payloads and their normalization into [`CatalogItem`] and friends.
//!
//! Nothing outside the provider layer should see these types.

use chrono::{Datelike, Utc};
use serde::Deserialize;

use super::{match_score, summarize, CastMember, CatalogItem, MediaKind, SeasonInfo, SeriesStructure};

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/400x600?text=No+Image";
pub const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/1920x1080?text=No+Image";

const NO_DESCRIPTION: &str = "No description available.";
const MAX_GENRES: usize = 3;
const MAX_CAST: usize = 10;

/// Maps a TMDB genre id to its display label. Unknown ids become "General".
pub fn genre_label(id: u32) -> &'static str {
    match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Sci-Fi",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        // TV only
        10759 => "Action & Adventure",
        10762 => "Kids",
        10763 => "News",
        10764 => "Reality",
        10765 => "Sci-Fi & Fantasy",
        10766 => "Soap",
        10767 => "Talk",
        10768 => "War & Politics",
        _ => "General",
    }
}

/// Envelope shared by list, discover and search endpoints
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// One entry of a list/discover/search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn year_of(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

impl TmdbResult {
    /// Media kind as reported, or inferred from the presence of a first-air date
    pub fn media_kind(&self) -> MediaKind {
        match self.media_type.as_deref() {
            Some("tv") => MediaKind::Series,
            Some("movie") => MediaKind::Movie,
            _ if self.first_air_date.as_deref().is_some_and(|d| !d.is_empty()) => {
                MediaKind::Series
            }
            _ => MediaKind::Movie,
        }
    }

    /// True for the entries multi-search should keep (drops people)
    pub fn is_title(&self) -> bool {
        matches!(self.media_type.as_deref(), Some("movie") | Some("tv"))
    }

    pub fn into_catalog_item(self, image_base: &str) -> CatalogItem {
        let media_type = self.media_kind();

        let genre = match &self.genre_ids {
            Some(ids) => ids
                .iter()
                .take(MAX_GENRES)
                .map(|id| genre_label(*id).to_string())
                .collect(),
            None => vec!["Unknown".to_string()],
        };

        let release = non_empty(self.release_date.clone()).or(non_empty(self.first_air_date.clone()));
        let year = year_of(release.as_deref()).unwrap_or_else(|| Utc::now().year());

        let description = non_empty(self.overview).unwrap_or_else(|| NO_DESCRIPTION.to_string());

        CatalogItem {
            id: self.id.to_string(),
            title: non_empty(self.title)
                .or(non_empty(self.name))
                .unwrap_or_else(|| "Untitled".to_string()),
            short_description: summarize(&description),
            description,
            thumbnail_url: non_empty(self.poster_path)
                .map(|p| format!("{}{}", image_base, p))
                .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string()),
            cover_url: non_empty(self.backdrop_path)
                .map(|p| format!("{}{}", image_base, p))
                .unwrap_or_else(|| BACKDROP_PLACEHOLDER.to_string()),
            genre,
            year,
            match_score: match_score(self.vote_average.unwrap_or(0.0)),
            rating: if self.adult { "R" } else { "PG-13" }.to_string(),
            // List endpoints carry no runtime
            duration: "2h".to_string(),
            trending: false,
            media_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCastEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl TmdbCredits {
    /// Top-billed cast with profile paths resolved against `profile_base`
    pub fn into_cast(self, profile_base: &str) -> Vec<CastMember> {
        self.cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                id: c.id,
                name: c.name,
                character: c.character,
                profile_url: c.profile_path.map(|p| format!("{}{}", profile_base, p)),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

impl TmdbVideos {
    /// YouTube trailer, else teaser, else any YouTube video
    pub fn trailer_key(self) -> Option<String> {
        let youtube: Vec<TmdbVideo> = self
            .results
            .into_iter()
            .filter(|v| v.site == "YouTube")
            .collect();

        let pick = youtube
            .iter()
            .position(|v| v.video_type == "Trailer")
            .or_else(|| youtube.iter().position(|v| v.video_type == "Teaser"))
            .or(if youtube.is_empty() { None } else { Some(0) })?;

        youtube.into_iter().nth(pick).map(|v| v.key)
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbSeriesDetails {
    #[serde(default)]
    pub seasons: Vec<TmdbSeason>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSeason {
    pub season_number: i64,
    #[serde(default)]
    pub episode_count: u32,
}

impl From<TmdbSeriesDetails> for SeriesStructure {
    fn from(details: TmdbSeriesDetails) -> Self {
        let seasons = details
            .seasons
            .into_iter()
            .filter(|s| s.season_number > 0)
            .map(|s| SeasonInfo {
                season_number: s.season_number as u32,
                episode_count: s.episode_count,
            })
            .collect();

        SeriesStructure { seasons }
    }
}
