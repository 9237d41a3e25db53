use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod fallback;
pub mod tmdb;

const SHORT_DESCRIPTION_LIMIT: usize = 160;

/// Whether a catalog entry is a film or a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// Path segment TMDB uses for this kind
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// Normalized movie or series record used everywhere past the provider boundary
///
/// Ids are only unique within one fetched batch: assistant-generated items mint
/// synthetic ids that may collide with catalog ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub thumbnail_url: String,
    pub cover_url: String,
    /// At most three labels, most relevant first
    pub genre: Vec<String>,
    pub year: i32,
    /// 0..=100
    pub match_score: u8,
    pub rating: String,
    pub duration: String,
    pub trending: bool,
    pub media_type: MediaKind,
}

impl CatalogItem {
    pub fn is_series(&self) -> bool {
        self.media_type == MediaKind::Series
    }
}

/// First sentence of `text`, capped at a card-sized length
pub fn summarize(text: &str) -> String {
    let text = text.trim();
    let sentence = match text.find(". ") {
        Some(idx) => &text[..=idx],
        None => text,
    };

    if sentence.chars().count() <= SHORT_DESCRIPTION_LIMIT {
        return sentence.to_string();
    }

    let mut short: String = sentence.chars().take(SHORT_DESCRIPTION_LIMIT - 3).collect();
    short.push_str("...");
    short
}

/// Converts a 0-10 source rating into a 0-100 match score
pub fn match_score(vote_average: f64) -> u8 {
    (vote_average * 10.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub season_number: u32,
    pub episode_count: u32,
}

/// Season and episode counts for a series, specials excluded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStructure {
    pub seasons: Vec<SeasonInfo>,
}

/// A labelled shelf of catalog items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRow {
    pub label: &'static str,
    pub items: Vec<CatalogItem>,
}

/// Browse tabs offered in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    Series,
    Films,
    New,
}

/// Top-level display mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "tab", rename_all = "snake_case")]
pub enum ViewState {
    Browse(Tab),
    Search,
    PlayerActive,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Browse(Tab::Home)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry in the assistant conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<CatalogItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_serializes_as_tmdb_names() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaKind::Series).unwrap(), "\"tv\"");
    }

    #[test]
    fn test_catalog_item_uses_camel_case() {
        let item = CatalogItem {
            id: "42".to_string(),
            title: "Arrival".to_string(),
            match_score: 79,
            media_type: MediaKind::Series,
            ..Default::default()
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["matchScore"], 79);
        assert_eq!(json["mediaType"], "tv");
        assert!(json.get("thumbnailUrl").is_some());
        assert!(json.get("shortDescription").is_some());
    }

    #[test]
    fn test_catalog_item_tolerates_partial_payload() {
        let item: CatalogItem = serde_json::from_str(r#"{"id":"7","title":"Heat"}"#).unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.media_type, MediaKind::Movie);
        assert!(item.genre.is_empty());
        assert!(!item.trending);
    }

    #[test]
    fn test_summarize_takes_first_sentence() {
        let text = "A thief steals secrets. He is offered a way out.";
        assert_eq!(summarize(text), "A thief steals secrets.");
    }

    #[test]
    fn test_summarize_caps_long_sentences() {
        let text = "é".repeat(400);
        let short = summarize(&text);
        assert_eq!(short.chars().count(), SHORT_DESCRIPTION_LIMIT);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_match_score_scales_and_clamps() {
        assert_eq!(match_score(7.86), 79);
        assert_eq!(match_score(0.0), 0);
        assert_eq!(match_score(11.0), 100);
        assert_eq!(match_score(-1.0), 0);
    }

    #[test]
    fn test_view_state_serialization() {
        let json = serde_json::to_value(ViewState::Browse(Tab::Films)).unwrap();
        assert_eq!(json["mode"], "browse");
        assert_eq!(json["tab"], "films");

        let json = serde_json::to_value(ViewState::Search).unwrap();
        assert_eq!(json["mode"], "search");
    }
}
