//! Which shelves each browse tab shows and where its hero item comes from.

use rand::seq::SliceRandom;

use crate::models::{CatalogItem, ContentRow, MediaKind, Tab};

/// Rows fetched per browse batch
pub const ROW_COUNT: usize = 8;

/// One catalog query backing a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowQuery {
    Trending,
    /// Trending with series removed
    TrendingFilms,
    TopRated,
    TrendingSeries,
    TopRatedSeries,
    Originals,
    Genre(u32, MediaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec {
    pub label: &'static str,
    pub query: RowQuery,
}

const fn row(label: &'static str, query: RowQuery) -> RowSpec {
    RowSpec { label, query }
}

const HOME_ROWS: [RowSpec; ROW_COUNT] = [
    row("Trending Now", RowQuery::Trending),
    row("Top Rated", RowQuery::TopRated),
    row("Netflix Originals", RowQuery::Originals),
    row("Action Thrillers", RowQuery::Genre(28, MediaKind::Movie)),
    row("Sci-Fi & Fantasy", RowQuery::Genre(878, MediaKind::Movie)),
    row("Comedies", RowQuery::Genre(35, MediaKind::Movie)),
    row("Horror", RowQuery::Genre(27, MediaKind::Movie)),
    row("Romance", RowQuery::Genre(10749, MediaKind::Movie)),
];

const SERIES_ROWS: [RowSpec; ROW_COUNT] = [
    row("Trending TV Shows", RowQuery::TrendingSeries),
    row("Top Rated TV", RowQuery::TopRatedSeries),
    row("Netflix Originals", RowQuery::Originals),
    row("Action & Adventure", RowQuery::Genre(10759, MediaKind::Series)),
    row("Sci-Fi & Fantasy", RowQuery::Genre(10765, MediaKind::Series)),
    row("TV Comedies", RowQuery::Genre(35, MediaKind::Series)),
    row("TV Dramas", RowQuery::Genre(18, MediaKind::Series)),
    row("Documentaries", RowQuery::Genre(99, MediaKind::Series)),
];

const FILM_ROWS: [RowSpec; ROW_COUNT] = [
    row("Trending Movies", RowQuery::TrendingFilms),
    row("Top Rated Movies", RowQuery::TopRated),
    row("Action Thrillers", RowQuery::Genre(28, MediaKind::Movie)),
    row("Sci-Fi Blockbusters", RowQuery::Genre(878, MediaKind::Movie)),
    row("Comedies", RowQuery::Genre(35, MediaKind::Movie)),
    row("Horror", RowQuery::Genre(27, MediaKind::Movie)),
    row("Romance", RowQuery::Genre(10749, MediaKind::Movie)),
    row("Documentaries", RowQuery::Genre(99, MediaKind::Movie)),
];

/// Row slots for a tab, in display order. Row 0 is always the trending row.
pub fn row_plan(tab: Tab) -> &'static [RowSpec; ROW_COUNT] {
    match tab {
        Tab::Home | Tab::New => &HOME_ROWS,
        Tab::Series => &SERIES_ROWS,
        Tab::Films => &FILM_ROWS,
    }
}

/// Index of the row the hero item is drawn from
pub fn featured_row(tab: Tab) -> usize {
    match tab {
        Tab::Home | Tab::New | Tab::Series => 2,
        Tab::Films => 0,
    }
}

/// Random pick from the designated row, else the first trending item, else nothing
pub fn choose_featured(rows: &[ContentRow], designated: usize) -> Option<CatalogItem> {
    rows.get(designated)
        .and_then(|r| r.items.choose(&mut rand::thread_rng()).cloned())
        .or_else(|| rows.first().and_then(|r| r.items.first().cloned()))
}
