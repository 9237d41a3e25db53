//! Local titles used when the assistant has no model credentials.

use super::{summarize, CatalogItem, MediaKind};

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    seed: &'static str,
    genre: &'static [&'static str],
    year: i32,
    rating: &'static str,
    duration: &'static str,
    match_score: u8,
    trending: bool,
    media_type: MediaKind,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        title: "Interstellar Horizons",
        description: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival. A visual masterpiece of time and space.",
        seed: "interstellar",
        genre: &["Sci-Fi", "Adventure"],
        year: 2024,
        rating: "PG-13",
        duration: "2h 49m",
        match_score: 98,
        trending: true,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "2",
        title: "Cyber Punk City",
        description: "In a dystopic future, a mercenary outlaw seeks a one-of-a-kind implant that is the key to immortality.",
        seed: "cyberpunk",
        genre: &["Sci-Fi", "Action"],
        year: 2023,
        rating: "R",
        duration: "2h 15m",
        match_score: 95,
        trending: true,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "3",
        title: "The Last Kingdom",
        description: "As Alfred the Great defends his kingdom from Norse invaders, Uhtred, born a Saxon but raised by Vikings, seeks to claim his ancestral birthright.",
        seed: "kingdom",
        genre: &["Action", "Drama"],
        year: 2022,
        rating: "TV-MA",
        duration: "5 Seasons",
        match_score: 92,
        trending: false,
        media_type: MediaKind::Series,
    },
    Entry {
        id: "4",
        title: "Silent Echoes",
        description: "A deaf writer who retreated into the woods to live a solitary life must fight for her life in silence when a masked killer appears at her window.",
        seed: "horror",
        genre: &["Thriller", "Horror"],
        year: 2023,
        rating: "R",
        duration: "1h 30m",
        match_score: 88,
        trending: false,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "5",
        title: "Ocean Blue",
        description: "A groundbreaking documentary exploring the deepest parts of the world's oceans and the strange creatures that inhabit them.",
        seed: "ocean",
        genre: &["Documentary"],
        year: 2024,
        rating: "G",
        duration: "1h 45m",
        match_score: 85,
        trending: false,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "6",
        title: "Neon Racer",
        description: "An underground racer gets pulled into a high-stakes heist driving the fastest cars in the neon-lit streets of Tokyo.",
        seed: "racer",
        genre: &["Action", "Crime"],
        year: 2021,
        rating: "PG-13",
        duration: "2h 10m",
        match_score: 89,
        trending: false,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "7",
        title: "Medieval Mystery",
        description: "A detective story set in the 14th century.",
        seed: "medieval",
        genre: &["Drama", "Mystery"],
        year: 2020,
        rating: "R",
        duration: "2h 05m",
        match_score: 78,
        trending: false,
        media_type: MediaKind::Movie,
    },
    Entry {
        id: "8",
        title: "Space Cadets",
        description: "A group of misfits join the space academy.",
        seed: "space",
        genre: &["Comedy", "Sci-Fi"],
        year: 2023,
        rating: "PG",
        duration: "1h 55m",
        match_score: 82,
        trending: false,
        media_type: MediaKind::Movie,
    },
];

/// The bundled fallback titles
pub fn fallback_titles() -> Vec<CatalogItem> {
    ENTRIES
        .iter()
        .map(|e| CatalogItem {
            id: e.id.to_string(),
            title: e.title.to_string(),
            description: e.description.to_string(),
            short_description: summarize(e.description),
            thumbnail_url: format!("https://picsum.photos/seed/{}/400/600", e.seed),
            cover_url: format!("https://picsum.photos/seed/{}-wide/1920/1080", e.seed),
            genre: e.genre.iter().map(|g| g.to_string()).collect(),
            year: e.year,
            rating: e.rating.to_string(),
            duration: e.duration.to_string(),
            match_score: e.match_score,
            trending: e.trending,
            media_type: e.media_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_ids_are_unique() {
        let titles = fallback_titles();
        let ids: HashSet<_> = titles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(titles.len(), 8);
        assert_eq!(ids.len(), titles.len());
    }

    #[test]
    fn test_fallback_images_use_seed() {
        let titles = fallback_titles();
        assert_eq!(titles[0].thumbnail_url, "https://picsum.photos/seed/interstellar/400/600");
        assert_eq!(titles[0].cover_url, "https://picsum.photos/seed/interstellar-wide/1920/1080");
    }
}
