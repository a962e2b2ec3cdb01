use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AnimeStatus, AnimeType};

/// One anime title as seen across the two catalog sources.
///
/// A record always carries at least one of `mal_id` (MyAnimeList, via Jikan)
/// or `anilist_id`; everything else is optional. The `consensus_*` fields are
/// derived and only populated by the cross-source consensus engine, on cloned
/// output records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub mal_id: Option<u32>,
    pub anilist_id: Option<u32>,

    pub title: String,
    pub title_english: Option<String>,
    pub title_romaji: Option<String>,

    pub anime_type: AnimeType,
    pub status: AnimeStatus,
    pub year: Option<i32>,
    pub episodes: Option<u32>,
    pub duration_min: Option<u32>,

    pub genres: Vec<String>,
    pub studios: Vec<String>,

    // Primary-source (MyAnimeList) popularity signals
    pub score: Option<f64>,
    pub scored_by: Option<u64>,
    pub rank: Option<u32>,
    pub popularity_rank: Option<u32>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
    pub url: Option<String>,

    // Secondary-source (AniList) popularity signals; AniList exposes no
    // explicit vote count.
    pub score_anilist: Option<f64>,
    pub popularity_anilist: Option<u64>,
    pub favourites_anilist: Option<u64>,
    pub url_anilist: Option<String>,

    // Derived by the consensus engine only
    pub consensus_score: Option<f64>,
    pub consensus_votes: Option<u64>,
}

impl AnimeRecord {
    /// Vote count treated as a scoring weight; absent counts as zero.
    pub fn vote_count(&self) -> u64 {
        self.scored_by.unwrap_or(0)
    }

    /// Title normalized for cross-source identity: lower-cased, every
    /// character outside `[a-z0-9]` stripped.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    /// Fuzzy identity key for the title+year merge path.
    pub fn identity_key(&self) -> (String, Option<i32>) {
        (self.normalized_title(), self.year)
    }

    /// Genre tokens ready for membership tests: lower-cased and trimmed.
    pub fn genre_tokens(&self) -> Vec<String> {
        self.genres
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect()
    }

    pub fn has_any_genre(&self, wanted: &[String]) -> bool {
        let tokens = self.genre_tokens();
        wanted.iter().any(|w| tokens.contains(&w.trim().to_lowercase()))
    }

    pub fn has_all_genres(&self, wanted: &[String]) -> bool {
        let tokens = self.genre_tokens();
        wanted.iter().all(|w| tokens.contains(&w.trim().to_lowercase()))
    }

    /// Copy the secondary-only fields of `other` onto `self`, used when an
    /// explicit cross-reference pairs a primary and a secondary record.
    pub fn absorb_secondary(&mut self, other: &AnimeRecord) {
        self.anilist_id = other.anilist_id;
        self.title_romaji = other.title_romaji.clone();
        self.score_anilist = other.score_anilist;
        self.popularity_anilist = other.popularity_anilist;
        self.favourites_anilist = other.favourites_anilist;
        self.url_anilist = other.url_anilist.clone();
    }
}

/// Lower-case and strip everything outside `[a-z0-9]`. Collapses punctuation
/// and spacing variants; distinct titles that normalize identically and share
/// a year will fuzz-merge, which is an accepted data-quality risk.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Deduplicate genre names case-insensitively, keeping first spelling seen.
pub fn dedup_genres(genres: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty() && seen.insert(g.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize_title("Steins;Gate 0"), "steinsgate0");
        assert_eq!(normalize_title("Re:ZERO -Starting Life-"), "rezerostartinglife");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn genre_tokens_are_trimmed_and_lowercased() {
        let record = AnimeRecord {
            genres: vec!["  Action ".to_string(), "Sci-Fi".to_string()],
            ..Default::default()
        };
        assert_eq!(record.genre_tokens(), vec!["action", "sci-fi"]);
        assert!(record.has_any_genre(&["ACTION".to_string()]));
        assert!(record.has_all_genres(&["action".to_string(), "sci-fi".to_string()]));
        assert!(!record.has_all_genres(&["action".to_string(), "drama".to_string()]));
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let genres = vec![
            "Action".to_string(),
            "action".to_string(),
            " Drama".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedup_genres(genres), vec!["Action", "Drama"]);
    }

    #[test]
    fn absorb_copies_only_secondary_fields() {
        let mut primary = AnimeRecord {
            mal_id: Some(1),
            title: "Primary".to_string(),
            score: Some(8.0),
            ..Default::default()
        };
        let secondary = AnimeRecord {
            anilist_id: Some(99),
            title: "Secondary".to_string(),
            title_romaji: Some("Sekandari".to_string()),
            score_anilist: Some(8.6),
            popularity_anilist: Some(12_000),
            ..Default::default()
        };
        primary.absorb_secondary(&secondary);
        assert_eq!(primary.anilist_id, Some(99));
        assert_eq!(primary.score_anilist, Some(8.6));
        assert_eq!(primary.title, "Primary");
        assert_eq!(primary.score, Some(8.0));
    }
}
