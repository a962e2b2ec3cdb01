#![allow(dead_code)]

use hyoka::domain::entities::AnimeRecord;
use hyoka::domain::value_objects::{AnimeStatus, AnimeType};

/// Builder for test records; only the fields a test cares about get set.
pub struct RecordFactory {
    record: AnimeRecord,
}

impl RecordFactory {
    pub fn new(title: &str) -> Self {
        Self {
            record: AnimeRecord {
                title: title.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn mal_id(mut self, id: u32) -> Self {
        self.record.mal_id = Some(id);
        self
    }

    pub fn anilist_id(mut self, id: u32) -> Self {
        self.record.anilist_id = Some(id);
        self
    }

    pub fn anime_type(mut self, anime_type: AnimeType) -> Self {
        self.record.anime_type = anime_type;
        self
    }

    pub fn status(mut self, status: AnimeStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    pub fn episodes(mut self, episodes: u32) -> Self {
        self.record.episodes = Some(episodes);
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.record.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn studios(mut self, studios: &[&str]) -> Self {
        self.record.studios = studios.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.record.score = Some(score);
        self
    }

    pub fn scored_by(mut self, scored_by: u64) -> Self {
        self.record.scored_by = Some(scored_by);
        self
    }

    pub fn members(mut self, members: u64) -> Self {
        self.record.members = Some(members);
        self
    }

    pub fn score_anilist(mut self, score: f64) -> Self {
        self.record.score_anilist = Some(score);
        self
    }

    pub fn popularity_anilist(mut self, popularity: u64) -> Self {
        self.record.popularity_anilist = Some(popularity);
        self
    }

    pub fn title_romaji(mut self, romaji: &str) -> Self {
        self.record.title_romaji = Some(romaji.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.record.url = Some(url.to_string());
        self
    }

    pub fn url_anilist(mut self, url: &str) -> Self {
        self.record.url_anilist = Some(url.to_string());
        self
    }

    pub fn build(self) -> AnimeRecord {
        self.record
    }
}

/// A scored MAL-side record in one call.
pub fn mal_record(title: &str, mal_id: u32, score: f64, scored_by: u64) -> AnimeRecord {
    RecordFactory::new(title)
        .mal_id(mal_id)
        .score(score)
        .scored_by(scored_by)
        .build()
}

/// An AniList-side record carrying a cross-reference to MAL.
pub fn anilist_record(
    title: &str,
    anilist_id: u32,
    mal_ref: Option<u32>,
    score: f64,
    popularity: u64,
) -> AnimeRecord {
    let mut record = RecordFactory::new(title)
        .anilist_id(anilist_id)
        .score_anilist(score)
        .popularity_anilist(popularity)
        .build();
    record.mal_id = mal_ref;
    record
}
