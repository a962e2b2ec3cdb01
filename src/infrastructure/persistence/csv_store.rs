use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use csv::StringRecord;
use log::{debug, info};

use crate::domain::entities::AnimeRecord;
use crate::domain::value_objects::{AnimeStatus, AnimeType, ParsedField};
use crate::shared::errors::AppResult;

/// Column order of the snapshot. Raw fields only; derived consensus fields
/// are never persisted.
const FIELDS: [&str; 23] = [
    "mal_id",
    "anilist_id",
    "title",
    "title_english",
    "title_romaji",
    "type",
    "status",
    "year",
    "episodes",
    "duration_min",
    "genres",
    "studios",
    "score",
    "scored_by",
    "rank",
    "popularity_rank",
    "members",
    "favorites",
    "url",
    "score_anilist",
    "popularity_anilist",
    "favourites_anilist",
    "url_anilist",
];

/// What loading a snapshot found, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Rows dropped because they carried neither source id.
    pub skipped: usize,
    /// Fields that were present but unparsable; treated as absent.
    pub malformed_fields: usize,
}

/// Flat UTF-8 snapshot of fetched records: header row of field names, one
/// record per line.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save(&self, records: &[AnimeRecord]) -> AppResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(FIELDS)?;
        for record in records {
            writer.write_record(Self::to_row(record))?;
        }
        writer.flush()?;
        info!("saved {} rows to {}", records.len(), self.path.display());
        Ok(records.len())
    }

    /// Load the snapshot, if any. Rows without either source id are skipped;
    /// malformed numeric fields are counted and treated as absent so the
    /// affected row stays loadable.
    pub fn load(&self) -> AppResult<(Vec<AnimeRecord>, LoadReport)> {
        if !self.path.exists() {
            debug!("no snapshot at {}", self.path.display());
            return Ok((Vec::new(), LoadReport::default()));
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name, idx))
            .collect();

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for row in reader.records() {
            let row = row?;
            let mut malformed = 0usize;
            let record = Self::from_row(&row, &index, &mut malformed);
            report.malformed_fields += malformed;

            if record.mal_id.is_none() && record.anilist_id.is_none() {
                report.skipped += 1;
                continue;
            }
            records.push(record);
        }

        report.loaded = records.len();
        Ok((records, report))
    }

    fn to_row(record: &AnimeRecord) -> Vec<String> {
        vec![
            opt_string(record.mal_id),
            opt_string(record.anilist_id),
            record.title.clone(),
            record.title_english.clone().unwrap_or_default(),
            record.title_romaji.clone().unwrap_or_default(),
            record.anime_type.as_str().to_string(),
            record.status.display_name().to_string(),
            opt_string(record.year),
            opt_string(record.episodes),
            opt_string(record.duration_min),
            record.genres.join(", "),
            record.studios.join(", "),
            opt_string(record.score),
            opt_string(record.scored_by),
            opt_string(record.rank),
            opt_string(record.popularity_rank),
            opt_string(record.members),
            opt_string(record.favorites),
            record.url.clone().unwrap_or_default(),
            opt_string(record.score_anilist),
            opt_string(record.popularity_anilist),
            opt_string(record.favourites_anilist),
            record.url_anilist.clone().unwrap_or_default(),
        ]
    }

    fn from_row(
        row: &StringRecord,
        index: &HashMap<&str, usize>,
        malformed: &mut usize,
    ) -> AnimeRecord {
        let raw = |name: &str| -> &str {
            index
                .get(name)
                .and_then(|&idx| row.get(idx))
                .unwrap_or("")
        };
        let text = |name: &str| -> Option<String> {
            let value = raw(name).trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        fn numeric<T: FromStr>(raw: &str, malformed: &mut usize) -> Option<T> {
            let parsed = ParsedField::<T>::parse(raw);
            if parsed.is_malformed() {
                *malformed += 1;
            }
            parsed.into_option()
        }

        let tokens = |name: &str| -> Vec<String> {
            raw(name)
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        };

        AnimeRecord {
            mal_id: numeric(raw("mal_id"), malformed),
            anilist_id: numeric(raw("anilist_id"), malformed),
            title: raw("title").trim().to_string(),
            title_english: text("title_english"),
            title_romaji: text("title_romaji"),
            anime_type: AnimeType::from(raw("type")),
            status: AnimeStatus::from(raw("status")),
            year: numeric(raw("year"), malformed),
            episodes: numeric(raw("episodes"), malformed),
            duration_min: numeric(raw("duration_min"), malformed),
            genres: tokens("genres"),
            studios: tokens("studios"),
            score: numeric(raw("score"), malformed),
            scored_by: numeric(raw("scored_by"), malformed),
            rank: numeric(raw("rank"), malformed),
            popularity_rank: numeric(raw("popularity_rank"), malformed),
            members: numeric(raw("members"), malformed),
            favorites: numeric(raw("favorites"), malformed),
            url: text("url"),
            score_anilist: numeric(raw("score_anilist"), malformed),
            popularity_anilist: numeric(raw("popularity_anilist"), malformed),
            favourites_anilist: numeric(raw("favourites_anilist"), malformed),
            url_anilist: text("url_anilist"),
            consensus_score: None,
            consensus_votes: None,
        }
    }
}

fn opt_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
