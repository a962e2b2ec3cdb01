use std::path::PathBuf;

use clap::Parser;

use crate::application::{FetchCriteria, PipelineConfig, ScoringMode};
use crate::domain::services::{FilterCriteria, ScoringConfig};
use crate::domain::value_objects::{AnimeStatus, AnimeType};

/// Hyoka — Bayesian anime ranking across MyAnimeList and AniList.
///
/// Fetches titles from one or both catalog sources, snapshots them to CSV,
/// and ranks them with a vote-aware Bayesian score. `--interactive` opens a
/// line-oriented parameter collector instead of taking everything from flags.
#[derive(Parser, Debug)]
#[command(
    name = "hyoka",
    about = "Bayesian anime ranking across MyAnimeList and AniList",
    version
)]
pub struct CliArgs {
    /// Title keyword search.
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Type filter: tv, movie, ova, special, ona, music.
    #[arg(long = "type", value_parser = parse_anime_type)]
    pub anime_type: Option<AnimeType>,

    /// Status filter: airing, complete, upcoming.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<AnimeStatus>,

    /// Start year (inclusive).
    #[arg(long)]
    pub year_from: Option<i32>,

    /// End year (inclusive).
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Minimum score (0-10).
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Minimum number of voters.
    #[arg(long)]
    pub min_voters: Option<u64>,

    /// Match any of these genres; names or MAL ids, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub any_genres: Option<Vec<String>>,

    /// Must include all of these genres; names or MAL ids, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub all_genres: Option<Vec<String>>,

    /// Items per page (1-25 on the primary source).
    #[arg(long, default_value_t = 25)]
    pub page_size: u32,

    /// Maximum pages to fetch per source.
    #[arg(long, default_value_t = 5)]
    pub max_pages: u32,

    /// Safe-for-work only (filters R+/Rx).
    #[arg(long)]
    pub sfw: bool,

    /// Skip fetching; rank the local CSV snapshot only.
    #[arg(long)]
    pub no_fetch: bool,

    /// CSV snapshot path.
    #[arg(long, default_value = "data/anime_cache.csv")]
    pub csv: PathBuf,

    /// Bayesian prior weight m; defaults per dataset when omitted.
    #[arg(long)]
    pub prior_weight: Option<f64>,

    /// How many rows to render.
    #[arg(long, default_value_t = 20)]
    pub top_k: usize,

    /// Scoring mode: bayesian, recommend, consensus.
    #[arg(long, default_value = "bayesian", value_parser = parse_mode)]
    pub mode: ScoringMode,

    /// AniList popularity-to-pseudo-votes factor (consensus mode).
    #[arg(long, default_value_t = 0.30)]
    pub alpha: f64,

    /// Popularity boost weight (recommend mode).
    #[arg(long, default_value_t = 0.20)]
    pub pop_weight: f64,

    /// Recency boost weight (recommend mode).
    #[arg(long, default_value_t = 0.10)]
    pub recency_weight: f64,

    /// Collect parameters interactively before running.
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

fn parse_anime_type(s: &str) -> Result<AnimeType, String> {
    match AnimeType::from(s) {
        AnimeType::Unknown => Err(format!(
            "unknown type '{}', expected tv, movie, ova, special, ona or music",
            s
        )),
        parsed => Ok(parsed),
    }
}

fn parse_status(s: &str) -> Result<AnimeStatus, String> {
    match AnimeStatus::from(s) {
        AnimeStatus::Unknown => Err(format!(
            "unknown status '{}', expected airing, complete or upcoming",
            s
        )),
        parsed => Ok(parsed),
    }
}

fn parse_mode(s: &str) -> Result<ScoringMode, String> {
    s.parse::<ScoringMode>().map_err(|e| e.to_string())
}

/// The full mutable parameter set of one run. Flags populate it; the
/// interactive collector edits it in place.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub query: String,
    pub anime_type: Option<AnimeType>,
    pub status: Option<AnimeStatus>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_score: Option<f64>,
    pub min_scored_by: Option<u64>,
    pub any_genres: Option<Vec<String>>,
    pub all_genres: Option<Vec<String>>,
    pub page_size: u32,
    pub max_pages: u32,
    pub sfw: bool,
    pub no_fetch: bool,
    pub csv_path: PathBuf,
    pub prior_weight: Option<f64>,
    pub top_k: usize,
    pub mode: ScoringMode,
    pub alpha: f64,
    pub pop_weight: f64,
    pub recency_weight: f64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            anime_type: None,
            status: None,
            year_from: None,
            year_to: None,
            min_score: None,
            min_scored_by: None,
            any_genres: None,
            all_genres: None,
            page_size: 25,
            max_pages: 5,
            sfw: false,
            no_fetch: false,
            csv_path: PathBuf::from("data/anime_cache.csv"),
            prior_weight: None,
            top_k: 20,
            mode: ScoringMode::Bayesian,
            alpha: 0.30,
            pop_weight: 0.20,
            recency_weight: 0.10,
        }
    }
}

impl RunParams {
    pub fn into_pipeline_config(self) -> PipelineConfig {
        PipelineConfig {
            fetch: FetchCriteria {
                query: (!self.query.is_empty()).then(|| self.query.clone()),
                anime_type: self.anime_type,
                status: self.status,
                year_from: self.year_from,
                year_to: self.year_to,
                min_score: self.min_score,
                page_size: self.page_size,
                max_pages: self.max_pages,
                sfw: self.sfw,
            },
            filter: FilterCriteria {
                anime_type: self.anime_type,
                status: self.status,
                year_from: self.year_from,
                year_to: self.year_to,
                min_score: self.min_score,
                min_scored_by: self.min_scored_by,
                any_genres: self.any_genres,
                all_genres: self.all_genres,
            },
            mode: self.mode,
            scoring: ScoringConfig {
                prior_weight: self.prior_weight,
                alpha_popularity: self.alpha,
                pop_weight: self.pop_weight,
                recency_weight: self.recency_weight,
            },
            csv_path: self.csv_path,
            no_fetch: self.no_fetch,
            top_k: self.top_k,
        }
    }
}

impl From<&CliArgs> for RunParams {
    fn from(args: &CliArgs) -> Self {
        Self {
            query: args.query.clone().unwrap_or_default(),
            anime_type: args.anime_type,
            status: args.status,
            year_from: args.year_from,
            year_to: args.year_to,
            min_score: args.min_score,
            min_scored_by: args.min_voters,
            any_genres: args.any_genres.clone(),
            all_genres: args.all_genres.clone(),
            page_size: args.page_size,
            max_pages: args.max_pages,
            sfw: args.sfw,
            no_fetch: args.no_fetch,
            csv_path: args.csv.clone(),
            prior_weight: args.prior_weight,
            top_k: args.top_k,
            mode: args.mode,
            alpha: args.alpha,
            pop_weight: args.pop_weight,
            recency_weight: args.recency_weight,
        }
    }
}
