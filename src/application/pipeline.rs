use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use log::{info, warn};

use crate::application::ports::{CatalogSource, FetchCriteria};
use crate::domain::entities::AnimeRecord;
use crate::domain::services::{
    CatalogMerger, FilterCriteria, MergeReport, RecordFilter, ScoreEngine, ScoringConfig,
};
use crate::infrastructure::persistence::CsvStore;
use crate::infrastructure::render::ChartRenderer;
use crate::shared::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    Bayesian,
    Recommend,
    Consensus,
}

impl FromStr for ScoringMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bayesian" => Ok(ScoringMode::Bayesian),
            "recommend" => Ok(ScoringMode::Recommend),
            "consensus" => Ok(ScoringMode::Consensus),
            other => Err(AppError::InvalidInput(format!(
                "unknown scoring mode '{}', expected bayesian, recommend or consensus",
                other
            ))),
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScoringMode::Bayesian => "bayesian",
            ScoringMode::Recommend => "recommend",
            ScoringMode::Consensus => "consensus",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch: FetchCriteria,
    pub filter: FilterCriteria,
    pub mode: ScoringMode,
    pub scoring: ScoringConfig,
    pub csv_path: PathBuf,
    pub no_fetch: bool,
    pub top_k: usize,
}

/// What one run did at each stage, for callers and tests.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub fetched_primary: usize,
    pub fetched_secondary: usize,
    pub loaded: usize,
    pub skipped_rows: usize,
    pub filtered: usize,
    pub merge_report: Option<MergeReport>,
    pub scored: Vec<(AnimeRecord, f64)>,
}

/// Orchestrates one run: fetch (unless skipped), snapshot to CSV, load the
/// snapshot back, filter, merge when blending two sources, score, render.
pub struct RankingPipeline {
    primary: Arc<dyn CatalogSource>,
    secondary: Option<Arc<dyn CatalogSource>>,
    config: PipelineConfig,
}

impl RankingPipeline {
    pub fn new(
        primary: Arc<dyn CatalogSource>,
        secondary: Option<Arc<dyn CatalogSource>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
        }
    }

    pub async fn run(&self) -> AppResult<RunSummary> {
        let store = CsvStore::new(self.config.csv_path.clone());
        let mut summary = RunSummary::default();
        let mut secondary_rows: Vec<AnimeRecord> = Vec::new();

        if !self.config.no_fetch {
            info!("fetching from {}", self.primary.source_name());
            let primary_rows = match &self.secondary {
                Some(secondary) => {
                    info!("fetching from {}", secondary.source_name());
                    let (primary_rows, fetched_secondary) = futures::future::try_join(
                        self.primary.fetch(&self.config.fetch),
                        secondary.fetch(&self.config.fetch),
                    )
                    .await?;
                    secondary_rows = fetched_secondary;
                    primary_rows
                }
                None => self.primary.fetch(&self.config.fetch).await?,
            };
            summary.fetched_primary = primary_rows.len();
            summary.fetched_secondary = secondary_rows.len();
            let saved = store.save(&primary_rows)?;
            info!("saved {} rows to {}", saved, self.config.csv_path.display());
        } else {
            info!("skipping fetch, loading snapshot only");
        }

        // Primary rows always flow from the snapshot, so a no-fetch run sees
        // exactly what the last fetch saw.
        let (rows, load_report) = store.load()?;
        if load_report.malformed_fields > 0 {
            warn!(
                "{} malformed field(s) treated as absent while loading {}",
                load_report.malformed_fields,
                self.config.csv_path.display()
            );
        }
        summary.loaded = load_report.loaded;
        summary.skipped_rows = load_report.skipped;
        if rows.is_empty() {
            info!("no rows loaded, nothing to rank");
            return Ok(summary);
        }

        let filter = RecordFilter::new(self.config.filter.clone())?;
        let filtered = filter.apply(rows);
        summary.filtered = filtered.len();
        info!("filtered: {} rows", filtered.len());

        let engine = ScoreEngine::new(self.config.scoring.clone())?;
        let scored = match self.config.mode {
            ScoringMode::Bayesian => engine.score_bayesian(&filtered),
            ScoringMode::Recommend => engine.score_recommendation(&filtered),
            ScoringMode::Consensus => {
                let outcome = CatalogMerger::new().merge(filtered, secondary_rows);
                let report = &outcome.report;
                info!(
                    "merged: {} rows ({} enriched, {} appended, {} duplicates dropped)",
                    outcome.records.len(),
                    report.enriched,
                    report.appended,
                    report.duplicates_dropped
                );
                if report.cross_ref_collisions > 0 {
                    warn!(
                        "{} duplicate cross-reference id(s) resolved last-write-wins",
                        report.cross_ref_collisions
                    );
                }
                let scored = engine.score_consensus(&outcome.records);
                summary.merge_report = Some(outcome.report);
                scored
            }
        };
        summary.scored = scored;

        let renderer = ChartRenderer::new(self.config.top_k);
        renderer.render(&summary.scored, &self.headline());

        Ok(summary)
    }

    /// Chart headline assembled from the active criteria.
    fn headline(&self) -> String {
        let fetch = &self.config.fetch;
        let filter = &self.config.filter;
        let mut bits: Vec<String> = Vec::new();
        if let Some(query) = &fetch.query {
            if !query.is_empty() {
                bits.push(format!("q=\"{}\"", query));
            }
        }
        if let Some(anime_type) = filter.anime_type {
            bits.push(anime_type.to_string().to_uppercase());
        }
        if let Some(status) = filter.status {
            bits.push(status.to_string());
        }
        if filter.year_from.is_some() || filter.year_to.is_some() {
            bits.push(format!(
                "{}-{}",
                filter.year_from.map(|y| y.to_string()).unwrap_or_default(),
                filter.year_to.map(|y| y.to_string()).unwrap_or_default()
            ));
        }
        if let Some(min_score) = filter.min_score {
            bits.push(format!("min_score>={}", min_score));
        }
        if let Some(min_voters) = filter.min_scored_by {
            bits.push(format!("min_votes>={}", min_voters));
        }
        if let Some(any) = &filter.any_genres {
            bits.push(format!("genres_any={}", any.join("|")));
        }

        let prefix = match self.config.mode {
            ScoringMode::Bayesian => "Anime Bayesian Ranking",
            ScoringMode::Recommend => "Anime Recommendation Ranking",
            ScoringMode::Consensus => "Anime Consensus Ranking (MAL+AniList)",
        };
        if bits.is_empty() {
            prefix.to_string()
        } else {
            format!("{} - {}", prefix, bits.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_known_names() {
        assert_eq!(
            "bayesian".parse::<ScoringMode>().unwrap(),
            ScoringMode::Bayesian
        );
        assert_eq!(
            " Consensus ".parse::<ScoringMode>().unwrap(),
            ScoringMode::Consensus
        );
        assert!(matches!(
            "turbo".parse::<ScoringMode>(),
            Err(AppError::InvalidInput(_))
        ));
    }
}
