use crate::domain::entities::AnimeRecord;
use crate::shared::errors::{AppError, AppResult};

/// Bayesian shrinkage primitive shared by all three ranking variants.
///
/// Regresses a raw `score` backed by `weight` votes toward the dataset-wide
/// `center`; `prior_weight` is the weight granted to the center, so sparse
/// rows move hard while heavily-voted rows barely move.
pub fn bayesian_shrink(score: f64, weight: f64, center: f64, prior_weight: f64) -> f64 {
    (weight / (weight + prior_weight)) * score
        + (prior_weight / (weight + prior_weight)) * center
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Explicit prior weight `m`; when absent it defaults per dataset to
    /// `max(1000, median(vote counts))`.
    pub prior_weight: Option<f64>,
    /// Converts AniList popularity into pseudo-votes for the consensus blend.
    pub alpha_popularity: f64,
    /// Weight of the popularity boost in the recommendation variant.
    pub pop_weight: f64,
    /// Weight of the recency boost in the recommendation variant.
    pub recency_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            prior_weight: None,
            alpha_popularity: 0.30,
            pop_weight: 0.20,
            recency_weight: 0.10,
        }
    }
}

/// The three ranking algorithms: plain Bayesian, popularity/recency-boosted
/// recommendation, and the two-source consensus blend. Output pairs keep
/// input order; sorting is a presentation concern.
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> AppResult<Self> {
        if let Some(prior) = config.prior_weight {
            if prior <= 0.0 {
                return Err(AppError::ValidationError(format!(
                    "prior weight must be positive, got {}",
                    prior
                )));
            }
        }
        if config.alpha_popularity < 0.0 {
            return Err(AppError::ValidationError(format!(
                "alpha must not be negative, got {}",
                config.alpha_popularity
            )));
        }
        if config.pop_weight < 0.0 || config.recency_weight < 0.0 {
            return Err(AppError::ValidationError(format!(
                "boost weights must not be negative, got pop={} recency={}",
                config.pop_weight, config.recency_weight
            )));
        }
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    /// Plain Bayesian ranking. Rows without a score or without votes are
    /// excluded from the output entirely, never scored as zero.
    pub fn score_bayesian(&self, records: &[AnimeRecord]) -> Vec<(AnimeRecord, f64)> {
        let eligible = eligible_rows(records);
        if eligible.is_empty() {
            return Vec::new();
        }
        let center = weighted_center(&eligible);
        let prior = self
            .config
            .prior_weight
            .unwrap_or_else(|| default_prior(eligible.iter().map(|(_, _, n)| *n)));

        eligible
            .into_iter()
            .map(|(record, score, votes)| {
                let shrunk = bayesian_shrink(score, votes as f64, center, prior);
                (record.clone(), shrunk)
            })
            .collect()
    }

    /// Recommendation ranking: the plain shrunk score plus two additive,
    /// independently min-max-normalized boosts over the same eligible set.
    pub fn score_recommendation(&self, records: &[AnimeRecord]) -> Vec<(AnimeRecord, f64)> {
        let eligible = eligible_rows(records);
        if eligible.is_empty() {
            return Vec::new();
        }
        let center = weighted_center(&eligible);
        let prior = self
            .config
            .prior_weight
            .unwrap_or_else(|| default_prior(eligible.iter().map(|(_, _, n)| *n)));

        // log-compressed popularity, first present of members, AniList
        // popularity, then vote count; absent everywhere counts as 0
        let pop_values: Vec<Option<f64>> = eligible
            .iter()
            .map(|(record, _, _)| {
                let raw = record
                    .members
                    .or(record.popularity_anilist)
                    .or(record.scored_by)
                    .unwrap_or(0);
                Some((1.0 + raw as f64).log10())
            })
            .collect();
        let year_values: Vec<Option<f64>> = eligible
            .iter()
            .map(|(record, _, _)| record.year.map(|y| y as f64))
            .collect();

        let pop_boosts = min_max_boosts(&pop_values);
        let recency_boosts = min_max_boosts(&year_values);

        eligible
            .into_iter()
            .zip(pop_boosts.into_iter().zip(recency_boosts))
            .map(|((record, score, votes), (pop, recency))| {
                let base = bayesian_shrink(score, votes as f64, center, prior);
                let boosted = base
                    + self.config.pop_weight * pop
                    + self.config.recency_weight * recency;
                (record.clone(), boosted)
            })
            .collect()
    }

    /// Cross-source consensus ranking over merged records.
    ///
    /// Each source contributes its score with a confidence weight: the
    /// primary's vote count log-compressed, the secondary's popularity scaled
    /// by alpha into pseudo-votes. The blended score is then shrunk a second
    /// time using the combined raw vote total, so thin consensus rows cannot
    /// swing to extremes. Input records are never mutated; the derived
    /// consensus fields are written onto cloned output records.
    pub fn score_consensus(&self, records: &[AnimeRecord]) -> Vec<(AnimeRecord, f64)> {
        let mut blended: Vec<(AnimeRecord, f64, f64)> = Vec::new();

        for record in records {
            let primary_votes = record.vote_count();
            let pseudo_votes =
                self.config.alpha_popularity * record.popularity_anilist.unwrap_or(0) as f64;

            let mut parts: Vec<(f64, f64)> = Vec::new();
            if let Some(score) = record.score {
                if primary_votes > 0 {
                    parts.push((score, (1.0 + primary_votes as f64).log10()));
                }
            }
            if let Some(score) = record.score_anilist {
                if pseudo_votes > 0.0 {
                    parts.push((score, pseudo_votes));
                }
            }

            let weight_sum: f64 = parts.iter().map(|(_, w)| w).sum();
            if !parts.is_empty() && weight_sum > 0.0 {
                let blend =
                    parts.iter().map(|(s, w)| s * w).sum::<f64>() / weight_sum;
                let votes = primary_votes as f64 + pseudo_votes;
                let mut out = record.clone();
                out.consensus_score = Some(blend);
                out.consensus_votes = Some(votes.round() as u64);
                blended.push((out, blend, votes));
            } else if let Some(score) = record.score {
                // Bare primary score: floor weight of 1 keeps the row in the
                // ranking without writing consensus fields.
                blended.push((record.clone(), score, (primary_votes as f64).max(1.0)));
            } else if let Some(score) = record.score_anilist {
                blended.push((record.clone(), score, pseudo_votes.max(1.0)));
            }
            // No usable score at all: excluded.
        }

        if blended.is_empty() {
            return Vec::new();
        }

        let total: f64 = blended.iter().map(|(_, _, n)| n).sum();
        let center = blended.iter().map(|(_, s, n)| s * n).sum::<f64>() / total;
        let prior = self
            .config
            .prior_weight
            .unwrap_or_else(|| default_prior(blended.iter().map(|(_, _, n)| *n as u64)));

        blended
            .into_iter()
            .map(|(record, score, votes)| {
                let shrunk = bayesian_shrink(score, votes, center, prior);
                (record, shrunk)
            })
            .collect()
    }
}

fn eligible_rows(records: &[AnimeRecord]) -> Vec<(&AnimeRecord, f64, u64)> {
    records
        .iter()
        .filter_map(|record| match (record.score, record.vote_count()) {
            (Some(score), votes) if votes > 0 => Some((record, score, votes)),
            _ => None,
        })
        .collect()
}

fn weighted_center(eligible: &[(&AnimeRecord, f64, u64)]) -> f64 {
    let total: f64 = eligible.iter().map(|(_, _, n)| *n as f64).sum();
    eligible
        .iter()
        .map(|(_, score, votes)| score * *votes as f64)
        .sum::<f64>()
        / total
}

/// Default prior weight: `max(1000, median(votes))`, the median taken as the
/// upper-middle element of the sorted vote counts. The floor keeps shrinkage
/// strong in small datasets; the median term lets it grow with data scale.
fn default_prior(votes: impl Iterator<Item = u64>) -> f64 {
    let mut sorted: Vec<u64> = votes.collect();
    sorted.sort_unstable();
    let mid = sorted[sorted.len() / 2];
    1000.0_f64.max(mid as f64)
}

/// Min-max normalize a pool to [0,1]. `None` entries receive 0 and do not
/// participate in the min/max; an empty or all-equal pool yields 0 for every
/// member so a zero span is never divided by.
fn min_max_boosts(values: &[Option<f64>]) -> Vec<f64> {
    let pool: Vec<f64> = values.iter().flatten().copied().collect();
    if pool.is_empty() {
        return vec![0.0; values.len()];
    }
    let min = pool.iter().copied().fold(f64::INFINITY, f64::min);
    let max = pool.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span <= f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|value| value.map(|v| (v - min) / span).unwrap_or(0.0))
        .collect()
}
