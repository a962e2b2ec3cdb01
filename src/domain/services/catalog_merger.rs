use std::collections::{HashMap, HashSet};

use log::debug;

use crate::domain::entities::AnimeRecord;
use crate::shared::errors::{AppError, AppResult};

/// Counters describing what the merge did, including the data-quality
/// ambiguities the merge tolerates rather than rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Secondary rows over-written in the cross-reference index because
    /// another row claimed the same primary id (last write wins).
    pub cross_ref_collisions: usize,
    /// Primary rows enriched with secondary fields via a cross-reference.
    pub enriched: usize,
    /// Secondary rows appended as new output rows.
    pub appended: usize,
    /// Unconsumed secondary rows discarded because their normalized
    /// title+year pair was already represented.
    pub duplicates_dropped: usize,
    /// Appended rows whose best title similarity against the primary set met
    /// the near-miss threshold without matching. Diagnostics only.
    pub near_misses: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub records: Vec<AnimeRecord>,
    pub report: MergeReport,
}

/// Reconciles the two per-source record collections into one, first by the
/// explicit cross-reference id a secondary row carries for its primary
/// counterpart, then by normalized-title + year equality.
pub struct CatalogMerger {
    near_miss_threshold: f64,
}

impl Default for CatalogMerger {
    fn default() -> Self {
        Self {
            near_miss_threshold: 0.90,
        }
    }
}

impl CatalogMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_near_miss_threshold(threshold: f64) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::ValidationError(format!(
                "near-miss threshold must be within 0-1, got {}",
                threshold
            )));
        }
        Ok(Self {
            near_miss_threshold: threshold,
        })
    }

    /// Merge `secondary` into `primary`. Primary order is preserved;
    /// unmatched secondary rows are appended in their own order. No row from
    /// either side is ever silently dropped: every secondary row either
    /// enriches exactly one primary row, becomes one appended row, or is
    /// counted as a title+year duplicate.
    pub fn merge(&self, primary: Vec<AnimeRecord>, secondary: Vec<AnimeRecord>) -> MergeOutcome {
        let mut report = MergeReport::default();

        // Index secondary rows by the primary id they cross-reference.
        // Last write wins on collisions, but the overwrite is counted.
        let mut by_mal_id: HashMap<u32, usize> = HashMap::new();
        for (idx, record) in secondary.iter().enumerate() {
            if let Some(mal_id) = record.mal_id {
                if by_mal_id.insert(mal_id, idx).is_some() {
                    report.cross_ref_collisions += 1;
                }
            }
        }

        let mut consumed = vec![false; secondary.len()];
        let mut merged: Vec<AnimeRecord> = Vec::with_capacity(primary.len());

        for record in primary {
            let mut row = record;
            if let Some(idx) = row.mal_id.and_then(|id| by_mal_id.get(&id)).copied() {
                row.absorb_secondary(&secondary[idx]);
                consumed[idx] = true;
                report.enriched += 1;
            }
            merged.push(row);
        }

        let primary_titles: Vec<String> =
            merged.iter().map(|r| r.normalized_title()).collect();
        let mut seen: HashSet<(String, Option<i32>)> =
            merged.iter().map(|r| r.identity_key()).collect();

        for (idx, record) in secondary.into_iter().enumerate() {
            if consumed[idx] {
                continue;
            }
            let key = record.identity_key();
            if seen.contains(&key) {
                report.duplicates_dropped += 1;
                continue;
            }
            if let Some((best, title)) = best_similarity(&key.0, &primary_titles) {
                if best >= self.near_miss_threshold {
                    report.near_misses += 1;
                    debug!(
                        "near-miss title match ({:.3}): '{}' vs primary '{}'",
                        best, key.0, title
                    );
                }
            }
            seen.insert(key);
            merged.push(record);
            report.appended += 1;
        }

        MergeOutcome {
            records: merged,
            report,
        }
    }
}

fn best_similarity<'a>(title: &str, pool: &'a [String]) -> Option<(f64, &'a str)> {
    if title.is_empty() {
        return None;
    }
    pool.iter()
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| (strsim::jaro_winkler(title, candidate), candidate.as_str()))
        .max_by(|a, b| a.0.total_cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_similarity_picks_closest() {
        let pool = vec!["fullmetalalchemist".to_string(), "onepiece".to_string()];
        let (score, title) = best_similarity("fullmetalalchemis", &pool).unwrap();
        assert!(score > 0.9);
        assert_eq!(title, "fullmetalalchemist");
    }

    #[test]
    fn empty_titles_do_not_participate() {
        assert!(best_similarity("", &["abc".to_string()]).is_none());
        assert!(best_similarity("abc", &[String::new()]).is_none());
    }

    #[test]
    fn threshold_is_validated() {
        assert!(CatalogMerger::with_near_miss_threshold(1.5).is_err());
        assert!(CatalogMerger::with_near_miss_threshold(0.85).is_ok());
    }
}
