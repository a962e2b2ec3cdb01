use crate::domain::entities::AnimeRecord;
use crate::domain::value_objects::{AnimeStatus, AnimeType};
use crate::shared::errors::{AppError, AppResult};

/// Criteria for local, post-fetch row selection. Every field is optional;
/// an empty criteria set passes everything through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub anime_type: Option<AnimeType>,
    pub status: Option<AnimeStatus>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_score: Option<f64>,
    pub min_scored_by: Option<u64>,
    pub any_genres: Option<Vec<String>>,
    pub all_genres: Option<Vec<String>>,
}

pub struct RecordFilter {
    criteria: FilterCriteria,
}

impl RecordFilter {
    pub fn new(criteria: FilterCriteria) -> AppResult<Self> {
        if let Some(score) = criteria.min_score {
            if !(0.0..=10.0).contains(&score) {
                return Err(AppError::ValidationError(format!(
                    "min_score must be within 0-10, got {}",
                    score
                )));
            }
        }
        if let (Some(from), Some(to)) = (criteria.year_from, criteria.year_to) {
            if from > to {
                return Err(AppError::ValidationError(format!(
                    "year_from {} is after year_to {}",
                    from, to
                )));
            }
        }
        Ok(Self { criteria })
    }

    pub fn apply(&self, records: Vec<AnimeRecord>) -> Vec<AnimeRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }

    fn matches(&self, record: &AnimeRecord) -> bool {
        let c = &self.criteria;

        if let Some(anime_type) = c.anime_type {
            if record.anime_type != anime_type {
                return false;
            }
        }
        if let Some(status) = c.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(from) = c.year_from {
            match record.year {
                Some(year) if year >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = c.year_to {
            match record.year {
                Some(year) if year <= to => {}
                _ => return false,
            }
        }
        if let Some(min_score) = c.min_score {
            match record.score {
                Some(score) if score >= min_score => {}
                _ => return false,
            }
        }
        if let Some(min_voters) = c.min_scored_by {
            if record.vote_count() < min_voters {
                return false;
            }
        }
        if let Some(any) = &c.any_genres {
            if !record.has_any_genre(any) {
                return false;
            }
        }
        if let Some(all) = &c.all_genres {
            if !record.has_all_genres(all) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: Option<i32>, score: Option<f64>, votes: u64) -> AnimeRecord {
        AnimeRecord {
            mal_id: Some(1),
            title: title.to_string(),
            anime_type: AnimeType::TV,
            year,
            score,
            scored_by: Some(votes),
            genres: vec!["Action".to_string(), "Drama".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn empty_criteria_passes_everything() {
        let filter = RecordFilter::new(FilterCriteria::default()).unwrap();
        let rows = vec![record("A", None, None, 0), record("B", Some(2020), Some(8.0), 10)];
        assert_eq!(filter.apply(rows).len(), 2);
    }

    #[test]
    fn year_filter_drops_missing_years() {
        let filter = RecordFilter::new(FilterCriteria {
            year_from: Some(2010),
            ..Default::default()
        })
        .unwrap();
        let rows = vec![
            record("old", Some(2005), None, 0),
            record("no-year", None, None, 0),
            record("new", Some(2015), None, 0),
        ];
        let kept = filter.apply(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "new");
    }

    #[test]
    fn score_and_voter_floors() {
        let filter = RecordFilter::new(FilterCriteria {
            min_score: Some(7.5),
            min_scored_by: Some(100),
            ..Default::default()
        })
        .unwrap();
        let rows = vec![
            record("low-score", Some(2020), Some(7.0), 500),
            record("few-votes", Some(2020), Some(9.0), 50),
            record("unscored", Some(2020), None, 500),
            record("keeper", Some(2020), Some(8.0), 500),
        ];
        let kept = filter.apply(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "keeper");
    }

    #[test]
    fn genre_membership_is_case_insensitive() {
        let any = RecordFilter::new(FilterCriteria {
            any_genres: Some(vec!["DRAMA".to_string(), "romance".to_string()]),
            ..Default::default()
        })
        .unwrap();
        let all = RecordFilter::new(FilterCriteria {
            all_genres: Some(vec!["action".to_string(), "romance".to_string()]),
            ..Default::default()
        })
        .unwrap();
        let rows = vec![record("A", None, None, 0)];
        assert_eq!(any.apply(rows.clone()).len(), 1);
        assert_eq!(all.apply(rows).len(), 0);
    }

    #[test]
    fn rejects_out_of_range_min_score() {
        let result = RecordFilter::new(FilterCriteria {
            min_score: Some(11.0),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn rejects_inverted_year_range() {
        let result = RecordFilter::new(FilterCriteria {
            year_from: Some(2020),
            year_to: Some(2010),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
