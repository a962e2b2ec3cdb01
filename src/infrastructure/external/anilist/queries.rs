use serde_json::{json, Value};

use crate::application::FetchCriteria;

/// GraphQL documents and variable builders for the AniList API.
pub struct AniListQueries;

impl AniListQueries {
    pub fn paged_anime() -> &'static str {
        r#"
        query ($page: Int, $perPage: Int, $search: String, $format: MediaFormat, $status: MediaStatus, $start: FuzzyDateInt, $end: FuzzyDateInt) {
            Page(page: $page, perPage: $perPage) {
                pageInfo {
                    currentPage
                    hasNextPage
                }
                media(type: ANIME, search: $search, format: $format, status: $status, startDate_greater: $start, startDate_lesser: $end) {
                    id
                    idMal
                    title {
                        romaji
                        english
                        native
                    }
                    format
                    status
                    episodes
                    duration
                    averageScore
                    popularity
                    favourites
                    seasonYear
                    startDate {
                        year
                    }
                    siteUrl
                }
            }
        }
        "#
    }

    /// Variables for one page of the paged query. Absent criteria become
    /// JSON nulls, which AniList treats as "unfiltered".
    pub fn page_variables(criteria: &FetchCriteria, page: u32, per_page: u32) -> Value {
        json!({
            "page": page,
            "perPage": per_page,
            "search": criteria.query.as_deref().filter(|q| !q.is_empty()),
            "format": criteria.anime_type.and_then(|t| t.anilist_format()),
            "status": criteria.status.and_then(|s| s.anilist_status()),
            "start": criteria.year_from.map(|y| fuzzy_date(y, false)),
            "end": criteria.year_to.map(|y| fuzzy_date(y, true)),
        })
    }
}

/// AniList fuzzy dates are YYYYMMDD integers; a year expands to Jan 1 or
/// Dec 31 depending on which end of the range it bounds.
fn fuzzy_date(year: i32, end: bool) -> i64 {
    let suffix = if end { 1231 } else { 101 };
    year as i64 * 10_000 + suffix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AnimeStatus, AnimeType};

    #[test]
    fn fuzzy_dates_bound_the_year_range() {
        assert_eq!(fuzzy_date(2015, false), 20150101);
        assert_eq!(fuzzy_date(2015, true), 20151231);
    }

    #[test]
    fn variables_map_criteria() {
        let criteria = FetchCriteria {
            query: Some("gate".to_string()),
            anime_type: Some(AnimeType::Movie),
            status: Some(AnimeStatus::Airing),
            year_from: Some(2010),
            year_to: Some(2020),
            ..Default::default()
        };
        let vars = AniListQueries::page_variables(&criteria, 3, 50);
        assert_eq!(vars["page"], 3);
        assert_eq!(vars["format"], "MOVIE");
        assert_eq!(vars["status"], "RELEASING");
        assert_eq!(vars["start"], 20100101);
        assert_eq!(vars["end"], 20201231);
    }

    #[test]
    fn absent_criteria_are_null() {
        let vars = AniListQueries::page_variables(&FetchCriteria::default(), 1, 50);
        assert!(vars["search"].is_null());
        assert!(vars["format"].is_null());
        assert!(vars["start"].is_null());
    }
}
