use async_trait::async_trait;

use crate::domain::entities::AnimeRecord;
use crate::domain::value_objects::{AnimeStatus, AnimeType};
use crate::shared::errors::AppResult;

/// What to ask a catalog source for. Both clients translate these criteria
/// into their own wire parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCriteria {
    /// Title keyword search.
    pub query: Option<String>,
    pub anime_type: Option<AnimeType>,
    pub status: Option<AnimeStatus>,
    /// Inclusive release-year range.
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_score: Option<f64>,
    pub page_size: u32,
    pub max_pages: u32,
    /// Safe-for-work only (filters R+/Rx on the primary source).
    pub sfw: bool,
}

impl Default for FetchCriteria {
    fn default() -> Self {
        Self {
            query: None,
            anime_type: None,
            status: None,
            year_from: None,
            year_to: None,
            min_score: None,
            page_size: 25,
            max_pages: 5,
            sfw: false,
        }
    }
}

/// Port over the two catalog fetch clients; the pipeline depends on this
/// trait so the clients are swappable (and mockable) wholesale.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Fetch all pages matching the criteria, flattened into records.
    async fn fetch(&self, criteria: &FetchCriteria) -> AppResult<Vec<AnimeRecord>>;
}
