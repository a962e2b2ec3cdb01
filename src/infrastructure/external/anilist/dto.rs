use serde::{Deserialize, Serialize};

/// Top-level GraphQL envelope; AniList reports failures in `errors` while
/// still returning HTTP 200.
#[derive(Debug, Clone, Deserialize)]
pub struct AniListResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<AniListError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: AniListPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListPage {
    #[serde(rename = "pageInfo")]
    pub page_info: AniListPageInfo,
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListPageInfo {
    pub current_page: i32,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: u32,
    pub id_mal: Option<u32>,
    pub title: Option<AniListTitle>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub episodes: Option<u32>,
    /// Per-episode duration in minutes.
    pub duration: Option<u32>,
    /// 0-100 scale; normalized to 0-10 on ingestion.
    pub average_score: Option<f64>,
    pub popularity: Option<u64>,
    pub favourites: Option<u64>,
    pub season_year: Option<i32>,
    pub start_date: Option<AniListDate>,
    pub site_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListDate {
    pub year: Option<i32>,
}
