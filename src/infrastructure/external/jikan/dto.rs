use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeListResponse {
    pub data: Vec<JikanAnime>,
    pub pagination: Option<JikanPagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPagination {
    pub has_next_page: bool,
    pub current_page: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u32,
    pub url: Option<String>,
    pub title: Option<String>,
    pub title_english: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    #[serde(default)]
    pub aired: Option<JikanAired>,
    pub duration: Option<String>,
    pub score: Option<f64>,
    pub scored_by: Option<u64>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
    pub year: Option<i32>,
    #[serde(default)]
    pub studios: Vec<JikanNamed>,
    #[serde(default)]
    pub genres: Vec<JikanNamed>,
    #[serde(default)]
    pub themes: Vec<JikanNamed>,
    #[serde(default)]
    pub demographics: Vec<JikanNamed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAired {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanNamed {
    pub mal_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanGenresResponse {
    pub data: Vec<JikanNamed>,
}

/// Query parameters for `GET /v4/anime`. `None` fields are omitted from the
/// query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JikanSearchParams {
    pub page: u32,
    pub limit: u32,
    pub order_by: &'static str,
    pub sort: &'static str,
    pub sfw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub anime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}
