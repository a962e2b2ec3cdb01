use async_trait::async_trait;
use log::debug;
use serde_json::json;

use super::dto::{AniListResponse, PageData};
use super::mapper::AniListMapper;
use super::queries::AniListQueries;
use crate::application::{CatalogSource, FetchCriteria};
use crate::domain::entities::AnimeRecord;
use crate::infrastructure::http::RateLimitClient;
use crate::shared::errors::{AppError, AppResult};

const ANILIST_BASE_URL: &str = "https://graphql.anilist.co";
const ANILIST_PAGE_SIZE: u32 = 50;

/// Secondary catalog source: AniList via its GraphQL API.
pub struct AniListClient {
    http: RateLimitClient,
    base_url: String,
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AniListClient {
    pub fn new() -> Self {
        Self::with_base_url(ANILIST_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: RateLimitClient::for_anilist(),
            base_url,
        }
    }

    async fn fetch_page(&self, criteria: &FetchCriteria, page: u32) -> AppResult<PageData> {
        let body = json!({
            "query": AniListQueries::paged_anime(),
            "variables": AniListQueries::page_variables(criteria, page, ANILIST_PAGE_SIZE),
        });
        let response: AniListResponse<PageData> =
            self.http.post_json(&self.base_url, &body).await?;

        if !response.errors.is_empty() {
            let messages: Vec<String> =
                response.errors.into_iter().map(|e| e.message).collect();
            return Err(AppError::ApiError(format!(
                "AniList GraphQL error: {}",
                messages.join("; ")
            )));
        }
        response
            .data
            .ok_or_else(|| AppError::ApiError("AniList response carried no data".to_string()))
    }
}

#[async_trait]
impl CatalogSource for AniListClient {
    fn source_name(&self) -> &'static str {
        "anilist"
    }

    async fn fetch(&self, criteria: &FetchCriteria) -> AppResult<Vec<AnimeRecord>> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let data = self.fetch_page(criteria, page).await?;
            debug!("anilist page {}: {} item(s)", page, data.page.media.len());
            records.extend(data.page.media.into_iter().map(AniListMapper::to_record));

            let info = data.page.page_info;
            if !info.has_next_page || page >= criteria.max_pages.max(1) {
                break;
            }
            page = info.current_page.max(page as i32) as u32 + 1;
        }

        Ok(records)
    }
}
