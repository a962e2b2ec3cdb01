use async_trait::async_trait;
use log::debug;

use super::dto::{JikanAnimeListResponse, JikanGenresResponse, JikanNamed, JikanSearchParams};
use super::mapper::JikanMapper;
use crate::application::{CatalogSource, FetchCriteria};
use crate::domain::entities::AnimeRecord;
use crate::infrastructure::http::RateLimitClient;
use crate::shared::errors::AppResult;

const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
const JIKAN_MAX_PAGE_SIZE: u32 = 25;

/// Primary catalog source: MyAnimeList via the Jikan REST API.
pub struct JikanClient {
    http: RateLimitClient,
    base_url: String,
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl JikanClient {
    pub fn new() -> Self {
        Self::with_base_url(JIKAN_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: RateLimitClient::for_jikan(),
            base_url,
        }
    }

    fn page_params(criteria: &FetchCriteria, page: u32) -> JikanSearchParams {
        JikanSearchParams {
            page,
            limit: criteria.page_size.clamp(1, JIKAN_MAX_PAGE_SIZE),
            order_by: "score",
            sort: "desc",
            sfw: criteria.sfw,
            q: criteria.query.clone().filter(|q| !q.is_empty()),
            anime_type: criteria.anime_type.and_then(|t| t.jikan_param()),
            status: criteria.status.and_then(|s| s.jikan_param()),
            start_date: criteria.year_from.map(|y| format!("{}-01-01", y)),
            end_date: criteria.year_to.map(|y| format!("{}-12-31", y)),
            min_score: criteria.min_score,
        }
    }

    /// Fetch the `/genres/anime` listing for the genre cache.
    pub async fn list_genres(&self) -> AppResult<Vec<JikanNamed>> {
        let url = format!("{}/genres/anime", self.base_url);
        let response: JikanGenresResponse =
            self.http.get(&url, None::<&JikanSearchParams>).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl CatalogSource for JikanClient {
    fn source_name(&self) -> &'static str {
        "jikan"
    }

    /// Paginate `GET /v4/anime` ordered by score descending, stopping on the
    /// last page or the max-pages cap.
    async fn fetch(&self, criteria: &FetchCriteria) -> AppResult<Vec<AnimeRecord>> {
        let url = format!("{}/anime", self.base_url);
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let params = Self::page_params(criteria, page);
            let response: JikanAnimeListResponse = self.http.get(&url, Some(&params)).await?;

            debug!(
                "jikan page {}: {} item(s)",
                page,
                response.data.len()
            );
            records.extend(response.data.into_iter().map(JikanMapper::to_record));

            let Some(pagination) = response.pagination else {
                break;
            };
            if !pagination.has_next_page || page >= criteria.max_pages.max(1) {
                break;
            }
            page = pagination.current_page.max(page as i32) as u32 + 1;
        }

        Ok(records)
    }
}
