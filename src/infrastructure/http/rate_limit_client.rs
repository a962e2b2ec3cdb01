//! HTTP client with automatic rate limiting and retry logic, shared by both
//! catalog clients.

use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

use super::retry_policy::{is_retryable_error, RateLimitInfo, RetryPolicy};
use crate::shared::errors::{AppError, AppResult};

const USER_AGENT: &str = concat!("hyoka/", env!("CARGO_PKG_VERSION"));

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    provider_name: String,
}

impl RateLimitClient {
    /// Client for the Jikan REST API.
    /// Jikan v4: ~60 req/min = 1.0 req/sec average with 3 req/sec bursts.
    pub fn for_jikan() -> Self {
        Self::new("Jikan", RetryPolicy::jikan(), Self::rate_limiter(1.0, 3))
    }

    /// Client for the AniList GraphQL API.
    /// AniList: 30 req/min (degraded state) = 0.5 req/sec.
    pub fn for_anilist() -> Self {
        Self::new(
            "AniList",
            RetryPolicy::anilist(),
            Self::rate_limiter(0.5, 2),
        )
    }

    fn rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap();
        let quota = Quota::with_period(period).unwrap().allow_burst(burst);
        GovernorRateLimiter::direct(quota)
    }

    pub fn new(
        provider_name: &str,
        retry_policy: RetryPolicy,
        rate_limiter: DirectRateLimiter,
    ) -> Self {
        Self {
            client: Client::new(),
            rate_limiter,
            retry_policy,
            provider_name: provider_name.to_string(),
        }
    }

    /// GET with optional query parameters, rate limited and retried.
    pub async fn get<T, Q>(&self, url: &str, query: Option<&Q>) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = query
            .map(serde_json::to_value)
            .transpose()?;
        self.request_with_retries(Method::GET, url, query, None)
            .await
    }

    /// POST a JSON body, rate limited and retried.
    pub async fn post_json<T>(&self, url: &str, body: &Value) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request_with_retries(Method::POST, url, None, Some(body.clone()))
            .await
    }

    async fn request_with_retries<T>(
        &self,
        method: Method,
        url: &str,
        query: Option<Value>,
        body: Option<Value>,
    ) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut last_error = None;

        for attempt in 0..=self.retry_policy.max_retries {
            // Wait for the rate limiter before attempting the request
            self.rate_limiter.until_ready().await;

            match self.build_and_send_request(&method, url, &query, &body).await {
                Ok(response) => {
                    if response.status() == 429 {
                        let rate_limit_info = RateLimitInfo::from_headers(response.headers());

                        if attempt < self.retry_policy.max_retries {
                            let delay = self
                                .retry_policy
                                .calculate_delay(attempt, rate_limit_info.retry_after);
                            log::warn!(
                                "{} API rate limited (attempt {}/{}). Waiting {:?} before retry.",
                                self.provider_name,
                                attempt + 1,
                                self.retry_policy.max_retries + 1,
                                delay
                            );
                            sleep(delay).await;
                            continue;
                        } else {
                            return Err(AppError::RateLimitError(format!(
                                "{} API rate limit exceeded after {} attempts",
                                self.provider_name,
                                self.retry_policy.max_retries + 1
                            )));
                        }
                    }

                    if !response.status().is_success() {
                        let error_msg = format!(
                            "{} API returned error: {}",
                            self.provider_name,
                            response.status()
                        );

                        // Only retry server errors
                        if response.status().is_server_error()
                            && attempt < self.retry_policy.max_retries
                        {
                            let delay = self.retry_policy.calculate_delay(attempt, None);
                            log::warn!(
                                "{} (attempt {}/{}). Retrying in {:?}",
                                error_msg,
                                attempt + 1,
                                self.retry_policy.max_retries + 1,
                                delay
                            );
                            sleep(delay).await;
                            continue;
                        } else {
                            return Err(AppError::ApiError(error_msg));
                        }
                    }

                    return self.parse_response(response).await;
                }
                Err(e) => {
                    last_error = Some(AppError::ApiError(e.to_string()));

                    if is_retryable_error(&e) && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        log::warn!(
                            "{} API request failed (attempt {}/{}): {}. Retrying in {:?}",
                            self.provider_name,
                            attempt + 1,
                            self.retry_policy.max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    } else {
                        return Err(AppError::ApiError(format!(
                            "{} API request failed: {}",
                            self.provider_name, e
                        )));
                    }
                }
            }
        }

        Err(AppError::ApiError(format!(
            "{} API request failed after {} attempts: {}",
            self.provider_name,
            self.retry_policy.max_retries + 1,
            last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string())
        )))
    }

    async fn build_and_send_request(
        &self,
        method: &Method,
        url: &str,
        query: &Option<Value>,
        body: &Option<Value>,
    ) -> Result<Response, reqwest::Error> {
        let mut request_builder = self
            .client
            .request(method.clone(), url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");

        if let Some(params) = query {
            request_builder = request_builder.query(params);
        }
        if let Some(json_body) = body {
            request_builder = request_builder
                .header("Content-Type", "application/json")
                .json(json_body);
        }

        request_builder.send().await
    }

    async fn parse_response<T>(&self, response: Response) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        response.json::<T>().await.map_err(|e| {
            AppError::ApiError(format!(
                "Failed to parse {} response: {}",
                self.provider_name, e
            ))
        })
    }
}
