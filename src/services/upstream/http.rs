//! HTTP client for the upstream recommendation API
//!
//! Endpoints used:
//! 1. Readiness: GET /status
//! 2. Search: POST /search (form field `movie_title`)
//! 3. Recommendations: GET /recommendations/{id}?limit=n
//! 4. Visualizations: GET /visualization/{type}/{id} → PNG bytes

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{ApiStatus, MovieId, RecommendationResponse, SearchResponse, StatusEnvelope},
    services::{
        upstream::{RawReply, RecommenderApi, VisualizationImage},
        visualization::VisualizationKind,
    },
};

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct HttpRecommenderApi {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommenderApi {
    /// Creates a client for the API rooted at `api_url` (e.g. `http://localhost:5000/api`)
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn search_request(&self, title: &str) -> RequestBuilder {
        self.http_client
            .post(self.url("search"))
            .form(&[("movie_title", title)])
    }

    fn recommendations_request(&self, movie_id: MovieId, limit: Option<u32>) -> RequestBuilder {
        let request = self
            .http_client
            .get(self.url(&format!("recommendations/{}", movie_id)));
        match limit {
            Some(limit) => request.query(&[("limit", limit)]),
            None => request,
        }
    }
}

/// Turns an upstream response into `T`, surfacing `status: "error"` bodies and
/// non-success statuses as errors.
async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if let Some(err) = application_error(status.as_u16(), &body) {
        return Err(err);
    }
    if !status.is_success() {
        return Err(AppError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            response = %body,
            "Failed to deserialize upstream response"
        );
        AppError::InvalidResponse(e.to_string())
    })
}

async fn read_raw(response: Response) -> AppResult<RawReply> {
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();
    Ok(RawReply { status, body })
}

/// `Some` when the body is a `{"status": "error", ...}` envelope
fn application_error(status: u16, body: &str) -> Option<AppError> {
    let envelope = serde_json::from_str::<StatusEnvelope>(body).ok()?;
    if !envelope.is_error() {
        return None;
    }

    Some(AppError::Application {
        status,
        message: envelope
            .message
            .unwrap_or_else(|| "The recommendation service reported an error".to_string()),
    })
}

#[async_trait::async_trait]
impl RecommenderApi for HttpRecommenderApi {
    #[instrument(skip(self))]
    async fn is_ready(&self) -> bool {
        let response = match self
            .http_client
            .get(self.url("status"))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Upstream status check failed");
                return false;
            }
        };

        if !response.status().is_success() {
            return false;
        }

        match response.json::<ApiStatus>().await {
            Ok(status) => status.status == "ok",
            Err(e) => {
                tracing::warn!(error = %e, "Upstream status body unreadable");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, title: &str) -> AppResult<SearchResponse> {
        let result: SearchResponse = read_json(self.search_request(title).send().await?).await?;

        tracing::info!(
            exact_match = result.exact_match,
            candidates = result.similar_movies.as_ref().map_or(0, Vec::len),
            "Search completed"
        );

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn recommendations(
        &self,
        movie_id: MovieId,
        limit: Option<u32>,
    ) -> AppResult<RecommendationResponse> {
        let response = self.recommendations_request(movie_id, limit).send().await?;
        let result: RecommendationResponse = read_json(response).await?;

        tracing::info!(
            recommendations = result.recommendations.len(),
            "Recommendations fetched"
        );

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn search_raw(&self, title: &str) -> AppResult<RawReply> {
        read_raw(self.search_request(title).send().await?).await
    }

    #[instrument(skip(self))]
    async fn recommendations_raw(
        &self,
        movie_id: MovieId,
        limit: Option<u32>,
    ) -> AppResult<RawReply> {
        read_raw(self.recommendations_request(movie_id, limit).send().await?).await
    }

    #[instrument(skip(self))]
    async fn visualization(
        &self,
        kind: VisualizationKind,
        movie_id: MovieId,
    ) -> AppResult<VisualizationImage> {
        let response = self
            .http_client
            .get(self.url(&format!("visualization/{}/{}", kind.as_str(), movie_id)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(application_error(status.as_u16(), &body).unwrap_or(
                AppError::UpstreamStatus {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!(size = bytes.len(), "Visualization fetched");

        Ok(VisualizationImage {
            content_type,
            bytes,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_reply(status: u16, body: &'static str) -> Response {
        axum::http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
            .into()
    }

    fn api() -> HttpRecommenderApi {
        HttpRecommenderApi::new("http://test.local/api/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        assert_eq!(api().url("search"), "http://test.local/api/search");
    }

    #[test]
    fn test_recommendations_request_carries_limit() {
        let request = api().recommendations_request(949, Some(10)).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://test.local/api/recommendations/949?limit=10"
        );

        let request = api().recommendations_request(949, None).build().unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_error_envelope_becomes_application_error() {
        let body = r#"{"status":"error","message":"Search query is required"}"#;
        match application_error(400, body) {
            Some(AppError::Application { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Search query is required");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_envelope_without_message() {
        let result = application_error(200, r#"{"status":"error"}"#);
        assert!(matches!(result, Some(AppError::Application { status: 200, .. })));
    }

    #[test]
    fn test_non_envelope_bodies() {
        assert!(application_error(502, "Bad Gateway").is_none());
        assert!(application_error(200, r#"{"status":"success"}"#).is_none());
    }

    #[tokio::test]
    async fn test_read_json_rejects_unparseable_body() {
        let result: AppResult<RecommendationResponse> =
            read_json(upstream_reply(200, r#"{"status":"success"}"#)).await;
        assert!(matches!(result, Err(AppError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_read_raw_keeps_status_and_unknown_fields() {
        let body = r#"{"status":"success","movie_id":949,"overview":"A heist"}"#;
        let reply = read_raw(upstream_reply(200, body)).await.unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, body.as_bytes());

        let reply = read_raw(upstream_reply(404, r#"{"status":"error"}"#)).await.unwrap();
        assert_eq!(reply.status, 404);
    }
}
