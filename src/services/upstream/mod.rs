//! Upstream recommendation API abstraction
//!
//! The web front never talks to the database or the recommender directly. Every
//! piece of data it renders comes through this trait, which keeps the search
//! and rendering logic testable against a mock.

use crate::{
    error::AppResult,
    models::{MovieId, RecommendationResponse, SearchResponse},
    services::visualization::VisualizationKind,
};

pub mod http;

pub use http::HttpRecommenderApi;

/// Image bytes returned by a visualization endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl VisualizationImage {
    /// True when the body looks like something an `<img>` can decode
    pub fn is_image(&self) -> bool {
        !self.bytes.is_empty() && self.content_type.starts_with("image/")
    }
}

/// Upstream JSON reply forwarded to the browser untouched
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Trait for the upstream recommendation API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommenderApi: Send + Sync {
    /// Readiness ping; never fails, an unreachable upstream is simply not ready
    async fn is_ready(&self) -> bool;

    /// Search movies by title
    ///
    /// A response with `status: "error"` is returned as an error, so a value in
    /// `Ok` is always a successful search.
    async fn search(&self, title: &str) -> AppResult<SearchResponse>;

    /// Ranked recommendations and metrics for one movie
    async fn recommendations(
        &self,
        movie_id: MovieId,
        limit: Option<u32>,
    ) -> AppResult<RecommendationResponse>;

    /// Same request as [`search`](Self::search), reply kept as sent
    ///
    /// Only transport failures are errors; any status and body come back as is.
    async fn search_raw(&self, title: &str) -> AppResult<RawReply>;

    /// Same request as [`recommendations`](Self::recommendations), reply kept as sent
    async fn recommendations_raw(
        &self,
        movie_id: MovieId,
        limit: Option<u32>,
    ) -> AppResult<RawReply>;

    /// Fetch one rendered visualization
    async fn visualization(
        &self,
        kind: VisualizationKind,
        movie_id: MovieId,
    ) -> AppResult<VisualizationImage>;

    /// Upstream name for logging
    fn name(&self) -> &'static str;
}
