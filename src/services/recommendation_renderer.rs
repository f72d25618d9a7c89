use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{Metrics, MovieId, RecommendationItem, RecommendationResponse},
    services::{upstream::RecommenderApi, visualization::VisualizationKind},
    view::{
        format, MetricCard, RecommendationRow, RecommendationsView, ViewState, VisualizationCard,
    },
};

/// Fetches recommendations for a resolved movie and turns them into a view.
///
/// Only the recommendation request happens here. The view carries the two
/// visualization URLs and the browser loads each card after the table is shown.
#[derive(Clone)]
pub struct RecommendationRenderer {
    api: Arc<dyn RecommenderApi>,
    limit: Option<u32>,
}

impl RecommendationRenderer {
    pub fn new(api: Arc<dyn RecommenderApi>, limit: Option<u32>) -> Self {
        Self { api, limit }
    }

    /// Requests recommendations for `movie_id`; failures become an error view
    pub async fn show_recommendations(&self, movie_id: MovieId) -> ViewState {
        match self.api.recommendations(movie_id, self.limit).await {
            Ok(response) => {
                let view = build_view(movie_id, response, Utc::now().timestamp_millis());
                tracing::info!(
                    movie_id = movie_id,
                    rows = view.rows.len(),
                    "Recommendations rendered"
                );
                ViewState::Recommendations(view)
            }
            Err(e) => {
                tracing::error!(movie_id = movie_id, error = %e, "Recommendation error");
                ViewState::error(error_message(&e))
            }
        }
    }
}

/// Message shown in the error banner
fn error_message(error: &AppError) -> String {
    match error {
        AppError::Application { message, .. } => message.clone(),
        other => format!("Error: {}", other),
    }
}

/// Formats an upstream response for display
pub fn build_view(
    movie_id: MovieId,
    response: RecommendationResponse,
    timestamp: i64,
) -> RecommendationsView {
    let source = &response.source_movie;

    RecommendationsView {
        movie_id,
        timestamp,
        heading: format::title_with_year(&source.title, source.release_year()),
        rows: response.recommendations.iter().map(build_row).collect(),
        metrics: metric_cards(&response.metrics),
        visualizations: VisualizationKind::ALL
            .iter()
            .map(|kind| VisualizationCard::new(*kind, movie_id, timestamp))
            .collect(),
    }
}

fn build_row(item: &RecommendationItem) -> RecommendationRow {
    RecommendationRow {
        title: item.movie.title.clone(),
        genres: item
            .genres
            .as_ref()
            .map(|g| g.display_names())
            .unwrap_or_default(),
        rating: format::rating(item.vote_average),
        release_date: format::release_date(item.movie.release_date()),
        similarity_percent: format::similarity_percent(item.similarity_score),
    }
}

fn metric_cards(metrics: &Metrics) -> Vec<MetricCard> {
    vec![
        MetricCard {
            title: "Genre Overlap",
            value: format!("{}%", format::percent(metrics.average_genre_overlap)),
            caption: "Shared genres between movies",
            icon: "bi-intersect",
        },
        MetricCard {
            title: "Rating Similarity",
            value: format::rating_difference(metrics.average_rating_difference),
            caption: "Avg. rating difference (lower is better)",
            icon: "bi-star-half",
        },
        MetricCard {
            title: "Content Relevance",
            value: format!("{}%", format::percent(metrics.average_content_relevance)),
            caption: "Thematic similarity",
            icon: "bi-shuffle",
        },
    ]
}
