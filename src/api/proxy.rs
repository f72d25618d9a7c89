//! Pass-through of the upstream API under `/api`, so the browser only ever
//! talks to this origin. The visualization route is what the `<img>` tags point at.

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::MovieId,
    services::{
        upstream::RawReply,
        visualization::{load_visualization, VisualizationKind, VisualizationLoad},
    },
};

use super::{handlers::SearchForm, AppState};

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<u32>,
}

/// Upstream status and body as they came, labelled as JSON
fn json_reply(reply: RawReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
}

/// Proxy the search request to the upstream
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> AppResult<Response> {
    let reply = state.api.search_raw(&form.movie_title).await?;
    Ok(json_reply(reply))
}

/// Proxy the recommendations request to the upstream
pub async fn recommendations(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Response> {
    let limit = params.limit.or(state.recommendation_limit);
    let reply = state.api.recommendations_raw(movie_id, limit).await?;
    Ok(json_reply(reply))
}

/// Proxy one visualization image; a failure here is what the card's `onerror` sees
pub async fn visualization(
    State(state): State<AppState>,
    Path((viz_type, movie_id)): Path<(String, MovieId)>,
) -> AppResult<Response> {
    let kind: VisualizationKind = viz_type.parse()?;

    match load_visualization(state.api.as_ref(), kind, movie_id).await {
        VisualizationLoad::Loaded(image) => {
            let disposition = format!("inline; filename=\"{}_{}.png\"", kind, movie_id);
            Ok((
                [(CONTENT_TYPE, image.content_type), (CONTENT_DISPOSITION, disposition)],
                image.bytes,
            )
                .into_response())
        }
        VisualizationLoad::Failed(e) => Err(e),
    }
}
