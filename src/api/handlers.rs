use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::MovieId,
    view::{render_page, Action, ActionForm, PageContext, ViewState},
};

use super::AppState;

// Request types

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub movie_title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Empty search page, with a notice when the upstream is not reachable
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let api_ready = state.api.is_ready().await;
    if !api_ready {
        tracing::warn!(upstream = state.api.name(), "Recommendation API not ready");
    }

    Html(render_page(
        &ViewState::Idle,
        PageContext {
            query: "",
            api_ready,
        },
    ))
}

/// Search form submission
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let controller = state.controller();
    let view = controller.submit_search(&form.movie_title).await;

    Html(render_page(
        &view,
        PageContext {
            query: &form.movie_title,
            api_ready: true,
        },
    ))
}

/// Candidate selection and new-search buttons
pub async fn action(
    State(state): State<AppState>,
    Form(form): Form<ActionForm>,
) -> AppResult<Html<String>> {
    let action = Action::try_from(form)?;

    let controller = state.controller();
    let view = controller.dispatch(action).await;
    let query = controller.query().await;

    Ok(Html(render_page(
        &view,
        PageContext {
            query: &query,
            api_ready: true,
        },
    )))
}

/// Direct link to the recommendations of one movie
pub async fn movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Html<String> {
    let view = state.controller().show_recommendations(movie_id).await;

    Html(render_page(
        &view,
        PageContext {
            query: "",
            api_ready: true,
        },
    ))
}
