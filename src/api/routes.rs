use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::{handlers, proxy, AppState};

/// Creates the main router with page, proxy and health routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Pages
        .route("/", get(handlers::index))
        .route("/search", post(handlers::search))
        .route("/action", post(handlers::action))
        .route("/movies/:movie_id", get(handlers::movie))
        // Upstream proxy
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Proxy routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(proxy::search))
        .route("/recommendations/:movie_id", get(proxy::recommendations))
        .route(
            "/visualization/:viz_type/:movie_id",
            get(proxy::visualization),
        )
}
