use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{MovieId, SearchOutcome},
    services::{recommendation_renderer::RecommendationRenderer, upstream::RecommenderApi},
    view::{Action, ViewState},
};

const SEARCH_FAILED: &str = "An error occurred while searching for the movie. Please try again.";

/// Drives one search attempt from query to recommendations.
///
/// Every search or action starts a new generation. Responses that arrive for an
/// older generation are dropped, so a slow response can never overwrite the
/// result of a search started later on the same controller.
///
/// The page handlers build one controller per request and a browser only keeps
/// the document of its latest navigation, so there the guard never fires. It
/// matters when one controller is shared by concurrent callers.
pub struct SearchController {
    api: Arc<dyn RecommenderApi>,
    renderer: RecommendationRenderer,
    view: RwLock<ViewState>,
    query: RwLock<String>,
    generation: AtomicU64,
}

impl SearchController {
    pub fn new(api: Arc<dyn RecommenderApi>, recommendation_limit: Option<u32>) -> Self {
        let renderer = RecommendationRenderer::new(api.clone(), recommendation_limit);
        Self {
            api,
            renderer,
            view: RwLock::new(ViewState::Idle),
            query: RwLock::new(String::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view state
    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    /// Current value of the search field
    pub async fn query(&self) -> String {
        self.query.read().await.clone()
    }

    /// Searches for `query` and routes the outcome to the matching view
    pub async fn submit_search(&self, query: &str) -> ViewState {
        *self.query.write().await = query.to_string();
        let generation = self.begin().await;

        tracing::info!(query = %query, generation = generation, "Searching for movie");
        self.run_search(generation, query).await;

        self.view().await
    }

    /// Renders recommendations for a movie whose id is already known
    pub async fn show_recommendations(&self, movie_id: MovieId) -> ViewState {
        let generation = self.begin().await;
        self.run_recommendations(generation, movie_id).await;
        self.view().await
    }

    /// Applies a user action to the current view
    pub async fn dispatch(&self, action: Action) -> ViewState {
        tracing::debug!(action = action.name(), "Dispatching action");

        match action {
            Action::SelectSimilarTitle { title } => self.submit_search(&title).await,
            Action::SelectMovieChoice { movie_id } => self.show_recommendations(movie_id).await,
            Action::NewSearch => self.reset().await,
        }
    }

    /// Back to an empty form; anything still in flight is discarded
    pub async fn reset(&self) -> ViewState {
        let mut view = self.view.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.query.write().await.clear();
        *view = ViewState::Idle;
        ViewState::Idle
    }

    /// Starts a new generation and shows the loading state
    async fn begin(&self) -> u64 {
        let mut view = self.view.write().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *view = ViewState::Loading;
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Replaces the view unless a newer generation has started
    async fn apply(&self, generation: u64, state: ViewState) {
        let mut view = self.view.write().await;
        if !self.is_current(generation) {
            tracing::debug!(
                generation = generation,
                state = state.name(),
                "Discarding stale response"
            );
            return;
        }
        *view = state;
    }

    async fn run_search(&self, generation: u64, query: &str) {
        let response = match self.api.search(query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Search failed");
                let message = match e {
                    AppError::Application { message, .. } => message,
                    _ => SEARCH_FAILED.to_string(),
                };
                self.apply(generation, ViewState::error(message)).await;
                return;
            }
        };

        if !self.is_current(generation) {
            tracing::debug!(query = %query, generation = generation, "Discarding stale search");
            return;
        }

        let state = match SearchOutcome::classify(query, response) {
            SearchOutcome::ExactMatch { movie } => {
                tracing::info!(query = %query, movie_id = movie.movie_id, "Exact match");
                self.run_recommendations(generation, movie.movie_id).await;
                return;
            }
            SearchOutcome::MultipleExact { movies } => ViewState::Disambiguation {
                query: query.to_string(),
                movies,
            },
            SearchOutcome::PartialMatches { movies } => ViewState::SearchResults {
                query: query.to_string(),
                movies,
            },
            SearchOutcome::NoMatch => ViewState::NoMatch {
                query: query.to_string(),
            },
        };

        tracing::info!(query = %query, state = state.name(), "Search classified");
        self.apply(generation, state).await;
    }

    async fn run_recommendations(&self, generation: u64, movie_id: MovieId) {
        let state = self.renderer.show_recommendations(movie_id).await;
        self.apply(generation, state).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{MovieSummary, RecommendationResponse, SearchResponse},
        services::upstream::MockRecommenderApi,
    };
    use mockall::predicate::eq;

    fn movie(id: i64, title: &str, date: &str) -> MovieSummary {
        MovieSummary {
            movie_id: id,
            title: title.to_string(),
            release_date: Some(date.to_string()),
        }
    }

    fn similar(movies: Vec<MovieSummary>) -> SearchResponse {
        SearchResponse {
            status: "success".to_string(),
            message: None,
            exact_match: false,
            movie: None,
            similar_movies: Some(movies),
        }
    }

    fn recommendations(source: MovieSummary) -> RecommendationResponse {
        RecommendationResponse {
            status: "success".to_string(),
            message: None,
            source_movie: source,
            recommendations: vec![],
            metrics: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_exact_match_goes_straight_to_recommendations() {
        let heat = movie(949, "Heat", "1995-12-15");
        let mut api = MockRecommenderApi::new();
        let found = heat.clone();
        api.expect_search().with(eq("heat")).returning(move |_| {
            Ok(SearchResponse {
                status: "success".to_string(),
                message: None,
                exact_match: true,
                movie: Some(found.clone()),
                similar_movies: None,
            })
        });
        let source = heat.clone();
        api.expect_recommendations()
            .with(eq(949), eq(None))
            .times(1)
            .returning(move |_, _| Ok(recommendations(source.clone())));
        api.expect_visualization().never();

        let controller = SearchController::new(Arc::new(api), None);
        let ViewState::Recommendations(view) = controller.submit_search("heat").await else {
            panic!("expected recommendations");
        };
        assert_eq!(view.movie_id, 949);
        assert!(view.visualizations.iter().all(|c| c.url.contains("/949?t=")));
    }

    #[tokio::test]
    async fn test_duplicate_titles_show_disambiguation_only() {
        let old = movie(9320, "Avengers", "1998-08-13");
        let new = movie(24428, "Avengers", "2012-04-25");
        let fuzzy = movie(299534, "Avengers: Endgame", "2019-04-24");
        let listed = vec![old.clone(), fuzzy, new.clone()];

        let mut api = MockRecommenderApi::new();
        api.expect_search()
            .returning(move |_| Ok(similar(listed.clone())));
        api.expect_recommendations().never();

        let controller = SearchController::new(Arc::new(api), None);
        assert_eq!(
            controller.submit_search("Avengers").await,
            ViewState::Disambiguation {
                query: "Avengers".to_string(),
                movies: vec![old, new],
            }
        );
    }

    #[tokio::test]
    async fn test_choice_skips_search() {
        let chosen = movie(24428, "Avengers", "2012-04-25");
        let mut api = MockRecommenderApi::new();
        api.expect_search().never();
        let source = chosen.clone();
        api.expect_recommendations()
            .with(eq(24428), eq(None))
            .times(1)
            .returning(move |_, _| Ok(recommendations(source.clone())));

        let controller = SearchController::new(Arc::new(api), None);
        let state = controller
            .dispatch(Action::SelectMovieChoice { movie_id: 24428 })
            .await;
        assert!(matches!(
            state,
            ViewState::Recommendations(ref v) if v.heading == "Avengers (2012)"
        ));
    }

    #[tokio::test]
    async fn test_partial_matches_list_everything() {
        let listed = vec![
            movie(679, "Aliens", "1986-07-18"),
            movie(8077, "Alien³", "1992-05-22"),
        ];
        let expected = listed.clone();

        let mut api = MockRecommenderApi::new();
        api.expect_search()
            .returning(move |_| Ok(similar(listed.clone())));

        let controller = SearchController::new(Arc::new(api), None);
        assert_eq!(
            controller.submit_search("alien").await,
            ViewState::SearchResults {
                query: "alien".to_string(),
                movies: expected,
            }
        );
    }

    #[tokio::test]
    async fn test_similar_title_re_searches_by_title() {
        let aliens = movie(679, "Aliens", "1986-07-18");
        let mut api = MockRecommenderApi::new();
        let hit = aliens.clone();
        api.expect_search()
            .with(eq("Aliens"))
            .times(1)
            .returning(move |_| Ok(similar(vec![hit.clone()])));
        let source = aliens.clone();
        api.expect_recommendations()
            .with(eq(679), eq(None))
            .returning(move |_, _| Ok(recommendations(source.clone())));

        let controller = SearchController::new(Arc::new(api), None);
        let state = controller
            .dispatch(Action::SelectSimilarTitle {
                title: "Aliens".to_string(),
            })
            .await;
        assert!(matches!(state, ViewState::Recommendations(_)));
        assert_eq!(controller.query().await, "Aliens");
    }

    #[tokio::test]
    async fn test_no_match_echoes_query() {
        let mut api = MockRecommenderApi::new();
        api.expect_search().returning(|_| Ok(similar(vec![])));

        let controller = SearchController::new(Arc::new(api), None);
        assert_eq!(
            controller.submit_search("Zzyzx").await,
            ViewState::NoMatch {
                query: "Zzyzx".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_application_error_shows_upstream_message() {
        let mut api = MockRecommenderApi::new();
        api.expect_search().returning(|_| {
            Err(AppError::Application {
                status: 400,
                message: "Search query is required".to_string(),
            })
        });

        let controller = SearchController::new(Arc::new(api), None);
        assert_eq!(
            controller.submit_search("").await,
            ViewState::error("Search query is required")
        );
    }

    #[tokio::test]
    async fn test_transport_error_shows_generic_message() {
        let mut api = MockRecommenderApi::new();
        api.expect_search().returning(|_| {
            Err(AppError::UpstreamStatus {
                status: 503,
                body: "unavailable".to_string(),
            })
        });

        let controller = SearchController::new(Arc::new(api), None);
        assert_eq!(controller.submit_search("heat").await, ViewState::error(SEARCH_FAILED));
    }

    #[tokio::test]
    async fn test_new_search_resets() {
        let mut api = MockRecommenderApi::new();
        api.expect_search().returning(|_| Ok(similar(vec![])));

        let controller = SearchController::new(Arc::new(api), None);
        controller.submit_search("Zzyzx").await;
        assert_eq!(controller.dispatch(Action::NewSearch).await, ViewState::Idle);
        assert_eq!(controller.view().await, ViewState::Idle);
        assert_eq!(controller.query().await, "");
    }
}
