use crate::{
    models::{MovieId, MovieSummary},
    services::visualization::VisualizationKind,
};

pub mod action;
pub mod format;
pub mod render;

pub use action::{Action, ActionForm};
pub use render::{render_page, PageContext};

/// Everything the page can show below the search form
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    /// Nothing searched yet, or reset by a new search
    #[default]
    Idle,
    /// A search or recommendation request is in flight. Pages show the same
    /// indicator client-side between a form submit and the next document.
    Loading,
    Error { message: String },
    Recommendations(RecommendationsView),
    /// Several stored movies share exactly the searched title
    Disambiguation {
        query: String,
        movies: Vec<MovieSummary>,
    },
    /// Only partial title hits
    SearchResults {
        query: String,
        movies: Vec<MovieSummary>,
    },
    NoMatch { query: String },
}

impl ViewState {
    /// State name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Error { .. } => "error",
            ViewState::Recommendations(_) => "recommendations",
            ViewState::Disambiguation { .. } => "disambiguation",
            ViewState::SearchResults { .. } => "search_results",
            ViewState::NoMatch { .. } => "no_match",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ViewState::Error {
            message: message.into(),
        }
    }
}

/// Rendered recommendations for one source movie
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsView {
    pub movie_id: MovieId,
    /// Cache-busting value shared by both visualization URLs
    pub timestamp: i64,
    /// Source movie title, with the release year when known
    pub heading: String,
    pub rows: Vec<RecommendationRow>,
    pub metrics: Vec<MetricCard>,
    pub visualizations: Vec<VisualizationCard>,
}

impl RecommendationsView {
    pub fn visualization(&self, kind: VisualizationKind) -> Option<&VisualizationCard> {
        self.visualizations.iter().find(|c| c.kind == kind)
    }
}

/// One table row, already formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRow {
    pub title: String,
    pub genres: String,
    pub rating: String,
    pub release_date: String,
    /// Drives both the bar width and the label
    pub similarity_percent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub caption: &'static str,
    pub icon: &'static str,
}

/// One visualization card. It is sent with a spinner; the browser fetches
/// `url` and swaps in the image or the card's warning.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationCard {
    pub kind: VisualizationKind,
    pub url: String,
}

impl VisualizationCard {
    pub fn new(kind: VisualizationKind, movie_id: MovieId, timestamp: i64) -> Self {
        Self {
            kind,
            url: kind.public_url(movie_id, timestamp),
        }
    }
}
