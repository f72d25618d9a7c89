use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::MovieId,
};

/// User intents that can be triggered from a rendered view
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pick a candidate from search results; re-searches by its exact title
    SelectSimilarTitle { title: String },
    /// Pick one of several movies sharing a title; goes straight to recommendations
    SelectMovieChoice { movie_id: MovieId },
    /// Back to an empty search form
    NewSearch,
}

impl Action {
    pub const SELECT_SIMILAR_TITLE: &'static str = "select_similar_title";
    pub const SELECT_MOVIE_CHOICE: &'static str = "select_movie_choice";
    pub const NEW_SEARCH: &'static str = "new_search";

    /// Value of the `action` form field
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectSimilarTitle { .. } => Self::SELECT_SIMILAR_TITLE,
            Action::SelectMovieChoice { .. } => Self::SELECT_MOVIE_CHOICE,
            Action::NewSearch => Self::NEW_SEARCH,
        }
    }
}

/// Raw `POST /action` form body
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    pub action: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub movie_id: Option<String>,
}

impl TryFrom<ActionForm> for Action {
    type Error = AppError;

    fn try_from(form: ActionForm) -> AppResult<Self> {
        match form.action.as_str() {
            Action::SELECT_SIMILAR_TITLE => {
                let title = form
                    .title
                    .ok_or_else(|| AppError::InvalidInput("Missing title".to_string()))?;
                Ok(Action::SelectSimilarTitle { title })
            }
            Action::SELECT_MOVIE_CHOICE => {
                let raw = form
                    .movie_id
                    .ok_or_else(|| AppError::InvalidInput("Missing movie_id".to_string()))?;
                let movie_id = raw.trim().parse::<MovieId>().map_err(|_| {
                    AppError::InvalidInput(format!("Invalid movie_id: {}", raw))
                })?;
                Ok(Action::SelectMovieChoice { movie_id })
            }
            Action::NEW_SEARCH => Ok(Action::NewSearch),
            other => Err(AppError::InvalidInput(format!("Unknown action: {}", other))),
        }
    }
}
