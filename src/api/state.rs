use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::AppResult,
    services::{HttpRecommenderApi, RecommenderApi, SearchController},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn RecommenderApi>,
    pub recommendation_limit: Option<u32>,
}

impl AppState {
    /// Creates state around an already constructed upstream client
    pub fn new(api: Arc<dyn RecommenderApi>, recommendation_limit: Option<u32>) -> Self {
        Self {
            api,
            recommendation_limit,
        }
    }

    /// Creates state talking to the upstream configured in `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api = HttpRecommenderApi::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self::new(Arc::new(api), config.recommendation_limit))
    }

    /// A fresh controller for one page interaction
    pub fn controller(&self) -> SearchController {
        SearchController::new(self.api.clone(), self.recommendation_limit)
    }
}
