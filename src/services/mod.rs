pub mod recommendation_renderer;
pub mod search_controller;
pub mod upstream;
pub mod visualization;

pub use recommendation_renderer::RecommendationRenderer;
pub use search_controller::SearchController;
pub use upstream::{HttpRecommenderApi, RecommenderApi};
