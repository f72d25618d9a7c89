use std::{fmt, str::FromStr};

use crate::{
    error::AppError,
    models::MovieId,
    services::upstream::{RecommenderApi, VisualizationImage},
};

/// The two supplementary images shown under the recommendation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualizationKind {
    SimilarityChart,
    WordCloud,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 2] =
        [VisualizationKind::SimilarityChart, VisualizationKind::WordCloud];

    /// Path segment used by the upstream and by the proxy route
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationKind::SimilarityChart => "similarity_chart",
            VisualizationKind::WordCloud => "wordcloud",
        }
    }

    /// Card heading
    pub fn heading(&self) -> &'static str {
        match self {
            VisualizationKind::SimilarityChart => "Similarity Chart",
            VisualizationKind::WordCloud => "Themes & Topics",
        }
    }

    /// Lowercase name used in loading and warning texts
    pub fn label(&self) -> &'static str {
        match self {
            VisualizationKind::SimilarityChart => "similarity chart",
            VisualizationKind::WordCloud => "wordcloud",
        }
    }

    /// Browser-facing URL; the timestamp defeats image caching between renders
    pub fn public_url(&self, movie_id: MovieId, timestamp: i64) -> String {
        format!(
            "/api/visualization/{}/{}?t={}",
            self.as_str(),
            movie_id,
            timestamp
        )
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "similarity_chart" => Ok(VisualizationKind::SimilarityChart),
            "wordcloud" => Ok(VisualizationKind::WordCloud),
            other => Err(AppError::InvalidInput(format!(
                "Invalid visualization type: {}",
                other
            ))),
        }
    }
}

/// Result of loading one visualization from the upstream
#[derive(Debug)]
pub enum VisualizationLoad {
    /// A decodable image, ready to hand to the browser
    Loaded(VisualizationImage),
    /// Anything else; the card in the browser shows its warning instead
    Failed(AppError),
}

/// Loads one visualization on behalf of one card.
///
/// Each card's `<img>` hits the proxy separately, so a failure here only
/// reaches that card. A 200 reply that is not an image counts as a failure.
pub async fn load_visualization(
    api: &dyn RecommenderApi,
    kind: VisualizationKind,
    movie_id: MovieId,
) -> VisualizationLoad {
    let image = match api.visualization(kind, movie_id).await {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!(
                movie_id = movie_id,
                kind = %kind,
                error = %e,
                "Visualization load failed"
            );
            return VisualizationLoad::Failed(e);
        }
    };

    if !image.is_image() {
        tracing::warn!(
            movie_id = movie_id,
            kind = %kind,
            content_type = %image.content_type,
            size = image.bytes.len(),
            "Visualization is not a decodable image"
        );
        return VisualizationLoad::Failed(AppError::Visualization(format!(
            "{} for movie {} has content type {}",
            kind, movie_id, image.content_type
        )));
    }

    VisualizationLoad::Loaded(image)
}
