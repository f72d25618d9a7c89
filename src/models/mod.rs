use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

pub mod genres;
pub mod outcome;

pub use genres::{GenreName, Genres};
pub use outcome::SearchOutcome;

/// Upstream movie identifier
pub type MovieId = i64;

/// Minimal movie identity used wherever candidates are listed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSummary {
    /// Parsed release date, if present and in a recognised format
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_date)
    }

    /// Release year, if the release date is known
    pub fn release_year(&self) -> Option<i32> {
        self.release_date().map(|d| d.year())
    }
}

/// Raw body of `POST /search`
///
/// The wire shape conflates the exact-match flag with the candidate list;
/// [`SearchOutcome::classify`] turns it into a single variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub exact_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_movies: Option<Vec<MovieSummary>>,
}

/// One ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(default)]
    pub genres: Option<Genres>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub similarity_score: f64,
}

/// Aggregate evaluation metrics, pre-computed by the upstream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    /// Percentage of shared genres
    #[serde(default, deserialize_with = "flexible_f64")]
    pub average_genre_overlap: f64,
    /// Mean absolute rating difference (lower is better)
    #[serde(default, deserialize_with = "flexible_f64")]
    pub average_rating_difference: f64,
    /// Percentage of thematic similarity
    #[serde(default, deserialize_with = "flexible_f64")]
    pub average_content_relevance: f64,
}

/// Body of `GET /recommendations/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub source_movie: MovieSummary,
    #[serde(default)]
    pub recommendations: Vec<RecommendationItem>,
    #[serde(default)]
    pub metrics: Metrics,
}

/// Body of `GET /status`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    pub status: String,
}

/// Envelope used only to read `status`/`message` before the full body is trusted
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusEnvelope {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Parses the date formats the upstream is known to emit:
/// `2010-07-16`, RFC 3339 timestamps and RFC 2822 HTTP dates.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            // Flask renders dates as "Fri, 16 Jul 2010 00:00:00 GMT"
            NaiveDate::parse_from_str(raw.get(5..16)?, "%d %b %Y").ok()
        })
}

/// SQL decimals reach us either as JSON numbers or as numeric strings
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
        Null(()),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        NumberOrString::Null(()) => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_release_date("2010-07-16"),
            NaiveDate::from_ymd_opt(2010, 7, 16)
        );
    }

    #[test]
    fn test_parse_http_date() {
        assert_eq!(
            parse_release_date("Fri, 16 Jul 2010 00:00:00 GMT"),
            NaiveDate::from_ymd_opt(2010, 7, 16)
        );
    }

    #[test]
    fn test_parse_rfc3339_date() {
        assert_eq!(
            parse_release_date("2012-04-25T00:00:00Z"),
            NaiveDate::from_ymd_opt(2012, 4, 25)
        );
    }

    #[test]
    fn test_parse_garbage_date() {
        assert_eq!(parse_release_date("sometime"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn test_search_response_defaults() {
        let json = r#"{"status": "success", "exact_match": false, "similar_movies": []}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(!response.exact_match);
        assert_eq!(response.similar_movies, Some(vec![]));
        assert!(response.movie.is_none());
    }

    #[test]
    fn test_recommendation_item_accepts_string_numbers() {
        let json = r#"{
            "movie_id": 24428,
            "title": "The Avengers",
            "release_date": "2012-04-25",
            "genres": [{"id": 28, "name": "Action"}],
            "vote_average": "7.4",
            "similarity_score": 0.8731,
            "overview": "ignored"
        }"#;

        let item: RecommendationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.movie.movie_id, 24428);
        assert_eq!(item.vote_average, 7.4);
        assert_eq!(item.similarity_score, 0.8731);
        assert_eq!(item.movie.release_year(), Some(2012));
    }

    #[test]
    fn test_recommendation_item_null_rating() {
        let json =
            r#"{"movie_id": 1, "title": "X", "vote_average": null, "similarity_score": 0.5}"#;
        let item: RecommendationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.vote_average, 0.0);
        assert!(item.genres.is_none());
    }

    #[test]
    fn test_metrics_default_when_missing() {
        let json = r#"{
            "status": "success",
            "source_movie": {"movie_id": 1, "title": "Heat"},
            "recommendations": []
        }"#;
        let response: RecommendationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.metrics, Metrics::default());
    }

    #[test]
    fn test_status_envelope() {
        let env: StatusEnvelope =
            serde_json::from_str(r#"{"status":"error","message":"Search query is required"}"#)
                .unwrap();
        assert!(env.is_error());
        assert_eq!(env.message.as_deref(), Some("Search query is required"));
    }
}
