use super::{MovieSummary, SearchResponse};

/// Disambiguation shape of a successful search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Single unambiguous title hit
    ExactMatch { movie: MovieSummary },
    /// Several stored movies share exactly the searched title
    MultipleExact { movies: Vec<MovieSummary> },
    /// Only fuzzy hits; the full candidate list is kept
    PartialMatches { movies: Vec<MovieSummary> },
    NoMatch,
}

impl SearchOutcome {
    /// Classifies a successful search response against the query the user typed.
    ///
    /// Title equality is case-insensitive and otherwise exact: no trimming or
    /// unicode normalisation is applied.
    pub fn classify(query: &str, response: SearchResponse) -> Self {
        if response.exact_match {
            if let Some(movie) = response.movie {
                return SearchOutcome::ExactMatch { movie };
            }
            tracing::warn!(query = %query, "Exact match reported without a movie");
        }

        let candidates = match response.similar_movies {
            Some(movies) if !movies.is_empty() => movies,
            _ => return SearchOutcome::NoMatch,
        };

        let needle = query.to_lowercase();
        let mut exact: Vec<MovieSummary> = candidates
            .iter()
            .filter(|m| m.title.to_lowercase() == needle)
            .cloned()
            .collect();

        match exact.len() {
            0 => SearchOutcome::PartialMatches { movies: candidates },
            1 => SearchOutcome::ExactMatch {
                movie: exact.remove(0),
            },
            _ => SearchOutcome::MultipleExact { movies: exact },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str, date: &str) -> MovieSummary {
        MovieSummary {
            movie_id: id,
            title: title.to_string(),
            release_date: Some(date.to_string()),
        }
    }

    fn response(
        exact: bool,
        movie: Option<MovieSummary>,
        similar: Vec<MovieSummary>,
    ) -> SearchResponse {
        SearchResponse {
            status: "success".to_string(),
            message: None,
            exact_match: exact,
            movie,
            similar_movies: Some(similar),
        }
    }

    #[test]
    fn test_exact_match_wins_over_candidates() {
        let heat = movie(949, "Heat", "1995-12-15");
        let outcome = SearchOutcome::classify(
            "heat",
            response(true, Some(heat.clone()), vec![movie(1, "Heat", "1986-01-01")]),
        );
        assert_eq!(outcome, SearchOutcome::ExactMatch { movie: heat });
    }

    #[test]
    fn test_duplicate_titles_need_disambiguation() {
        let old = movie(9320, "The Avengers", "1998-08-13");
        let new = movie(24428, "The Avengers", "2012-04-25");
        let outcome = SearchOutcome::classify(
            "the avengers",
            response(
                false,
                None,
                vec![old.clone(), movie(5, "Avengers: Endgame", "2019-04-24"), new.clone()],
            ),
        );
        assert_eq!(
            outcome,
            SearchOutcome::MultipleExact {
                movies: vec![old, new]
            }
        );
    }

    #[test]
    fn test_single_case_insensitive_hit_is_exact() {
        let alien = movie(348, "Alien", "1979-05-25");
        let outcome = SearchOutcome::classify(
            "ALIEN",
            response(false, None, vec![alien.clone(), movie(679, "Aliens", "1986-07-18")]),
        );
        assert_eq!(outcome, SearchOutcome::ExactMatch { movie: alien });
    }

    #[test]
    fn test_partial_matches_keep_full_list() {
        let candidates = vec![
            movie(679, "Aliens", "1986-07-18"),
            movie(8077, "Alien³", "1992-05-22"),
        ];
        let outcome =
            SearchOutcome::classify("alien", response(false, None, candidates.clone()));
        assert_eq!(outcome, SearchOutcome::PartialMatches { movies: candidates });
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let candidates = vec![movie(348, "Alien", "1979-05-25")];
        let outcome =
            SearchOutcome::classify("alien ", response(false, None, candidates.clone()));
        assert_eq!(outcome, SearchOutcome::PartialMatches { movies: candidates });
    }

    #[test]
    fn test_empty_list_is_no_match() {
        let outcome = SearchOutcome::classify("zzz", response(false, None, vec![]));
        assert_eq!(outcome, SearchOutcome::NoMatch);
    }

    #[test]
    fn test_missing_list_is_no_match() {
        let mut raw = response(false, None, vec![]);
        raw.similar_movies = None;
        assert_eq!(SearchOutcome::classify("zzz", raw), SearchOutcome::NoMatch);
    }
}
