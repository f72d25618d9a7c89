//! Display formatting for values rendered in the recommendation views.

use chrono::NaiveDate;

/// Star rating with one decimal place
pub fn rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

/// Percentage value with one decimal place, without the `%` sign
pub fn percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Similarity score (0.0–1.0) as a percentage with one decimal place.
///
/// The same string feeds both the bar width and the label under it.
pub fn similarity_percent(score: f64) -> String {
    percent(score * 100.0)
}

/// Average rating difference, two decimals
pub fn rating_difference(value: f64) -> String {
    format!("{:.2}", value)
}

/// `M/D/YYYY`, or `Unknown` when the release date is missing or unreadable
pub fn release_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%-m/%-d/%Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Title followed by the release year when known: `Heat (1995)`
pub fn title_with_year(title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

/// Minimal HTML escaping for text and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_one_decimal() {
        assert_eq!(rating(7.0), "7.0");
        assert_eq!(rating(6.86), "6.9");
    }

    #[test]
    fn test_similarity_percent() {
        assert_eq!(similarity_percent(0.8731), "87.3");
        assert_eq!(similarity_percent(1.0), "100.0");
        assert_eq!(similarity_percent(0.0), "0.0");
    }

    #[test]
    fn test_rating_difference_two_decimals() {
        assert_eq!(rating_difference(0.7412), "0.74");
    }

    #[test]
    fn test_release_date() {
        assert_eq!(release_date(NaiveDate::from_ymd_opt(2012, 4, 25)), "4/25/2012");
        assert_eq!(release_date(None), "Unknown");
    }

    #[test]
    fn test_title_with_year() {
        assert_eq!(title_with_year("Heat", Some(1995)), "Heat (1995)");
        assert_eq!(title_with_year("Heat", None), "Heat");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }
}
