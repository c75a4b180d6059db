// SPDX-License-Identifier: MPL-2.0

mod fetcher;
mod matching;
mod source;

pub use fetcher::RatingFetcher;
pub use matching::names_match;
pub use source::{ProfessorBody, RatingResponse, RatingSource, RatingsBody, RmpSource, SourceError};

use serde::{Deserialize, Serialize};

/// Aggregate student ratings for one professor, flattened from the wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorRating {
    pub name: String,
    pub link: Option<String>,
    pub department: Option<String>,
    pub overall: f64,
    pub difficulty: f64,
    pub would_take_again: Option<f64>,
    pub total_ratings: u32,
}

/// Outcome of a rating lookup. `NotFound` covers both a genuinely absent
/// professor and a returned candidate that failed the name match; both are
/// cached so futile lookups are not repeated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "rating")]
pub enum RatingOutcome {
    Found(ProfessorRating),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_round_trips_through_json() {
        let outcome = RatingOutcome::Found(ProfessorRating {
            name: "Sartaj Sahni".to_string(),
            link: Some("https://example.com/p/1".to_string()),
            department: Some("Computer Science".to_string()),
            overall: 4.5,
            difficulty: 3.8,
            would_take_again: None,
            total_ratings: 112,
        });
        let json = serde_json::to_string(&outcome).unwrap();
        let back: RatingOutcome = serde_json::from_str(&json).unwrap();
        match back {
            RatingOutcome::Found(r) => {
                assert_eq!(r.name, "Sartaj Sahni");
                assert_eq!(r.total_ratings, 112);
            }
            RatingOutcome::NotFound => panic!("expected Found"),
        }
    }

    #[test]
    fn test_not_found_round_trips_through_json() {
        let json = serde_json::to_string(&RatingOutcome::NotFound).unwrap();
        let back: RatingOutcome = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, RatingOutcome::NotFound));
    }
}
