// SPDX-License-Identifier: MPL-2.0

use crate::config::DEFAULT_RATINGS_URL;
use crate::ratings::ProfessorRating;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Wire shape of the rating endpoint:
/// `{school, professor: {name, link, department, ratings: {...}}}`.
#[derive(Debug, Deserialize)]
pub struct RatingResponse {
    #[allow(dead_code)]
    pub school: Option<String>,
    pub professor: ProfessorBody,
}

#[derive(Debug, Deserialize)]
pub struct ProfessorBody {
    pub name: String,
    pub link: Option<String>,
    pub department: Option<String>,
    pub ratings: RatingsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsBody {
    pub overall: f64,
    pub difficulty: f64,
    pub would_take_again: Option<f64>,
    pub total_ratings: u32,
}

impl From<RatingResponse> for ProfessorRating {
    fn from(response: RatingResponse) -> Self {
        let professor = response.professor;
        Self {
            name: professor.name,
            link: professor.link,
            department: professor.department,
            overall: professor.ratings.overall,
            difficulty: professor.ratings.difficulty,
            would_take_again: professor.ratings.would_take_again,
            total_ratings: professor.ratings.total_ratings,
        }
    }
}

/// One upstream rating lookup. Implemented by [`RmpSource`] for the real
/// endpoint and by in-process fakes in tests.
#[async_trait]
pub trait RatingSource: Send + Sync {
    async fn lookup(&self, school: &str, professor: &str)
    -> Result<RatingResponse, SourceError>;
}

/// The real read-only rating endpoint, queried with `school` and `professor`
/// parameters.
pub struct RmpSource {
    client: reqwest::Client,
    endpoint: String,
}

impl RmpSource {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_RATINGS_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for RmpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RatingSource for RmpSource {
    async fn lookup(
        &self,
        school: &str,
        professor: &str,
    ) -> Result<RatingResponse, SourceError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| SourceError::InvalidResponse(format!("bad endpoint url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("school", school)
            .append_pair("professor", professor);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}
