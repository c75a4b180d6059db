// SPDX-License-Identifier: MPL-2.0

use crate::backend::types::{
    BatchResponse, Category, CourseBundle, CourseCategory, Insight, NewInsight,
};
use crate::backend::{BackendError, CatalogBackend};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use url::Url;

/// Shared HTTP client for all backend calls.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .timeout(std::time::Duration::from_secs(15))
        .connect_timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("failed to create HTTP client")
});

/// Error payload the backend attaches to 4xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Success flag returned by the delete endpoints.
#[derive(Deserialize)]
struct SuccessBody {
    #[allow(dead_code)]
    success: bool,
}

/// Talks to the catalog backend over HTTP/JSON.
///
/// Holds the caller's session token (if any); the backend decides what an
/// unauthenticated caller may see, this client only forwards identity.
pub struct HttpBackend {
    base_url: String,
    session_token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: RwLock::new(None),
        }
    }

    /// Attach the session token sent with every subsequent request.
    pub fn set_session_token(&self, token: Option<String>) {
        let mut guard = self.session_token.write().expect("session lock poisoned");
        *guard = token;
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| BackendError::InvalidRequest(format!("bad endpoint url: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.session_token.read().expect("session lock poisoned");
        match guard.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map a non-success status to the matching error, pulling the backend's
    /// own message out of the body where it provides one.
    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| status.to_string());
        Err(match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized,
            StatusCode::NOT_FOUND => BackendError::NotFound,
            StatusCode::BAD_REQUEST => BackendError::InvalidRequest(message),
            _ => BackendError::Network(message),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let url = self.endpoint(path, query)?;
        let response = self
            .authorize(HTTP_CLIENT.get(url))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = self.endpoint(path, &[])?;
        let response = self
            .authorize(HTTP_CLIENT.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<(), BackendError> {
        let url = self.endpoint(path, query)?;
        let response = self
            .authorize(HTTP_CLIENT.delete(url))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        // Body is a bare success flag; parse it to catch truncated responses.
        Self::check(response)
            .await?
            .json::<SuccessBody>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn insights(&self, course_code: &str) -> Result<Vec<Insight>, BackendError> {
        self.get_json("insights", &[("courseCode", course_code)])
            .await
    }

    async fn create_insight(&self, insight: &NewInsight) -> Result<Insight, BackendError> {
        self.post_json("insights", insight).await
    }

    async fn delete_insight(&self, id: &str) -> Result<(), BackendError> {
        self.delete("insights", &[("id", id)]).await
    }

    async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        self.get_json("categories", &[]).await
    }

    async fn create_category(&self, name: &str) -> Result<Category, BackendError> {
        let mut body = HashMap::new();
        body.insert("name", name);
        self.post_json("categories", &body).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), BackendError> {
        self.delete("categories", &[("id", id)]).await
    }

    async fn course_categories(
        &self,
        course_code: &str,
    ) -> Result<Vec<CourseCategory>, BackendError> {
        self.get_json("course-categories", &[("courseCode", course_code)])
            .await
    }

    async fn assign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<CourseCategory, BackendError> {
        let mut body = HashMap::new();
        body.insert("courseCode", course_code);
        body.insert("categoryId", category_id);
        self.post_json("course-categories", &body).await
    }

    async fn unassign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<(), BackendError> {
        self.delete(
            "course-categories",
            &[("courseCode", course_code), ("categoryId", category_id)],
        )
        .await
    }

    async fn batch(&self, course_codes: &[String]) -> Result<BatchResponse, BackendError> {
        let joined = course_codes.join(",");
        let batch: HashMap<String, CourseBundle> = self
            .get_json("batch", &[("courseCodes", joined.as_str())])
            .await?;
        Ok(batch)
    }
}
