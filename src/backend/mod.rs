// SPDX-License-Identifier: MPL-2.0

mod client;
mod types;

pub use client::HttpBackend;
pub use types::{
    BatchResponse, Category, CourseBundle, CourseCategory, Insight, InsightAuthor, NewInsight,
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// The backend CRUD surface the stores consume.
///
/// The real implementation is [`HttpBackend`]; tests substitute an in-process
/// fake. Authorization (author-only deletes, owner-only categories) is the
/// backend's responsibility and is surfaced here only as error variants.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// All insights for a course, newest first. No auth required.
    async fn insights(&self, course_code: &str) -> Result<Vec<Insight>, BackendError>;

    /// Create an insight; the backend echoes it back with a server-assigned id.
    async fn create_insight(&self, insight: &NewInsight) -> Result<Insight, BackendError>;

    /// Delete an insight by id. Author-only; others get `NotFound`.
    async fn delete_insight(&self, id: &str) -> Result<(), BackendError>;

    /// The caller's categories, newest first.
    async fn categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn create_category(&self, name: &str) -> Result<Category, BackendError>;

    /// Delete a category. The backend cascades: all course assignments
    /// referencing it are removed server-side.
    async fn delete_category(&self, id: &str) -> Result<(), BackendError>;

    /// The caller's assignments for one course, with category names joined in.
    async fn course_categories(&self, course_code: &str)
    -> Result<Vec<CourseCategory>, BackendError>;

    /// Assign a course to a category. `InvalidRequest` on duplicate,
    /// `NotFound` if the category is not owned by the caller.
    async fn assign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<CourseCategory, BackendError>;

    async fn unassign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<(), BackendError>;

    /// Insights plus (for authenticated callers) assignments for many courses
    /// in one round trip.
    async fn batch(&self, course_codes: &[String]) -> Result<BatchResponse, BackendError>;
}
