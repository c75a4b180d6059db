// SPDX-License-Identifier: MPL-2.0

//! In-process fake of the backend CRUD handlers, for store tests.
//!
//! Mirrors the real backend's behavior closely enough to exercise store
//! invariants: server-assigned ids, duplicate-assignment rejection, category
//! cascade on delete, author withheld on anonymous insights, and per-call
//! counters for asserting request counts.

use crate::backend::{
    BackendError, BatchResponse, CatalogBackend, Category, CourseBundle, CourseCategory, Insight,
    InsightAuthor, NewInsight,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

const USER_ID: &str = "user-1";

#[derive(Default)]
pub struct CallCounts {
    pub batch: AtomicUsize,
    pub categories: AtomicUsize,
    pub create_insight: AtomicUsize,
    pub delete_insight: AtomicUsize,
    pub create_category: AtomicUsize,
    pub delete_category: AtomicUsize,
    pub course_categories: AtomicUsize,
    pub assign: AtomicUsize,
    pub unassign: AtomicUsize,
}

#[derive(Default)]
struct Data {
    next_id: u64,
    insights: Vec<Insight>,
    categories: Vec<Category>,
    assignments: Vec<CourseCategory>,
    last_batch_codes: Vec<String>,
}

#[derive(Default)]
pub struct MockBackend {
    data: Mutex<Data>,
    pub calls: CallCounts,
    /// When set, every call fails with a network error.
    pub fail: AtomicBool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Course codes requested by the most recent batch call.
    pub fn last_batch_codes(&self) -> Vec<String> {
        self.data.lock().unwrap().last_batch_codes.clone()
    }

    /// Seed a category directly, bypassing the counters.
    pub fn seed_category(&self, name: &str) -> Category {
        let mut data = self.data.lock().unwrap();
        Self::push_category(&mut data, name)
    }

    fn check_failing(&self) -> Result<(), BackendError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(BackendError::Network("injected failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_id(data: &mut Data) -> String {
        data.next_id += 1;
        format!("id-{}", data.next_id)
    }

    fn push_category(data: &mut Data, name: &str) -> Category {
        let id = Self::next_id(data);
        // Monotonic timestamps so created-at ordering is deterministic
        let category = Category {
            id,
            user_id: USER_ID.to_string(),
            name: name.to_string(),
            created_at: Utc::now() + Duration::seconds(data.next_id as i64),
        };
        data.categories.push(category.clone());
        category
    }
}

#[async_trait]
impl CatalogBackend for MockBackend {
    async fn insights(&self, course_code: &str) -> Result<Vec<Insight>, BackendError> {
        self.check_failing()?;
        let data = self.data.lock().unwrap();
        let mut insights: Vec<Insight> = data
            .insights
            .iter()
            .filter(|i| i.course_code == course_code)
            .cloned()
            .collect();
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }

    async fn create_insight(&self, insight: &NewInsight) -> Result<Insight, BackendError> {
        self.calls.create_insight.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        let id = Self::next_id(&mut data);
        let author = if insight.is_anonymous {
            None
        } else {
            Some(InsightAuthor {
                id: USER_ID.to_string(),
                name: Some("Test User".to_string()),
                image: None,
            })
        };
        let created = Insight {
            id,
            course_code: insight.course_code.clone(),
            text: insight.text.clone(),
            difficulty: insight.difficulty,
            created_at: Utc::now(),
            is_anonymous: insight.is_anonymous,
            author,
        };
        data.insights.push(created.clone());
        Ok(created)
    }

    async fn delete_insight(&self, id: &str) -> Result<(), BackendError> {
        self.calls.delete_insight.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        let before = data.insights.len();
        data.insights.retain(|i| i.id != id);
        if data.insights.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        self.calls.categories.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let data = self.data.lock().unwrap();
        let mut categories = data.categories.clone();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(categories)
    }

    async fn create_category(&self, name: &str) -> Result<Category, BackendError> {
        self.calls.create_category.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        if name.is_empty() {
            return Err(BackendError::InvalidRequest("Name is required".to_string()));
        }
        let mut data = self.data.lock().unwrap();
        Ok(Self::push_category(&mut data, name))
    }

    async fn delete_category(&self, id: &str) -> Result<(), BackendError> {
        self.calls.delete_category.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        data.categories.retain(|c| c.id != id);
        // Backend cascade: assignments referencing the category go too
        data.assignments.retain(|a| a.category_id != id);
        Ok(())
    }

    async fn course_categories(
        &self,
        course_code: &str,
    ) -> Result<Vec<CourseCategory>, BackendError> {
        self.calls.course_categories.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let data = self.data.lock().unwrap();
        Ok(data
            .assignments
            .iter()
            .filter(|a| a.course_code == course_code)
            .cloned()
            .collect())
    }

    async fn assign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<CourseCategory, BackendError> {
        self.calls.assign.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        let category_name = match data.categories.iter().find(|c| c.id == category_id) {
            Some(c) => c.name.clone(),
            None => return Err(BackendError::NotFound),
        };
        let duplicate = data
            .assignments
            .iter()
            .any(|a| a.course_code == course_code && a.category_id == category_id);
        if duplicate {
            return Err(BackendError::InvalidRequest(
                "Course already in category".to_string(),
            ));
        }
        let id = Self::next_id(&mut data);
        let assignment = CourseCategory {
            id,
            course_code: course_code.to_string(),
            category_id: category_id.to_string(),
            category_name,
        };
        data.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn unassign_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<(), BackendError> {
        self.calls.unassign.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        data.assignments
            .retain(|a| !(a.course_code == course_code && a.category_id == category_id));
        Ok(())
    }

    async fn batch(&self, course_codes: &[String]) -> Result<BatchResponse, BackendError> {
        self.calls.batch.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let mut data = self.data.lock().unwrap();
        data.last_batch_codes = course_codes.to_vec();
        let mut response = BatchResponse::new();
        for code in course_codes {
            let bundle = CourseBundle {
                insights: data
                    .insights
                    .iter()
                    .filter(|i| &i.course_code == code)
                    .cloned()
                    .collect(),
                categories: data
                    .assignments
                    .iter()
                    .filter(|a| &a.course_code == code)
                    .cloned()
                    .collect(),
            };
            response.insert(code.clone(), bundle);
        }
        Ok(response)
    }
}
