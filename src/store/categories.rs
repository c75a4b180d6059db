// SPDX-License-Identifier: MPL-2.0

use crate::backend::{Category, CatalogBackend};
use crate::store::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

#[derive(Default)]
struct CategoryState {
    /// The caller's categories, in the backend's order (newest first).
    categories: Vec<Category>,
    /// Category ids per course, for courses explicitly queried.
    course_categories: HashMap<String, Vec<String>>,
    last_error: Option<String>,
}

/// Standalone category store: the caller's category list plus per-course
/// membership for explicitly queried courses.
///
/// The alternate UI variant of [`crate::store::CourseStore`]'s category
/// handling, with the same invariants: confirm-then-apply mutations, wholesale
/// state replacement, failures mirrored into `last_error` without touching
/// prior state.
pub struct CategoryStore {
    backend: Arc<dyn CatalogBackend>,
    state: RwLock<CategoryState>,
    version: watch::Sender<u64>,
}

impl CategoryStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            backend,
            state: RwLock::new(CategoryState::default()),
            version,
        }
    }

    /// Replace the local list with the backend's current one.
    pub async fn fetch_categories(&self) -> Result<(), StoreError> {
        let categories = match self.backend.categories().await {
            Ok(categories) => categories,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.mutate(|s| s.categories = categories);
        Ok(())
    }

    /// Create a category. The name must be non-empty once trimmed; the
    /// server-returned copy (with id) is appended after confirmation.
    pub async fn add_category(&self, name: &str) -> Result<Category, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.fail(StoreError::Invalid("category name is required".to_string())));
        }

        let created = match self.backend.create_category(name).await {
            Ok(category) => category,
            Err(e) => return Err(self.fail(e.into())),
        };

        let stored = created.clone();
        self.mutate(|s| s.categories.push(stored));
        Ok(created)
    }

    /// Delete a category and strip its id from every course's membership
    /// list. The backend cascade is authoritative; the local strip only keeps
    /// this cache consistent.
    pub async fn remove_category(&self, category_id: &str) -> Result<(), StoreError> {
        if let Err(e) = self.backend.delete_category(category_id).await {
            return Err(self.fail(e.into()));
        }

        self.mutate(|s| {
            s.categories.retain(|c| c.id != category_id);
            for ids in s.course_categories.values_mut() {
                ids.retain(|id| id != category_id);
            }
        });
        Ok(())
    }

    /// Load the membership list for one course.
    pub async fn fetch_course_categories(&self, course_code: &str) -> Result<(), StoreError> {
        let assignments = match self.backend.course_categories(course_code).await {
            Ok(assignments) => assignments,
            Err(e) => return Err(self.fail(e.into())),
        };

        let ids: Vec<String> = assignments.into_iter().map(|a| a.category_id).collect();
        self.mutate(|s| {
            s.course_categories.insert(course_code.to_string(), ids);
        });
        Ok(())
    }

    /// Assign the course to a category, recording membership after the
    /// backend confirms.
    pub async fn add_course_to_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.backend.assign_category(course_code, category_id).await {
            return Err(self.fail(e.into()));
        }

        self.mutate(|s| {
            let ids = s
                .course_categories
                .entry(course_code.to_string())
                .or_default();
            if !ids.iter().any(|id| id == category_id) {
                ids.push(category_id.to_string());
            }
        });
        Ok(())
    }

    /// Remove the course from a category after the backend confirms.
    pub async fn remove_course_from_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<(), StoreError> {
        if let Err(e) = self
            .backend
            .unassign_category(course_code, category_id)
            .await
        {
            return Err(self.fail(e.into()));
        }

        self.mutate(|s| {
            if let Some(ids) = s.course_categories.get_mut(course_code) {
                ids.retain(|id| id != category_id);
            }
        });
        Ok(())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state
            .read()
            .expect("category store lock poisoned")
            .categories
            .clone()
    }

    /// Membership ids for a queried course; empty if never queried.
    pub fn course_categories(&self, course_code: &str) -> Vec<String> {
        self.state
            .read()
            .expect("category store lock poisoned")
            .course_categories
            .get(course_code)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state
            .read()
            .expect("category store lock poisoned")
            .last_error
            .clone()
    }

    pub fn clear_error(&self) {
        self.mutate(|s| s.last_error = None);
    }

    /// Change notifications for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn mutate<F: FnOnce(&mut CategoryState)>(&self, f: F) {
        {
            let mut state = self.state.write().expect("category store lock poisoned");
            f(&mut state);
        }
        self.version.send_modify(|v| *v += 1);
    }

    fn fail(&self, err: StoreError) -> StoreError {
        let message = err.to_string();
        self.mutate(|s| s.last_error = Some(message));
        err
    }
}
