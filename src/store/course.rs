// SPDX-License-Identifier: MPL-2.0

use crate::backend::{Category, CatalogBackend, Insight, NewInsight};
use crate::store::StoreError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::warn;

/// Everything the store holds for one course. Replaced as a whole `Arc` on
/// every mutation, so a reader always sees a fully-prior or fully-updated
/// entry.
#[derive(Debug, Clone, Default)]
pub struct CourseEntry {
    pub insights: Vec<Insight>,
    /// Ids of the caller's categories this course is assigned to.
    pub categories: Vec<String>,
}

#[derive(Default)]
struct CourseState {
    course_data: HashMap<String, Arc<CourseEntry>>,
    all_categories: Vec<Category>,
    is_loading: bool,
    last_error: Option<String>,
}

/// Single in-memory source of truth for per-course insights and category
/// assignments, synchronized with the backend CRUD endpoints.
///
/// Every operation is confirm-then-apply: local state changes only after the
/// backend acknowledges. Failures land in `last_error` (for the error banner)
/// as well as the returned `Result`, and leave prior state untouched. Course
/// entries accumulate for the lifetime of the store; there is no eviction.
pub struct CourseStore {
    backend: Arc<dyn CatalogBackend>,
    state: RwLock<CourseState>,
    version: watch::Sender<u64>,
}

impl CourseStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            backend,
            state: RwLock::new(CourseState::default()),
            version,
        }
    }

    /// Fetch insights and assignments for the given courses plus the caller's
    /// category list. Codes already held locally are never refetched; when
    /// every code is cached only the category list is refreshed.
    pub async fn fetch_all_data(&self, course_codes: &[String]) -> Result<(), StoreError> {
        self.mutate(|s| {
            s.is_loading = true;
            s.last_error = None;
        });

        let categories = match self.backend.categories().await {
            Ok(categories) => categories,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.mutate(|s| s.all_categories = categories);

        let missing: Vec<String> = {
            let state = self.state.read().expect("course store lock poisoned");
            let mut seen = HashSet::new();
            course_codes
                .iter()
                .filter(|code| !state.course_data.contains_key(*code) && seen.insert(*code))
                .cloned()
                .collect()
        };

        if missing.is_empty() {
            self.mutate(|s| s.is_loading = false);
            return Ok(());
        }

        let batch = match self.backend.batch(&missing).await {
            Ok(batch) => batch,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.mutate(|s| {
            for code in &missing {
                // Codes the backend knows nothing about get an empty entry,
                // which also marks them as fetched.
                let bundle = batch.get(code).cloned().unwrap_or_default();
                let entry = CourseEntry {
                    insights: bundle.insights,
                    categories: bundle
                        .categories
                        .into_iter()
                        .map(|a| a.category_id)
                        .collect(),
                };
                s.course_data.insert(code.clone(), Arc::new(entry));
            }
            s.is_loading = false;
        });
        Ok(())
    }

    /// Submit an insight. The server-echoed copy (with its assigned id) is
    /// appended to the course's list only after the backend confirms.
    pub async fn add_insight(
        &self,
        course_code: &str,
        text: &str,
        difficulty: u8,
        is_anonymous: bool,
    ) -> Result<Insight, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.fail(StoreError::Invalid("insight text is required".to_string())));
        }
        if !(1..=10).contains(&difficulty) {
            return Err(self.fail(StoreError::Invalid(
                "difficulty must be between 1 and 10".to_string(),
            )));
        }

        let request = NewInsight {
            course_code: course_code.to_string(),
            text: text.to_string(),
            difficulty,
            is_anonymous,
        };
        let created = match self.backend.create_insight(&request).await {
            Ok(insight) => insight,
            Err(e) => return Err(self.fail(e.into())),
        };

        let stored = created.clone();
        self.mutate(|s| {
            let mut entry = Self::entry_or_default(s, course_code);
            entry.insights.push(stored);
            s.course_data
                .insert(course_code.to_string(), Arc::new(entry));
        });
        Ok(created)
    }

    /// Delete one of the caller's insights and drop it from local state.
    pub async fn remove_insight(
        &self,
        course_code: &str,
        insight_id: &str,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.backend.delete_insight(insight_id).await {
            warn!("failed to delete insight {insight_id}: {e}");
            return Err(self.fail(e.into()));
        }

        self.mutate(|s| {
            if let Some(existing) = s.course_data.get(course_code) {
                let mut entry = (**existing).clone();
                entry.insights.retain(|i| i.id != insight_id);
                s.course_data
                    .insert(course_code.to_string(), Arc::new(entry));
            }
        });
        Ok(())
    }

    /// Assign or unassign the course depending on current local membership.
    /// Returns the new membership, applied only after the backend confirms.
    /// Two racing toggles for the same pair are not serialized here.
    pub async fn toggle_category(
        &self,
        course_code: &str,
        category_id: &str,
    ) -> Result<bool, StoreError> {
        let assigned = {
            let state = self.state.read().expect("course store lock poisoned");
            state
                .course_data
                .get(course_code)
                .map(|e| e.categories.iter().any(|c| c == category_id))
                .unwrap_or(false)
        };

        if assigned {
            if let Err(e) = self.backend.unassign_category(course_code, category_id).await {
                return Err(self.fail(e.into()));
            }
            self.mutate(|s| {
                if let Some(existing) = s.course_data.get(course_code) {
                    let mut entry = (**existing).clone();
                    entry.categories.retain(|c| c != category_id);
                    s.course_data
                        .insert(course_code.to_string(), Arc::new(entry));
                }
            });
            Ok(false)
        } else {
            if let Err(e) = self.backend.assign_category(course_code, category_id).await {
                return Err(self.fail(e.into()));
            }
            self.mutate(|s| {
                let mut entry = Self::entry_or_default(s, course_code);
                entry.categories.push(category_id.to_string());
                s.course_data
                    .insert(course_code.to_string(), Arc::new(entry));
            });
            Ok(true)
        }
    }

    /// Create a category and append the server-returned copy to the list.
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
        self.mutate(|s| s.all_categories.push(stored));
        Ok(created)
    }

    /// Delete a category. The backend cascades assignments server-side; the
    /// same id is stripped from every locally known course as a cache
    /// consistency measure (the backend remains the source of truth).
    pub async fn remove_category(&self, category_id: &str) -> Result<(), StoreError> {
        if let Err(e) = self.backend.delete_category(category_id).await {
            return Err(self.fail(e.into()));
        }

        self.mutate(|s| {
            s.all_categories.retain(|c| c.id != category_id);
            let affected: Vec<(String, Arc<CourseEntry>)> = s
                .course_data
                .iter()
                .filter(|(_, e)| e.categories.iter().any(|c| c == category_id))
                .map(|(code, e)| {
                    let mut entry = (**e).clone();
                    entry.categories.retain(|c| c != category_id);
                    (code.clone(), Arc::new(entry))
                })
                .collect();
            for (code, entry) in affected {
                s.course_data.insert(code, entry);
            }
        });
        Ok(())
    }

    pub fn clear_error(&self) {
        self.mutate(|s| s.last_error = None);
    }

    /// Snapshot of one course's entry, if fetched.
    pub fn course(&self, course_code: &str) -> Option<Arc<CourseEntry>> {
        let state = self.state.read().expect("course store lock poisoned");
        state.course_data.get(course_code).cloned()
    }

    pub fn all_categories(&self) -> Vec<Category> {
        let state = self.state.read().expect("course store lock poisoned");
        state.all_categories.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .expect("course store lock poisoned")
            .is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state
            .read()
            .expect("course store lock poisoned")
            .last_error
            .clone()
    }

    /// Change notifications for the presentation layer: the value bumps on
    /// every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn entry_or_default(state: &CourseState, course_code: &str) -> CourseEntry {
        state
            .course_data
            .get(course_code)
            .map(|e| (**e).clone())
            .unwrap_or_default()
    }

    fn mutate<F: FnOnce(&mut CourseState)>(&self, f: F) {
        {
            let mut state = self.state.write().expect("course store lock poisoned");
            f(&mut state);
        }
        self.version.send_modify(|v| *v += 1);
    }

    fn fail(&self, err: StoreError) -> StoreError {
        let message = err.to_string();
        self.mutate(|s| {
            s.last_error = Some(message);
            s.is_loading = false;
        });
        err
    }
}
