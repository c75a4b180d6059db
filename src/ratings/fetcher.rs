// SPDX-License-Identifier: MPL-2.0

use crate::cache::RatingCache;
use crate::config::SCHOOL_NAME;
use crate::ratings::matching::names_match;
use crate::ratings::source::RatingSource;
use crate::ratings::{ProfessorRating, RatingOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// Resolves professor names to rating outcomes through the cache, issuing at
/// most one outbound request per key at any instant.
///
/// The first caller for a key installs a waiter list and performs the lookup;
/// concurrent callers for the same key park on a `oneshot` and are handed the
/// shared result when it lands. A lookup failure resolves everyone to
/// `NotFound` without caching, so the next call may retry.
///
/// Callers filter names with [`crate::config::is_rateable`] before invoking
/// this; the fetcher does not second-guess them.
pub struct RatingFetcher {
    cache: Arc<RatingCache>,
    source: Arc<dyn RatingSource>,
    school: String,
    pending: Mutex<HashMap<String, Vec<oneshot::Sender<RatingOutcome>>>>,
}

impl RatingFetcher {
    pub fn new(cache: Arc<RatingCache>, source: Arc<dyn RatingSource>) -> Self {
        Self::with_school(cache, source, SCHOOL_NAME)
    }

    pub fn with_school(
        cache: Arc<RatingCache>,
        source: Arc<dyn RatingSource>,
        school: &str,
    ) -> Self {
        Self {
            cache,
            source,
            school: school.to_string(),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Cache keys are the trimmed, lowercased professor name.
    fn cache_key(professor: &str) -> String {
        professor.trim().to_lowercase()
    }

    /// Resolve a professor name to a rating. Never errors: every failure path
    /// is a `NotFound`.
    pub async fn fetch_rating(&self, professor: &str) -> RatingOutcome {
        let key = Self::cache_key(professor);

        if let Some(outcome) = self.cache.get(&key) {
            return outcome;
        }

        // Join an in-flight lookup for this key, or claim it ourselves.
        let waiter = {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            match pending.get_mut(&key) {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    pending.insert(key.clone(), Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            // A dropped sender means the owning lookup failed without
            // producing an entry.
            return rx.await.unwrap_or(RatingOutcome::NotFound);
        }

        let outcome = self.lookup(&key, professor).await;

        let waiters = {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            pending.remove(&key).unwrap_or_default()
        };
        for tx in waiters {
            let _ = tx.send(outcome.clone());
        }

        outcome
    }

    /// One outbound lookup. Match outcomes (positive and negative) are
    /// cached; transport failures are not, so the next call retries.
    async fn lookup(&self, key: &str, professor: &str) -> RatingOutcome {
        match self.source.lookup(&self.school, professor).await {
            Ok(response) => {
                let rating = ProfessorRating::from(response);
                let outcome = if names_match(professor, &rating.name) {
                    RatingOutcome::Found(rating)
                } else {
                    debug!(
                        "rating candidate {:?} rejected for requested {:?}",
                        rating.name, professor
                    );
                    RatingOutcome::NotFound
                };
                self.cache.set(key, outcome.clone());
                outcome
            }
            Err(e) => {
                debug!("rating lookup for {professor:?} failed: {e}");
                RatingOutcome::NotFound
            }
        }
    }
}
