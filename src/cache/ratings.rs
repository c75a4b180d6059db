// SPDX-License-Identifier: MPL-2.0

use crate::cache::CacheDb;
use crate::config::RATING_TTL_MS;
use crate::ratings::RatingOutcome;
use rusqlite::params;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

struct CachedRating {
    outcome: RatingOutcome,
    fetched_at: i64,
}

/// Process-wide expiring cache of professor rating lookups.
///
/// The in-memory map is authoritative for the process lifetime; every write
/// is mirrored synchronously to the durable store so entries survive a
/// restart within their TTL. A passive store: no network I/O happens here,
/// and deduplication of concurrent lookups is the fetcher's job.
pub struct RatingCache {
    db: Option<CacheDb>,
    entries: Mutex<HashMap<String, CachedRating>>,
    ttl_ms: i64,
}

impl RatingCache {
    /// Build a cache backed by the given database, preloading whatever
    /// unexpired entries it holds. Rows that fail to decode are skipped,
    /// never fatal.
    pub fn new(db: CacheDb) -> Self {
        let entries = Self::load(&db);
        Self {
            db: Some(db),
            entries: Mutex::new(entries),
            ttl_ms: RATING_TTL_MS,
        }
    }

    /// Memory-only cache, for when the durable store cannot be opened.
    pub fn memory_only() -> Self {
        Self {
            db: None,
            entries: Mutex::new(HashMap::new()),
            ttl_ms: RATING_TTL_MS,
        }
    }

    fn load(db: &CacheDb) -> HashMap<String, CachedRating> {
        let mut entries = HashMap::new();
        let cutoff = CacheDb::now_ms() - RATING_TTL_MS;
        let conn = db.conn();

        let mut stmt = match conn
            .prepare("SELECT key, payload, fetched_at FROM professor_ratings WHERE fetched_at > ?")
        {
            Ok(stmt) => stmt,
            Err(e) => {
                warn!("rating cache unreadable, starting empty: {e}");
                return entries;
            }
        };

        let rows = stmt.query_map([cutoff], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        });
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                warn!("rating cache unreadable, starting empty: {e}");
                return entries;
            }
        };

        for row in rows.flatten() {
            let (key, payload, fetched_at) = row;
            match serde_json::from_str::<RatingOutcome>(&payload) {
                Ok(outcome) => {
                    entries.insert(
                        key,
                        CachedRating {
                            outcome,
                            fetched_at,
                        },
                    );
                }
                Err(e) => warn!("skipping undecodable rating cache entry {key}: {e}"),
            }
        }

        debug!("loaded {} rating cache entries", entries.len());
        entries
    }

    /// Cached outcome for the key, if present and not expired. An expired
    /// entry is purged (memory and durable mirror) and reported absent.
    pub fn get(&self, key: &str) -> Option<RatingOutcome> {
        let mut entries = self.entries.lock().expect("rating cache lock poisoned");
        let expired = match entries.get(key) {
            Some(entry) => CacheDb::now_ms() - entry.fetched_at > self.ttl_ms,
            None => return None,
        };

        if expired {
            entries.remove(key);
            drop(entries);
            self.purge_durable(key);
            debug!("rating cache entry for {key} expired");
            return None;
        }

        entries.get(key).map(|e| e.outcome.clone())
    }

    /// Store an outcome under the key, stamped with the current time, and
    /// persist it synchronously. Overwrites any prior entry. A persistence
    /// failure is logged and ignored; the in-memory entry still lands.
    pub fn set(&self, key: &str, outcome: RatingOutcome) {
        self.set_at(key, outcome, CacheDb::now_ms());
    }

    fn set_at(&self, key: &str, outcome: RatingOutcome, fetched_at: i64) {
        if let Some(db) = &self.db {
            match serde_json::to_string(&outcome) {
                Ok(payload) => {
                    let result = db.conn().execute(
                        "INSERT INTO professor_ratings (key, payload, fetched_at) VALUES (?1, ?2, ?3)
                         ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, fetched_at = excluded.fetched_at",
                        params![key, payload, fetched_at],
                    );
                    if let Err(e) = result {
                        warn!("failed to persist rating cache entry {key}: {e}");
                    }
                }
                Err(e) => warn!("failed to serialize rating cache entry {key}: {e}"),
            }
        }

        let mut entries = self.entries.lock().expect("rating cache lock poisoned");
        entries.insert(
            key.to_string(),
            CachedRating {
                outcome,
                fetched_at,
            },
        );
    }

    /// True iff `get` would return an entry.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn purge_durable(&self, key: &str) {
        if let Some(db) = &self.db {
            if let Err(e) = db
                .conn()
                .execute("DELETE FROM professor_ratings WHERE key = ?", [key])
            {
                warn!("failed to purge expired rating cache entry {key}: {e}");
            }
        }
    }

    #[cfg(test)]
    fn backing_len(&self) -> usize {
        self.entries
            .lock()
            .expect("rating cache lock poisoned")
            .len()
    }
}
