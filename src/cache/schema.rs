// SPDX-License-Identifier: MPL-2.0

/// SQL schema for the cache database
pub const SCHEMA: &str = r#"
-- Database version for migrations
PRAGMA user_version = 1;

-- professor_ratings: normalized professor name -> serialized lookup outcome.
-- fetched_at is unix milliseconds; entries past the TTL are purged lazily.
CREATE TABLE IF NOT EXISTS professor_ratings (
    key TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    fetched_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ratings_fetched_at ON professor_ratings(fetched_at);
"#;
