// SPDX-License-Identifier: MPL-2.0

#![allow(dead_code)]

pub const APP_ID: &str = "courselens";
pub const APP_NAME: &str = "CourseLens";

/// Institution name sent verbatim to the rating endpoint.
pub const SCHOOL_NAME: &str = "University of Florida";

/// Default upstream professor-rating endpoint.
pub const DEFAULT_RATINGS_URL: &str = "https://rmp.theom.app/api/professor";

/// Sentinel instructor label used by the catalog for unassigned sections.
pub const UNASSIGNED_LABEL: &str = "Staff";

/// Rating cache entries older than this are treated as absent.
pub const RATING_TTL_MS: i64 = 3_600_000;

/// Whether an instructor name is worth a rating lookup at all.
///
/// Callers must check this before invoking the fetcher: empty names and the
/// catalog's "Staff" placeholder never resolve to a real professor.
pub fn is_rateable(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(UNASSIGNED_LABEL)
}
