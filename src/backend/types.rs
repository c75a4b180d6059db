// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded author details on a non-anonymous insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightAuthor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// One user's free-text comment plus difficulty rating on a course.
///
/// `author` is `None` whenever `is_anonymous` is set: the backend withholds
/// identity from all readers, the author's own fetches included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_code: String,
    pub text: String,
    /// 1 (easy) through 10 (hard).
    pub difficulty: u8,
    pub created_at: DateTime<Utc>,
    pub is_anonymous: bool,
    #[serde(default, rename = "user", skip_serializing_if = "Option::is_none")]
    pub author: Option<InsightAuthor>,
}

/// POST body for creating an insight. The backend echoes it back with an id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInsight {
    pub course_code: String,
    pub text: String,
    pub difficulty: u8,
    pub is_anonymous: bool,
}

/// A user-owned named grouping of courses. Name uniqueness is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One course-to-category assignment, scoped to the owning user.
/// At most one exists per (owner, course code, category).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCategory {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub course_code: String,
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
}

/// Per-course entry returned by the batch endpoint. `categories` is only
/// populated for authenticated callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseBundle {
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub categories: Vec<CourseCategory>,
}

/// Batch response: course code → bundle.
pub type BatchResponse = HashMap<String, CourseBundle>;
