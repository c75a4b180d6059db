// SPDX-License-Identifier: MPL-2.0

//! Client-side data synchronization for a university course catalog.
//!
//! Three pieces, leaf-first:
//! - [`cache`]: a durable, expiring professor-rating cache
//! - [`ratings`]: the remote rating fetcher with per-key request deduplication
//! - [`store`]: in-memory, observable stores for course insights and
//!   user categories, synchronized with the backend CRUD endpoints
//!
//! The presentation layer drives the stores and renders their snapshots; the
//! backend handlers are consumed through the [`backend::CatalogBackend`] trait.

pub mod backend;
pub mod cache;
pub mod config;
pub mod ratings;
pub mod store;

pub use backend::{BackendError, CatalogBackend, HttpBackend};
pub use cache::{CacheDb, RatingCache};
pub use ratings::{ProfessorRating, RatingFetcher, RatingOutcome};
pub use store::{CategoryStore, CourseStore, StoreError};
