// SPDX-License-Identifier: MPL-2.0

mod categories;
mod course;
#[cfg(test)]
pub(crate) mod testing;

pub use categories::CategoryStore;
pub use course::{CourseEntry, CourseStore};

use crate::backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
