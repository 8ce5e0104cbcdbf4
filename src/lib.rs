//! Course catalog planning.
//!
//! A catalog is a plain-text file with one course per line: an identifier, a
//! title, and any number of prerequisite identifiers, separated by commas.
//! Catalogs are validated on load (every prerequisite must name a course in
//! the same file) and held in an ordered in-memory index for lookup and
//! sorted enumeration.

pub mod domain;
pub use domain::{Config, Course, CourseId, CourseIndex, InvalidCourseIdError};

/// Catalog file loading and validation.
pub mod storage;
pub use storage::{LoadError, load, load_path};
