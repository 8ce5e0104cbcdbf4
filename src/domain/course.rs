use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;

/// A validated course identifier, e.g. `CSCI101`.
///
/// Identifiers are compared case-insensitively: the input is trimmed of
/// surrounding whitespace and normalized to uppercase on construction, so two
/// `CourseId`s built from `"csci101"` and `"CSCI101"` are equal. The derived
/// ordering (lexicographic on the normalized form) is the sort order of the
/// course index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseId(NonEmptyString);

impl CourseId {
    /// Creates a new `CourseId` from a string.
    ///
    /// The input is trimmed and uppercased before validation.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCourseIdError`] if the string is empty (or contains
    /// only whitespace).
    pub fn new(s: &str) -> Result<Self, InvalidCourseIdError> {
        let normalized = s.trim().to_uppercase();
        let inner =
            NonEmptyString::new(normalized).map_err(|_| InvalidCourseIdError(s.to_string()))?;
        Ok(Self(inner))
    }

    /// Returns the normalized identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for CourseId {
    type Error = InvalidCourseIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for CourseId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = InvalidCourseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Hash for CourseId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

/// Error returned when a string is not a usable course identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid course identifier {0:?}: must not be empty")]
pub struct InvalidCourseIdError(String);

/// A single course in a catalog.
///
/// Courses are immutable once constructed: the loader builds them from
/// validated input and the index owns them afterwards. The title is stored
/// verbatim (no case normalization); prerequisite identifiers keep their
/// input order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    prerequisites: Vec<CourseId>,
}

impl Course {
    /// Construct a new [`Course`].
    ///
    /// The loader guarantees that every prerequisite of a course it returns
    /// resolves to another course in the same batch; this constructor does
    /// not (and cannot) check that on its own.
    #[must_use]
    pub const fn new(id: CourseId, title: String, prerequisites: Vec<CourseId>) -> Self {
        Self {
            id,
            title,
            prerequisites,
        }
    }

    /// The course identifier.
    #[must_use]
    pub const fn id(&self) -> &CourseId {
        &self.id
    }

    /// The course title, as it appeared in the source.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The prerequisite identifiers, in source order.
    #[must_use]
    pub fn prerequisites(&self) -> &[CourseId] {
        &self.prerequisites
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("CSCI101", "CSCI101"; "already uppercase")]
    #[test_case("csci101", "CSCI101"; "lowercase")]
    #[test_case("cSci101", "CSCI101"; "mixed case")]
    #[test_case("  MATH101  ", "MATH101"; "surrounding whitespace")]
    #[test_case("\tcsci200\n", "CSCI200"; "tabs and newlines")]
    fn course_id_normalization(input: &str, expected: &str) {
        let id = CourseId::new(input).unwrap();
        assert_eq!(id.as_str(), expected);
    }

    #[test]
    fn course_id_empty_fails() {
        assert!(CourseId::new("").is_err());
    }

    #[test]
    fn course_id_whitespace_only_fails() {
        assert!(CourseId::new("   \t ").is_err());
    }

    #[test]
    fn course_ids_compare_case_insensitively() {
        let lower = CourseId::new("csci101").unwrap();
        let upper = CourseId::new("CSCI101").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn course_id_ordering_is_lexicographic() {
        let a = CourseId::new("CSCI101").unwrap();
        let b = CourseId::new("CSCI201").unwrap();
        let c = CourseId::new("MATH101").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn course_id_display_round_trips() {
        let id = CourseId::new("csci101").unwrap();
        let parsed: CourseId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn course_title_is_stored_verbatim() {
        let course = Course::new(
            CourseId::new("CSCI101").unwrap(),
            "Intro to Computer Science".to_string(),
            Vec::new(),
        );
        assert_eq!(course.title(), "Intro to Computer Science");
    }

    #[test]
    fn course_prerequisites_preserve_order_and_duplicates() {
        let prerequisites = vec![
            CourseId::new("MATH101").unwrap(),
            CourseId::new("CSCI100").unwrap(),
            CourseId::new("MATH101").unwrap(),
        ];
        let course = Course::new(
            CourseId::new("CSCI301").unwrap(),
            "Algorithms".to_string(),
            prerequisites.clone(),
        );
        assert_eq!(course.prerequisites(), prerequisites.as_slice());
    }
}
