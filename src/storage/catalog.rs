//! Course catalog parsing and validation.
//!
//! A catalog is plain text, one course per line, comma-separated: identifier,
//! title, then any number of prerequisite identifiers. Fields are trimmed of
//! surrounding whitespace; blank lines are skipped. There is no header line
//! and no quoting, so a comma inside a title reads as a field separator —
//! a limitation of the format, not something the parser second-guesses.
//!
//! Loading validates referential integrity in two passes: a single pass
//! cannot resolve forward references (a course may list a prerequisite that
//! only appears later in the file), so all identifiers are collected before
//! any prerequisite is checked. A failed load returns only the error; no
//! partial batch ever escapes.

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::debug;

use crate::domain::{Course, CourseId, course::InvalidCourseIdError};

/// Errors that can occur when loading a catalog.
///
/// Every variant is terminal for the load attempt: the caller gets no
/// partial result and retains whatever index state existed beforehand.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The catalog source could not be opened or read.
    #[error("could not read course catalog")]
    SourceUnavailable(#[from] io::Error),

    /// A line had fewer than the two required fields.
    #[error("line {line}: a course record needs an identifier and a title, found {found} field(s)")]
    MalformedRecord {
        /// 1-based line number of the offending record.
        line: usize,
        /// How many fields the line actually contained.
        found: usize,
    },

    /// An identifier or prerequisite field failed validation.
    #[error("line {line}: invalid course identifier")]
    InvalidIdentifier {
        /// 1-based line number of the offending record.
        line: usize,
        /// The underlying identifier validation failure.
        #[source]
        source: InvalidCourseIdError,
    },

    /// A prerequisite referenced a course that is not in the batch.
    #[error("course {course} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        /// The course whose prerequisite list is broken.
        course: CourseId,
        /// The identifier that resolves to nothing.
        prerequisite: CourseId,
    },
}

/// A parsed line, prior to referential validation.
#[derive(Debug)]
struct RawRecord {
    id: CourseId,
    title: String,
    prerequisites: Vec<CourseId>,
}

/// Loads and validates a catalog from a line source.
///
/// Returns the validated courses in input order.
///
/// # Errors
///
/// Returns a [`LoadError`] if the source cannot be read, a line has fewer
/// than two fields, an identifier is invalid, or a prerequisite does not
/// resolve to a course in the same batch.
pub fn load<R: BufRead>(reader: R) -> Result<Vec<Course>, LoadError> {
    // Pass 1: parse every line and collect the set of identifiers, so that
    // forward references can be resolved in pass 2.
    let mut records = Vec::new();
    let mut known = HashSet::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_line(number + 1, &line)?;
        known.insert(record.id.clone());
        records.push(record);
    }

    // Pass 2: every prerequisite must name a course from pass 1. The first
    // dangling reference aborts the whole load.
    for record in &records {
        for prerequisite in &record.prerequisites {
            if !known.contains(prerequisite) {
                return Err(LoadError::UnknownPrerequisite {
                    course: record.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    debug!(count = records.len(), "catalog validated");

    Ok(records
        .into_iter()
        .map(|record| Course::new(record.id, record.title, record.prerequisites))
        .collect())
}

/// Loads and validates a catalog from a file.
///
/// # Errors
///
/// Returns [`LoadError::SourceUnavailable`] if the file cannot be opened,
/// otherwise as [`load`].
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<Course>, LoadError> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file))
}

/// Splits one line into a raw record: identifier, title, prerequisites.
fn parse_line(number: usize, line: &str) -> Result<RawRecord, LoadError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() < 2 {
        return Err(LoadError::MalformedRecord {
            line: number,
            found: fields.len(),
        });
    }

    let id = parse_id(number, fields[0])?;
    let title = fields[1].to_string();
    let prerequisites = fields[2..]
        .iter()
        .map(|field| parse_id(number, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawRecord {
        id,
        title,
        prerequisites,
    })
}

fn parse_id(number: usize, field: &str) -> Result<CourseId, LoadError> {
    CourseId::new(field).map_err(|source| LoadError::InvalidIdentifier {
        line: number,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn load_str(input: &str) -> Result<Vec<Course>, LoadError> {
        load(Cursor::new(input))
    }

    #[test]
    fn loads_a_small_catalog() {
        let courses = load_str(
            "CSCI101, Intro to CS\nCSCI201, Data Structures, CSCI101\nMATH101, Calculus I\n",
        )
        .unwrap();

        assert_eq!(courses.len(), 3);
        assert_eq!(courses[0].id().as_str(), "CSCI101");
        assert_eq!(courses[1].title(), "Data Structures");
        let prerequisites: Vec<_> = courses[1]
            .prerequisites()
            .iter()
            .map(CourseId::as_str)
            .collect();
        assert_eq!(prerequisites, ["CSCI101"]);
    }

    #[test]
    fn preserves_input_order() {
        let courses =
            load_str("MATH101, Calculus I\nCSCI101, Intro to CS\nAAAA100, Placeholder\n").unwrap();

        let ids: Vec<_> = courses.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, ["MATH101", "CSCI101", "AAAA100"]);
    }

    #[test]
    fn resolves_forward_references() {
        // CSCI201 names MATH101 before the file defines it; only a second
        // pass can accept this.
        let courses = load_str("CSCI201, Data Structures, MATH101\nMATH101, Calculus I\n").unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn skips_blank_lines() {
        let courses = load_str("\nCSCI101, Intro to CS\n\n   \nMATH101, Calculus I\n").unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn trims_surrounding_whitespace_from_fields() {
        let courses = load_str("  CSCI101 ,   Intro to CS  , MATH101 \nMATH101, Calculus I\n")
            .unwrap();

        assert_eq!(courses[0].id().as_str(), "CSCI101");
        assert_eq!(courses[0].title(), "Intro to CS");
        assert_eq!(courses[0].prerequisites()[0].as_str(), "MATH101");
    }

    #[test]
    fn uppercases_identifiers_but_not_titles() {
        let courses = load_str("csci101, intro to cs\ncsci201, data structures, csci101\n").unwrap();

        assert_eq!(courses[0].id().as_str(), "CSCI101");
        assert_eq!(courses[0].title(), "intro to cs");
        assert_eq!(courses[1].prerequisites()[0].as_str(), "CSCI101");
    }

    #[test]
    fn keeps_duplicate_prerequisites_in_order() {
        let courses = load_str(
            "CSCI301, Algorithms, MATH101, CSCI101, MATH101\nMATH101, Calculus I\nCSCI101, Intro to CS\n",
        )
        .unwrap();

        let prerequisites: Vec<_> = courses[0]
            .prerequisites()
            .iter()
            .map(CourseId::as_str)
            .collect();
        assert_eq!(prerequisites, ["MATH101", "CSCI101", "MATH101"]);
    }

    #[test]
    fn comma_in_title_reads_as_prerequisite_field() {
        // The format has no quoting: "Algorithms, Advanced" cannot be told
        // apart from a title plus a prerequisite.
        let result = load_str("CSCI301, Algorithms, Advanced\n");

        assert!(matches!(
            result,
            Err(LoadError::UnknownPrerequisite { .. })
        ));
    }

    #[test]
    fn single_field_line_is_malformed() {
        let result = load_str("CSCI101\n");

        assert!(matches!(
            result,
            Err(LoadError::MalformedRecord { line: 1, found: 1 })
        ));
    }

    #[test]
    fn reports_malformed_line_number() {
        let result = load_str("CSCI101, Intro to CS\nCSCI999\n");

        assert!(matches!(
            result,
            Err(LoadError::MalformedRecord { line: 2, found: 1 })
        ));
    }

    #[test]
    fn empty_identifier_field_is_invalid() {
        let result = load_str(" , Intro to CS\n");

        assert!(matches!(
            result,
            Err(LoadError::InvalidIdentifier { line: 1, .. })
        ));
    }

    #[test]
    fn unknown_prerequisite_carries_both_identifiers() {
        let result = load_str("CSCI201, Data Structures, CSCI999\n");

        match result {
            Err(LoadError::UnknownPrerequisite {
                course,
                prerequisite,
            }) => {
                assert_eq!(course.as_str(), "CSCI201");
                assert_eq!(prerequisite.as_str(), "CSCI999");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn prerequisite_references_are_case_insensitive() {
        let courses = load_str("CSCI201, Data Structures, csci101\nCSCI101, Intro to CS\n").unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn self_reference_passes_validation() {
        // Referential integrity only requires the identifier to exist in the
        // batch; cycle reporting is a separate diagnostic.
        let courses = load_str("CSCI101, Intro to CS, CSCI101\n").unwrap();
        assert_eq!(courses.len(), 1);
    }

    #[test]
    fn failure_returns_no_partial_batch() {
        let result = load_str("CSCI101, Intro to CS\nCSCI201, Data Structures, CSCI999\n");
        assert!(result.is_err());
    }

    #[test]
    fn loaded_catalog_enumerates_sorted() {
        use crate::domain::CourseIndex;

        let courses = load_str(
            "CSCI101, Intro to CS\nCSCI201, Data Structures, CSCI101\nMATH101, Calculus I\n",
        )
        .unwrap();

        let mut index = CourseIndex::new();
        let count = index.populate(courses);
        assert_eq!(count, 3);

        let ids: Vec<_> = index.iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, ["CSCI101", "CSCI201", "MATH101"]);

        let found = index.search(&CourseId::new("csci201").unwrap()).unwrap();
        let prerequisites: Vec<_> = found.prerequisites().iter().map(CourseId::as_str).collect();
        assert_eq!(prerequisites, ["CSCI101"]);
    }

    #[test]
    fn load_path_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"CSCI101, Intro to CS\nCSCI201, Data Structures, CSCI101\n")
            .unwrap();

        let courses = load_path(file.path()).unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn load_path_missing_file_is_source_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.csv");

        let result = load_path(&missing);
        assert!(matches!(result, Err(LoadError::SourceUnavailable(_))));
    }
}
