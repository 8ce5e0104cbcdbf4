//! Ordered in-memory index of courses.
//!
//! The [`CourseIndex`] is a plain (unbalanced) binary search tree keyed by
//! [`CourseId`]. Nodes live in an index-based arena rather than behind owning
//! pointers, and insertion, search, and traversal are all iterative, so stack
//! usage stays bounded even for adversarial (pre-sorted) insertion orders.
//! Worst-case depth is still O(n); that is an accepted property of the
//! structure, not a defect, for catalog-sized data.

use std::cmp::Ordering;

use crate::domain::{Course, CourseId};

/// A node in the arena. Child links are positions in the arena vector.
///
/// `lower` holds keys strictly less than this node's key, `upper` holds keys
/// strictly greater. Exact-equal keys never create a second node (see
/// [`CourseIndex::insert`]).
#[derive(Debug, Clone)]
struct Node {
    course: Course,
    lower: Option<usize>,
    upper: Option<usize>,
}

impl Node {
    const fn new(course: Course) -> Self {
        Self {
            course,
            lower: None,
            upper: None,
        }
    }
}

/// An ordered index of [`Course`] records, keyed by identifier.
///
/// Supports insertion, exact-key search, and lazy in-order (sorted)
/// enumeration. Records are owned by the index; `search` and iteration hand
/// out references that live as long as the index does. The whole index is
/// torn down at once when dropped; individual records cannot be removed.
#[derive(Debug, Clone, Default)]
pub struct CourseIndex {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl CourseIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Creates an empty index with pre-allocated capacity for `capacity`
    /// courses.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// The number of courses held by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a course, keyed by its identifier.
    ///
    /// If a course with an equal identifier is already present, the stored
    /// record is replaced and the displaced record returned (last write
    /// wins); the tree shape does not change. Equal keys never occupy a
    /// second node, so a record can never be shadowed into an unreachable
    /// position.
    pub fn insert(&mut self, course: Course) -> Option<Course> {
        let Some(mut current) = self.root else {
            self.root = Some(self.push_node(course));
            return None;
        };

        loop {
            match course.id().cmp(self.nodes[current].course.id()) {
                Ordering::Equal => {
                    return Some(std::mem::replace(&mut self.nodes[current].course, course));
                }
                Ordering::Less => match self.nodes[current].lower {
                    Some(next) => current = next,
                    None => {
                        let position = self.push_node(course);
                        self.nodes[current].lower = Some(position);
                        return None;
                    }
                },
                Ordering::Greater => match self.nodes[current].upper {
                    Some(next) => current = next,
                    None => {
                        let position = self.push_node(course);
                        self.nodes[current].upper = Some(position);
                        return None;
                    }
                },
            }
        }
    }

    /// Looks up a course by identifier.
    ///
    /// Case-insensitivity comes from [`CourseId`] normalization, so a query
    /// built from `"csci101"` finds a course stored as `CSCI101`. Absence is
    /// signalled with `None`, never an error.
    #[must_use]
    pub fn search(&self, id: &CourseId) -> Option<&Course> {
        let mut current = self.root;

        while let Some(position) = current {
            let node = &self.nodes[position];
            current = match id.cmp(node.course.id()) {
                Ordering::Equal => return Some(&node.course),
                Ordering::Less => node.lower,
                Ordering::Greater => node.upper,
            };
        }

        None
    }

    /// Returns an iterator over the courses in ascending identifier order.
    ///
    /// The traversal is lazy and restartable: calling `iter` again yields an
    /// identical sequence as long as the index has not been modified in
    /// between. This in-order walk is the sorting mechanism for the whole
    /// system; there is no separate sort step.
    #[must_use]
    pub fn iter(&self) -> Courses<'_> {
        Courses {
            nodes: &self.nodes,
            stack: Vec::new(),
            next: self.root,
        }
    }

    /// Bulk-inserts courses in order, returning the number of records
    /// consumed (replacements of duplicate identifiers included).
    pub fn populate<I>(&mut self, courses: I) -> usize
    where
        I: IntoIterator<Item = Course>,
    {
        let mut count = 0;
        for course in courses {
            self.insert(course);
            count += 1;
        }
        count
    }

    fn push_node(&mut self, course: Course) -> usize {
        self.nodes.push(Node::new(course));
        self.nodes.len() - 1
    }
}

impl Extend<Course> for CourseIndex {
    fn extend<I: IntoIterator<Item = Course>>(&mut self, courses: I) {
        self.populate(courses);
    }
}

impl FromIterator<Course> for CourseIndex {
    fn from_iter<I: IntoIterator<Item = Course>>(courses: I) -> Self {
        let mut index = Self::new();
        index.populate(courses);
        index
    }
}

impl<'a> IntoIterator for &'a CourseIndex {
    type Item = &'a Course;
    type IntoIter = Courses<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the courses of a [`CourseIndex`].
///
/// Carries an explicit descent stack instead of recursing, so arbitrarily
/// deep (degenerate) trees cannot overflow the call stack.
#[derive(Debug, Clone)]
pub struct Courses<'a> {
    nodes: &'a [Node],
    stack: Vec<usize>,
    next: Option<usize>,
}

impl<'a> Iterator for Courses<'a> {
    type Item = &'a Course;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(position) = self.next {
            self.stack.push(position);
            self.next = self.nodes[position].lower;
        }

        let position = self.stack.pop()?;
        self.next = self.nodes[position].upper;
        Some(&self.nodes[position].course)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Exact counting would require walking; only the upper bound is known.
        (0, Some(self.nodes.len()))
    }
}
