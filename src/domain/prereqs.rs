//! Prerequisite graph analysis.
//!
//! The loader guarantees that every prerequisite resolves to a course in the
//! same batch, but resolution alone does not rule out cycles: a pair of
//! courses can each list the other (or a course can list itself) and still
//! pass referential validation. Cycles make a catalog impossible to schedule,
//! so they are worth reporting as a diagnostic; they are never a load error.

use std::collections::HashMap;

use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};

use crate::domain::{Course, CourseId};

/// Determine whether the prerequisite graph of a batch contains any cycles.
#[must_use]
pub fn has_cycles(courses: &[Course]) -> bool {
    is_cyclic_directed(&graph_of(courses))
}

/// Return all prerequisite cycles in a batch as sets of course identifiers.
///
/// Each cycle is sorted, and the list of cycles is itself sorted, so output
/// is stable for a given batch. A course that lists itself as a prerequisite
/// forms a one-element cycle.
#[must_use]
pub fn cycles(courses: &[Course]) -> Vec<Vec<CourseId>> {
    let graph = graph_of(courses);
    let mut cycles = Vec::new();

    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut ids: Vec<CourseId> = component
                .iter()
                .map(|&position| courses[position].id().clone())
                .collect();
            ids.sort();
            cycles.push(ids);
            continue;
        }

        let Some(&node) = component.first() else {
            continue;
        };

        if graph.contains_edge(node, node) {
            cycles.push(vec![courses[node].id().clone()]);
        }
    }

    cycles.sort();
    cycles
}

/// Build the dependency graph for a batch. Nodes are positions into the
/// batch; edges point from a course to each of its prerequisites.
fn graph_of(courses: &[Course]) -> DiGraphMap<usize, ()> {
    let positions: HashMap<&CourseId, usize> = courses
        .iter()
        .enumerate()
        .map(|(position, course)| (course.id(), position))
        .collect();

    let mut graph = DiGraphMap::new();

    for position in 0..courses.len() {
        graph.add_node(position);
    }

    for (position, course) in courses.iter().enumerate() {
        for prerequisite in course.prerequisites() {
            if let Some(&target) = positions.get(prerequisite) {
                graph.add_edge(position, target, ());
            }
        }
    }

    graph
}
