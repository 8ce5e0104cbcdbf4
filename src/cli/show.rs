use std::path::Path;

use anyhow::Context;
use clap::Parser;
use planner::{Course, CourseId, CourseIndex};
use tracing::instrument;

/// Command arguments for `plan show`.
#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a course")]
pub struct Show {
    /// The identifier of the course to display
    #[clap(value_parser = super::parse_course_id)]
    id: CourseId,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    /// Load the catalog and display one course.
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, catalog: &Path) -> anyhow::Result<()> {
        let courses = planner::load_path(catalog)
            .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
        let index: CourseIndex = courses.into_iter().collect();

        let Some(course) = index.search(&self.id) else {
            eprintln!("Course {} not found.", self.id);
            std::process::exit(1);
        };

        match self.output {
            OutputFormat::Pretty => print_course(course),
            OutputFormat::Json => output_json(course)?,
        }

        Ok(())
    }
}

/// Print a course in the planner's two-line format:
/// `identifier, title` then its prerequisites (or `None`).
pub fn print_course(course: &Course) {
    println!("{}, {}", course.id(), course.title());

    if course.prerequisites().is_empty() {
        println!("Prerequisites: None");
    } else {
        let prerequisites = course
            .prerequisites()
            .iter()
            .map(CourseId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Prerequisites: {prerequisites}");
    }
}

fn output_json(course: &Course) -> anyhow::Result<()> {
    use serde_json::json;

    let output = json!({
        "id": course.id().as_str(),
        "title": course.title(),
        "prerequisites": course
            .prerequisites()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
