use std::path::Path;

use clap::Parser;
use planner::{CourseId, domain::prereqs};
use tracing::instrument;

use super::terminal::Colorize;

/// Command arguments for `plan check`.
#[derive(Debug, Parser)]
#[command(about = "Validate a course catalog")]
pub struct Check {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
    /// Load the catalog, report validation results, and exit with code 2
    /// when issues are found.
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, catalog: &Path) -> anyhow::Result<()> {
        let courses = match planner::load_path(catalog) {
            Ok(courses) => courses,
            Err(error) => {
                self.report_load_failure(catalog, &anyhow::Error::from(error))?;
                std::process::exit(2);
            }
        };

        let cycles = prereqs::cycles(&courses);

        match self.output {
            OutputFormat::Table => self.output_table(courses.len(), &cycles),
            OutputFormat::Json => Self::output_json(Some(courses.len()), &cycles, None)?,
        }

        if !cycles.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn report_load_failure(self, catalog: &Path, error: &anyhow::Error) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Table => {
                if !self.quiet {
                    println!("Validating {}...\n", catalog.display());
                }
                println!("{}", format!("✗ Load:   {error:#}").warning());
            }
            OutputFormat::Json => Self::output_json(None, &[], Some(error))?,
        }
        Ok(())
    }

    fn output_table(self, count: usize, cycles: &[Vec<CourseId>]) {
        if self.quiet {
            return;
        }

        println!("Validating catalog...\n");
        println!("✓ Load:   {count} courses, all prerequisites resolve");

        if cycles.is_empty() {
            println!("✓ Cycles: none");
            println!("\n{}", "Catalog is healthy (0 issues)".success());
        } else {
            println!(
                "{}",
                format!("✗ Cycles: {} prerequisite cycle(s) found", cycles.len()).warning()
            );
            for cycle in cycles {
                let ids = cycle
                    .iter()
                    .map(CourseId::as_str)
                    .collect::<Vec<_>>()
                    .join(" → ");
                println!("  • {ids}");
            }
        }
    }

    fn output_json(
        count: Option<usize>,
        cycles: &[Vec<CourseId>],
        error: Option<&anyhow::Error>,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let cycles: Vec<Vec<&str>> = cycles
            .iter()
            .map(|cycle| cycle.iter().map(CourseId::as_str).collect())
            .collect();

        let healthy = error.is_none() && cycles.is_empty();
        let output = json!({
            "status": if healthy { "healthy" } else { "issues_found" },
            "courses": count,
            "cycles": cycles,
            "error": error.map(|e| format!("{e:#}")),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
