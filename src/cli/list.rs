use std::path::Path;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use planner::{Course, CourseIndex};
use regex::Regex;
use tracing::instrument;

use super::terminal::{self, Colorize};

/// Command arguments for `plan list`.
#[derive(Debug, Parser)]
#[command(about = "List courses in ascending identifier order")]
pub struct List {
    /// Case-insensitive substring match against course titles.
    #[arg(long, conflicts_with = "regex")]
    contains: Option<String>,

    /// Regular expression match against course titles.
    #[arg(long)]
    regex: Option<String>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Print identifiers only, one per line.
    #[arg(long, short)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl List {
    /// Load the catalog and print its courses in sorted order.
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, catalog: &Path) -> anyhow::Result<()> {
        let courses = planner::load_path(catalog)
            .with_context(|| format!("failed to load catalog {}", catalog.display()))?;

        let index: CourseIndex = courses.into_iter().collect();
        let filter = Filter::new(&self)?;

        let rows: Vec<&Course> = index
            .iter()
            .filter(|course| filter.matches(course))
            .collect();

        if self.quiet {
            for course in &rows {
                println!("{}", course.id());
            }
            return Ok(());
        }

        match self.output {
            OutputFormat::Table => render_table(&rows),
            OutputFormat::Json => render_json(&rows)?,
            OutputFormat::Csv => render_csv(&rows),
        }

        Ok(())
    }
}

/// Title filters parsed from the command arguments.
#[derive(Debug)]
struct Filter {
    contains: Option<String>,
    regex: Option<Regex>,
}

impl Filter {
    fn new(cmd: &List) -> anyhow::Result<Self> {
        let regex = if let Some(pattern) = &cmd.regex {
            Some(Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))?)
        } else {
            None
        };

        Ok(Self {
            contains: cmd.contains.as_deref().map(str::to_ascii_lowercase),
            regex,
        })
    }

    fn matches(&self, course: &Course) -> bool {
        if let Some(search) = &self.contains {
            if !course.title().to_ascii_lowercase().contains(search) {
                return false;
            }
        }

        if let Some(regex) = &self.regex {
            if !regex.is_match(course.title()) {
                return false;
            }
        }

        true
    }
}

fn render_table(rows: &[&Course]) {
    // Leave room for the identifier column and the ", " separator.
    let id_width = rows
        .iter()
        .map(|course| course.id().as_str().len())
        .max()
        .unwrap_or(0);
    let title_width = terminal::terminal_width()
        .map_or(usize::MAX, |w| usize::from(w).saturating_sub(id_width + 2));

    for course in rows {
        println!(
            "{}, {}",
            course.id(),
            terminal::fit(course.title(), title_width)
        );
    }

    println!();
    println!("{}", format!("{} courses", rows.len()).dim());
}

fn render_json(rows: &[&Course]) -> anyhow::Result<()> {
    use serde_json::json;

    let courses: Vec<_> = rows
        .iter()
        .map(|course| {
            json!({
                "id": course.id().as_str(),
                "title": course.title(),
                "prerequisites": course
                    .prerequisites()
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&courses)?);
    Ok(())
}

fn render_csv(rows: &[&Course]) {
    for course in rows {
        let mut fields = vec![
            course.id().as_str().to_string(),
            csv_escape(course.title()),
        ];
        fields.extend(
            course
                .prerequisites()
                .iter()
                .map(|p| p.as_str().to_string()),
        );
        println!("{}", fields.join(","));
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn catalog_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn run_succeeds_on_a_valid_catalog() {
        let file = catalog_file("CSCI201, Data Structures, CSCI101\nCSCI101, Intro to CS\n");

        let list = List {
            contains: None,
            regex: None,
            output: OutputFormat::Table,
            quiet: true,
        };

        list.run(file.path()).expect("list should succeed");
    }

    #[test]
    fn run_fails_on_a_missing_catalog() {
        let tmp = tempfile::tempdir().unwrap();

        let list = List {
            contains: None,
            regex: None,
            output: OutputFormat::Table,
            quiet: false,
        };

        assert!(list.run(&tmp.path().join("missing.csv")).is_err());
    }

    #[test]
    fn run_rejects_an_invalid_regex() {
        let file = catalog_file("CSCI101, Intro to CS\n");

        let list = List {
            contains: None,
            regex: Some("[".to_string()),
            output: OutputFormat::Table,
            quiet: false,
        };

        assert!(list.run(file.path()).is_err());
    }

    #[test]
    fn filter_matches_substring_case_insensitively() {
        let course = Course::new(
            planner::CourseId::new("CSCI101").unwrap(),
            "Intro to Computer Science".to_string(),
            Vec::new(),
        );

        let filter = Filter {
            contains: Some("computer".to_string()),
            regex: None,
        };
        assert!(filter.matches(&course));

        let filter = Filter {
            contains: Some("biology".to_string()),
            regex: None,
        };
        assert!(!filter.matches(&course));
    }

    #[test]
    fn csv_escape_quotes_embedded_commas() {
        assert_eq!(csv_escape("Algorithms, Advanced"), "\"Algorithms, Advanced\"");
        assert_eq!(csv_escape("plain"), "plain");
    }
}
