use std::path::Path;

use clap::Parser;
use dialoguer::{Input, Select};
use planner::{CourseId, CourseIndex};
use tracing::instrument;

use super::terminal::Colorize;

/// Command arguments for `plan interactive` (the default command).
#[derive(Debug, Default, Parser)]
#[command(about = "Interactive course planner menu")]
pub struct Interactive {}

/// State threaded through the menu handlers.
///
/// `index` is `None` until a catalog has been loaded; the handlers that need
/// data check for that instead of consulting any global flag.
#[derive(Debug, Default)]
struct AppState {
    index: Option<CourseIndex>,
}

impl Interactive {
    /// Run the menu loop until the user exits.
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, catalog: &Path) -> anyhow::Result<()> {
        let mut state = AppState::default();

        loop {
            let choice = Select::new()
                .with_prompt("Course Planner")
                .items(&["Load catalog", "List courses", "Show course", "Exit"])
                .default(0)
                .interact()?;

            match choice {
                0 => load_catalog(&mut state, catalog)?,
                1 => list_courses(&state),
                2 => show_course(&state)?,
                _ => break,
            }
        }

        println!("Good bye.");
        Ok(())
    }
}

/// Prompt for a catalog path and load it into the session.
///
/// A failed load leaves any previously loaded catalog in place; the index is
/// only replaced once validation has fully succeeded.
fn load_catalog(state: &mut AppState, default_path: &Path) -> anyhow::Result<()> {
    let input: String = Input::new()
        .with_prompt("Catalog file")
        .default(default_path.display().to_string())
        .interact_text()?;

    match planner::load_path(&input) {
        Ok(courses) => {
            let mut index = CourseIndex::with_capacity(courses.len());
            let count = index.populate(courses);
            state.index = Some(index);
            println!("{}", format!("Loaded {count} courses.").success());
        }
        Err(error) => {
            let error = anyhow::Error::from(error);
            eprintln!("{}", format!("Load failed: {error:#}").warning());
        }
    }

    Ok(())
}

fn list_courses(state: &AppState) {
    let Some(index) = &state.index else {
        eprintln!("{}", "Load a catalog first.".warning());
        return;
    };

    for course in index {
        println!("{}, {}", course.id(), course.title());
    }
}

fn show_course(state: &AppState) -> anyhow::Result<()> {
    let Some(index) = &state.index else {
        eprintln!("{}", "Load a catalog first.".warning());
        return Ok(());
    };

    let input: String = Input::new()
        .with_prompt("Course identifier")
        .interact_text()?;

    let id = match CourseId::new(&input) {
        Ok(id) => id,
        Err(error) => {
            eprintln!("{}", error.to_string().warning());
            return Ok(());
        }
    };

    match index.search(&id) {
        Some(course) => super::show::print_course(course),
        None => println!("Course {id} not found."),
    }

    Ok(())
}
