//! Command-line driver for `planner_core`.
//!
//! # Responsibility
//! - Verify core crate linkage.
//! - Offer quick local checks of layout, stored assignments and lesson plans.
//! - Start file logging from the environment-derived configuration.

use clap::{Parser, Subcommand};
use log::info;
use planner_core::db::open_db;
use planner_core::{
    allocate, init_logging, AssignmentStore, PlannerConfig, SqliteLessonPlanRepository,
    TenantId, WeekGrid, WeekPlanService,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult = Result<(), Box<dyn Error>>;

/// Homework and weekly lesson planner.
#[derive(Parser, Debug)]
#[command(name = "planner_cli", version, about)]
struct Cli {
    /// Subcommand to run; prints ping and version when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Split an extent proportionally to the given weights.
    Layout {
        /// Total extent to distribute.
        extent: u32,
        /// One weight per item.
        weights: Vec<u32>,
    },

    /// Print the placed blocks of the standard week grid.
    Week {
        /// Column height to lay out.
        height: u32,
    },

    /// List a user's valid assignments.
    Assignments {
        /// Owner of the assignments.
        user: String,
        /// Assignments file; defaults to the configured data dir.
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Show a user's stored lesson per week slot.
    Plan {
        /// Owner of the plan.
        user: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: cannot resolve data directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config.log_level, config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let result = match cli.command {
        None => {
            println!("planner_core ping={}", planner_core::ping());
            println!("planner_core version={}", planner_core::core_version());
            Ok(())
        }
        Some(command) => run(command, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &PlannerConfig) -> CliResult {
    match command {
        Command::Layout { extent, weights } => run_layout(extent, &weights),
        Command::Week { height } => run_week(height),
        Command::Assignments { user, csv } => {
            let path = csv.unwrap_or_else(|| config.assignments_path());
            run_assignments(&user, path)
        }
        Command::Plan { user } => run_plan(&user, config),
    }
}

fn run_layout(extent: u32, weights: &[u32]) -> CliResult {
    for span in allocate(weights, extent)? {
        println!("offset={} extent={}", span.offset, span.extent);
    }
    Ok(())
}

fn run_week(height: u32) -> CliResult {
    for column in WeekGrid::standard().days() {
        for placed in column.layout(height)? {
            println!(
                "{:?} {:?} y={} h={}",
                column.day, placed.block, placed.span.offset, placed.span.extent
            );
        }
    }
    Ok(())
}

fn run_assignments(user: &str, path: PathBuf) -> CliResult {
    let tenant = TenantId::new(user)?;
    let store = AssignmentStore::new(path);
    info!(
        "event=cli_assignments module=cli status=start path={}",
        store.path().display()
    );
    for assignment in store.load_for_tenant(&tenant)? {
        println!(
            "{} due={} completed={} notes={}",
            assignment.lesson, assignment.due_date, assignment.completed, assignment.notes
        );
    }
    Ok(())
}

fn run_plan(user: &str, config: &PlannerConfig) -> CliResult {
    let tenant = TenantId::new(user)?;
    let conn = open_db(config.lesson_db_path())?;
    let service = WeekPlanService::new(SqliteLessonPlanRepository::new(&conn));
    let plan = service.load(&tenant)?;
    for slot in 1..=service.grid().slot_count() {
        println!("slot={} lesson={}", slot, plan.lesson_at(slot));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_no_command() {
        let cli = Cli::try_parse_from(["planner_cli"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn layout_parses_typed_weights() {
        let cli = Cli::try_parse_from(["planner_cli", "layout", "100", "4", "1", "4"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Layout {
                extent: 100,
                weights: vec![4, 1, 4]
            })
        );
        assert!(Cli::try_parse_from(["planner_cli", "layout", "100", "-3"]).is_err());
        assert!(Cli::try_parse_from(["planner_cli", "week", "tall"]).is_err());
    }

    #[test]
    fn assignments_csv_path_is_optional() {
        let cli = Cli::try_parse_from(["planner_cli", "assignments", "alex"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Assignments {
                user: "alex".to_string(),
                csv: None
            })
        );

        let cli = Cli::try_parse_from([
            "planner_cli",
            "assignments",
            "alex",
            "--csv",
            "/tmp/a.csv",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Assignments {
                user: "alex".to_string(),
                csv: Some(PathBuf::from("/tmp/a.csv"))
            })
        );
    }
}
