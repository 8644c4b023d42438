use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;
use weekplan_core::{calendar_to_draft, validate_calendar, CompletionEngine, ScheduleStore};

use super::{print_json, read_input, CliResult, Workspace};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Check that a calendar file has the expected shape
    Validate {
        /// Input file (reads stdin when omitted or '-')
        file: Option<PathBuf>,
    },
    /// Replace the saved draft with the entries of a calendar file
    Import {
        /// Input file (reads stdin when omitted or '-')
        file: Option<PathBuf>,
    },
}

pub fn run(action: CalendarAction) -> CliResult {
    match action {
        CalendarAction::Validate { file } => {
            let value: serde_json::Value = serde_json::from_str(&read_input(file.as_deref())?)?;
            let calendar = validate_calendar(&value)?;
            print_json(&json!({
                "valid": true,
                "days": calendar.iter().count(),
                "entries": calendar.entry_count(),
            }))
        }
        CalendarAction::Import { file } => {
            let workspace = Workspace::open()?;
            let value: serde_json::Value = serde_json::from_str(&read_input(file.as_deref())?)?;
            let draft = calendar_to_draft(&validate_calendar(&value)?);
            let engine = CompletionEngine::new(draft);
            workspace.store.save(engine.draft())?;
            print_json(&json!({
                "meetings": engine.draft().meetings.len(),
                "tasks": engine.draft().tasks.len(),
                "questions": engine.pending().len(),
                "complete": engine.is_complete(),
            }))
        }
    }
}
