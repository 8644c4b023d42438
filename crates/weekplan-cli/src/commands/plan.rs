use clap::Args;
use weekplan_core::{AutoScheduler, CompletionEngine};

use super::{print_json, CliResult, Workspace};

#[derive(Args)]
pub struct PlanArgs {
    /// Start of the working day (HH:MM)
    #[arg(long)]
    work_start: Option<String>,
    /// End of the working day (HH:MM)
    #[arg(long)]
    work_end: Option<String>,
    /// Schedule Saturday and Sunday too
    #[arg(long)]
    weekend: bool,
    /// Longest session before a task is split (minutes)
    #[arg(long)]
    session: Option<u32>,
    /// Insert breaks of this length into short gaps (minutes)
    #[arg(long)]
    breaks: Option<u32>,
    /// Plan even if questions are still open
    #[arg(long)]
    allow_incomplete: bool,
    /// Print a readable calendar instead of JSON
    #[arg(long)]
    text: bool,
}

pub fn run(args: PlanArgs) -> CliResult {
    let workspace = Workspace::open()?;

    let engine = CompletionEngine::new(workspace.require_draft()?);
    if !engine.is_complete() && !args.allow_incomplete {
        return Err(format!(
            "draft has {} open question(s); answer them with `weekplan draft answer` or pass --allow-incomplete",
            engine.pending().len()
        )
        .into());
    }

    let mut config = workspace.config.scheduler.clone();
    if let Some(start) = args.work_start {
        config.work_start = start;
    }
    if let Some(end) = args.work_end {
        config.work_end = end;
    }
    if args.weekend {
        config.include_weekend = true;
    }
    if let Some(minutes) = args.session {
        config.preferred_session_minutes = minutes;
    }
    if args.breaks.is_some() {
        config.break_minutes = args.breaks;
    }

    let result = AutoScheduler::with_config(config).allocate(engine.draft())?;

    if args.text {
        print!("{}", result.generated_calendar);
        if !result.unplaced.is_empty() {
            println!("Unplaced: {}", result.unplaced.join(", "));
        }
        Ok(())
    } else {
        print_json(&result)
    }
}
