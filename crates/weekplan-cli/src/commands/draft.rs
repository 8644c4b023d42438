use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;
use weekplan_core::integrations::{JsonDraftParser, ScheduleParser};
use weekplan_core::{Answer, CompletionEngine, CompletionMode, InfoField, ScheduleStore};

use super::{print_json, read_input, CliResult, Workspace};

#[derive(Subcommand)]
pub enum DraftAction {
    /// Print the saved draft
    Show,
    /// Import parser output (JSON, optionally in a code fence) as the new draft
    Import {
        /// Input file (reads stdin when omitted or '-')
        file: Option<PathBuf>,
    },
    /// List questions about missing information
    Questions {
        /// Show every question instead of the next one
        #[arg(long)]
        all: bool,
    },
    /// Answer a question
    Answer {
        /// Field to fill: time, duration_minutes or course_code
        #[arg(required_unless_present = "json")]
        field: Option<String>,
        /// Value for the field
        #[arg(required_unless_present = "json")]
        value: Option<String>,
        /// Description of the meeting or task
        #[arg(long)]
        target: Option<String>,
        /// Id of the meeting or task
        #[arg(long)]
        target_id: Option<String>,
        /// JSON array of answers applied together
        #[arg(long, conflicts_with_all = ["field", "value", "target", "target_id"])]
        json: Option<String>,
    },
    /// Delete the saved draft
    Clear,
}

fn parse_field(raw: &str) -> Result<InfoField, Box<dyn std::error::Error>> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|_| format!("unknown field '{raw}' (expected time, duration_minutes or course_code)").into())
}

pub fn run(action: DraftAction) -> CliResult {
    let workspace = Workspace::open()?;

    match action {
        DraftAction::Show => {
            let draft = workspace.require_draft()?;
            print_json(&draft)?;
        }
        DraftAction::Import { file } => {
            let text = read_input(file.as_deref())?;
            let draft = JsonDraftParser::new().parse_text(&text)?;
            let engine = CompletionEngine::new(draft);
            workspace.store.save(engine.draft())?;
            print_json(&json!({
                "meetings": engine.draft().meetings.len(),
                "tasks": engine.draft().tasks.len(),
                "questions": engine.pending().len(),
                "complete": engine.is_complete(),
            }))?;
        }
        DraftAction::Questions { all } => {
            let mode = if all {
                CompletionMode::Batch
            } else {
                workspace.config.completion.mode
            };
            let engine = CompletionEngine::new(workspace.require_draft()?).with_mode(mode);
            print_json(&engine.questions())?;
        }
        DraftAction::Answer {
            field,
            value,
            target,
            target_id,
            json,
        } => {
            let mut engine = CompletionEngine::new(workspace.require_draft()?);

            let answers: Vec<Answer> = match (json, field, value) {
                (Some(raw), _, _) => serde_json::from_str(&raw)?,
                (None, Some(field), Some(value)) => {
                    let field = parse_field(&field)?;
                    let mut answer = Answer::new(field, value);
                    answer.target = target;
                    answer.target_id = target_id;
                    if answer.target.is_none() && answer.target_id.is_none() {
                        // Address the next open question for this field.
                        let question = engine
                            .pending()
                            .iter()
                            .find(|q| q.field == field)
                            .ok_or_else(|| format!("no open question for field '{field}'"))?;
                        answer = Answer::for_question(question, answer.value);
                    }
                    vec![answer]
                }
                _ => return Err("give a field and value, or --json".into()),
            };

            let state = engine.answer_all(&answers)?;
            workspace.store.save(engine.draft())?;
            print_json(&json!({
                "state": state,
                "complete": engine.is_complete(),
                "next_question": engine.next_question(),
                "remaining": engine.pending().len(),
            }))?;
        }
        DraftAction::Clear => {
            workspace.store.clear()?;
            println!("draft cleared");
        }
    }
    Ok(())
}
