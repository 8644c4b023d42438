pub mod calendar;
pub mod config;
pub mod draft;
pub mod plan;

use std::io::Read;
use std::path::Path;

use weekplan_core::{data_dir, Config, JsonFileStore, ScheduleDraft, ScheduleStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Loaded configuration plus the draft store it points at.
pub struct Workspace {
    pub config: Config,
    pub store: JsonFileStore,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let store = JsonFileStore::new(config.draft_path(&data_dir()?));
        tracing::debug!(draft = %store.path().display(), "workspace opened");
        Ok(Self { config, store })
    }

    /// The saved draft, or an error telling the user how to create one.
    pub fn require_draft(&self) -> Result<ScheduleDraft, Box<dyn std::error::Error>> {
        self.store
            .load()?
            .ok_or_else(|| "no draft saved; run `weekplan draft import` first".into())
    }
}

/// Read a file, or stdin when the path is absent or `-`.
pub fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
