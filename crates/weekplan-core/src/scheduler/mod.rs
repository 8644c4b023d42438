//! Weekly calendar allocator.
//!
//! Lays a completed draft onto a Monday-first week:
//! - Meetings are placed at their stated day and time
//! - Tasks with no duration get a priority-based default
//! - Preparation tasks are split into capped sessions and placed first-fit,
//!   preferring the day before the related exam or presentation
//! - Anything that does not fit is reported, not treated as an error

mod allocator;
mod calendar;
mod placer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::schedule::{normalize_draft, ScheduleDraft};
use crate::timeline::{to_minutes, Interval, MINUTES_PER_DAY};

pub use allocator::{
    allocate_tasks, candidate_days, default_duration, resolve_durations, split_task,
    TaskAllocation, TaskPart, DEFAULT_TASK_MINUTES, HIGH_PRIORITY_MINUTES,
};
pub use calendar::{
    insert_breaks, week_days, CalendarEntry, EntryKind, GeneratedCalendar, WeekCalendar,
};
pub use placer::{place_meetings, ExamDays, MeetingPlacement};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Start of the working window ("HH:MM")
    pub work_start: String,
    /// End of the working window ("HH:MM")
    pub work_end: String,
    /// Whether Saturday and Sunday take part at all
    pub include_weekend: bool,
    /// Longest single session before a task is split (minutes)
    pub preferred_session_minutes: u32,
    /// Insert breaks into short gaps when set (minutes)
    pub break_minutes: Option<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_start: "09:00".to_string(),
            work_end: "17:00".to_string(),
            include_weekend: false,
            preferred_session_minutes: 120,
            break_minutes: None,
        }
    }
}

impl SchedulerConfig {
    /// Check the settings and return the daily work window.
    pub fn validate(&self) -> Result<Interval> {
        let start = to_minutes(&self.work_start)?;
        let end = to_minutes(&self.work_end)?;
        if end > MINUTES_PER_DAY {
            return Err(invalid("work_end", "must not be later than 24:00").into());
        }
        if end <= start {
            return Err(invalid("work_end", "must be after work_start").into());
        }
        if self.preferred_session_minutes == 0 {
            return Err(invalid("preferred_session_minutes", "must be at least 1").into());
        }
        Ok(Interval::new(start, end))
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Everything one allocation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationResult {
    pub generated_calendar: GeneratedCalendar,
    /// Preparation parts that fit nowhere in the week.
    pub unplaced: Vec<String>,
    /// Meetings left out of the calendar (incomplete, off-week, overnight).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_meetings: Vec<String>,
    /// Task parts outside this allocator's concern.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_tasks: Vec<String>,
    /// Course code to the day of its earliest exam or presentation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub exam_days: BTreeMap<String, String>,
    #[serde(skip)]
    pub parts: Vec<TaskPart>,
}

impl AllocationResult {
    pub fn is_fully_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn part(&self, id: &str) -> Option<&TaskPart> {
        self.parts.iter().find(|p| p.id() == id)
    }
}

/// Weekly allocator
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler {
    config: SchedulerConfig,
}

impl AutoScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build the week's calendar for `draft`.
    pub fn allocate(&self, draft: &ScheduleDraft) -> Result<AllocationResult> {
        // 1. Validate the working window
        let window = self.config.validate()?;

        // 2. Normalize ids and times on a private copy
        let draft = normalize_draft(draft.clone());

        // 3. Lay down meetings
        let mut calendar = WeekCalendar::new(window, self.config.include_weekend);
        let meetings = place_meetings(&mut calendar, &draft.meetings)?;

        // 4. Place tasks into what is left
        let tasks = allocate_tasks(
            &mut calendar,
            &draft.tasks,
            &meetings.exam_days,
            self.config.preferred_session_minutes,
        );

        // 5. Assemble
        let generated_calendar = calendar.into_generated(self.config.break_minutes);

        tracing::info!(
            entries = generated_calendar.entry_count(),
            unplaced = tasks.unplaced.len(),
            skipped_meetings = meetings.skipped.len(),
            "allocation finished"
        );

        Ok(AllocationResult {
            generated_calendar,
            unplaced: tasks.unplaced,
            skipped_meetings: meetings.skipped,
            skipped_tasks: tasks.skipped,
            exam_days: meetings.exam_days.to_names(),
            parts: tasks.parts,
        })
    }
}

/// Allocate `draft` with `config`.
pub fn allocate(draft: &ScheduleDraft, config: &SchedulerConfig) -> Result<AllocationResult> {
    AutoScheduler::with_config(config.clone()).allocate(draft)
}
