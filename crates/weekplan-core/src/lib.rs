//! # Weekplan Core Library
//!
//! This library provides the core logic for turning a parsed list of
//! meetings and tasks into a conflict-free weekly calendar. All operations
//! are available through the standalone `weekplan` CLI, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timeline**: Clock-time conversion and free-interval bookkeeping
//! - **Schedule**: Draft model, normalization and missing-information detection
//! - **Completion**: A two-state machine that folds user answers into a draft
//! - **Scheduler**: Fixed-event placement, task splitting and greedy allocation
//! - **Storage**: TOML configuration and draft persistence
//! - **Integrations**: Parser seam and calendar import
//!
//! ## Key Components
//!
//! - [`CompletionEngine`]: Drives a draft until nothing is missing
//! - [`AutoScheduler`]: Lays a completed draft onto the week
//! - [`Config`]: Application configuration management
//! - [`ScheduleStore`]: Trait for draft persistence

pub mod completion;
pub mod error;
pub mod integrations;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use completion::{Answer, AnswerOutcome, CompletionEngine, CompletionMode, CompletionState};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use integrations::{calendar_to_draft, validate_calendar, JsonDraftParser, ScheduleParser};
pub use schedule::{
    InfoField, Meeting, MeetingType, Priority, Question, QuestionKind, ScheduleDraft, TargetType,
    Task,
};
pub use scheduler::{
    allocate, AllocationResult, AutoScheduler, CalendarEntry, EntryKind, GeneratedCalendar,
    SchedulerConfig,
};
pub use storage::{data_dir, Config, JsonFileStore, MemoryStore, ScheduleStore};
pub use timeline::{to_minutes, to_time_string, FreeIntervals, Interval};
