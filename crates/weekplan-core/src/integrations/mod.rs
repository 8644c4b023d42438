//! Boundary adapters: text parsers and calendar import.

pub mod calendar_import;
pub mod traits;

pub use calendar_import::{calendar_to_draft, validate_calendar, IMPORTED_TASK_CATEGORY};
pub use traits::{JsonDraftParser, ScheduleParser};
