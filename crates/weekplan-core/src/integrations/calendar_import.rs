//! Import of an externally produced weekly calendar.
//!
//! The accepted shape is the one [`GeneratedCalendar`] serializes to: an
//! object keyed by full day names, each holding an array of entries with at
//! least `id`, `type` and `description`.

use chrono::Weekday;
use serde_json::Value;

use crate::error::ValidationError;
use crate::schedule::{normalize_draft, weekday_name, Meeting, ScheduleDraft, Task};
use crate::scheduler::{week_days, CalendarEntry, EntryKind, GeneratedCalendar};

const REQUIRED_FIELDS: [&str; 3] = ["id", "type", "description"];

/// Category given to task entries brought in from an imported calendar.
pub const IMPORTED_TASK_CATEGORY: &str = "imported";

fn invalid(message: String) -> ValidationError {
    ValidationError::InvalidCalendar(message)
}

/// Check an imported calendar and read its entries in week order.
///
/// Keys that are not day names are ignored.
pub fn validate_calendar(value: &Value) -> Result<GeneratedCalendar, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("calendar must be a JSON object".to_string()))?;

    let mut days = Vec::new();
    for day in week_days(true) {
        let name = weekday_name(day);
        let Some(raw) = obj.get(name) else {
            continue;
        };
        let items = raw
            .as_array()
            .ok_or_else(|| invalid(format!("entries for {name} must be an array")))?;

        let mut entries = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let fields = item
                .as_object()
                .ok_or_else(|| invalid(format!("event {idx} on {name} must be an object")))?;
            if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
                return Err(invalid(format!(
                    "event {idx} on {name} is missing required field: {missing}"
                )));
            }
            let entry: CalendarEntry = serde_json::from_value(item.clone())
                .map_err(|e| invalid(format!("event {idx} on {name}: {e}")))?;
            entries.push(entry);
        }
        days.push((day, entries));
    }

    if days.is_empty() {
        return Err(invalid(
            "calendar must contain at least one valid day (Monday-Sunday)".to_string(),
        ));
    }
    Ok(GeneratedCalendar::from(days))
}

/// Turn timed calendar entries back into a draft.
///
/// Meetings stay meetings; task entries become tasks pinned to their slot;
/// breaks and entries without a readable time are dropped.
pub fn calendar_to_draft(calendar: &GeneratedCalendar) -> ScheduleDraft {
    let mut draft = ScheduleDraft::default();

    for (day, entries) in calendar.iter() {
        for entry in entries {
            if entry.kind == EntryKind::Break {
                continue;
            }
            let Some(block) = entry.block().filter(|b| !b.is_empty()) else {
                tracing::warn!(entry = %entry.id, "imported entry has no usable time, dropping");
                continue;
            };
            push_entry(&mut draft, day, entry, block.len());
        }
    }

    normalize_draft(draft)
}

fn push_entry(draft: &mut ScheduleDraft, day: Weekday, entry: &CalendarEntry, minutes: u32) {
    let day_name = Some(weekday_name(day).to_string());
    match entry.kind.meeting_type() {
        Some(kind) => draft.meetings.push(Meeting {
            id: entry.id.clone(),
            description: entry.description.clone(),
            day: day_name,
            time: Some(entry.start_time.clone()),
            duration_minutes: Some(minutes),
            kind,
            location: entry.location.clone(),
            course_code: entry.course_code.clone(),
            ..Meeting::default()
        }),
        None => draft.tasks.push(Task {
            id: entry.id.clone(),
            description: entry.description.clone(),
            day: day_name,
            time: Some(entry.start_time.clone()),
            duration_minutes: Some(minutes),
            category: IMPORTED_TASK_CATEGORY.to_string(),
            course_code: entry.course_code.clone(),
            ..Task::default()
        }),
    }
}
