//! Task duration defaults, splitting and greedy first-fit placement.

use chrono::Weekday;
use serde::Serialize;

use super::calendar::{CalendarEntry, EntryKind, WeekCalendar};
use super::placer::ExamDays;
use crate::schedule::{weekday_name, Priority, Task};
use crate::timeline::{to_minutes, to_time_string, Interval, MINUTES_PER_DAY};

/// Default length of a high-priority task with no duration.
pub const HIGH_PRIORITY_MINUTES: u32 = 240;
/// Default length of any other task with no duration.
pub const DEFAULT_TASK_MINUTES: u32 = 180;

pub fn default_duration(priority: Priority) -> u32 {
    match priority {
        Priority::High => HIGH_PRIORITY_MINUTES,
        Priority::Medium | Priority::Low => DEFAULT_TASK_MINUTES,
    }
}

/// Fill in every missing task duration from its priority.
pub fn resolve_durations(tasks: &mut [Task]) {
    for task in tasks.iter_mut().filter(|t| t.duration_minutes.is_none()) {
        let minutes = default_duration(task.priority);
        tracing::debug!(task = %task.id, minutes, "task duration defaulted from priority");
        task.duration_minutes = Some(minutes);
    }
}

/// One schedulable chunk of a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPart {
    #[serde(flatten)]
    pub task: Task,
    pub parent_id: String,
    pub scheduled_day: Option<String>,
    pub scheduled_start: Option<String>,
    pub scheduled_end: Option<String>,
}

impl TaskPart {
    fn new(task: Task, parent_id: impl Into<String>) -> Self {
        Self {
            task,
            parent_id: parent_id.into(),
            scheduled_day: None,
            scheduled_start: None,
            scheduled_end: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn duration(&self) -> u32 {
        self.task.duration_minutes.unwrap_or(0)
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_day.is_some()
    }

    fn schedule(&mut self, day: Weekday, block: Interval) {
        self.scheduled_day = Some(weekday_name(day).to_string());
        self.scheduled_start = Some(to_time_string(block.start));
        self.scheduled_end = Some(to_time_string(block.end));
    }

    fn entry(&self, block: Interval) -> CalendarEntry {
        CalendarEntry::new(&self.task.id, EntryKind::Task, &self.task.description, block)
            .with_course_code(self.task.course_code.clone())
    }
}

/// Split a task into chunks of at most `cap` minutes.
///
/// Every chunk but the last is exactly `cap`; a zero remainder adds no
/// trailing chunk. A task within the cap comes back as a single part with
/// its own id.
pub fn split_task(task: &Task, cap: u32) -> Vec<TaskPart> {
    let total = task
        .duration_minutes
        .unwrap_or_else(|| default_duration(task.priority));
    let cap = cap.max(1);

    if total <= cap {
        let mut whole = task.clone();
        whole.duration_minutes = Some(total);
        return vec![TaskPart::new(whole, &task.id)];
    }

    let mut parts = Vec::new();
    let mut remaining = total;
    let mut n = 1;
    while remaining > 0 {
        let chunk = remaining.min(cap);
        let mut part = task.clone();
        part.id = format!("{}-part{n}", task.id);
        part.description = format!("{} (Part {n})", task.description);
        part.duration_minutes = Some(chunk);
        parts.push(TaskPart::new(part, &task.id));
        remaining -= chunk;
        n += 1;
    }
    parts
}

/// Days to try for a part: the preferred day first, then the rest in week order.
pub fn candidate_days(week: &[Weekday], preferred: Option<Weekday>) -> Vec<Weekday> {
    let mut days = Vec::with_capacity(week.len());
    if let Some(day) = preferred.filter(|d| week.contains(d)) {
        days.push(day);
    }
    days.extend(week.iter().copied().filter(|d| Some(*d) != preferred));
    days
}

/// Day before the course's exam (clamped to the first day), else the task's own day.
fn preferred_day(task: &Task, week: &[Weekday], exam_days: &ExamDays) -> Option<Weekday> {
    let from_exam = task
        .course_code
        .as_deref()
        .and_then(|code| exam_days.position_for(code))
        .and_then(|pos| week.get(pos.saturating_sub(1)).copied());
    from_exam.or_else(|| task.weekday().filter(|d| week.contains(d)))
}

/// Outcome of placing tasks into a week.
#[derive(Debug, Clone, Default)]
pub struct TaskAllocation {
    pub parts: Vec<TaskPart>,
    pub unplaced: Vec<String>,
    /// Parts this allocator does not handle (non-preparation, unpinned).
    pub skipped: Vec<String>,
}

/// Whether the task asks for a fixed slot (both day and time present).
fn is_pinned(task: &Task) -> bool {
    task.day.is_some() && task.time.is_some()
}

/// Place a task at its stated day and time if that slot is still free.
///
/// Meetings win: a pinned task never overlaps anything already placed.
fn place_pinned(calendar: &mut WeekCalendar, task: &Task) -> Option<TaskPart> {
    let day = task.weekday().filter(|d| calendar.contains(*d))?;
    let time = task.time.as_deref()?;
    let duration = task
        .duration_minutes
        .unwrap_or_else(|| default_duration(task.priority));
    let start = match to_minutes(time) {
        Ok(start) => start,
        Err(err) => {
            tracing::warn!(task = %task.id, time, error = %err, "pinned task time unreadable");
            return None;
        }
    };
    let end = start.checked_add(duration).filter(|end| *end <= MINUTES_PER_DAY)?;

    let block = Interval::new(start, end);
    if !calendar
        .free_intervals_for(day)
        .is_some_and(|free| free.covers(block))
    {
        return None;
    }

    let mut part = TaskPart::new(task.clone(), &task.id);
    part.task.duration_minutes = Some(duration);
    calendar.place(day, block, part.entry(block));
    part.schedule(day, block);
    tracing::debug!(task = %task.id, day = weekday_name(day), start, end, "pinned task placed");
    Some(part)
}

/// First free interval on the first candidate day that fits `part`.
fn first_fit(calendar: &WeekCalendar, days: &[Weekday], minutes: u32) -> Option<(Weekday, Interval)> {
    days.iter().find_map(|day| {
        calendar
            .free_intervals_for(*day)?
            .first_fit(minutes)
            .map(|free| (*day, Interval::new(free.start, free.start + minutes)))
    })
}

/// Resolve durations, place pinned tasks, then split and place preparation work.
pub fn allocate_tasks(
    calendar: &mut WeekCalendar,
    tasks: &[Task],
    exam_days: &ExamDays,
    session_cap: u32,
) -> TaskAllocation {
    let mut tasks = tasks.to_vec();
    resolve_durations(&mut tasks);

    let week = calendar.days();
    let mut allocation = TaskAllocation::default();
    let mut flexible = Vec::new();

    for task in &tasks {
        if is_pinned(task) {
            match place_pinned(calendar, task) {
                Some(part) => {
                    allocation.parts.push(part);
                    continue;
                }
                None => tracing::warn!(
                    task = %task.id,
                    "pinned slot unavailable, treating task as flexible"
                ),
            }
        }
        flexible.push(task);
    }

    for task in flexible {
        let parts = split_task(task, session_cap);
        if !task.is_preparation() {
            allocation
                .skipped
                .extend(parts.iter().map(|p| p.id().to_string()));
            allocation.parts.extend(parts);
            continue;
        }

        let days = candidate_days(&week, preferred_day(task, &week, exam_days));
        for mut part in parts {
            match first_fit(calendar, &days, part.duration()) {
                Some((day, block)) => {
                    calendar.place(day, block, part.entry(block));
                    part.schedule(day, block);
                    tracing::debug!(
                        task = %part.id(),
                        day = weekday_name(day),
                        start = block.start,
                        end = block.end,
                        "task part placed"
                    );
                }
                None => {
                    tracing::warn!(
                        task = %part.id(),
                        minutes = part.duration(),
                        "no free interval fits task part"
                    );
                    allocation.unplaced.push(part.id().to_string());
                }
            }
            allocation.parts.push(part);
        }
    }

    allocation
}
