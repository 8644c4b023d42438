//! Per-day calendar model: free intervals plus the entries placed so far.

use std::fmt;

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schedule::{weekday_name, MeetingType};
use crate::timeline::{to_minutes, to_time_string, FreeIntervals, Interval};

/// Days that take part in scheduling, in canonical order.
pub fn week_days(include_weekend: bool) -> Vec<Weekday> {
    let mut days = vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];
    if include_weekend {
        days.extend([Weekday::Sat, Weekday::Sun]);
    }
    days
}

/// What a calendar entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Exam,
    Presentation,
    Interview,
    ProjectDeadline,
    Regular,
    Meeting,
    Task,
    Break,
}

impl EntryKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "task" => Self::Task,
            "break" => Self::Break,
            other => MeetingType::parse(other).into(),
        }
    }

    pub fn is_meeting(&self) -> bool {
        !matches!(self, Self::Task | Self::Break)
    }

    pub fn meeting_type(&self) -> Option<MeetingType> {
        Some(match self {
            Self::Exam => MeetingType::Exam,
            Self::Presentation => MeetingType::Presentation,
            Self::Interview => MeetingType::Interview,
            Self::ProjectDeadline => MeetingType::ProjectDeadline,
            Self::Regular => MeetingType::Regular,
            Self::Meeting => MeetingType::Meeting,
            Self::Task | Self::Break => return None,
        })
    }
}

impl From<MeetingType> for EntryKind {
    fn from(kind: MeetingType) -> Self {
        match kind {
            MeetingType::Exam => Self::Exam,
            MeetingType::Presentation => Self::Presentation,
            MeetingType::Interview => Self::Interview,
            MeetingType::ProjectDeadline => Self::ProjectDeadline,
            MeetingType::Regular => Self::Regular,
            MeetingType::Meeting => Self::Meeting,
        }
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&String::deserialize(deserializer)?))
    }
}

/// One placed block on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl CalendarEntry {
    pub(crate) fn new(
        id: impl Into<String>,
        kind: EntryKind,
        description: impl Into<String>,
        block: Interval,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            description: description.into(),
            course_code: None,
            location: None,
            duration: block.len(),
            start_time: to_time_string(block.start),
            end_time: to_time_string(block.end),
        }
    }

    pub(crate) fn with_course_code(mut self, course_code: Option<String>) -> Self {
        self.course_code = course_code;
        self
    }

    pub(crate) fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// `[start, end)` in minutes, when both times parse.
    pub fn block(&self) -> Option<Interval> {
        let start = to_minutes(&self.start_time).ok()?;
        let end = to_minutes(&self.end_time).ok()?;
        Some(Interval::new(start, end))
    }

    fn start_key(&self) -> u32 {
        to_minutes(&self.start_time).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone)]
struct DayPlan {
    day: Weekday,
    free: FreeIntervals,
    entries: Vec<CalendarEntry>,
}

/// Free time and placed entries for every scheduled day of one week.
#[derive(Debug, Clone)]
pub struct WeekCalendar {
    window: Interval,
    days: Vec<DayPlan>,
}

impl WeekCalendar {
    /// One free interval spanning `window` on each day.
    pub fn new(window: Interval, include_weekend: bool) -> Self {
        let days = week_days(include_weekend)
            .into_iter()
            .map(|day| DayPlan {
                day,
                free: FreeIntervals::new(window),
                entries: Vec::new(),
            })
            .collect();
        Self { window, days }
    }

    pub fn window(&self) -> Interval {
        self.window
    }

    /// Scheduled days in canonical order.
    pub fn days(&self) -> Vec<Weekday> {
        self.days.iter().map(|d| d.day).collect()
    }

    /// Index of `day` in the week, if it takes part.
    pub fn position(&self, day: Weekday) -> Option<usize> {
        self.days.iter().position(|d| d.day == day)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.position(day).is_some()
    }

    pub fn free_intervals_for(&self, day: Weekday) -> Option<&FreeIntervals> {
        self.plan(day).map(|p| &p.free)
    }

    /// Mark `block` busy on `day`. Days outside the week are ignored.
    pub fn occupy(&mut self, day: Weekday, block: Interval) {
        if let Some(plan) = self.plan_mut(day) {
            plan.free.occupy(block);
        }
    }

    pub fn calendar_for(&self, day: Weekday) -> &[CalendarEntry] {
        self.plan(day).map(|p| p.entries.as_slice()).unwrap_or(&[])
    }

    /// Record an entry on `day` and mark its block busy.
    pub(crate) fn place(&mut self, day: Weekday, block: Interval, entry: CalendarEntry) {
        if let Some(plan) = self.plan_mut(day) {
            plan.free.occupy(block);
            plan.entries.push(entry);
        }
    }

    fn plan(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == day)
    }

    fn plan_mut(&mut self, day: Weekday) -> Option<&mut DayPlan> {
        self.days.iter_mut().find(|d| d.day == day)
    }

    /// Sort each day by start time and optionally insert short breaks.
    pub fn into_generated(self, break_minutes: Option<u32>) -> GeneratedCalendar {
        let days = self
            .days
            .into_iter()
            .map(|plan| {
                let mut entries = plan.entries;
                entries.sort_by_key(CalendarEntry::start_key);
                if let Some(minutes) = break_minutes {
                    entries = insert_breaks(entries, minutes);
                }
                (plan.day, entries)
            })
            .collect();
        GeneratedCalendar { days }
    }
}

/// Fill short gaps between consecutive entries with `break` entries.
///
/// A gap qualifies when it is positive and at most `break_minutes + 5`.
pub fn insert_breaks(entries: Vec<CalendarEntry>, break_minutes: u32) -> Vec<CalendarEntry> {
    let limit = break_minutes + 5;
    let mut out = Vec::with_capacity(entries.len() * 2);
    let mut iter = entries.into_iter().peekable();

    while let Some(current) = iter.next() {
        let gap = iter.peek().and_then(|next| {
            let end = current.block()?.end;
            let start = next.block()?.start;
            (start > end && start - end <= limit)
                .then(|| (Interval::new(end, start), next.id.clone()))
        });
        let current_id = current.id.clone();
        out.push(current);
        if let Some((block, next_id)) = gap {
            out.push(CalendarEntry::new(
                format!("break_between_{current_id}_{next_id}"),
                EntryKind::Break,
                "Break",
                block,
            ));
        }
    }
    out
}

/// Final weekly calendar, keyed by full day name in week order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCalendar {
    days: Vec<(Weekday, Vec<CalendarEntry>)>,
}

impl GeneratedCalendar {
    pub fn day(&self, day: Weekday) -> Option<&[CalendarEntry]> {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[CalendarEntry])> {
        self.days.iter().map(|(d, e)| (*d, e.as_slice()))
    }

    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|(_, e)| e.len()).sum()
    }

    /// Find an entry by id along with its day.
    pub fn find(&self, id: &str) -> Option<(Weekday, &CalendarEntry)> {
        self.iter()
            .find_map(|(day, entries)| entries.iter().find(|e| e.id == id).map(|e| (day, e)))
    }
}

impl From<Vec<(Weekday, Vec<CalendarEntry>)>> for GeneratedCalendar {
    fn from(days: Vec<(Weekday, Vec<CalendarEntry>)>) -> Self {
        Self { days }
    }
}

impl Serialize for GeneratedCalendar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, entries) in &self.days {
            map.serialize_entry(weekday_name(*day), entries)?;
        }
        map.end()
    }
}

impl fmt::Display for GeneratedCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (day, entries) in &self.days {
            writeln!(f, "{}", weekday_name(*day))?;
            if entries.is_empty() {
                writeln!(f, "  (free)")?;
            }
            for e in entries {
                write!(f, "  {}-{}  {}", e.start_time, e.end_time, e.description)?;
                if let Some(code) = &e.course_code {
                    write!(f, " [{code}]")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
