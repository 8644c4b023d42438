//! Schedule draft types: meetings, tasks, and the questions asked about them.
//!
//! A [`ScheduleDraft`] is what the external text parser produces and what
//! every core operation consumes and returns. Fields that may be absent are
//! `Option`s; loosely typed parser values are resolved on the way in (see
//! [`fields`]).

pub mod fields;
mod normalize;
mod question;

use std::collections::BTreeSet;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};

use fields::{lenient_priority, null_as_default, optional_duration, optional_text, string_list};

pub use fields::parse_optional_duration;
pub use normalize::{
    clean_missing_info, detect_missing_info, ensure_ids, link_related_events, normalize_draft,
    normalize_time, refresh_course_codes, validate_and_fix_times,
};
pub use question::{InfoField, Question, QuestionKind, TargetType};

/// Root aggregate for one scheduling session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub meetings: Vec<Meeting>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "course_code_set")]
    pub course_codes: BTreeSet<String>,
}

impl ScheduleDraft {
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty() && self.tasks.is_empty()
    }

    pub fn meeting(&self, id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

fn course_code_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_list(deserializer)?.into_iter().collect())
}

/// Kind of fixed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Exam,
    Presentation,
    Interview,
    ProjectDeadline,
    Regular,
    #[default]
    Meeting,
}

impl MeetingType {
    /// Case-insensitive; unknown kinds fall back to `Meeting`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace(&[' ', '-'][..], "_").as_str() {
            "exam" => Self::Exam,
            "presentation" => Self::Presentation,
            "interview" => Self::Interview,
            "project_deadline" => Self::ProjectDeadline,
            "regular" => Self::Regular,
            _ => Self::Meeting,
        }
    }

    /// Exams and presentations anchor preparation work and need a course code.
    pub fn is_assessment(&self) -> bool {
        matches!(self, Self::Exam | Self::Presentation)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Presentation => "presentation",
            Self::Interview => "interview",
            Self::ProjectDeadline => "project_deadline",
            Self::Regular => "regular",
            Self::Meeting => "meeting",
        }
    }
}

impl<'de> Deserialize<'de> for MeetingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::parse(&s)).unwrap_or_default())
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive; accepts `high`/`1`/`urgent`, `medium`/`2`,
    /// `low`/`3`. Anything else is `Medium`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" | "1" | "urgent" => Self::High,
            "low" | "3" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// A fixed-time, non-movable commitment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "optional_duration")]
    pub duration_minutes: Option<u32>,
    /// Older drafts carry `duration` instead of `duration_minutes`.
    #[serde(
        default,
        rename = "duration",
        deserialize_with = "optional_duration",
        skip_serializing
    )]
    pub legacy_duration: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: MeetingType,
    #[serde(default, deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub course_code: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub missing_info: Vec<String>,
}

impl Meeting {
    pub fn new(description: impl Into<String>, kind: MeetingType) -> Self {
        Self {
            description: description.into(),
            kind,
            ..Self::default()
        }
    }

    /// `duration_minutes`, falling back to the legacy `duration` field.
    pub fn resolved_duration(&self) -> Option<u32> {
        self.duration_minutes.or(self.legacy_duration)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.day.as_deref().and_then(parse_weekday)
    }
}

/// A flexible work item the allocator may place into open time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Preferred day.
    #[serde(default, deserialize_with = "optional_text")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "optional_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "optional_duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub course_code: Option<String>,
    /// Description of the meeting this task prepares for.
    #[serde(default, deserialize_with = "optional_text")]
    pub related_event: Option<String>,
    /// Id of the meeting named by `related_event`, once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_event_id: Option<String>,
    /// Advisory ordering only.
    #[serde(default, deserialize_with = "string_list")]
    pub prerequisites: Vec<String>,
    #[serde(
        default,
        deserialize_with = "string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub missing_info: Vec<String>,
}

pub const PREPARATION_CATEGORY: &str = "preparation";

const COURSE_BOUND_CATEGORIES: [&str; 3] = [
    PREPARATION_CATEGORY,
    "exam_preparation",
    "presentation_preparation",
];

impl Task {
    pub fn new(description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Only preparation tasks are placed by the allocator.
    pub fn is_preparation(&self) -> bool {
        self.category.trim().eq_ignore_ascii_case(PREPARATION_CATEGORY)
    }

    /// Preparation-type tasks must name the course they prepare for.
    pub fn needs_course_code(&self) -> bool {
        let category = self.category.trim();
        COURSE_BOUND_CATEGORIES
            .iter()
            .any(|c| category.eq_ignore_ascii_case(c))
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.day.as_deref().and_then(parse_weekday)
    }
}

/// Parse a weekday name ("Monday", "mon", "THURSDAY").
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    raw.trim().parse::<Weekday>().ok()
}

/// Full English name used as the calendar key.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_tolerates_missing_and_null_collections() {
        let draft: ScheduleDraft = serde_json::from_value(json!({})).unwrap();
        assert!(draft.is_empty());

        let draft: ScheduleDraft =
            serde_json::from_value(json!({"meetings": null, "tasks": null, "course_codes": null}))
                .unwrap();
        assert!(draft.is_empty());
        assert!(draft.course_codes.is_empty());
    }

    #[test]
    fn meeting_decodes_parser_output() {
        let meeting: Meeting = serde_json::from_value(json!({
            "id": "m1",
            "description": "CS201 exam",
            "day": "Thursday",
            "time": "None",
            "duration_minutes": "120",
            "type": "Exam",
            "location": null,
            "course_code": "CS201",
            "missing_info": ["time"]
        }))
        .unwrap();

        assert_eq!(meeting.time, None);
        assert_eq!(meeting.duration_minutes, Some(120));
        assert_eq!(meeting.kind, MeetingType::Exam);
        assert_eq!(meeting.weekday(), Some(Weekday::Thu));
        assert_eq!(meeting.missing_info, vec!["time".to_string()]);
    }

    #[test]
    fn meeting_falls_back_to_legacy_duration() {
        let meeting: Meeting = serde_json::from_value(json!({
            "description": "Standup",
            "duration": 15
        }))
        .unwrap();
        assert_eq!(meeting.duration_minutes, None);
        assert_eq!(meeting.resolved_duration(), Some(15));

        let out = serde_json::to_value(&meeting).unwrap();
        assert!(out.get("duration").is_none());
    }

    #[test]
    fn task_decodes_loose_priority_and_duration() {
        let task: Task = serde_json::from_value(json!({
            "description": "Study for CS201",
            "priority": "URGENT",
            "duration_minutes": "null",
            "category": "Preparation",
            "prerequisites": ["Read notes", null]
        }))
        .unwrap();

        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.duration_minutes, None);
        assert!(task.is_preparation());
        assert!(task.needs_course_code());
        assert_eq!(task.prerequisites, vec!["Read notes".to_string()]);
    }

    #[test]
    fn priority_parsing() {
        assert_eq!(Priority::parse("1"), Priority::High);
        assert_eq!(Priority::parse("High"), Priority::High);
        assert_eq!(Priority::parse("2"), Priority::Medium);
        assert_eq!(Priority::parse("low"), Priority::Low);
        assert_eq!(Priority::parse("whenever"), Priority::Medium);
    }

    #[test]
    fn meeting_type_is_case_insensitive() {
        assert_eq!(MeetingType::parse("PRESENTATION"), MeetingType::Presentation);
        assert_eq!(MeetingType::parse("project deadline"), MeetingType::ProjectDeadline);
        assert_eq!(MeetingType::parse("lecture"), MeetingType::Meeting);
        assert!(MeetingType::Exam.is_assessment());
        assert!(!MeetingType::Interview.is_assessment());
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
        assert_eq!(parse_weekday("thursday"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("someday"), None);
    }
}
