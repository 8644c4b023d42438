//! Folding user answers back into a draft.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::schedule::{
    clean_missing_info, detect_missing_info, normalize_time, refresh_course_codes, InfoField,
    Question, QuestionKind, ScheduleDraft,
};
use crate::timeline::{to_minutes, MINUTES_PER_DAY};

/// A user's reply to one [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub field: InfoField,
    #[serde(deserialize_with = "text_or_number")]
    pub value: String,
    /// Description of the entity; used when `target_id` is absent or stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "answer value must be text or a number, got {other}"
        ))),
    }
}

impl Answer {
    pub fn new(field: InfoField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            target: None,
            target_id: None,
            kind: Some(field.kind()),
        }
    }

    /// Answer addressed to the entity the question was about.
    pub fn for_question(question: &Question, value: impl Into<String>) -> Self {
        Self::new(question.field, value)
            .with_target(question.target.clone())
            .with_target_id(question.target_id.clone())
    }

    pub fn with_target(mut self, description: impl Into<String>) -> Self {
        self.target = Some(description.into());
        self
    }

    pub fn with_target_id(mut self, id: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self
    }

    fn target_label(&self) -> String {
        self.target_id
            .clone()
            .or_else(|| self.target.clone())
            .unwrap_or_default()
    }
}

/// Result of applying answers to a draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub draft: ScheduleDraft,
    pub next_question: Option<Question>,
    pub remaining: Vec<Question>,
    pub complete: bool,
}

enum Coerced {
    Time(String),
    Duration(u32),
    CourseCode(String),
}

fn coerce(field: InfoField, raw: &str) -> Result<Coerced> {
    match field {
        InfoField::Duration => {
            let minutes: u32 = raw.trim().parse().map_err(|_| {
                CoreError::invalid_answer(field.as_str(), raw, "expected a whole number of minutes")
            })?;
            if minutes == 0 || minutes >= MINUTES_PER_DAY {
                return Err(CoreError::invalid_answer(
                    field.as_str(),
                    raw,
                    "duration must be between 1 and 1439 minutes",
                ));
            }
            Ok(Coerced::Duration(minutes))
        }
        InfoField::Time => {
            let time = normalize_time(Some(raw))
                .ok_or_else(|| CoreError::invalid_answer(field.as_str(), raw, "no time given"))?;
            let minutes = to_minutes(&time).map_err(|_| {
                CoreError::invalid_answer(field.as_str(), raw, "not a recognizable clock time")
            })?;
            let minute_ok = time
                .split_once(':')
                .and_then(|(_, m)| m.parse::<u32>().ok())
                .is_some_and(|m| m < 60);
            if minutes >= MINUTES_PER_DAY || !minute_ok {
                return Err(CoreError::invalid_answer(
                    field.as_str(),
                    raw,
                    "time must fall within one day",
                ));
            }
            Ok(Coerced::Time(time))
        }
        InfoField::CourseCode => {
            let code = raw.trim();
            if code.is_empty() {
                return Err(CoreError::invalid_answer(field.as_str(), raw, "course code is empty"));
            }
            Ok(Coerced::CourseCode(code.to_string()))
        }
    }
}

enum Target {
    Meeting(usize),
    Task(usize),
}

/// Id match first, then description equality (meetings before tasks).
fn locate(draft: &ScheduleDraft, answer: &Answer) -> Option<Target> {
    if let Some(id) = answer.target_id.as_deref().filter(|id| !id.is_empty()) {
        if let Some(i) = draft.meetings.iter().position(|m| m.id == id) {
            return Some(Target::Meeting(i));
        }
        if let Some(i) = draft.tasks.iter().position(|t| t.id == id) {
            return Some(Target::Task(i));
        }
    }

    let description = answer.target.as_deref()?;
    if let Some(i) = draft.meetings.iter().position(|m| m.description == description) {
        return Some(Target::Meeting(i));
    }
    draft
        .tasks
        .iter()
        .position(|t| t.description == description)
        .map(Target::Task)
}

fn remove_missing(missing: &mut Vec<String>, field: InfoField) {
    missing.retain(|f| f != field.as_str() && !(field == InfoField::Duration && f == "duration"));
}

/// Write one answer onto `draft` in place, after validating it.
fn write_answer(draft: &mut ScheduleDraft, answer: &Answer) -> Result<()> {
    let value = coerce(answer.field, &answer.value)?;
    let target = locate(draft, answer).ok_or_else(|| CoreError::AnswerTargetNotFound {
        target: answer.target_label(),
    })?;

    match target {
        Target::Meeting(i) => {
            let meeting = &mut draft.meetings[i];
            match value {
                Coerced::Time(t) => meeting.time = Some(t),
                Coerced::Duration(d) => meeting.duration_minutes = Some(d),
                Coerced::CourseCode(code) => {
                    meeting.course_code = Some(code.clone());
                    let meeting_id = meeting.id.clone();
                    for task in draft
                        .tasks
                        .iter_mut()
                        .filter(|t| t.related_event_id.as_deref() == Some(meeting_id.as_str()))
                        .filter(|t| t.course_code.is_none())
                    {
                        task.course_code = Some(code.clone());
                        remove_missing(&mut task.missing_info, InfoField::CourseCode);
                    }
                }
            }
            remove_missing(&mut draft.meetings[i].missing_info, answer.field);
        }
        Target::Task(i) => {
            let task = &mut draft.tasks[i];
            match value {
                Coerced::Time(t) => task.time = Some(t),
                Coerced::Duration(d) => task.duration_minutes = Some(d),
                Coerced::CourseCode(code) => task.course_code = Some(code),
            }
            remove_missing(&mut task.missing_info, answer.field);
        }
    }

    tracing::debug!(
        field = answer.field.as_str(),
        target = %answer.target_label(),
        "answer applied"
    );
    Ok(())
}

fn finish(mut draft: ScheduleDraft) -> AnswerOutcome {
    refresh_course_codes(&mut draft);
    let remaining = detect_missing_info(&draft);
    let complete = remaining.is_empty();
    if complete {
        clean_missing_info(&mut draft);
    }
    AnswerOutcome {
        draft,
        next_question: remaining.first().cloned(),
        remaining,
        complete,
    }
}

/// Apply one answer and report what is still missing.
///
/// Fails with [`CoreError::InvalidAnswerValue`] when the value cannot be
/// coerced, or [`CoreError::AnswerTargetNotFound`]; `draft` is not modified
/// in either case.
pub fn apply_answer(draft: &ScheduleDraft, answer: &Answer) -> Result<AnswerOutcome> {
    let mut updated = draft.clone();
    write_answer(&mut updated, answer)?;
    Ok(finish(updated))
}

/// Apply a batch of answers in order. Any failure rejects the whole batch.
pub fn apply_answers(draft: &ScheduleDraft, answers: &[Answer]) -> Result<AnswerOutcome> {
    let mut updated = draft.clone();
    for answer in answers {
        write_answer(&mut updated, answer)?;
    }
    Ok(finish(updated))
}
