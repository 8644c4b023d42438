//! Single normalization pass over a parsed draft.
//!
//! Resolves ids, clock times, and meeting links once up front so later
//! stages can rely on typed fields, then derives the questions still to ask.

use std::collections::HashMap;

use uuid::Uuid;

use super::fields::is_null_token;
use super::{InfoField, Meeting, Question, ScheduleDraft, TargetType};

/// Run every normalization step and refresh `missing_info` on each entity.
pub fn normalize_draft(mut draft: ScheduleDraft) -> ScheduleDraft {
    ensure_ids(&mut draft);
    validate_and_fix_times(&mut draft);
    for meeting in &mut draft.meetings {
        if meeting.duration_minutes.is_none() {
            meeting.duration_minutes = meeting.legacy_duration.take();
        }
    }
    link_related_events(&mut draft);
    refresh_course_codes(&mut draft);
    sync_missing_info(&mut draft);
    draft
}

/// Give every meeting and task without an id a fresh UUID.
///
/// Existing non-empty ids are never replaced.
pub fn ensure_ids(draft: &mut ScheduleDraft) {
    for meeting in &mut draft.meetings {
        if meeting.id.trim().is_empty() {
            meeting.id = Uuid::new_v4().to_string();
        }
    }
    for task in &mut draft.tasks {
        if task.id.trim().is_empty() {
            task.id = Uuid::new_v4().to_string();
        }
    }
}

/// Convert a free-text clock time to 24-hour "HH:MM".
///
/// Never fails: input it cannot interpret is returned trimmed but otherwise
/// unchanged. `None`, `"None"`, `"null"` and blank input map to `None`.
pub fn normalize_time(raw: Option<&str>) -> Option<String> {
    let original = raw?.trim();
    if is_null_token(original) {
        return None;
    }

    let lowered = original.to_ascii_lowercase();
    match lowered.as_str() {
        "noon" => return Some("12:00".to_string()),
        "midnight" => return Some("00:00".to_string()),
        _ => {}
    }

    let converted = if let Some((bare, is_pm)) = split_meridiem(&lowered) {
        twelve_hour_to_24(bare, is_pm)
    } else if lowered.chars().all(|c| c.is_ascii_digit()) {
        lowered.parse::<u32>().ok().map(|h| format!("{h:02}:00"))
    } else if lowered.contains(':') {
        hour_minute(&lowered).map(|(h, m)| format!("{h:02}:{m:02}"))
    } else {
        None
    };

    Some(converted.unwrap_or_else(|| original.to_string()))
}

/// Split a trailing `am`/`pm` (dotted or not) off a lowercased time.
fn split_meridiem(lowered: &str) -> Option<(&str, bool)> {
    let trimmed = lowered.trim_end_matches('.').trim_end();
    [("am", false), ("a.m", false), ("pm", true), ("p.m", true)]
        .into_iter()
        .find_map(|(suffix, is_pm)| trimmed.strip_suffix(suffix).map(|bare| (bare.trim(), is_pm)))
}

fn twelve_hour_to_24(bare: &str, is_pm: bool) -> Option<String> {
    let (hours, minutes) = if bare.contains(':') {
        hour_minute(bare)?
    } else {
        (bare.parse::<u32>().ok()?, 0)
    };
    if hours > 12 {
        return None;
    }

    let hours = match (is_pm, hours) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    };
    Some(format!("{hours:02}:{minutes:02}"))
}

fn hour_minute(raw: &str) -> Option<(u32, u32)> {
    let (h, m) = raw.split_once(':')?;
    Some((h.trim().parse().ok()?, m.trim().parse().ok()?))
}

/// Normalize every meeting and task time in place.
pub fn validate_and_fix_times(draft: &mut ScheduleDraft) {
    for meeting in &mut draft.meetings {
        meeting.time = normalize_time(meeting.time.as_deref());
    }
    for task in &mut draft.tasks {
        task.time = normalize_time(task.time.as_deref());
    }
}

/// Resolve each task's `related_event` description to a meeting id.
///
/// A task without a course code inherits one from its linked meeting.
pub fn link_related_events(draft: &mut ScheduleDraft) {
    let by_description: HashMap<String, &Meeting> = draft
        .meetings
        .iter()
        .map(|m| (m.description.trim().to_lowercase(), m))
        .collect();

    for task in &mut draft.tasks {
        let linked = task
            .related_event_id
            .as_deref()
            .and_then(|id| draft.meetings.iter().find(|m| m.id == id))
            .or_else(|| {
                task.related_event
                    .as_deref()
                    .and_then(|desc| by_description.get(&desc.trim().to_lowercase()).copied())
            });

        let Some(meeting) = linked else {
            continue;
        };
        task.related_event_id = Some(meeting.id.clone());
        if task.course_code.is_none() {
            task.course_code = meeting.course_code.clone();
        }
    }
}

/// Add every course code referenced by a meeting or task to the draft's set.
pub fn refresh_course_codes(draft: &mut ScheduleDraft) {
    let referenced: Vec<String> = draft
        .meetings
        .iter()
        .filter_map(|m| m.course_code.clone())
        .chain(draft.tasks.iter().filter_map(|t| t.course_code.clone()))
        .collect();
    draft.course_codes.extend(referenced);
}

/// Questions for every required field still absent, meetings first.
///
/// A task's course-code question is held back while its linked meeting's
/// own course-code question is pending; answering that one fills both.
pub fn detect_missing_info(draft: &ScheduleDraft) -> Vec<Question> {
    let mut questions = Vec::new();

    for meeting in &draft.meetings {
        for field in missing_meeting_fields(meeting) {
            questions.push(Question::new(
                field,
                TargetType::Meeting,
                &meeting.id,
                &meeting.description,
            ));
        }
    }

    for task in &draft.tasks {
        if !task.needs_course_code() || task.course_code.is_some() {
            continue;
        }
        let covered = task
            .related_event_id
            .as_deref()
            .and_then(|id| draft.meeting(id))
            .is_some_and(|m| m.kind.is_assessment() && m.course_code.is_none());
        if covered {
            continue;
        }
        questions.push(Question::new(
            InfoField::CourseCode,
            TargetType::Task,
            &task.id,
            &task.description,
        ));
    }

    questions
}

fn missing_meeting_fields(meeting: &Meeting) -> Vec<InfoField> {
    let mut fields = Vec::new();
    if meeting.time.is_none() {
        fields.push(InfoField::Time);
    }
    if meeting.resolved_duration().is_none() {
        fields.push(InfoField::Duration);
    }
    if meeting.course_code.is_none() && meeting.kind.is_assessment() {
        fields.push(InfoField::CourseCode);
    }
    fields
}

/// Rewrite each entity's `missing_info` from the current question set.
pub(crate) fn sync_missing_info(draft: &mut ScheduleDraft) {
    let questions = detect_missing_info(draft);
    let mut pending: HashMap<&str, Vec<String>> = HashMap::new();
    for q in &questions {
        pending
            .entry(q.target_id.as_str())
            .or_default()
            .push(q.field.as_str().to_string());
    }

    for meeting in &mut draft.meetings {
        meeting.missing_info = pending.get(meeting.id.as_str()).cloned().unwrap_or_default();
    }
    for task in &mut draft.tasks {
        task.missing_info = pending.get(task.id.as_str()).cloned().unwrap_or_default();
    }
}

/// Drop `missing_info` from every entity.
pub fn clean_missing_info(draft: &mut ScheduleDraft) {
    for meeting in &mut draft.meetings {
        meeting.missing_info.clear();
    }
    for task in &mut draft.tasks {
        task.missing_info.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{MeetingType, Task};

    fn exam(description: &str) -> Meeting {
        Meeting {
            id: "exam-1".to_string(),
            description: description.to_string(),
            day: Some("Thursday".to_string()),
            time: Some("17:00".to_string()),
            duration_minutes: Some(120),
            kind: MeetingType::Exam,
            ..Meeting::default()
        }
    }

    #[test]
    fn normalize_time_handles_words_and_twelve_hour_forms() {
        assert_eq!(normalize_time(Some("noon")).as_deref(), Some("12:00"));
        assert_eq!(normalize_time(Some("Midnight")).as_deref(), Some("00:00"));
        assert_eq!(normalize_time(Some("5pm")).as_deref(), Some("17:00"));
        assert_eq!(normalize_time(Some("5:30 PM")).as_deref(), Some("17:30"));
        assert_eq!(normalize_time(Some("12pm")).as_deref(), Some("12:00"));
        assert_eq!(normalize_time(Some("12am")).as_deref(), Some("00:00"));
        assert_eq!(normalize_time(Some("9am")).as_deref(), Some("09:00"));
        assert_eq!(normalize_time(Some("14")).as_deref(), Some("14:00"));
        assert_eq!(normalize_time(Some("9:5")).as_deref(), Some("09:05"));
    }

    #[test]
    fn normalize_time_null_tokens() {
        assert_eq!(normalize_time(None), None);
        assert_eq!(normalize_time(Some("None")), None);
        assert_eq!(normalize_time(Some("null")), None);
        assert_eq!(normalize_time(Some("  ")), None);
    }

    #[test]
    fn normalize_time_passes_through_what_it_cannot_read() {
        assert_eq!(normalize_time(Some("afternoon")).as_deref(), Some("afternoon"));
        assert_eq!(normalize_time(Some("1:2:3")).as_deref(), Some("1:2:3"));
        assert_eq!(normalize_time(Some("xpm")).as_deref(), Some("xpm"));
        assert_eq!(normalize_time(Some("gamma")).as_deref(), Some("gamma"));
        assert_eq!(normalize_time(Some("13pm")).as_deref(), Some("13pm"));
    }

    #[test]
    fn normalize_time_never_overflows_on_huge_hours() {
        assert_eq!(normalize_time(Some("4294967295pm")).as_deref(), Some("4294967295pm"));
        assert_eq!(normalize_time(Some("4294967295:30 am")).as_deref(), Some("4294967295:30 am"));
        assert_eq!(normalize_time(Some("99999999")).as_deref(), Some("99999999:00"));
    }

    #[test]
    fn normalize_time_accepts_dotted_meridiem() {
        assert_eq!(normalize_time(Some("3 p.m.")).as_deref(), Some("15:00"));
        assert_eq!(normalize_time(Some("11:15 a.m.")).as_deref(), Some("11:15"));
    }

    #[test]
    fn ensure_ids_is_idempotent() {
        let mut draft = ScheduleDraft {
            meetings: vec![Meeting::new("sync", MeetingType::Meeting)],
            tasks: vec![Task::new("read", "study")],
            ..ScheduleDraft::default()
        };
        ensure_ids(&mut draft);
        let first = draft.clone();
        assert!(!first.meetings[0].id.is_empty());
        assert!(!first.tasks[0].id.is_empty());

        ensure_ids(&mut draft);
        assert_eq!(draft, first);
    }

    #[test]
    fn meeting_questions_come_before_task_questions() {
        let mut meeting = Meeting::new("CS201 exam", MeetingType::Exam);
        meeting.id = "m1".to_string();
        let mut task = Task::new("Revise chapter 3", "exam_preparation");
        task.id = "t1".to_string();
        let draft = ScheduleDraft {
            meetings: vec![meeting],
            tasks: vec![task],
            ..ScheduleDraft::default()
        };

        let fields: Vec<_> = detect_missing_info(&draft)
            .into_iter()
            .map(|q| (q.target_id, q.field))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("m1".to_string(), InfoField::Time),
                ("m1".to_string(), InfoField::Duration),
                ("m1".to_string(), InfoField::CourseCode),
                ("t1".to_string(), InfoField::CourseCode),
            ]
        );
    }

    #[test]
    fn non_assessment_meeting_needs_no_course_code() {
        let mut meeting = exam("Career fair");
        meeting.kind = MeetingType::Interview;
        let draft = ScheduleDraft {
            meetings: vec![meeting],
            ..ScheduleDraft::default()
        };
        assert!(detect_missing_info(&draft).is_empty());
    }

    #[test]
    fn linked_task_question_is_suppressed_while_meeting_is_pending() {
        let mut task = Task::new("Study", "preparation");
        task.id = "t1".to_string();
        task.related_event = Some("cs201 EXAM".to_string());
        let mut draft = ScheduleDraft {
            meetings: vec![exam("CS201 exam")],
            tasks: vec![task],
            ..ScheduleDraft::default()
        };
        link_related_events(&mut draft);
        assert_eq!(draft.tasks[0].related_event_id.as_deref(), Some("exam-1"));

        let questions = detect_missing_info(&draft);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].target_type, TargetType::Meeting);
    }

    #[test]
    fn linked_task_inherits_course_code() {
        let mut meeting = exam("CS201 exam");
        meeting.course_code = Some("CS201".to_string());
        let mut task = Task::new("Study", "preparation");
        task.related_event = Some("CS201 exam".to_string());

        let draft = normalize_draft(ScheduleDraft {
            meetings: vec![meeting],
            tasks: vec![task],
            ..ScheduleDraft::default()
        });
        assert_eq!(draft.tasks[0].course_code.as_deref(), Some("CS201"));
        assert!(draft.course_codes.contains("CS201"));
        assert!(detect_missing_info(&draft).is_empty());
    }

    #[test]
    fn normalize_draft_marks_missing_info() {
        let mut meeting = Meeting::new("Dentist", MeetingType::Regular);
        meeting.time = Some("3pm".to_string());
        let draft = normalize_draft(ScheduleDraft {
            meetings: vec![meeting],
            ..ScheduleDraft::default()
        });
        assert_eq!(draft.meetings[0].time.as_deref(), Some("15:00"));
        assert_eq!(draft.meetings[0].missing_info, vec!["duration_minutes".to_string()]);

        let mut cleaned = draft.clone();
        clean_missing_info(&mut cleaned);
        assert!(cleaned.meetings[0].missing_info.is_empty());
    }
}
