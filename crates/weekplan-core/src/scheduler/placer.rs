//! Places meetings at their stated day and time.

use std::collections::BTreeMap;

use chrono::Weekday;

use super::calendar::{CalendarEntry, WeekCalendar};
use crate::error::Result;
use crate::schedule::{weekday_name, Meeting};
use crate::timeline::{to_minutes, Interval, MINUTES_PER_DAY};

/// Day (and start) of the earliest assessment seen per course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamDays {
    by_course: BTreeMap<String, (usize, Weekday, u32)>,
}

impl ExamDays {
    /// Keep the earliest occurrence by week position, then start minute.
    pub fn record(&mut self, course_code: &str, position: usize, day: Weekday, start: u32) {
        let candidate = (position, day, start);
        self.by_course
            .entry(course_code.to_string())
            .and_modify(|current| {
                if (position, start) < (current.0, current.2) {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    pub fn day_for(&self, course_code: &str) -> Option<Weekday> {
        self.by_course.get(course_code).map(|(_, day, _)| *day)
    }

    pub fn position_for(&self, course_code: &str) -> Option<usize> {
        self.by_course.get(course_code).map(|(pos, _, _)| *pos)
    }

    pub fn is_empty(&self) -> bool {
        self.by_course.is_empty()
    }

    /// Course code to day name, for reporting.
    pub fn to_names(&self) -> BTreeMap<String, String> {
        self.by_course
            .iter()
            .map(|(code, (_, day, _))| (code.clone(), weekday_name(*day).to_string()))
            .collect()
    }
}

/// What happened to the meetings handed to [`place_meetings`].
#[derive(Debug, Clone, Default)]
pub struct MeetingPlacement {
    pub exam_days: ExamDays,
    pub skipped: Vec<String>,
}

/// Place every meeting that has a day, time and duration.
///
/// Meetings missing any of these, naming a day outside the week, or running
/// past midnight are skipped. A time that cannot be parsed is an error.
pub fn place_meetings(calendar: &mut WeekCalendar, meetings: &[Meeting]) -> Result<MeetingPlacement> {
    let mut placement = MeetingPlacement::default();

    for meeting in meetings {
        let (Some(day_name), Some(time), Some(duration)) = (
            meeting.day.as_deref(),
            meeting.time.as_deref(),
            meeting.resolved_duration(),
        ) else {
            tracing::debug!(meeting = %meeting.id, "meeting incomplete, not placed");
            placement.skipped.push(meeting.id.clone());
            continue;
        };

        let Some((day, position)) = meeting
            .weekday()
            .and_then(|day| calendar.position(day).map(|pos| (day, pos)))
        else {
            tracing::warn!(
                meeting = %meeting.id,
                day = day_name,
                "meeting day is not a scheduled day, skipping"
            );
            placement.skipped.push(meeting.id.clone());
            continue;
        };

        let start = to_minutes(time)?;
        let Some(end) = start.checked_add(duration).filter(|end| *end <= MINUTES_PER_DAY) else {
            tracing::warn!(
                meeting = %meeting.id,
                time,
                duration,
                "meeting runs past midnight, skipping"
            );
            placement.skipped.push(meeting.id.clone());
            continue;
        };

        let block = Interval::new(start, end);
        let entry = CalendarEntry::new(&meeting.id, meeting.kind.into(), &meeting.description, block)
            .with_course_code(meeting.course_code.clone())
            .with_location(meeting.location.clone());
        calendar.place(day, block, entry);
        tracing::debug!(meeting = %meeting.id, day = weekday_name(day), start, end, "meeting placed");

        if meeting.kind.is_assessment() {
            if let Some(code) = meeting.course_code.as_deref() {
                placement.exam_days.record(code, position, day, start);
            }
        }
    }

    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::schedule::MeetingType;

    fn week() -> WeekCalendar {
        WeekCalendar::new(Interval::new(540, 1020), false)
    }

    fn meeting(id: &str, day: &str, time: &str, minutes: u32, kind: MeetingType) -> Meeting {
        let mut m = Meeting::new(id, kind);
        m.id = id.to_string();
        m.day = Some(day.to_string());
        m.time = Some(time.to_string());
        m.duration_minutes = Some(minutes);
        m
    }

    #[test]
    fn places_meeting_and_carves_free_time() {
        let mut calendar = week();
        let placed = place_meetings(
            &mut calendar,
            &[meeting("m1", "Wednesday", "10:00", 60, MeetingType::Meeting)],
        )
        .unwrap();
        assert!(placed.skipped.is_empty());
        let entries = calendar.calendar_for(Weekday::Wed);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_time, "10:00");
        assert_eq!(entries[0].end_time, "11:00");
        assert_eq!(
            calendar.free_intervals_for(Weekday::Wed).unwrap().as_slice(),
            &[Interval::new(540, 600), Interval::new(660, 1020)]
        );
    }

    #[test]
    fn meeting_outside_window_is_still_placed() {
        let mut calendar = week();
        place_meetings(
            &mut calendar,
            &[meeting("late", "Monday", "19:00", 60, MeetingType::Regular)],
        )
        .unwrap();
        assert_eq!(calendar.calendar_for(Weekday::Mon).len(), 1);
        assert_eq!(
            calendar.free_intervals_for(Weekday::Mon).unwrap().as_slice(),
            &[Interval::new(540, 1020)]
        );
    }

    #[test]
    fn skips_incomplete_weekend_and_overnight_meetings() {
        let mut calendar = week();
        let mut incomplete = meeting("m0", "Monday", "09:00", 30, MeetingType::Meeting);
        incomplete.time = None;
        let placed = place_meetings(
            &mut calendar,
            &[
                incomplete,
                meeting("sat", "Saturday", "10:00", 60, MeetingType::Meeting),
                meeting("odd", "Someday", "10:00", 60, MeetingType::Meeting),
                meeting("night", "Friday", "23:30", 60, MeetingType::Meeting),
            ],
        )
        .unwrap();
        assert_eq!(placed.skipped, vec!["m0", "sat", "odd", "night"]);
        assert!(calendar.calendar_for(Weekday::Fri).is_empty());
    }

    #[test]
    fn huge_duration_is_skipped_like_an_overnight_meeting() {
        let mut calendar = week();
        let placed = place_meetings(
            &mut calendar,
            &[
                meeting("long", "Tuesday", "10:00", u32::MAX, MeetingType::Meeting),
                meeting("ok", "Tuesday", "11:00", 30, MeetingType::Meeting),
            ],
        )
        .unwrap();
        assert_eq!(placed.skipped, vec!["long"]);
        assert_eq!(calendar.calendar_for(Weekday::Tue).len(), 1);
    }

    #[test]
    fn overflowing_hour_is_a_time_error() {
        let mut calendar = week();
        let err = place_meetings(
            &mut calendar,
            &[meeting("m1", "Monday", "99999999:00", 60, MeetingType::Meeting)],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimeFormat { .. }));
    }

    #[test]
    fn unparseable_time_is_an_error() {
        let mut calendar = week();
        let err = place_meetings(
            &mut calendar,
            &[meeting("m1", "Monday", "ten", 60, MeetingType::Meeting)],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimeFormat { .. }));
    }

    #[test]
    fn earliest_exam_per_course_wins() {
        let mut calendar = week();
        let mut late = meeting("e2", "Friday", "09:00", 60, MeetingType::Exam);
        late.course_code = Some("CS201".to_string());
        let mut early = meeting("e1", "Tuesday", "14:00", 60, MeetingType::Presentation);
        early.course_code = Some("CS201".to_string());
        let mut lecture = meeting("l1", "Monday", "09:00", 60, MeetingType::Regular);
        lecture.course_code = Some("CS201".to_string());

        let placed = place_meetings(&mut calendar, &[late, early, lecture]).unwrap();
        assert_eq!(placed.exam_days.day_for("CS201"), Some(Weekday::Tue));
        assert_eq!(placed.exam_days.position_for("CS201"), Some(1));
    }
}
