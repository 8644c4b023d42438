//! Questions raised for fields the parser could not fill in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Draft field a question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoField {
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "duration_minutes", alias = "duration")]
    Duration,
    #[serde(rename = "course_code")]
    CourseCode,
}

impl InfoField {
    /// Name used in `missing_info` lists and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Duration => "duration_minutes",
            Self::CourseCode => "course_code",
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Time => QuestionKind::Time,
            Self::Duration => QuestionKind::Duration,
            Self::CourseCode => QuestionKind::CourseCode,
        }
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Time,
    Duration,
    CourseCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Meeting,
    Task,
}

/// One missing field on one entity, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub field: InfoField,
    /// Description of the entity asked about.
    pub target: String,
    pub target_type: TargetType,
    pub target_id: String,
}

impl Question {
    pub(crate) fn new(
        field: InfoField,
        target_type: TargetType,
        target_id: &str,
        description: &str,
    ) -> Self {
        let question = match field {
            InfoField::Time => format!("What time is the {description}?"),
            InfoField::Duration => format!("How long is the {description}?"),
            InfoField::CourseCode => format!("What is the course code for the {description}?"),
        };
        Self {
            kind: field.kind(),
            question,
            field,
            target: description.to_string(),
            target_type,
            target_id: target_id.to_string(),
        }
    }
}
