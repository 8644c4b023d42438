use crate::error::{CoreError, Result};
use crate::schedule::{normalize_draft, ScheduleDraft};

/// Turns free text into a draft. Real parsers sit behind a remote model;
/// the core only depends on this seam.
pub trait ScheduleParser {
    /// Unique identifier (e.g. "json").
    fn name(&self) -> &str;

    /// Parse `text` into a normalized draft.
    fn parse_text(&self, text: &str) -> Result<ScheduleDraft>;
}

/// Accepts the JSON a parser service returns, optionally wrapped in a
/// Markdown code fence.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDraftParser;

impl JsonDraftParser {
    pub fn new() -> Self {
        Self
    }
}

/// Body of a ```` ```json ... ``` ```` fence, or the trimmed input.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

impl ScheduleParser for JsonDraftParser {
    fn name(&self) -> &str {
        "json"
    }

    fn parse_text(&self, text: &str) -> Result<ScheduleDraft> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(CoreError::Parser {
                message: "parser returned no content".to_string(),
            });
        }
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| CoreError::Parser {
            message: format!("not valid JSON: {e}"),
        })?;
        if !value.is_object() {
            return Err(CoreError::Parser {
                message: "expected a JSON object with meetings and tasks".to_string(),
            });
        }
        let draft: ScheduleDraft = serde_json::from_value(value)?;
        Ok(normalize_draft(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"meetings\": [{\"description\": \"Lab\", \"day\": \"Monday\", \"time\": \"2pm\"}]}\n```";
        let draft = JsonDraftParser::new().parse_text(text).unwrap();
        assert_eq!(draft.meetings.len(), 1);
        assert_eq!(draft.meetings[0].time.as_deref(), Some("14:00"));
        assert!(!draft.meetings[0].id.is_empty());
        assert!(draft.tasks.is_empty());
    }

    #[test]
    fn parses_bare_json() {
        let draft = JsonDraftParser::new()
            .parse_text(r#"{"tasks": [{"description": "Read notes"}]}"#)
            .unwrap();
        assert_eq!(draft.tasks.len(), 1);
    }

    #[test]
    fn rejects_non_object_and_empty_output() {
        let parser = JsonDraftParser::new();
        assert!(matches!(parser.parse_text("[]"), Err(CoreError::Parser { .. })));
        assert!(matches!(parser.parse_text("```\n```"), Err(CoreError::Parser { .. })));
        assert!(matches!(parser.parse_text("sure! here"), Err(CoreError::Parser { .. })));
    }
}
