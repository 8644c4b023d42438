//! Lenient field decoding for parser output.
//!
//! The external parser emits loosely typed JSON: durations as numbers or
//! strings, `"null"`/`"None"` sentinels, priorities as words or digits.
//! Every such field is resolved once here into an `Option` or enum.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::Priority;

/// Resolve a raw duration value to whole minutes.
///
/// Integers and numeric strings become `Some`; `null`, `""`, `"null"`,
/// `"None"`, zero, negatives and non-numeric text are all `None`.
pub fn parse_optional_duration(raw: &Value) -> Option<u32> {
    let minutes = match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 1.0 && f.fract() == 0.0)
                    .map(|f| f as u32)
            }
        }
        Value::String(s) => parse_duration_text(s),
        _ => None,
    };
    minutes.filter(|m| *m > 0)
}

pub(crate) fn parse_duration_text(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if is_null_token(trimmed) {
        return None;
    }
    trimmed.parse::<u32>().ok().filter(|m| *m > 0)
}

/// Literal tokens the parser uses to mean "no value".
pub(crate) fn is_null_token(raw: &str) -> bool {
    raw.is_empty() || raw == "None" || raw.eq_ignore_ascii_case("null")
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if is_null_token(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn optional_duration<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_optional_duration))
}

pub(crate) fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Priority::parse(&s),
        Some(Value::Number(n)) => Priority::parse(&n.to_string()),
        _ => Priority::default(),
    })
}

/// Text list that tolerates `null` and drops non-string members.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !is_null_token(s.trim()) => Some(s.trim().to_string()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_accepts_numbers_and_numeric_text() {
        assert_eq!(parse_optional_duration(&json!(90)), Some(90));
        assert_eq!(parse_optional_duration(&json!("45")), Some(45));
        assert_eq!(parse_optional_duration(&json!(" 120 ")), Some(120));
        assert_eq!(parse_optional_duration(&json!(60.0)), Some(60));
    }

    #[test]
    fn duration_sentinels_are_missing() {
        for raw in [json!(null), json!(""), json!("null"), json!("None"), json!(0), json!("0")] {
            assert_eq!(parse_optional_duration(&raw), None, "raw = {raw}");
        }
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(parse_optional_duration(&json!("two hours")), None);
        assert_eq!(parse_optional_duration(&json!(-30)), None);
        assert_eq!(parse_optional_duration(&json!(1.5)), None);
        assert_eq!(parse_optional_duration(&json!([60])), None);
    }
}
