//! Deserializers for form-style payloads.
//!
//! Screen forms submit every field as a string. Optional text fields arrive
//! as `""` when left empty and numeric fields arrive as whatever the user
//! typed. These helpers normalise both into `Option` values before the
//! payload is forwarded to the backend.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

/// `""`, whitespace and `null` all become `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

/// Integer field: accepts numbers or numeric text. Text is read up to the
/// first non-digit, so `"45 min"` is 45. Anything unparseable becomes `None`.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match opt {
        None => None,
        Some(Loose::Int(n)) => i32::try_from(n).ok(),
        Some(Loose::Float(f)) if f.is_finite() => i32::try_from(f.trunc() as i64).ok(),
        Some(Loose::Float(_)) => None,
        Some(Loose::Text(s)) => parse_int_prefix(&s),
    })
}

/// Decimal field: accepts numbers or numeric text; blank or invalid text
/// becomes `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match opt {
        None => None,
        Some(Loose::Int(n)) => Some(n as f64),
        Some(Loose::Float(f)) => Some(f).filter(|f| f.is_finite()),
        Some(Loose::Text(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
    })
}

fn parse_int_prefix(s: &str) -> Option<i32> {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "blank_as_none")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_i32")]
        count: Option<i32>,
        #[serde(default, deserialize_with = "lenient_f64")]
        grade: Option<f64>,
    }

    fn parse(json: &str) -> Form {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_blank_text_is_none() {
        assert_eq!(parse(r#"{"text": ""}"#).text, None);
        assert_eq!(parse(r#"{"text": "   "}"#).text, None);
        assert_eq!(parse(r#"{"text": null}"#).text, None);
        assert_eq!(parse(r#"{}"#).text, None);
        assert_eq!(parse(r#"{"text": "Room 4"}"#).text.as_deref(), Some("Room 4"));
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(parse(r#"{"count": "45"}"#).count, Some(45));
        assert_eq!(parse(r#"{"count": 45}"#).count, Some(45));
        assert_eq!(parse(r#"{"count": "45 min"}"#).count, Some(45));
        assert_eq!(parse(r#"{"count": "12.9"}"#).count, Some(12));
        assert_eq!(parse(r#"{"count": "-3"}"#).count, Some(-3));
        assert_eq!(parse(r#"{"count": ""}"#).count, None);
        assert_eq!(parse(r#"{"count": "abc"}"#).count, None);
        assert_eq!(parse(r#"{"count": 7.8}"#).count, Some(7));
    }

    #[test]
    fn test_decimal_coercion() {
        assert_eq!(parse(r#"{"grade": "89.5"}"#).grade, Some(89.5));
        assert_eq!(parse(r#"{"grade": 90}"#).grade, Some(90.0));
        assert_eq!(parse(r#"{"grade": ""}"#).grade, None);
        assert_eq!(parse(r#"{"grade": "n/a"}"#).grade, None);
    }
}
