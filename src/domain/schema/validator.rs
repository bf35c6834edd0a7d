//! Generic document validator driven by a field rule table

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::errors::FieldErrors;
use super::rule::{FieldKind, FieldRule};

/// Path reported when the document itself is not an object
pub const DOCUMENT_PATH: &str = "body";

/// An ordered table of field rules describing one document shape
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Validate and normalize a whole document
    ///
    /// Every field is checked; the returned errors name every failing path.
    /// On success the output holds only known fields, normalized (trimmed,
    /// case-folded, defaults applied, empty values dropped).
    pub fn validate(&self, document: &Value) -> Result<Map<String, Value>, FieldErrors> {
        let Some(input) = document.as_object() else {
            return Err(FieldErrors::single(
                DOCUMENT_PATH,
                "Request body must be a JSON object",
            ));
        };

        let mut errors = FieldErrors::new();
        let output = walk(&self.fields, input, "", &mut errors);

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

fn walk(
    fields: &[FieldRule],
    input: &Map<String, Value>,
    prefix: &str,
    errors: &mut FieldErrors,
) -> Map<String, Value> {
    let mut output = Map::new();

    for rule in fields {
        let path = join_path(prefix, rule.name);
        let raw = input.get(rule.name).filter(|v| !v.is_null());

        let value = match &rule.kind {
            FieldKind::Group(nested) => check_group(rule, nested, raw, &path, errors),
            _ => check_scalar(rule, raw, &path, errors),
        };

        if let Some(value) = value {
            output.insert(rule.name.to_string(), value);
        }
    }

    output
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn check_group(
    rule: &FieldRule,
    nested: &[FieldRule],
    raw: Option<&Value>,
    path: &str,
    errors: &mut FieldErrors,
) -> Option<Value> {
    let Some(raw) = raw else {
        if let Some(message) = &rule.required {
            errors.insert(path, message.clone());
        }
        return None;
    };

    let Some(object) = raw.as_object() else {
        errors.insert(path, format!("{} must be an object", rule.label));
        return None;
    };

    let errors_before = errors.len();
    let output = walk(nested, object, path, errors);

    // A group whose members are all absent counts as absent itself
    if output.is_empty() && errors.len() == errors_before {
        if let Some(message) = &rule.required {
            errors.insert(path, message.clone());
        }
        return None;
    }

    Some(Value::Object(output))
}

fn check_scalar(
    rule: &FieldRule,
    raw: Option<&Value>,
    path: &str,
    errors: &mut FieldErrors,
) -> Option<Value> {
    let normalized = match raw.map(|value| normalize(rule, value)) {
        None => None,
        Some(Ok(value)) => value,
        Some(Err(message)) => {
            errors.insert(path, message);
            return None;
        }
    };

    let Some(value) = normalized else {
        if let Some(message) = &rule.required {
            errors.insert(path, message.clone());
            return None;
        }
        return rule.default.clone();
    };

    if let (FieldKind::Text, Value::String(text)) = (&rule.kind, &value) {
        if let Err(message) = rule.check_text(text) {
            errors.insert(path, message);
            return None;
        }
    }

    Some(value)
}

/// Cast a raw value to the field's kind. `Ok(None)` means "treat as absent".
fn normalize(rule: &FieldRule, value: &Value) -> Result<Option<Value>, String> {
    match rule.kind {
        FieldKind::Text => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(format!("{} must be a string", rule.label)),
            };
            Ok(normalize_text(rule, text).map(Value::String))
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Ok(Some(Value::Bool(*b))),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" => Ok(Some(Value::Bool(true))),
                "false" => Ok(Some(Value::Bool(false))),
                _ => Err(format!("{} must be true or false", rule.label)),
            },
            _ => Err(format!("{} must be true or false", rule.label)),
        },
        FieldKind::Date => {
            let Value::String(s) = value else {
                return Err(format!("{} must be a valid date", rule.label));
            };
            let s = s.trim();

            if s.is_empty() {
                return Ok(None);
            }

            parse_date(s)
                .map(|dt| Some(Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))))
                .ok_or_else(|| format!("{} must be a valid date", rule.label))
        }
        FieldKind::Group(_) => Err(format!("{} must be an object", rule.label)),
    }
}

fn normalize_text(rule: &FieldRule, text: String) -> Option<String> {
    let text = if rule.trim {
        text.trim().to_string()
    } else {
        text
    };
    let text = if rule.lowercase {
        text.to_lowercase()
    } else {
        text
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
