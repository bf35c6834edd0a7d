//! Declarative field rules

use regex::Regex;
use serde_json::Value;

/// What kind of value a field holds
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Date,
    Boolean,
    /// Embedded object validated by its own rules
    Group(Vec<FieldRule>),
}

/// A length limit together with the message reported when it is broken
#[derive(Debug, Clone)]
pub struct LengthLimit {
    pub limit: usize,
    pub message: String,
}

/// Pattern constraint for text fields
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub regex: Regex,
    pub message: String,
}

/// Closed set of accepted text values
#[derive(Debug, Clone)]
pub struct EnumRule {
    pub values: &'static [&'static str],
    pub message: String,
}

/// Rule set for one field of a document
///
/// Built with the chained constructors below, e.g.
/// `FieldRule::text("firstName", "First name").required("First name is required").trim()`.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub(super) name: &'static str,
    pub(super) label: &'static str,
    pub(super) kind: FieldKind,
    pub(super) required: Option<String>,
    pub(super) trim: bool,
    pub(super) lowercase: bool,
    pub(super) min_length: Option<LengthLimit>,
    pub(super) max_length: Option<LengthLimit>,
    pub(super) pattern: Option<PatternRule>,
    pub(super) one_of: Option<EnumRule>,
    pub(super) default: Option<Value>,
}

impl FieldRule {
    fn with_kind(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: None,
            trim: false,
            lowercase: false,
            min_length: None,
            max_length: None,
            pattern: None,
            one_of: None,
            default: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::with_kind(name, label, FieldKind::Text)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::with_kind(name, label, FieldKind::Date)
    }

    pub fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::with_kind(name, label, FieldKind::Boolean)
    }

    pub fn group(name: &'static str, label: &'static str, fields: Vec<FieldRule>) -> Self {
        Self::with_kind(name, label, FieldKind::Group(fields))
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn min_length(mut self, limit: usize, message: impl Into<String>) -> Self {
        self.min_length = Some(LengthLimit {
            limit,
            message: message.into(),
        });
        self
    }

    pub fn max_length(mut self, limit: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(LengthLimit {
            limit,
            message: message.into(),
        });
        self
    }

    pub fn pattern(mut self, regex: &Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(PatternRule {
            regex: regex.clone(),
            message: message.into(),
        });
        self
    }

    /// Restrict the field to a fixed set of values
    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        let message = format!("{} must be one of: {}", self.label, values.join(", "));
        self.one_of = Some(EnumRule { values, message });
        self
    }

    /// Value stored when the field is absent
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Check a normalized, present text value against length, pattern and enum rules
    pub(super) fn check_text(&self, value: &str) -> Result<(), String> {
        let length = value.chars().count();

        if let Some(min) = &self.min_length {
            if length < min.limit {
                return Err(min.message.clone());
            }
        }

        if let Some(max) = &self.max_length {
            if length > max.limit {
                return Err(max.message.clone());
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(value) {
                return Err(pattern.message.clone());
            }
        }

        if let Some(one_of) = &self.one_of {
            if !one_of.values.contains(&value) {
                return Err(one_of.message.clone());
            }
        }

        Ok(())
    }
}
