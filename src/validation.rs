use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Field-level report for a rejected input. Non-empty whenever it is returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Collects typed fields out of a JSON object, recording an issue per bad field.
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                errors: ValidationErrors::default(),
            }),
            other => Err(ValidationErrors::single(
                "body",
                format!("Expected object, received {}", type_name(other)),
            )),
        }
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        match self.object.get(field) {
            None => {
                self.errors.push(field, "Required");
                None
            }
            Some(value) => Some(value),
        }
    }

    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                let message = format!("Expected string, received {}", type_name(other));
                self.errors.push(field, message);
                None
            }
        }
    }

    pub fn non_empty_string(&mut self, field: &str) -> Option<String> {
        let value = self.string(field)?;
        if value.is_empty() {
            self.errors
                .push(field, "String must contain at least 1 character(s)");
            return None;
        }
        Some(value)
    }

    pub fn email(&mut self, field: &str) -> Option<String> {
        let value = self.string(field)?.trim().to_lowercase();
        if !is_valid_email(&value) {
            self.errors.push(field, "Invalid email");
            return None;
        }
        Some(value)
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        match self.present(field)? {
            Value::Bool(b) => Some(*b),
            other => {
                let message = format!("Expected boolean, received {}", type_name(other));
                self.errors.push(field, message);
                None
            }
        }
    }

    /// A timestamp coerced to epoch milliseconds.
    pub fn timestamp_millis(&mut self, field: &str) -> Option<i64> {
        let value = self.present(field)?;
        match coerce_timestamp_millis(value) {
            Some(ms) => Some(ms),
            None => {
                self.errors.push(field, "Invalid date");
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

// Same bounds as an ECMAScript Date: +/- 100,000,000 days around the epoch.
const MAX_TIMESTAMP_MS: f64 = 8.64e15;

/// Accepts RFC 3339 strings, offset-less date-times and plain dates (read as UTC),
/// or a JSON number of epoch milliseconds.
pub fn coerce_timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            let ms = n.as_f64()?;
            if !ms.is_finite() || ms.abs() > MAX_TIMESTAMP_MS {
                return None;
            }
            Some(ms.trunc() as i64)
        }
        Value::String(s) => parse_date_string(s.trim()),
        _ => None,
    }
}

fn parse_date_string(s: &str) -> Option<i64> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(to_millis(dt));
    }

    let local_formats: &[&[_]] = &[
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    for format in local_formats {
        if let Ok(dt) = PrimitiveDateTime::parse(s, *format) {
            return Some(to_millis(dt.assume_utc()));
        }
    }

    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| to_millis(d.midnight().assume_utc()))
}

fn to_millis(dt: OffsetDateTime) -> i64 {
    (dt.unix_timestamp_nanos() / 1_000_000) as i64
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
