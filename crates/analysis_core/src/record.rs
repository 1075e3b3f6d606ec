use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend field with explicit presence: missing key, unknown, or a value.
///
/// `Null` covers both a JSON `null` and a value of the wrong type.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl fmt::Display for Field<&Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(Value::String(text)) => f.write_str(text),
            Some(other) => write!(f, "{other}"),
            None => Ok(()),
        }
    }
}

/// Measurements for one (url, repetition) execution.
///
/// The backend's JSON is kept exactly as received, so exports reproduce it
/// key for key. The accessors below read the known metrics out of it; a
/// value of an unexpected type reads as [`Field::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricRecord {
    raw: Value,
}

impl Default for MetricRecord {
    fn default() -> Self {
        Self {
            raw: Value::Object(Map::new()),
        }
    }
}

impl From<Value> for MetricRecord {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}

impl MetricRecord {
    /// The record as the backend sent it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn field(&self, key: &str) -> Field<&Value> {
        match self.raw.get(key) {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(value) => Field::Value(value),
        }
    }

    fn typed<T>(&self, key: &str, read: impl FnOnce(&Value) -> Option<T>) -> Field<T> {
        match self.field(key) {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(value) => read(value).map_or(Field::Null, Field::Value),
        }
    }

    fn integer(&self, key: &str) -> Field<i64> {
        self.typed(key, as_integer)
    }

    fn number(&self, key: &str) -> Field<f64> {
        self.typed(key, Value::as_f64)
    }

    fn text(&self, key: &str) -> Field<String> {
        self.typed(key, |value| value.as_str().map(str::to_string))
    }

    pub fn status(&self) -> Field<i64> {
        self.integer("status")
    }

    /// Seconds.
    pub fn response_time(&self) -> Field<f64> {
        self.number("response_time")
    }

    pub fn load_time_ms(&self) -> Field<f64> {
        self.number("load_time_ms")
    }

    pub fn size_kb(&self) -> Field<f64> {
        self.number("size_kb")
    }

    pub fn image_count(&self) -> Field<i64> {
        self.integer("image_count")
    }

    pub fn script_count(&self) -> Field<i64> {
        self.integer("script_count")
    }

    pub fn css_count(&self) -> Field<i64> {
        self.integer("css_count")
    }

    pub fn https_enabled(&self) -> Field<bool> {
        self.typed("https_enabled", Value::as_bool)
    }

    pub fn security_headers(&self) -> Field<i64> {
        self.integer("security_headers")
    }

    pub fn ssl_grade(&self) -> Field<String> {
        self.text("ssl_grade")
    }

    /// The description text itself, when the page has one.
    pub fn meta_description(&self) -> Field<String> {
        self.text("meta_description")
    }

    pub fn h1_count(&self) -> Field<i64> {
        self.integer("h1_count")
    }

    pub fn h2_count(&self) -> Field<i64> {
        self.integer("h2_count")
    }

    pub fn h3_count(&self) -> Field<i64> {
        self.integer("h3_count")
    }

    /// Either a `"with_alt/total (pct%)"` string or a plain number.
    pub fn alt_text_images(&self) -> Field<&Value> {
        self.field("alt_text_images")
    }

    pub fn aria_labels(&self) -> Field<i64> {
        self.integer("aria_labels")
    }

    pub fn html_lines(&self) -> Field<i64> {
        self.integer("html_lines")
    }

    pub fn html_chars(&self) -> Field<i64> {
        self.integer("html_chars")
    }

    /// Status present and in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        self.status()
            .value()
            .is_some_and(|status| (200..300).contains(status))
    }

    pub fn is_https(&self) -> bool {
        self.https_enabled().value().copied().unwrap_or(false)
    }

    pub fn has_meta_description(&self) -> bool {
        self.meta_description()
            .value()
            .is_some_and(|text| !text.is_empty())
    }

    /// Non-empty speed rating, if any.
    pub fn speed_rating(&self) -> Option<&str> {
        self.raw
            .get("speed_rating")
            .and_then(Value::as_str)
            .filter(|rating| !rating.is_empty())
    }
}

/// Integers, plus floats with no fractional part (`12.0`).
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && number.abs() < i64::MAX as f64)
            .map(|number| number as i64)
    })
}
