//! Renderable task properties.

use crate::RunContext;
use gemini_tasks_error::{RenderError, RenderErrorKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::trace;

/// A configuration value that is rendered before use.
///
/// Holds either a literal or a template string. Rendering walks the value,
/// passes every string through [`RunContext::render_template`], then converts
/// the result to `T`. A string that does not convert directly is parsed as
/// JSON, so `"{{ count }}"` rendering to `"5"` yields a number.
pub struct Property<T> {
    raw: Value,
    _type: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a property from a template expression.
    pub fn of_expression(expression: impl Into<String>) -> Self {
        Self::from_raw(Value::String(expression.into()))
    }

    fn from_raw(raw: Value) -> Self {
        Self {
            raw,
            _type: PhantomData,
        }
    }

    /// Unrendered value.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// True when the property holds no value.
    pub fn is_unset(&self) -> bool {
        self.raw.is_null()
    }
}

impl<T: Serialize> Property<T> {
    /// Creates a property from a literal value.
    pub fn of_value(value: T) -> Self {
        Self::from_raw(serde_json::to_value(value).unwrap_or(Value::Null))
    }
}

impl<T: DeserializeOwned> Property<T> {
    /// Renders the property; `None` when it holds no value.
    pub fn render<C: RunContext + ?Sized>(
        &self,
        name: &str,
        ctx: &C,
    ) -> Result<Option<T>, RenderError> {
        if self.raw.is_null() {
            return Ok(None);
        }
        let rendered = render_value(&self.raw, ctx)?;
        trace!(property = name, "Rendered property");
        convert(name, rendered).map(Some)
    }

    /// Renders a property that must have a value.
    pub fn render_required<C: RunContext + ?Sized>(
        &self,
        name: &str,
        ctx: &C,
    ) -> Result<T, RenderError> {
        self.render(name, ctx)?
            .ok_or_else(|| RenderError::new(RenderErrorKind::Missing(name.to_string())))
    }
}

fn render_value<C: RunContext + ?Sized>(value: &Value, ctx: &C) -> Result<Value, RenderError> {
    match value {
        Value::String(template) => Ok(Value::String(ctx.render_template(template)?)),
        Value::Array(items) => items
            .iter()
            .map(|item| render_value(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, field)| Ok((key.clone(), render_value(field, ctx)?)))
            .collect::<Result<Map<_, _>, RenderError>>()
            .map(Value::Object),
        other => Ok(other.clone()),
    }
}

fn convert<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, RenderError> {
    let direct = serde_json::from_value::<T>(value.clone());
    match (direct, &value) {
        (Ok(converted), _) => Ok(converted),
        (Err(first), Value::String(text)) => serde_json::from_str::<T>(text)
            .map_err(|_| conversion_error(name, first.to_string())),
        (Err(first), _) => Err(conversion_error(name, first.to_string())),
    }
}

fn conversion_error(name: &str, message: String) -> RenderError {
    RenderError::new(RenderErrorKind::Conversion {
        property: name.to_string(),
        message,
    })
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Self::from_raw(Value::Null)
    }
}

impl<T: Serialize> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Self::of_value(value)
    }
}

impl From<&str> for Property<String> {
    fn from(value: &str) -> Self {
        Self::of_value(value.to_string())
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Property").field(&self.raw).finish()
    }
}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Serialize for Property<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Property<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_raw)
    }
}

/// Duration written in human form (`5m`, `1h 30s`) or as ISO-8601 (`PT5M`).
///
/// Serializes back in human form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HumanDuration(pub Duration);

impl std::str::FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('P') || s.starts_with('p') {
            return parse_iso8601(s).map(Self);
        }
        humantime::parse_duration(s)
            .map(Self)
            .map_err(|e| format!("invalid duration '{}': {}", s, e))
    }
}

/// Parses the `PnWnDTnHnMnS` subset of ISO-8601 durations. Seconds may be
/// fractional; years and months are rejected since their length varies.
fn parse_iso8601(s: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid ISO-8601 duration '{}'", s);
    let body = &s[1..];
    let mut seconds = 0f64;
    let mut in_time = false;
    let mut number = String::new();
    let mut seen_unit = false;

    for c in body.chars() {
        match c.to_ascii_uppercase() {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            unit => {
                let value: f64 = number.parse().map_err(|_| invalid())?;
                let scale = match (in_time, unit) {
                    (false, 'W') => 604_800.0,
                    (false, 'D') => 86_400.0,
                    (true, 'H') => 3_600.0,
                    (true, 'M') => 60.0,
                    (true, 'S') => 1.0,
                    _ => return Err(invalid()),
                };
                seconds += value * scale;
                number.clear();
                seen_unit = true;
            }
        }
    }

    if !seen_unit || !number.is_empty() {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

impl Serialize for HumanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        humantime_serde::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl From<Duration> for HumanDuration {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}
