//! Schema interpreter: strips, coerces and checks a candidate object.
//!
//! Validation never stops at the first problem. Every declared field is visited in
//! order and every violation is recorded, including violations inside nested objects
//! and arrays, whose messages carry the full path (`"Transactions[0].Total"`).
//!
//! A present `null` counts as absent for presence checks: it fails a required field,
//! satisfies a forbidden one, and is dropped from the output of an optional one.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::{ArrayRules, FieldKind, NumberRules, Presence, Schema, StringRules};
use crate::{error::ValidationErrors, merchant::field_map};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Validates `candidate` against `schema`.
///
/// # Errors
///
/// Returns every violation found, in field declaration order.
pub fn validate(
    schema: &Schema,
    candidate: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationErrors> {
    let mut errors = Vec::new();
    let value = validate_object(schema, candidate, "", &mut errors);
    if errors.is_empty() { Ok(value) } else { Err(ValidationErrors::new(errors)) }
}

fn validate_object(
    schema: &Schema,
    candidate: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<String>,
) -> Map<String, Value> {
    let presences = effective_presence(schema, candidate);
    let mut output = Map::with_capacity(schema.fields().len());

    for (field, presence) in schema.fields().iter().zip(presences) {
        let path = format!("{prefix}{}", field.name());
        let supplied = field_map::find(field.name(), candidate)
            .map(|(_, value)| value)
            .filter(|value| !value.is_null());

        match (supplied, presence) {
            (None, Presence::Required) => match field.default() {
                Some(default) => {
                    output.insert(field.name().to_owned(), default.clone());
                }
                None => errors.push(format!("\"{path}\" is required")),
            },
            (None, Presence::Optional) => {
                if let Some(default) = field.default() {
                    output.insert(field.name().to_owned(), default.clone());
                }
            }
            (None, Presence::Forbidden | Presence::Immutable) => {}
            (Some(_), Presence::Forbidden) => errors.push(format!("\"{path}\" is not allowed")),
            (Some(_), Presence::Immutable) => errors.push(format!(
                "\"{path}\" cannot be set per call, it comes from the client configuration"
            )),
            (Some(value), Presence::Required | Presence::Optional) => {
                if let Some(coerced) = check_kind(field.kind(), value, &path, errors) {
                    output.insert(field.name().to_owned(), coerced);
                }
            }
        }
    }

    output
}

/// Applies conditional rules on top of declared presence.
///
/// Trigger values are compared after coercion, so `"true"` triggers a rule on `true`.
fn effective_presence(schema: &Schema, candidate: &Map<String, Value>) -> Vec<Presence> {
    let mut presences: Vec<Presence> = schema.fields().iter().map(|field| field.presence()).collect();

    for rule in schema.rules() {
        let Some(trigger) = schema.get(rule.when_field) else { continue };
        let Some((_, raw)) = field_map::find(trigger.name(), candidate) else { continue };
        let value = check_kind(trigger.kind(), raw, trigger.name(), &mut Vec::new())
            .unwrap_or_else(|| raw.clone());
        if !rule.triggers(&value) {
            continue;
        }
        if let Some(position) =
            schema.fields().iter().position(|field| field.name().eq_ignore_ascii_case(rule.then_field))
        {
            presences[position] = rule.then;
        }
    }

    presences
}

/// Checks one value, returning its coerced form or `None` after recording errors.
fn check_kind(kind: &FieldKind, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    match kind {
        FieldKind::String(rules) => check_string(rules, value, path, errors),
        FieldKind::Number(rules) => check_number(rules, value, path, errors),
        FieldKind::Boolean => check_boolean(value, path, errors),
        FieldKind::Date => check_date(value, path, errors),
        FieldKind::Array(rules) => check_array(rules, value, path, errors),
        FieldKind::Object(schema) => {
            let Value::Object(nested) = value else {
                errors.push(format!("\"{path}\" must be of type object"));
                return None;
            };
            let before = errors.len();
            let output = validate_object(schema, nested, &format!("{path}."), errors);
            (errors.len() == before).then_some(Value::Object(output))
        }
    }
}

fn check_string(rules: &StringRules, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let Value::String(text) = value else {
        errors.push(format!("\"{path}\" must be a string"));
        return None;
    };
    if text.is_empty() {
        errors.push(format!("\"{path}\" is not allowed to be empty"));
        return None;
    }

    let before = errors.len();
    if !rules.one_of.is_empty() && !rules.one_of.contains(&text.as_str()) {
        errors.push(format!("\"{path}\" must be one of [{}]", rules.one_of.join(", ")));
    }
    let length = text.chars().count();
    if let Some(min) = rules.min_len
        && length < min
    {
        errors.push(format!("\"{path}\" length must be at least {min} characters long"));
    }
    if let Some(max) = rules.max_len
        && length > max
    {
        errors.push(format!("\"{path}\" length must be less than or equal to {max} characters long"));
    }
    if let Some(pattern) = &rules.pattern
        && !pattern.is_match(text)
    {
        errors.push(format!("\"{path}\" must be {}", pattern.description()));
    }
    if rules.email && !EMAIL.is_match(text) {
        errors.push(format!("\"{path}\" must be a valid email"));
    }

    (errors.len() == before).then(|| value.clone())
}

fn check_number(rules: &NumberRules, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let Some((number, coerced)) = coerce_number(value) else {
        errors.push(format!("\"{path}\" must be a number"));
        return None;
    };

    let before = errors.len();
    if rules.integer && number.fract() != 0.0 {
        errors.push(format!("\"{path}\" must be an integer"));
    }
    if let Some(min) = rules.min
        && number < min
    {
        errors.push(format!("\"{path}\" must be greater than or equal to {min}"));
    }
    if let Some(bound) = rules.greater_than
        && number <= bound
    {
        errors.push(format!("\"{path}\" must be greater than {bound}"));
    }
    if let Some(max) = rules.max
        && number > max
    {
        errors.push(format!("\"{path}\" must be less than or equal to {max}"));
    }

    (errors.len() == before).then_some(coerced)
}

/// Reads a JSON number or numeric string.
fn coerce_number(value: &Value) -> Option<(f64, Value)> {
    match value {
        Value::Number(number) => number.as_f64().map(|float| (float, value.clone())),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(integer) = text.parse::<i64>() {
                #[allow(clippy::cast_precision_loss, reason = "bounds checks tolerate rounding")]
                return Some((integer as f64, Value::from(integer)));
            }
            let float = text.parse::<f64>().ok().filter(|float| float.is_finite())?;
            Number::from_f64(float).map(|number| (float, Value::Number(number)))
        }
        _ => None,
    }
}

fn check_boolean(value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let coerced = match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text.eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    };
    if coerced.is_none() {
        errors.push(format!("\"{path}\" must be a boolean"));
    }
    coerced.map(Value::Bool)
}

fn check_date(value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let parsed = value.as_str().and_then(parse_date);
    if parsed.is_none() {
        errors.push(format!("\"{path}\" must be a valid date"));
    }
    parsed.map(|date| Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as UTC) and `YYYY-MM-DD`.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

fn check_array(rules: &ArrayRules, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let Value::Array(items) = value else {
        errors.push(format!("\"{path}\" must be an array"));
        return None;
    };

    let before = errors.len();
    if let Some(min) = rules.min_items
        && items.len() < min
    {
        errors.push(format!("\"{path}\" must contain at least {min} items"));
    }
    if let Some(max) = rules.max_items
        && items.len() > max
    {
        errors.push(format!("\"{path}\" must contain less than or equal to {max} items"));
    }

    let mut output = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{position}]");
        if item.is_null() {
            errors.push(format!("\"{item_path}\" must not be null"));
            continue;
        }
        if let Some(coerced) = check_kind(&rules.items, item, &item_path, errors) {
            output.push(coerced);
        }
    }

    (errors.len() == before).then_some(Value::Array(output))
}
