//! Type coercion layer.
//!
//! Wire values arrive with only a handful of primitive encodings; this is the
//! single place that absorbs the ambiguity. Every conversion is total: an
//! unrecognized input shape degrades to the zero value of the target, never
//! to an error.

use chrono::{DateTime, Utc};

use crate::value::Value;

/// Integer coercion. Strings try a base-10 parse first; if that fails they
/// are retried as RFC3339 and, on success, yield the nanosecond epoch value —
/// so one source value can serve as either a duration-like integer or a
/// timestamp depending on the destination.
pub fn to_i64(value: &Value) -> i64 {
    match value {
        Value::Int(i) => *i,
        Value::UInt(u) => *u as i64,
        Value::Float(x) => *x as i64,
        Value::String(s) => match s.parse::<i64>() {
            Ok(i) => i,
            Err(_) => DateTime::parse_from_rfc3339(s)
                .ok()
                .and_then(|t| t.with_timezone(&Utc).timestamp_nanos_opt())
                .unwrap_or(0),
        },
        _ => 0,
    }
}

pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::UInt(u) => *u as f64,
        Value::Float(x) => *x,
        Value::String(s) => s.parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String coercion: integers in decimal, floats in minimal-precision
/// scientific notation, strings as-is, `Null` empty. Composite shapes fall
/// back to the generic rendering.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(x) => format!("{x:E}"),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Timestamp coercion. A non-empty string parses as RFC3339 (failure yields
/// the zero timestamp); everything else is read as nanoseconds since epoch
/// and split into seconds plus nanosecond remainder.
pub fn to_timestamp(value: &Value) -> DateTime<Utc> {
    if let Value::String(s) = value {
        if !s.is_empty() {
            return DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(|_| zero_timestamp());
        }
    }

    let nanos = to_i64(value);
    DateTime::from_timestamp(nanos.div_euclid(1_000_000_000), nanos.rem_euclid(1_000_000_000) as u32)
        .unwrap_or_else(zero_timestamp)
}

fn zero_timestamp() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}
