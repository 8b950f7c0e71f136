//! Subacquirer driver implementations.

pub mod http;
pub mod mock;
pub mod subadq_a;
pub mod subadq_b;

pub use mock::MockDriver;
pub use subadq_a::SubadqADriver;
pub use subadq_b::SubadqBDriver;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// Non-empty string field, `None` otherwise.
pub(crate) fn string_field(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Decimal from either a JSON number or a numeric string.
pub(crate) fn decimal_field(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// RFC 3339 timestamp field.
pub(crate) fn datetime_field(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
