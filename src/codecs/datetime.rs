//! Millisecond timestamps in memory, RFC 3339 text on the wire.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub fn encode(value: &Value) -> Result<Value> {
    let ms = value
        .as_i64()
        .ok_or_else(|| anyhow!("expected epoch milliseconds, got {value}"))?;
    let dt = DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| anyhow!("timestamp out of range: {ms}"))?;
    Ok(Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
}

pub fn decode(value: &Value) -> Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| anyhow!("expected an RFC 3339 string, got {value}"))?;
    let dt = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("malformed timestamp `{text}`"))?;
    Ok(Value::from(dt.timestamp_millis()))
}
