//! 64-bit integers as decimal strings. 32-bit wire ints cannot carry them.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

pub fn encode(value: &Value) -> Result<Value> {
    let n = value
        .as_i64()
        .ok_or_else(|| anyhow!("expected a 64-bit integer, got {value}"))?;
    Ok(Value::String(n.to_string()))
}

pub fn decode(value: &Value) -> Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| anyhow!("expected a decimal string, got {value}"))?;
    let n: i64 = text
        .parse()
        .with_context(|| format!("not a 64-bit integer: `{text}`"))?;
    Ok(Value::from(n))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn values_beyond_f64_precision_survive() {
        let original = json!(9007199254740993i64);
        let wire = encode(&original).unwrap();
        assert_eq!(wire, json!("9007199254740993"));
        assert_eq!(decode(&wire).unwrap(), original);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&json!("12.5")).is_err());
        assert!(decode(&json!("9223372036854775808")).is_err()); // i64::MAX + 1
    }
}
