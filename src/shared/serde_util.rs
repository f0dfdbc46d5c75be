//! Custom serde helpers for backend wire formats.

/// Deserializes an optional price that the backend may send as a JSON number,
/// a numeric string, `null`, or not at all (pair with `#[serde(default)]`).
///
/// Unparseable values become `None`: a malformed price is "unknown", not an error.
pub mod lenient_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => parse(&n.to_string()),
            Some(Value::String(s)) => parse(s.trim()),
            _ => None,
        })
    }

    fn parse(s: &str) -> Option<Decimal> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    struct Price {
        #[serde(default, with = "super::lenient_decimal")]
        value: Option<Decimal>,
    }

    fn parse(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Price>(json).unwrap().value
    }

    #[test]
    fn test_accepts_number_string_null_and_missing() {
        assert_eq!(parse(r#"{"value": 6543.21}"#), Some(Decimal::from_str("6543.21").unwrap()));
        assert_eq!(parse(r#"{"value": "0.001"}"#), Some(Decimal::from_str("0.001").unwrap()));
        assert_eq!(parse(r#"{"value": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_scientific_notation_and_garbage() {
        assert_eq!(parse(r#"{"value": 1e-5}"#), Some(Decimal::from_str("0.00001").unwrap()));
        assert_eq!(parse(r#"{"value": "n/a"}"#), None);
    }
}
