use serde::{Deserialize, Deserializer};

/// Yahoo wraps most figures in `{"raw": 1.23, "fmt": "1.23"}`, and sends `{}`
/// when a company has no value for a field, as below:
///
/// ```text
/// "beta": {"raw": 1.264, "fmt": "1.26"}
/// "trailingPE": {}
/// ```
///
/// Bare numbers and `null` show up as well. `de_raw` reads all of them.
pub fn de_raw<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(raw(&value))
}

/// As [`de_raw`], for counts such as headcount.
pub fn de_raw_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(raw(&value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u64))
}

fn raw(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(num) => num.as_f64(),

        // "Infinity" and the like arrive as strings in `raw`
        serde_json::Value::Object(map) => match map.get("raw")? {
            serde_json::Value::Number(num) => num.as_f64(),
            _ => None,
        },

        _ => None,
    }
}
