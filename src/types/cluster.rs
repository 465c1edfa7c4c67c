//! Topic clusters returned by the Membit search API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One topic group returned by the search endpoint.
///
/// Fields are validated at the API boundary: missing or `null` text fields
/// become empty strings and an unparseable `engagement_score` becomes `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub engagement_score: f64,
}

impl Cluster {
    pub fn new(label: impl Into<String>, summary: impl Into<String>, engagement_score: f64) -> Self {
        Self {
            label: label.into(),
            summary: summary.into(),
            engagement_score,
        }
    }

    /// Decode one entry of the `clusters` array.
    ///
    /// Returns `None` for entries that are not JSON objects.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Key used for de-duplication: trimmed, lower-cased label.
    pub fn dedup_key(&self) -> String {
        self.label.trim().to_lowercase()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if score.is_finite() { score } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_entry() {
        let cluster = Cluster::from_value(json!({
            "label": "Bitcoin ETF",
            "summary": "Inflows keep rising",
            "engagement_score": 87.5
        }))
        .unwrap();
        assert_eq!(cluster.label, "Bitcoin ETF");
        assert_eq!(cluster.summary, "Inflows keep rising");
        assert_eq!(cluster.engagement_score, 87.5);
    }

    #[test]
    fn missing_fields_default() {
        let cluster = Cluster::from_value(json!({})).unwrap();
        assert_eq!(cluster, Cluster::new("", "", 0.0));
    }

    #[test]
    fn null_and_garbage_score_become_zero() {
        let null = Cluster::from_value(json!({"label": null, "engagement_score": null})).unwrap();
        assert_eq!(null.label, "");
        assert_eq!(null.engagement_score, 0.0);

        let garbage = Cluster::from_value(json!({"engagement_score": "lots"})).unwrap();
        assert_eq!(garbage.engagement_score, 0.0);
    }

    #[test]
    fn numeric_string_score_is_parsed() {
        let cluster = Cluster::from_value(json!({"engagement_score": " 12.5 "})).unwrap();
        assert_eq!(cluster.engagement_score, 12.5);
    }

    #[test]
    fn non_object_entries_are_rejected() {
        assert!(Cluster::from_value(json!("label")).is_none());
        assert!(Cluster::from_value(json!(42)).is_none());
        assert!(Cluster::from_value(Value::Null).is_none());
    }

    #[test]
    fn dedup_key_trims_and_lowercases() {
        assert_eq!(Cluster::new("  FoO ", "", 0.0).dedup_key(), "foo");
    }
}
