use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::value::Value;

/// One query result: a column schema shared by every row, the rows, and a
/// result-level tag set. The tag set is serde-defaulted, so an absent tag
/// set in the wire payload normalizes to empty.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Value>>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// One write point. Tag set and field set are disjoint by construction:
/// each record field routes into exactly one of the two.
///
/// Ordered maps keep the point deterministic for the write collaborator.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

/// Position of `column` in the schema, if present.
pub(crate) fn column_index(column: &str, columns: &[String]) -> Option<usize> {
    columns.iter().position(|c| c == column)
}

/// Whether `column` participates under the filter. An empty filter selects
/// everything.
pub(crate) fn is_selected(column: &str, select: &[String]) -> bool {
    select.is_empty() || select.iter().any(|c| c == column)
}

/// Shared empty tag set for single-entry sub-binds.
pub(crate) fn empty_tags() -> &'static HashMap<String, String> {
    static EMPTY: OnceLock<HashMap<String, String>> = OnceLock::new();
    EMPTY.get_or_init(HashMap::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_from_json_without_tags() {
        let raw = r#"{
            "name": "cpu",
            "columns": ["time", "usage"],
            "values": [[1625097600000000000, "12.5"], [1625097601000000000, 13]]
        }"#;
        let series: Series = serde_json::from_str(raw).unwrap();
        assert_eq!(series.columns, vec!["time", "usage"]);
        assert_eq!(series.values.len(), 2);
        assert!(series.tags.is_empty());
        assert_eq!(series.values[0][0], Value::Int(1_625_097_600_000_000_000));
        assert_eq!(series.values[0][1], Value::String("12.5".into()));
    }

    #[test]
    fn empty_filter_selects_all() {
        assert!(is_selected("anything", &[]));
        let filter = vec!["host".to_string()];
        assert!(is_selected("host", &filter));
        assert!(!is_selected("load", &filter));
    }
}
