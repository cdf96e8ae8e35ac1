use crate::users::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single item returned by the upstream service.
///
/// Records carry no fixed schema. Fields are located by searching for a key anywhere in the
/// nested payload rather than by following a known path, since the shape of test runs and
/// defects differs between item types and between Jama instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

/// A typed view over one level of a record's payload.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::Array(items) => Self::Sequence(items),
            _ => Self::Scalar(value),
        }
    }

    /// Depth-first, pre-order search for the first value bound to `key`.
    ///
    /// A mapping that holds `key` directly wins over anything nested beneath it. Otherwise children
    /// are searched in mapping insertion order or sequence order, and the first hit is returned.
    /// A key bound to an empty string, zero, or empty collection counts as found. A key bound to
    /// null counts as absent, so the search moves on to the remaining siblings.
    #[must_use]
    pub fn find(self, key: &str) -> Option<&'a Value> {
        match self {
            Self::Mapping(map) => map
                .get(key)
                .filter(|value| !value.is_null())
                .or_else(|| map.values().find_map(|value| Self::of(value).find(key))),
            Self::Sequence(items) => items.iter().find_map(|item| Self::of(item).find(key)),
            Self::Scalar(_) => None,
        }
    }
}

impl Record {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn node(&self) -> Node<'_> {
        Node::of(&self.0)
    }

    /// Locate the first value bound to `key` anywhere in the record.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.node().find(key)
    }

    /// Locate `key` and render it as text if it is bound to a string, number, or boolean.
    #[must_use]
    pub fn find_text(&self, key: &str) -> Option<String> {
        self.find(key).and_then(scalar_text)
    }

    /// Locate `key` and interpret it as a user reference.
    #[must_use]
    pub fn find_user_id(&self, key: &str) -> Option<UserId> {
        self.find(key).and_then(UserId::from_value)
    }

    /// Read `key` from the record's top-level `fields` mapping, without searching deeper.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get("fields")?.get(key)
    }

    #[must_use]
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.field(key).and_then(scalar_text)
    }

    #[must_use]
    pub fn field_user_id(&self, key: &str) -> Option<UserId> {
        self.field(key).and_then(UserId::from_value)
    }

    /// The record's top-level entries, or nothing if the payload is not a mapping.
    pub fn top_level(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.as_object().into_iter().flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Render a scalar as text. Null, mappings, and sequences have no text form.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::new(value)
    }

    #[test]
    fn test_find_top_level_key() {
        let r = record(json!({"documentKey": "SYS-1", "fields": {"documentKey": "SYS-2"}}));
        assert_eq!(r.find("documentKey"), Some(&json!("SYS-1")));
    }

    #[test]
    fn test_find_nested_key() {
        let r = record(json!({"id": 7, "fields": {"name": "Login works", "documentKey": "SYS-9"}}));
        assert_eq!(r.find("documentKey"), Some(&json!("SYS-9")));
    }

    #[test]
    fn test_find_missing_key() {
        let r = record(json!({"id": 7, "fields": {"name": "Login works"}, "tags": [1, 2, {"x": 1}]}));
        assert_eq!(r.find("documentKey"), None);
    }

    #[test]
    fn test_find_prefers_earlier_sibling() {
        let r = record(json!({
            "first": {"deep": {"target": "from-first"}},
            "second": {"target": "from-second"}
        }));
        // pre-order, left to right: the first subtree is exhausted before the second is visited
        assert_eq!(r.find("target"), Some(&json!("from-first")));
    }

    #[test]
    fn test_find_inside_sequence() {
        let r = record(json!({"items": [{"a": 1}, {"target": "in-list"}, {"target": "later"}]}));
        assert_eq!(r.find("target"), Some(&json!("in-list")));
    }

    #[test]
    fn test_find_on_top_level_sequence() {
        let r = record(json!([[{"target": 1}], {"target": 2}]));
        assert_eq!(r.find("target"), Some(&json!(1)));
    }

    #[test]
    fn test_find_empty_values_are_found() {
        let r = record(json!({"a": {"empty": ""}, "b": {"zero": 0}, "c": {"list": []}, "d": {"nothing": null}}));
        assert_eq!(r.find("empty"), Some(&json!("")));
        assert_eq!(r.find("zero"), Some(&json!(0)));
        assert_eq!(r.find("list"), Some(&json!([])));
        assert_eq!(r.find("nothing"), None);
    }

    #[test]
    fn test_find_skips_null_and_keeps_searching() {
        let r = record(json!({"fields": {"documentKey": null}, "meta": {"documentKey": "SYS-1"}}));
        assert_eq!(r.find("documentKey"), Some(&json!("SYS-1")));
        assert_eq!(r.find_text("documentKey").as_deref(), Some("SYS-1"));
    }

    #[test]
    fn test_find_null_shadowed_by_nested_value() {
        let r = record(json!({"assignedTo": null, "fields": {"assignedTo": 10}}));
        assert_eq!(r.find("assignedTo"), Some(&json!(10)));
    }

    #[test]
    fn test_find_on_scalar_record() {
        assert_eq!(record(json!("documentKey")).find("documentKey"), None);
        assert_eq!(record(json!(42)).find("documentKey"), None);
    }

    #[test]
    fn test_find_does_not_mutate() {
        let value = json!({"fields": {"documentKey": "SYS-1"}});
        let r = record(value.clone());
        let _ = r.find("documentKey");
        let _ = r.find("absent");
        assert_eq!(r.as_value(), &value);
    }

    #[test]
    fn test_find_text() {
        let r = record(json!({"fields": {"key": "SYS-1", "num": 12, "flag": true, "null": null, "obj": {}}}));
        assert_eq!(r.find_text("key").as_deref(), Some("SYS-1"));
        assert_eq!(r.find_text("num").as_deref(), Some("12"));
        assert_eq!(r.find_text("flag").as_deref(), Some("true"));
        assert_eq!(r.find_text("null"), None);
        assert_eq!(r.find_text("obj"), None);
        assert_eq!(r.find_text("absent"), None);
    }

    #[test]
    fn test_field_is_shallow() {
        let r = record(json!({"fields": {"name": "top", "nested": {"createdBy": 3}}}));
        assert_eq!(r.field_text("name").as_deref(), Some("top"));
        assert_eq!(r.field("createdBy"), None);
        assert!(r.find("createdBy").is_some());
    }

    #[test]
    fn test_field_without_fields_mapping() {
        let r = record(json!({"name": "no fields here"}));
        assert_eq!(r.field("name"), None);
    }

    #[test]
    fn test_top_level_preserves_insertion_order() {
        let r = record(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<_> = r.top_level().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_transparent() {
        let r: Record = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(r.as_value(), &json!({"id": 1}));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":1}"#);
    }
}
