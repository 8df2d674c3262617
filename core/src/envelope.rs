//! Responses whose shape is only known at runtime.
//!
//! # Design
//! Some endpoints key their records by opaque numeric ids (`{"1": {..},
//! "2": {..}, "recsindb": "2"}`), others prefix every key with the
//! resource name (`contact.name`, `entity.customerid`). An [`Envelope`]
//! keeps each top-level value as a raw JSON fragment so callers can decode
//! the parts they know about into concrete types. Prefixes are stripped
//! from parsed object keys, never from the raw text, so values are left
//! alone.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Wire key → undecoded JSON fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    entries: Map<String, Value>,
}

impl Envelope {
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        let entries: Map<String, Value> = serde_json::from_str(body)?;
        Ok(Self { entries })
    }

    /// Parse `body` and strip the first matching prefix from every object
    /// key, at any depth.
    pub fn parse_stripped(body: &str, prefixes: &[&str]) -> Result<Self, ApiError> {
        let mut value: Value = serde_json::from_str(body)?;
        strip_key_prefixes(&mut value, prefixes);
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ApiError::Deserialization(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode the fragment under `key`, or `None` when absent.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        self.entries
            .get(key)
            .map(|value| T::deserialize(value).map_err(ApiError::from))
            .transpose()
    }

    /// Decode the fragment under `key`, failing when absent.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        self.decode(key)?
            .ok_or_else(|| ApiError::Deserialization(format!("missing key {key:?}")))
    }

    /// Every entry keyed by a decimal record id, in ascending id order.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<(u64, T)>, ApiError> {
        let mut records = self
            .entries
            .iter()
            .filter_map(|(key, value)| Some((key.parse::<u64>().ok()?, value)))
            .map(|(id, value)| Ok((id, T::deserialize(value)?)))
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        records.sort_by_key(|(id, _)| *id);
        Ok(records)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.entries
    }
}

/// Strip the first of `prefixes` that matches each object key, recursively.
/// When two keys collapse to the same name the later one wins.
pub fn strip_key_prefixes(value: &mut Value, prefixes: &[&str]) {
    match value {
        Value::Object(map) => {
            let old = std::mem::take(map);
            for (key, mut inner) in old {
                strip_key_prefixes(&mut inner, prefixes);
                let key = prefixes
                    .iter()
                    .find_map(|p| key.strip_prefix(p))
                    .map(str::to_string)
                    .unwrap_or(key);
                map.insert(key, inner);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_key_prefixes(item, prefixes);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::codec::JsonInt;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn contact_and_entity_prefixes_both_strip_to_name() {
        let env = Envelope::parse_stripped(
            r#"{"result": [{"contact.name": "a"}, {"entity.name": "b"}]}"#,
            &["entity.", "contact."],
        )
        .unwrap();
        let rows: Vec<Named> = env.require("result").unwrap();
        assert_eq!(rows, [Named { name: "a".into() }, Named { name: "b".into() }]);
    }

    #[test]
    fn values_containing_prefix_are_untouched() {
        let env = Envelope::parse_stripped(
            r#"{"contact.name": "contact.name"}"#,
            &["contact."],
        )
        .unwrap();
        let named: Named = serde_json::from_value(Value::Object(env.into_inner())).unwrap();
        assert_eq!(named.name, "contact.name");
    }

    #[test]
    fn only_first_matching_prefix_is_removed() {
        let mut v: Value = serde_json::from_str(r#"{"entity.contact.x": 1}"#).unwrap();
        strip_key_prefixes(&mut v, &["entity.", "contact."]);
        assert!(v.get("contact.x").is_some());
    }

    #[test]
    fn numeric_keys_are_records_in_id_order() {
        let env = Envelope::parse(
            r#"{"recsonpage": "2", "recsindb": "2", "10": {"name": "b"}, "2": {"name": "a"}}"#,
        )
        .unwrap();
        let records: Vec<(u64, Named)> = env.records().unwrap();
        assert_eq!(records.iter().map(|(id, _)| *id).collect::<Vec<_>>(), [2, 10]);
        assert_eq!(records[0].1.name, "a");

        let total: JsonInt = env.require("recsindb").unwrap();
        assert_eq!(total.get(), 2);
    }

    #[test]
    fn missing_key_is_none_or_error() {
        let env = Envelope::parse("{}").unwrap();
        assert!(env.decode::<Named>("x").unwrap().is_none());
        assert!(matches!(
            env.require::<Named>("x"),
            Err(ApiError::Deserialization(_))
        ));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(Envelope::parse("[1, 2]").is_err());
        assert!(Envelope::parse_stripped("true", &["x."]).is_err());
    }
}
