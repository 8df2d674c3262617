//! Ordered multi-map of wire keys to string values.

use crate::error::ApiError;

/// Wire form produced by the encoder: each key maps to a non-empty,
/// ordered list of values. Keys keep their first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedForm {
    entries: Vec<(String, Vec<String>)>,
}

impl EncodedForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list under `key`, creating the key if needed.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append every value of `other`, keeping per-key order.
    pub fn merge(&mut self, other: EncodedForm) {
        for (key, values) in other.entries {
            for value in values {
                self.append(&key, value);
            }
        }
    }

    /// Flattened `(key, value)` pairs in form order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect()
    }

    /// Render as an `application/x-www-form-urlencoded` string.
    pub fn to_urlencoded(&self) -> Result<String, ApiError> {
        Ok(serde_urlencoded::to_string(self.pairs())?)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EncodedForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = EncodedForm::new();
        for (key, value) in iter {
            form.append(key.as_ref(), value);
        }
        form
    }
}
