//! Free-form entity attributes (`attr-name1=…&attr-value1=…`).

use crate::error::ApiError;
use crate::field::{Channel, SchemaVersion};
use crate::form::EncodedForm;
use crate::wire::WireValue;

/// Key/value pairs attached to a contact or customer, kept in insertion
/// order and numbered from 1 on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityAttributes {
    pairs: Vec<(String, String)>,
}

impl EntityAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in its original position.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_form(&self) -> EncodedForm {
        let mut form = EncodedForm::new();
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            let n = i + 1;
            form.append(&format!("attr-name{n}"), key.as_str());
            form.append(&format!("attr-value{n}"), value.as_str());
        }
        form
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.add(k, v);
        }
        attrs
    }
}

impl WireValue for EntityAttributes {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn wire_values(&self) -> Vec<String> {
        Vec::new()
    }

    fn encode_nested(
        &self,
        _channel: Channel,
        _version: SchemaVersion,
    ) -> Option<Result<EncodedForm, ApiError>> {
        Some(Ok(self.to_form()))
    }

    /// The set is replaced as a whole; pairs are never mixed with the baseline's.
    fn merge_nested(
        &mut self,
        baseline: &Self,
        _channel: Channel,
        _version: SchemaVersion,
    ) -> Result<(), ApiError> {
        if self.is_empty() {
            self.pairs = baseline.pairs.clone();
        }
        Ok(())
    }
}
