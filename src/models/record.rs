//! Extracted listing records.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Name of the synthetic field holding the source page number.
pub const PAGE_FIELD: &str = "page_num";

/// A typed field value. Absence is `None` at the record level.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One parsed listing: rule fields in rule order, then the page number.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Option<FieldValue>)>,
    page_num: u32,
}

impl Record {
    pub fn new(fields: Vec<(String, Option<FieldValue>)>, page_num: u32) -> Self {
        Self { fields, page_num }
    }

    /// Value of a rule field. `None` when the field is null or unknown.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Whether the record has a key for `field` (null or not).
    pub fn contains(&self, field: &str) -> bool {
        field == PAGE_FIELD || self.fields.iter().any(|(name, _)| name == field)
    }

    pub fn page_num(&self) -> u32 {
        self.page_num
    }

    /// Rule fields in rule order, without the page number.
    pub fn fields(&self) -> &[(String, Option<FieldValue>)] {
        &self.fields
    }

    /// All keys in output order, page number last.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(PAGE_FIELD))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(PAGE_FIELD, &self.page_num)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new(
            vec![
                ("title".to_string(), Some("Desk".into())),
                ("price".to_string(), None),
                ("amount".to_string(), Some(12.5_f64.into())),
            ],
            3,
        )
    }

    #[test]
    fn test_accessors() {
        let record = sample();
        assert_eq!(record.text("title"), Some("Desk"));
        assert_eq!(record.get("price"), None);
        assert!(record.contains("price"));
        assert!(record.contains(PAGE_FIELD));
        assert!(!record.contains("missing"));
        assert_eq!(record.number("amount"), Some(12.5));
        assert_eq!(record.number("title"), None);
        assert_eq!(record.page_num(), 3);
    }

    #[test]
    fn test_keys_end_with_page_field() {
        let record = sample();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["title", "price", "amount", "page_num"]);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Desk","price":null,"amount":12.5,"page_num":3}"#
        );
    }
}
