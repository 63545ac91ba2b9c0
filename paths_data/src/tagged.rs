//! Tagged payloads shared by the action and goal tables.
//!
//! Actions and goals are stored on disk as single-key objects such as
//! `{"healthChange": "-10"}` or `{"mandatoryItems": ["Sword"]}`. The key picks
//! the variant; the value is a loosely typed [`Payload`] that the variant's
//! parser narrows down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::TagError;

/// Raw value attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Number(i64),
    Text(String),
    Items(Vec<String>),
}

impl Payload {
    /// Read the payload as an integer. Text payloads are parsed after trimming.
    ///
    /// # Errors
    /// - if the payload is a list or text that does not parse as an integer
    pub fn as_integer(&self, tag: &'static str) -> Result<i64, TagError> {
        match self {
            Payload::Number(n) => Ok(*n),
            Payload::Text(raw) => raw.trim().parse::<i64>().map_err(|e| TagError::InvalidPayload {
                tag,
                payload: raw.clone(),
                reason: e.to_string(),
            }),
            Payload::Items(items) => Err(TagError::InvalidPayload {
                tag,
                payload: format!("{items:?}"),
                reason: "expected an integer, found a list".into(),
            }),
        }
    }

    /// Read the payload as a single text value.
    ///
    /// # Errors
    /// - if the payload is a list
    pub fn as_text(&self, tag: &'static str) -> Result<String, TagError> {
        match self {
            Payload::Text(raw) => Ok(raw.clone()),
            Payload::Number(n) => Ok(n.to_string()),
            Payload::Items(items) => Err(TagError::InvalidPayload {
                tag,
                payload: format!("{items:?}"),
                reason: "expected a single value, found a list".into(),
            }),
        }
    }

    /// Read the payload as a list of items. A lone text value is a one-item list.
    ///
    /// # Errors
    /// - if the payload is a number
    pub fn as_items(&self, tag: &'static str) -> Result<Vec<String>, TagError> {
        match self {
            Payload::Items(items) => Ok(items.clone()),
            Payload::Text(raw) => Ok(vec![raw.clone()]),
            Payload::Number(n) => Err(TagError::InvalidPayload {
                tag,
                payload: n.to_string(),
                reason: "expected a list of items".into(),
            }),
        }
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Self {
        Payload::Text(raw.to_string())
    }
}

/// On-disk form of an action or goal: an object with exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaggedEntry(BTreeMap<String, Payload>);

impl TaggedEntry {
    pub fn single(tag: &str, payload: Payload) -> Self {
        let mut map = BTreeMap::new();
        map.insert(tag.to_string(), payload);
        TaggedEntry(map)
    }

    /// Unwrap the single `(tag, payload)` pair.
    ///
    /// # Errors
    /// - if the object has zero or several keys
    pub fn into_single(self, family: &'static str) -> Result<(String, Payload), TagError> {
        let count = self.0.len();
        if count != 1 {
            return Err(TagError::TagCount { family, count });
        }
        self.0
            .into_iter()
            .next()
            .ok_or(TagError::TagCount { family, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_payload_parses_as_integer() {
        assert_eq!(Payload::from(" -10 ").as_integer("healthChange"), Ok(-10));
        assert!(matches!(
            Payload::from("abc").as_integer("healthChange"),
            Err(TagError::InvalidPayload { tag: "healthChange", .. })
        ));
    }

    #[test]
    fn entry_with_two_keys_is_rejected() {
        let entry: TaggedEntry = serde_json::from_str(r#"{"healthChange": "1", "goldChange": "2"}"#).unwrap();
        assert_eq!(
            entry.into_single("action"),
            Err(TagError::TagCount {
                family: "action",
                count: 2
            })
        );
    }

    #[test]
    fn untagged_payload_accepts_numbers_text_and_lists() {
        let entry: TaggedEntry = serde_json::from_str(r#"{"mandatoryItems": ["Sword", "Shield"]}"#).unwrap();
        let (tag, payload) = entry.into_single("goal").unwrap();
        assert_eq!(tag, "mandatoryItems");
        assert_eq!(payload, Payload::Items(vec!["Sword".into(), "Shield".into()]));

        let number: Payload = serde_json::from_str("50").unwrap();
        assert_eq!(number, Payload::Number(50));
    }
}
