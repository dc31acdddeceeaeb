//! Domain types for the objects API.
//!
//! # Design
//! A `Record` mirrors one `{id, name, data}` object of the REST collection.
//! The payload travels in the `data` field on the wire but is called
//! `payload` here; `data: null` and a missing `data` both decode to `None`.
//! Unknown response fields such as `createdAt` are ignored.
//!
//! Ids `1..=13` are seeded by the server and are read-only to clients
//! (`RecordKind::Reserved`). Anything else was created by a client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value payload attached to a record.
pub type Payload = Map<String, Value>;

/// Inclusive range of ids the server seeds and never lets clients modify.
pub const RESERVED_IDS: std::ops::RangeInclusive<u32> = 1..=13;

/// Who owns a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Server-seeded and read-only.
    Reserved,
    /// Created by this client; mutable and deletable.
    UserCreated,
}

/// Classify an id. Only ids that parse as an integer inside `RESERVED_IDS`
/// are reserved.
pub fn classify_id(id: &str) -> RecordKind {
    match id.parse::<u32>() {
        Ok(n) if RESERVED_IDS.contains(&n) => RecordKind::Reserved,
        _ => RecordKind::UserCreated,
    }
}

pub fn is_reserved_id(id: &str) -> bool {
    classify_id(id) == RecordKind::Reserved
}

/// A single object of the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the server on creation; `None` for drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Record {
    /// A draft record with no id and no payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Drafts count as user-created.
    pub fn kind(&self) -> RecordKind {
        self.id
            .as_deref()
            .map(classify_id)
            .unwrap_or(RecordKind::UserCreated)
    }

    pub fn is_reserved(&self) -> bool {
        self.kind() == RecordKind::Reserved
    }

    /// Body sent on create and update: `name`, plus `data` when the payload
    /// is present and non-empty. Never carries the id.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(payload) = self.payload.as_ref().filter(|p| !p.is_empty()) {
            body.insert("data".to_string(), Value::Object(payload.clone()));
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_in_range_are_reserved() {
        for n in 1..=13 {
            assert_eq!(classify_id(&n.to_string()), RecordKind::Reserved, "id {n}");
        }
    }

    #[test]
    fn other_ids_are_user_created() {
        for id in ["0", "14", "101", "-3", "ff808181932badb6", "", " 5", "5.0"] {
            assert_eq!(classify_id(id), RecordKind::UserCreated, "id {id:?}");
        }
    }

    #[test]
    fn draft_is_user_created() {
        assert_eq!(Record::new("Draft").kind(), RecordKind::UserCreated);
        assert!(Record::new("Seeded").with_id("7").is_reserved());
    }

    #[test]
    fn decodes_null_and_missing_data_as_none() {
        let a: Record = serde_json::from_str(r#"{"id":"2","name":"B","data":null}"#).unwrap();
        let b: Record = serde_json::from_str(r#"{"id":"2","name":"B"}"#).unwrap();
        assert_eq!(a, b);
        assert!(a.payload.is_none());
    }

    #[test]
    fn ignores_unknown_response_fields() {
        let record: Record = serde_json::from_str(
            r#"{"id":"abc","name":"X","data":{"year":2019},"createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("abc"));
        assert_eq!(record.payload.unwrap()["year"], 2019);
    }

    #[test]
    fn rejects_non_object_data() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"id":"1","name":"A","data":[1,2]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn request_body_omits_id_and_empty_payload() {
        let record = Record::new("Phone").with_id("abc").with_payload(Payload::new());
        assert_eq!(record.to_request_body(), json!({"name": "Phone"}));
    }

    #[test]
    fn request_body_carries_payload_as_data() {
        let mut payload = Payload::new();
        payload.insert("color".into(), json!("Blue"));
        let record = Record::new("Phone").with_payload(payload);
        assert_eq!(
            record.to_request_body(),
            json!({"name": "Phone", "data": {"color": "Blue"}})
        );
    }

    #[test]
    fn equality_is_structural() {
        let mut p1 = Payload::new();
        p1.insert("a".into(), json!({"nested": [1, 2]}));
        let p2 = p1.clone();
        assert_eq!(
            Record::new("N").with_id("x").with_payload(p1),
            Record::new("N").with_id("x").with_payload(p2)
        );
        assert_ne!(Record::new("N").with_id("x"), Record::new("N").with_id("y"));
    }
}
