use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An event id or retry interval. Code usually hands these over as numbers while the
/// command line hands them over as text; both are written to the wire verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Whether the value is written to a frame at all. Zero and the empty string are
    /// treated the same as an absent value.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
            Scalar::Text(s) => !s.is_empty(),
        }
    }

    /// Reads an envelope field. Values that are falsy and have no scalar form (`null`,
    /// `false`, `[]`, `{}`) are treated as absent.
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Scalar::Number(n)),
            Value::String(s) => Some(Scalar::Text(s)),
            other => text_field(other).map(Scalar::Text),
        }
    }
}

/// Textual form of a non-scalar envelope field, `None` when it is falsy. Booleans are
/// rendered `True`/`False` to stay wire compatible with Python publishers.
fn text_field(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::String(s) => Some(s),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A structured message published to a channel.
///
/// The payload is mandatory and fixed at construction; the optional SSE fields are
/// attached with the `with_*` builders.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    payload: Value,
    event_type: Option<String>,
    id: Option<Scalar>,
    retry: Option<Scalar>,
}

/// Transport form published to the bus. Absent fields are serialized as `null`.
#[derive(Serialize)]
struct Envelope<'a> {
    data: &'a Value,
    event: Option<&'a str>,
    id: Option<&'a Scalar>,
    retry: Option<&'a Scalar>,
}

impl Message {
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
            event_type: None,
            id: None,
            retry: None,
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<Scalar>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_retry(mut self, retry: impl Into<Scalar>) -> Self {
        self.retry = Some(retry.into());
        self
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn id(&self) -> Option<&Scalar> {
        self.id.as_ref()
    }

    pub fn retry(&self) -> Option<&Scalar> {
        self.retry.as_ref()
    }

    /// Serializes the message into the JSON envelope carried by the bus.
    pub fn to_envelope(&self) -> Result<String> {
        let envelope = Envelope {
            data: &self.payload,
            event: self.event_type.as_deref(),
            id: self.id.as_ref(),
            retry: self.retry.as_ref(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Rebuilds a message from a decoded envelope. The `data` key must be present; an
    /// explicit `null` payload is accepted.
    pub fn from_envelope(value: Value) -> Result<Self> {
        let mut fields: Map<String, Value> = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::invalid_message(format!(
                    "envelope must be a JSON object, got {other}"
                )))
            }
        };

        let payload = fields
            .remove("data")
            .ok_or_else(|| Error::invalid_message("envelope has no `data` field"))?;

        let event_type = fields.remove("event").and_then(text_field);

        Ok(Self {
            payload,
            event_type,
            id: fields.remove("id").and_then(Scalar::from_json),
            retry: fields.remove("retry").and_then(Scalar::from_json),
        })
    }

    /// Parses the raw text received from the bus.
    pub fn decode(raw: &str) -> Result<Self> {
        Self::from_envelope(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_envelope_carries_all_four_fields() {
        let message = Message::new("hello world 1");
        let envelope: Value = serde_json::from_str(&message.to_envelope().unwrap()).unwrap();
        assert_eq!(
            envelope,
            json!({"data": "hello world 1", "event": null, "id": null, "retry": null})
        );

        let message = Message::new("hello world 3")
            .with_event_type("mytype")
            .with_retry(123)
            .with_id(456);
        let envelope: Value = serde_json::from_str(&message.to_envelope().unwrap()).unwrap();
        assert_eq!(
            envelope,
            json!({"data": "hello world 3", "event": "mytype", "id": 456, "retry": 123})
        );
    }

    #[test]
    fn test_decode_restores_the_published_message() {
        let message = Message::new(json!({"a": "hello", "b": "world"}))
            .with_event_type("edit")
            .with_id("abc")
            .with_retry(10000);
        let decoded = Message::decode(&message.to_envelope().unwrap()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_requires_data_key() {
        let err = Message::decode(r#"{"id": 1, "event": "test", "retry": 100}"#).unwrap_err();
        assert!(matches!(err.error_kind, ErrorKind::InvalidMessage(_)));
    }

    #[test]
    fn test_decode_accepts_explicit_null_payload() {
        let message = Message::decode(r#"{"data": null}"#).unwrap();
        assert_eq!(message.payload(), &Value::Null);
        assert_eq!(message.event_type(), None);
    }

    #[test]
    fn test_decode_rejects_non_object_envelope() {
        let err = Message::decode("[1, 2, 3]").unwrap_err();
        assert!(matches!(err.error_kind, ErrorKind::InvalidMessage(_)));
    }

    #[test]
    fn test_falsy_json_fields_are_absent() {
        let message = Message::from_envelope(
            json!({"data": "x", "event": false, "id": false, "retry": []}),
        )
        .unwrap();
        assert_eq!(message.event_type(), None);
        assert_eq!(message.id(), None);
        assert_eq!(message.retry(), None);

        let message = Message::from_envelope(json!({"data": "x", "id": {}})).unwrap();
        assert_eq!(message.id(), None);
    }

    #[test]
    fn test_boolean_true_fields_keep_python_rendering() {
        let message =
            Message::from_envelope(json!({"data": "x", "event": true, "id": true})).unwrap();
        assert_eq!(message.event_type(), Some("True"));
        assert_eq!(message.id(), Some(&Scalar::from("True")));
    }

    #[test]
    fn test_scalar_truthiness() {
        assert!(!Scalar::from(0i64).is_truthy());
        assert!(!Scalar::from("").is_truthy());
        assert!(Scalar::from("0").is_truthy());
        assert!(Scalar::from(789i64).is_truthy());
        assert_eq!(Scalar::from(789i64).to_string(), "789");
        assert_eq!(Scalar::from("123").to_string(), "123");
    }
}
