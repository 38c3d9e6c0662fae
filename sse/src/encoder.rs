//! Server-sent event wire encoding.
//!
//! A frame looks like:
//!
//! ```text
//! event:<type>
//! data: <json line>
//! id:<id>
//! retry:<ms>
//!
//! ```
//!
//! Only `data` is always present. `event`, `id` and `retry` are written only when they
//! hold a non-empty, non-zero value.
//!
//! The payload is written as compact JSON with non-ASCII characters left unescaped.
//! Python publishers using `json.dumps` defaults produce `{"a": "hello"}` and `\uXXXX`
//! escapes instead; both decode to the same value on the client.
use crate::error::Result;
use crate::message::{Message, Scalar};
use log::*;
use serde_json::Value;

/// Encodes a message as one SSE frame, terminated by a blank line.
pub fn encode(message: &Message) -> String {
    // Compact JSON escapes embedded newlines, so a payload normally yields a single
    // `data:` record. Splitting keeps the frame intact if that ever changes.
    let data = message.payload().to_string();
    let mut records: Vec<String> = data.lines().map(|line| format!("data: {line}")).collect();

    if let Some(event_type) = message.event_type().filter(|t| !t.is_empty()) {
        records.insert(0, format!("event:{event_type}"));
    }
    if let Some(id) = truthy("id", message.id()) {
        records.push(format!("id:{id}"));
    }
    if let Some(retry) = truthy("retry", message.retry()) {
        records.push(format!("retry:{retry}"));
    }

    records.join("\n") + "\n\n"
}

/// Encodes a decoded bus envelope. Fails with `InvalidMessage` when the envelope carries
/// no `data` field.
pub fn encode_envelope(envelope: Value) -> Result<String> {
    Message::from_envelope(envelope).map(|message| encode(&message))
}

fn truthy<'a>(field: &str, value: Option<&'a Scalar>) -> Option<&'a Scalar> {
    match value {
        Some(value) if !value.is_truthy() => {
            debug!("Omitting SSE `{field}` field with falsy value {value:?}");
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_simplest_message() {
        assert_eq!(encode(&Message::new("hello")), "data: \"hello\"\n\n");
    }

    #[test]
    fn test_embedded_newline_is_escaped() {
        assert_eq!(
            encode(&Message::new("hello\nworld")),
            "data: \"hello\\nworld\"\n\n"
        );
        assert_eq!(
            encode(&Message::new("end of\n\nmessage")),
            "data: \"end of\\n\\nmessage\"\n\n"
        );
    }

    #[test]
    fn test_json_object_payload_is_a_single_data_line() {
        let frame = encode(&Message::new(json!({"a": "hello", "b": "world"})));
        assert!(
            frame == "data: {\"a\":\"hello\",\"b\":\"world\"}\n\n"
                || frame == "data: {\"b\":\"world\",\"a\":\"hello\"}\n\n",
            "unexpected frame {frame:?}"
        );
    }

    #[test]
    fn test_complete_message_without_id() {
        let frame = encode_envelope(json!({
            "event": "hello",
            "data": "end of\n\nmessage",
            "retry": "123",
        }))
        .unwrap();
        assert_eq!(
            frame,
            "event:hello\ndata: \"end of\\n\\nmessage\"\nretry:123\n\n"
        );
    }

    #[test]
    fn test_field_order() {
        let message = Message::new("hello2")
            .with_event_type("mytype2")
            .with_retry(456)
            .with_id(789);
        assert_eq!(
            encode(&message),
            "event:mytype2\ndata: \"hello2\"\nid:789\nretry:456\n\n"
        );
    }

    #[test]
    fn test_falsy_fields_are_omitted() {
        let message = Message::new("x")
            .with_event_type("")
            .with_id(0)
            .with_retry("");
        assert_eq!(encode(&message), "data: \"x\"\n\n");
    }

    #[test]
    fn test_falsy_envelope_fields_are_omitted() {
        let frame = encode_envelope(json!({"data": "x", "id": false, "retry": []})).unwrap();
        assert_eq!(frame, "data: \"x\"\n\n");

        let frame = encode_envelope(json!({"data": "x", "event": {}, "id": true})).unwrap();
        assert_eq!(frame, "data: \"x\"\nid:True\n\n");
    }

    #[test]
    fn test_missing_data_is_rejected() {
        let err = encode_envelope(json!({"id": 1, "event": "test", "retry": 100})).unwrap_err();
        assert!(matches!(err.error_kind, ErrorKind::InvalidMessage(_)));
    }

    #[test]
    fn test_round_trip_through_the_envelope() {
        let message = Message::new(json!(["a", 1, null]))
            .with_event_type("edit")
            .with_id("42");
        let envelope = serde_json::from_str(&message.to_envelope().unwrap()).unwrap();
        assert_eq!(encode_envelope(envelope).unwrap(), encode(&message));
    }
}
