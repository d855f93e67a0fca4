//! Inbound webhook payload normalization
//!
//! The Cloud API nests user messages under `entry[0].changes[0].value`; any
//! missing level means "nothing to handle", never an error.

use crate::state_machine::Event;
use serde::Deserialize;
use serde_json::Value;

/// A normalized inbound message with its sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub from: String,
    pub event: Event,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
struct Change {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<RawMessage>,
    #[serde(default)]
    statuses: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessage {
    #[serde(default)]
    from: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<RawText>,
    #[serde(default)]
    interactive: Option<RawInteractive>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct RawInteractive {
    #[serde(default)]
    list_reply: Option<RawReply>,
    #[serde(default)]
    button_reply: Option<RawReply>,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    id: String,
}

/// Extract the user message from a webhook delivery, if there is one.
///
/// Returns `None` for delivery-status updates and for payloads with no
/// message at any nesting level. A present message of unknown shape becomes
/// `Event::Unrecognized` so the caller can acknowledge it explicitly.
pub fn normalize(payload: &Value) -> Option<InboundMessage> {
    let payload: WebhookPayload = serde_json::from_value(payload.clone()).unwrap_or_default();
    let value = payload
        .entry
        .into_iter()
        .next()?
        .changes
        .into_iter()
        .next()?
        .value;

    // Delivery receipts arrive on the same webhook; nothing to do with them.
    if !value.statuses.is_empty() {
        return None;
    }

    let message = value.messages.into_iter().next()?;
    if message.from.is_empty() {
        return None;
    }

    let event = match message.kind.as_str() {
        "text" => match message.text {
            Some(text) => Event::Text { body: text.body },
            None => Event::Unrecognized,
        },
        "interactive" => match message.interactive {
            Some(RawInteractive {
                list_reply: Some(reply),
                ..
            }) => Event::ListReply { id: reply.id },
            Some(RawInteractive {
                button_reply: Some(reply),
                ..
            }) => Event::ButtonReply { id: reply.id },
            _ => Event::Unrecognized,
        },
        _ => Event::Unrecognized,
    };

    Some(InboundMessage {
        from: message.from,
        event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delivery(message: Value) -> Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "messages": [message]
                    }
                }]
            }]
        })
    }

    #[test]
    fn text_messages_normalize_to_text_events() {
        let payload = delivery(json!({
            "from": "15550001111",
            "type": "text",
            "text": { "body": "book hospital" }
        }));

        let message = normalize(&payload).unwrap();
        assert_eq!(message.from, "15550001111");
        assert_eq!(message.event, Event::Text { body: "book hospital".to_string() });
    }

    #[test]
    fn list_replies_normalize_to_list_events() {
        let payload = delivery(json!({
            "from": "15550001111",
            "type": "interactive",
            "interactive": {
                "type": "list_reply",
                "list_reply": { "id": "H1", "title": "St. Mary" }
            }
        }));

        let message = normalize(&payload).unwrap();
        assert_eq!(message.event, Event::ListReply { id: "H1".to_string() });
    }

    #[test]
    fn button_replies_normalize_to_button_events() {
        let payload = delivery(json!({
            "from": "15550001111",
            "type": "interactive",
            "interactive": {
                "type": "button_reply",
                "button_reply": { "id": "ambulance_no", "title": "No" }
            }
        }));

        let message = normalize(&payload).unwrap();
        assert_eq!(message.event, Event::ButtonReply { id: "ambulance_no".to_string() });
    }

    #[test]
    fn status_updates_carry_no_message() {
        let payload = json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{ "id": "wamid.xyz", "status": "delivered" }]
                    }
                }]
            }]
        });

        assert!(normalize(&payload).is_none());
    }

    #[test]
    fn missing_nesting_levels_are_tolerated() {
        for payload in [
            json!({}),
            json!({ "entry": [] }),
            json!({ "entry": [{}] }),
            json!({ "entry": [{ "changes": [] }] }),
            json!({ "entry": [{ "changes": [{ "value": {} }] }] }),
            json!("not even an object"),
        ] {
            assert!(normalize(&payload).is_none());
        }
    }

    #[test]
    fn unknown_message_types_are_unrecognized() {
        let payload = delivery(json!({
            "from": "15550001111",
            "type": "image",
            "image": { "id": "media-1" }
        }));

        let message = normalize(&payload).unwrap();
        assert_eq!(message.event, Event::Unrecognized);
    }

    #[test]
    fn interactive_without_a_reply_is_unrecognized() {
        let payload = delivery(json!({
            "from": "15550001111",
            "type": "interactive",
            "interactive": { "type": "nfm_reply" }
        }));

        let message = normalize(&payload).unwrap();
        assert_eq!(message.event, Event::Unrecognized);
    }

    #[test]
    fn messages_without_a_sender_are_dropped() {
        let payload = delivery(json!({
            "type": "text",
            "text": { "body": "hello" }
        }));

        assert!(normalize(&payload).is_none());
    }
}
