//! Wire models for the publish, pull, and acknowledge calls.
//!
//! Message payloads are raw bytes in memory and standard (padded) base64 strings on the wire;
//! the conversion happens during (de)serialization so a pulled message is already decoded when
//! it reaches the caller.

// self
use crate::_prelude::*;

/// A Pub/Sub message, either built by the caller for publishing or decoded from a pull.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
	/// Message payload.
	#[serde(default, with = "base64_data")]
	pub data: Vec<u8>,
	/// Optional attributes; omitted from the wire when empty.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
	/// Server-assigned identifier (received messages only).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message_id: Option<String>,
	/// Server-assigned publish time (received messages only).
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub publish_time: Option<OffsetDateTime>,
	/// Ordering key; set on publish to order messages, echoed on receipt.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ordering_key: Option<String>,
}
impl PubsubMessage {
	/// Creates a message carrying `data` and no attributes.
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self { data: data.into(), ..Default::default() }
	}

	/// Replaces the attribute map.
	pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
		self.attributes = attributes;

		self
	}

	/// Adds a single attribute.
	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(key.into(), value.into());

		self
	}

	/// Sets the ordering key.
	pub fn with_ordering_key(mut self, key: impl Into<String>) -> Self {
		self.ordering_key = Some(key.into());

		self
	}

	/// Returns the payload as UTF-8 text, if it is valid UTF-8.
	pub fn text(&self) -> Option<&str> {
		std::str::from_utf8(&self.data).ok()
	}
}

/// Body of a publish call; always carries exactly one message.
#[derive(Debug, Serialize)]
pub(crate) struct PublishRequest<'a> {
	pub(crate) messages: [&'a PubsubMessage; 1],
}

/// Server response to a publish call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
	/// Server-assigned identifiers, one per published message.
	#[serde(default)]
	pub message_ids: Vec<String>,
}

/// Body of a pull call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequest {
	pub(crate) max_messages: u32,
}

/// A message delivered by a pull, with the id used to acknowledge it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
	/// Opaque acknowledgement identifier.
	pub ack_id: String,
	/// Decoded message.
	pub message: PubsubMessage,
	/// Delivery attempt counter; `0` when dead-lettering is not configured.
	#[serde(default)]
	pub delivery_attempt: u32,
}

/// Ordered result of a pull call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResult {
	/// Received messages in server order; empty when nothing was available.
	#[serde(default)]
	pub received_messages: Vec<ReceivedMessage>,
}
impl PullResult {
	/// Acknowledgement identifiers in delivery order.
	pub fn ack_ids(&self) -> Vec<String> {
		self.received_messages.iter().map(|received| received.ack_id.clone()).collect()
	}

	/// Number of received messages.
	pub fn len(&self) -> usize {
		self.received_messages.len()
	}

	/// Returns `true` when the pull delivered nothing.
	pub fn is_empty(&self) -> bool {
		self.received_messages.is_empty()
	}
}

/// Body of an acknowledge call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AcknowledgeRequest<'a> {
	pub(crate) ack_ids: &'a [String],
}

mod base64_data {
	// crates.io
	use base64::prelude::{BASE64_STANDARD, Engine as _};
	use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

	pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&BASE64_STANDARD.encode(data))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let encoded = String::deserialize(deserializer)?;

		BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn publish_body_omits_empty_attributes() {
		let message = PubsubMessage::new("hello");
		let body = serde_json::to_value(PublishRequest { messages: [&message] })
			.expect("Publish body should serialize.");

		assert_eq!(body, json!({ "messages": [{ "data": "aGVsbG8=" }] }));
	}

	#[test]
	fn publish_body_keeps_attributes_and_ordering_key() {
		let message = PubsubMessage::new(vec![0xff, 0x00])
			.with_attribute("origin", "billing")
			.with_ordering_key("customer-42");
		let body = serde_json::to_value(PublishRequest { messages: [&message] })
			.expect("Publish body should serialize.");

		assert_eq!(
			body,
			json!({
				"messages": [{
					"data": "/wA=",
					"attributes": { "origin": "billing" },
					"orderingKey": "customer-42",
				}]
			})
		);
	}

	#[test]
	fn pull_response_decodes_payloads_and_metadata() {
		let raw = json!({
			"receivedMessages": [{
				"ackId": "ack-1",
				"message": {
					"data": "d29ybGQ=",
					"attributes": { "k": "v" },
					"messageId": "1001",
					"publishTime": "2024-05-01T12:30:45.123Z",
				},
				"deliveryAttempt": 2,
			}, {
				"ackId": "ack-2",
				"message": { "messageId": "1002", "publishTime": "2024-05-01T12:30:46Z" },
			}]
		});
		let result: PullResult = serde_json::from_value(raw).expect("Pull response should decode.");
		let first = &result.received_messages[0];

		assert_eq!(result.len(), 2);
		assert_eq!(first.message.text(), Some("world"));
		assert_eq!(first.message.attributes.get("k").map(String::as_str), Some("v"));
		assert_eq!(first.message.publish_time, Some(datetime!(2024-05-01 12:30:45.123 UTC)));
		assert_eq!(first.delivery_attempt, 2);
		assert!(result.received_messages[1].message.data.is_empty());
		assert_eq!(result.received_messages[1].delivery_attempt, 0);
		assert_eq!(result.ack_ids(), ["ack-1", "ack-2"]);
	}

	#[test]
	fn invalid_base64_is_a_decode_error() {
		let raw = json!({ "receivedMessages": [{ "ackId": "a", "message": { "data": "@@@" } }] });

		assert!(serde_json::from_value::<PullResult>(raw).is_err());
	}

	#[test]
	fn empty_pull_response_is_empty() {
		let result: PullResult =
			serde_json::from_value(json!({})).expect("Empty pull response should decode.");

		assert!(result.is_empty());
		assert!(result.ack_ids().is_empty());
	}

	#[test]
	fn acknowledge_body_lists_ids_in_order() {
		let ids = ["a1".to_owned(), "a2".to_owned()];
		let body = serde_json::to_string(&AcknowledgeRequest { ack_ids: &ids })
			.expect("Acknowledge body should serialize.");

		assert_eq!(body, r#"{"ackIds":["a1","a2"]}"#);
	}

	#[test]
	fn binary_payloads_survive_decoding() {
		let raw = json!({ "ackId": "a", "message": { "data": "/wA=" } });
		let received: ReceivedMessage =
			serde_json::from_value(raw).expect("Received message should decode.");

		assert_eq!(received.message.data, [0xff, 0x00]);
		assert_eq!(received.message.text(), None);
	}
}
