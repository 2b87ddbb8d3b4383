//! Publish, pull, and acknowledge against the Pub/Sub REST API.

// crates.io
use oauth2::http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credential, ProjectId, SubscriptionId, TopicId},
	config::ClientConfig,
	error::ConfigError,
	http::{self, HttpTransport},
	oauth::TokenExchanger,
	obs::{self, OperationKind},
	pubsub::{
		AcknowledgeRequest, PublishRequest, PublishResponse, PubsubMessage, PullRequest, PullResult,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const PUBLISH: &str = "publish";
const PULL: &str = "pull";
const ACKNOWLEDGE: &str = "acknowledge";

#[cfg(feature = "reqwest")]
/// Message client specialized for the crate's default reqwest transport.
pub type ReqwestMessageClient = MessageClient<ReqwestHttpClient>;

/// Blocking Pub/Sub client.
///
/// The client holds configuration and a transport only; the [`Credential`] is passed to every
/// call, so a single client can act for several service accounts concurrently. Each public
/// operation fetches its own access token through [`TokenExchanger`] before issuing its request.
#[derive(Clone)]
pub struct MessageClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Token exchanger; its transport is shared with API calls.
	pub tokens: TokenExchanger<C>,
	/// Pub/Sub REST API base.
	pub api_base: Url,
}
impl<C> MessageClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: &ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			tokens: TokenExchanger::with_http_client(config, http_client),
			api_base: config.api_base.clone(),
		}
	}

	/// Publishes `payload` with `attributes` as a single message to `topic`.
	///
	/// Empty `attributes` are left off the wire. Publishing is not idempotent: repeating a call
	/// creates a duplicate message.
	pub fn publish(
		&self,
		credential: &Credential,
		topic: &TopicId,
		payload: impl Into<Vec<u8>>,
		attributes: BTreeMap<String, String>,
	) -> Result<PublishResponse> {
		let message = PubsubMessage::new(payload).with_attributes(attributes);

		self.publish_message(credential, topic, &message)
	}

	/// Publishes a caller-built message (e.g. one carrying an ordering key) to `topic`.
	pub fn publish_message(
		&self,
		credential: &Credential,
		topic: &TopicId,
		message: &PubsubMessage,
	) -> Result<PublishResponse> {
		obs::observe(OperationKind::Publish, "publish", || {
			let token = self.tokens.fetch_access_token(credential)?;
			let url = self.resource_url(&credential.project_id, "topics", topic, PUBLISH)?;
			let request = http::json_post(&url, &token, &PublishRequest { messages: [message] })?;
			let response = http::send(self.transport(), PUBLISH, request)?;

			http::ensure_status(PUBLISH, &response, StatusCode::OK)?;
			http::decode_json(PUBLISH, &response)
		})
	}

	/// Pulls up to `max_messages` messages from `subscription`.
	///
	/// Payloads are base64-decoded before returning. With `auto_acknowledge`, every received
	/// message is acknowledged with the same access token before the result is returned; if that
	/// acknowledgement fails, its error is returned and the pulled messages are dropped.
	pub fn pull(
		&self,
		credential: &Credential,
		subscription: &SubscriptionId,
		max_messages: u32,
		auto_acknowledge: bool,
	) -> Result<PullResult> {
		obs::observe(OperationKind::Pull, "pull", || {
			if max_messages == 0 {
				return Err(ConfigError::ZeroMaxMessages.into());
			}

			let token = self.tokens.fetch_access_token(credential)?;
			let url =
				self.resource_url(&credential.project_id, "subscriptions", subscription, PULL)?;
			let request = http::json_post(&url, &token, &PullRequest { max_messages })?;
			let response = http::send(self.transport(), PULL, request)?;

			http::ensure_status(PULL, &response, StatusCode::OK)?;

			let result: PullResult = http::decode_json(PULL, &response)?;

			#[cfg(feature = "tracing")]
			tracing::debug!(received = result.len(), auto_acknowledge, "pulled messages");

			if auto_acknowledge && !result.is_empty() {
				self.acknowledge(&credential.project_id, subscription, &token, &result.ack_ids())?;
			}

			Ok(result)
		})
	}

	/// Acknowledges `ack_ids` on `subscription` with an already-issued access token.
	pub fn acknowledge(
		&self,
		project_id: &ProjectId,
		subscription: &SubscriptionId,
		access_token: &AccessToken,
		ack_ids: &[String],
	) -> Result<()> {
		obs::observe(OperationKind::Acknowledge, "acknowledge", || {
			let url = self.resource_url(project_id, "subscriptions", subscription, ACKNOWLEDGE)?;
			let request = http::json_post(&url, access_token, &AcknowledgeRequest { ack_ids })?;
			let response = http::send(self.transport(), ACKNOWLEDGE, request)?;

			http::ensure_status(ACKNOWLEDGE, &response, StatusCode::OK)
		})
	}

	/// Fetches a fresh access token for `credential` and acknowledges `ack_ids` with it.
	pub fn acknowledge_with_credential(
		&self,
		credential: &Credential,
		subscription: &SubscriptionId,
		ack_ids: &[String],
	) -> Result<()> {
		let token = self.tokens.fetch_access_token(credential)?;

		self.acknowledge(&credential.project_id, subscription, &token, ack_ids)
	}

	fn transport(&self) -> &C {
		self.tokens.http_client.as_ref()
	}

	// `{base}/projects/{project}/{collection}/{resource}:{verb}`
	fn resource_url(
		&self,
		project: &ProjectId,
		collection: &str,
		resource: &str,
		verb: &str,
	) -> Result<Url> {
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidEndpoint {
				endpoint: "api",
				url: self.api_base.to_string(),
			})?
			.pop_if_empty()
			.extend(["projects", project.as_ref(), collection, &format!("{resource}:{verb}")]);

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl MessageClient<ReqwestHttpClient> {
	/// Creates a client backed by a fresh redirect-free reqwest client.
	pub fn new(config: &ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for MessageClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MessageClient")
			.field("api_base", &self.api_base.as_str())
			.field("tokens", &self.tokens)
			.finish()
	}
}
