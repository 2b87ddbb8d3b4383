//! Pulls a batch of messages and acknowledges them in the same call, against a local mock of the
//! token endpoint and the Pub/Sub API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use pubsub_rest::{
	auth::{Credential, SubscriptionId},
	config::ClientConfig,
	pubsub::ReqwestMessageClient,
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\"}");
	});
	let pull_mock = server.mock(|when, then| {
		when.method(POST).path("/v1/projects/test-project/subscriptions/demo-sub:pull");
		then.status(200).header("content-type", "application/json").body(
			"{\"receivedMessages\":[{\"ackId\":\"ack-1\",\"message\":{\"data\":\"aGVsbG8=\",\"messageId\":\"1000001\",\"publishTime\":\"2024-05-01T12:00:00Z\"}}]}",
		);
	});
	let ack_mock = server.mock(|when, then| {
		when.method(POST)
			.path("/v1/projects/test-project/subscriptions/demo-sub:acknowledge")
			.body("{\"ackIds\":[\"ack-1\"]}");
		then.status(200).header("content-type", "application/json").body("{}");
	});
	let config = ClientConfig::builder()
		.api_base(Url::parse(&server.url("/v1"))?)
		.token_endpoint(Url::parse(&server.url("/token"))?)
		.allow_insecure_endpoints()
		.build()?;
	let credential = Credential::from_slice(include_bytes!("../tests/fixtures/service_account.json"))?;
	let client = ReqwestMessageClient::new(&config)?;
	let result = client.pull(&credential, &SubscriptionId::new("demo-sub")?, 10, true)?;

	for received in &result.received_messages {
		println!(
			"Received message ID={} data={}.",
			received.message.message_id.as_deref().unwrap_or("-"),
			String::from_utf8_lossy(&received.message.data)
		);
	}

	token_mock.assert();
	pull_mock.assert();
	ack_mock.assert();

	Ok(())
}
