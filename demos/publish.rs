//! Publishes one text message with attributes through the default reqwest transport, against a
//! local mock of the token endpoint and the Pub/Sub API.

// std
use std::collections::BTreeMap;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use pubsub_rest::{
	auth::{Credential, TopicId},
	config::ClientConfig,
	pubsub::ReqwestMessageClient,
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(200).header("content-type", "application/json").body(
			"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
		);
	});
	let publish_mock = server.mock(|when, then| {
		when.method(POST)
			.path("/v1/projects/test-project/topics/demo-topic:publish")
			.header("authorization", "Bearer demo-access");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"messageIds\":[\"1000001\"]}");
	});
	let config = ClientConfig::builder()
		.api_base(Url::parse(&server.url("/v1"))?)
		.token_endpoint(Url::parse(&server.url("/token"))?)
		.allow_insecure_endpoints()
		.build()?;
	let credential = Credential::from_slice(include_bytes!("../tests/fixtures/service_account.json"))?;
	let client = ReqwestMessageClient::new(&config)?;
	let attributes = BTreeMap::from([("origin".to_owned(), "demo".to_owned())]);
	let response =
		client.publish(&credential, &TopicId::new("demo-topic")?, "hello", attributes)?;

	println!("Sent message ID={}.", response.message_ids.join(","));

	token_mock.assert();
	publish_mock.assert();

	Ok(())
}
